use super::special::correlation_p_value;
use super::stats;
use crate::errors::{AnalyticsError, Result};
use crate::models::stock::{PriceField, Series};
use serde::Serialize;

/// 相关系数及双侧 p 值
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Correlation {
    pub coefficient: f64,
    pub p_value: f64,
}

/// Pearson 与 Spearman 成对结果
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldCorrelation {
    pub x: PriceField,
    pub y: PriceField,
    pub pearson: Correlation,
    pub spearman: Correlation,
}

/// Linear correlation of two equal-length sequences.
pub fn pearson_correlation(a: &[f64], b: &[f64]) -> Result<Correlation> {
    check_pair(a, b)?;
    let coefficient = pearson_coefficient(a, b)?;
    Ok(Correlation {
        coefficient,
        p_value: correlation_p_value(coefficient, a.len()),
    })
}

/// Rank correlation; tied values share their average rank.
pub fn spearman_correlation(a: &[f64], b: &[f64]) -> Result<Correlation> {
    check_pair(a, b)?;
    let coefficient = pearson_coefficient(&average_ranks(a), &average_ranks(b))?;
    Ok(Correlation {
        coefficient,
        p_value: correlation_p_value(coefficient, a.len()),
    })
}

/// 同一序列两列之间的 Pearson + Spearman
pub fn field_correlation(series: &Series, x: PriceField, y: PriceField) -> Result<FieldCorrelation> {
    let xs = series.values(x);
    let ys = series.values(y);
    Ok(FieldCorrelation {
        x,
        y,
        pearson: pearson_correlation(&xs, &ys)?,
        spearman: spearman_correlation(&xs, &ys)?,
    })
}

fn check_pair(a: &[f64], b: &[f64]) -> Result<()> {
    if a.len() != b.len() {
        return Err(AnalyticsError::LengthMismatch {
            left: a.len(),
            right: b.len(),
        });
    }
    if a.len() < 2 {
        return Err(AnalyticsError::InsufficientData(format!(
            "correlation needs at least 2 points, got {}",
            a.len()
        )));
    }
    Ok(())
}

fn pearson_coefficient(a: &[f64], b: &[f64]) -> Result<f64> {
    let mean_a = stats::mean(a);
    let mean_b = stats::mean(b);

    let mut sxy = 0.0;
    let mut sxx = 0.0;
    let mut syy = 0.0;
    for (x, y) in a.iter().zip(b) {
        let dx = x - mean_a;
        let dy = y - mean_b;
        sxy += dx * dy;
        sxx += dx * dx;
        syy += dy * dy;
    }

    if sxx == 0.0 || syy == 0.0 {
        return Err(AnalyticsError::InsufficientData(
            "correlation is undefined for a constant sequence".to_string(),
        ));
    }

    // sqrt(sxx * syy) 保证 a 与自身的相关系数恰为 1
    Ok((sxy / (sxx * syy).sqrt()).clamp(-1.0, 1.0))
}

/// 1-based ranks, ties averaged.
pub(crate) fn average_ranks(values: &[f64]) -> Vec<f64> {
    let mut order: Vec<usize> = (0..values.len()).collect();
    order.sort_by(|&i, &j| values[i].total_cmp(&values[j]));

    let mut ranks = vec![0.0; values.len()];
    let mut start = 0;
    while start < order.len() {
        let mut end = start + 1;
        while end < order.len() && values[order[end]] == values[order[start]] {
            end += 1;
        }
        // 位置 start..end 的平均名次
        let rank = (start + end + 1) as f64 / 2.0;
        for &idx in &order[start..end] {
            ranks[idx] = rank;
        }
        start = end;
    }
    ranks
}
