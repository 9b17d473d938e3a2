use stock_series_analytics::analytics;
use stock_series_analytics::{CsvSeriesLoader, PriceField, SeriesLoader};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "data/uber_stock_data.csv".to_string());

    // 加载数据
    let series = CsvSeriesLoader::new(&path).load()?;
    println!("日线数量: {}", series.len());

    // 开收盘差
    let delta = analytics::open_close_delta(&series)?;
    println!(
        "收盘高于开盘: {} 天, 平均差值 {:.2}",
        delta.positive_count, delta.mean
    );

    // 最近5天均线
    let ma7 = analytics::rolling_mean(&series, PriceField::Close, 7)?;
    let ma30 = analytics::rolling_mean(&series, PriceField::Close, 30)?;
    println!("\n{:<12} {:<10} {:<10} {:<10}", "日期", "收盘", "MA7", "MA30");
    println!("{:-<46}", "");
    let start = series.len().saturating_sub(5);
    for (i, bar) in series.bars().iter().enumerate().skip(start) {
        let fmt = |v: Option<f64>| v.map_or("-".to_string(), |v| format!("{:.2}", v));
        println!(
            "{:<12} {:<10.2} {:<10} {:<10}",
            bar.date().to_string(),
            bar.close(),
            fmt(ma7[i]),
            fmt(ma30[i])
        );
    }

    let crossovers = analytics::moving_average_crossovers(&series, PriceField::Close, 7, 30)?;
    println!("\nMA7/MA30 交叉次数: {}", crossovers);

    // 量价相关
    let corr = analytics::field_correlation(&series, PriceField::Volume, PriceField::Close)?;
    println!(
        "Pearson {:.4} (p={:.4}), Spearman {:.4}",
        corr.pearson.coefficient, corr.pearson.p_value, corr.spearman.coefficient
    );

    // 季节性
    let monthly = analytics::monthly_average(&series, PriceField::AdjClose)?;
    if let (Some(best), Some(worst)) = (monthly.best(), monthly.worst()) {
        println!(
            "最强月份: {}, 最弱月份: {}",
            analytics::month_name(best.0),
            analytics::month_name(worst.0)
        );
    }

    Ok(())
}
