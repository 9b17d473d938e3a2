use stock_series_analytics::config::DEFAULT_DATA_PATH;
use stock_series_analytics::loader::loader_for_path;
use std::error::Error;
use std::path::Path;

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    // 检查数据文件是否存在
    let path_arg = std::env::args().nth(1).unwrap_or_else(|| DEFAULT_DATA_PATH.to_string());
    let path = Path::new(&path_arg);
    if !path.exists() {
        return Err(format!("数据文件不存在: {}", path.display()).into());
    }

    let series = loader_for_path(path).load()?;

    match (series.first(), series.last()) {
        (Some(first), Some(last)) => {
            println!("最早交易日期: {}", first.date());
            println!("最新交易日期: {}", last.date());
            println!("日线数量: {}", series.len());
        }
        _ => println!("未找到有效的日期"),
    }

    Ok(())
}
