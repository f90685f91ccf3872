use chrono::{DateTime, Local, Utc};
use std::time::Duration;

/// 格式化时间为本地时间显示
pub fn format_timestamp(time: DateTime<Utc>) -> String {
    time.with_timezone(&Local).format("%Y-%m-%d %H:%M:%S").to_string()
}

/// 格式化耗时 (例如: "850ms", "12.3s", "2m 5s")
pub fn format_elapsed(duration: Duration) -> String {
    let millis = duration.as_millis();
    match millis {
        0..=999 => format!("{}ms", millis),
        1000..=59_999 => format!("{:.1}s", duration.as_secs_f64()),
        _ => {
            let seconds = duration.as_secs();
            format!("{}m {}s", seconds / 60, seconds % 60)
        }
    }
}
