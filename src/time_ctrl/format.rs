// src/time_ctrl/format.rs
//! Человекочитаемое время для табло: "0:42", "12:05", "1:02:09".

/// Отформатировать миллисекунды. Отрицательное значение считается нулём.
pub fn format_ms(ms: i64) -> String {
    let total_secs = ms.max(0) / 1000;

    let hours = total_secs / 3600;
    let minutes = (total_secs % 3600) / 60;
    let seconds = total_secs % 60;

    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, minutes, seconds)
    } else {
        format!("{}:{:02}", minutes, seconds)
    }
}
