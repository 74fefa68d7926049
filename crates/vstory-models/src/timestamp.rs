//! Timestamp formatting helpers.

/// Format seconds into an HH:MM:SS or HH:MM:SS.mmm string.
///
/// # Examples
/// ```
/// use vstory_models::timestamp::format_seconds;
/// assert_eq!(format_seconds(5400.0), "01:30:00");
/// assert_eq!(format_seconds(90.5), "00:01:30.500");
/// ```
pub fn format_seconds(total_secs: f64) -> String {
    let hours = (total_secs / 3600.0).floor() as u32;
    let mins = ((total_secs % 3600.0) / 60.0).floor() as u32;
    let secs = total_secs % 60.0;

    // Include milliseconds if present
    if (secs - secs.floor()).abs() > 0.0001 {
        format!("{:02}:{:02}:{:06.3}", hours, mins, secs)
    } else {
        format!("{:02}:{:02}:{:02}", hours, mins, secs.floor() as u32)
    }
}

/// Format a scene span as `start - end` for logs and titles.
pub fn format_span(start_secs: f64, end_secs: f64) -> String {
    format!("{} - {}", format_seconds(start_secs), format_seconds(end_secs))
}
