/// Rendered in place of a time that is not known yet.
pub const UNKNOWN_TIME: &str = "--:--";

/// Formats seconds as `M:SS`. Minutes are unbounded; negative input clamps to zero.
pub fn format_time(seconds: f64) -> String {
    if !seconds.is_finite() {
        return UNKNOWN_TIME.to_string();
    }
    let total = seconds.max(0.0).floor() as u64;
    format!("{}:{:02}", total / 60, total % 60)
}
