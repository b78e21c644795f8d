use std::time::Duration;

/// Reads a `retry-after` value given in whole seconds.
///
/// HTTP-date values and anything negative or non-numeric fall back to `default`.
pub fn parse_retry_after(value: Option<&str>, default: Duration) -> Duration {
    value
        .and_then(|v| v.trim().parse::<u64>().ok())
        .map(Duration::from_secs)
        .unwrap_or(default)
}

/// Renders an `x-rate-limit-*` header for log output.
pub fn describe_header(value: Option<&str>) -> &str {
    value.unwrap_or("unknown")
}
