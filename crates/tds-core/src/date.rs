use chrono::DateTime;

/// Rendered in place of a timestamp chrono cannot represent.
pub const INVALID_TIME: &str = "Invalid Time";

/// Format a UTC epoch as `YYYY-MM-DD HH:MM:SS`.
pub fn format_timestamp(epoch: i64) -> String {
    match DateTime::from_timestamp(epoch, 0) {
        Some(utc) => utc.format("%Y-%m-%d %H:%M:%S").to_string(),
        None => INVALID_TIME.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_timestamp() {
        assert_eq!(format_timestamp(0), "1970-01-01 00:00:00");
        assert_eq!(format_timestamp(1000), "1970-01-01 00:16:40");
        assert_eq!(format_timestamp(2000), "1970-01-01 00:33:20");
        assert_eq!(format_timestamp(1_700_000_000), "2023-11-14 22:13:20");
        assert_eq!(format_timestamp(-1), "1969-12-31 23:59:59");
    }

    #[test]
    fn test_out_of_range_is_invalid() {
        assert_eq!(format_timestamp(i64::MAX), INVALID_TIME);
        assert_eq!(format_timestamp(i64::MIN), INVALID_TIME);
    }
}
