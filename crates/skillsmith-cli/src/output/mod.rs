pub mod json;
pub mod table;

pub use crate::cli::OutputFormat;

/// Render an RFC 3339 timestamp from the service as `YYYY-MM-DD HH:MM`.
pub fn format_timestamp(raw: &str) -> String {
    chrono::DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|_| raw.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_timestamp() {
        assert_eq!(format_timestamp("2026-01-05T10:00:00Z"), "2026-01-05 10:00");
        assert_eq!(format_timestamp("yesterday"), "yesterday");
    }
}
