//! Record timestamp rendering

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// How the record time is written
///
/// ```
/// use rust_contextual_logger::TimestampFormat;
/// use chrono::Utc;
///
/// assert!(TimestampFormat::Iso8601.format(&Utc::now()).ends_with('Z'));
/// assert!(TimestampFormat::UnixMillis.is_numeric());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimestampFormat {
    /// `2025-01-08T10:30:45.123Z`
    #[default]
    Iso8601,
    /// `2025-01-08T10:30:45.123456Z`
    Iso8601Micros,
    /// `2025-01-08T10:30:45.123456+00:00`
    Rfc3339,
    /// Seconds since the epoch
    Unix,
    /// Milliseconds since the epoch
    UnixMillis,
    /// klog-style header time, month and day then wall clock: `0108 10:30:45.123456`
    Header,
    /// Any strftime pattern
    Custom(String),
}

impl TimestampFormat {
    /// strftime pattern for the pattern-driven variants
    fn pattern(&self) -> Option<&str> {
        match self {
            TimestampFormat::Iso8601 => Some("%Y-%m-%dT%H:%M:%S%.3fZ"),
            TimestampFormat::Iso8601Micros => Some("%Y-%m-%dT%H:%M:%S%.6fZ"),
            TimestampFormat::Header => Some("%m%d %H:%M:%S%.6f"),
            TimestampFormat::Custom(pattern) => Some(pattern),
            TimestampFormat::Rfc3339 | TimestampFormat::Unix | TimestampFormat::UnixMillis => None,
        }
    }

    #[must_use]
    pub fn format(&self, datetime: &DateTime<Utc>) -> String {
        if let Some(pattern) = self.pattern() {
            return datetime.format(pattern).to_string();
        }
        match self {
            TimestampFormat::Unix => datetime.timestamp().to_string(),
            TimestampFormat::UnixMillis => datetime.timestamp_millis().to_string(),
            _ => datetime.to_rfc3339_opts(SecondsFormat::Micros, false),
        }
    }

    /// Whether the rendered value is a bare integer (JSON writes it as a number)
    #[must_use]
    pub fn is_numeric(&self) -> bool {
        matches!(self, TimestampFormat::Unix | TimestampFormat::UnixMillis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn fixed_datetime() -> DateTime<Utc> {
        // 2025-01-08 10:30:45.123456 UTC
        Utc.with_ymd_and_hms(2025, 1, 8, 10, 30, 45)
            .single()
            .expect("valid datetime")
            + chrono::Duration::microseconds(123456)
    }

    #[test]
    fn test_every_variant_renders() {
        let cases = [
            (TimestampFormat::Iso8601, "2025-01-08T10:30:45.123Z"),
            (TimestampFormat::Iso8601Micros, "2025-01-08T10:30:45.123456Z"),
            (TimestampFormat::Rfc3339, "2025-01-08T10:30:45.123456+00:00"),
            (TimestampFormat::Unix, "1736332245"),
            (TimestampFormat::UnixMillis, "1736332245123"),
            (TimestampFormat::Header, "0108 10:30:45.123456"),
            (TimestampFormat::Custom("%Y/%m/%d %H:%M".to_string()), "2025/01/08 10:30"),
        ];

        for (format, expected) in cases {
            assert_eq!(format.format(&fixed_datetime()), expected, "{:?}", format);
        }
    }

    #[test]
    fn test_only_epoch_variants_are_numeric() {
        assert!(TimestampFormat::Unix.is_numeric());
        assert!(TimestampFormat::UnixMillis.is_numeric());
        assert!(!TimestampFormat::Header.is_numeric());
        assert!(!TimestampFormat::Custom("%s".to_string()).is_numeric());
    }

    #[test]
    fn test_config_names() {
        let format: TimestampFormat =
            serde_json::from_str("\"header\"").expect("deserialize header");
        assert_eq!(format, TimestampFormat::Header);

        let format: TimestampFormat =
            serde_json::from_str(r#"{"custom":"%H:%M"}"#).expect("deserialize custom");
        assert_eq!(format, TimestampFormat::Custom("%H:%M".to_string()));
    }
}
