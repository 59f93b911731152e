//! Typed cell values decoded from CSV text.

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use serde::Serialize;
use thiserror::Error;

use crate::Representation;

/// Error for cell text that does not fit the column representation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Cannot read '{text}' as {representation:?}")]
pub struct ValueError {
    /// Target representation.
    pub representation: Representation,
    /// Offending cell text.
    pub text: String,
}

/// A single decoded cell.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    /// Empty cell.
    Null,
    /// Text.
    String(String),
    /// 16-bit integer.
    Short(i16),
    /// 32-bit integer.
    Integer(i32),
    /// 64-bit integer.
    Long(i64),
    /// Decimal in its textual form.
    Decimal(String),
    /// Single-precision float.
    Float(f32),
    /// Double-precision float.
    Double(f64),
    /// UTC timestamp.
    Timestamp(DateTime<Utc>),
}

impl Value {
    /// Decodes `text` according to `representation`.
    ///
    /// Empty text is [`Value::Null`] for every representation except text.
    /// Timestamps accept RFC 3339, `YYYY-MM-DD HH:MM:SS[.fff]` (UTC) and epoch
    /// milliseconds.
    ///
    /// # Errors
    ///
    /// Returns an error if the text does not parse as the representation.
    pub fn parse(representation: Representation, text: &str) -> Result<Self, ValueError> {
        if text.is_empty() {
            return Ok(match representation {
                Representation::String => Self::String(String::new()),
                _ => Self::Null,
            });
        }

        let err = || ValueError {
            representation,
            text: text.to_string(),
        };
        let trimmed = text.trim();

        Ok(match representation {
            Representation::String => Self::String(text.to_string()),
            Representation::Short => Self::Short(trimmed.parse().map_err(|_| err())?),
            Representation::Integer => Self::Integer(trimmed.parse().map_err(|_| err())?),
            Representation::Long => Self::Long(trimmed.parse().map_err(|_| err())?),
            Representation::Decimal => {
                trimmed.parse::<f64>().map_err(|_| err())?;
                Self::Decimal(trimmed.to_string())
            }
            Representation::Float => Self::Float(trimmed.parse().map_err(|_| err())?),
            Representation::Double => Self::Double(trimmed.parse().map_err(|_| err())?),
            Representation::Timestamp => Self::Timestamp(parse_timestamp(trimmed).ok_or_else(err)?),
        })
    }

    /// Returns true for [`Value::Null`].
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Null => Ok(()),
            Self::String(s) | Self::Decimal(s) => f.write_str(s),
            Self::Short(v) => write!(f, "{v}"),
            Self::Integer(v) => write!(f, "{v}"),
            Self::Long(v) => write!(f, "{v}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::Double(v) => write!(f, "{v}"),
            Self::Timestamp(ts) => write!(f, "{}", ts.format("%Y-%m-%dT%H:%M:%S%.3fZ")),
        }
    }
}

fn parse_timestamp(text: &str) -> Option<DateTime<Utc>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(text) {
        return Some(ts.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S%.f") {
        return Some(naive.and_utc());
    }
    text.parse::<i64>()
        .ok()
        .and_then(|ms| Utc.timestamp_millis_opt(ms).single())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_numbers() {
        assert_eq!(
            Value::parse(Representation::Short, "12").unwrap(),
            Value::Short(12)
        );
        assert_eq!(
            Value::parse(Representation::Long, "-9000000000").unwrap(),
            Value::Long(-9_000_000_000)
        );
        assert_eq!(
            Value::parse(Representation::Decimal, "10.50").unwrap(),
            Value::Decimal("10.50".to_string())
        );
    }

    #[test]
    fn test_parse_empty_is_null() {
        assert!(Value::parse(Representation::Double, "").unwrap().is_null());
        assert_eq!(
            Value::parse(Representation::String, "").unwrap(),
            Value::String(String::new())
        );
    }

    #[test]
    fn test_parse_timestamps() {
        let expected = Utc.with_ymd_and_hms(2016, 6, 3, 9, 24, 0).unwrap();
        for text in ["2016-06-03T09:24:00.000Z", "2016-06-03 09:24:00", "1464945840000"] {
            assert_eq!(
                Value::parse(Representation::Timestamp, text).unwrap(),
                Value::Timestamp(expected),
                "{text}"
            );
        }
    }

    #[test]
    fn test_parse_rejects_garbage() {
        let err = Value::parse(Representation::Integer, "ten").unwrap_err();
        assert_eq!(err.representation, Representation::Integer);
        assert_eq!(err.text, "ten");
    }

    #[test]
    fn test_display_timestamp() {
        let ts = Utc.with_ymd_and_hms(2024, 1, 15, 12, 30, 45).unwrap();
        assert_eq!(Value::Timestamp(ts).to_string(), "2024-01-15T12:30:45.000Z");
    }

    #[test]
    fn test_serialize_untagged() {
        let row = vec![
            Value::Null,
            Value::String("nur".into()),
            Value::Long(7),
            Value::Decimal("1.10".into()),
        ];
        assert_eq!(
            serde_json::to_string(&row).unwrap(),
            r#"[null,"nur",7,"1.10"]"#
        );
    }
}
