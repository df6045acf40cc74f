// Serde helpers for the upstream payloads.

use serde::de::{self, Deserializer, Visitor};
use std::fmt;

/// Deserialize a decimal that the upstream API sends either as a JSON number
/// or as a string such as `"5.2"`. Empty strings and `null` read as `0.0`.
pub(crate) fn decimal<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    struct DecimalVisitor;

    impl<'de> Visitor<'de> for DecimalVisitor {
        type Value = f64;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a number or a numeric string")
        }

        fn visit_f64<E: de::Error>(self, v: f64) -> Result<f64, E> {
            Ok(v)
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<f64, E> {
            Ok(v as f64)
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<f64, E> {
            Ok(v as f64)
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<f64, E> {
            let trimmed = v.trim();
            if trimmed.is_empty() {
                return Ok(0.0);
            }
            trimmed
                .parse::<f64>()
                .map_err(|_| E::invalid_value(de::Unexpected::Str(v), &self))
        }

        fn visit_unit<E: de::Error>(self) -> Result<f64, E> {
            Ok(0.0)
        }

        fn visit_none<E: de::Error>(self) -> Result<f64, E> {
            Ok(0.0)
        }

        fn visit_some<D2: Deserializer<'de>>(self, d: D2) -> Result<f64, D2::Error> {
            d.deserialize_any(DecimalVisitor)
        }
    }

    deserializer.deserialize_any(DecimalVisitor)
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;

    #[derive(Deserialize)]
    struct Probe {
        #[serde(deserialize_with = "super::decimal", default)]
        value: f64,
    }

    fn parse(json: &str) -> Result<f64, serde_json::Error> {
        serde_json::from_str::<Probe>(json).map(|p| p.value)
    }

    #[test]
    fn reads_numeric_string() {
        assert!((parse(r#"{"value": "5.2"}"#).unwrap() - 5.2).abs() < f64::EPSILON);
    }

    #[test]
    fn reads_plain_number() {
        assert!((parse(r#"{"value": 7}"#).unwrap() - 7.0).abs() < f64::EPSILON);
        assert!((parse(r#"{"value": 1.5}"#).unwrap() - 1.5).abs() < f64::EPSILON);
    }

    #[test]
    fn empty_and_null_read_as_zero() {
        assert_eq!(parse(r#"{"value": ""}"#).unwrap(), 0.0);
        assert_eq!(parse(r#"{"value": null}"#).unwrap(), 0.0);
        assert_eq!(parse(r#"{}"#).unwrap(), 0.0);
    }

    #[test]
    fn rejects_garbage() {
        assert!(parse(r#"{"value": "five"}"#).is_err());
    }
}
