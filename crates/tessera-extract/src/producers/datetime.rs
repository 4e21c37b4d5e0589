use std::sync::Arc;

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, Offset, TimeZone, Utc};
use tessera_core::{DeclaredType, ResolveError, ResolveResult, TemporalKind, Value};

use crate::clock::Clock;
use crate::{ArgumentMetadata, ExtractionContext, ParameterBag, ValueProducer};

const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

/// Parses date-time parameters.
///
/// A present but empty value resolves to null for nullable parameters and to
/// the current instant otherwise. Non-negative integers are Unix timestamps.
/// With a [`DateTimeFormat`](crate::DateTimeFormat) the value must match it
/// exactly; values that cannot be parsed are reported as not found.
#[derive(Debug, Clone, Default)]
pub struct DateTimeProducer {
    clock: Option<Arc<dyn Clock>>,
}

impl DateTimeProducer {
    /// Creates a producer that reads the system time.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a producer that asks `clock` for the current instant.
    #[must_use]
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self { clock: Some(clock) }
    }

    fn now(&self) -> DateTime<FixedOffset> {
        self.clock
            .as_ref()
            .map_or_else(|| Utc::now().fixed_offset(), |clock| clock.now())
    }

    fn local_offset(&self) -> FixedOffset {
        self.clock
            .as_ref()
            .map_or_else(|| Utc.fix(), |clock| *clock.now().offset())
    }

    fn parse(&self, value: &Value, format: Option<&str>) -> Option<DateTime<FixedOffset>> {
        let offset = self.local_offset();
        match (value, format) {
            (Value::String(s), Some(format)) => parse_with_format(s, format, offset),
            (Value::Int(n), Some(format)) => parse_with_format(&n.to_string(), format, offset),
            (Value::Int(n), None) if *n >= 0 => from_timestamp(*n),
            (Value::String(s), None) => parse_any(s, offset),
            _ => None,
        }
    }
}

impl ValueProducer for DateTimeProducer {
    fn name(&self) -> &'static str {
        "datetime"
    }

    fn supports(&self, argument: &ArgumentMetadata) -> bool {
        matches!(argument.declared_type(), Some(DeclaredType::DateTime(_)))
    }

    fn produce(
        &self,
        _ctx: &ExtractionContext,
        argument: &ArgumentMetadata,
        bag: &ParameterBag,
    ) -> ResolveResult<Vec<Value>> {
        let Some(value) = bag.get(argument.name()) else {
            return Ok(Vec::new());
        };
        let kind = match argument.declared_type() {
            Some(DeclaredType::DateTime(kind)) => *kind,
            _ => TemporalKind::default(),
        };

        let instant = match value {
            Value::Null => None,
            Value::String(s) if s.is_empty() => None,
            Value::DateTime(instant) => return Ok(vec![Value::DateTime(convert(*instant, kind))]),
            other => Some(
                self.parse(other, argument.datetime_format().map(|f| f.as_str()))
                    .ok_or_else(|| {
                        ResolveError::not_found(
                            argument.name(),
                            format!("Invalid date given for parameter \"{}\".", argument.name()),
                        )
                    })?,
            ),
        };

        match instant {
            Some(instant) => Ok(vec![Value::DateTime(convert(instant, kind))]),
            None if argument.is_nullable() => Ok(vec![Value::Null]),
            None => Ok(vec![Value::DateTime(convert(self.now(), kind))]),
        }
    }
}

fn convert(instant: DateTime<FixedOffset>, kind: TemporalKind) -> DateTime<FixedOffset> {
    match kind {
        TemporalKind::Utc => instant.with_timezone(&Utc).fixed_offset(),
        TemporalKind::Offset => instant,
    }
}

fn from_timestamp(seconds: i64) -> Option<DateTime<FixedOffset>> {
    DateTime::from_timestamp(seconds, 0).map(|instant| instant.fixed_offset())
}

fn parse_with_format(
    input: &str,
    format: &str,
    offset: FixedOffset,
) -> Option<DateTime<FixedOffset>> {
    DateTime::parse_from_str(input, format)
        .ok()
        .or_else(|| {
            NaiveDateTime::parse_from_str(input, format)
                .ok()
                .and_then(|naive| offset.from_local_datetime(&naive).single())
        })
        .or_else(|| {
            NaiveDate::parse_from_str(input, format)
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
                .and_then(|naive| offset.from_local_datetime(&naive).single())
        })
}

fn parse_any(input: &str, offset: FixedOffset) -> Option<DateTime<FixedOffset>> {
    let input = input.trim();

    if !input.is_empty() && input.bytes().all(|b| b.is_ascii_digit()) {
        return input.parse().ok().and_then(from_timestamp);
    }

    if let Ok(instant) = DateTime::parse_from_rfc3339(input) {
        return Some(instant);
    }
    if let Ok(instant) = DateTime::parse_from_rfc2822(input) {
        return Some(instant);
    }

    NAIVE_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(input, format).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(input, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
        .and_then(|naive| offset.from_local_datetime(&naive).single())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use tessera_core::ErrorCategory;

    fn utc(s: &str) -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339(s).unwrap()
    }

    fn argument(kind: TemporalKind) -> crate::metadata::ArgumentMetadataBuilder {
        ArgumentMetadata::builder("date").declared_type(DeclaredType::DateTime(kind))
    }

    fn produce(
        producer: &DateTimeProducer,
        argument: &ArgumentMetadata,
        value: Option<Value>,
    ) -> ResolveResult<Vec<Value>> {
        let ctx = ExtractionContext::builder().build().unwrap();
        let mut bag = ParameterBag::new();
        if let Some(value) = value {
            bag.set("date", value);
        }
        producer.produce(&ctx, argument, &bag)
    }

    fn instant(values: &[Value]) -> DateTime<FixedOffset> {
        *values[0].as_datetime().unwrap()
    }

    #[test]
    fn test_rfc3339_and_timestamp() {
        let producer = DateTimeProducer::new();
        let date = argument(TemporalKind::Utc).build();
        let expected = utc("2021-01-01T01:02:03Z");

        let values = produce(&producer, &date, Some(Value::from("2021-01-01T01:02:03+00:00"))).unwrap();
        assert_eq!(instant(&values), expected);

        let values = produce(&producer, &date, Some(Value::Int(expected.timestamp()))).unwrap();
        assert_eq!(instant(&values), expected);

        let values = produce(&producer, &date, Some(Value::from(expected.timestamp().to_string()))).unwrap();
        assert_eq!(instant(&values), expected);
    }

    #[test]
    fn test_other_general_formats() {
        let producer = DateTimeProducer::new();
        let date = argument(TemporalKind::Utc).build();

        for input in [
            "2021-01-01 01:02:03",
            "2021-01-01T01:02:03",
            "Fri, 01 Jan 2021 01:02:03 +0000",
        ] {
            let values = produce(&producer, &date, Some(Value::from(input))).unwrap();
            assert_eq!(instant(&values), utc("2021-01-01T01:02:03Z"), "{input}");
        }

        let values = produce(&producer, &date, Some(Value::from("2021-01-01"))).unwrap();
        assert_eq!(instant(&values), utc("2021-01-01T00:00:00Z"));
    }

    #[test]
    fn test_utc_kind_normalizes_offset() {
        let producer = DateTimeProducer::new();
        let raw = Value::from("2021-01-01T03:02:03+02:00");

        let values = produce(&producer, &argument(TemporalKind::Utc).build(), Some(raw.clone())).unwrap();
        assert_eq!(instant(&values).offset().local_minus_utc(), 0);
        assert_eq!(instant(&values), utc("2021-01-01T01:02:03Z"));

        let values = produce(&producer, &argument(TemporalKind::Offset).build(), Some(raw)).unwrap();
        assert_eq!(instant(&values).offset().local_minus_utc(), 7200);
    }

    #[test]
    fn test_explicit_format() {
        let producer = DateTimeProducer::new();
        let date = argument(TemporalKind::Utc)
            .datetime_format("%Y/%d/%m %H:%M:%S")
            .build();

        let values = produce(&producer, &date, Some(Value::from("2021/01/12 01:02:03"))).unwrap();
        assert_eq!(instant(&values), utc("2021-12-01T01:02:03Z"));

        let err = produce(&producer, &date, Some(Value::from("2021-12-01 01:02:03"))).unwrap_err();
        assert_eq!(err.category(), ErrorCategory::NotFound);
    }

    #[test]
    fn test_format_uses_clock_offset() {
        let clock = FixedClock::new(utc("2024-06-01T12:00:00+02:00"));
        let producer = DateTimeProducer::with_clock(Arc::new(clock));
        let date = argument(TemporalKind::Offset).datetime_format("%Y-%m-%d %H:%M").build();

        let values = produce(&producer, &date, Some(Value::from("2021-01-01 10:00"))).unwrap();
        assert_eq!(instant(&values), utc("2021-01-01T08:00:00Z"));
        assert_eq!(instant(&values).offset().local_minus_utc(), 7200);
    }

    #[test]
    fn test_invalid_date_is_not_found() {
        let producer = DateTimeProducer::new();
        let date = argument(TemporalKind::Utc).build();

        let err = produce(&producer, &date, Some(Value::from("yesterday-ish"))).unwrap_err();
        assert_eq!(err.category(), ErrorCategory::NotFound);
        assert_eq!(err.to_string(), "Invalid date given for parameter \"date\".");

        assert!(produce(&producer, &date, Some(Value::Int(-5))).is_err());
        assert!(produce(&producer, &date, Some(Value::Bool(true))).is_err());
    }

    #[test]
    fn test_empty_value() {
        let fixed = utc("2024-06-01T12:00:00Z");
        let producer = DateTimeProducer::with_clock(Arc::new(FixedClock::new(fixed)));

        let nullable = argument(TemporalKind::Utc).nullable(true).build();
        let values = produce(&producer, &nullable, Some(Value::from(""))).unwrap();
        assert_eq!(values, vec![Value::Null]);

        let required = argument(TemporalKind::Utc).build();
        let values = produce(&producer, &required, Some(Value::Null)).unwrap();
        assert_eq!(instant(&values), fixed);
    }

    #[test]
    fn test_empty_value_without_clock_is_now() {
        let producer = DateTimeProducer::new();
        let required = argument(TemporalKind::Utc).build();

        let before = Utc::now();
        let values = produce(&producer, &required, Some(Value::from(""))).unwrap();
        let after = Utc::now();

        let now = instant(&values);
        assert!(now >= before && now <= after);
        assert_eq!(now.offset().local_minus_utc(), 0);
    }

    #[test]
    fn test_missing_key_produces_nothing() {
        let producer = DateTimeProducer::new();
        let date = argument(TemporalKind::Utc).nullable(true).build();
        assert!(produce(&producer, &date, None).unwrap().is_empty());
    }

    #[test]
    fn test_existing_instant_is_converted() {
        let producer = DateTimeProducer::new();
        let date = argument(TemporalKind::Utc).build();
        let value = Value::DateTime(utc("2021-01-01T03:02:03+02:00"));

        let values = produce(&producer, &date, Some(value)).unwrap();
        assert_eq!(instant(&values).offset().local_minus_utc(), 0);
    }

    #[test]
    fn test_supports() {
        let producer = DateTimeProducer::new();
        assert!(producer.supports(&argument(TemporalKind::Utc).build()));
        assert!(!producer.supports(&ArgumentMetadata::builder("date").build()));
    }
}
