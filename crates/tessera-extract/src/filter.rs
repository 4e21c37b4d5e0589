//! Filter/validation engine.
//!
//! Coerces raw request values to integers, floats, booleans or strings and
//! validates them against flags and range constraints. Structural filters
//! apply a separate filter to each key of a map.
//!
//! [`filter_value`] returns `None` when the value fails. Inside arrays and
//! structural filters a failing element becomes [`Value::Null`] instead.

use tessera_core::{Value, ValueMap};

use crate::descriptor::{FilterFlags, FilterKind, FilterMap, FilterOptions, FilterSpec};

const WHITESPACE: &[char] = &[' ', '\t', '\n', '\r', '\x0b', '\0'];

/// Applies `spec` to `value`.
///
/// # Example
///
/// ```
/// use tessera_core::Value;
/// use tessera_extract::{filter_value, FilterFlags, FilterKind, FilterOptions, FilterSpec};
///
/// let hex = FilterOptions::from(FilterFlags::ALLOW_HEX);
/// let spec = FilterSpec::Kind(FilterKind::Int);
///
/// assert_eq!(filter_value(&Value::from("0xff"), &spec, &hex), Some(Value::Int(255)));
/// assert_eq!(filter_value(&Value::from("0xff"), &spec, &FilterOptions::new()), None);
/// ```
#[must_use]
pub fn filter_value(value: &Value, spec: &FilterSpec, options: &FilterOptions) -> Option<Value> {
    match spec {
        FilterSpec::Kind(kind) => filter_with_kind(value, *kind, options),
        FilterSpec::Structural(fields) => match value {
            Value::Map(map) => Some(filter_structure(map, fields, options.add_empty)),
            _ => None,
        },
    }
}

fn filter_with_kind(value: &Value, kind: FilterKind, options: &FilterOptions) -> Option<Value> {
    let flags = options.flags;

    if value.is_object() {
        return Some(value.clone());
    }

    if value.is_array() {
        if flags.contains(FilterFlags::REQUIRE_SCALAR)
            || !flags.intersects(FilterFlags::REQUIRE_ARRAY | FilterFlags::FORCE_ARRAY)
        {
            return None;
        }
        return Some(filter_array(value, kind, options));
    }

    if flags.contains(FilterFlags::REQUIRE_ARRAY) {
        return None;
    }

    let filtered = filter_scalar(value, kind, options)?;
    if flags.contains(FilterFlags::FORCE_ARRAY) {
        Some(Value::List(vec![filtered]))
    } else {
        Some(filtered)
    }
}

fn filter_array(value: &Value, kind: FilterKind, options: &FilterOptions) -> Value {
    match value {
        Value::List(items) => Value::List(
            items
                .iter()
                .map(|item| filter_element(item, kind, options))
                .collect(),
        ),
        Value::Map(map) => Value::Map(
            map.iter()
                .map(|(key, item)| (key.clone(), filter_element(item, kind, options)))
                .collect(),
        ),
        other => filter_element(other, kind, options),
    }
}

fn filter_element(value: &Value, kind: FilterKind, options: &FilterOptions) -> Value {
    if value.is_array() {
        filter_array(value, kind, options)
    } else if value.is_object() {
        value.clone()
    } else {
        filter_scalar(value, kind, options).unwrap_or(Value::Null)
    }
}

fn filter_structure(map: &ValueMap, fields: &FilterMap, add_empty: bool) -> Value {
    let mut out = ValueMap::with_capacity(fields.len());
    for (key, field) in fields {
        match map.get(key) {
            Some(value) => {
                let filtered =
                    filter_with_kind(value, field.kind, &field.options).unwrap_or(Value::Null);
                out.insert(key.clone(), filtered);
            }
            None if add_empty => {
                out.insert(key.clone(), Value::Null);
            }
            None => {}
        }
    }
    Value::Map(out)
}

fn filter_scalar(value: &Value, kind: FilterKind, options: &FilterOptions) -> Option<Value> {
    match kind {
        FilterKind::Int => filter_int(value, options).map(Value::Int),
        FilterKind::Float => filter_float(value, options).map(Value::Float),
        FilterKind::Bool => filter_bool(value).map(Value::Bool),
        FilterKind::Default => filter_default(value).map(Value::String),
    }
}

fn filter_int(value: &Value, options: &FilterOptions) -> Option<i64> {
    let number = match value {
        Value::Int(n) => *n,
        Value::Bool(true) => 1,
        Value::Float(f) if f.is_finite() && f.fract() == 0.0 && f.abs() < 9.2e18 => *f as i64,
        Value::String(s) => parse_int(s, options.flags)?,
        _ => return None,
    };
    options.in_range(number as f64).then_some(number)
}

fn parse_int(input: &str, flags: FilterFlags) -> Option<i64> {
    let s = input.trim_matches(WHITESPACE);

    if flags.contains(FilterFlags::ALLOW_HEX) {
        if let Some(digits) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
            return parse_radix(digits, 16);
        }
    }

    if flags.contains(FilterFlags::ALLOW_OCTAL) && s.len() > 1 && s.starts_with('0') {
        let rest = &s[1..];
        let digits = rest
            .strip_prefix('o')
            .or_else(|| rest.strip_prefix('O'))
            .unwrap_or(rest);
        return parse_radix(digits, 8);
    }

    let digits = s.strip_prefix(['-', '+']).unwrap_or(s);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    if digits.len() > 1 && digits.starts_with('0') {
        return None;
    }
    s.parse().ok()
}

fn parse_radix(digits: &str, radix: u32) -> Option<i64> {
    if digits.is_empty() || !digits.chars().all(|c| c.is_digit(radix)) {
        return None;
    }
    i64::from_str_radix(digits, radix).ok()
}

fn filter_float(value: &Value, options: &FilterOptions) -> Option<f64> {
    let number = match value {
        Value::Float(f) => *f,
        Value::Int(n) => *n as f64,
        Value::Bool(true) => 1.0,
        Value::String(s) => parse_float(s, options)?,
        _ => return None,
    };
    (number.is_finite() && options.in_range(number)).then_some(number)
}

fn parse_float(input: &str, options: &FilterOptions) -> Option<f64> {
    let s = input.trim_matches(WHITESPACE);
    let decimal = options.decimal.unwrap_or('.');
    let thousands = options.flags.contains(FilterFlags::ALLOW_THOUSAND);

    let mut normalized = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();

    if let Some(&sign @ ('-' | '+')) = chars.peek() {
        normalized.push(sign);
        chars.next();
    }

    let mut digits = 0;
    while let Some(&c) = chars.peek() {
        if c.is_ascii_digit() {
            normalized.push(c);
            digits += 1;
            chars.next();
        } else if thousands && digits > 0 && c != decimal && matches!(c, ',' | '\'' | '.') {
            chars.next();
            if !chars.peek().is_some_and(char::is_ascii_digit) {
                return None;
            }
        } else {
            break;
        }
    }

    if chars.peek() == Some(&decimal) {
        chars.next();
        normalized.push('.');
        while let Some(&c) = chars.peek() {
            if !c.is_ascii_digit() {
                break;
            }
            normalized.push(c);
            digits += 1;
            chars.next();
        }
    }

    if digits == 0 {
        return None;
    }

    if let Some(&('e' | 'E')) = chars.peek() {
        chars.next();
        normalized.push('e');
        if let Some(&sign @ ('-' | '+')) = chars.peek() {
            normalized.push(sign);
            chars.next();
        }
        let mut exponent_digits = 0;
        while let Some(&c) = chars.peek() {
            if !c.is_ascii_digit() {
                break;
            }
            normalized.push(c);
            exponent_digits += 1;
            chars.next();
        }
        if exponent_digits == 0 {
            return None;
        }
    }

    if chars.next().is_some() {
        return None;
    }
    normalized.parse().ok()
}

fn filter_bool(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::Int(0) => Some(false),
        Value::Int(1) => Some(true),
        Value::String(s) => match s.trim_matches(WHITESPACE).to_ascii_lowercase().as_str() {
            "1" | "true" | "on" | "yes" => Some(true),
            "0" | "false" | "off" | "no" | "" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

fn filter_default(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Int(n) => Some(n.to_string()),
        Value::Float(f) => Some(f.to_string()),
        Value::Bool(true) => Some("1".to_string()),
        Value::Bool(false) | Value::Null => Some(String::new()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::FieldFilter;
    use proptest::prelude::*;

    fn int(value: impl Into<Value>, options: &FilterOptions) -> Option<Value> {
        filter_value(&value.into(), &FilterSpec::Kind(FilterKind::Int), options)
    }

    fn float(value: impl Into<Value>, options: &FilterOptions) -> Option<Value> {
        filter_value(&value.into(), &FilterSpec::Kind(FilterKind::Float), options)
    }

    fn boolean(value: impl Into<Value>) -> Option<Value> {
        filter_value(
            &value.into(),
            &FilterSpec::Kind(FilterKind::Bool),
            &FilterOptions::new(),
        )
    }

    #[test]
    fn test_int_decimal() {
        let options = FilterOptions::new();
        assert_eq!(int("123", &options), Some(Value::Int(123)));
        assert_eq!(int(" -42\n", &options), Some(Value::Int(-42)));
        assert_eq!(int("+7", &options), Some(Value::Int(7)));
        assert_eq!(int("0", &options), Some(Value::Int(0)));
        assert_eq!(int(123_i64, &options), Some(Value::Int(123)));
        assert_eq!(int(3.0, &options), Some(Value::Int(3)));
        assert_eq!(int(true, &options), Some(Value::Int(1)));

        assert_eq!(int("", &options), None);
        assert_eq!(int("not-an-integer", &options), None);
        assert_eq!(int("012", &options), None);
        assert_eq!(int("10e2", &options), None);
        assert_eq!(int("1.5", &options), None);
        assert_eq!(int(1.5, &options), None);
        assert_eq!(int("99999999999999999999", &options), None);
        assert_eq!(int(false, &options), None);
    }

    #[test]
    fn test_int_hex_and_octal() {
        let hex = FilterOptions::from(FilterFlags::ALLOW_HEX);
        assert_eq!(int("0xff", &hex), Some(Value::Int(255)));
        assert_eq!(int("0XFF", &hex), Some(Value::Int(255)));
        assert_eq!(int("0x", &hex), None);
        assert_eq!(int("0xfg", &hex), None);
        assert_eq!(int("0xff", &FilterOptions::new()), None);

        let octal = FilterOptions::from(FilterFlags::ALLOW_OCTAL);
        assert_eq!(int("010", &octal), Some(Value::Int(8)));
        assert_eq!(int("0o17", &octal), Some(Value::Int(15)));
        assert_eq!(int("08", &octal), None);
        assert_eq!(int("0", &octal), Some(Value::Int(0)));
    }

    #[test]
    fn test_int_range() {
        let options = FilterOptions::new().max_range(10.0);
        assert_eq!(int(42_i64, &options), None);
        assert_eq!(int("10", &options), Some(Value::Int(10)));

        let hex_limited = FilterOptions::from(FilterFlags::ALLOW_HEX).max_range(100.0);
        assert_eq!(int(42_i64, &hex_limited), Some(Value::Int(42)));
        assert_eq!(int("0xff", &hex_limited), None);

        let positive = FilterOptions::new().min_range(0.0);
        assert_eq!(int("-1", &positive), None);
    }

    #[test]
    fn test_float() {
        let options = FilterOptions::new();
        assert_eq!(float("1.23", &options), Some(Value::Float(1.23)));
        assert_eq!(float(1.23, &options), Some(Value::Float(1.23)));
        assert_eq!(float(2_i64, &options), Some(Value::Float(2.0)));
        assert_eq!(float("10e2", &options), Some(Value::Float(1000.0)));
        assert_eq!(float("-1.5E-1", &options), Some(Value::Float(-0.15)));
        assert_eq!(float(".5", &options), Some(Value::Float(0.5)));

        assert_eq!(float("", &options), None);
        assert_eq!(float("1,000.5", &options), None);
        assert_eq!(float("1e", &options), None);
        assert_eq!(float("abc", &options), None);
        assert_eq!(float("inf", &options), None);
    }

    #[test]
    fn test_float_separators() {
        let thousands = FilterOptions::from(FilterFlags::ALLOW_THOUSAND);
        assert_eq!(float("1,000.5", &thousands), Some(Value::Float(1000.5)));
        assert_eq!(float("1'000", &thousands), Some(Value::Float(1000.0)));
        assert_eq!(float("1,", &thousands), None);

        let comma = FilterOptions::new().decimal(',');
        assert_eq!(float("3,25", &comma), Some(Value::Float(3.25)));
        assert_eq!(float("3.25", &comma), None);

        let both = FilterOptions::from(FilterFlags::ALLOW_THOUSAND).decimal(',');
        assert_eq!(float("1.234,5", &both), Some(Value::Float(1234.5)));
    }

    #[test]
    fn test_float_range() {
        let options = FilterOptions::new().min_range(0.0).max_range(1.0);
        assert_eq!(float("0.5", &options), Some(Value::Float(0.5)));
        assert_eq!(float("1.5", &options), None);
    }

    #[test]
    fn test_bool_tokens() {
        for token in ["true", "1", "on", "yes", "TRUE", " On "] {
            assert_eq!(boolean(token), Some(Value::Bool(true)), "{token}");
        }
        for token in ["false", "0", "off", "no", "", "Off"] {
            assert_eq!(boolean(token), Some(Value::Bool(false)), "{token}");
        }
        assert_eq!(boolean("maybe"), None);
        assert_eq!(boolean(true), Some(Value::Bool(true)));
        assert_eq!(boolean(0_i64), Some(Value::Bool(false)));
        assert_eq!(boolean(2_i64), None);
    }

    #[test]
    fn test_default_stringifies() {
        let spec = FilterSpec::Kind(FilterKind::Default);
        let options = FilterOptions::new();
        assert_eq!(
            filter_value(&Value::from("bar"), &spec, &options),
            Some(Value::from("bar"))
        );
        assert_eq!(
            filter_value(&Value::Int(42), &spec, &options),
            Some(Value::from("42"))
        );
        assert_eq!(
            filter_value(&Value::Float(1.5), &spec, &options),
            Some(Value::from("1.5"))
        );
        assert_eq!(
            filter_value(&Value::Bool(true), &spec, &options),
            Some(Value::from("1"))
        );
        assert_eq!(
            filter_value(&Value::Bool(false), &spec, &options),
            Some(Value::from(""))
        );
    }

    #[test]
    fn test_array_requires_flags() {
        let list = Value::List(vec![Value::from("1"), Value::from("x")]);
        let spec = FilterSpec::Kind(FilterKind::Int);

        assert_eq!(filter_value(&list, &spec, &FilterOptions::new()), None);

        let forced = FilterOptions::from(FilterFlags::FORCE_ARRAY);
        assert_eq!(
            filter_value(&list, &spec, &forced),
            Some(Value::List(vec![Value::Int(1), Value::Null]))
        );

        let scalar_only = FilterOptions::from(FilterFlags::FORCE_ARRAY | FilterFlags::REQUIRE_SCALAR);
        assert_eq!(filter_value(&list, &spec, &scalar_only), None);
    }

    #[test]
    fn test_scalar_with_array_flags() {
        let spec = FilterSpec::Kind(FilterKind::Default);
        let value = Value::from("x");

        let forced = FilterOptions::from(FilterFlags::FORCE_ARRAY);
        assert_eq!(
            filter_value(&value, &spec, &forced),
            Some(Value::List(vec![Value::from("x")]))
        );

        let required = FilterOptions::from(FilterFlags::REQUIRE_ARRAY | FilterFlags::FORCE_ARRAY);
        assert_eq!(filter_value(&value, &spec, &required), None);
    }

    #[test]
    fn test_nested_arrays() {
        let mut inner = ValueMap::new();
        inner.insert("a".into(), Value::from("2"));
        let value = Value::List(vec![Value::from("1"), Value::Map(inner)]);

        let options = FilterOptions::from(FilterFlags::REQUIRE_ARRAY);
        let filtered = filter_value(&value, &FilterSpec::Kind(FilterKind::Int), &options).unwrap();

        let items = filtered.as_list().unwrap();
        assert_eq!(items[0], Value::Int(1));
        assert_eq!(items[1].as_map().unwrap()["a"], Value::Int(2));
    }

    #[test]
    fn test_structural() {
        let mut fields = FilterMap::new();
        fields.insert("id".into(), FieldFilter::new(FilterKind::Int));
        fields.insert(
            "ratio".into(),
            FieldFilter::new(FilterKind::Float).options(FilterOptions::new().max_range(1.0)),
        );
        fields.insert("active".into(), FilterKind::Bool.into());
        let spec = FilterSpec::Structural(fields);

        let mut input = ValueMap::new();
        input.insert("ratio".into(), Value::from("2.5"));
        input.insert("id".into(), Value::from("7"));
        input.insert("extra".into(), Value::from("dropped"));

        let filtered = filter_value(&Value::Map(input.clone()), &spec, &FilterOptions::new()).unwrap();
        let map = filtered.as_map().unwrap();
        let keys: Vec<_> = map.keys().map(String::as_str).collect();
        assert_eq!(keys, ["id", "ratio", "active"]);
        assert_eq!(map["id"], Value::Int(7));
        assert_eq!(map["ratio"], Value::Null);
        assert_eq!(map["active"], Value::Null);

        let without_empty = FilterOptions::new().add_empty(false);
        let filtered = filter_value(&Value::Map(input), &spec, &without_empty).unwrap();
        assert!(!filtered.as_map().unwrap().contains_key("active"));
    }

    #[test]
    fn test_structural_rejects_non_map() {
        let spec = FilterSpec::Structural(FilterMap::new());
        assert_eq!(
            filter_value(&Value::from("x"), &spec, &FilterOptions::new()),
            None
        );
        assert_eq!(
            filter_value(&Value::List(vec![]), &spec, &FilterOptions::new()),
            None
        );
    }

    #[test]
    fn test_objects_pass_through() {
        let id = Value::Uuid(uuid::Uuid::nil());
        assert_eq!(
            filter_value(&id, &FilterSpec::Kind(FilterKind::Int), &FilterOptions::new()),
            Some(id)
        );
    }

    proptest! {
        #[test]
        fn test_int_string_round_trip(n in any::<i64>()) {
            prop_assert_eq!(int(n.to_string(), &FilterOptions::new()), Some(Value::Int(n)));
        }

        #[test]
        fn test_leading_zero_rejected(n in 1_i64..1_000_000) {
            prop_assert_eq!(int(format!("0{n}"), &FilterOptions::new()), None);
        }

        #[test]
        fn test_hex_matches_format(n in 0_i64..i64::MAX) {
            let options = FilterOptions::from(FilterFlags::ALLOW_HEX);
            prop_assert_eq!(int(format!("0x{n:x}"), &options), Some(Value::Int(n)));
        }

        #[test]
        fn test_float_display_round_trip(x in any::<f64>().prop_filter("finite", |x| x.is_finite())) {
            prop_assert_eq!(float(x.to_string(), &FilterOptions::new()), Some(Value::Float(x)));
        }

        #[test]
        fn test_bool_tokens_ignore_case(
            token in prop::sample::select(vec!["true", "on", "yes", "1"]),
            upper in any::<bool>(),
        ) {
            let token = if upper { token.to_uppercase() } else { token.to_string() };
            prop_assert_eq!(boolean(token), Some(Value::Bool(true)));
        }

        #[test]
        fn test_bool_rejects_other_words(word in "[a-z]{2,8}") {
            prop_assume!(!matches!(word.as_str(), "true" | "on" | "yes" | "false" | "off" | "no"));
            prop_assert_eq!(boolean(word), None);
        }

        #[test]
        fn test_default_keeps_strings(s in ".*") {
            let spec = FilterSpec::Kind(FilterKind::Default);
            prop_assert_eq!(
                filter_value(&Value::from(s.clone()), &spec, &FilterOptions::new()),
                Some(Value::String(s))
            );
        }
    }
}
