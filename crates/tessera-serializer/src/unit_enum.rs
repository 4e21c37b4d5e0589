//! Enumeration case names.

use serde::{Deserialize, Serialize};
use tessera_core::{DeclaredType, EnumDescriptor, EnumValue, Value};
use tracing::debug;

use crate::error::{NormalizerError, NormalizerResult};

const NOT_AN_ENUM: &str = "The data must belong to an enumeration.";

/// Options controlling [`UnitEnumNormalizer`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NormalizerContext {
    /// Handle backed enumerations by case name instead of refusing them.
    pub backed_enum_prefer_names: bool,

    /// Denormalize unknown or mistyped input to `None` instead of failing.
    #[serde(alias = "allow_invalid_values")]
    pub allow_invalid_cases: bool,

    /// The value is a constructor argument; unknown cases then fail with
    /// [`NormalizerError::InvalidArgument`].
    pub has_constructor: bool,

    /// Location of the value in the document being denormalized.
    pub deserialization_path: Option<String>,
}

impl NormalizerContext {
    /// Creates an empty context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets [`backed_enum_prefer_names`](Self::backed_enum_prefer_names).
    #[must_use]
    pub fn backed_enum_prefer_names(mut self, enabled: bool) -> Self {
        self.backed_enum_prefer_names = enabled;
        self
    }

    /// Sets [`allow_invalid_cases`](Self::allow_invalid_cases).
    #[must_use]
    pub fn allow_invalid_cases(mut self, enabled: bool) -> Self {
        self.allow_invalid_cases = enabled;
        self
    }

    /// Sets [`has_constructor`](Self::has_constructor).
    #[must_use]
    pub fn has_constructor(mut self, enabled: bool) -> Self {
        self.has_constructor = enabled;
        self
    }

    /// Sets the deserialization path.
    #[must_use]
    pub fn deserialization_path(mut self, path: impl Into<String>) -> Self {
        self.deserialization_path = Some(path.into());
        self
    }
}

/// Converts enumeration cases to and from their case names.
///
/// Backed enumerations are normally left to a value based normalizer and are
/// only handled here when
/// [`backed_enum_prefer_names`](NormalizerContext::backed_enum_prefer_names)
/// is set.
///
/// # Example
///
/// ```
/// use tessera_core::{DeclaredType, EnumDescriptor, Value};
/// use tessera_serializer::{NormalizerContext, UnitEnumNormalizer};
/// use std::sync::Arc;
///
/// let method = Arc::new(EnumDescriptor::unit("Method", ["GET", "POST"]));
/// let normalizer = UnitEnumNormalizer;
/// let context = NormalizerContext::default();
///
/// let get = normalizer
///     .denormalize(&Value::from("GET"), &DeclaredType::Enum(method), &context)
///     .unwrap()
///     .unwrap();
/// assert_eq!(normalizer.normalize(&Value::Enum(get), &context).unwrap(), "GET");
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct UnitEnumNormalizer;

impl UnitEnumNormalizer {
    /// Returns the case name of an enumeration value.
    ///
    /// # Errors
    ///
    /// Returns [`NormalizerError::InvalidArgument`] if `data` is not an
    /// enumeration case, or is a backed case and the context does not prefer
    /// names.
    pub fn normalize(&self, data: &Value, context: &NormalizerContext) -> NormalizerResult<String> {
        let Value::Enum(case) = data else {
            return Err(NormalizerError::invalid_argument(NOT_AN_ENUM));
        };

        if case.is_backed() && !context.backed_enum_prefer_names {
            return Err(backed_enum_refused());
        }

        Ok(case.case_name().to_string())
    }

    /// Whether [`normalize`](Self::normalize) accepts `data`.
    #[must_use]
    pub fn supports_normalization(&self, data: &Value, context: &NormalizerContext) -> bool {
        match data {
            Value::Enum(case) => !case.is_backed() || context.backed_enum_prefer_names,
            _ => false,
        }
    }

    /// Looks up the case of `target` named by `data`.
    ///
    /// Returns `Ok(None)` when the input names no case and the context allows
    /// invalid cases.
    ///
    /// # Errors
    ///
    /// Returns [`NormalizerError::InvalidArgument`] if `target` is not an
    /// enumeration or is refused as backed, and
    /// [`NormalizerError::NotNormalizable`] if `data` is not a string or names
    /// no case.
    pub fn denormalize(
        &self,
        data: &Value,
        target: &DeclaredType,
        context: &NormalizerContext,
    ) -> NormalizerResult<Option<EnumValue>> {
        let DeclaredType::Enum(descriptor) = target else {
            return Err(NormalizerError::invalid_argument(NOT_AN_ENUM));
        };

        if descriptor.is_backed() && !context.backed_enum_prefer_names {
            return Err(backed_enum_refused());
        }

        let name = match data {
            Value::String(name) => Some(name.as_str()),
            _ if context.allow_invalid_cases => None,
            _ => {
                return Err(NormalizerError::unexpected_data(
                    format!(
                        "The data is not a string, you should pass a string that can be parsed as an enumeration case of type {}.",
                        descriptor.name()
                    ),
                    data.type_name(),
                    vec!["string".to_string()],
                    context.deserialization_path.clone(),
                ));
            }
        };

        if let Some(case) = name.and_then(|name| descriptor.case(name)) {
            return Ok(Some(case));
        }

        debug!(
            enumeration = descriptor.name(),
            data = data.type_name(),
            "no enumeration case matches"
        );
        invalid_case(data, descriptor, context)
    }

    /// Whether [`denormalize`](Self::denormalize) accepts `target`.
    #[must_use]
    pub fn supports_denormalization(&self, target: &DeclaredType, context: &NormalizerContext) -> bool {
        match target {
            DeclaredType::Enum(descriptor) => {
                !descriptor.is_backed() || context.backed_enum_prefer_names
            }
            _ => false,
        }
    }
}

fn backed_enum_refused() -> NormalizerError {
    NormalizerError::invalid_argument(
        "The data must belong to a non-backed enumeration, or pass \"backed_enum_prefer_names\" context attribute to normalize BackedEnums to names instead of values.",
    )
}

fn invalid_case(
    data: &Value,
    descriptor: &EnumDescriptor,
    context: &NormalizerContext,
) -> NormalizerResult<Option<EnumValue>> {
    if context.allow_invalid_cases {
        return Ok(None);
    }

    let message = format!(
        "The data must belong to an enumeration of type {}.",
        descriptor.name()
    );
    if context.has_constructor {
        return Err(NormalizerError::InvalidArgument(message));
    }

    Err(NormalizerError::unexpected_data(
        message,
        data.type_name(),
        vec![descriptor.name().to_string()],
        context.deserialization_path.clone(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use tessera_core::Backing;

    fn unit_enum() -> Arc<EnumDescriptor> {
        Arc::new(EnumDescriptor::unit("UnitEnumDummy", ["GET"]))
    }

    fn string_backed() -> Arc<EnumDescriptor> {
        Arc::new(EnumDescriptor::backed_str("StringBackedEnumDummy", [("GET", "GET")]))
    }

    fn int_backed() -> Arc<EnumDescriptor> {
        Arc::new(EnumDescriptor::backed_int("IntegerBackedEnumDummy", [("SUCCESS", 200)]))
    }

    fn case(descriptor: &EnumDescriptor, name: &str) -> Value {
        Value::Enum(descriptor.case(name).unwrap())
    }

    fn prefer_names() -> NormalizerContext {
        NormalizerContext::new().backed_enum_prefer_names(true)
    }

    #[test]
    fn test_supports_normalization() {
        let ctx = NormalizerContext::default();
        let normalizer = UnitEnumNormalizer;

        assert!(!normalizer.supports_normalization(&case(&string_backed(), "GET"), &ctx));
        assert!(!normalizer.supports_normalization(&case(&int_backed(), "SUCCESS"), &ctx));
        assert!(normalizer.supports_normalization(&case(&unit_enum(), "GET"), &ctx));
        assert!(!normalizer.supports_normalization(&Value::Map(Default::default()), &ctx));
        assert!(!normalizer.supports_normalization(&Value::from("GET"), &ctx));
    }

    #[test]
    fn test_normalize() {
        let name = UnitEnumNormalizer
            .normalize(&case(&unit_enum(), "GET"), &NormalizerContext::default())
            .unwrap();
        assert_eq!(name, "GET");
    }

    #[test]
    fn test_normalize_rejects_non_enum() {
        for data in [Value::Map(Default::default()), Value::from("UnitEnumDummy")] {
            let err = UnitEnumNormalizer
                .normalize(&data, &NormalizerContext::default())
                .unwrap_err();
            assert_eq!(err, NormalizerError::invalid_argument(NOT_AN_ENUM));
        }
    }

    #[test]
    fn test_normalize_rejects_backed_enum() {
        let err = UnitEnumNormalizer
            .normalize(&case(&string_backed(), "GET"), &NormalizerContext::default())
            .unwrap_err();
        assert!(matches!(err, NormalizerError::InvalidArgument(_)));
        assert!(err
            .to_string()
            .starts_with("The data must belong to a non-backed enumeration, or pass"));
    }

    #[test]
    fn test_normalize_backed_enum_by_name() {
        let normalizer = UnitEnumNormalizer;
        assert_eq!(
            normalizer.normalize(&case(&int_backed(), "SUCCESS"), &prefer_names()).unwrap(),
            "SUCCESS"
        );
        assert_eq!(
            normalizer.normalize(&case(&string_backed(), "GET"), &prefer_names()).unwrap(),
            "GET"
        );
        assert!(normalizer.supports_normalization(&case(&int_backed(), "SUCCESS"), &prefer_names()));
    }

    #[test]
    fn test_supports_denormalization() {
        let ctx = NormalizerContext::default();
        let normalizer = UnitEnumNormalizer;

        assert!(!normalizer.supports_denormalization(&DeclaredType::Enum(string_backed()), &ctx));
        assert!(!normalizer.supports_denormalization(&DeclaredType::Enum(int_backed()), &ctx));
        assert!(normalizer.supports_denormalization(&DeclaredType::Enum(unit_enum()), &ctx));
        assert!(!normalizer.supports_denormalization(&DeclaredType::Named("stdClass".into()), &ctx));
        assert!(normalizer.supports_denormalization(&DeclaredType::Enum(int_backed()), &prefer_names()));
    }

    #[test]
    fn test_denormalize() {
        let value = UnitEnumNormalizer
            .denormalize(
                &Value::from("GET"),
                &DeclaredType::Enum(unit_enum()),
                &NormalizerContext::default(),
            )
            .unwrap()
            .unwrap();
        assert_eq!(value.enum_name(), "UnitEnumDummy");
        assert_eq!(value.case_name(), "GET");
    }

    #[test]
    fn test_denormalize_non_string_fails() {
        let target = DeclaredType::Enum(unit_enum());
        let ctx = NormalizerContext::new().deserialization_path("method");

        for data in [Value::Null, Value::Bool(true), Value::Map(Default::default())] {
            let err = UnitEnumNormalizer.denormalize(&data, &target, &ctx).unwrap_err();
            match err {
                NormalizerError::NotNormalizable {
                    ref current_type,
                    ref expected_types,
                    ref path,
                    use_message_for_user,
                    ..
                } => {
                    assert_eq!(current_type, data.type_name());
                    assert_eq!(expected_types, &["string"]);
                    assert_eq!(path.as_deref(), Some("method"));
                    assert!(use_message_for_user);
                }
                other => panic!("unexpected error: {other:?}"),
            }
        }
    }

    #[test]
    fn test_denormalize_unknown_case() {
        let err = UnitEnumNormalizer
            .denormalize(
                &Value::from("POST"),
                &DeclaredType::Enum(unit_enum()),
                &NormalizerContext::default(),
            )
            .unwrap_err();

        assert!(err
            .to_string()
            .starts_with("The data must belong to an enumeration of type UnitEnumDummy"));
        assert_eq!(err.expected_types(), ["UnitEnumDummy"]);
    }

    #[test]
    fn test_denormalize_unknown_case_in_constructor() {
        let err = UnitEnumNormalizer
            .denormalize(
                &Value::from("POST"),
                &DeclaredType::Enum(unit_enum()),
                &NormalizerContext::new().has_constructor(true),
            )
            .unwrap_err();
        assert!(matches!(err, NormalizerError::InvalidArgument(_)));
    }

    #[test]
    fn test_denormalize_rejects_non_enum_target() {
        let err = UnitEnumNormalizer
            .denormalize(
                &Value::from("GET"),
                &DeclaredType::Named("stdClass".into()),
                &NormalizerContext::default(),
            )
            .unwrap_err();
        assert_eq!(err, NormalizerError::invalid_argument(NOT_AN_ENUM));
    }

    #[test]
    fn test_denormalize_rejects_backed_target() {
        let err = UnitEnumNormalizer
            .denormalize(
                &Value::from("GET"),
                &DeclaredType::Enum(string_backed()),
                &NormalizerContext::default(),
            )
            .unwrap_err();
        assert!(err
            .to_string()
            .starts_with("The data must belong to a non-backed enumeration, or pass"));
    }

    #[test]
    fn test_invalid_cases_become_none() {
        let target = DeclaredType::Enum(unit_enum());
        let ctx = NormalizerContext::new().allow_invalid_cases(true);

        for data in [Value::Int(1), Value::from(""), Value::from("WRONG"), Value::Null] {
            let result = UnitEnumNormalizer.denormalize(&data, &target, &ctx).unwrap();
            assert!(result.is_none(), "{data:?}");
        }

        let get = UnitEnumNormalizer
            .denormalize(&Value::from("GET"), &target, &ctx)
            .unwrap();
        assert_eq!(get.map(|case| case.case_name().to_string()).as_deref(), Some("GET"));
    }

    #[test]
    fn test_denormalize_backed_enum_by_name() {
        let success = UnitEnumNormalizer
            .denormalize(
                &Value::from("SUCCESS"),
                &DeclaredType::Enum(int_backed()),
                &prefer_names(),
            )
            .unwrap()
            .unwrap();
        assert_eq!(success.backing(), Some(&Backing::Int(200)));

        let get = UnitEnumNormalizer
            .denormalize(
                &Value::from("GET"),
                &DeclaredType::Enum(string_backed()),
                &prefer_names(),
            )
            .unwrap()
            .unwrap();
        assert_eq!(get.backing(), Some(&Backing::String("GET".into())));
    }

    #[test]
    fn test_context_from_json() {
        let ctx: NormalizerContext = serde_json::from_str(
            r#"{"backed_enum_prefer_names": true, "allow_invalid_values": true}"#,
        )
        .unwrap();
        assert!(ctx.backed_enum_prefer_names);
        assert!(ctx.allow_invalid_cases);
        assert!(!ctx.has_constructor);
        assert_eq!(ctx.deserialization_path, None);
    }
}
