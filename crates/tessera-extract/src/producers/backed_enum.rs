use tessera_core::{Backing, DeclaredType, ResolveError, ResolveResult, Value};

use crate::{ArgumentMetadata, ExtractionContext, ParameterBag, ValueProducer};

/// Matches scalar values against the backing values of a backed enumeration.
///
/// Numeric strings match integer backings. A value that matches no case is
/// reported as not found.
#[derive(Debug, Clone, Copy, Default)]
pub struct BackedEnumProducer;

impl ValueProducer for BackedEnumProducer {
    fn name(&self) -> &'static str {
        "backed_enum"
    }

    fn supports(&self, argument: &ArgumentMetadata) -> bool {
        matches!(argument.declared_type(), Some(DeclaredType::Enum(descriptor)) if descriptor.is_backed())
    }

    fn produce(
        &self,
        _ctx: &ExtractionContext,
        argument: &ArgumentMetadata,
        bag: &ParameterBag,
    ) -> ResolveResult<Vec<Value>> {
        let Some(DeclaredType::Enum(descriptor)) = argument.declared_type() else {
            return Ok(Vec::new());
        };
        let int_backed = descriptor
            .cases()
            .first()
            .and_then(|case| case.backing())
            .is_some_and(|backing| matches!(backing, Backing::Int(_)));

        let backing = match bag.get(argument.name()) {
            Some(Value::Enum(case)) => return Ok(vec![Value::Enum(case.clone())]),
            Some(Value::Int(n)) => Backing::Int(*n),
            Some(Value::String(s)) if int_backed => match s.parse() {
                Ok(n) => Backing::Int(n),
                Err(_) => Backing::String(s.clone()),
            },
            Some(Value::String(s)) => Backing::String(s.clone()),
            _ => return Ok(Vec::new()),
        };

        descriptor
            .from_backing(&backing)
            .map(|case| vec![Value::Enum(case)])
            .ok_or_else(|| {
                ResolveError::not_found(
                    argument.name(),
                    format!(
                        "Could not resolve the \"{}\" argument: \"{}\" is not a valid backing value for enum \"{}\".",
                        argument.name(),
                        backing,
                        descriptor.name()
                    ),
                )
            })
    }
}
