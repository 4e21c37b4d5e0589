use tessera_core::{DeclaredType, ResolveError, ResolveResult, UidKind, Value};
use uuid::Uuid;

use crate::{ArgumentMetadata, ExtractionContext, ParameterBag, ValueProducer};

/// Parses UUID parameters.
///
/// Only string values are converted. A string that is not a UUID, or a UUID
/// of another version than the declared one, is reported as not found.
#[derive(Debug, Clone, Copy, Default)]
pub struct UidProducer;

impl ValueProducer for UidProducer {
    fn name(&self) -> &'static str {
        "uid"
    }

    fn supports(&self, argument: &ArgumentMetadata) -> bool {
        matches!(argument.declared_type(), Some(DeclaredType::Uid(_)))
    }

    fn produce(
        &self,
        _ctx: &ExtractionContext,
        argument: &ArgumentMetadata,
        bag: &ParameterBag,
    ) -> ResolveResult<Vec<Value>> {
        let Some(Value::String(raw)) = bag.get(argument.name()) else {
            return Ok(Vec::new());
        };

        let invalid = || {
            ResolveError::not_found(
                argument.name(),
                format!("The uid for the \"{}\" parameter is invalid.", argument.name()),
            )
        };

        let uid = Uuid::parse_str(raw).map_err(|_| invalid())?;
        if let Some(DeclaredType::Uid(UidKind::Version(version))) = argument.declared_type() {
            if uid.get_version() != Some(*version) {
                return Err(invalid());
            }
        }

        Ok(vec![Value::Uuid(uid)])
    }
}
