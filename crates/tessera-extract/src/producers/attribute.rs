use tessera_core::{ResolveResult, Value};

use crate::{ArgumentMetadata, ExtractionContext, ParameterBag, ValueProducer};

/// Returns the bag value as is.
#[derive(Debug, Clone, Copy, Default)]
pub struct RequestAttributeProducer;

impl ValueProducer for RequestAttributeProducer {
    fn name(&self) -> &'static str {
        "request_attribute"
    }

    fn produce(
        &self,
        _ctx: &ExtractionContext,
        argument: &ArgumentMetadata,
        bag: &ParameterBag,
    ) -> ResolveResult<Vec<Value>> {
        Ok(bag.get(argument.name()).cloned().into_iter().collect())
    }
}
