//! Resolution of a handler's full argument list.

use std::sync::Arc;

use tessera_config::ResolverConfig;
use tessera_core::{ResolveError, ResolveResult, Value};
use tracing::{debug, warn};

use crate::clock::Clock;
use crate::producers::{
    BackedEnumProducer, DateTimeProducer, RequestAttributeProducer, UidProducer,
};
use crate::{ArgumentMetadata, BagResolver, ExtractionContext, ValueResolver};

/// Resolves handler arguments by asking each [`ValueResolver`] in turn.
///
/// The first resolver returning a non-empty result wins. When none does, the
/// parameter's default value is used, then an empty list for variadic
/// parameters, then null for nullable ones; anything else is a
/// [`ResolveError::MissingArgument`].
///
/// # Example
///
/// ```
/// use tessera_core::{DeclaredType, Value};
/// use tessera_extract::{ArgumentMetadata, ArgumentResolver, ExtractionContext, SourceDescriptor};
///
/// let resolver = ArgumentResolver::default();
/// let ctx = ExtractionContext::builder()
///     .query_param("page", "3")
///     .build()
///     .unwrap();
/// let page = ArgumentMetadata::builder("page")
///     .declared_type(DeclaredType::Int)
///     .descriptor(SourceDescriptor::from_query())
///     .build();
///
/// assert_eq!(resolver.resolve_argument(&ctx, &page).unwrap(), vec![Value::Int(3)]);
/// ```
#[derive(Debug, Clone)]
pub struct ArgumentResolver {
    resolvers: Vec<Arc<dyn ValueResolver>>,
}

impl Default for ArgumentResolver {
    fn default() -> Self {
        Self::from_config(&ResolverConfig::default())
    }
}

impl ArgumentResolver {
    /// Creates a resolver with exactly `resolvers`, in order.
    #[must_use]
    pub fn new(resolvers: Vec<Arc<dyn ValueResolver>>) -> Self {
        Self { resolvers }
    }

    /// Creates the default resolver chain: backed enums, date-times, UUIDs,
    /// then plain bag values.
    #[must_use]
    pub fn from_config(config: &ResolverConfig) -> Self {
        Self::new(default_resolvers(config, DateTimeProducer::new()))
    }

    /// Like [`from_config`](Self::from_config), with date-times reading the
    /// current instant from `clock`.
    #[must_use]
    pub fn with_clock(config: &ResolverConfig, clock: Arc<dyn Clock>) -> Self {
        Self::new(default_resolvers(config, DateTimeProducer::with_clock(clock)))
    }

    /// Inserts `resolver` ahead of the existing ones.
    #[must_use]
    pub fn prepend(mut self, resolver: Arc<dyn ValueResolver>) -> Self {
        self.resolvers.insert(0, resolver);
        self
    }

    /// Returns the resolvers in evaluation order.
    #[must_use]
    pub fn resolvers(&self) -> &[Arc<dyn ValueResolver>] {
        &self.resolvers
    }

    /// Resolves one argument.
    ///
    /// # Errors
    ///
    /// Returns the first resolver error, or
    /// [`ResolveError::MissingArgument`] if nothing resolves a required
    /// argument.
    pub fn resolve_argument(
        &self,
        ctx: &ExtractionContext,
        argument: &ArgumentMetadata,
    ) -> ResolveResult<Vec<Value>> {
        for resolver in &self.resolvers {
            let values = resolver.resolve(ctx, argument)?;
            if !values.is_empty() {
                debug!(
                    parameter = argument.name(),
                    count = values.len(),
                    "argument resolved"
                );
                return Ok(values);
            }
        }

        if let Some(default) = argument.default_value() {
            return Ok(vec![default.clone()]);
        }
        if argument.is_variadic() {
            return Ok(Vec::new());
        }
        if argument.is_nullable() {
            return Ok(vec![Value::Null]);
        }

        warn!(parameter = argument.name(), "required argument could not be resolved");
        Err(ResolveError::missing_argument(argument.name()))
    }

    /// Resolves a handler's arguments in order, flattening variadic ones.
    ///
    /// # Errors
    ///
    /// Returns the first error raised for any argument.
    pub fn resolve_arguments(
        &self,
        ctx: &ExtractionContext,
        arguments: &[ArgumentMetadata],
    ) -> ResolveResult<Vec<Value>> {
        let mut values = Vec::with_capacity(arguments.len());
        for argument in arguments {
            values.extend(self.resolve_argument(ctx, argument)?);
        }
        Ok(values)
    }
}

fn default_resolvers(
    config: &ResolverConfig,
    datetime: DateTimeProducer,
) -> Vec<Arc<dyn ValueResolver>> {
    vec![
        Arc::new(BagResolver::with_config(BackedEnumProducer, config)),
        Arc::new(BagResolver::with_config(datetime, config)),
        Arc::new(BagResolver::with_config(UidProducer, config)),
        Arc::new(BagResolver::with_config(RequestAttributeProducer, config)),
    ]
}
