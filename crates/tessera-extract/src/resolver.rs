//! Value resolvers and the bag resolution algorithm.
//!
//! A [`ValueResolver`] turns one handler parameter into zero or more values.
//! [`BagResolver`] is the resolver used for everything read from request
//! bags: it picks the value through the parameter's [`SourceDescriptor`]s,
//! filters it, and hands each surviving element to a [`ValueProducer`] that
//! converts it to the declared type.

use std::borrow::Cow;
use std::fmt;

use tessera_config::{DescriptorPolicy, ResolverConfig};
use tessera_core::{BagId, DeclaredType, ResolveError, ResolveResult, Value};
use tracing::debug;

use crate::descriptor::{
    DescriptorDefaults, FilterFlags, FilterKind, FilterOptions, FilterSpec, SourceDescriptor,
};
use crate::filter::filter_value;
use crate::{ArgumentMetadata, ExtractionContext, ParameterBag};

/// Resolves a handler parameter to its values.
///
/// An empty result means "not resolved here"; the next resolver gets a turn.
/// Variadic parameters may resolve to several values.
pub trait ValueResolver: Send + Sync + fmt::Debug {
    /// Resolves `argument` against the request.
    ///
    /// # Errors
    ///
    /// Returns a [`ResolveError`] if the value is present but invalid, or the
    /// parameter's configuration cannot be evaluated.
    fn resolve(
        &self,
        ctx: &ExtractionContext,
        argument: &ArgumentMetadata,
    ) -> ResolveResult<Vec<Value>>;
}

/// Converts one filtered element to a domain value.
///
/// `bag` holds the element under the parameter name, next to the other
/// entries of the source bag for attributes, query and body. When nothing was
/// found the parameter name is absent from `bag`.
///
/// Implementations return at most one value.
///
/// # Example
///
/// ```
/// use tessera_core::{ResolveResult, Value};
/// use tessera_extract::{ArgumentMetadata, ExtractionContext, ParameterBag, ValueProducer};
///
/// /// Resolves to every sibling value of the bag.
/// #[derive(Debug)]
/// struct AllParameters;
///
/// impl ValueProducer for AllParameters {
///     fn name(&self) -> &'static str {
///         "all_parameters"
///     }
///
///     fn produce(
///         &self,
///         _ctx: &ExtractionContext,
///         _argument: &ArgumentMetadata,
///         bag: &ParameterBag,
///     ) -> ResolveResult<Vec<Value>> {
///         Ok(vec![Value::Map(bag.all().clone())])
///     }
/// }
/// ```
pub trait ValueProducer: Send + Sync + fmt::Debug {
    /// Short name used in logs and contract errors.
    fn name(&self) -> &'static str;

    /// Whether this producer handles `argument`.
    fn supports(&self, _argument: &ArgumentMetadata) -> bool {
        true
    }

    /// Produces the value for one element.
    ///
    /// # Errors
    ///
    /// Returns a [`ResolveError`] if the element cannot be converted.
    fn produce(
        &self,
        ctx: &ExtractionContext,
        argument: &ArgumentMetadata,
        bag: &ParameterBag,
    ) -> ResolveResult<Vec<Value>>;
}

/// Runs bag resolution for a [`ValueProducer`].
///
/// Descriptors are evaluated in declaration order. Under
/// [`DescriptorPolicy::Chain`] a descriptor whose bag lacks the value, or whose
/// value is dropped by filtering, passes on to the next one; the first
/// descriptor with a surviving element wins. Under
/// [`DescriptorPolicy::Single`] a parameter may carry only one descriptor.
///
/// A parameter without descriptors reads from route attributes.
#[derive(Debug, Clone)]
pub struct BagResolver<P> {
    producer: P,
    policy: DescriptorPolicy,
    defaults: DescriptorDefaults,
}

impl<P: ValueProducer> BagResolver<P> {
    /// Creates a resolver with the default policy and descriptor defaults.
    #[must_use]
    pub fn new(producer: P) -> Self {
        Self {
            producer,
            policy: DescriptorPolicy::default(),
            defaults: DescriptorDefaults::default(),
        }
    }

    /// Creates a resolver configured from `config`.
    #[must_use]
    pub fn with_config(producer: P, config: &ResolverConfig) -> Self {
        Self {
            producer,
            policy: config.policy,
            defaults: DescriptorDefaults::from(config),
        }
    }

    /// Sets the descriptor policy.
    #[must_use]
    pub fn policy(mut self, policy: DescriptorPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Returns the wrapped producer.
    #[must_use]
    pub fn producer(&self) -> &P {
        &self.producer
    }

    fn filter_elements(
        &self,
        argument: &ArgumentMetadata,
        descriptor: &SourceDescriptor,
        lookup: &str,
        raw: Vec<Value>,
    ) -> ResolveResult<Vec<Value>> {
        let declared = argument.declared_type();
        let filter = match descriptor.filter() {
            Some(spec) => Cow::Borrowed(spec),
            None => match FilterKind::for_declared_type(declared) {
                Some(kind) => Cow::Owned(FilterSpec::Kind(kind)),
                None => return Ok(raw),
            },
        };

        let options = effective_options(descriptor, &self.defaults, &filter, declared);
        let null_on_failure = options.flags.contains(FilterFlags::NULL_ON_FAILURE);
        let empty_is_null = options.flags.contains(FilterFlags::EMPTY_STRING_NULL)
            && filter.kind().is_some_and(FilterKind::is_numeric);

        let mut survivors = Vec::with_capacity(raw.len());
        let mut failed = 0_usize;

        for value in raw {
            if value.is_object() {
                survivors.push(value);
                continue;
            }
            if value.is_null() || (empty_is_null && value.as_str() == Some("")) {
                continue;
            }

            match filter_value(&value, &filter, &options) {
                Some(filtered) if !(filtered.is_null() && null_on_failure) => {
                    survivors.push(filtered);
                }
                _ => {
                    failed += 1;
                    debug!(
                        parameter = argument.name(),
                        bag = %descriptor.bag_id(),
                        name = lookup,
                        value_type = value.type_name(),
                        "value failed filtering"
                    );
                }
            }
        }

        if failed > 0 && descriptor.throws_on_failure(&self.defaults) {
            return Err(ResolveError::bad_request(
                argument.name(),
                lookup,
                descriptor.bag_id(),
            ));
        }

        Ok(survivors)
    }

    fn produce_each(
        &self,
        ctx: &ExtractionContext,
        argument: &ArgumentMetadata,
        bag_id: BagId,
        values: Vec<Value>,
    ) -> ResolveResult<Vec<Value>> {
        let base = base_bag(ctx, bag_id);
        let mut resolved = Vec::with_capacity(values.len());

        for value in values {
            let mut bag = base.clone();
            bag.set(argument.name(), value);
            resolved.extend(self.produce_one(ctx, argument, &bag)?);
        }

        Ok(resolved)
    }

    fn produce_one(
        &self,
        ctx: &ExtractionContext,
        argument: &ArgumentMetadata,
        bag: &ParameterBag,
    ) -> ResolveResult<Option<Value>> {
        let mut produced = self.producer.produce(ctx, argument, bag)?;
        match produced.len() {
            0 | 1 => Ok(produced.pop()),
            n => Err(ResolveError::contract_violation(
                argument.name(),
                self.producer.name(),
                n,
            )),
        }
    }
}

impl<P: ValueProducer> ValueResolver for BagResolver<P> {
    fn resolve(
        &self,
        ctx: &ExtractionContext,
        argument: &ArgumentMetadata,
    ) -> ResolveResult<Vec<Value>> {
        if !self.producer.supports(argument) {
            return Ok(Vec::new());
        }

        let implicit;
        let descriptors = if argument.descriptors().is_empty() {
            implicit = [SourceDescriptor::from_route()];
            &implicit[..]
        } else {
            argument.descriptors()
        };

        if self.policy == DescriptorPolicy::Single && descriptors.len() > 1 {
            return Err(ResolveError::configuration(
                argument.name(),
                format!(
                    "multiple source descriptors are not allowed on a single argument, found {}",
                    descriptors.len()
                ),
            ));
        }

        for descriptor in descriptors {
            let bag = ctx.bag(descriptor.bag_id());
            let lookup = descriptor.lookup_name(argument.name());

            let survivors = if descriptor.is_wildcard() {
                vec![Value::Map(bag.all().clone())]
            } else {
                let Some(raw) = bag.get(lookup) else {
                    debug!(
                        parameter = argument.name(),
                        bag = %descriptor.bag_id(),
                        name = lookup,
                        "value not present"
                    );
                    continue;
                };
                let elements = match raw {
                    Value::List(items) if argument.is_variadic() => items.clone(),
                    other => vec![other.clone()],
                };
                self.filter_elements(argument, descriptor, lookup, elements)?
            };

            if survivors.is_empty() {
                continue;
            }

            debug!(
                parameter = argument.name(),
                bag = %descriptor.bag_id(),
                name = lookup,
                producer = self.producer.name(),
                elements = survivors.len(),
                "resolving from bag"
            );
            return self.produce_each(ctx, argument, descriptor.bag_id(), survivors);
        }

        let mut bag = base_bag(ctx, descriptors[0].bag_id());
        bag.remove(argument.name());
        Ok(self.produce_one(ctx, argument, &bag)?.into_iter().collect())
    }
}

fn base_bag(ctx: &ExtractionContext, bag_id: BagId) -> ParameterBag {
    if bag_id.is_snapshot() {
        ctx.bag(bag_id).clone()
    } else {
        ParameterBag::new()
    }
}

fn effective_options(
    descriptor: &SourceDescriptor,
    defaults: &DescriptorDefaults,
    filter: &FilterSpec,
    declared: Option<&DeclaredType>,
) -> FilterOptions {
    let mut options = descriptor.effective_options(defaults);
    if filter.kind() == Some(FilterKind::Bool) || matches!(declared, Some(DeclaredType::Bool)) {
        options.flags |= FilterFlags::NULL_ON_FAILURE;
    }
    if matches!(declared, Some(DeclaredType::Array)) {
        options.flags |= FilterFlags::REQUIRE_ARRAY | FilterFlags::FORCE_ARRAY;
    }
    options
}
