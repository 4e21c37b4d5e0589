//! Handler parameter metadata.

use tessera_core::{DeclaredType, Value};

use crate::descriptor::SourceDescriptor;

/// Strict parse format for date-time parameters, in chrono `strftime` syntax.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateTimeFormat(pub String);

impl DateTimeFormat {
    /// Creates a format.
    #[must_use]
    pub fn new(format: impl Into<String>) -> Self {
        Self(format.into())
    }

    /// Returns the format string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Everything resolution needs to know about one handler parameter.
///
/// # Example
///
/// ```
/// use tessera_core::DeclaredType;
/// use tessera_extract::{ArgumentMetadata, SourceDescriptor};
///
/// let page = ArgumentMetadata::builder("page")
///     .declared_type(DeclaredType::Int)
///     .nullable(true)
///     .descriptor(SourceDescriptor::from_query())
///     .build();
///
/// assert_eq!(page.name(), "page");
/// assert!(page.is_nullable());
/// assert_eq!(page.descriptors().len(), 1);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ArgumentMetadata {
    name: String,
    declared_type: Option<DeclaredType>,
    variadic: bool,
    nullable: bool,
    default: Option<Value>,
    descriptors: Vec<SourceDescriptor>,
    datetime_format: Option<DateTimeFormat>,
}

impl ArgumentMetadata {
    /// Creates a builder for a parameter called `name`.
    #[must_use]
    pub fn builder(name: impl Into<String>) -> ArgumentMetadataBuilder {
        ArgumentMetadataBuilder::new(name)
    }

    /// Returns the parameter name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the declared type.
    #[must_use]
    pub fn declared_type(&self) -> Option<&DeclaredType> {
        self.declared_type.as_ref()
    }

    /// Whether the parameter collects any number of values.
    #[must_use]
    pub fn is_variadic(&self) -> bool {
        self.variadic
    }

    /// Whether the parameter accepts null.
    #[must_use]
    pub fn is_nullable(&self) -> bool {
        self.nullable
    }

    /// Returns the default value.
    #[must_use]
    pub fn default_value(&self) -> Option<&Value> {
        self.default.as_ref()
    }

    /// Returns the attached source descriptors in declaration order.
    #[must_use]
    pub fn descriptors(&self) -> &[SourceDescriptor] {
        &self.descriptors
    }

    /// Returns the date-time format.
    #[must_use]
    pub fn datetime_format(&self) -> Option<&DateTimeFormat> {
        self.datetime_format.as_ref()
    }
}

/// Builder for [`ArgumentMetadata`].
#[derive(Debug, Clone)]
pub struct ArgumentMetadataBuilder {
    inner: ArgumentMetadata,
}

impl ArgumentMetadataBuilder {
    fn new(name: impl Into<String>) -> Self {
        Self {
            inner: ArgumentMetadata {
                name: name.into(),
                declared_type: None,
                variadic: false,
                nullable: false,
                default: None,
                descriptors: Vec::new(),
                datetime_format: None,
            },
        }
    }

    /// Sets the declared type.
    #[must_use]
    pub fn declared_type(mut self, declared_type: DeclaredType) -> Self {
        self.inner.declared_type = Some(declared_type);
        self
    }

    /// Marks the parameter variadic.
    #[must_use]
    pub fn variadic(mut self, variadic: bool) -> Self {
        self.inner.variadic = variadic;
        self
    }

    /// Marks the parameter nullable.
    #[must_use]
    pub fn nullable(mut self, nullable: bool) -> Self {
        self.inner.nullable = nullable;
        self
    }

    /// Sets the default value.
    #[must_use]
    pub fn default_value(mut self, value: impl Into<Value>) -> Self {
        self.inner.default = Some(value.into());
        self
    }

    /// Appends a source descriptor.
    #[must_use]
    pub fn descriptor(mut self, descriptor: SourceDescriptor) -> Self {
        self.inner.descriptors.push(descriptor);
        self
    }

    /// Sets the date-time format.
    #[must_use]
    pub fn datetime_format(mut self, format: impl Into<String>) -> Self {
        self.inner.datetime_format = Some(DateTimeFormat::new(format));
        self
    }

    /// Builds the metadata.
    #[must_use]
    pub fn build(self) -> ArgumentMetadata {
        self.inner
    }
}
