//! Extraction context providing access to request data.
//!
//! The [`ExtractionContext`] holds the raw request parts together with the
//! five parameter bags that value resolvers read from.

use bytes::Bytes;
use http::{HeaderMap, Method, Uri};
use tessera_core::{BagId, UploadedFile, Value};

use crate::body::{parse_payload, PayloadKind, DEFAULT_MAX_PAYLOAD_SIZE};
use crate::multipart::{Multipart, MultipartConfig};
use crate::{header_bag, parse_query, ExtractionError, ParameterBag};

/// Request data split into bags.
///
/// # Example
///
/// ```rust
/// use http::Method;
/// use tessera_core::{BagId, Value};
/// use tessera_extract::ExtractionContext;
///
/// let ctx = ExtractionContext::builder()
///     .method(Method::GET)
///     .uri("/users/42?page=2".parse().unwrap())
///     .attribute("id", "42")
///     .build()
///     .unwrap();
///
/// assert_eq!(ctx.bag(BagId::Attributes).get("id"), Some(&Value::from("42")));
/// assert_eq!(ctx.bag(BagId::Query).get("page"), Some(&Value::from("2")));
/// ```
#[derive(Debug, Clone)]
pub struct ExtractionContext {
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
    attributes: ParameterBag,
    query: ParameterBag,
    payload: ParameterBag,
    header_bag: ParameterBag,
    files: ParameterBag,
}

impl ExtractionContext {
    /// Creates a context, decoding the query string, headers and body.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractionError`] if the query string or body is malformed.
    pub fn new(
        method: Method,
        uri: Uri,
        headers: HeaderMap,
        body: Bytes,
        attributes: ParameterBag,
    ) -> Result<Self, ExtractionError> {
        Self::builder()
            .method(method)
            .uri(uri)
            .headers(headers)
            .body(body)
            .attributes(attributes)
            .build()
    }

    /// Creates a builder.
    #[must_use]
    pub fn builder() -> ExtractionContextBuilder {
        ExtractionContextBuilder::new()
    }

    /// Returns the bag identified by `id`.
    #[must_use]
    pub fn bag(&self, id: BagId) -> &ParameterBag {
        match id {
            BagId::Attributes => &self.attributes,
            BagId::Query => &self.query,
            BagId::Body => &self.payload,
            BagId::Headers => &self.header_bag,
            BagId::Files => &self.files,
        }
    }

    /// Returns the bag identified by `id` for modification.
    pub fn bag_mut(&mut self, id: BagId) -> &mut ParameterBag {
        match id {
            BagId::Attributes => &mut self.attributes,
            BagId::Query => &mut self.query,
            BagId::Body => &mut self.payload,
            BagId::Headers => &mut self.header_bag,
            BagId::Files => &mut self.files,
        }
    }

    /// Returns the HTTP method.
    #[must_use]
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Returns the request URI.
    #[must_use]
    pub fn uri(&self) -> &Uri {
        &self.uri
    }

    /// Returns the path portion of the URI.
    #[must_use]
    pub fn path(&self) -> &str {
        self.uri.path()
    }

    /// Returns the query string if present.
    #[must_use]
    pub fn query_string(&self) -> Option<&str> {
        self.uri.query()
    }

    /// Returns the request headers.
    #[must_use]
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Returns a specific header value as a string.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Returns the Content-Type header value.
    #[must_use]
    pub fn content_type(&self) -> Option<&str> {
        self.header("content-type")
    }

    /// Returns the raw request body.
    #[must_use]
    pub fn body(&self) -> &Bytes {
        &self.body
    }

    /// Reads a `multipart/form-data` body: files go to the files bag, text
    /// parts to the body bag. Does nothing for other content types.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractionError`] if the multipart body is malformed or
    /// exceeds the configured limits.
    pub async fn load_multipart(&mut self, config: MultipartConfig) -> Result<(), ExtractionError> {
        if PayloadKind::from_content_type(self.content_type()) != PayloadKind::Multipart {
            return Ok(());
        }

        let multipart = Multipart::new(self.content_type(), self.body.clone(), config)?;
        let bags = multipart.load().await?;

        self.files.extend(bags.files);
        self.payload.extend(bags.fields);
        Ok(())
    }
}

/// Builder for constructing an [`ExtractionContext`].
///
/// Bags decoded from the URI and body are populated at [`build`](Self::build)
/// time; parameters added explicitly take precedence.
#[derive(Debug, Default)]
pub struct ExtractionContextBuilder {
    method: Option<Method>,
    uri: Option<Uri>,
    headers: HeaderMap,
    body: Bytes,
    max_payload_size: Option<usize>,
    attributes: ParameterBag,
    query: ParameterBag,
    payload: ParameterBag,
    files: ParameterBag,
}

impl ExtractionContextBuilder {
    /// Creates a new builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the HTTP method. Defaults to `GET`.
    #[must_use]
    pub fn method(mut self, method: Method) -> Self {
        self.method = Some(method);
        self
    }

    /// Sets the URI. Defaults to `/`.
    #[must_use]
    pub fn uri(mut self, uri: Uri) -> Self {
        self.uri = Some(uri);
        self
    }

    /// Sets the headers.
    #[must_use]
    pub fn headers(mut self, headers: HeaderMap) -> Self {
        self.headers = headers;
        self
    }

    /// Adds a single header.
    #[must_use]
    pub fn header(mut self, name: &'static str, value: &str) -> Self {
        if let Ok(value) = value.parse() {
            self.headers.append(name, value);
        }
        self
    }

    /// Sets the body.
    #[must_use]
    pub fn body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    /// Sets the maximum body size decoded into the body bag.
    #[must_use]
    pub fn max_payload_size(mut self, size: usize) -> Self {
        self.max_payload_size = Some(size);
        self
    }

    /// Sets the route attributes.
    #[must_use]
    pub fn attributes(mut self, attributes: ParameterBag) -> Self {
        self.attributes = attributes;
        self
    }

    /// Adds a single route attribute.
    #[must_use]
    pub fn attribute(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attributes.set(name, value);
        self
    }

    /// Adds a query parameter.
    #[must_use]
    pub fn query_param(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.query.set(name, value);
        self
    }

    /// Adds a body parameter.
    #[must_use]
    pub fn body_param(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.payload.set(name, value);
        self
    }

    /// Adds an uploaded file.
    #[must_use]
    pub fn file(mut self, name: impl Into<String>, file: UploadedFile) -> Self {
        self.files.set(name, file);
        self
    }

    /// Builds the extraction context.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractionError`] if the query string or body is malformed.
    pub fn build(self) -> Result<ExtractionContext, ExtractionError> {
        let uri = self.uri.unwrap_or_else(|| Uri::from_static("/"));

        let mut query = parse_query(uri.query().unwrap_or_default())?;
        query.extend(self.query);

        let content_type = self
            .headers
            .get(http::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok());
        let mut payload = parse_payload(
            content_type,
            &self.body,
            self.max_payload_size.unwrap_or(DEFAULT_MAX_PAYLOAD_SIZE),
        )?;
        payload.extend(self.payload);

        let header_bag = header_bag(&self.headers);

        Ok(ExtractionContext {
            method: self.method.unwrap_or(Method::GET),
            uri,
            headers: self.headers,
            body: self.body,
            attributes: self.attributes,
            query,
            payload,
            header_bag,
            files: self.files,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::multipart::tests::create_multipart_body;

    #[test]
    fn test_extraction_context_creation() {
        let attributes: ParameterBag = [("userId", "42")].into_iter().collect();

        let ctx = ExtractionContext::new(
            Method::GET,
            Uri::from_static("/users/42?active=true"),
            HeaderMap::new(),
            Bytes::new(),
            attributes,
        )
        .unwrap();

        assert_eq!(ctx.method(), &Method::GET);
        assert_eq!(ctx.path(), "/users/42");
        assert_eq!(ctx.query_string(), Some("active=true"));
        assert_eq!(ctx.bag(BagId::Attributes).get("userId"), Some(&Value::from("42")));
        assert_eq!(ctx.bag(BagId::Query).get("active"), Some(&Value::from("true")));
    }

    #[test]
    fn test_builder_decodes_json_body() {
        let ctx = ExtractionContext::builder()
            .method(Method::POST)
            .uri(Uri::from_static("/api/users"))
            .header("content-type", "application/json")
            .header("x-forwarded-for", "10.0.0.1")
            .body(r#"{"name": "Alice"}"#)
            .build()
            .unwrap();

        assert_eq!(ctx.content_type(), Some("application/json"));
        assert_eq!(ctx.bag(BagId::Body).get("name"), Some(&Value::from("Alice")));
        assert_eq!(
            ctx.bag(BagId::Headers).get("X_FORWARDED_FOR"),
            Some(&Value::from("10.0.0.1"))
        );
    }

    #[test]
    fn test_explicit_params_override_decoded() {
        let ctx = ExtractionContext::builder()
            .uri(Uri::from_static("/?page=1&sort=name"))
            .query_param("page", "3")
            .query_param("ids", vec![Value::from("1"), Value::from("2")])
            .build()
            .unwrap();

        let query = ctx.bag(BagId::Query);
        assert_eq!(query.get("page"), Some(&Value::from("3")));
        assert_eq!(query.get("sort"), Some(&Value::from("name")));
        assert!(query.get("ids").and_then(Value::as_list).is_some());
    }

    #[test]
    fn test_defaults() {
        let ctx = ExtractionContext::builder().build().unwrap();
        assert_eq!(ctx.method(), &Method::GET);
        assert_eq!(ctx.path(), "/");
        assert!(ctx.bag(BagId::Query).is_empty());
        assert!(ctx.bag(BagId::Files).is_empty());
    }

    #[test]
    fn test_malformed_body_fails_build() {
        let result = ExtractionContext::builder()
            .header("content-type", "application/json")
            .body("[1, 2")
            .build();
        assert!(result.is_err());
    }

    #[test]
    fn test_bag_mut() {
        let mut ctx = ExtractionContext::builder().build().unwrap();
        ctx.bag_mut(BagId::Attributes).set("_route", "home");
        assert!(ctx.bag(BagId::Attributes).has("_route"));
    }

    #[tokio::test]
    async fn test_load_multipart() {
        let body = create_multipart_body(
            "XyZ",
            &[
                ("title", "text/plain", None, b"Report"),
                ("attach", "text/plain", Some("file-small.txt"), b"I am a small file"),
            ],
        );

        let mut ctx = ExtractionContext::builder()
            .method(Method::POST)
            .header("content-type", "multipart/form-data; boundary=XyZ")
            .body(body)
            .build()
            .unwrap();

        assert!(ctx.bag(BagId::Files).is_empty());
        ctx.load_multipart(MultipartConfig::default()).await.unwrap();

        assert_eq!(ctx.bag(BagId::Body).get("title"), Some(&Value::from("Report")));
        let file = ctx.bag(BagId::Files).get("attach").and_then(Value::as_file).unwrap();
        assert_eq!(file.file_name(), Some("file-small.txt"));
    }

    #[tokio::test]
    async fn test_load_multipart_ignores_other_bodies() {
        let mut ctx = ExtractionContext::builder()
            .header("content-type", "application/json")
            .body(r#"{"a": 1}"#)
            .build()
            .unwrap();

        ctx.load_multipart(MultipartConfig::default()).await.unwrap();
        assert!(ctx.bag(BagId::Files).is_empty());
        assert_eq!(ctx.bag(BagId::Body).get("a"), Some(&Value::Int(1)));
    }
}
