// Remote data client
//
// Single choke point for every backend call: base URL resolution, bearer
// token attachment, JSON and multipart bodies, envelope decoding, and the
// tag-filed response cache. Resource services sit on top of `fetch` and
// `invalidate` and never touch `reqwest` directly.

use std::sync::Arc;
use std::time::Duration;

use reqwest::Method;
use reqwest::header::AUTHORIZATION;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::cache::{CacheKey, CacheTag, CachedResponse, TagCache};
use crate::envelope::ApiResponse;
use crate::error::Error;
use crate::query::FilterSet;
use crate::session::Session;
use crate::transport::TransportConfig;

const BODY_PREVIEW_CHARS: usize = 200;

// ── Request bodies ──────────────────────────────────────────────────

/// One field of a multipart form.
#[derive(Debug, Clone)]
pub enum FormPart {
    Text {
        name: String,
        value: String,
    },
    File {
        name: String,
        file_name: String,
        content_type: Option<String>,
        bytes: Vec<u8>,
    },
}

impl FormPart {
    pub fn text(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self::Text {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Request payload. Multipart forms are kept as parts and rebuilt on send
/// because `reqwest::multipart::Form` is single-use.
#[derive(Debug, Clone, Default)]
pub enum RequestBody {
    #[default]
    Empty,
    Json(serde_json::Value),
    Form(Vec<FormPart>),
}

// ── FetchOptions ────────────────────────────────────────────────────

/// Per-call options: method, query, body, and caching directives.
#[derive(Debug, Clone, Default)]
pub struct FetchOptions {
    pub method: Method,
    pub query: FilterSet,
    pub body: RequestBody,
    /// Seconds after which a cached response must be refetched.
    pub revalidate: Option<Duration>,
    /// Topics this response is filed under.
    pub tags: Vec<CacheTag>,
}

impl FetchOptions {
    pub fn get() -> Self {
        Self::default()
    }

    pub fn post() -> Self {
        Self::with_method(Method::POST)
    }

    pub fn put() -> Self {
        Self::with_method(Method::PUT)
    }

    pub fn patch() -> Self {
        Self::with_method(Method::PATCH)
    }

    pub fn delete() -> Self {
        Self::with_method(Method::DELETE)
    }

    fn with_method(method: Method) -> Self {
        Self {
            method,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn query(mut self, query: FilterSet) -> Self {
        self.query = query;
        self
    }

    pub fn json(mut self, body: &impl Serialize) -> Result<Self, Error> {
        self.body = RequestBody::Json(serde_json::to_value(body)?);
        Ok(self)
    }

    #[must_use]
    pub fn form(mut self, parts: Vec<FormPart>) -> Self {
        self.body = RequestBody::Form(parts);
        self
    }

    #[must_use]
    pub fn revalidate(mut self, interval: Duration) -> Self {
        self.revalidate = Some(interval);
        self
    }

    #[must_use]
    pub fn tags(mut self, tags: &[CacheTag]) -> Self {
        self.tags = tags.to_vec();
        self
    }

    /// Only reads that declare a tag or a revalidate interval are cached.
    pub fn is_cacheable(&self) -> bool {
        self.method == Method::GET && (!self.tags.is_empty() || self.revalidate.is_some())
    }
}

// ── Client ──────────────────────────────────────────────────────────

/// Async client for the surveydesk REST API.
pub struct RemoteClient {
    http: reqwest::Client,
    base_url: Url,
    session: Arc<Session>,
    cache: Arc<dyn TagCache>,
}

impl RemoteClient {
    /// Build from a base URL and transport config.
    pub fn new(
        base_url: &str,
        transport: &TransportConfig,
        session: Arc<Session>,
        cache: Arc<dyn TagCache>,
    ) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self::with_client(
            http,
            Self::normalize_base_url(base_url)?,
            session,
            cache,
        ))
    }

    /// Wrap a pre-built `reqwest::Client`.
    pub fn with_client(
        http: reqwest::Client,
        base_url: Url,
        session: Arc<Session>,
        cache: Arc<dyn TagCache>,
    ) -> Self {
        Self {
            http,
            base_url,
            session,
            cache,
        }
    }

    /// Parse the base URL and make sure its path ends in `/` so relative
    /// resource paths join underneath it.
    pub fn normalize_base_url(raw: &str) -> Result<Url, Error> {
        let mut url = Url::parse(raw)?;
        if !url.path().ends_with('/') {
            let path = format!("{}/", url.path());
            url.set_path(&path);
        }
        Ok(url)
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn session(&self) -> &Arc<Session> {
        &self.session
    }

    pub fn cache(&self) -> &Arc<dyn TagCache> {
        &self.cache
    }

    // ── URL builder ──────────────────────────────────────────────────

    /// Join a resource path (e.g. `"reports/42"`) onto the base URL and
    /// attach the encoded filter set.
    pub fn url(&self, path: &str, query: &FilterSet) -> Result<Url, Error> {
        let mut url = self.base_url.join(path.trim_start_matches('/'))?;
        url.set_query(query.encode().as_deref());
        Ok(url)
    }

    // ── Public API ───────────────────────────────────────────────────

    /// Issue a request and decode the response envelope.
    ///
    /// Cacheable reads are served from the tag cache while fresh. Only
    /// successful envelopes are stored.
    pub async fn fetch<T: DeserializeOwned>(
        &self,
        path: &str,
        options: FetchOptions,
    ) -> Result<ApiResponse<T>, Error> {
        let url = self.url(path, &options.query)?;
        let cacheable = options.is_cacheable();
        let key = CacheKey::new(&options.method, &url);

        if cacheable {
            if let Some(hit) = self.cache.get(&key) {
                debug!(%key, "served from cache");
                return Self::decode(&hit);
            }
        }

        debug!("{} {url}", options.method);
        let raw = self.send(options.method, url, options.body).await?;
        let envelope = Self::decode::<T>(&raw)?;

        if cacheable && envelope.is_success() {
            self.cache
                .set(key, raw, &options.tags, options.revalidate);
        }

        Ok(envelope)
    }

    /// Evict every cached response filed under `tag`.
    pub fn invalidate(&self, tag: CacheTag) -> usize {
        self.cache.invalidate(tag)
    }

    // ── Transport ────────────────────────────────────────────────────

    async fn send(
        &self,
        method: Method,
        url: Url,
        body: RequestBody,
    ) -> Result<CachedResponse, Error> {
        let mut request = self.http.request(method, url);

        if let Some(auth) = self.session.authorization_header()? {
            request = request.header(AUTHORIZATION, auth);
        }

        request = match body {
            RequestBody::Empty => request,
            RequestBody::Json(value) => request.json(&value),
            RequestBody::Form(parts) => request.multipart(build_form(parts)?),
        };

        let resp = request.send().await?;
        let status = resp.status().as_u16();
        let body = resp.text().await?;

        Ok(CachedResponse { status, body })
    }

    /// Decode a raw response into an envelope.
    ///
    /// Any status whose body is an envelope comes back as that envelope;
    /// anything else is a `Status` (non-2xx) or `Deserialization` (2xx) error.
    fn decode<T: DeserializeOwned>(raw: &CachedResponse) -> Result<ApiResponse<T>, Error> {
        match serde_json::from_str::<ApiResponse<T>>(&raw.body) {
            Ok(ApiResponse::Failure {
                status_code: None,
                message,
            }) => Ok(ApiResponse::Failure {
                status_code: Some(raw.status),
                message,
            }),
            Ok(envelope) => Ok(envelope),
            Err(e) if (200..300).contains(&raw.status) => Err(Error::Deserialization {
                message: format!("{e} (body preview: {:?})", preview(&raw.body)),
                body: raw.body.clone(),
            }),
            Err(_) => Err(Error::Status {
                status: raw.status,
                body: preview(&raw.body),
            }),
        }
    }
}

fn build_form(parts: Vec<FormPart>) -> Result<reqwest::multipart::Form, Error> {
    let mut form = reqwest::multipart::Form::new();
    for part in parts {
        form = match part {
            FormPart::Text { name, value } => form.text(name, value),
            FormPart::File {
                name,
                file_name,
                content_type,
                bytes,
            } => {
                let mut file = reqwest::multipart::Part::bytes(bytes).file_name(file_name);
                if let Some(mime) = content_type {
                    file = file.mime_str(&mime)?;
                }
                form.part(name, file)
            }
        };
    }
    Ok(form)
}

fn preview(body: &str) -> String {
    body.chars().take(BODY_PREVIEW_CHARS).collect()
}
