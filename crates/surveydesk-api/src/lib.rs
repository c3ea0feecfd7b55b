// surveydesk-api: Async Rust client for the surveydesk backend REST API

pub mod cache;
pub mod client;
pub mod envelope;
pub mod error;
pub mod query;
pub mod session;
pub mod transport;

pub use cache::{CacheKey, CacheTag, CachedResponse, MemoryCache, TagCache};
pub use client::{FetchOptions, FormPart, RemoteClient, RequestBody};
pub use envelope::{ApiResponse, Paginated};
pub use error::Error;
pub use query::{FilterSet, FilterValue};
pub use session::{Session, SessionCookie};
pub use transport::{TlsMode, TransportConfig};
