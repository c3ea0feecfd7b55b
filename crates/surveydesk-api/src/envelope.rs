// Response envelope and pagination shapes
//
// Every backend response is wrapped as `{ success, statusCode, message, data }`.
// `ApiResponse<T>` makes the success/failure split explicit so callers can
// never reach `data` without going through the success arm.

use serde::de::{DeserializeOwned, Error as _};
use serde::{Deserialize, Deserializer, Serialize};

/// Wire form of the envelope; `data` is decoded in a second step so the
/// payload type only has to match on success.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawEnvelope {
    success: bool,
    #[serde(default)]
    status_code: Option<u16>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    data: serde_json::Value,
}

/// A typed response envelope.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiResponse<T> {
    Success {
        status_code: u16,
        message: String,
        data: T,
    },
    Failure {
        status_code: Option<u16>,
        message: String,
    },
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self::Success {
            status_code: 200,
            message: String::new(),
            data,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self::Failure {
            status_code: None,
            message: message.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            Self::Success { data, .. } => Some(data),
            Self::Failure { .. } => None,
        }
    }

    pub fn into_data(self) -> Option<T> {
        match self {
            Self::Success { data, .. } => Some(data),
            Self::Failure { .. } => None,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Self::Success { message, .. } | Self::Failure { message, .. } => message,
        }
    }

    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Success { status_code, .. } => Some(*status_code),
            Self::Failure { status_code, .. } => *status_code,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> ApiResponse<U> {
        match self {
            Self::Success {
                status_code,
                message,
                data,
            } => ApiResponse::Success {
                status_code,
                message,
                data: f(data),
            },
            Self::Failure {
                status_code,
                message,
            } => ApiResponse::Failure {
                status_code,
                message,
            },
        }
    }
}

impl<'de, T: DeserializeOwned> Deserialize<'de> for ApiResponse<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = RawEnvelope::deserialize(deserializer)?;
        if raw.success {
            let data = serde_json::from_value(raw.data).map_err(D::Error::custom)?;
            Ok(Self::Success {
                status_code: raw.status_code.unwrap_or(200),
                message: raw.message.unwrap_or_default(),
                data,
            })
        } else {
            Ok(Self::Failure {
                status_code: raw.status_code,
                message: raw.message.unwrap_or_default(),
            })
        }
    }
}

// ── Pagination ──────────────────────────────────────────────────────

fn default_page() -> u32 {
    1
}

fn default_page_size() -> u32 {
    10
}

/// One page of a collection. `page` is 1-indexed.
///
/// Resources name these fields differently; the aliases accept every
/// spelling the backend uses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Paginated<T> {
    #[serde(alias = "data", alias = "results", alias = "rows")]
    pub items: Vec<T>,
    #[serde(default = "default_page", alias = "currentPage")]
    pub page: u32,
    #[serde(default = "default_page_size", alias = "limit", alias = "perPage")]
    pub page_size: u32,
    #[serde(default, alias = "totalItems", alias = "count", alias = "totalCount")]
    pub total: u64,
}

impl<T> Paginated<T> {
    pub fn empty(page: u32, page_size: u32) -> Self {
        Self {
            items: Vec::new(),
            page,
            page_size,
            total: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn total_pages(&self) -> u64 {
        if self.page_size == 0 {
            return 0;
        }
        self.total.div_ceil(u64::from(self.page_size))
    }

    pub fn has_next(&self) -> bool {
        u64::from(self.page) < self.total_pages()
    }

    /// Pin `page` and `page_size` to what was requested and truncate
    /// `items` to fit. The echoed values are ignored: a missing `pageSize`
    /// would otherwise default to 10, and an oversized one would let an
    /// over-delivering backend through.
    #[must_use]
    pub fn conform_to(mut self, page: u32, page_size: u32) -> Self {
        self.page = page;
        self.page_size = page_size;
        let limit = usize::try_from(page_size).unwrap_or(usize::MAX);
        self.items.truncate(limit);
        self
    }
}

impl<T> Default for Paginated<T> {
    fn default() -> Self {
        Self::empty(default_page(), default_page_size())
    }
}
