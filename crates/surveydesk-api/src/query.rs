// Query-string encoding for list filters
//
// Every list route turns its filter state into a canonical query string
// before calling the backend. Absent and empty values never reach the wire,
// arrays expand into repeated keys, and the empty filter set encodes to "".

use indexmap::IndexMap;
use url::form_urlencoded;

// ── FilterValue ─────────────────────────────────────────────────────

/// A single filter entry: nothing, one scalar, or an ordered list.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FilterValue {
    #[default]
    Absent,
    One(String),
    Many(Vec<String>),
}

impl FilterValue {
    /// `true` if encoding this value emits at least one parameter.
    pub fn is_present(&self) -> bool {
        match self {
            Self::Absent => false,
            Self::One(v) => !v.is_empty(),
            Self::Many(vs) => !vs.is_empty(),
        }
    }

    /// The first scalar carried by this value, if any.
    pub fn first(&self) -> Option<&str> {
        match self {
            Self::Absent => None,
            Self::One(v) => Some(v.as_str()),
            Self::Many(vs) => vs.first().map(String::as_str),
        }
    }

    /// All scalars carried by this value, in order.
    pub fn values(&self) -> Vec<&str> {
        match self {
            Self::Absent => Vec::new(),
            Self::One(v) => vec![v.as_str()],
            Self::Many(vs) => vs.iter().map(String::as_str).collect(),
        }
    }
}

impl From<&str> for FilterValue {
    fn from(v: &str) -> Self {
        Self::One(v.to_owned())
    }
}

impl From<String> for FilterValue {
    fn from(v: String) -> Self {
        Self::One(v)
    }
}

impl From<&String> for FilterValue {
    fn from(v: &String) -> Self {
        Self::One(v.clone())
    }
}

impl From<Vec<String>> for FilterValue {
    fn from(v: Vec<String>) -> Self {
        Self::Many(v)
    }
}

impl From<Vec<&str>> for FilterValue {
    fn from(v: Vec<&str>) -> Self {
        Self::Many(v.into_iter().map(str::to_owned).collect())
    }
}

impl From<&[&str]> for FilterValue {
    fn from(v: &[&str]) -> Self {
        Self::Many(v.iter().map(|s| (*s).to_owned()).collect())
    }
}

impl<T: Into<FilterValue>> From<Option<T>> for FilterValue {
    fn from(v: Option<T>) -> Self {
        v.map_or(Self::Absent, Into::into)
    }
}

macro_rules! filter_value_from_display {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for FilterValue {
                fn from(v: $ty) -> Self {
                    Self::One(v.to_string())
                }
            }
        )*
    };
}

filter_value_from_display!(u8, u16, u32, u64, usize, i32, i64, bool);

// ── FilterSet ───────────────────────────────────────────────────────

/// Insertion-ordered mapping from filter key to [`FilterValue`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FilterSet {
    entries: IndexMap<String, FilterValue>,
}

impl FilterSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `key` to `value`, replacing any previous value for that key.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<FilterValue>) -> &mut Self {
        self.entries.insert(key.into(), value.into());
        self
    }

    /// Builder-style [`insert`](Self::insert).
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<FilterValue>) -> Self {
        self.insert(key, value);
        self
    }

    /// Append one scalar to `key`, promoting a scalar entry to a list.
    pub fn append(&mut self, key: impl Into<String>, value: impl Into<String>) -> &mut Self {
        let value = value.into();
        let entry = self.entries.entry(key.into()).or_default();
        *entry = match std::mem::take(entry) {
            FilterValue::Absent => FilterValue::One(value),
            FilterValue::One(prev) => FilterValue::Many(vec![prev, value]),
            FilterValue::Many(mut prev) => {
                prev.push(value);
                FilterValue::Many(prev)
            }
        };
        self
    }

    pub fn remove(&mut self, key: &str) -> Option<FilterValue> {
        self.entries.shift_remove(key)
    }

    pub fn get(&self, key: &str) -> Option<&FilterValue> {
        self.entries.get(key)
    }

    /// First scalar stored under `key`, skipping absent or empty values.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.entries
            .get(key)
            .filter(|v| v.is_present())
            .and_then(FilterValue::first)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FilterValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of keys that would survive encoding.
    pub fn len(&self) -> usize {
        self.entries.values().filter(|v| v.is_present()).count()
    }

    /// `true` if encoding yields the empty string.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Encoded parameters without the leading `?`, or `None` when nothing
    /// survives filtering.
    pub fn encode(&self) -> Option<String> {
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        let mut emitted = false;

        for (key, value) in &self.entries {
            match value {
                FilterValue::Absent => {}
                FilterValue::One(v) => {
                    if !v.is_empty() {
                        serializer.append_pair(key, v);
                        emitted = true;
                    }
                }
                FilterValue::Many(vs) => {
                    for v in vs {
                        serializer.append_pair(key, v);
                        emitted = true;
                    }
                }
            }
        }

        emitted.then(|| serializer.finish())
    }

    /// Canonical query string: `""` when empty, otherwise `"?" + params`.
    pub fn to_query_string(&self) -> String {
        self.encode().map(|q| format!("?{q}")).unwrap_or_default()
    }

    /// Parse a query string (leading `?` optional) back into a filter set.
    ///
    /// Repeated keys become [`FilterValue::Many`] in order of appearance;
    /// empty values are dropped.
    pub fn parse(query: &str) -> Self {
        let raw = query.strip_prefix('?').unwrap_or(query);
        let mut set = Self::new();
        for (key, value) in form_urlencoded::parse(raw.as_bytes()) {
            if value.is_empty() {
                continue;
            }
            set.append(key.into_owned(), value.into_owned());
        }
        set
    }
}

impl<K, V> FromIterator<(K, V)> for FilterSet
where
    K: Into<String>,
    V: Into<FilterValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut set = Self::new();
        for (k, v) in iter {
            set.insert(k, v);
        }
        set
    }
}

impl std::fmt::Display for FilterSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_query_string())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn empty_set_encodes_to_empty_string() {
        assert_eq!(FilterSet::new().to_query_string(), "");
    }

    #[test]
    fn all_absent_or_empty_encodes_to_empty_string() {
        let set = FilterSet::new()
            .with("search", None::<String>)
            .with("status", "")
            .with("tags", Vec::<String>::new());
        assert_eq!(set.to_query_string(), "");
        assert!(set.is_empty());
    }

    #[test]
    fn arrays_repeat_the_key_and_absent_keys_are_skipped() {
        let set = FilterSet::new()
            .with("tags", vec!["a", "b"])
            .with("search", None::<&str>);
        let query = set.to_query_string();
        assert_eq!(query, "?tags=a&tags=b");
        assert_eq!(query.matches("tags=").count(), 2);
        assert!(!query.contains("search"));
    }

    #[test]
    fn scalars_follow_insertion_order() {
        let set = FilterSet::new()
            .with("page", 2u32)
            .with("pageSize", 10u32)
            .with("search", "survey");
        assert_eq!(set.to_query_string(), "?page=2&pageSize=10&search=survey");
    }

    #[test]
    fn insert_replaces_previous_value() {
        let mut set = FilterSet::new();
        set.insert("page", 1u32);
        set.insert("page", 3u32);
        assert_eq!(set.to_query_string(), "?page=3");
    }

    #[test]
    fn values_are_form_encoded() {
        let set = FilterSet::new().with("search", "north field & co");
        assert_eq!(set.to_query_string(), "?search=north+field+%26+co");
    }

    #[test]
    fn non_string_values_are_coerced() {
        let set = FilterSet::new().with("year", 2024i32).with("active", true);
        assert_eq!(set.to_query_string(), "?year=2024&active=true");
    }

    #[test]
    fn parse_round_trips_non_empty_entries() {
        let original = FilterSet::new()
            .with("page", "2")
            .with("search", "boundary survey")
            .with("status", vec!["pending", "confirmed"])
            .with("client", None::<String>)
            .with("empty", "");

        let parsed = FilterSet::parse(&original.to_query_string());

        let expected = FilterSet::new()
            .with("page", "2")
            .with("search", "boundary survey")
            .with("status", vec!["pending", "confirmed"]);
        assert_eq!(parsed, expected);
    }

    #[test]
    fn parse_accepts_missing_question_mark_and_drops_empty_values() {
        let parsed = FilterSet::parse("page=1&search=&tags=x");
        assert_eq!(parsed.get_str("page"), Some("1"));
        assert!(parsed.get("search").is_none());
        assert_eq!(parsed.get_str("tags"), Some("x"));
    }

    #[test]
    fn append_promotes_scalar_to_list() {
        let mut set = FilterSet::new();
        set.append("tags", "a").append("tags", "b").append("tags", "c");
        assert_eq!(
            set.get("tags"),
            Some(&FilterValue::Many(vec!["a".into(), "b".into(), "c".into()]))
        );
    }

    #[test]
    fn encoding_is_deterministic_for_the_same_mapping() {
        let build = || {
            [("search", "lot 4"), ("month", "7"), ("year", "2025")]
                .into_iter()
                .collect::<FilterSet>()
        };
        assert_eq!(build().to_query_string(), build().to_query_string());
    }
}
