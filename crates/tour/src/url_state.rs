use url::{Url, form_urlencoded};

use crate::ports::UrlState;

/// Query parameter holding the current chapter's stable id.
pub const CHAPTER_ID_PARAM: &str = "chapterId";

/// In-memory URL query state, rendered as `?key=value&...`.
///
/// Insertion order is preserved so the rendered query string stays stable
/// across writes of an existing key.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    pairs: Vec<(String, String)>,
}

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads the query of a full URL (`https://host/tour?chapterId=3#map`) or
    /// of a bare query (`?a=1&b=2`, leading `?` optional). Any `#fragment` is
    /// dropped. Keys without `=` get an empty value.
    pub fn parse(input: &str) -> Self {
        let input = input.trim();
        let pairs = match Url::parse(input) {
            Ok(url) => url.query_pairs().into_owned().collect(),
            Err(_) => {
                let query = input.split_once('#').map_or(input, |(query, _)| query);
                let query = query.strip_prefix('?').unwrap_or(query);
                form_urlencoded::parse(query.as_bytes()).into_owned().collect()
            }
        };
        Self { pairs }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Replaces every occurrence of `key` with a single pair at the position
    /// of the first one, or removes the key when `value` is `None`.
    pub fn set(&mut self, key: &str, value: Option<&str>) {
        let Some(value) = value else {
            self.pairs.retain(|(k, _)| k != key);
            return;
        };
        match self.pairs.iter().position(|(k, _)| k == key) {
            Some(first) => {
                self.pairs[first].1 = value.to_string();
                let mut idx = 0;
                self.pairs.retain(|(k, _)| {
                    let keep = idx <= first || k != key;
                    idx += 1;
                    keep
                });
            }
            None => self.pairs.push((key.to_string(), value.to_string())),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// `""` when empty, otherwise `?k=v&...` form-urlencoded.
    pub fn to_query_string(&self) -> String {
        if self.pairs.is_empty() {
            return String::new();
        }
        let body = form_urlencoded::Serializer::new(String::new())
            .extend_pairs(&self.pairs)
            .finish();
        format!("?{body}")
    }
}

impl UrlState for QueryParams {
    fn param(&self, key: &str) -> Option<String> {
        self.get(key).map(str::to_string)
    }

    fn set_param(&mut self, key: &str, value: Option<&str>) {
        self.set(key, value);
    }
}
