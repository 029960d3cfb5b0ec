use url::form_urlencoded;

use crate::filters::Category;
use crate::selection::SelectionState;

/// Joins slugs inside a single parameter value.
pub const SEPARATOR: &str = "|";

/// The recognized query parameters, as raw decoded strings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UrlParams {
    /// Theme slugs.
    pub t: Option<String>,
    /// Sector slugs.
    pub s: Option<String>,
    /// Speaker slugs.
    pub p: Option<String>,
    /// Search phrase.
    pub q: Option<String>,
    /// Sort order token; only ever `new`.
    pub o: Option<String>,
}

fn joined(slugs: Vec<&str>) -> Option<String> {
    if slugs.is_empty() {
        None
    } else {
        Some(slugs.join(SEPARATOR))
    }
}

impl UrlParams {
    /// Parameters describing the settled state of a selection.
    pub fn from_selection(selection: &SelectionState) -> Self {
        let phrase = selection.debounced_search_phrase().trim();
        Self {
            t: joined(selection.selected_slugs(Category::Theme)),
            s: joined(selection.selected_slugs(Category::Sector)),
            p: joined(selection.selected_slugs(Category::Speaker)),
            q: (!phrase.is_empty()).then(|| phrase.to_string()),
            o: selection.order_by().token().map(str::to_string),
        }
    }

    /// Decode a query string (with or without the leading `?`). Unknown keys
    /// and blank values are skipped; a repeated key keeps its last value.
    pub fn parse(query: &str) -> Self {
        let mut params = Self::default();
        let query = query.strip_prefix('?').unwrap_or(query);
        for (key, value) in form_urlencoded::parse(query.as_bytes()) {
            if value.trim().is_empty() {
                continue;
            }
            let slot = match &*key {
                "t" => &mut params.t,
                "s" => &mut params.s,
                "p" => &mut params.p,
                "q" => &mut params.q,
                "o" => &mut params.o,
                _ => continue,
            };
            *slot = Some(value.into_owned());
        }
        params
    }

    pub fn is_empty(&self) -> bool {
        self.pairs().next().is_none()
    }

    /// Present parameters in serialization order.
    pub fn pairs(&self) -> impl Iterator<Item = (&'static str, &str)> {
        [
            ("t", &self.t),
            ("s", &self.s),
            ("p", &self.p),
            ("q", &self.q),
            ("o", &self.o),
        ]
        .into_iter()
        .filter_map(|(key, value)| value.as_deref().map(|v| (key, v)))
    }

    /// Form-encoded query string without the leading `?`; empty when no
    /// parameter is set.
    pub fn to_query_string(&self) -> String {
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        for (key, value) in self.pairs() {
            serializer.append_pair(key, value);
        }
        serializer.finish()
    }
}

/// Split a separator-joined parameter value into slugs.
pub fn split_slugs(value: &str) -> Vec<&str> {
    value
        .split(SEPARATOR)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}
