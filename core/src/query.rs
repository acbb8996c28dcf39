//! Ordered query-parameter lists and their URL encoding.

use std::fmt::Display;

/// Query parameters in insertion order. Keys may repeat.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams(Vec<(String, String)>);

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, key: &str, value: impl Display) {
        self.0.push((key.to_string(), value.to_string()));
    }

    /// Push `key` only when `value` is present.
    pub fn push_opt(&mut self, key: &str, value: Option<impl Display>) {
        if let Some(value) = value {
            self.push(key, value);
        }
    }

    /// Push `key` with the comma-joined `values`, unless the list is empty.
    pub fn push_list(&mut self, key: &str, values: &[String]) {
        if !values.is_empty() {
            self.push(key, values.join(","));
        }
    }

    /// First value for `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.iter().find(|(k, _)| k == key).map(|(_, v)| v.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// `application/x-www-form-urlencoded` rendering, without a leading `?`.
    pub fn encode(&self) -> String {
        url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.iter())
            .finish()
    }
}

/// Render an optional-parameter struct as query parameters.
pub trait ToQuery {
    fn to_query(&self) -> QueryParams;
}

impl<T: ToQuery> ToQuery for Option<T> {
    fn to_query(&self) -> QueryParams {
        self.as_ref().map(ToQuery::to_query).unwrap_or_default()
    }
}

impl<T: ToQuery + ?Sized> ToQuery for &T {
    fn to_query(&self) -> QueryParams {
        (**self).to_query()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_insertion_order() {
        let mut query = QueryParams::new();
        query.push("limit", 10);
        query.push("offset", 0);
        query.push("name", "orders");
        assert_eq!(query.encode(), "limit=10&offset=0&name=orders");
    }

    #[test]
    fn push_opt_skips_none_but_keeps_zero_values() {
        let mut query = QueryParams::new();
        query.push_opt("offset", Some(0));
        query.push_opt("limit", None::<u32>);
        query.push_opt("canonical", Some(false));
        assert_eq!(query.get("offset"), Some("0"));
        assert_eq!(query.get("limit"), None);
        assert_eq!(query.get("canonical"), Some("false"));
    }

    #[test]
    fn push_list_joins_with_commas() {
        let mut query = QueryParams::new();
        query.push_list("labels", &["env:prod".to_string(), "team:core".to_string()]);
        query.push_list("empty", &[]);
        assert_eq!(query.len(), 1);
        assert_eq!(query.get("labels"), Some("env:prod,team:core"));
    }

    #[test]
    fn encode_escapes_reserved_characters() {
        let mut query = QueryParams::new();
        query.push("name", "a b&c=d");
        assert_eq!(query.encode(), "name=a+b%26c%3Dd");
    }

    #[test]
    fn empty_query_encodes_to_empty_string() {
        assert_eq!(QueryParams::new().encode(), "");
    }
}
