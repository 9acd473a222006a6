//! Query string parsing for list endpoints.
//!
//! ```text
//! ?where={"foo": "bar"}              => foo = 'bar'
//! ?where={"id": [1,2,3]}             => id IN (1,2,3)
//! ?order=-column1                    => ORDER BY column1 DESC
//! ?order[column1]=DESC&order[c2]=ASC => ORDER BY column1 DESC, c2 ASC
//! ?limit=10&offset=20
//! ?search=term1+term2                => OR search
//! ?search={"and": ["t1", "t2"], "or": ["t3"]}
//! ```

use super::criteria::{Criteria, Direction, ListQuery, OrderBy, SearchTerms};
use super::error::RestError;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::{Method, header};
use serde_json::{Map, Value};
use std::convert::Infallible;

/// What the REST methods need from an incoming request.
#[derive(Debug, Clone)]
pub struct RestRequest {
    pub method: Method,
    pub query: QueryParams,
    pub accept: Option<String>,
}

impl RestRequest {
    pub fn new(method: Method) -> Self {
        Self {
            method,
            query: QueryParams::default(),
            accept: None,
        }
    }

    pub fn with_query(mut self, raw: &str) -> Self {
        self.query = QueryParams::parse(raw);
        self
    }

    pub fn with_accept(mut self, accept: impl Into<String>) -> Self {
        self.accept = Some(accept.into());
        self
    }
}

impl<S: Send + Sync> FromRequestParts<S> for RestRequest {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let accept = parts
            .headers
            .get(header::ACCEPT)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);

        Ok(Self {
            method: parts.method.clone(),
            query: QueryParams::parse(parts.uri.query().unwrap_or_default()),
            accept,
        })
    }
}

/// Decoded query string, keeping repeated and bracketed keys.
#[derive(Debug, Clone, Default)]
pub struct QueryParams {
    pairs: Vec<(String, String)>,
}

impl QueryParams {
    pub fn parse(raw: &str) -> Self {
        Self {
            pairs: url::form_urlencoded::parse(raw.as_bytes())
                .into_owned()
                .collect(),
        }
    }

    /// Last plain `name=value` occurrence.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.pairs
            .iter()
            .rev()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// `name[]=v` and `name[key]=v` entries in query order.
    ///
    /// A plain `name=v` replaces everything before it and is itself replaced by a
    /// later bracketed entry, so `order=a&order=b` yields only `b`.
    pub fn entries(&self, name: &str) -> Vec<(Option<&str>, &str)> {
        let mut entries = Vec::new();
        let mut plain = false;

        for (key, value) in &self.pairs {
            if key == name {
                entries.clear();
                entries.push((None, value.as_str()));
                plain = true;
                continue;
            }

            let Some(inner) = key
                .strip_prefix(name)
                .and_then(|rest| rest.strip_prefix('['))
                .and_then(|rest| rest.strip_suffix(']'))
            else {
                continue;
            };

            if plain {
                entries.clear();
                plain = false;
            }

            let sub_key = if inner.is_empty() { None } else { Some(inner) };
            entries.push((sub_key, value.as_str()));
        }

        entries
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for QueryParams {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            pairs: iter
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        }
    }
}

pub fn get_criteria(query: &QueryParams) -> Result<Criteria, RestError> {
    let raw = query.get("where").unwrap_or("{}");

    let where_ = match serde_json::from_str::<Value>(raw) {
        Ok(Value::Object(map)) => map,
        _ => {
            return Err(RestError::BadRequest(
                "Current 'where' parameter is not valid JSON.".to_string(),
            ));
        }
    };

    let mut criteria = Map::new();

    for (property, value) in where_ {
        if is_empty_value(&value) {
            continue;
        }

        let supported = match &value {
            Value::Array(items) => items.iter().all(is_scalar),
            other => is_scalar(other),
        };

        if !supported {
            return Err(RestError::BadRequest(format!(
                "Current 'where' parameter has unsupported value for '{property}'."
            )));
        }

        criteria.insert(property, value);
    }

    Ok(criteria)
}

pub fn get_order_by(query: &QueryParams) -> OrderBy {
    let mut output = OrderBy::new();

    for (key, value) in query.entries("order") {
        if value.is_empty() {
            continue;
        }

        let (mut column, mut direction) = match key {
            Some(column) => (column, Direction::parse(value).unwrap_or(Direction::Asc)),
            None => (value, Direction::Asc),
        };

        if let Some(stripped) = column.strip_prefix('-') {
            column = stripped;
            direction = Direction::Desc;
        }

        if column.is_empty() {
            continue;
        }

        output.set(column, direction);
    }

    output
}

pub fn get_limit(query: &QueryParams) -> Option<u64> {
    query.get("limit").map(absolute_integer)
}

pub fn get_offset(query: &QueryParams) -> Option<u64> {
    query.get("offset").map(absolute_integer)
}

pub fn get_search_terms(query: &QueryParams) -> Result<SearchTerms, RestError> {
    let Some(search) = query.get("search") else {
        return Ok(SearchTerms::default());
    };

    match serde_json::from_str::<Value>(search) {
        Ok(Value::Object(groups)) => search_groups(&groups),
        Ok(Value::Array(_)) => Err(invalid_search()),
        // Not JSON (or a bare JSON scalar): plain space separated OR terms.
        _ => Ok(SearchTerms::or(split_terms(search))),
    }
}

pub fn get_list_query(query: &QueryParams) -> Result<ListQuery, RestError> {
    Ok(ListQuery {
        criteria: get_criteria(query)?,
        order_by: get_order_by(query),
        limit: get_limit(query),
        offset: get_offset(query),
        search: get_search_terms(query)?,
    })
}

fn search_groups(groups: &Map<String, Value>) -> Result<SearchTerms, RestError> {
    if !groups.contains_key("and") && !groups.contains_key("or") {
        return Err(invalid_search());
    }

    Ok(SearchTerms {
        and: groups.get("and").map(normalize_terms).unwrap_or_default(),
        or: groups.get("or").map(normalize_terms).unwrap_or_default(),
    })
}

fn invalid_search() -> RestError {
    RestError::BadRequest(
        "Given search parameter is not valid, within JSON provide 'and' and/or 'or' property."
            .to_string(),
    )
}

fn normalize_terms(value: &Value) -> Vec<String> {
    match value {
        Value::Array(items) => unique(items.iter().filter_map(scalar_to_term)),
        Value::String(terms) => split_terms(terms),
        other => unique(scalar_to_term(other)),
    }
}

fn split_terms(terms: &str) -> Vec<String> {
    unique(terms.split(' ').map(str::to_string))
}

fn unique(terms: impl IntoIterator<Item = String>) -> Vec<String> {
    let mut output: Vec<String> = Vec::new();

    for term in terms {
        if !term.is_empty() && !output.contains(&term) {
            output.push(term);
        }
    }

    output
}

fn scalar_to_term(value: &Value) -> Option<String> {
    match value {
        Value::String(term) => Some(term.clone()),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        _ => None,
    }
}

fn is_scalar(value: &Value) -> bool {
    matches!(value, Value::String(_) | Value::Number(_) | Value::Bool(_))
}

fn is_empty_value(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(text) => text.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
        _ => false,
    }
}

/// Absolute value of the numeric prefix, `"-10"` => 10, `"1e3"` => 1000, `"abc"` => 0.
fn absolute_integer(raw: &str) -> u64 {
    let raw = raw.trim_start();
    let bytes = raw.as_bytes();
    let digits = |from: usize| bytes[from..].iter().take_while(|b| b.is_ascii_digit()).count();

    let mut end = usize::from(matches!(bytes.first(), Some(b'+' | b'-')));
    let mut mantissa = digits(end);
    end += mantissa;

    if bytes.get(end) == Some(&b'.') {
        let fraction = digits(end + 1);
        end += 1 + fraction;
        mantissa += fraction;
    }

    // The exponent needs a mantissa digit before it and one digit of its own
    if mantissa > 0 && matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exponent = end + 1;
        if matches!(bytes.get(exponent), Some(b'+' | b'-')) {
            exponent += 1;
        }

        let exponent_digits = digits(exponent);
        if exponent_digits > 0 {
            end = exponent + exponent_digits;
        }
    }

    raw[..end]
        .parse::<f64>()
        .map(|number| number.abs().trunc() as u64)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn params(raw: &str) -> QueryParams {
        QueryParams::parse(raw)
    }

    fn encoded(name: &str, value: &str) -> QueryParams {
        QueryParams::from_iter([(name, value)])
    }

    #[test]
    fn test_criteria_defaults_to_empty() {
        assert!(get_criteria(&params("")).unwrap().is_empty());
    }

    #[test]
    fn test_criteria_with_invalid_json_is_bad_request() {
        for input in ["{foo:bar}", "not json", "[1, 2]", "\"foo\""] {
            let error = get_criteria(&encoded("where", input)).unwrap_err();
            assert!(matches!(error, RestError::BadRequest(_)), "input: {input}");
        }
    }

    #[test]
    fn test_criteria_filters_empty_values() {
        let criteria = get_criteria(&encoded(
            "where",
            r#"{"foo": "bar", "empty": "", "none": null, "list": [], "ids": [1, 2], "flag": false}"#,
        ))
        .unwrap();

        assert_eq!(
            Value::Object(criteria),
            json!({"foo": "bar", "ids": [1, 2], "flag": false})
        );
    }

    #[test]
    fn test_criteria_rejects_nested_objects() {
        let error = get_criteria(&encoded("where", r#"{"foo": {"bar": 1}}"#)).unwrap_err();

        assert!(matches!(error, RestError::BadRequest(_)));
    }

    #[test]
    fn test_order_by_parses_plain_and_keyed_values() {
        let cases = [
            ("order=column1", vec![("column1", Direction::Asc)]),
            ("order=-column1", vec![("column1", Direction::Desc)]),
            ("order=-foo.column1", vec![("foo.column1", Direction::Desc)]),
            ("order[column1]=ASC", vec![("column1", Direction::Asc)]),
            ("order[column1]=desc", vec![("column1", Direction::Desc)]),
            ("order[foo]=bogus", vec![("foo", Direction::Asc)]),
            (
                "order[column1]=DESC&order[column2]=DESC",
                vec![("column1", Direction::Desc), ("column2", Direction::Desc)],
            ),
            (
                "order[]=a&order[]=-b",
                vec![("a", Direction::Asc), ("b", Direction::Desc)],
            ),
            ("order=", vec![]),
            ("order=a&order=-b", vec![("b", Direction::Desc)]),
            ("order[]=a&order=b", vec![("b", Direction::Asc)]),
            ("order=a&order[c]=DESC", vec![("c", Direction::Desc)]),
        ];

        for (raw, expected) in cases {
            let order_by = get_order_by(&params(raw));
            let actual = order_by.iter().collect::<Vec<_>>();
            assert_eq!(actual, expected, "query: {raw}");
        }
    }

    #[test]
    fn test_limit_and_offset_are_absolute() {
        assert_eq!(get_limit(&params("")), None);
        assert_eq!(get_offset(&params("")), None);
        assert_eq!(get_limit(&params("limit=10")), Some(10));
        assert_eq!(get_limit(&params("limit=-10")), Some(10));
        assert_eq!(get_offset(&params("offset=-3.7")), Some(3));
        assert_eq!(get_offset(&params("offset=12abc")), Some(12));
        assert_eq!(get_limit(&params("limit=abc")), Some(0));
        assert_eq!(get_limit(&params("limit=1e3")), Some(1000));
        assert_eq!(get_limit(&params("limit=-1E2")), Some(100));
        assert_eq!(get_offset(&params("offset=2.5e1")), Some(25));
        assert_eq!(get_limit(&params("limit=1e")), Some(1));
        assert_eq!(get_limit(&params("limit=e3")), Some(0));
    }

    #[test]
    fn test_search_terms_from_plain_string() {
        assert_eq!(
            get_search_terms(&encoded("search", "a b")).unwrap(),
            SearchTerms::or(["a", "b"])
        );
        assert_eq!(
            get_search_terms(&params("search=term1+term2+term1")).unwrap(),
            SearchTerms::or(["term1", "term2"])
        );
    }

    #[test]
    fn test_search_terms_from_json() {
        assert_eq!(
            get_search_terms(&encoded("search", r#"{"and":["a","a","b"]}"#)).unwrap(),
            SearchTerms::and(["a", "b"])
        );

        let terms =
            get_search_terms(&encoded("search", r#"{"and":["x", ""],"or":["y","y","z"]}"#)).unwrap();
        assert_eq!(terms.and, vec!["x"]);
        assert_eq!(terms.or, vec!["y", "z"]);
    }

    #[test]
    fn test_search_terms_without_operands_is_bad_request() {
        for input in [r#"{"foo":["a"]}"#, r#"["a", "b"]"#] {
            let error = get_search_terms(&encoded("search", input)).unwrap_err();
            assert!(matches!(error, RestError::BadRequest(_)), "input: {input}");
        }
    }

    #[test]
    fn test_search_terms_absent() {
        assert!(get_search_terms(&params("")).unwrap().is_empty());
    }
}
