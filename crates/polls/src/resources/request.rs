use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};

use super::response::ResourceError;

/// Everything a resource operation may read from an incoming request.
///
/// Built explicitly by the HTTP layer (or by tests) and passed by reference, so no
/// operation reaches for ambient request state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResourceRequest {
    pk: Option<u64>,
    parent: Option<u64>,
    body: Map<String, Value>,
    query: BTreeMap<String, String>,
}

impl ResourceRequest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Id taken from the URL path. Wins over a `pk` field in the body.
    pub fn with_pk(mut self, pk: u64) -> Self {
        self.pk = Some(pk);
        self
    }

    /// Id of the owning entity taken from the URL path (e.g. the question a choice is added to).
    pub fn with_parent(mut self, parent: u64) -> Self {
        self.parent = Some(parent);
        self
    }

    /// Parse a raw JSON body. An empty body is treated as `{}`; anything that is not a JSON
    /// object is rejected.
    pub fn with_body(mut self, raw: &[u8]) -> Result<Self, ResourceError> {
        if raw.iter().all(u8::is_ascii_whitespace) {
            self.body = Map::new();
            return Ok(self);
        }

        match serde_json::from_slice::<Value>(raw) {
            Ok(Value::Object(body)) => {
                self.body = body;
                Ok(self)
            }
            _ => Err(ResourceError::MalformedBody),
        }
    }

    pub fn with_json(mut self, body: Map<String, Value>) -> Self {
        self.body = body;
        self
    }

    pub fn with_query(mut self, query: BTreeMap<String, String>) -> Self {
        self.query = query;
        self
    }

    pub fn pk(&self) -> Option<u64> {
        self.pk.or_else(|| self.id_field("pk"))
    }

    pub fn parent(&self) -> Option<u64> {
        self.parent
    }

    /// Body field holding an id, given either as a JSON integer or a numeric string.
    pub fn id_field(&self, field: &str) -> Option<u64> {
        match self.body.get(field)? {
            Value::Number(number) => number.as_u64(),
            Value::String(raw) => raw.trim().parse().ok(),
            _ => None,
        }
    }

    /// Body field holding text. Non-string values are treated as absent.
    pub fn text(&self, field: &str) -> Option<&str> {
        self.body.get(field).and_then(Value::as_str)
    }

    /// Optional RFC 3339 timestamp field. Present-but-unparsable is an error.
    pub fn timestamp(&self, field: &'static str) -> Result<Option<DateTime<Utc>>, ResourceError> {
        match self.body.get(field) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::String(raw)) => DateTime::parse_from_rfc3339(raw.trim())
                .map(|parsed| Some(parsed.with_timezone(&Utc)))
                .map_err(|_| ResourceError::InvalidField { field }),
            Some(_) => Err(ResourceError::InvalidField { field }),
        }
    }

    pub fn query(&self, key: &str) -> Option<&str> {
        self.query.get(key).map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn body(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            other => panic!("expected object, got {other}"),
        }
    }

    #[test]
    fn empty_body_is_an_empty_object() {
        let request = ResourceRequest::new().with_body(b"  \n").expect("empty body accepted");
        assert_eq!(request.text("question_text"), None);
        assert_eq!(request.pk(), None);
    }

    #[test]
    fn malformed_and_non_object_bodies_are_rejected() {
        for raw in [&b"{not json"[..], b"[1, 2]", b"\"text\""] {
            match ResourceRequest::new().with_body(raw) {
                Err(ResourceError::MalformedBody) => {}
                other => panic!("expected malformed body, got {other:?}"),
            }
        }
    }

    #[test]
    fn path_pk_wins_over_body_pk() {
        let request = ResourceRequest::new()
            .with_json(body(json!({ "pk": 4 })))
            .with_pk(9);
        assert_eq!(request.pk(), Some(9));

        let request = ResourceRequest::new().with_json(body(json!({ "pk": "4" })));
        assert_eq!(request.pk(), Some(4));
    }

    #[test]
    fn ids_must_be_non_negative_integers() {
        let request = ResourceRequest::new().with_json(body(json!({
            "a": -1,
            "b": 1.5,
            "c": "x",
            "d": true,
        })));
        for field in ["a", "b", "c", "d"] {
            assert_eq!(request.id_field(field), None, "field {field}");
        }
    }

    #[test]
    fn timestamps_parse_rfc3339() {
        let request = ResourceRequest::new().with_json(body(json!({
            "pub_date": "2030-01-01T08:00:00+02:00",
            "bad": "tomorrow",
        })));

        let parsed = request.timestamp("pub_date").expect("parses").expect("present");
        assert_eq!(parsed.to_rfc3339(), "2030-01-01T06:00:00+00:00");
        assert!(request.timestamp("missing").expect("absent is fine").is_none());
        assert!(matches!(
            request.timestamp("bad"),
            Err(ResourceError::InvalidField { field: "bad" })
        ));
    }
}
