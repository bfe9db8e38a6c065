use super::{StoreError, StoreResult};
use mongodb::bson::{self, oid::ObjectId, Bson, Document};
use serde::{Serialize, Serializer};
use serde_json::Value;

/// Parse a 24 character hex string into an ObjectId
pub fn parse_object_id(id: &str) -> StoreResult<ObjectId> {
    ObjectId::parse_str(id).map_err(|e| StoreError::InvalidId {
        id: id.to_string(),
        reason: e.to_string(),
    })
}

/// Convert a request body into a storable document. Only JSON objects are accepted.
pub fn json_to_document(value: Value) -> StoreResult<Document> {
    if !value.is_object() {
        return Err(StoreError::InvalidDocument(format!(
            "expected a JSON object, got {}",
            json_kind(&value)
        )));
    }
    bson::to_document(&value).map_err(|e| StoreError::InvalidDocument(e.to_string()))
}

/// Render a stored document as plain JSON.
///
/// ObjectIds become their hex string and dates become RFC 3339 strings,
/// everything else follows relaxed Extended JSON.
pub fn document_to_json(document: Document) -> Value {
    Value::Object(
        document
            .into_iter()
            .map(|(key, value)| (key, bson_to_json(value)))
            .collect(),
    )
}

pub fn documents_to_json(documents: Vec<Document>) -> Vec<Value> {
    documents.into_iter().map(document_to_json).collect()
}

pub fn bson_to_json(value: Bson) -> Value {
    match value {
        Bson::ObjectId(oid) => Value::String(oid.to_hex()),
        Bson::DateTime(dt) => match dt.try_to_rfc3339_string() {
            Ok(s) => Value::String(s),
            Err(_) => Bson::DateTime(dt).into_relaxed_extjson(),
        },
        Bson::Document(doc) => document_to_json(doc),
        Bson::Array(items) => Value::Array(items.into_iter().map(bson_to_json).collect()),
        other => other.into_relaxed_extjson(),
    }
}

/// Copy exactly `fields` out of `source`; absent fields are written as null
pub fn pick_fields(source: &Document, fields: &[&str]) -> Document {
    fields
        .iter()
        .map(|field| {
            let value = source.get(*field).cloned().unwrap_or(Bson::Null);
            (field.to_string(), value)
        })
        .collect()
}

pub(crate) fn serialize_bson<S: Serializer>(value: &Bson, serializer: S) -> Result<S::Ok, S::Error> {
    bson_to_json(value.clone()).serialize(serializer)
}

pub(crate) fn serialize_opt_bson<S: Serializer>(
    value: &Option<Bson>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    value.clone().map(bson_to_json).serialize(serializer)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::doc;
    use serde_json::json;

    #[test]
    fn parses_valid_object_id() {
        let oid = parse_object_id("507f1f77bcf86cd799439011").unwrap();
        assert_eq!(oid.to_hex(), "507f1f77bcf86cd799439011");
    }

    #[test]
    fn rejects_malformed_object_id() {
        for bad in ["", "abc", "507f1f77bcf86cd79943901z", "507f1f77bcf86cd7994390111"] {
            let err = parse_object_id(bad).unwrap_err();
            assert!(matches!(err, StoreError::InvalidId { .. }), "{bad}");
        }
    }

    #[test]
    fn object_body_becomes_document() {
        let doc = json_to_document(json!({
            "title": "Grooming",
            "price": 25,
            "tags": ["dog", "cat"],
            "details": { "duration": 1.5 }
        }))
        .unwrap();

        assert_eq!(doc.get_str("title").unwrap(), "Grooming");
        assert_eq!(doc.get_array("tags").unwrap().len(), 2);
        assert!(doc.get_document("details").is_ok());
    }

    #[test]
    fn non_object_body_is_rejected() {
        let err = json_to_document(json!([1, 2, 3])).unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid document: expected a JSON object, got an array"
        );
    }

    #[test]
    fn object_ids_render_as_hex_strings() {
        let oid = ObjectId::new();
        let rendered = document_to_json(doc! {
            "_id": oid,
            "nested": { "ref": oid },
            "list": [oid],
            "count": 3_i32,
        });

        assert_eq!(rendered["_id"], json!(oid.to_hex()));
        assert_eq!(rendered["nested"]["ref"], json!(oid.to_hex()));
        assert_eq!(rendered["list"][0], json!(oid.to_hex()));
        assert_eq!(rendered["count"], json!(3));
    }

    #[test]
    fn pick_fields_keeps_only_named_fields() {
        let source = doc! { "title": "Walk", "icon": "paw.svg", "secret": true };
        let picked = pick_fields(&source, &["title", "icon", "image"]);

        assert_eq!(picked, doc! { "title": "Walk", "icon": "paw.svg", "image": Bson::Null });
    }
}
