//! Boundary checks for untyped JSON request bodies.
//!
//! A [`RequestSchema`] names the fields a payload must carry and the JSON kind each one
//! must have. Checking happens before any store or prediction call is made.

use serde_json::{Map, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    String,
    Number,
}

impl FieldKind {
    fn matches(self, value: &Value) -> bool {
        match self {
            FieldKind::String => value.is_string(),
            FieldKind::Number => value.is_number(),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            FieldKind::String => "string",
            FieldKind::Number => "number",
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub name: &'static str,
    pub kind: FieldKind,
}

#[derive(Debug, Clone, Copy)]
pub struct RequestSchema {
    pub fields: &'static [FieldSpec],
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaViolation {
    /// No body, a non-object body, or at least one required field absent or null.
    Missing,
    WrongKind {
        field: &'static str,
        expected: FieldKind,
    },
}

pub const PREDICT_SCHEMA: RequestSchema = RequestSchema {
    fields: &[FieldSpec { name: "ticker", kind: FieldKind::String }],
};

pub const ADD_PRICE_SCHEMA: RequestSchema = RequestSchema {
    fields: &[
        FieldSpec { name: "ticker", kind: FieldKind::String },
        FieldSpec { name: "date", kind: FieldKind::String },
        FieldSpec { name: "price", kind: FieldKind::Number },
    ],
};

impl RequestSchema {
    /// Presence is checked for every field before any kind is checked, so a payload that
    /// is both incomplete and mistyped reports `Missing`.
    pub fn check<'a>(&self, payload: Option<&'a Value>) -> Result<&'a Map<String, Value>, SchemaViolation> {
        let object = payload
            .and_then(Value::as_object)
            .ok_or(SchemaViolation::Missing)?;

        let all_present = self
            .fields
            .iter()
            .all(|f| object.get(f.name).is_some_and(|v| !v.is_null()));
        if !all_present {
            return Err(SchemaViolation::Missing);
        }

        for field in self.fields {
            if !field.kind.matches(&object[field.name]) {
                return Err(SchemaViolation::WrongKind {
                    field: field.name,
                    expected: field.kind,
                });
            }
        }

        Ok(object)
    }

    pub fn field_names(&self) -> String {
        self.fields
            .iter()
            .map(|f| f.name)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_accepts_complete_payload() {
        let payload = json!({ "ticker": "AAPL", "date": "2024-10-05", "price": 100.5 });
        let object = ADD_PRICE_SCHEMA.check(Some(&payload)).unwrap();
        assert_eq!(object["ticker"], "AAPL");
    }

    #[test]
    fn test_extra_fields_are_ignored() {
        let payload = json!({ "ticker": "AAPL", "note": "ignored" });
        assert!(PREDICT_SCHEMA.check(Some(&payload)).is_ok());
    }

    #[test]
    fn test_missing_body_or_field() {
        assert_eq!(PREDICT_SCHEMA.check(None), Err(SchemaViolation::Missing));
        assert_eq!(PREDICT_SCHEMA.check(Some(&json!({}))), Err(SchemaViolation::Missing));
        assert_eq!(PREDICT_SCHEMA.check(Some(&json!(["AAPL"]))), Err(SchemaViolation::Missing));
        assert_eq!(
            PREDICT_SCHEMA.check(Some(&json!({ "ticker": null }))),
            Err(SchemaViolation::Missing)
        );
    }

    #[test]
    fn test_missing_takes_precedence_over_wrong_kind() {
        let payload = json!({ "ticker": 42 });
        assert_eq!(ADD_PRICE_SCHEMA.check(Some(&payload)), Err(SchemaViolation::Missing));
    }

    #[test]
    fn test_wrong_kind() {
        let payload = json!({ "ticker": "AAPL", "date": "2024-10-05", "price": "100.5" });
        assert_eq!(
            ADD_PRICE_SCHEMA.check(Some(&payload)),
            Err(SchemaViolation::WrongKind { field: "price", expected: FieldKind::Number })
        );
    }

    #[test]
    fn test_field_names() {
        assert_eq!(ADD_PRICE_SCHEMA.field_names(), "ticker, date, price");
    }
}
