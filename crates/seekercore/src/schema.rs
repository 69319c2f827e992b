use crate::error::{SchemaViolation, ViolationReason};
use serde::Serialize;
use serde_json::Value;

/// Runtime kind of a declared field
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "fields", rename_all = "snake_case")]
pub enum FieldKind {
    String,
    StringArray,
    Object(Schema),
}

impl FieldKind {
    pub fn label(&self) -> &'static str {
        match self {
            FieldKind::String => "string",
            FieldKind::StringArray => "string array",
            FieldKind::Object(_) => "object",
        }
    }
}

/// A single field of a [`Schema`]
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldDescriptor {
    pub name: String,
    #[serde(flatten)]
    pub kind: FieldKind,
    pub required: bool,
    pub description: String,
}

impl FieldDescriptor {
    pub fn new(name: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            kind,
            required: true,
            description: String::new(),
        }
    }

    pub fn string(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::String)
    }

    pub fn string_array(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::StringArray)
    }

    pub fn object(name: impl Into<String>, schema: Schema) -> Self {
        Self::new(name, FieldKind::Object(schema))
    }

    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

/// Ordered set of field descriptors describing a structured value
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Schema {
    fields: Vec<FieldDescriptor>,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_field(mut self, field: FieldDescriptor) -> Self {
        self.fields.push(field);
        self
    }

    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn field_names(&self) -> Vec<&str> {
        self.fields.iter().map(|f| f.name.as_str()).collect()
    }

    pub fn required_fields(&self) -> impl Iterator<Item = &FieldDescriptor> {
        self.fields.iter().filter(|f| f.required)
    }
}

/// Validate `candidate` against `schema`, handing the value back untouched on success.
///
/// Checks run in order and stop at the first violation: the candidate must be
/// an object, every required field must be present, and every present field
/// must match its declared kind. Unknown fields are passed through. Optional
/// fields may be absent or `null`.
pub fn validate(schema: &Schema, candidate: Value) -> Result<Value, SchemaViolation> {
    check_object(schema, &candidate, "$")?;
    Ok(candidate)
}

fn check_object(schema: &Schema, candidate: &Value, path: &str) -> Result<(), SchemaViolation> {
    let object = candidate.as_object().ok_or_else(|| {
        SchemaViolation::new(
            path,
            ViolationReason::NotAnObject {
                found: json_type(candidate),
            },
        )
    })?;

    for field in schema.required_fields() {
        if !object.contains_key(&field.name) {
            return Err(SchemaViolation::new(
                field_path(path, &field.name),
                ViolationReason::MissingField,
            ));
        }
    }

    for field in schema.fields() {
        match object.get(&field.name) {
            None => {}
            Some(Value::Null) if !field.required => {}
            Some(value) => check_field(field, value, &field_path(path, &field.name))?,
        }
    }

    Ok(())
}

fn check_field(field: &FieldDescriptor, value: &Value, path: &str) -> Result<(), SchemaViolation> {
    match &field.kind {
        FieldKind::String => {
            if !value.is_string() {
                return Err(SchemaViolation::new(
                    path,
                    ViolationReason::wrong_kind(&field.kind, json_type(value)),
                ));
            }
        }
        FieldKind::StringArray => {
            let items = value.as_array().ok_or_else(|| {
                SchemaViolation::new(path, ViolationReason::wrong_kind(&field.kind, json_type(value)))
            })?;
            for (index, item) in items.iter().enumerate() {
                if !item.is_string() {
                    return Err(SchemaViolation::new(
                        format!("{}[{}]", path, index),
                        ViolationReason::WrongKind {
                            expected: "string",
                            found: json_type(item),
                        },
                    ));
                }
            }
        }
        FieldKind::Object(nested) => check_object(nested, value, path)?,
    }
    Ok(())
}

fn field_path(parent: &str, name: &str) -> String {
    format!("{}.{}", parent, name)
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn profile() -> Schema {
        Schema::new()
            .with_field(FieldDescriptor::string("name"))
            .with_field(FieldDescriptor::string_array("aliases"))
            .with_field(FieldDescriptor::string("notes").optional())
    }

    #[test]
    fn accepts_conforming_object_and_keeps_unknown_fields() {
        let candidate = json!({"name": "Aurora", "aliases": ["A"], "extra": 3});
        assert_eq!(validate(&profile(), candidate.clone()).unwrap(), candidate);
    }

    #[test]
    fn rejects_primitive_at_root() {
        let err = validate(&profile(), json!("Aurora")).unwrap_err();
        assert_eq!(err.path, "$");
        assert_eq!(err.reason, ViolationReason::NotAnObject { found: "string" });
    }

    #[test]
    fn missing_required_field_is_reported_before_kind_errors() {
        let err = validate(&profile(), json!({"name": 5})).unwrap_err();
        assert_eq!(err.path, "$.aliases");
        assert_eq!(err.reason, ViolationReason::MissingField);
    }

    #[test]
    fn reports_offending_array_element() {
        let err = validate(&profile(), json!({"name": "x", "aliases": ["a", 2]})).unwrap_err();
        assert_eq!(err.path, "$.aliases[1]");
    }

    #[test]
    fn does_not_coerce_numbers_into_strings() {
        let err = validate(&profile(), json!({"name": 42, "aliases": []})).unwrap_err();
        assert_eq!(err.path, "$.name");
        assert_eq!(
            err.reason,
            ViolationReason::WrongKind {
                expected: "string",
                found: "number"
            }
        );
    }

    #[test]
    fn optional_field_may_be_null_but_required_may_not() {
        assert!(validate(&profile(), json!({"name": "x", "aliases": [], "notes": null})).is_ok());
        let err = validate(&profile(), json!({"name": null, "aliases": []})).unwrap_err();
        assert_eq!(err.path, "$.name");
    }

    #[test]
    fn nested_objects_use_their_own_schema() {
        let schema = Schema::new().with_field(FieldDescriptor::object("target", profile()));
        let err = validate(&schema, json!({"target": {"name": "x"}})).unwrap_err();
        assert_eq!(err.path, "$.target.aliases");
    }
}
