//! Declarative output schemas for structured completion calls
//!
//! A [`FunctionSchema`] describes the arguments a completion provider is asked
//! to produce: field name, type and description. The same structure renders
//! the JSON Schema sent to the provider and tells the parser which keys a
//! returned object must carry.

use serde_json::{json, Map, Value};

/// JSON type of a schema field
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldType {
    /// A JSON string
    String,
    /// A JSON boolean
    Boolean,
    /// A JSON array whose items all have the given type
    Array(Box<FieldType>),
    /// A JSON object with the given properties
    Object(Vec<FieldSpec>),
}

impl FieldType {
    /// Render this type as a JSON Schema fragment
    fn to_json_schema(&self) -> Value {
        match self {
            FieldType::String => json!({ "type": "string" }),
            FieldType::Boolean => json!({ "type": "boolean" }),
            FieldType::Array(items) => json!({
                "type": "array",
                "items": items.to_json_schema(),
            }),
            FieldType::Object(fields) => json!({
                "type": "object",
                "properties": properties(fields),
            }),
        }
    }
}

/// One named field of a schema
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSpec {
    /// Field name as it appears in the JSON object
    pub name: String,
    /// Expected JSON type
    pub field_type: FieldType,
    /// Human-readable guidance for the model
    pub description: String,
}

impl FieldSpec {
    /// Create a new field
    pub fn new(name: impl Into<String>, field_type: FieldType, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            field_type,
            description: description.into(),
        }
    }

    /// Names of the properties of each item, when this field is an array of
    /// objects. Empty for any other type.
    pub fn item_keys(&self) -> Vec<&str> {
        match &self.field_type {
            FieldType::Array(items) => match items.as_ref() {
                FieldType::Object(fields) => fields.iter().map(|f| f.name.as_str()).collect(),
                _ => Vec::new(),
            },
            _ => Vec::new(),
        }
    }
}

/// A callable function definition: the provider fills in its arguments
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionSchema {
    /// Function name the provider is forced to call
    pub name: String,
    /// What the function does
    pub description: String,
    /// Top-level argument fields
    pub fields: Vec<FieldSpec>,
    /// Names of top-level fields that must be present
    pub required: Vec<String>,
}

impl FunctionSchema {
    /// Create a new function schema
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            fields: Vec::new(),
            required: Vec::new(),
        }
    }

    /// Add an optional field
    pub fn field(mut self, spec: FieldSpec) -> Self {
        self.fields.push(spec);
        self
    }

    /// Add a required field
    pub fn required_field(mut self, spec: FieldSpec) -> Self {
        self.required.push(spec.name.clone());
        self.fields.push(spec);
        self
    }

    /// Look up a top-level field by name
    pub fn get(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Render the `parameters` JSON Schema object for this function
    pub fn to_parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": properties(&self.fields),
            "required": self.required,
        })
    }

    /// Names of required fields that are absent or `null` in `arguments`
    pub fn missing_required<'a>(&'a self, arguments: &Map<String, Value>) -> Vec<&'a str> {
        self.required
            .iter()
            .filter(|name| arguments.get(name.as_str()).map_or(true, Value::is_null))
            .map(String::as_str)
            .collect()
    }
}

fn properties(fields: &[FieldSpec]) -> Value {
    let mut map = Map::new();
    for field in fields {
        let mut schema = field.field_type.to_json_schema();
        if let Some(obj) = schema.as_object_mut() {
            obj.insert("description".to_string(), Value::String(field.description.clone()));
        }
        map.insert(field.name.clone(), schema);
    }
    Value::Object(map)
}

/// Names of `keys` that are absent or `null` in `object`
pub fn missing_keys<'a>(object: &Map<String, Value>, keys: &[&'a str]) -> Vec<&'a str> {
    keys.iter()
        .copied()
        .filter(|key| object.get(*key).map_or(true, Value::is_null))
        .collect()
}
