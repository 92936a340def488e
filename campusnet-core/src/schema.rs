//! Declarative response shapes.
//!
//! A [`SchemaDescriptor`] pairs a name with the JSON Schema that `schemars`
//! derives for the response type. The runtime forwards the schema to ask the
//! endpoint for constrained output, and the interpreter walks the same schema
//! to validate whatever actually comes back.

use schemars::generate::SchemaSettings;
use schemars::JsonSchema;
use serde_json::{json, Value};

/// Named shape of a structured response
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaDescriptor {
    name: String,
    schema: Value,
}

impl SchemaDescriptor {
    /// Wrap an existing JSON Schema
    pub fn new(name: impl Into<String>, schema: Value) -> Self {
        Self {
            name: name.into(),
            schema,
        }
    }

    /// Derive the descriptor of `T`.
    ///
    /// Subschemas are inlined, so the result carries no `$ref`/`$defs` and can
    /// be sent to endpoints that only accept a self-contained schema.
    pub fn of<T: JsonSchema>(name: impl Into<String>) -> Self {
        let generator = SchemaSettings::draft2020_12()
            .with(|settings| settings.inline_subschemas = true)
            .into_generator();
        let mut schema = generator.into_root_schema_for::<T>().to_value();
        if let Value::Object(map) = &mut schema {
            map.remove("$schema");
            map.remove("title");
        }
        Self::new(name, schema)
    }

    /// Require a root array to hold at least `min` items.
    pub fn min_items(mut self, min: u64) -> Self {
        if let Value::Object(map) = &mut self.schema {
            if map.get("type") == Some(&json!("array")) {
                map.insert("minItems".to_string(), json!(min));
            }
        }
        self
    }

    /// Descriptor name, sent as the schema name where the endpoint supports it
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The JSON Schema
    pub fn json_schema(&self) -> &Value {
        &self.schema
    }

    /// Owned copy of the JSON Schema
    pub fn to_json_schema(&self) -> Value {
        self.schema.clone()
    }
}
