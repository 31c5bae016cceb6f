use schemars::schema_for;
use serde_json::Value;

use crate::spec::{FieldDefinition, ModuleSpec};
use crate::validate::Violation;

/// JSON Schema of the module definition exchanged with persistence.
pub fn module_schema() -> Value {
    schema_for!(ModuleSpec).to_value()
}

/// JSON Schema of a catalog file: an array of field definitions.
pub fn catalog_schema() -> Value {
    schema_for!(Vec<FieldDefinition>).to_value()
}

pub fn violation_schema() -> Value {
    schema_for!(Vec<Violation>).to_value()
}
