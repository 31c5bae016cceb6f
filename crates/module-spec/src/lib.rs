#![allow(missing_docs)]

pub mod assembler;
pub mod catalog;
mod literal;
pub mod schema;
pub mod spec;
pub mod validate;
pub mod visibility;

pub use assembler::{AssemblerError, EntryPatch, ModuleAssembler};
pub use catalog::{CatalogError, FieldCatalog, InMemoryCatalog};
pub use schema::{catalog_schema, module_schema, violation_schema};
pub use spec::{
    Dependency, FieldDefinition, FieldEntryRecord, FieldOption, FieldType, FieldWidth,
    ModuleFieldEntry, ModuleSpec, Operator, ResolvedFieldEntry,
};
pub use validate::{Violation, ViolationKind, validate};
pub use visibility::{
    FieldValues, VisibilityMap, evaluate, evaluate_at, required_entries, resolve_visibility,
};
