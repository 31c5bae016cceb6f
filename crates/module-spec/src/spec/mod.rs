pub mod entry;
pub mod field;
pub mod module;

pub use entry::{Dependency, FieldWidth, ModuleFieldEntry, Operator};
pub use field::{FieldDefinition, FieldOption, FieldType};
pub use module::{FieldEntryRecord, ModuleSpec, ResolvedFieldEntry};
