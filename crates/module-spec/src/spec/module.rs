use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::catalog::{CatalogError, FieldCatalog};
use crate::spec::entry::ModuleFieldEntry;
use crate::spec::field::FieldType;

/// A module definition: an ordered group of field entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ModuleSpec {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub fields: Vec<ModuleFieldEntry>,
}

/// Normalized persistence shape of an entry with its derived order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct FieldEntryRecord {
    pub order: usize,
    #[serde(flatten)]
    pub entry: ModuleFieldEntry,
}

/// Read shape of an entry with its catalog metadata attached.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedFieldEntry {
    pub order: usize,
    pub field_name: String,
    pub field_title: String,
    pub field_type: FieldType,
    #[serde(flatten)]
    pub entry: ModuleFieldEntry,
}

impl ModuleSpec {
    /// Order of the entry at `index`; positions are 1-based.
    pub fn order_of(index: usize) -> usize {
        index + 1
    }

    pub fn to_records(&self) -> Vec<FieldEntryRecord> {
        self.fields
            .iter()
            .enumerate()
            .map(|(index, entry)| FieldEntryRecord {
                order: Self::order_of(index),
                entry: entry.clone(),
            })
            .collect()
    }

    /// Rebuilds the entry list from persisted records. Records are sorted by
    /// `order`; ties keep their stored sequence.
    pub fn from_records(
        id: impl Into<String>,
        title: impl Into<String>,
        mut records: Vec<FieldEntryRecord>,
    ) -> Self {
        records.sort_by_key(|record| record.order);
        Self {
            id: id.into(),
            title: title.into(),
            description: None,
            fields: records.into_iter().map(|record| record.entry).collect(),
        }
    }

    /// Attaches catalog metadata to every entry.
    pub fn resolve_fields(
        &self,
        catalog: &dyn FieldCatalog,
    ) -> Result<Vec<ResolvedFieldEntry>, CatalogError> {
        self.fields
            .iter()
            .enumerate()
            .map(|(index, entry)| {
                let definition = catalog.resolve(&entry.field_id)?;
                Ok(ResolvedFieldEntry {
                    order: Self::order_of(index),
                    field_name: definition.name.clone(),
                    field_title: definition.title.clone(),
                    field_type: definition.kind.clone(),
                    entry: entry.clone(),
                })
            })
            .collect()
    }
}
