use std::collections::BTreeMap;

use thiserror::Error;

use crate::spec::field::FieldDefinition;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    #[error("field '{0}' is not in the catalog")]
    NotFound(String),
    #[error("field '{0}' is defined more than once")]
    Duplicate(String),
}

/// Read-only lookup of field definitions by id.
pub trait FieldCatalog {
    fn resolve(&self, field_id: &str) -> Result<&FieldDefinition, CatalogError>;
}

/// Catalog backed by an in-memory map, used for fixtures and file-based tooling.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalog {
    fields: BTreeMap<String, FieldDefinition>,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a catalog, rejecting repeated field ids.
    pub fn from_definitions(
        definitions: impl IntoIterator<Item = FieldDefinition>,
    ) -> Result<Self, CatalogError> {
        let mut catalog = Self::new();
        for definition in definitions {
            if catalog.fields.contains_key(&definition.id) {
                return Err(CatalogError::Duplicate(definition.id));
            }
            catalog.insert(definition);
        }
        Ok(catalog)
    }

    /// Inserts or replaces a definition.
    pub fn insert(&mut self, definition: FieldDefinition) {
        self.fields.insert(definition.id.clone(), definition);
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn definitions(&self) -> impl Iterator<Item = &FieldDefinition> {
        self.fields.values()
    }
}

impl FieldCatalog for InMemoryCatalog {
    fn resolve(&self, field_id: &str) -> Result<&FieldDefinition, CatalogError> {
        self.fields
            .get(field_id)
            .ok_or_else(|| CatalogError::NotFound(field_id.to_string()))
    }
}
