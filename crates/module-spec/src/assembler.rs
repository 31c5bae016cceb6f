use thiserror::Error;

use crate::catalog::FieldCatalog;
use crate::spec::entry::{Dependency, FieldWidth, ModuleFieldEntry, Operator};
use crate::spec::module::ModuleSpec;
use crate::validate::{Violation, validate};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AssemblerError {
    #[error("entry index {index} is out of range for {len} entries")]
    IndexOutOfRange { index: usize, len: usize },
    #[error("module has {} violation(s)", .0.len())]
    Invalid(Vec<Violation>),
}

/// Partial update applied by [`ModuleAssembler::update_at`]. `None` leaves
/// the current value untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryPatch {
    pub field_id: Option<String>,
    pub option_id: Option<Option<String>>,
    pub width: Option<FieldWidth>,
    pub required: Option<bool>,
    pub allows_append: Option<bool>,
    pub dependency: Option<Option<Dependency>>,
}

/// Editing session over a module's ordered entry list.
///
/// Mutations never repair dependency references; a dependent whose parent was
/// removed or moved after it is reported by the next [`validate`] call.
#[derive(Debug, Clone)]
pub struct ModuleAssembler {
    id: String,
    title: String,
    description: Option<String>,
    entries: Vec<ModuleFieldEntry>,
    next_entry: usize,
}

impl ModuleAssembler {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: None,
            entries: Vec::new(),
            next_entry: 1,
        }
    }

    /// Reopens a saved module for editing.
    pub fn from_spec(spec: ModuleSpec) -> Self {
        let mut assembler = Self {
            id: spec.id,
            title: spec.title,
            description: spec.description,
            entries: spec.fields,
            next_entry: 1,
        };
        for index in 0..assembler.entries.len() {
            assembler.reserve_ids_of(index);
        }
        assembler
    }

    pub fn entries(&self) -> &[ModuleFieldEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn set_description(&mut self, description: Option<String>) {
        self.description = description;
    }

    /// Order of the entry at `index`, derived from its position.
    pub fn order_of(&self, index: usize) -> Result<usize, AssemblerError> {
        self.check_index(index)?;
        Ok(ModuleSpec::order_of(index))
    }

    /// Appends a blank entry for `field_id` and returns its generated id.
    pub fn append(&mut self, field_id: impl Into<String>) -> String {
        let id = self.fresh_id();
        self.entries.push(ModuleFieldEntry::new(id.clone(), field_id));
        id
    }

    /// Appends a prepared entry as-is.
    pub fn push(&mut self, entry: ModuleFieldEntry) {
        self.entries.push(entry);
        self.reserve_ids_of(self.entries.len() - 1);
    }

    pub fn remove_at(&mut self, index: usize) -> Result<ModuleFieldEntry, AssemblerError> {
        self.check_index(index)?;
        Ok(self.entries.remove(index))
    }

    pub fn update_at(&mut self, index: usize, patch: EntryPatch) -> Result<(), AssemblerError> {
        self.check_index(index)?;
        let entry = &mut self.entries[index];
        if let Some(field_id) = patch.field_id {
            entry.field_id = field_id;
        }
        if let Some(option_id) = patch.option_id {
            entry.option_id = option_id;
        }
        if let Some(width) = patch.width {
            entry.width = width;
        }
        if let Some(required) = patch.required {
            entry.required = required;
        }
        if let Some(allows_append) = patch.allows_append {
            entry.allows_append = allows_append;
        }
        if let Some(dependency) = patch.dependency {
            entry.dependency = dependency;
        }
        self.reserve_ids_of(index);
        Ok(())
    }

    /// Turns the entry's dependency on or off.
    ///
    /// A new dependency starts as `equals ""` against the previous entry; the
    /// validator reports it until the author fills it in. Enabling an entry
    /// that already has a dependency keeps the existing rule.
    pub fn toggle_dependency(&mut self, index: usize, enabled: bool) -> Result<(), AssemblerError> {
        self.check_index(index)?;
        let parent_id = index
            .checked_sub(1)
            .map(|previous| self.entries[previous].id.clone())
            .unwrap_or_default();
        let entry = &mut self.entries[index];
        if !enabled {
            entry.dependency = None;
        } else if entry.dependency.is_none() {
            entry.dependency = Some(Dependency {
                parent_field_entry_id: parent_id,
                operator: Operator::Equals,
                comparison_value: String::new(),
            });
        }
        Ok(())
    }

    /// Moves the entry at `from` so that it ends up at position `to`.
    pub fn move_entry(&mut self, from: usize, to: usize) -> Result<(), AssemblerError> {
        self.check_index(from)?;
        self.check_index(to)?;
        let entry = self.entries.remove(from);
        self.entries.insert(to, entry);
        Ok(())
    }

    pub fn validate(&self, catalog: &dyn FieldCatalog) -> Vec<Violation> {
        validate(&self.entries, catalog)
    }

    /// Current state as a module definition, valid or not.
    pub fn to_spec(&self) -> ModuleSpec {
        ModuleSpec {
            id: self.id.clone(),
            title: self.title.clone(),
            description: self.description.clone(),
            fields: self.entries.clone(),
        }
    }

    /// Hands the module over for persistence once it has no violations.
    pub fn finish(self, catalog: &dyn FieldCatalog) -> Result<ModuleSpec, AssemblerError> {
        let violations = self.validate(catalog);
        if !violations.is_empty() {
            return Err(AssemblerError::Invalid(violations));
        }
        Ok(ModuleSpec {
            id: self.id,
            title: self.title,
            description: self.description,
            fields: self.entries,
        })
    }

    fn check_index(&self, index: usize) -> Result<(), AssemblerError> {
        if index < self.entries.len() {
            Ok(())
        } else {
            Err(AssemblerError::IndexOutOfRange {
                index,
                len: self.entries.len(),
            })
        }
    }

    fn fresh_id(&mut self) -> String {
        let id = format!("entry-{}", self.next_entry);
        self.next_entry += 1;
        id
    }

    // Generated ids are never handed out twice, so the counter stays past
    // every `entry-<n>` the session has seen, as an entry or as a parent
    // reference, even after that entry is removed.
    fn reserve_ids_of(&mut self, index: usize) {
        let entry = &self.entries[index];
        let seen = std::iter::once(entry.id.as_str()).chain(
            entry
                .dependency
                .as_ref()
                .map(|dependency| dependency.parent_field_entry_id.as_str()),
        );
        let highest = seen.filter_map(generated_number).max();
        if let Some(number) = highest {
            self.next_entry = self.next_entry.max(number + 1);
        }
    }
}

fn generated_number(id: &str) -> Option<usize> {
    id.strip_prefix("entry-")?.parse().ok()
}
