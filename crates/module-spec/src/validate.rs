use std::collections::HashSet;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::catalog::FieldCatalog;
use crate::literal::{parse_bool, parse_date, parse_number};
use crate::spec::entry::{Dependency, ModuleFieldEntry};
use crate::spec::field::{FieldDefinition, FieldType};

/// Category of a structural problem in a module definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub enum ViolationKind {
    MissingOrLaterParent,
    EmptyComparisonValue,
    OperatorNotSupportedForType,
    ComparisonValueNotAnOption,
    UnknownField,
    UnknownOption,
    DuplicateEntryId,
    AppendNotSupported,
    InvalidComparisonLiteral,
}

/// One reported problem, attached to the entry that carries it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Violation {
    pub entry_index: usize,
    pub entry_id: String,
    pub kind: ViolationKind,
    pub message: String,
}

/// Checks an ordered entry list and reports every structural problem found.
///
/// Order is taken from list position. The result is empty for a module that
/// may be saved; nothing here fails fast.
pub fn validate(entries: &[ModuleFieldEntry], catalog: &dyn FieldCatalog) -> Vec<Violation> {
    let mut report = Report::default();
    let mut seen_ids = HashSet::new();

    for (index, entry) in entries.iter().enumerate() {
        if !seen_ids.insert(entry.id.as_str()) {
            report.push(
                index,
                entry,
                ViolationKind::DuplicateEntryId,
                format!("entry id '{}' is already used by an earlier entry", entry.id),
            );
        }

        check_field(index, entry, catalog, &mut report);

        if let Some(dependency) = &entry.dependency {
            check_dependency(index, entry, dependency, entries, catalog, &mut report);
        }
    }

    report.violations
}

#[derive(Default)]
struct Report {
    violations: Vec<Violation>,
}

impl Report {
    fn push(
        &mut self,
        index: usize,
        entry: &ModuleFieldEntry,
        kind: ViolationKind,
        message: String,
    ) {
        self.violations.push(Violation {
            entry_index: index,
            entry_id: entry.id.clone(),
            kind,
            message,
        });
    }
}

fn check_field(
    index: usize,
    entry: &ModuleFieldEntry,
    catalog: &dyn FieldCatalog,
    report: &mut Report,
) {
    let definition = match catalog.resolve(&entry.field_id) {
        Ok(definition) => definition,
        Err(error) => {
            report.push(index, entry, ViolationKind::UnknownField, error.to_string());
            return;
        }
    };

    if let Some(option_id) = &entry.option_id {
        let known = definition
            .kind
            .options()
            .is_some_and(|options| options.iter().any(|option| &option.id == option_id));
        if !known {
            report.push(
                index,
                entry,
                ViolationKind::UnknownOption,
                format!("field '{}' has no option '{}'", definition.id, option_id),
            );
        }
    }

    if entry.allows_append && !definition.kind.supports_append() {
        report.push(
            index,
            entry,
            ViolationKind::AppendNotSupported,
            format!(
                "append is only available on photo and multi-select fields, not {}",
                definition.kind.as_str()
            ),
        );
    }
}

fn check_dependency(
    index: usize,
    entry: &ModuleFieldEntry,
    dependency: &Dependency,
    entries: &[ModuleFieldEntry],
    catalog: &dyn FieldCatalog,
    report: &mut Report,
) {
    let parent = entries[..index]
        .iter()
        .find(|candidate| candidate.id == dependency.parent_field_entry_id);

    if parent.is_none() {
        report.push(
            index,
            entry,
            ViolationKind::MissingOrLaterParent,
            format!(
                "parent entry '{}' must exist and appear before this entry",
                dependency.parent_field_entry_id
            ),
        );
    }

    let blank = dependency.comparison_value.trim().is_empty();
    if blank {
        report.push(
            index,
            entry,
            ViolationKind::EmptyComparisonValue,
            "comparison value cannot be empty".into(),
        );
    }

    // An unknown parent field is reported on the parent itself.
    let Some(parent) = parent else {
        return;
    };
    let Ok(parent_definition) = catalog.resolve(&parent.field_id) else {
        return;
    };

    if !parent_definition.kind.supports_operator(dependency.operator) {
        report.push(
            index,
            entry,
            ViolationKind::OperatorNotSupportedForType,
            format!(
                "operator {} cannot be applied to a {} field",
                dependency.operator.as_str(),
                parent_definition.kind.as_str()
            ),
        );
        return;
    }

    if blank {
        return;
    }

    check_literal(index, entry, dependency, parent, parent_definition, report);
}

fn check_literal(
    index: usize,
    entry: &ModuleFieldEntry,
    dependency: &Dependency,
    parent: &ModuleFieldEntry,
    parent_definition: &FieldDefinition,
    report: &mut Report,
) {
    let value = dependency.comparison_value.as_str();
    let readable = match &parent_definition.kind {
        FieldType::Checkbox => parse_bool(value).is_some(),
        FieldType::Number => parse_number(value).is_some(),
        FieldType::Date => parse_date(value).is_some(),
        FieldType::SingleSelect { .. } | FieldType::MultiSelect { .. } => {
            if dependency.operator.is_equality() {
                let options = parent_definition
                    .effective_options(parent.option_id.as_deref())
                    .unwrap_or_default();
                if !options.iter().any(|option| option.label == value) {
                    report.push(
                        index,
                        entry,
                        ViolationKind::ComparisonValueNotAnOption,
                        format!(
                            "'{}' is not an option of field '{}'",
                            value, parent_definition.id
                        ),
                    );
                }
            }
            true
        }
        FieldType::FreeText | FieldType::Photo => true,
    };

    if !readable {
        report.push(
            index,
            entry,
            ViolationKind::InvalidComparisonLiteral,
            format!(
                "'{}' is not a valid {} value",
                value,
                parent_definition.kind.as_str()
            ),
        );
    }
}
