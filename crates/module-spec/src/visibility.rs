use std::cmp::Ordering;
use std::collections::BTreeMap;

use serde_json::{Map, Value};

use crate::catalog::FieldCatalog;
use crate::literal::{
    is_unset, parse_bool, parse_date, parse_number, scalar_text, value_as_bool, value_as_number,
};
use crate::spec::entry::{Dependency, ModuleFieldEntry, Operator};
use crate::spec::field::{FieldDefinition, FieldType};

/// Activation of each entry keyed by entry id.
pub type VisibilityMap = BTreeMap<String, bool>;

/// Current answers keyed by entry id.
pub type FieldValues = Map<String, Value>;

/// Decides whether `entry` is active for the given answers.
///
/// The parent is looked up among the entries that precede `entry` in
/// `entries`; when `entry` is not part of the list every entry is a
/// candidate. Anything that cannot be evaluated yields `false`.
pub fn evaluate(
    entry: &ModuleFieldEntry,
    entries: &[ModuleFieldEntry],
    values: &FieldValues,
    catalog: &dyn FieldCatalog,
) -> bool {
    let earlier = match entries.iter().position(|candidate| candidate.id == entry.id) {
        Some(index) => &entries[..index],
        None => entries,
    };
    evaluate_against(entry, earlier, values, catalog)
}

/// Index form of [`evaluate`].
///
/// # Panics
///
/// Panics when `index` is out of range for `entries`.
pub fn evaluate_at(
    index: usize,
    entries: &[ModuleFieldEntry],
    values: &FieldValues,
    catalog: &dyn FieldCatalog,
) -> bool {
    let entry = &entries[index];
    evaluate_against(entry, &entries[..index], values, catalog)
}

/// Evaluates every entry in order. An entry whose parent is inactive is
/// inactive as well.
pub fn resolve_visibility(
    entries: &[ModuleFieldEntry],
    values: &FieldValues,
    catalog: &dyn FieldCatalog,
) -> VisibilityMap {
    let mut map = VisibilityMap::new();

    for (index, entry) in entries.iter().enumerate() {
        let parent_active = entry.dependency.as_ref().is_none_or(|dependency| {
            map.get(&dependency.parent_field_entry_id)
                .copied()
                .unwrap_or(false)
        });
        let active = parent_active && evaluate_at(index, entries, values, catalog);
        map.entry(entry.id.clone()).or_insert(active);
    }

    map
}

/// Ids of the entries that are active and flagged as required.
pub fn required_entries(
    entries: &[ModuleFieldEntry],
    values: &FieldValues,
    catalog: &dyn FieldCatalog,
) -> Vec<String> {
    let visibility = resolve_visibility(entries, values, catalog);
    entries
        .iter()
        .filter(|entry| entry.required)
        .filter(|entry| visibility.get(&entry.id).copied().unwrap_or(false))
        .map(|entry| entry.id.clone())
        .collect()
}

fn evaluate_against(
    entry: &ModuleFieldEntry,
    earlier: &[ModuleFieldEntry],
    values: &FieldValues,
    catalog: &dyn FieldCatalog,
) -> bool {
    let Some(dependency) = &entry.dependency else {
        return true;
    };
    let Some(parent) = earlier
        .iter()
        .find(|candidate| candidate.id == dependency.parent_field_entry_id)
    else {
        return false;
    };
    let Ok(definition) = catalog.resolve(&parent.field_id) else {
        return false;
    };

    condition_holds(dependency, parent, definition, values.get(&parent.id))
}

fn condition_holds(
    dependency: &Dependency,
    parent: &ModuleFieldEntry,
    definition: &FieldDefinition,
    value: Option<&Value>,
) -> bool {
    let operator = dependency.operator;
    let expected = dependency.comparison_value.as_str();

    if !definition.kind.supports_operator(operator) {
        return false;
    }

    match &definition.kind {
        FieldType::Checkbox => {
            let Some(expected) = parse_bool(expected) else {
                return false;
            };
            let actual = value_as_bool(value);
            match operator {
                Operator::Equals => actual == expected,
                Operator::NotEquals => actual != expected,
                _ => false,
            }
        }
        _ if is_unset(value) => unset_outcome(operator, expected),
        FieldType::SingleSelect { .. } | FieldType::MultiSelect { .. } => {
            let labels = selected_labels(definition, parent, value);
            compare_labels(operator, &labels, expected)
        }
        FieldType::FreeText => match value.and_then(scalar_text) {
            Some(actual) => compare_text(operator, &actual, expected),
            None => false,
        },
        FieldType::Number => {
            match (value.and_then(value_as_number), parse_number(expected)) {
                (Some(actual), Some(expected)) => {
                    compare_ordering(operator, actual.partial_cmp(&expected))
                }
                _ => false,
            }
        }
        FieldType::Date => {
            let actual = value.and_then(scalar_text).and_then(|text| parse_date(&text));
            match (actual, parse_date(expected)) {
                (Some(actual), Some(expected)) => {
                    compare_ordering(operator, Some(actual.cmp(&expected)))
                }
                _ => false,
            }
        }
        FieldType::Photo => false,
    }
}

/// An unset parent only equals the empty literal and only differs from a
/// non-empty one.
fn unset_outcome(operator: Operator, expected: &str) -> bool {
    match operator {
        Operator::Equals => expected.trim().is_empty(),
        Operator::NotEquals => !expected.trim().is_empty(),
        Operator::Contains
        | Operator::GreaterThan
        | Operator::LessThan
        | Operator::GreaterOrEqual
        | Operator::LessOrEqual => false,
    }
}

/// Labels of the selected options. Values naming an option id are mapped to
/// that option's label; anything else is taken as a label already.
fn selected_labels(
    definition: &FieldDefinition,
    parent: &ModuleFieldEntry,
    value: Option<&Value>,
) -> Vec<String> {
    let options = definition
        .effective_options(parent.option_id.as_deref())
        .unwrap_or_default();
    let raw = match value {
        Some(Value::Array(items)) => items.iter().filter_map(scalar_text).collect(),
        Some(other) => scalar_text(other).into_iter().collect(),
        None => Vec::new(),
    };

    raw.into_iter()
        .map(|text| {
            options
                .iter()
                .find(|option| option.id == text)
                .map(|option| option.label.clone())
                .unwrap_or(text)
        })
        .collect()
}

fn compare_labels(operator: Operator, labels: &[String], expected: &str) -> bool {
    match operator {
        Operator::Equals => labels.iter().any(|label| label == expected),
        Operator::NotEquals => !labels.iter().any(|label| label == expected),
        Operator::Contains => labels.iter().any(|label| label.contains(expected)),
        Operator::GreaterThan
        | Operator::LessThan
        | Operator::GreaterOrEqual
        | Operator::LessOrEqual => false,
    }
}

fn compare_text(operator: Operator, actual: &str, expected: &str) -> bool {
    match operator {
        Operator::Contains => actual.contains(expected),
        _ => compare_ordering(operator, Some(actual.cmp(expected))),
    }
}

fn compare_ordering(operator: Operator, ordering: Option<Ordering>) -> bool {
    let Some(ordering) = ordering else {
        return false;
    };
    match operator {
        Operator::Equals => ordering == Ordering::Equal,
        Operator::NotEquals => ordering != Ordering::Equal,
        Operator::GreaterThan => ordering == Ordering::Greater,
        Operator::LessThan => ordering == Ordering::Less,
        Operator::GreaterOrEqual => ordering != Ordering::Less,
        Operator::LessOrEqual => ordering != Ordering::Greater,
        Operator::Contains => false,
    }
}
