use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::spec::entry::Operator;

/// One selectable option of a select-like field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct FieldOption {
    pub id: String,
    pub label: String,
}

/// Semantic type of a catalog field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FieldType {
    FreeText,
    Number,
    Date,
    Checkbox,
    SingleSelect {
        #[serde(default)]
        options: Vec<FieldOption>,
    },
    MultiSelect {
        #[serde(default)]
        options: Vec<FieldOption>,
    },
    Photo,
}

impl FieldType {
    /// Options of a select-like field, `None` for every other type.
    pub fn options(&self) -> Option<&[FieldOption]> {
        match self {
            FieldType::SingleSelect { options } | FieldType::MultiSelect { options } => {
                Some(options)
            }
            FieldType::FreeText
            | FieldType::Number
            | FieldType::Date
            | FieldType::Checkbox
            | FieldType::Photo => None,
        }
    }

    pub fn is_select_like(&self) -> bool {
        self.options().is_some()
    }

    /// Operators a dependency may apply to a parent of this type.
    pub fn supports_operator(&self, operator: Operator) -> bool {
        match self {
            FieldType::Checkbox => operator.is_equality(),
            FieldType::SingleSelect { .. } | FieldType::MultiSelect { .. } => {
                operator.is_equality() || operator == Operator::Contains
            }
            FieldType::FreeText => true,
            FieldType::Number | FieldType::Date => operator != Operator::Contains,
            FieldType::Photo => false,
        }
    }

    /// Whether an entry of this type may carry `allows_append`.
    pub fn supports_append(&self) -> bool {
        matches!(self, FieldType::Photo | FieldType::MultiSelect { .. })
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FieldType::FreeText => "free_text",
            FieldType::Number => "number",
            FieldType::Date => "date",
            FieldType::Checkbox => "checkbox",
            FieldType::SingleSelect { .. } => "single_select",
            FieldType::MultiSelect { .. } => "multi_select",
            FieldType::Photo => "photo",
        }
    }
}

/// Catalog entry describing a reusable field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct FieldDefinition {
    pub id: String,
    pub name: String,
    pub title: String,
    #[serde(flatten)]
    pub kind: FieldType,
}

impl FieldDefinition {
    /// Option set visible to an entry, narrowed to a single option when the
    /// entry pins one with `option_id`.
    pub fn effective_options(&self, option_id: Option<&str>) -> Option<Vec<&FieldOption>> {
        let options = self.kind.options()?;
        Some(match option_id {
            Some(id) => options.iter().filter(|option| option.id == id).collect(),
            None => options.iter().collect(),
        })
    }
}
