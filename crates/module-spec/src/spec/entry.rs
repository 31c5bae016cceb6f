use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Comparison applied between a parent value and a dependency literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Operator {
    Equals,
    NotEquals,
    Contains,
    GreaterThan,
    LessThan,
    GreaterOrEqual,
    LessOrEqual,
}

impl Operator {
    pub fn is_equality(self) -> bool {
        matches!(self, Operator::Equals | Operator::NotEquals)
    }

    pub fn is_ordering(self) -> bool {
        matches!(
            self,
            Operator::GreaterThan
                | Operator::LessThan
                | Operator::GreaterOrEqual
                | Operator::LessOrEqual
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Operator::Equals => "equals",
            Operator::NotEquals => "not_equals",
            Operator::Contains => "contains",
            Operator::GreaterThan => "greater_than",
            Operator::LessThan => "less_than",
            Operator::GreaterOrEqual => "greater_or_equal",
            Operator::LessOrEqual => "less_or_equal",
        }
    }
}

/// Rendering width of an entry inside its module row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema, Default)]
pub enum FieldWidth {
    #[serde(rename = "25%")]
    Quarter,
    #[serde(rename = "50%")]
    Half,
    #[serde(rename = "75%")]
    ThreeQuarters,
    #[default]
    #[serde(rename = "100%")]
    Full,
}

/// Conditional rule tying an entry's activation to an earlier entry's value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Dependency {
    pub parent_field_entry_id: String,
    pub operator: Operator,
    /// Literal read according to the parent entry's field type.
    ///
    /// Matching is exact for every type: option labels, free text, the
    /// checkbox words `true`/`false`, numbers and dates are taken as written,
    /// with no trimming or case folding. A value made only of whitespace
    /// counts as empty.
    pub comparison_value: String,
}

/// Placement of a catalog field inside a module.
///
/// The entry's order is its position in the owning list and is never stored
/// here; see [`crate::spec::module::FieldEntryRecord`] for the persisted shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ModuleFieldEntry {
    pub id: String,
    pub field_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub option_id: Option<String>,
    #[serde(default)]
    pub width: FieldWidth,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub allows_append: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dependency: Option<Dependency>,
}

impl ModuleFieldEntry {
    pub fn new(id: impl Into<String>, field_id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            field_id: field_id.into(),
            option_id: None,
            width: FieldWidth::default(),
            required: false,
            allows_append: false,
            dependency: None,
        }
    }

    pub fn with_dependency(
        mut self,
        parent_field_entry_id: impl Into<String>,
        operator: Operator,
        comparison_value: impl Into<String>,
    ) -> Self {
        self.dependency = Some(Dependency {
            parent_field_entry_id: parent_field_entry_id.into(),
            operator,
            comparison_value: comparison_value.into(),
        });
        self
    }

    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }
}
