use std::fmt;

use schemars::JsonSchema;
use schemars::r#gen::SchemaGenerator;
use schemars::schema::Schema;
use serde::{Deserialize, Serialize};

use crate::lenient;

/// Stored nullable chance for a freshly added column.
pub const DEFAULT_NULLABLE_CHANCE: u8 = 10;

/// Value type requested for a generated column.
///
/// The set is open: type names this client does not know are kept verbatim
/// and forwarded to the service unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ColumnKind {
    #[default]
    String,
    Integer,
    Float,
    Date,
    CustomList,
    AiText,
    Other(String),
}

impl ColumnKind {
    /// Types offered by the editor, in display order.
    pub const KNOWN: [ColumnKind; 6] = [
        ColumnKind::String,
        ColumnKind::Integer,
        ColumnKind::Float,
        ColumnKind::Date,
        ColumnKind::CustomList,
        ColumnKind::AiText,
    ];

    /// Parse a type name; blank input means `string`.
    pub fn parse(value: &str) -> Self {
        let value = value.trim();
        match value.to_ascii_lowercase().as_str() {
            "" | "string" => ColumnKind::String,
            "integer" => ColumnKind::Integer,
            "float" => ColumnKind::Float,
            "date" => ColumnKind::Date,
            "custom_list" => ColumnKind::CustomList,
            "ai_text" => ColumnKind::AiText,
            _ => ColumnKind::Other(value.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            ColumnKind::String => "string",
            ColumnKind::Integer => "integer",
            ColumnKind::Float => "float",
            ColumnKind::Date => "date",
            ColumnKind::CustomList => "custom_list",
            ColumnKind::AiText => "ai_text",
            ColumnKind::Other(value) => value.as_str(),
        }
    }
}

impl From<String> for ColumnKind {
    fn from(value: String) -> Self {
        ColumnKind::parse(&value)
    }
}

impl From<ColumnKind> for String {
    fn from(value: ColumnKind) -> Self {
        match value {
            ColumnKind::Other(value) => value,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl JsonSchema for ColumnKind {
    fn schema_name() -> String {
        "ColumnKind".to_string()
    }

    fn json_schema(generator: &mut SchemaGenerator) -> Schema {
        String::json_schema(generator)
    }
}

/// Syntax hint shown next to a column's options field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OptionsHint {
    pub placeholder: &'static str,
    /// Whether the options field is offered at all for this type.
    pub visible: bool,
}

/// Expected `options` syntax for a column type.
pub fn options_hint(kind: &ColumnKind) -> OptionsHint {
    let placeholder = match kind {
        ColumnKind::String => "min_len=5,max_len=10",
        ColumnKind::Integer | ColumnKind::Float => "min=0,max=100",
        ColumnKind::Date => "start=2020-01-01,end=today",
        ColumnKind::CustomList => "item1,item2,item3",
        ColumnKind::AiText => "Additional instructions for AI (optional)",
        ColumnKind::Other(_) => {
            return OptionsHint {
                placeholder: "No specific options",
                visible: false,
            };
        }
    };
    OptionsHint {
        placeholder,
        visible: true,
    }
}

/// One column as edited by the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnSpec {
    #[serde(deserialize_with = "lenient::string")]
    pub name: String,
    #[serde(rename = "type", deserialize_with = "lenient::kind")]
    pub kind: ColumnKind,
    /// Type-specific options such as `min=0,max=100`; never interpreted here.
    #[serde(deserialize_with = "lenient::string")]
    pub options: String,
    #[serde(deserialize_with = "lenient::boolean")]
    pub unique: bool,
    #[serde(deserialize_with = "lenient::boolean")]
    pub nullable: bool,
    /// Percentage in `[0, 100]`; kept while `nullable` is off but not sent.
    #[serde(deserialize_with = "lenient::chance")]
    pub nullable_chance: u8,
}

impl Default for ColumnSpec {
    fn default() -> Self {
        Self {
            name: String::new(),
            kind: ColumnKind::String,
            options: String::new(),
            unique: false,
            nullable: false,
            nullable_chance: DEFAULT_NULLABLE_CHANCE,
        }
    }
}

impl ColumnSpec {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_kind(mut self, kind: ColumnKind) -> Self {
        self.kind = kind;
        self
    }

    /// Change the type. Stored options are left untouched; only the hint moves.
    pub fn set_kind(&mut self, kind: ColumnKind) -> OptionsHint {
        self.kind = kind;
        self.options_hint()
    }

    pub fn options_hint(&self) -> OptionsHint {
        options_hint(&self.kind)
    }

    pub fn set_nullable_chance(&mut self, value: i64) {
        self.nullable_chance = value.clamp(0, 100) as u8;
    }

    /// Chance as it goes on the wire: zero unless the column is nullable.
    pub fn effective_nullable_chance(&self) -> u8 {
        if self.nullable {
            self.nullable_chance.min(100)
        } else {
            0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_and_unknown_kinds() {
        assert_eq!(ColumnKind::parse("Integer"), ColumnKind::Integer);
        assert_eq!(ColumnKind::parse(" ai_text "), ColumnKind::AiText);
        assert_eq!(ColumnKind::parse(""), ColumnKind::String);
        assert_eq!(
            ColumnKind::parse("uuid"),
            ColumnKind::Other("uuid".to_string())
        );
        assert_eq!(String::from(ColumnKind::Other("uuid".into())), "uuid");
    }

    #[test]
    fn changing_kind_keeps_options() {
        let mut column = ColumnSpec::new("age");
        column.options = "min_len=2".to_string();
        let hint = column.set_kind(ColumnKind::Integer);
        assert_eq!(hint.placeholder, "min=0,max=100");
        assert_eq!(column.options, "min_len=2");
    }

    #[test]
    fn unknown_kind_hides_options() {
        let hint = options_hint(&ColumnKind::Other("uuid".into()));
        assert!(!hint.visible);
        assert!(options_hint(&ColumnKind::CustomList).visible);
    }

    #[test]
    fn nullable_chance_is_zero_when_not_nullable() {
        let mut column = ColumnSpec::new("email");
        column.set_nullable_chance(40);
        assert_eq!(column.effective_nullable_chance(), 0);
        column.nullable = true;
        assert_eq!(column.effective_nullable_chance(), 40);
        column.nullable = false;
        assert_eq!(column.nullable_chance, 40);
    }

    #[test]
    fn chance_is_clamped() {
        let mut column = ColumnSpec::new("x");
        column.set_nullable_chance(250);
        assert_eq!(column.nullable_chance, 100);
        column.set_nullable_chance(-3);
        assert_eq!(column.nullable_chance, 0);
    }

    #[test]
    fn decodes_sloppy_column() {
        let column: ColumnSpec = serde_json::from_value(serde_json::json!({
            "name": "price",
            "type": null,
            "options": 5,
            "unique": "true",
            "nullable_chance": "150"
        }))
        .expect("decode column");
        assert_eq!(column.kind, ColumnKind::String);
        assert_eq!(column.options, "5");
        assert!(column.unique);
        assert!(!column.nullable);
        assert_eq!(column.nullable_chance, 100);
    }
}
