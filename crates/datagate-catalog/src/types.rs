//! Column type classification.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Closed enumeration of column kinds the query builder understands.
///
/// Declared types the builder has no special handling for collapse into
/// [`ColumnType::Other`], which is treated as opaque text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnType {
    Integer,
    Float,
    Boolean,
    Date,
    Timestamp,
    Text,
    Other,
}

impl ColumnType {
    /// Classify a Postgres `information_schema.columns.data_type` string.
    pub fn from_pg_data_type(data_type: &str) -> Self {
        match data_type {
            "integer" | "bigint" | "smallint" => Self::Integer,
            "real" | "double precision" | "numeric" | "decimal" => Self::Float,
            "boolean" => Self::Boolean,
            "date" => Self::Date,
            "timestamp with time zone" | "timestamp without time zone" => Self::Timestamp,
            "text" | "character varying" | "varchar" | "character" => Self::Text,
            _ => Self::Other,
        }
    }

    /// Whether values of this type participate in `LIKE` matching.
    pub fn is_textual(self) -> bool {
        matches!(self, Self::Text)
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Integer => "integer",
            Self::Float => "float",
            Self::Boolean => "boolean",
            Self::Date => "date",
            Self::Timestamp => "timestamp",
            Self::Text => "text",
            Self::Other => "other",
        };
        write!(f, "{}", name)
    }
}
