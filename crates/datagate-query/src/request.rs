//! Request model: the validated-later inputs to the query builder.

/// The (schema, table) pair a request targets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableIdentity {
    pub schema: String,
    pub table: String,
}

impl TableIdentity {
    pub fn new(schema: impl Into<String>, table: impl Into<String>) -> Self {
        Self {
            schema: schema.into(),
            table: table.into(),
        }
    }
}

/// One caller-supplied filter parameter. The value is untyped until the
/// builder coerces it against the column's declared type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterClause {
    pub column: String,
    pub raw_value: String,
}

impl FilterClause {
    pub fn new(column: impl Into<String>, raw_value: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            raw_value: raw_value.into(),
        }
    }
}

/// Optional date bounds on a single column. `from` and `to` are raw
/// strings, coerced as timestamps by the builder; each is independently
/// optional.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateRangeClause {
    pub column: String,
    pub from: Option<String>,
    pub to: Option<String>,
}

/// Requested sort column and direction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortSpec {
    pub column: String,
    pub direction: SortDirection,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    /// Parse a caller-supplied direction token. Anything other than a
    /// case-insensitive "desc" (including absence) sorts ascending.
    pub fn parse(token: Option<&str>) -> Self {
        match token {
            Some(t) if t.eq_ignore_ascii_case("desc") => Self::Desc,
            _ => Self::Asc,
        }
    }

    pub fn as_sql(self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}
