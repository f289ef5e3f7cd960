//! The built statement: SQL text plus named parameters.

use crate::value::ScalarValue;
use std::collections::BTreeMap;

/// A fully built, parameterized statement.
///
/// `text` contains `:name` placeholders; `params` maps each name to its
/// coerced value. Identifiers in the text have been validated and quoted;
/// values are only ever carried here, never inlined.
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterizedQuery {
    pub text: String,
    pub params: BTreeMap<String, ScalarValue>,
}

impl ParameterizedQuery {
    /// Render the statement with positional `$1..$n` placeholders and the
    /// matching ordered value list, for drivers (Postgres) that cannot
    /// bind named parameters.
    ///
    /// The substitution is purely textual: the builder never inlines
    /// values and restricts identifiers to `[A-Za-z0-9_]`, so a `:` in
    /// the text can only introduce a placeholder.
    pub fn to_positional(&self) -> (String, Vec<ScalarValue>) {
        let mut out = String::with_capacity(self.text.len());
        let mut values = Vec::with_capacity(self.params.len());

        let mut rest = self.text.as_str();
        while let Some(pos) = rest.find(':') {
            out.push_str(&rest[..pos]);
            let after = &rest[pos + 1..];
            let end = after
                .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
                .unwrap_or(after.len());
            let name = &after[..end];
            match self.params.get(name) {
                Some(value) if !name.is_empty() => {
                    values.push(value.clone());
                    out.push('$');
                    out.push_str(&values.len().to_string());
                }
                _ => {
                    out.push(':');
                    out.push_str(name);
                }
            }
            rest = &after[end..];
        }
        out.push_str(rest);

        (out, values)
    }
}
