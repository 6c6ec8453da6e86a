//! Parameterized statements.

use serde::Serialize;
use std::fmt;

/// A positional (`?`) parameter value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(untagged)]
pub enum SqlParam {
    Text(String),
    Int(i64),
}

impl fmt::Display for SqlParam {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SqlParam::Text(s) => f.write_str(s),
            SqlParam::Int(i) => write!(f, "{i}"),
        }
    }
}

impl From<&str> for SqlParam {
    fn from(value: &str) -> Self {
        SqlParam::Text(value.to_string())
    }
}

/// Statement text plus its parameters, in placeholder order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Statement {
    sql: String,
    params: Vec<SqlParam>,
}

impl Statement {
    pub(crate) fn new(sql: String, params: Vec<SqlParam>) -> Self {
        debug_assert_eq!(sql.matches('?').count(), params.len());
        Self { sql, params }
    }

    pub fn sql(&self) -> &str {
        &self.sql
    }

    pub fn params(&self) -> &[SqlParam] {
        &self.params
    }

    /// Number of `?` placeholders in the statement text.
    pub fn placeholder_count(&self) -> usize {
        self.sql.matches('?').count()
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let params: Vec<String> = self.params.iter().map(|p| format!("{p:?}")).collect();
        write!(f, "{} -- [{}]", self.sql, params.join(", "))
    }
}

/// `AND`-joined conditions under construction.
///
/// Each condition is pushed together with the parameters for its own
/// placeholders, so text and parameters cannot fall out of step.
#[derive(Debug, Default)]
pub struct WhereClause {
    conditions: Vec<String>,
    params: Vec<SqlParam>,
}

impl WhereClause {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one condition and the values for its placeholders.
    pub fn push<I>(&mut self, condition: impl Into<String>, params: I)
    where
        I: IntoIterator<Item = SqlParam>,
    {
        let condition = condition.into();
        let before = self.params.len();
        self.params.extend(params);
        debug_assert_eq!(
            condition.matches('?').count(),
            self.params.len() - before,
            "placeholder count must match parameter count for `{condition}`"
        );
        self.conditions.push(condition);
    }

    /// Append a condition that has no placeholders.
    pub fn push_literal(&mut self, condition: impl Into<String>) {
        self.push(condition, Vec::new());
    }

    pub fn len(&self) -> usize {
        self.conditions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    pub(crate) fn into_parts(self) -> (Vec<String>, Vec<SqlParam>) {
        (self.conditions, self.params)
    }
}
