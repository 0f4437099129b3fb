//! Type definitions of a low-level SQL string representation.

/// A SQL query text together with the parameters it references.
#[derive(Debug, PartialEq, Eq)]
pub struct SQL {
    pub sql: String,
    pub params: Vec<Param>,
    /// for internal use and tests only
    pub param_index: u64,
}

impl Default for SQL {
    fn default() -> Self {
        Self::new()
    }
}

/// A parameter for a parameterized query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Param {
    /// A JSON document, bound as `jsonb`.
    Value(serde_json::Value),
}

impl SQL {
    pub fn new() -> SQL {
        SQL {
            sql: String::new(),
            params: vec![],
            param_index: 0,
        }
    }
    pub fn append_syntax(&mut self, sql: &str) {
        self.sql.push_str(sql);
    }
    /// Append a quoted identifier. Embedded double quotes are doubled.
    pub fn append_identifier(&mut self, sql: &str) {
        self.sql.push('"');
        self.sql.push_str(&sql.replace('"', "\"\""));
        self.sql.push('"');
    }
    /// Append a quoted string literal. Single quotes are doubled, and when the
    /// string contains a backslash the escape-string form `E'...'` is used so the
    /// literal means the same thing regardless of `standard_conforming_strings`.
    pub fn append_literal(&mut self, literal: &str) {
        let escaped = literal.replace('\'', "''");
        if escaped.contains('\\') {
            self.sql.push_str("E'");
            self.sql.push_str(&escaped.replace('\\', "\\\\"));
        } else {
            self.sql.push('\'');
            self.sql.push_str(&escaped);
        }
        self.sql.push('\'');
    }
    pub fn append_param(&mut self, param: Param) {
        self.param_index += 1;
        self.sql.push_str(format!("${}", self.param_index).as_str());
        self.params.push(param);
    }
}
