//! Metadata information regarding the database and tracked information.

use std::collections::BTreeMap;

use enum_iterator::Sequence;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// The semantic types a queryable column may have.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Sequence, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum ScalarType {
    String,
    Integer,
    Boolean,
    Timestamp,
    Enum,
}

impl ScalarType {
    /// Whether values of this type can be pattern-matched without a cast.
    pub fn is_textual(self) -> bool {
        match self {
            ScalarType::String => true,
            ScalarType::Integer | ScalarType::Boolean | ScalarType::Timestamp | ScalarType::Enum => {
                false
            }
        }
    }
}

/// Mapping from a collection name to its information.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TablesInfo(pub BTreeMap<String, TableInfo>);

impl TablesInfo {
    pub fn get(&self, collection: &str) -> Option<&TableInfo> {
        self.0.get(collection)
    }
}

/// Information about a database table (or any other kind of relation).
///
/// The order of `columns` is the order of the table's projection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableInfo {
    pub schema_name: String,
    pub table_name: String,
    pub primary_key: String,
    pub columns: IndexMap<String, ColumnInfo>,
}

impl TableInfo {
    /// Build a table from `(column name, type)` pairs, in projection order.
    pub fn new(
        schema_name: &str,
        table_name: &str,
        primary_key: &str,
        columns: &[(&str, ScalarType)],
    ) -> Self {
        TableInfo {
            schema_name: schema_name.to_string(),
            table_name: table_name.to_string(),
            primary_key: primary_key.to_string(),
            columns: columns
                .iter()
                .map(|(name, r#type)| {
                    (
                        (*name).to_string(),
                        ColumnInfo {
                            name: (*name).to_string(),
                            r#type: *r#type,
                        },
                    )
                })
                .collect(),
        }
    }

    /// Look up a column by name.
    pub fn column(&self, name: &str) -> Option<&ColumnInfo> {
        self.columns.get(name)
    }
}

/// Information about a database column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnInfo {
    pub name: String,
    pub r#type: ScalarType,
}
