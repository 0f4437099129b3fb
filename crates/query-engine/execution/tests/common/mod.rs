use serde::Serialize;

use query_engine_execution::metrics::Metrics;
use query_engine_execution::mutation::{Patch, Payload};
use query_engine_metadata::metadata::{ScalarType, TableInfo, TablesInfo};

/// The tables of `static/schema.sql` the executor tests touch.
pub fn tables_info() -> TablesInfo {
    TablesInfo(
        [
            TableInfo::new(
                "public",
                "groups",
                "id",
                &[
                    ("id", ScalarType::Integer),
                    ("name", ScalarType::String),
                    ("point_of_contact", ScalarType::String),
                    ("unix_gid", ScalarType::Integer),
                    ("has_groupdir", ScalarType::Boolean),
                ],
            ),
            TableInfo::new(
                "public",
                "users",
                "id",
                &[
                    ("id", ScalarType::Integer),
                    ("username", ScalarType::String),
                    ("email1", ScalarType::String),
                    ("date", ScalarType::Timestamp),
                    ("position", ScalarType::Enum),
                ],
            ),
            TableInfo::new(
                "public",
                "user_groups",
                "id",
                &[
                    ("id", ScalarType::Integer),
                    ("group_id", ScalarType::Integer),
                    ("user_id", ScalarType::Integer),
                ],
            ),
        ]
        .into_iter()
        .map(|table| (table.table_name.clone(), table))
        .collect(),
    )
}

pub fn metrics() -> Metrics {
    Metrics::initialize(&mut prometheus::Registry::new()).unwrap()
}

pub fn params(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
    pairs
        .iter()
        .map(|(key, value)| ((*key).to_string(), (*value).to_string()))
        .collect()
}

#[derive(Serialize)]
pub struct Group {
    #[serde(skip_serializing_if = "Patch::is_missing")]
    pub name: Patch<String>,
    #[serde(skip_serializing_if = "Patch::is_missing")]
    pub point_of_contact: Patch<String>,
    #[serde(skip_serializing_if = "Patch::is_missing")]
    pub unix_gid: Patch<i64>,
}

impl Group {
    pub fn named(name: &str) -> Group {
        Group {
            name: Patch::Value(name.to_string()),
            point_of_contact: Patch::Missing,
            unix_gid: Patch::Missing,
        }
    }
}

impl Payload for Group {}

#[derive(Serialize)]
pub struct User {
    pub email1: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,
}

impl Payload for User {}

#[derive(Serialize)]
pub struct Membership {
    pub group_id: i64,
    pub user_id: i64,
}

impl Payload for Membership {}
