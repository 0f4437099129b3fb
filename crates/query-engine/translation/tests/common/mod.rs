use query_engine_metadata::metadata::{ScalarType, TableInfo, TablesInfo};
use query_engine_translation::translation;
use query_engine_translation::translation::query::root::Restriction;

/// The collections the translation tests run against.
pub fn tables_info() -> TablesInfo {
    TablesInfo(
        [
            (
                "test_table".to_string(),
                TableInfo::new(
                    "public",
                    "test_table",
                    "int_column",
                    &[
                        ("string_column", ScalarType::String),
                        ("int_column", ScalarType::Integer),
                    ],
                ),
            ),
            (
                "groups".to_string(),
                TableInfo::new(
                    "public",
                    "groups",
                    "id",
                    &[
                        ("id", ScalarType::Integer),
                        ("name", ScalarType::String),
                        ("unix_gid", ScalarType::Integer),
                    ],
                ),
            ),
            (
                "users".to_string(),
                TableInfo::new(
                    "public",
                    "users",
                    "id",
                    &[("id", ScalarType::Integer), ("username", ScalarType::String)],
                ),
            ),
            (
                "user_groups".to_string(),
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
            ),
        ]
        .into_iter()
        .collect(),
    )
}

pub fn params(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
    pairs
        .iter()
        .map(|(key, value)| ((*key).to_string(), (*value).to_string()))
        .collect()
}

/// Translate a listing of `test_table` and return the page and count SQL.
pub fn translate_listing(
    pairs: &[(&str, &str)],
) -> Result<(String, String), translation::error::Error> {
    translate_listing_of("test_table", None, pairs)
}

pub fn translate_listing_of(
    collection: &str,
    restriction: Option<&Restriction>,
    pairs: &[(&str, &str)],
) -> Result<(String, String), translation::error::Error> {
    let plan = translation::query::translate(&tables_info(), collection, restriction, &params(pairs))?;
    Ok((plan.query.rows_sql().sql, plan.query.count_sql().sql))
}

/// The WHERE clause the filters of a `test_table` listing compile to.
pub fn where_clause(pairs: &[(&str, &str)]) -> String {
    let (_, count) = translate_listing(pairs).unwrap();
    match count.split_once(" WHERE ") {
        Some((_, predicate)) => predicate.to_string(),
        None => String::new(),
    }
}
