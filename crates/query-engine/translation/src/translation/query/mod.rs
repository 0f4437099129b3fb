//! Translate the query parameters of a listing.

pub mod aggregates;
pub mod filtering;
pub mod parse;
pub mod root;
pub mod sorting;

use query_engine_metadata::metadata;
use query_engine_sql::sql;

use crate::translation::error::Error;
use crate::translation::helpers::Env;

/// Translate the query parameters of a listing to an ExecutionPlan (SQL) to be run against the database.
///
/// Paging is validated before anything else, so a bad page is reported even when the
/// filters are malformed too.
pub fn translate(
    tables_info: &metadata::TablesInfo,
    collection: &str,
    restriction: Option<&root::Restriction>,
    params: &[(String, String)],
) -> Result<sql::execution_plan::ExecutionPlan<sql::execution_plan::ListQuery>, Error> {
    let page = root::PageRequest::from_params(params)?;

    let env = Env::new(tables_info);
    let current_table = env.lookup_collection(collection)?;

    let parsed = parse::parse_query(current_table.info, collection, params)?;

    let list_query = root::translate_rows_query(&env, &current_table, restriction, &parsed, page)?;

    tracing::debug!(collection, "SQL AST: {:?}", list_query);
    Ok(sql::execution_plan::simple_exec_plan(
        collection.to_string(),
        list_query,
    ))
}
