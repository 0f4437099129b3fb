//! Execute a listing's execution plan against the database.

use sqlx::Row;
use tracing::{info_span, Instrument};

use query_engine_sql::sql;

use crate::error::Error;
use crate::metrics;

/// A page of a listing together with the number of rows matching its filter.
#[derive(Debug, Clone, PartialEq)]
pub struct ListResult {
    /// The rows of the page, as a JSON array.
    pub rows: serde_json::Value,
    /// The number of rows the filter matches, regardless of paging.
    pub total_count: i64,
}

/// Execute a listing: the page query, then the count query, on the same connection.
pub async fn execute(
    connection: &mut sqlx::PgConnection,
    metrics: &metrics::Metrics,
    plan: sql::execution_plan::ExecutionPlan<sql::execution_plan::ListQuery>,
) -> Result<ListResult, Error> {
    let rows_query = plan.query.rows_sql();
    let count_query = plan.query.count_sql();

    let rows: serde_json::Value = async {
        tracing::debug!(
            collection = plan.root_field,
            generated_sql = rows_query.sql,
            params = ?&rows_query.params,
        );
        let row = build_query_with_params(&rows_query)
            .fetch_one(&mut *connection)
            .await?;
        Ok::<serde_json::Value, Error>(row.try_get(0)?)
    }
    .instrument(info_span!("Fetch rows", collection = plan.root_field))
    .await?;

    let total_count: i64 = async {
        tracing::debug!(
            collection = plan.root_field,
            generated_sql = count_query.sql,
            params = ?&count_query.params,
        );
        let row = build_query_with_params(&count_query)
            .fetch_one(&mut *connection)
            .await?;
        Ok::<i64, Error>(row.try_get(0)?)
    }
    .instrument(info_span!("Count rows", collection = plan.root_field))
    .await?;

    metrics.list_queries_total.inc();

    Ok(ListResult { rows, total_count })
}

/// Create a SQLx query based on our SQL query and bind our parameters to it.
pub(crate) fn build_query_with_params(
    query: &sql::string::SQL,
) -> sqlx::query::Query<'_, sqlx::Postgres, sqlx::postgres::PgArguments> {
    query
        .params
        .iter()
        .fold(sqlx::query(query.sql.as_str()), |sqlx_query, param| {
            match param {
                sql::string::Param::Value(value) => sqlx_query.bind(value),
            }
        })
}
