//! Translate single-record operations.
//!
//! Values reach the database as one JSON document, expanded with
//! `jsonb_populate_record` into a record of the table's row type, so the database
//! performs every type conversion.

use std::collections::BTreeMap;

use query_engine_metadata::metadata;
use query_engine_sql::sql;

use crate::translation::error::Error;
use crate::translation::helpers::{Env, TableNameAndReference};

/// The alias the primary key of an inserted record is returned under.
pub const INSERTED_ID: &str = "id";

/// Select one record by primary key, as a JSON object.
pub fn get_one(
    tables_info: &metadata::TablesInfo,
    collection: &str,
    id: i64,
) -> Result<sql::execution_plan::ExecutionPlan<sql::ast::Select>, Error> {
    let env = Env::new(tables_info);
    let current_table = env.lookup_collection(collection)?;

    let mut select = sql::helpers::simple_select(current_table.projection());
    select.from = Some(current_table.from_clause());
    select.where_ = sql::ast::Where(current_table.primary_key_equals(id));

    Ok(sql::execution_plan::simple_exec_plan(
        collection.to_string(),
        sql::helpers::select_row(select),
    ))
}

/// Insert one record from the fields of `payload` that are columns of the collection,
/// returning its primary key as `int8`.
pub fn insert_one(
    tables_info: &metadata::TablesInfo,
    collection: &str,
    payload: &serde_json::Map<String, serde_json::Value>,
) -> Result<sql::execution_plan::ExecutionPlan<sql::execution_plan::Mutation>, Error> {
    let env = Env::new(tables_info);
    let current_table = env.lookup_collection(collection)?;

    let columns = present_columns(&current_table, payload);

    let from = if columns.is_empty() {
        sql::ast::InsertFrom::DefaultValues
    } else {
        let mut select = sql::helpers::simple_select(
            columns
                .iter()
                .map(|column| {
                    sql::helpers::make_column(
                        payload_reference(),
                        column.clone(),
                        sql::helpers::make_column_alias(column.0.clone()),
                    )
                })
                .collect(),
        );
        select.from = Some(populate_payload(&current_table, payload));
        sql::ast::InsertFrom::Select(select)
    };

    let db_table = sql::ast::TableReference::DBTable {
        schema: current_table.schema_name(),
        table: current_table.table_name(),
    };
    let returning = sql::ast::Returning(sql::ast::SelectList::SelectList(vec![(
        sql::helpers::make_column_alias(INSERTED_ID.to_string()),
        sql::helpers::cast(
            sql::helpers::column_expr(
                db_table,
                sql::ast::ColumnName(current_table.info.primary_key.clone()),
            ),
            "int8",
        ),
    )]));

    Ok(sql::execution_plan::simple_exec_plan(
        collection.to_string(),
        sql::execution_plan::Mutation::Insert(sql::ast::Insert {
            schema: current_table.schema_name(),
            table: current_table.table_name(),
            columns,
            from,
            returning,
        }),
    ))
}

/// Set the columns present in `payload` on one record. Fields that are absent are left
/// alone and fields that are null are set to NULL. Returns `None` when there is nothing to set.
pub fn update_one(
    tables_info: &metadata::TablesInfo,
    collection: &str,
    id: i64,
    payload: &serde_json::Map<String, serde_json::Value>,
) -> Result<Option<sql::execution_plan::ExecutionPlan<sql::execution_plan::Mutation>>, Error> {
    let env = Env::new(tables_info);
    let current_table = env.lookup_collection(collection)?;

    let set: BTreeMap<sql::ast::ColumnName, sql::ast::Expression> =
        present_columns(&current_table, payload)
            .into_iter()
            .map(|column| {
                let value = sql::helpers::column_expr(payload_reference(), column.clone());
                (column, value)
            })
            .collect();

    if set.is_empty() {
        return Ok(None);
    }

    Ok(Some(sql::execution_plan::simple_exec_plan(
        collection.to_string(),
        sql::execution_plan::Mutation::Update(sql::ast::Update {
            schema: current_table.schema_name(),
            table: current_table.table_name(),
            alias: sql::helpers::make_table_alias(collection.to_string()),
            set,
            from: Some(populate_payload(&current_table, payload)),
            where_: sql::ast::Where(current_table.primary_key_equals(id)),
        }),
    )))
}

/// Delete one record by primary key.
pub fn delete_one(
    tables_info: &metadata::TablesInfo,
    collection: &str,
    id: i64,
) -> Result<sql::execution_plan::ExecutionPlan<sql::execution_plan::Mutation>, Error> {
    let env = Env::new(tables_info);
    let current_table = env.lookup_collection(collection)?;
    let primary_key = current_table.info.primary_key.clone();
    delete_matching(tables_info, collection, &[(primary_key.as_str(), id)])
}

/// Delete the records whose integer columns equal the given values.
pub fn delete_matching(
    tables_info: &metadata::TablesInfo,
    collection: &str,
    matching: &[(&str, i64)],
) -> Result<sql::execution_plan::ExecutionPlan<sql::execution_plan::Mutation>, Error> {
    let env = Env::new(tables_info);
    let current_table = env.lookup_collection(collection)?;

    let conditions = matching
        .iter()
        .map(|(column, value)| {
            if current_table.info.column(column).is_none() {
                return Err(Error::ColumnNotFoundInCollection(
                    (*column).to_string(),
                    collection.to_string(),
                ));
            }
            Ok(sql::helpers::equals(
                current_table.column(column),
                sql::ast::Expression::Value(sql::ast::Value::Int8(*value)),
            ))
        })
        .collect::<Result<Vec<_>, Error>>()?;

    Ok(sql::execution_plan::simple_exec_plan(
        collection.to_string(),
        sql::execution_plan::Mutation::Delete(sql::ast::Delete {
            from: current_table.from_clause(),
            where_: sql::ast::Where(sql::helpers::conjunction(conditions)),
        }),
    ))
}

/// The registered columns that appear in the payload, in registry order.
fn present_columns(
    current_table: &TableNameAndReference,
    payload: &serde_json::Map<String, serde_json::Value>,
) -> Vec<sql::ast::ColumnName> {
    current_table
        .info
        .columns
        .keys()
        .filter(|column| payload.contains_key(column.as_str()))
        .map(|column| sql::ast::ColumnName(column.clone()))
        .collect()
}

fn payload_reference() -> sql::ast::TableReference {
    sql::ast::TableReference::AliasedTable(sql::helpers::make_table_alias(
        sql::helpers::PAYLOAD_ALIAS.to_string(),
    ))
}

fn populate_payload(
    current_table: &TableNameAndReference,
    payload: &serde_json::Map<String, serde_json::Value>,
) -> sql::ast::From {
    sql::helpers::populate_record(
        &current_table.schema_name(),
        &current_table.table_name(),
        serde_json::Value::Object(payload.clone()),
    )
}
