//! Helpers for processing requests and building SQL.

use query_engine_metadata::metadata;
use query_engine_sql::sql;

use super::error::Error;

#[derive(Debug)]
/// Static information from the registry.
pub struct Env<'a> {
    tables_info: &'a metadata::TablesInfo,
}

#[derive(Debug, Clone, PartialEq)]
/// A collection's table, and the alias we refer to it by in the generated query.
pub struct TableNameAndReference<'a> {
    /// Name of the collection.
    pub name: String,
    /// Columns and location of the table.
    pub info: &'a metadata::TableInfo,
    /// Alias the table is referenced by.
    pub reference: sql::ast::TableReference,
}

impl<'a> Env<'a> {
    /// Create a new Env by supplying the registry.
    pub fn new(tables_info: &'a metadata::TablesInfo) -> Env<'a> {
        Env { tables_info }
    }

    /// Lookup a collection's table and alias it by the collection's name.
    pub fn lookup_collection(&self, collection: &str) -> Result<TableNameAndReference<'a>, Error> {
        let info = self
            .tables_info
            .get(collection)
            .ok_or_else(|| Error::CollectionNotFound(collection.to_string()))?;

        Ok(TableNameAndReference {
            name: collection.to_string(),
            info,
            reference: sql::ast::TableReference::AliasedTable(sql::helpers::make_table_alias(
                collection.to_string(),
            )),
        })
    }
}

impl TableNameAndReference<'_> {
    /// `"schema"."table" AS "collection"`
    pub fn from_clause(&self) -> sql::ast::From {
        sql::ast::From::Table {
            reference: sql::ast::TableReference::DBTable {
                schema: self.schema_name(),
                table: self.table_name(),
            },
            alias: sql::helpers::make_table_alias(self.name.clone()),
        }
    }

    pub fn schema_name(&self) -> sql::ast::SchemaName {
        sql::ast::SchemaName(self.info.schema_name.clone())
    }

    pub fn table_name(&self) -> sql::ast::TableName {
        sql::ast::TableName(self.info.table_name.clone())
    }

    /// A column of this table, through its alias.
    pub fn column(&self, column: &str) -> sql::ast::Expression {
        sql::helpers::column_expr(
            self.reference.clone(),
            sql::ast::ColumnName(column.to_string()),
        )
    }

    /// Every registered column under its own name, in registry order.
    pub fn projection(&self) -> Vec<(sql::ast::ColumnAlias, sql::ast::Expression)> {
        self.info
            .columns
            .values()
            .map(|column_info| {
                sql::helpers::make_column(
                    self.reference.clone(),
                    sql::ast::ColumnName(column_info.name.clone()),
                    sql::helpers::make_column_alias(column_info.name.clone()),
                )
            })
            .collect()
    }

    /// `"collection"."<primary key>" = <id>`
    pub fn primary_key_equals(&self, id: i64) -> sql::ast::Expression {
        sql::helpers::equals(
            self.column(&self.info.primary_key),
            sql::ast::Expression::Value(sql::ast::Value::Int8(id)),
        )
    }
}
