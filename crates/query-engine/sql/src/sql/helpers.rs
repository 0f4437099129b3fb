//! Helpers for building sql::ast types in certain shapes and patterns.

use super::ast::*;

/// The alias of the subquery a page of rows is selected from,
/// and of the JSON column the rows are returned in.
pub const ROWS_ALIAS: &str = "rows";

/// The alias of the single JSON column a record is returned in.
pub const ROW_ALIAS: &str = "row";

/// The alias under which write payloads are expanded into a record.
pub const PAYLOAD_ALIAS: &str = "payload";

// Empty clauses //

/// An empty `WHERE` clause.
pub fn empty_where() -> Expression {
    true_expr()
}

/// An empty `GROUP BY` clause.
pub fn empty_group_by() -> GroupBy {
    GroupBy { elements: vec![] }
}

/// An empty `ORDER BY` clause.
pub fn empty_order_by() -> OrderBy {
    OrderBy { elements: vec![] }
}

/// Empty `LIMIT` and `OFFSET` clauses.
pub fn empty_limit() -> Limit {
    Limit {
        limit: None,
        offset: None,
    }
}

/// A `true` expression.
pub fn true_expr() -> Expression {
    Expression::Value(Value::Bool(true))
}

/// A `false` expression.
pub fn false_expr() -> Expression {
    Expression::Value(Value::Bool(false))
}

// Boolean combinators //

/// Join expressions with `AND`, left to right. No expressions means no restriction.
pub fn conjunction(expressions: Vec<Expression>) -> Expression {
    expressions
        .into_iter()
        .reduce(|left, right| Expression::And {
            left: Box::new(left),
            right: Box::new(right),
        })
        .unwrap_or_else(true_expr)
}

/// Join expressions with `OR`, left to right. No expressions matches nothing.
pub fn disjunction(expressions: Vec<Expression>) -> Expression {
    expressions
        .into_iter()
        .reduce(|left, right| Expression::Or {
            left: Box::new(left),
            right: Box::new(right),
        })
        .unwrap_or_else(false_expr)
}

/// `left = right`
pub fn equals(left: Expression, right: Expression) -> Expression {
    Expression::BinaryOperation {
        left: Box::new(left),
        operator: BinaryOperator::Equals,
        right: Box::new(right),
    }
}

// Aliasing //

/// Generate a column expression refering to a specific table.
pub fn make_column(
    table: TableReference,
    name: ColumnName,
    alias: ColumnAlias,
) -> (ColumnAlias, Expression) {
    (alias, column_expr(table, name))
}

/// A reference to a column of a table, as an expression.
pub fn column_expr(table: TableReference, name: ColumnName) -> Expression {
    Expression::ColumnReference(ColumnReference::TableColumn { table, name })
}

/// Create column aliases using this function so we build everything in one place.
pub fn make_column_alias(name: String) -> ColumnAlias {
    ColumnAlias { name }
}

/// Create table aliases using this function so we build everything in one place.
pub fn make_table_alias(name: String) -> TableAlias {
    TableAlias { name }
}

/// `CAST(expression AS "type_name")`
pub fn cast(expression: Expression, type_name: &str) -> Expression {
    Expression::Cast {
        expression: Box::new(expression),
        r#type: ScalarType::BaseType(ScalarTypeName::Unqualified(type_name.to_string())),
    }
}

// SELECTs //

/// Build a simple select with a select list and the rest are empty.
pub fn simple_select(select_list: Vec<(ColumnAlias, Expression)>) -> Select {
    Select {
        select_list: SelectList::SelectList(select_list),
        from: None,
        where_: Where(empty_where()),
        group_by: empty_group_by(),
        order_by: empty_order_by(),
        limit: empty_limit(),
    }
}

/// Build a `SELECT 1 FROM ... WHERE ...`, the shape used inside `EXISTS`.
pub fn select_one(from: From, where_: Expression) -> Select {
    Select {
        select_list: SelectList::Select1,
        from: Some(from),
        where_: Where(where_),
        group_by: empty_group_by(),
        order_by: empty_order_by(),
        limit: empty_limit(),
    }
}

/// Wrap a select so that its rows come back as a single JSON array:
///
/// > SELECT coalesce(json_agg(row_to_json("rows")), '[]') AS "rows"
/// > FROM (<select>) AS "rows"
///
/// An empty page yields `[]` rather than `NULL`.
pub fn select_rowset(select: Select) -> Select {
    let rows_alias = make_table_alias(ROWS_ALIAS.to_string());

    let json_rows = Expression::FunctionCall {
        function: Function::Coalesce,
        args: vec![
            Expression::FunctionCall {
                function: Function::JsonAgg,
                args: vec![Expression::RowToJson(TableReference::AliasedTable(
                    rows_alias.clone(),
                ))],
            },
            Expression::Value(Value::EmptyJsonArray),
        ],
    };

    let mut final_select =
        simple_select(vec![(make_column_alias(ROWS_ALIAS.to_string()), json_rows)]);
    final_select.from = Some(From::Select {
        select: Box::new(select),
        alias: rows_alias,
    });
    final_select
}

/// Wrap a select so that each of its rows comes back as one JSON object:
///
/// > SELECT row_to_json("rows") AS "row" FROM (<select>) AS "rows"
pub fn select_row(select: Select) -> Select {
    let rows_alias = make_table_alias(ROWS_ALIAS.to_string());

    let mut final_select = simple_select(vec![(
        make_column_alias(ROW_ALIAS.to_string()),
        Expression::RowToJson(TableReference::AliasedTable(rows_alias.clone())),
    )]);
    final_select.from = Some(From::Select {
        select: Box::new(select),
        alias: rows_alias,
    });
    final_select
}

/// `SELECT COUNT(*) AS "count" FROM <from> WHERE <where_>`
pub fn select_count(from: From, where_: Expression) -> Select {
    let mut select = simple_select(vec![(
        make_column_alias("count".to_string()),
        Expression::Count(CountType::Star),
    )]);
    select.from = Some(from);
    select.where_ = Where(where_);
    select
}

/// Expand a JSON document into a record of a table's row type:
///
/// > jsonb_populate_record(CAST(NULL AS "schema"."table"), $1) AS "payload"
pub fn populate_record(
    schema: &SchemaName,
    table: &TableName,
    payload: serde_json::Value,
) -> From {
    From::FunctionCall {
        function: Function::JsonbPopulateRecord,
        args: vec![
            Expression::Cast {
                expression: Box::new(Expression::Value(Value::Null)),
                r#type: ScalarType::BaseType(ScalarTypeName::Qualified {
                    schema_name: schema.clone(),
                    type_name: table.0.clone(),
                }),
            },
            Expression::Value(Value::JsonValue(payload)),
        ],
        alias: make_table_alias(PAYLOAD_ALIAS.to_string()),
    }
}
