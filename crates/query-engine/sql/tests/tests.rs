use std::collections::BTreeMap;

use query_engine_sql::sql::ast::*;
use query_engine_sql::sql::execution_plan::{select_to_sql, Mutation};
use query_engine_sql::sql::helpers;
use query_engine_sql::sql::string::{Param, SQL};

fn groups_table() -> From {
    From::Table {
        reference: TableReference::DBTable {
            schema: SchemaName("public".to_string()),
            table: TableName("groups".to_string()),
        },
        alias: helpers::make_table_alias("groups".to_string()),
    }
}

fn groups_column(name: &str) -> Expression {
    helpers::column_expr(
        TableReference::AliasedTable(helpers::make_table_alias("groups".to_string())),
        ColumnName(name.to_string()),
    )
}

#[test]
fn it_converts_simple_select() {
    let mut select = helpers::simple_select(vec![(
        helpers::make_column_alias("name".to_string()),
        groups_column("name"),
    )]);
    select.from = Some(groups_table());
    assert_eq!(
        select_to_sql(&select),
        SQL {
            sql: "SELECT \"groups\".\"name\" AS \"name\" FROM \"public\".\"groups\" AS \"groups\""
                .to_string(),
            params: vec![],
            param_index: 0,
        }
    );
}

#[test]
fn it_converts_filtered_ordered_page() {
    let mut select = helpers::simple_select(vec![(
        helpers::make_column_alias("name".to_string()),
        groups_column("name"),
    )]);
    select.from = Some(groups_table());
    select.where_ = Where(helpers::equals(
        groups_column("name"),
        Expression::Value(Value::String("it's".to_string())),
    ));
    select.order_by = OrderBy {
        elements: vec![OrderByElement {
            target: groups_column("name"),
            direction: OrderByDirection::Desc,
        }],
    };
    select.limit = Limit {
        limit: Some(10),
        offset: Some(20),
    };

    insta::assert_snapshot!(
        select_to_sql(&select).sql,
        @r#"SELECT "groups"."name" AS "name" FROM "public"."groups" AS "groups" WHERE ("groups"."name" = 'it''s') ORDER BY "groups"."name" DESC LIMIT 10 OFFSET 20"#
    );
}

#[test]
fn it_wraps_rows_in_a_json_array() {
    let mut select = helpers::simple_select(vec![(
        helpers::make_column_alias("id".to_string()),
        groups_column("id"),
    )]);
    select.from = Some(groups_table());

    insta::assert_snapshot!(
        select_to_sql(&helpers::select_rowset(select)).sql,
        @r#"SELECT coalesce(json_agg(row_to_json("rows")), '[]') AS "rows" FROM (SELECT "groups"."id" AS "id" FROM "public"."groups" AS "groups") AS "rows""#
    );
}

#[test]
fn it_converts_a_count() {
    let select = helpers::select_count(
        groups_table(),
        Expression::UnaryOperation {
            expression: Box::new(groups_column("unix_gid")),
            operator: UnaryOperator::IsNotNull,
        },
    );

    insta::assert_snapshot!(
        select_to_sql(&select).sql,
        @r#"SELECT COUNT(*) AS "count" FROM "public"."groups" AS "groups" WHERE ("groups"."unix_gid" IS NOT NULL)"#
    );
}

#[test]
fn it_converts_an_insert_from_a_json_payload() {
    let schema = SchemaName("public".to_string());
    let table = TableName("groups".to_string());
    let payload_alias = TableReference::AliasedTable(helpers::make_table_alias(
        helpers::PAYLOAD_ALIAS.to_string(),
    ));

    let mut select = helpers::simple_select(vec![(
        helpers::make_column_alias("name".to_string()),
        helpers::column_expr(payload_alias, ColumnName("name".to_string())),
    )]);
    select.from = Some(helpers::populate_record(
        &schema,
        &table,
        serde_json::json!({"name": "physics"}),
    ));

    let insert = Mutation::Insert(Insert {
        schema,
        table,
        columns: vec![ColumnName("name".to_string())],
        from: InsertFrom::Select(select),
        returning: Returning(SelectList::SelectList(vec![(
            helpers::make_column_alias("id".to_string()),
            helpers::cast(groups_column("id"), "int8"),
        )])),
    });

    let sql = insert.query_sql();
    insta::assert_snapshot!(
        sql.sql,
        @r#"INSERT INTO "public"."groups"("name") SELECT "payload"."name" AS "name" FROM jsonb_populate_record(CAST(NULL AS "public"."groups"), $1) AS "payload" RETURNING CAST("groups"."id" AS "int8") AS "id""#
    );
    assert_eq!(
        sql.params,
        vec![Param::Value(serde_json::json!({"name": "physics"}))]
    );
}

#[test]
fn it_converts_an_insert_of_default_values() {
    let insert = Mutation::Insert(Insert {
        schema: SchemaName("public".to_string()),
        table: TableName("submit_nodes".to_string()),
        columns: vec![],
        from: InsertFrom::DefaultValues,
        returning: Returning(SelectList::Select1),
    });

    insta::assert_snapshot!(
        insert.query_sql().sql,
        @r#"INSERT INTO "public"."submit_nodes" DEFAULT VALUES RETURNING 1"#
    );
}

#[test]
fn it_converts_an_update() {
    let schema = SchemaName("public".to_string());
    let table = TableName("groups".to_string());
    let payload_alias = TableReference::AliasedTable(helpers::make_table_alias(
        helpers::PAYLOAD_ALIAS.to_string(),
    ));

    let mut set = BTreeMap::new();
    for column in ["unix_gid", "name"] {
        set.insert(
            ColumnName(column.to_string()),
            helpers::column_expr(payload_alias.clone(), ColumnName(column.to_string())),
        );
    }

    let update = Mutation::Update(Update {
        alias: helpers::make_table_alias("groups".to_string()),
        from: Some(helpers::populate_record(
            &schema,
            &table,
            serde_json::json!({"name": "chemistry", "unix_gid": null}),
        )),
        schema,
        table,
        set,
        where_: Where(helpers::equals(
            groups_column("id"),
            Expression::Value(Value::Int8(3)),
        )),
    });

    insta::assert_snapshot!(
        update.query_sql().sql,
        @r#"UPDATE "public"."groups" AS "groups" SET "name" = "payload"."name", "unix_gid" = "payload"."unix_gid" FROM jsonb_populate_record(CAST(NULL AS "public"."groups"), $1) AS "payload" WHERE ("groups"."id" = 3)"#
    );
}

#[test]
fn it_converts_a_delete() {
    let delete = Mutation::Delete(Delete {
        from: groups_table(),
        where_: Where(helpers::equals(
            groups_column("id"),
            Expression::Value(Value::Int8(3)),
        )),
    });

    insta::assert_snapshot!(
        delete.query_sql().sql,
        @r#"DELETE FROM "public"."groups" AS "groups" WHERE ("groups"."id" = 3)"#
    );
}

#[test]
fn it_converts_the_multiple_values_projection() {
    let cell = helpers::cast(groups_column("name"), "varchar");
    let projection = Expression::Case {
        whens: vec![(
            Expression::BinaryOperation {
                left: Box::new(Expression::Count(CountType::Distinct(Box::new(
                    cell.clone(),
                )))),
                operator: BinaryOperator::GreaterThan,
                right: Box::new(Expression::Value(Value::Int8(5))),
            },
            Expression::Value(Value::String("Multiple Values".to_string())),
        )],
        else_: Box::new(Expression::AggregateFunctionCall {
            function: Function::StringAgg,
            distinct: true,
            args: vec![cell, Expression::Value(Value::String(",".to_string()))],
        }),
    };

    let mut sql = SQL::new();
    projection.to_sql(&mut sql);
    insta::assert_snapshot!(
        sql.sql,
        @r#"CASE WHEN (COUNT(DISTINCT CAST("groups"."name" AS "varchar")) > 5) THEN 'Multiple Values' ELSE string_agg(DISTINCT CAST("groups"."name" AS "varchar"), ',') END"#
    );
}
