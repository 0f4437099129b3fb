//! Handle the projection of grouped listings.

use query_engine_sql::sql;

use super::parse::GroupDirective;
use crate::translation::helpers::TableNameAndReference;

/// Shown instead of the values of a column when a group has too many of them.
pub const MULTIPLE_VALUES: &str = "Multiple Values";

/// Above this many distinct values in a group, a column shows [`MULTIPLE_VALUES`].
pub const DISTINCT_VALUES_THRESHOLD: i64 = 5;

const VALUES_SEPARATOR: &str = ",";

/// Build the select list of a grouped listing. The group column is projected as is,
/// every other column is folded into its distinct values joined with commas, or the
/// [`MULTIPLE_VALUES`] marker. Columns keep their registry order.
pub fn translate_group_projection(
    current_table: &TableNameAndReference,
    group_by: &GroupDirective,
) -> Vec<(sql::ast::ColumnAlias, sql::ast::Expression)> {
    current_table
        .info
        .columns
        .values()
        .map(|column_info| {
            let alias = sql::helpers::make_column_alias(column_info.name.clone());
            let column = current_table.column(&column_info.name);
            if column_info.name == group_by.column.name {
                (alias, column)
            } else {
                (alias, fold_values(column))
            }
        })
        .collect()
}

/// > CASE WHEN (COUNT(DISTINCT CAST(c AS "varchar")) > 5) THEN 'Multiple Values'
/// > ELSE string_agg(DISTINCT CAST(c AS "varchar"), ',') END
fn fold_values(column: sql::ast::Expression) -> sql::ast::Expression {
    let text = sql::helpers::cast(column, "varchar");

    let too_many = sql::ast::Expression::BinaryOperation {
        left: Box::new(sql::ast::Expression::Count(sql::ast::CountType::Distinct(
            Box::new(text.clone()),
        ))),
        operator: sql::ast::BinaryOperator::GreaterThan,
        right: Box::new(sql::ast::Expression::Value(sql::ast::Value::Int8(
            DISTINCT_VALUES_THRESHOLD,
        ))),
    };

    let joined = sql::ast::Expression::AggregateFunctionCall {
        function: sql::ast::Function::StringAgg,
        distinct: true,
        args: vec![
            text,
            sql::ast::Expression::Value(sql::ast::Value::String(VALUES_SEPARATOR.to_string())),
        ],
    };

    sql::ast::Expression::Case {
        whens: vec![(
            too_many,
            sql::ast::Expression::Value(sql::ast::Value::String(MULTIPLE_VALUES.to_string())),
        )],
        else_: Box::new(joined),
    }
}
