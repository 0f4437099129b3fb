//! Handle filtering/where clauses translation.

use query_engine_sql::sql;

use super::parse::{FilterClause, Operator, ParsedQuery};
use crate::translation::helpers::TableNameAndReference;

/// Translate the filter clauses and `or` groups of a request to boolean expressions,
/// one per simple clause and one per `or` group. The caller ANDs them.
pub fn translate_clauses(
    current_table: &TableNameAndReference,
    parsed: &ParsedQuery,
) -> Vec<sql::ast::Expression> {
    let simple = parsed
        .clauses
        .iter()
        .map(|clause| translate_clause(current_table, clause));

    let or_groups = parsed.or_groups.iter().map(|group| {
        sql::helpers::disjunction(
            group
                .iter()
                .map(|clause| translate_clause(current_table, clause))
                .collect(),
        )
    });

    simple.chain(or_groups).collect()
}

/// Translate a single clause. Negation picks the negated form of the operator.
pub fn translate_clause(
    current_table: &TableNameAndReference,
    clause: &FilterClause,
) -> sql::ast::Expression {
    let column = current_table.column(&clause.column.name);

    match &clause.operator {
        Operator::Eq(literal) => sql::ast::Expression::BinaryOperation {
            left: Box::new(column),
            operator: if clause.negate {
                sql::ast::BinaryOperator::NotEquals
            } else {
                sql::ast::BinaryOperator::Equals
            },
            right: Box::new(string_literal(literal)),
        },
        Operator::Like(pattern) => {
            // non-text columns are matched on their text representation.
            let target = if clause.column.r#type.is_textual() {
                column
            } else {
                sql::helpers::cast(column, "varchar")
            };
            sql::ast::Expression::BinaryOperation {
                left: Box::new(target),
                operator: if clause.negate {
                    sql::ast::BinaryOperator::NotLike
                } else {
                    sql::ast::BinaryOperator::Like
                },
                right: Box::new(string_literal(&like_pattern(pattern))),
            }
        }
        Operator::IsNull => unary(
            column,
            if clause.negate {
                sql::ast::UnaryOperator::IsNotNull
            } else {
                sql::ast::UnaryOperator::IsNull
            },
        ),
        Operator::IsTrue => unary(
            column,
            if clause.negate {
                sql::ast::UnaryOperator::IsNotTrue
            } else {
                sql::ast::UnaryOperator::IsTrue
            },
        ),
        Operator::IsFalse => unary(
            column,
            if clause.negate {
                sql::ast::UnaryOperator::IsNotFalse
            } else {
                sql::ast::UnaryOperator::IsFalse
            },
        ),
    }
}

/// A pattern without wildcards is a substring search.
pub fn like_pattern(pattern: &str) -> String {
    if pattern.contains('%') {
        pattern.to_string()
    } else {
        format!("%{pattern}%")
    }
}

fn string_literal(value: &str) -> sql::ast::Expression {
    sql::ast::Expression::Value(sql::ast::Value::String(value.to_string()))
}

fn unary(
    expression: sql::ast::Expression,
    operator: sql::ast::UnaryOperator,
) -> sql::ast::Expression {
    sql::ast::Expression::UnaryOperation {
        expression: Box::new(expression),
        operator,
    }
}
