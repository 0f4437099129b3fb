//! Handle ordering and grouping translation.

use query_engine_sql::sql;

use super::parse::{OrderDirection, ParsedQuery};
use crate::translation::helpers::TableNameAndReference;

/// Convert the order directives of a request to an ORDER BY clause, in the order the
/// parameters were supplied. A group directive suppresses ordering altogether.
pub fn translate_order_by(
    current_table: &TableNameAndReference,
    parsed: &ParsedQuery,
) -> sql::ast::OrderBy {
    if parsed.group_by.is_some() {
        return sql::helpers::empty_order_by();
    }

    sql::ast::OrderBy {
        elements: parsed
            .order_by
            .iter()
            .map(|directive| sql::ast::OrderByElement {
                target: current_table.column(&directive.column.name),
                direction: match directive.direction {
                    OrderDirection::Asc => sql::ast::OrderByDirection::Asc,
                    OrderDirection::Desc => sql::ast::OrderByDirection::Desc,
                },
            })
            .collect(),
    }
}

/// Convert the group directive of a request, if any, to a GROUP BY clause.
pub fn translate_group_by(
    current_table: &TableNameAndReference,
    parsed: &ParsedQuery,
) -> sql::ast::GroupBy {
    match &parsed.group_by {
        None => sql::helpers::empty_group_by(),
        Some(directive) => sql::ast::GroupBy {
            elements: vec![current_table.column(&directive.column.name)],
        },
    }
}
