//! Parse the filter, ordering and grouping directives of a listing's query parameters.
//!
//! Each parameter is a `(key, value)` pair. Simple keys name a column:
//!
//! > value := ["not."] ( "eq." literal | "like." pattern | "is." ("null" | "true" | "false") )
//! >        | "order_by." ("asc" | "desc")
//! >        | "group_by"
//!
//! The `or` key carries a parenthesised, comma separated list of `column.value`
//! clauses, without ordering or grouping.

use query_engine_metadata::metadata;

use crate::translation::error::Error;

/// Keys that are never column names.
pub const RESERVED_KEYS: [&str; 3] = ["page", "page_size", "or"];

const OR_KEY: &str = "or";

/// A filter operator together with its operand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operator {
    Eq(String),
    Like(String),
    IsNull,
    IsTrue,
    IsFalse,
}

/// One filter condition on one column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterClause {
    pub column: metadata::ColumnInfo,
    pub negate: bool,
    pub operator: Operator,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderDirection {
    Asc,
    Desc,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderDirective {
    pub column: metadata::ColumnInfo,
    pub direction: OrderDirection,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupDirective {
    pub column: metadata::ColumnInfo,
}

/// Everything a listing's parameters ask for, apart from paging.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ParsedQuery {
    /// Clauses from simple keys. These are ANDed.
    pub clauses: Vec<FilterClause>,
    /// One entry per `or` parameter. The clauses of an entry are ORed,
    /// and the entries are ANDed with `clauses`.
    pub or_groups: Vec<Vec<FilterClause>>,
    /// In the order the parameters were supplied.
    pub order_by: Vec<OrderDirective>,
    pub group_by: Option<GroupDirective>,
}

/// What the value of a simple key asks for.
enum Directive {
    Filter(FilterClause),
    Order(OrderDirection),
    Group,
}

/// Parse the query parameters of a listing against the collection's columns.
///
/// Simple keys that are not columns of the collection are ignored, while an
/// unknown column inside an `or` group is an error.
pub fn parse_query(
    table_info: &metadata::TableInfo,
    collection: &str,
    params: &[(String, String)],
) -> Result<ParsedQuery, Error> {
    let mut parsed = ParsedQuery::default();

    for (key, value) in params {
        if key == OR_KEY {
            parsed
                .or_groups
                .push(parse_or_group(table_info, collection, value)?);
            continue;
        }
        if RESERVED_KEYS.contains(&key.as_str()) {
            continue;
        }
        let Some(column) = table_info.column(key) else {
            tracing::debug!(key, collection, "ignoring parameter for unknown column");
            continue;
        };

        match parse_directive(column, value)? {
            Directive::Filter(clause) => parsed.clauses.push(clause),
            Directive::Order(direction) => parsed.order_by.push(OrderDirective {
                column: column.clone(),
                direction,
            }),
            Directive::Group => {
                parsed.group_by = Some(GroupDirective {
                    column: column.clone(),
                });
            }
        }
    }

    Ok(parsed)
}

fn parse_directive(column: &metadata::ColumnInfo, value: &str) -> Result<Directive, Error> {
    if value == "group_by" {
        return Ok(Directive::Group);
    }
    if let Some(direction) = value.strip_prefix("order_by.") {
        return match direction {
            "asc" => Ok(Directive::Order(OrderDirection::Asc)),
            "desc" => Ok(Directive::Order(OrderDirection::Desc)),
            _ => Err(unsupported_operator(column, value)),
        };
    }
    parse_filter(column, value).map(Directive::Filter)
}

/// Parse `["not."] operator` for a column.
pub fn parse_filter(column: &metadata::ColumnInfo, value: &str) -> Result<FilterClause, Error> {
    let (negate, rest) = match value.strip_prefix("not.") {
        Some(rest) => (true, rest),
        None => (false, value),
    };

    let operator = if let Some(literal) = rest.strip_prefix("eq.") {
        Operator::Eq(decode_operand(literal))
    } else if let Some(pattern) = rest.strip_prefix("like.") {
        Operator::Like(decode_operand(pattern))
    } else {
        match rest {
            "is.null" => Operator::IsNull,
            "is.true" => Operator::IsTrue,
            "is.false" => Operator::IsFalse,
            _ => return Err(unsupported_operator(column, value)),
        }
    };

    Ok(FilterClause {
        column: column.clone(),
        negate,
        operator,
    })
}

/// Parse the value of an `or` parameter: `(column.value,column.value,...)`.
pub fn parse_or_group(
    table_info: &metadata::TableInfo,
    collection: &str,
    value: &str,
) -> Result<Vec<FilterClause>, Error> {
    let inner = value
        .strip_prefix('(')
        .and_then(|rest| rest.strip_suffix(')'))
        .filter(|inner| !inner.contains('(') && !inner.contains(')'))
        .ok_or_else(|| Error::OrGroupNotParenthesised(value.to_string()))?;

    inner
        .split(',')
        .map(|clause| {
            let (column_name, rest) = clause
                .split_once('.')
                .filter(|(column_name, rest)| !column_name.is_empty() && !rest.is_empty())
                .ok_or_else(|| Error::MalformedOrClause(clause.to_string()))?;
            let column = table_info.column(column_name).ok_or_else(|| {
                Error::ColumnNotFoundInCollection(column_name.to_string(), collection.to_string())
            })?;
            parse_filter(column, rest)
        })
        .collect()
}

/// Operands arrive decoded by the transport, apart from encoded spaces.
/// Other escapes are left alone so that `%` wildcards survive.
fn decode_operand(operand: &str) -> String {
    operand.replace("%20", " ")
}

fn unsupported_operator(column: &metadata::ColumnInfo, value: &str) -> Error {
    Error::UnsupportedOperator {
        column: column.name.clone(),
        value: value.to_string(),
    }
}
