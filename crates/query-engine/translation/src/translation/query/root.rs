//! Handle the paging and the root select of a listing.

use query_engine_sql::sql;

use super::aggregates;
use super::filtering;
use super::parse::ParsedQuery;
use super::sorting;
use crate::translation::error::Error;
use crate::translation::helpers::{Env, TableNameAndReference};

pub const PAGE_KEY: &str = "page";
pub const PAGE_SIZE_KEY: &str = "page_size";
pub const DEFAULT_PAGE_SIZE: i64 = 100;

/// Which page of a listing to return. Pages are zero-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u64,
    pub page_size: u64,
}

impl PageRequest {
    /// Validate a page index and size.
    pub fn new(page: i64, page_size: i64) -> Result<PageRequest, Error> {
        let page = u64::try_from(page)
            .map_err(|_| Error::InvalidPagination(format!("page must be >= 0, got {page}")))?;
        let page_size = u64::try_from(page_size)
            .ok()
            .filter(|page_size| *page_size >= 1)
            .ok_or_else(|| {
                Error::InvalidPagination(format!("page_size must be >= 1, got {page_size}"))
            })?;
        page.checked_mul(page_size)
            .filter(|offset| i64::try_from(*offset).is_ok())
            .ok_or_else(|| Error::InvalidPagination("page * page_size is too large".to_string()))?;
        Ok(PageRequest { page, page_size })
    }

    /// Read `page` and `page_size` from the query parameters, with defaults.
    /// The last occurrence of a key wins.
    pub fn from_params(params: &[(String, String)]) -> Result<PageRequest, Error> {
        let page = lookup_integer(params, PAGE_KEY)?.unwrap_or(0);
        let page_size = lookup_integer(params, PAGE_SIZE_KEY)?.unwrap_or(DEFAULT_PAGE_SIZE);
        PageRequest::new(page, page_size)
    }

    /// `LIMIT page_size OFFSET page * page_size`
    pub fn limit(&self) -> sql::ast::Limit {
        sql::ast::Limit {
            limit: Some(self.page_size),
            offset: Some(self.page.saturating_mul(self.page_size)),
        }
    }
}

fn lookup_integer(params: &[(String, String)], key: &str) -> Result<Option<i64>, Error> {
    params
        .iter()
        .rev()
        .find(|(param, _)| param == key)
        .map(|(_, value)| {
            value.trim().parse::<i64>().map_err(|_| {
                Error::InvalidPagination(format!("{key} must be an integer, got '{value}'"))
            })
        })
        .transpose()
}

/// Narrow a listing to the rows belonging to one other record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Restriction {
    /// Linked to the record through a join table.
    Joined(JoinRestriction),
    /// A column of the listed collection holds the record's id, as in a view
    /// that already joins the tables.
    ///
    /// > "joined_projects"."project_id" = 5
    ColumnEquals { column: String, id: i64 },
}

impl Restriction {
    pub(crate) fn translate(
        &self,
        env: &Env,
        current_table: &TableNameAndReference,
    ) -> Result<sql::ast::Expression, Error> {
        match self {
            Restriction::Joined(join) => join.translate(env, current_table),
            Restriction::ColumnEquals { column, id } => {
                if current_table.info.column(column).is_none() {
                    return Err(Error::ColumnNotFoundInCollection(
                        column.clone(),
                        current_table.name.clone(),
                    ));
                }
                Ok(sql::helpers::equals(
                    current_table.column(column),
                    sql::ast::Expression::Value(sql::ast::Value::Int8(*id)),
                ))
            }
        }
    }
}

/// Restrict a listing to the rows linked to one record through a join table.
///
/// For the users of group 5:
///
/// > EXISTS (SELECT 1 FROM "public"."user_groups" AS "user_groups"
/// >         WHERE (("user_groups"."user_id" = "users"."id") AND ("user_groups"."group_id" = 5)))
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinRestriction {
    /// The collection of the join table.
    pub join_collection: String,
    /// Column of the join table referencing the listed collection's primary key.
    pub source_column: String,
    /// Column of the join table referencing the other record.
    pub target_column: String,
    /// The other record's id.
    pub target_id: i64,
}

impl JoinRestriction {
    pub(crate) fn translate(
        &self,
        env: &Env,
        current_table: &TableNameAndReference,
    ) -> Result<sql::ast::Expression, Error> {
        let join_table = env.lookup_collection(&self.join_collection)?;
        for column in [&self.source_column, &self.target_column] {
            if join_table.info.column(column).is_none() {
                return Err(Error::ColumnNotFoundInCollection(
                    column.clone(),
                    self.join_collection.clone(),
                ));
            }
        }

        let condition = sql::helpers::conjunction(vec![
            sql::helpers::equals(
                join_table.column(&self.source_column),
                current_table.column(&current_table.info.primary_key),
            ),
            sql::helpers::equals(
                join_table.column(&self.target_column),
                sql::ast::Expression::Value(sql::ast::Value::Int8(self.target_id)),
            ),
        ]);

        Ok(sql::ast::Expression::Exists {
            select: Box::new(sql::helpers::select_one(
                join_table.from_clause(),
                condition,
            )),
        })
    }
}

/// Build the page query and the count query of a listing.
pub fn translate_rows_query(
    env: &Env,
    current_table: &TableNameAndReference,
    restriction: Option<&Restriction>,
    parsed: &ParsedQuery,
    page: PageRequest,
) -> Result<sql::execution_plan::ListQuery, Error> {
    let mut conditions = match restriction {
        None => vec![],
        Some(restriction) => vec![restriction.translate(env, current_table)?],
    };
    conditions.extend(filtering::translate_clauses(current_table, parsed));
    let predicate = sql::helpers::conjunction(conditions);

    let columns = match &parsed.group_by {
        None => current_table.projection(),
        Some(group_by) => aggregates::translate_group_projection(current_table, group_by),
    };

    let mut select = sql::helpers::simple_select(columns);
    select.from = Some(current_table.from_clause());
    select.where_ = sql::ast::Where(predicate.clone());
    select.group_by = sorting::translate_group_by(current_table, parsed);
    select.order_by = sorting::translate_order_by(current_table, parsed);
    select.limit = page.limit();

    // the count ignores grouping, ordering and paging.
    let count = sql::helpers::select_count(current_table.from_clause(), predicate);

    Ok(sql::execution_plan::ListQuery {
        rows: sql::helpers::select_rowset(select),
        count,
    })
}
