//! Describe the SQL execution plan.

use super::ast;
use super::string;

#[derive(Debug)]
/// Definition of an execution plan to be run against the database.
pub struct ExecutionPlan<Query> {
    /// The collection the plan was built for. Used for logging and metrics.
    pub root_field: String,
    /// The query.
    pub query: Query,
}

/// A simple execution plan with only a root field and a query.
pub fn simple_exec_plan<Query>(root_field: String, query: Query) -> ExecutionPlan<Query> {
    ExecutionPlan { root_field, query }
}

/// The two statements behind a page of a listing.
#[derive(Debug, Clone, PartialEq)]
pub struct ListQuery {
    /// Returns the page of rows as a single JSON array.
    pub rows: ast::Select,
    /// Counts the rows matching the filter, ignoring grouping and paging.
    pub count: ast::Select,
}

impl ListQuery {
    /// Extract the page query as SQL.
    pub fn rows_sql(&self) -> string::SQL {
        select_to_sql(&self.rows)
    }

    /// Extract the count query as SQL.
    pub fn count_sql(&self) -> string::SQL {
        select_to_sql(&self.count)
    }
}

/// A statement changing a single record.
#[derive(Debug, Clone, PartialEq)]
pub enum Mutation {
    Insert(ast::Insert),
    Update(ast::Update),
    Delete(ast::Delete),
}

impl Mutation {
    /// Extract the statement as SQL.
    pub fn query_sql(&self) -> string::SQL {
        let mut sql = string::SQL::new();
        match self {
            Mutation::Insert(insert) => insert.to_sql(&mut sql),
            Mutation::Update(update) => update.to_sql(&mut sql),
            Mutation::Delete(delete) => delete.to_sql(&mut sql),
        }
        sql
    }
}

/// Convert a select to a parameterised SQL string.
pub fn select_to_sql(select: &ast::Select) -> string::SQL {
    let mut sql = string::SQL::new();
    select.to_sql(&mut sql);
    sql
}
