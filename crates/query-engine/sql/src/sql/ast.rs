//! The subset of PostgreSQL the service generates, as an AST.
//!
//! Listings, counts and single-record statements are built from these types and
//! rendered with `to_sql`.

use std::collections::BTreeMap;

/// `SELECT <list> [FROM ..] [WHERE ..] [GROUP BY ..] [ORDER BY ..] [LIMIT ..]`
#[derive(Debug, Clone, PartialEq)]
pub struct Select {
    pub select_list: SelectList,
    pub from: Option<From>,
    pub where_: Where,
    pub group_by: GroupBy,
    pub order_by: OrderBy,
    pub limit: Limit,
}

/// `INSERT INTO <table>(<columns>) <values> RETURNING <list>`
#[derive(Debug, Clone, PartialEq)]
pub struct Insert {
    pub schema: SchemaName,
    pub table: TableName,
    pub columns: Vec<ColumnName>,
    pub from: InsertFrom,
    pub returning: Returning,
}

/// Where the inserted row comes from.
#[derive(Debug, Clone, PartialEq)]
pub enum InsertFrom {
    /// `DEFAULT VALUES`, used when no column was supplied.
    DefaultValues,
    Select(Select),
}

/// `DELETE FROM <table> WHERE ..`
#[derive(Debug, Clone, PartialEq)]
pub struct Delete {
    pub from: From,
    pub where_: Where,
}

/// `UPDATE <table> AS <alias> SET <column> = <expression>, .. [FROM ..] WHERE ..`
#[derive(Debug, Clone, PartialEq)]
pub struct Update {
    pub schema: SchemaName,
    pub table: TableName,
    pub alias: TableAlias,
    pub set: BTreeMap<ColumnName, Expression>,
    pub from: Option<From>,
    pub where_: Where,
}

/// What an INSERT hands back.
#[derive(Debug, Clone, PartialEq)]
pub struct Returning(pub SelectList);

/// The output columns of a SELECT, each under its alias.
#[derive(Debug, Clone, PartialEq)]
pub enum SelectList {
    SelectList(Vec<(ColumnAlias, Expression)>),
    Select1,
}

#[derive(Debug, Clone, PartialEq)]
pub enum From {
    /// `<table> AS <alias>`
    Table {
        reference: TableReference,
        alias: TableAlias,
    },
    /// `(<select>) AS <alias>`
    Select {
        select: Box<Select>,
        alias: TableAlias,
    },
    /// Select from a set-returning function call,
    /// for example `jsonb_populate_record(...)`.
    FunctionCall {
        function: Function,
        args: Vec<Expression>,
        alias: TableAlias,
    },
}

/// A predicate. `true` renders as no WHERE at all.
#[derive(Debug, Clone, PartialEq)]
pub struct Where(pub Expression);

#[derive(Debug, Clone, PartialEq)]
pub struct GroupBy {
    pub elements: Vec<Expression>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OrderBy {
    pub elements: Vec<OrderByElement>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OrderByElement {
    pub target: Expression,
    pub direction: OrderByDirection,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderByDirection {
    Asc,
    Desc,
}

/// `LIMIT n OFFSET m`, either of which may be left out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Limit {
    pub limit: Option<u64>,
    pub offset: Option<u64>,
}

/// An expression, boolean or otherwise.
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    And {
        left: Box<Expression>,
        right: Box<Expression>,
    },
    Or {
        left: Box<Expression>,
        right: Box<Expression>,
    },
    BinaryOperation {
        left: Box<Expression>,
        operator: BinaryOperator,
        right: Box<Expression>,
    },
    /// The `IS ..` tests.
    UnaryOperation {
        expression: Box<Expression>,
        operator: UnaryOperator,
    },
    FunctionCall {
        function: Function,
        args: Vec<Expression>,
    },
    /// `f([DISTINCT] args)`
    AggregateFunctionCall {
        function: Function,
        distinct: bool,
        args: Vec<Expression>,
    },
    /// `CASE WHEN .. THEN .. ELSE .. END`
    Case {
        whens: Vec<(Expression, Expression)>,
        else_: Box<Expression>,
    },
    Exists {
        select: Box<Select>,
    },
    /// `row_to_json(<table>)`, one JSON object per row.
    RowToJson(TableReference),
    ColumnReference(ColumnReference),
    Value(Value),
    Cast {
        expression: Box<Expression>,
        r#type: ScalarType,
    },
    Count(CountType),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOperator {
    IsNull,
    IsNotNull,
    IsTrue,
    IsNotTrue,
    IsFalse,
    IsNotFalse,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOperator {
    Equals,
    NotEquals,
    GreaterThan,
    Like,
    NotLike,
}

/// The functions the generated statements call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Function {
    Coalesce,
    JsonAgg,
    JsonbPopulateRecord,
    StringAgg,
}

/// `COUNT(*)` or `COUNT(DISTINCT e)`.
#[derive(Debug, Clone, PartialEq)]
pub enum CountType {
    Star,
    Distinct(Box<Expression>),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Int8(i64),
    Bool(bool),
    /// A string literal, inlined into the query text with its quotes escaped.
    /// Postgres resolves its type against the other side of the comparison.
    String(String),
    Null,
    /// A JSON document, sent as a bound `jsonb` parameter.
    JsonValue(serde_json::Value),
    EmptyJsonArray,
}

/// The target of a CAST.
#[derive(Debug, Clone, PartialEq)]
pub enum ScalarType {
    BaseType(ScalarTypeName),
}

/// Always rendered quoted.
#[derive(Debug, Clone, PartialEq)]
pub enum ScalarTypeName {
    /// A type name referencing a schema, such as a table's row type.
    Qualified {
        schema_name: SchemaName,
        type_name: String,
    },
    /// A type name without a schema.
    Unqualified(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SchemaName(pub String);

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TableName(pub String);

/// A table, either by its name in the database or by an alias given in the statement.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TableReference {
    /// `"schema"."table"`
    DBTable {
        schema: SchemaName,
        table: TableName,
    },
    AliasedTable(TableAlias),
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ColumnName(pub String);

/// `<table>."column"`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ColumnReference {
    TableColumn {
        table: TableReference,
        name: ColumnName,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TableAlias {
    pub name: String,
}

/// The name a select list entry is returned under. Also the key in `row_to_json` output.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ColumnAlias {
    pub name: String,
}
