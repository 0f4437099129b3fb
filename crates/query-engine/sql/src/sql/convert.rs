//! Render the AST into query text, collecting bound parameters on the way.

use super::ast::*;
use super::helpers;
use super::string::*;

/// Append each item with `append`, putting `", "` between neighbours.
fn append_separated<I, F>(sql: &mut SQL, items: I, mut append: F)
where
    I: IntoIterator,
    F: FnMut(&mut SQL, I::Item),
{
    for (index, item) in items.into_iter().enumerate() {
        if index > 0 {
            sql.append_syntax(", ");
        }
        append(sql, item);
    }
}

/// `(a, b, ..)`
fn append_arguments(sql: &mut SQL, args: &[Expression]) {
    sql.append_syntax("(");
    append_separated(sql, args, |sql, arg| arg.to_sql(sql));
    sql.append_syntax(")");
}

fn append_qualified(sql: &mut SQL, schema: &SchemaName, table: &TableName) {
    sql.append_identifier(&schema.0);
    sql.append_syntax(".");
    sql.append_identifier(&table.0);
}

// statements

impl Select {
    pub fn to_sql(&self, sql: &mut SQL) {
        sql.append_syntax("SELECT ");
        self.select_list.to_sql(sql);
        if let Some(from) = &self.from {
            sql.append_syntax(" ");
            from.to_sql(sql);
        }
        self.where_.to_sql(sql);
        self.group_by.to_sql(sql);
        self.order_by.to_sql(sql);
        self.limit.to_sql(sql);
    }
}

impl SelectList {
    pub fn to_sql(&self, sql: &mut SQL) {
        match self {
            SelectList::Select1 => sql.append_syntax("1"),
            SelectList::SelectList(entries) => {
                append_separated(sql, entries, |sql, (alias, expression)| {
                    expression.to_sql(sql);
                    sql.append_syntax(" AS ");
                    alias.to_sql(sql);
                });
            }
        }
    }
}

impl Insert {
    pub fn to_sql(&self, sql: &mut SQL) {
        sql.append_syntax("INSERT INTO ");
        append_qualified(sql, &self.schema, &self.table);
        if !self.columns.is_empty() {
            sql.append_syntax("(");
            append_separated(sql, &self.columns, |sql, column| column.to_sql(sql));
            sql.append_syntax(")");
        }
        sql.append_syntax(" ");
        match &self.from {
            InsertFrom::DefaultValues => sql.append_syntax("DEFAULT VALUES"),
            InsertFrom::Select(select) => select.to_sql(sql),
        }
        self.returning.to_sql(sql);
    }
}

impl Update {
    pub fn to_sql(&self, sql: &mut SQL) {
        sql.append_syntax("UPDATE ");
        append_qualified(sql, &self.schema, &self.table);
        sql.append_syntax(" AS ");
        self.alias.to_sql(sql);
        sql.append_syntax(" SET ");
        append_separated(sql, &self.set, |sql, (column, value)| {
            column.to_sql(sql);
            sql.append_syntax(" = ");
            value.to_sql(sql);
        });
        if let Some(from) = &self.from {
            sql.append_syntax(" ");
            from.to_sql(sql);
        }
        self.where_.to_sql(sql);
    }
}

impl Delete {
    pub fn to_sql(&self, sql: &mut SQL) {
        sql.append_syntax("DELETE ");
        self.from.to_sql(sql);
        self.where_.to_sql(sql);
    }
}

impl Returning {
    pub fn to_sql(&self, sql: &mut SQL) {
        let Returning(select_list) = self;
        sql.append_syntax(" RETURNING ");
        select_list.to_sql(sql);
    }
}

// clauses

impl From {
    pub fn to_sql(&self, sql: &mut SQL) {
        sql.append_syntax("FROM ");
        let alias = match self {
            From::Table { reference, alias } => {
                reference.to_sql(sql);
                alias
            }
            From::Select { select, alias } => {
                sql.append_syntax("(");
                select.to_sql(sql);
                sql.append_syntax(")");
                alias
            }
            From::FunctionCall {
                function,
                args,
                alias,
            } => {
                function.to_sql(sql);
                append_arguments(sql, args);
                alias
            }
        };
        sql.append_syntax(" AS ");
        alias.to_sql(sql);
    }
}

impl Where {
    pub fn to_sql(&self, sql: &mut SQL) {
        let Where(predicate) = self;
        if *predicate == helpers::true_expr() {
            return;
        }
        sql.append_syntax(" WHERE ");
        predicate.to_sql(sql);
    }
}

impl GroupBy {
    pub fn to_sql(&self, sql: &mut SQL) {
        if self.elements.is_empty() {
            return;
        }
        sql.append_syntax(" GROUP BY ");
        append_separated(sql, &self.elements, |sql, element| element.to_sql(sql));
    }
}

impl OrderBy {
    pub fn to_sql(&self, sql: &mut SQL) {
        if self.elements.is_empty() {
            return;
        }
        sql.append_syntax(" ORDER BY ");
        append_separated(sql, &self.elements, |sql, element| {
            element.target.to_sql(sql);
            element.direction.to_sql(sql);
        });
    }
}

impl OrderByDirection {
    pub fn to_sql(self, sql: &mut SQL) {
        sql.append_syntax(match self {
            OrderByDirection::Asc => " ASC",
            OrderByDirection::Desc => " DESC",
        });
    }
}

impl Limit {
    pub fn to_sql(&self, sql: &mut SQL) {
        for (keyword, amount) in [(" LIMIT ", self.limit), (" OFFSET ", self.offset)] {
            if let Some(amount) = amount {
                sql.append_syntax(keyword);
                sql.append_syntax(&amount.to_string());
            }
        }
    }
}

// expressions

impl Expression {
    pub fn to_sql(&self, sql: &mut SQL) {
        match self {
            Expression::ColumnReference(column) => column.to_sql(sql),
            Expression::Value(value) => value.to_sql(sql),
            Expression::And { left, right } => append_connective(sql, left, " AND ", right),
            Expression::Or { left, right } => append_connective(sql, left, " OR ", right),
            Expression::BinaryOperation {
                left,
                operator,
                right,
            } => {
                sql.append_syntax("(");
                left.to_sql(sql);
                operator.to_sql(sql);
                right.to_sql(sql);
                sql.append_syntax(")");
            }
            Expression::UnaryOperation {
                expression,
                operator,
            } => {
                sql.append_syntax("(");
                expression.to_sql(sql);
                operator.to_sql(sql);
                sql.append_syntax(")");
            }
            Expression::FunctionCall { function, args } => {
                function.to_sql(sql);
                append_arguments(sql, args);
            }
            Expression::AggregateFunctionCall {
                function,
                distinct,
                args,
            } => {
                function.to_sql(sql);
                sql.append_syntax(if *distinct { "(DISTINCT " } else { "(" });
                append_separated(sql, args, |sql, arg| arg.to_sql(sql));
                sql.append_syntax(")");
            }
            Expression::Case { whens, else_ } => {
                sql.append_syntax("CASE");
                for (condition, result) in whens {
                    sql.append_syntax(" WHEN ");
                    condition.to_sql(sql);
                    sql.append_syntax(" THEN ");
                    result.to_sql(sql);
                }
                sql.append_syntax(" ELSE ");
                else_.to_sql(sql);
                sql.append_syntax(" END");
            }
            Expression::Exists { select } => {
                sql.append_syntax("EXISTS (");
                select.to_sql(sql);
                sql.append_syntax(")");
            }
            Expression::RowToJson(table) => {
                sql.append_syntax("row_to_json(");
                table.to_sql(sql);
                sql.append_syntax(")");
            }
            Expression::Cast { expression, r#type } => {
                sql.append_syntax("CAST(");
                expression.to_sql(sql);
                sql.append_syntax(" AS ");
                r#type.to_sql(sql);
                sql.append_syntax(")");
            }
            Expression::Count(count) => {
                sql.append_syntax("COUNT(");
                match count {
                    CountType::Star => sql.append_syntax("*"),
                    CountType::Distinct(expression) => {
                        sql.append_syntax("DISTINCT ");
                        expression.to_sql(sql);
                    }
                }
                sql.append_syntax(")");
            }
        }
    }
}

/// `(left <connective> right)`
fn append_connective(sql: &mut SQL, left: &Expression, connective: &str, right: &Expression) {
    sql.append_syntax("(");
    left.to_sql(sql);
    sql.append_syntax(connective);
    right.to_sql(sql);
    sql.append_syntax(")");
}

impl UnaryOperator {
    pub fn to_sql(self, sql: &mut SQL) {
        sql.append_syntax(match self {
            UnaryOperator::IsNull => " IS NULL",
            UnaryOperator::IsNotNull => " IS NOT NULL",
            UnaryOperator::IsTrue => " IS TRUE",
            UnaryOperator::IsNotTrue => " IS NOT TRUE",
            UnaryOperator::IsFalse => " IS FALSE",
            UnaryOperator::IsNotFalse => " IS NOT FALSE",
        });
    }
}

impl BinaryOperator {
    pub fn to_sql(self, sql: &mut SQL) {
        sql.append_syntax(match self {
            BinaryOperator::Equals => " = ",
            BinaryOperator::NotEquals => " <> ",
            BinaryOperator::GreaterThan => " > ",
            BinaryOperator::Like => " LIKE ",
            BinaryOperator::NotLike => " NOT LIKE ",
        });
    }
}

impl Function {
    pub fn to_sql(&self, sql: &mut SQL) {
        sql.append_syntax(match self {
            Function::Coalesce => "coalesce",
            Function::JsonAgg => "json_agg",
            Function::JsonbPopulateRecord => "jsonb_populate_record",
            Function::StringAgg => "string_agg",
        });
    }
}

impl Value {
    pub fn to_sql(&self, sql: &mut SQL) {
        match self {
            Value::Int8(number) => sql.append_syntax(&number.to_string()),
            Value::Bool(true) => sql.append_syntax("true"),
            Value::Bool(false) => sql.append_syntax("false"),
            Value::String(text) => sql.append_literal(text),
            Value::Null => sql.append_syntax("NULL"),
            Value::JsonValue(document) => sql.append_param(Param::Value(document.clone())),
            Value::EmptyJsonArray => sql.append_syntax("'[]'"),
        }
    }
}

impl ScalarType {
    pub fn to_sql(&self, sql: &mut SQL) {
        let ScalarType::BaseType(name) = self;
        match name {
            ScalarTypeName::Qualified {
                schema_name,
                type_name,
            } => {
                sql.append_identifier(&schema_name.0);
                sql.append_syntax(".");
                sql.append_identifier(type_name);
            }
            ScalarTypeName::Unqualified(type_name) => sql.append_identifier(type_name),
        }
    }
}

// names

impl TableReference {
    pub fn to_sql(&self, sql: &mut SQL) {
        match self {
            TableReference::DBTable { schema, table } => append_qualified(sql, schema, table),
            TableReference::AliasedTable(alias) => alias.to_sql(sql),
        }
    }
}

impl ColumnReference {
    pub fn to_sql(&self, sql: &mut SQL) {
        let ColumnReference::TableColumn { table, name } = self;
        table.to_sql(sql);
        sql.append_syntax(".");
        name.to_sql(sql);
    }
}

impl TableAlias {
    pub fn to_sql(&self, sql: &mut SQL) {
        sql.append_identifier(&self.name);
    }
}

impl ColumnAlias {
    pub fn to_sql(&self, sql: &mut SQL) {
        sql.append_identifier(&self.name);
    }
}

impl ColumnName {
    pub fn to_sql(&self, sql: &mut SQL) {
        sql.append_identifier(&self.0);
    }
}
