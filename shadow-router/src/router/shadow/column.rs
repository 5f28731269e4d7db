//! Shadow traffic flagged by a column value.
//!
//! A statement is shadow traffic when it sets or filters on the
//! configured column with a true value, e.g.:
//!
//! ```sql
//! INSERT INTO users (id, shadow) VALUES (1, true);
//! SELECT * FROM users WHERE id = $1 AND shadow = $2;
//! ```

use pg_query::{
    protobuf::{AExpr, AExprKind, BoolExprType, InsertStmt},
    Node, NodeEnum,
};
use tracing::trace;

use super::predicate::ShadowPredicate;
use crate::router::parser::{
    parameter::text_is_true, Column, Error, Parameter, Statement, Value,
};

#[derive(Debug, Clone, PartialEq)]
pub struct ColumnPredicate {
    column: String,
}

impl ColumnPredicate {
    /// The name is folded to lowercase, the way Postgres folds
    /// unquoted identifiers.
    pub fn new(column: impl ToString) -> Self {
        Self {
            column: column.to_string().to_lowercase(),
        }
    }

    pub fn column(&self) -> &str {
        &self.column
    }

    fn evaluate(
        &self,
        statement: &Statement,
        parameters: Option<&[Parameter]>,
    ) -> Result<bool, Error> {
        let shadow = match statement.root() {
            Some(NodeEnum::InsertStmt(stmt)) => self.insert(stmt, parameters)?,
            Some(NodeEnum::SelectStmt(stmt)) => {
                self.where_clause(stmt.where_clause.as_deref(), parameters)?
            }
            Some(NodeEnum::UpdateStmt(stmt)) => {
                self.where_clause(stmt.where_clause.as_deref(), parameters)?
            }
            Some(NodeEnum::DeleteStmt(stmt)) => {
                self.where_clause(stmt.where_clause.as_deref(), parameters)?
            }
            _ => false,
        };

        trace!(
            "column \"{}\" classified \"{}\" as {}",
            self.column,
            statement.query(),
            if shadow { "shadow" } else { "production" }
        );

        Ok(shadow)
    }

    /// Every VALUES row must agree on the column.
    fn insert(&self, stmt: &InsertStmt, parameters: Option<&[Parameter]>) -> Result<bool, Error> {
        let position = stmt
            .cols
            .iter()
            .position(|column| self.is_column(column));

        let Some(position) = position else {
            return Ok(false);
        };

        // INSERT ... SELECT has no literal rows to inspect.
        let rows = match stmt.select_stmt.as_ref().and_then(|node| node.node.as_ref()) {
            Some(NodeEnum::SelectStmt(select)) => &select.values_lists,
            _ => return Ok(false),
        };

        let mut shadow = None;

        for row in rows {
            let Some(NodeEnum::List(tuple)) = &row.node else {
                continue;
            };

            let Some(value) = tuple.items.get(position) else {
                continue;
            };

            let row_shadow = match Value::try_from(value) {
                Ok(value) => self.is_true(&value, parameters)?,
                Err(()) => false,
            };

            match shadow {
                None => shadow = Some(row_shadow),
                Some(previous) if previous != row_shadow => {
                    return Err(Error::ConflictingShadowValues(self.column.clone()))
                }
                Some(_) => (),
            }
        }

        Ok(shadow.unwrap_or(false))
    }

    fn where_clause(
        &self,
        node: Option<&Node>,
        parameters: Option<&[Parameter]>,
    ) -> Result<bool, Error> {
        match node {
            Some(node) => self.condition(node, parameters),
            None => Ok(false),
        }
    }

    /// Only conditions joined by AND apply to every row.
    fn condition(&self, node: &Node, parameters: Option<&[Parameter]>) -> Result<bool, Error> {
        match &node.node {
            Some(NodeEnum::BoolExpr(expr)) if expr.boolop() == BoolExprType::AndExpr => {
                for arg in &expr.args {
                    if self.condition(arg, parameters)? {
                        return Ok(true);
                    }
                }
                Ok(false)
            }

            Some(NodeEnum::AExpr(expr)) if is_equality(expr) => {
                let value = match (expr.lexpr.as_deref(), expr.rexpr.as_deref()) {
                    (Some(left), Some(right)) if self.is_column(left) => right,
                    (Some(left), Some(right)) if self.is_column(right) => left,
                    _ => return Ok(false),
                };

                match Value::try_from(value) {
                    Ok(value) => self.is_true(&value, parameters),
                    Err(()) => Ok(false),
                }
            }

            // WHERE shadow
            Some(NodeEnum::ColumnRef(_)) => Ok(self.is_column(node)),

            _ => Ok(false),
        }
    }

    fn is_column(&self, node: &Node) -> bool {
        Column::try_from(node)
            .map(|column| column.name == self.column)
            .unwrap_or(false)
    }

    fn is_true(&self, value: &Value<'_>, parameters: Option<&[Parameter]>) -> Result<bool, Error> {
        Ok(match value {
            Value::Boolean(value) => *value,
            Value::Integer(value) => *value != 0,
            Value::String(value) => text_is_true(value),
            Value::Float(_) | Value::Null => false,
            Value::Placeholder(number) => {
                let parameter = usize::try_from(*number)
                    .ok()
                    .and_then(|number| number.checked_sub(1))
                    .and_then(|index| parameters.and_then(|parameters| parameters.get(index)))
                    .ok_or(Error::MissingParameter(*number))?;
                parameter.is_true()
            }
        })
    }
}

fn is_equality(expr: &AExpr) -> bool {
    expr.kind() == AExprKind::AexprOp
        && matches!(
            expr.name.first(),
            Some(Node {
                node: Some(NodeEnum::String(pg_query::protobuf::String { sval })),
            }) if sval == "="
        )
}

impl ShadowPredicate for ColumnPredicate {
    fn is_shadow(&self, statement: &Statement) -> Result<bool, Error> {
        self.evaluate(statement, None)
    }

    fn is_shadow_with_parameters(
        &self,
        statement: &Statement,
        parameters: &[Parameter],
    ) -> Result<bool, Error> {
        self.evaluate(statement, Some(parameters))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn literal(query: &str) -> Result<bool, Error> {
        ColumnPredicate::new("shadow").is_shadow(&Statement::parse(query).unwrap())
    }

    fn prepared(query: &str, parameters: Vec<Parameter>) -> Result<bool, Error> {
        ColumnPredicate::new("shadow")
            .is_shadow_with_parameters(&Statement::parse(query).unwrap(), &parameters)
    }

    #[test]
    fn test_insert_literal() {
        assert!(literal("INSERT INTO users (id, shadow) VALUES (1, true)").unwrap());
        assert!(literal("INSERT INTO users (shadow, id) VALUES ('t', 1)").unwrap());
        assert!(literal("INSERT INTO users (id, shadow) VALUES (1, 1)").unwrap());
        assert!(!literal("INSERT INTO users (id, shadow) VALUES (1, false)").unwrap());
        assert!(!literal("INSERT INTO users (id, shadow) VALUES (1, NULL)").unwrap());
        assert!(!literal("INSERT INTO users (id, name) VALUES (1, 'true')").unwrap());
        assert!(!literal("INSERT INTO users (id) SELECT id FROM staging").unwrap());
    }

    #[test]
    fn test_insert_multiple_rows() {
        assert!(literal("INSERT INTO users (id, shadow) VALUES (1, true), (2, 'yes')").unwrap());

        let err = literal("INSERT INTO users (id, shadow) VALUES (1, true), (2, false)")
            .unwrap_err();
        assert!(matches!(err, Error::ConflictingShadowValues(column) if column == "shadow"));
    }

    #[test]
    fn test_insert_prepared() {
        let query = "INSERT INTO users (id, shadow) VALUES ($1, $2)";

        assert!(prepared(query, vec![1i64.into(), true.into()]).unwrap());
        assert!(prepared(query, vec![1i64.into(), "on".into()]).unwrap());
        assert!(!prepared(query, vec![1i64.into(), false.into()]).unwrap());
        assert!(matches!(
            prepared(query, vec![1i64.into()]),
            Err(Error::MissingParameter(2))
        ));
    }

    #[test]
    fn test_placeholder_without_parameters() {
        assert!(matches!(
            literal("INSERT INTO users (id, shadow) VALUES (1, $1)"),
            Err(Error::MissingParameter(1))
        ));
    }

    #[test]
    fn test_where_clause() {
        assert!(literal("SELECT * FROM users WHERE shadow = true").unwrap());
        assert!(literal("SELECT * FROM users WHERE true = shadow").unwrap());
        assert!(literal("SELECT * FROM users u WHERE u.id = 1 AND u.shadow = 't'").unwrap());
        assert!(literal("SELECT * FROM users WHERE shadow").unwrap());
        assert!(literal("UPDATE users SET name = 'a' WHERE shadow = 'true'::boolean").unwrap());
        assert!(literal("DELETE FROM users WHERE id = 1 AND shadow = 1").unwrap());

        assert!(!literal("SELECT * FROM users").unwrap());
        assert!(!literal("SELECT * FROM users WHERE shadow = false").unwrap());
        assert!(!literal("SELECT * FROM users WHERE id = 1 OR shadow = true").unwrap());
        assert!(!literal("SELECT * FROM users WHERE shadow <> true").unwrap());
        assert!(!literal("UPDATE users SET shadow = true WHERE id = 1").unwrap());
    }

    #[test]
    fn test_where_clause_prepared() {
        let query = "SELECT * FROM users WHERE id = $1 AND shadow = $2";

        assert!(prepared(query, vec![1i64.into(), true.into()]).unwrap());
        assert!(!prepared(query, vec![1i64.into(), false.into()]).unwrap());
        assert!(matches!(
            prepared(query, vec![]),
            Err(Error::MissingParameter(2))
        ));
    }

    #[test]
    fn test_column_name_case() {
        let predicate = ColumnPredicate::new("IsTest");
        assert_eq!(predicate.column(), "istest");

        let statement = Statement::parse("SELECT * FROM users WHERE IsTest = true").unwrap();
        assert!(predicate.is_shadow(&statement).unwrap());

        let statement =
            Statement::parse("INSERT INTO users (id, ISTEST) VALUES (1, true)").unwrap();
        assert!(predicate.is_shadow(&statement).unwrap());
    }

    #[test]
    fn test_other_statements_are_production() {
        assert!(!literal("MERGE INTO users u USING staging s ON u.id = s.id WHEN MATCHED THEN DELETE").unwrap());
        assert!(!literal("CREATE TABLE users (id BIGINT, shadow BOOLEAN)").unwrap());
    }
}
