//! Parsed statement.

use std::fmt::Display;

use pg_query::{protobuf::ParseResult, NodeEnum};
use tracing::trace;

use super::Error;

/// What a statement does, as far as shadow routing is concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatementKind {
    Select,
    Insert,
    Update,
    Delete,
    Merge,
    /// Schema changes, e.g. `CREATE TABLE`.
    Ddl,
    /// Session settings, e.g. `SET`.
    Session,
    /// Transaction control, e.g. `BEGIN`.
    Transaction,
    Other,
}

impl StatementKind {
    /// Statement reads or writes rows.
    pub fn is_dml(&self) -> bool {
        matches!(
            self,
            Self::Select | Self::Insert | Self::Update | Self::Delete | Self::Merge
        )
    }
}

impl Display for StatementKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let kind = match self {
            Self::Select => "select",
            Self::Insert => "insert",
            Self::Update => "update",
            Self::Delete => "delete",
            Self::Merge => "merge",
            Self::Ddl => "ddl",
            Self::Session => "session",
            Self::Transaction => "transaction",
            Self::Other => "other",
        };
        write!(f, "{}", kind)
    }
}

impl From<&NodeEnum> for StatementKind {
    fn from(node: &NodeEnum) -> Self {
        match node {
            NodeEnum::SelectStmt(_) => Self::Select,
            NodeEnum::InsertStmt(_) => Self::Insert,
            NodeEnum::UpdateStmt(_) => Self::Update,
            NodeEnum::DeleteStmt(_) => Self::Delete,
            NodeEnum::MergeStmt(_) => Self::Merge,

            NodeEnum::CreateStmt(_)
            | NodeEnum::CreateTableAsStmt(_)
            | NodeEnum::AlterTableStmt(_)
            | NodeEnum::DropStmt(_)
            | NodeEnum::TruncateStmt(_)
            | NodeEnum::IndexStmt(_)
            | NodeEnum::RenameStmt(_)
            | NodeEnum::CreateSchemaStmt(_)
            | NodeEnum::ViewStmt(_)
            | NodeEnum::CreateSeqStmt(_)
            | NodeEnum::AlterSeqStmt(_)
            | NodeEnum::CreateFunctionStmt(_)
            | NodeEnum::CreateEnumStmt(_)
            | NodeEnum::CreateExtensionStmt(_)
            | NodeEnum::CommentStmt(_)
            | NodeEnum::GrantStmt(_) => Self::Ddl,

            NodeEnum::VariableSetStmt(_)
            | NodeEnum::VariableShowStmt(_)
            | NodeEnum::DiscardStmt(_) => Self::Session,

            NodeEnum::TransactionStmt(_) => Self::Transaction,

            _ => Self::Other,
        }
    }
}

/// A statement parsed by pg_query.
#[derive(Debug, Clone)]
pub struct Statement {
    query: String,
    ast: ParseResult,
    kind: StatementKind,
}

impl Statement {
    /// Parse a query. Only the first statement in a multi-statement
    /// query string is classified.
    pub fn parse(query: impl ToString) -> Result<Self, Error> {
        let query = query.to_string();
        let ast = pg_query::parse(&query)?.protobuf;

        let kind = ast
            .stmts
            .first()
            .and_then(|stmt| stmt.stmt.as_ref())
            .and_then(|node| node.node.as_ref())
            .map(StatementKind::from)
            .ok_or(Error::EmptyQuery)?;

        if ast.stmts.len() > 1 {
            trace!(
                "query has {} statements, classified by the first one",
                ast.stmts.len()
            );
        }

        Ok(Self { query, ast, kind })
    }

    /// Original query text.
    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn kind(&self) -> StatementKind {
        self.kind
    }

    /// Statement reads or writes rows.
    pub fn is_dml(&self) -> bool {
        self.kind.is_dml()
    }

    /// First statement's root node.
    pub fn root(&self) -> Option<&NodeEnum> {
        self.ast
            .stmts
            .first()
            .and_then(|stmt| stmt.stmt.as_ref())
            .and_then(|node| node.node.as_ref())
    }
}
