//! Column name reference.

use pg_query::{protobuf::String as PgQueryString, Node, NodeEnum};
use std::fmt::{Display, Formatter, Result as FmtResult};

/// Column name extracted from a query.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Column<'a> {
    /// Column name.
    pub name: &'a str,
    /// Table name or alias.
    pub table: Option<&'a str>,
}

impl Display for Column<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self.table {
            Some(table) => write!(
                f,
                "\"{}\".\"{}\"",
                escape_identifier(table),
                escape_identifier(self.name)
            ),
            None => write!(f, "\"{}\"", escape_identifier(self.name)),
        }
    }
}

fn escape_identifier(s: &str) -> String {
    s.replace("\"", "\"\"")
}

impl<'a> TryFrom<&'a Node> for Column<'a> {
    type Error = ();

    fn try_from(value: &'a Node) -> Result<Self, Self::Error> {
        Column::try_from(&value.node)
    }
}

impl<'a> TryFrom<&'a Option<NodeEnum>> for Column<'a> {
    type Error = ();

    fn try_from(value: &'a Option<NodeEnum>) -> Result<Self, Self::Error> {
        fn from_node(node: &Node) -> Option<&str> {
            if let Some(NodeEnum::String(PgQueryString { sval })) = &node.node {
                Some(sval.as_str())
            } else {
                None
            }
        }

        // schema.table.column, table.column or column. Schema doesn't
        // matter for matching a column by name.
        fn from_slice(nodes: &[Node]) -> Result<Column<'_>, ()> {
            let (name, qualifiers) = nodes.split_last().ok_or(())?;
            let name = from_node(name).ok_or(())?;
            if qualifiers.len() > 2 {
                return Err(());
            }
            let table = qualifiers.last().and_then(from_node);

            Ok(Column { name, table })
        }

        match value {
            Some(NodeEnum::ResTarget(res_target)) => Ok(Self {
                name: res_target.name.as_str(),
                ..Default::default()
            }),

            Some(NodeEnum::ColumnRef(column_ref)) => from_slice(&column_ref.fields),

            _ => Err(()),
        }
    }
}
