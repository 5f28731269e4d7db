//! Invoke the router on queries.

use std::path::Path;

use tokio::fs::read_to_string;

use super::{
    parser::{self, Parameter, Statement},
    Error, RouteContext, RouteResult, Router,
};

#[derive(Debug, Clone)]
pub struct RouterCli {
    database: String,
    queries: Vec<String>,
    parameters: Option<Vec<Parameter>>,
    route_result: RouteResult,
}

impl RouterCli {
    /// Route a single query.
    pub fn new(database: impl ToString, query: impl ToString) -> Self {
        Self {
            database: database.to_string(),
            queries: vec![query.to_string()],
            parameters: None,
            route_result: RouteResult::default(),
        }
    }

    /// Route every statement in a file.
    pub async fn from_file(database: impl ToString, file: impl AsRef<Path>) -> Result<Self, Error> {
        let queries = read_to_string(file).await?;
        let queries = split(&queries)?;

        Ok(Self {
            database: database.to_string(),
            queries,
            parameters: None,
            route_result: RouteResult::default(),
        })
    }

    /// Execute queries as prepared statements with these parameters.
    pub fn with_parameters(mut self, parameters: Vec<Parameter>) -> Self {
        self.parameters = Some(parameters);
        self
    }

    /// Data sources resolved before the router runs, e.g. by a sharding
    /// stage outside this process.
    pub fn with_route_result(mut self, route_result: RouteResult) -> Self {
        self.route_result = route_result;
        self
    }

    pub fn queries(&self) -> &[String] {
        &self.queries
    }

    pub fn run(&self, router: &Router) -> Result<Vec<RouteContext>, Error> {
        let mut result = vec![];

        for query in &self.queries {
            let statement = Statement::parse(query)?;
            let context = match self.parameters {
                Some(ref parameters) => RouteContext::prepared(statement, parameters.clone()),
                None => RouteContext::new(statement),
            }
            .with_route_result(self.route_result.clone());

            result.push(router.route(&self.database, context)?);
        }

        Ok(result)
    }
}

/// Split on statement boundaries. `;` inside literals and comments
/// doesn't end a statement.
fn split(queries: &str) -> Result<Vec<String>, parser::Error> {
    Ok(pg_query::split_with_parser(queries)?
        .into_iter()
        .map(|q| q.trim())
        .filter(|q| !q.is_empty())
        .map(|q| q.to_string())
        .collect())
}

#[cfg(test)]
mod test {
    use std::io::Write;

    use shadow_router_config::Config;
    use tempfile::NamedTempFile;

    use super::*;
    use crate::router::RouteMapper;

    fn router() -> Router {
        let config: Config = toml::from_str(
            r#"
[[shadow_rules]]
database = "app"

[[shadow_mappings]]
database = "app"
source_db = "ds"
shadow_db = "ds_shadow"
"#,
        )
        .unwrap();

        Router::new(&config).unwrap()
    }

    #[test]
    fn test_split() {
        assert_eq!(
            split("SELECT 1;\n\nSELECT 2;  \n").unwrap(),
            vec!["SELECT 1".to_string(), "SELECT 2".to_string()]
        );
    }

    #[test]
    fn test_split_keeps_literals() {
        assert_eq!(
            split("INSERT INTO notes (body, shadow) VALUES ('a; b', true); SELECT 2").unwrap(),
            vec![
                "INSERT INTO notes (body, shadow) VALUES ('a; b', true)".to_string(),
                "SELECT 2".to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn test_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            "CREATE TABLE users (id BIGINT, shadow BOOLEAN);\nINSERT INTO users (id, shadow) VALUES (1, true);"
        )
        .unwrap();

        let cli = RouterCli::from_file("app", file.path()).await.unwrap();
        assert_eq!(cli.queries().len(), 2);

        let result = cli.run(&router()).unwrap();
        assert_eq!(result[0].route_result().len(), 2);
        assert_eq!(
            result[1].route_result(),
            &RouteResult::from(vec![RouteMapper::identity("ds_shadow")])
        );
    }

    #[test]
    fn test_parameters_and_route_result() {
        let cli = RouterCli::new("app", "DELETE FROM users WHERE shadow = $1")
            .with_parameters(vec![true.into()])
            .with_route_result(RouteResult::from(vec![RouteMapper::new("users", "ds")]));

        let result = cli.run(&router()).unwrap();

        assert_eq!(
            result[0].route_result(),
            &RouteResult::from(vec![RouteMapper::new("users", "ds_shadow")])
        );
    }

    #[test]
    fn test_missing_parameter() {
        let cli = RouterCli::new("app", "DELETE FROM users WHERE shadow = $1");

        assert!(matches!(
            cli.run(&router()),
            Err(Error::Parser(crate::router::parser::Error::MissingParameter(1)))
        ));
    }
}
