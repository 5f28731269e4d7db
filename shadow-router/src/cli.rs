use std::path::PathBuf;

use clap::{Parser, Subcommand};
use shadow_router_config::Config;
use thiserror::Error;
use tracing::info;

use crate::router::{cli::RouterCli, parser::Parameter, Error, RouteMapper, RouteResult, Router};

/// Shadow traffic router for a sharding PostgreSQL proxy.
#[derive(Parser, Debug)]
#[command(name = "", version = concat!("shadow-router v", env!("CARGO_PKG_VERSION")))]
pub struct Cli {
    /// Path to the configuration file. Default: "shadow-router.toml"
    #[arg(short, long, default_value = "shadow-router.toml")]
    pub config: PathBuf,
    /// Subcommand.
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Execute the router on the queries.
    Route {
        /// Logical database in shadow-router.toml.
        #[arg(short, long)]
        database: String,

        /// Query to route.
        #[arg(short, long, conflicts_with = "file", required_unless_present = "file")]
        query: Option<String>,

        /// Path to the file containing the queries.
        #[arg(short, long)]
        file: Option<PathBuf>,

        /// Bound parameters as a JSON array, e.g. '[1, true]'.
        #[arg(short, long)]
        params: Option<String>,

        /// Route resolved by an earlier stage, as "logical:physical".
        #[arg(short, long)]
        route: Vec<String>,
    },

    /// Check the configuration file for errors.
    Configcheck,
}

#[derive(Debug, Error)]
pub enum CliError {
    #[error("{0}")]
    Router(#[from] Error),

    #[error("invalid parameters: {0}")]
    Parameters(#[from] serde_json::Error),

    #[error("invalid route \"{0}\", expected \"logical:physical\"")]
    Route(String),
}

#[derive(Debug, Error)]
pub enum ConfigCheckError {
    #[error("I/O error on `{0}`: {1}")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("TOML parse error in `{0}`: {1}")]
    Parse(PathBuf, #[source] toml::de::Error),

    #[error("invalid shadow rules in `{0}`: {1}")]
    Rules(PathBuf, #[source] Error),
}

/// Confirm that the configuration file is valid and every
/// shadow mapping can be built.
pub fn config_check(path: PathBuf) -> Result<(), ConfigCheckError> {
    let source =
        std::fs::read_to_string(&path).map_err(|err| ConfigCheckError::Io(path.clone(), err))?;
    let config: Config =
        toml::from_str(&source).map_err(|err| ConfigCheckError::Parse(path.clone(), err))?;

    config.check();

    Router::new(&config).map_err(|err| ConfigCheckError::Rules(path.clone(), err))?;

    info!("\"{}\" is valid", path.display());

    Ok(())
}

/// Parse "logical:physical" route entries.
pub fn parse_routes(routes: &[String]) -> Result<RouteResult, CliError> {
    routes
        .iter()
        .map(|route| match route.split_once(':') {
            Some((logical, physical)) if !logical.is_empty() && !physical.is_empty() => {
                Ok(RouteMapper::new(logical, physical))
            }
            _ => Err(CliError::Route(route.clone())),
        })
        .collect()
}

/// Route the queries and print the result for each one.
#[allow(clippy::print_stdout)]
pub async fn route(config: &Config, command: Commands) -> Result<(), CliError> {
    let Commands::Route {
        database,
        query,
        file,
        params,
        route,
    } = command
    else {
        return Ok(());
    };

    let router = Router::new(config)?;

    let cli = match (query, file) {
        (Some(query), _) => RouterCli::new(&database, query),
        (None, Some(file)) => RouterCli::from_file(&database, file).await?,
        (None, None) => return Ok(()),
    };

    let cli = match params {
        Some(params) => cli.with_parameters(serde_json::from_str::<Vec<Parameter>>(&params)?),
        None => cli,
    };

    let cli = cli.with_route_result(parse_routes(&route)?);

    for (query, context) in cli.queries().iter().zip(cli.run(&router)?) {
        println!("{} => {}", query, context.route_result());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use tempfile::NamedTempFile;

    use super::*;

    #[test]
    fn test_parse_routes() {
        let routes = parse_routes(&["users:ds_0".into(), "orders:ds_1".into()]).unwrap();
        assert_eq!(
            routes,
            RouteResult::from(vec![
                RouteMapper::new("users", "ds_0"),
                RouteMapper::new("orders", "ds_1"),
            ])
        );

        assert!(matches!(
            parse_routes(&["users".into()]),
            Err(CliError::Route(route)) if route == "users"
        ));
        assert!(parse_routes(&[":ds_0".into()]).is_err());
    }

    #[test]
    fn test_cli_args() {
        let cli = Cli::parse_from([
            "shadow-router",
            "route",
            "--database",
            "app",
            "--query",
            "SELECT 1",
            "--route",
            "users:ds",
            "--route",
            "orders:ds",
        ]);

        assert_eq!(cli.config, PathBuf::from("shadow-router.toml"));
        match cli.command {
            Commands::Route {
                database, route, ..
            } => {
                assert_eq!(database, "app");
                assert_eq!(route.len(), 2);
            }
            _ => panic!("expected route command"),
        }

        assert!(Cli::try_parse_from(["shadow-router", "route", "--database", "app"]).is_err());
    }

    #[test]
    fn test_config_check() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[[shadow_rules]]
database = "app"

[[shadow_mappings]]
database = "app"
source_db = "ds"
shadow_db = "ds_shadow"
"#
        )
        .unwrap();
        assert!(config_check(file.path().to_path_buf()).is_ok());

        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[[shadow_rules]]
database = "app"

[[shadow_mappings]]
database = "app"
source_db = ""
shadow_db = "ds_shadow"
"#
        )
        .unwrap();
        assert!(matches!(
            config_check(file.path().to_path_buf()),
            Err(ConfigCheckError::Rules(_, Error::EmptyDataSourceName))
        ));

        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[[shadow_rules]]\ndatabase = \"app\"").unwrap();
        assert!(matches!(
            config_check(file.path().to_path_buf()),
            Err(ConfigCheckError::Rules(_, Error::EmptyShadowMapping(database))) if database == "app"
        ));

        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[[shadow_rules]]\ndatabase = 1").unwrap();
        assert!(matches!(
            config_check(file.path().to_path_buf()),
            Err(ConfigCheckError::Parse(_, _))
        ));

        assert!(matches!(
            config_check(PathBuf::from("/does/not/exist.toml")),
            Err(ConfigCheckError::Io(_, _))
        ));
    }
}
