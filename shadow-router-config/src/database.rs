use serde::{Deserialize, Serialize};

/// A physical data source, production or shadow.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Database {
    /// Name used in shadow mappings and route results.
    pub name: String,
    /// Hostname or IP address.
    #[serde(default = "Database::host")]
    pub host: String,
    /// Port.
    #[serde(default = "Database::port")]
    pub port: u16,
    /// Name of the Postgres database on the server, if different from `name`.
    pub database_name: Option<String>,
}

impl Database {
    fn host() -> String {
        "127.0.0.1".into()
    }

    fn port() -> u16 {
        5432
    }

    /// Database name on the server.
    pub fn database_name(&self) -> &str {
        self.database_name.as_deref().unwrap_or(&self.name)
    }
}

impl std::fmt::Display for Database {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} ({}:{}/{})",
            self.name,
            self.host,
            self.port,
            self.database_name()
        )
    }
}
