use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fs::read_to_string;
use std::io::ErrorKind;
use std::path::Path;
use tracing::{info, warn};

use super::database::Database;
use super::error::Error;
use super::general::General;
use super::rules::{RuleConfig, RuleKind};
use super::shadow::{ShadowMapping, ShadowRule};

/// Configuration.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// General configuration.
    #[serde(default)]
    pub general: General,

    /// Data sources.
    #[serde(default)]
    pub databases: Vec<Database>,

    /// Databases with shadow routing enabled.
    #[serde(default)]
    pub shadow_rules: Vec<ShadowRule>,

    /// Production to shadow data source pairs.
    #[serde(default)]
    pub shadow_mappings: Vec<ShadowMapping>,

    /// Other routing rules, evaluated by their own decorators.
    #[serde(default)]
    pub rules: Vec<RuleConfig>,
}

impl Config {
    /// Load configuration from disk or use defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = path.as_ref();

        let config: Config = match read_to_string(path) {
            Ok(config) => {
                let config = match toml::from_str(&config) {
                    Ok(config) => config,
                    Err(err) => return Err(Error::config(&config, err)),
                };
                info!("loaded \"{}\"", path.display());
                config
            }
            Err(err) if err.kind() == ErrorKind::NotFound => {
                warn!(
                    "\"{}\" doesn't exist, loading defaults instead",
                    path.display()
                );
                Config::default()
            }
            Err(err) => return Err(Error::Io(err)),
        };

        config.check();

        Ok(config)
    }

    /// Shadow rule for a database, if any.
    pub fn shadow_rule(&self, database: &str) -> Option<&ShadowRule> {
        self.shadow_rules.iter().find(|rule| rule.database == database)
    }

    /// Organize shadow mappings by database name.
    pub fn shadow_mappings(&self) -> HashMap<String, Vec<ShadowMapping>> {
        let mut mappings = HashMap::new();

        for mapping in &self.shadow_mappings {
            let entry = mappings
                .entry(mapping.database.clone())
                .or_insert_with(Vec::new);
            entry.push(mapping.clone());
        }

        mappings
    }

    /// Organize rule types by database name.
    pub fn rules(&self) -> HashMap<String, Vec<RuleKind>> {
        let mut rules = HashMap::new();

        for rule in &self.rules {
            let entry: &mut Vec<RuleKind> = rules.entry(rule.database.clone()).or_default();
            if !entry.contains(&rule.kind) {
                entry.push(rule.kind);
            }
        }

        rules
    }

    /// Names of all logical databases mentioned by any rule.
    pub fn logical_databases(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        self.shadow_rules
            .iter()
            .map(|rule| rule.database.clone())
            .chain(self.rules.iter().map(|rule| rule.database.clone()))
            .filter(|database| seen.insert(database.clone()))
            .collect()
    }

    pub fn check(&self) {
        let declared = self
            .databases
            .iter()
            .map(|database| database.name.as_str())
            .collect::<HashSet<_>>();

        let mut duplicate_rules = HashSet::new();
        for rule in &self.shadow_rules {
            if !duplicate_rules.insert(rule.database.as_str()) {
                warn!(
                    "database \"{}\" has more than one shadow rule, only the first one is used",
                    rule.database
                );
            }
        }

        for mapping in &self.shadow_mappings {
            if self.shadow_rule(&mapping.database).is_none() {
                warn!(
                    "shadow mapping \"{}\" -> \"{}\" belongs to database \"{}\" which has no shadow rule",
                    mapping.source_db, mapping.shadow_db, mapping.database
                );
            }

            // Data sources are optional, only check them if some are declared.
            if declared.is_empty() {
                continue;
            }

            for name in [&mapping.source_db, &mapping.shadow_db] {
                if !declared.contains(name.as_str()) {
                    warn!(
                        "shadow mapping for database \"{}\" references undeclared data source \"{}\"",
                        mapping.database, name
                    );
                }
            }
        }

        for rule in &self.shadow_rules {
            if !self
                .shadow_mappings
                .iter()
                .any(|mapping| mapping.database == rule.database)
            {
                warn!(
                    "database \"{}\" has a shadow rule but no shadow mappings",
                    rule.database
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::sync::{Arc, Mutex};
    use tempfile::NamedTempFile;
    use tracing_subscriber::fmt::MakeWriter;

    /// Log output captured in memory.
    #[derive(Clone, Default)]
    struct Buffer(Arc<Mutex<Vec<u8>>>);

    impl Buffer {
        fn contents(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    impl Write for Buffer {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for Buffer {
        type Writer = Buffer;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    const SOURCE: &str = r#"
[[databases]]
name = "ds"
host = "127.0.0.1"
port = 5432

[[databases]]
name = "ds_shadow"
host = "127.0.0.1"
port = 5433
database_name = "ds"

[[shadow_rules]]
database = "app"
column = "is_shadow"

[[shadow_mappings]]
database = "app"
source_db = "ds"
shadow_db = "ds_shadow"

[[rules]]
database = "app"
type = "sharding"

[[rules]]
database = "app"
type = "sharding"

[[rules]]
database = "reporting"
type = "read_write_split"
"#;

    #[test]
    fn test_basic() {
        let config: Config = toml::from_str(SOURCE).unwrap();

        assert_eq!(config.databases.len(), 2);
        assert_eq!(config.databases[1].database_name(), "ds");
        assert_eq!(config.databases[0].database_name(), "ds");
        assert_eq!(config.databases[1].port, 5433);

        let rule = config.shadow_rule("app").unwrap();
        assert_eq!(rule.column, "is_shadow");
        assert!(config.shadow_rule("reporting").is_none());

        let mappings = config.shadow_mappings();
        assert_eq!(mappings["app"].len(), 1);
        assert_eq!(mappings["app"][0].source_db, "ds");
        assert_eq!(mappings["app"][0].shadow_db, "ds_shadow");

        let rules = config.rules();
        assert_eq!(rules["app"], vec![RuleKind::Sharding]);
        assert_eq!(rules["reporting"], vec![RuleKind::ReadWriteSplit]);

        assert_eq!(config.logical_databases(), vec!["app", "reporting"]);
    }

    #[test]
    fn test_default_shadow_column() {
        let config: Config = toml::from_str(
            r#"
[[shadow_rules]]
database = "app"
"#,
        )
        .unwrap();

        assert_eq!(config.shadow_rule("app").unwrap().column, "shadow");
    }

    #[test]
    fn test_unknown_fields_rejected() {
        let result = toml::from_str::<Config>(
            r#"
[[shadow_mappings]]
database = "app"
source_db = "ds"
shadow = "ds_shadow"
"#,
        );

        assert!(result.is_err());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(SOURCE.as_bytes()).unwrap();
        file.flush().unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.shadow_mappings.len(), 1);
        assert_eq!(config.rules.len(), 3);
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load(dir.path().join("missing.toml")).unwrap();

        assert!(config.shadow_rules.is_empty());
        assert!(config.shadow_mappings.is_empty());
    }

    #[test]
    fn test_load_unreadable_path() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::load(dir.path()).unwrap_err();

        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_check_warnings() {
        let config: Config = toml::from_str(
            r#"
[[databases]]
name = "ds"

[[shadow_rules]]
database = "app"

[[shadow_rules]]
database = "app"

[[shadow_rules]]
database = "empty"

[[shadow_mappings]]
database = "app"
source_db = "ds"
shadow_db = "ds_shadow"

[[shadow_mappings]]
database = "orphan"
source_db = "ds"
shadow_db = "ds_other"
"#,
        )
        .unwrap();

        let buffer = Buffer::default();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(buffer.clone())
            .with_ansi(false)
            .finish();

        tracing::subscriber::with_default(subscriber, || config.check());

        let output = buffer.contents();
        assert!(output.contains("database \"app\" has more than one shadow rule"));
        assert!(output.contains("belongs to database \"orphan\" which has no shadow rule"));
        assert!(output.contains("undeclared data source \"ds_shadow\""));
        assert!(output.contains("database \"empty\" has a shadow rule but no shadow mappings"));
    }

    #[test]
    fn test_load_invalid_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"[[shadow_rules]]\ncolumn = \"shadow\"\n")
            .unwrap();
        file.flush().unwrap();

        let err = Config::load(file.path()).unwrap_err();
        assert!(matches!(err, Error::Parse { .. }));
    }
}
