// Configuration constants and env-file helpers
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::errors::LoaderError;

// Neo4j connection defaults
pub const DEFAULT_NEO4J_URI: &str = "bolt://localhost:7687";
pub const NEO4J_MAX_CONNECTIONS: usize = 1;

// Env file location, relative to the working directory
pub const DEFAULT_ENV_FILE: &str = "../.env";
pub const ENV_FILE_OVERRIDE_VAR: &str = "EMPLOYEES_ENV_FILE";

// Env file keys
pub const DB_USER_KEY: &str = "DB_USER";
pub const DB_PASSWORD_KEY: &str = "DB_PASSWORD";
pub const NEO4J_URI_KEY: &str = "NEO4J_URI";
pub const NEO4J_DATABASE_KEY: &str = "NEO4J_DATABASE";
pub const BOSS_IMPORT_MODE_KEY: &str = "BOSS_IMPORT_MODE";
pub const CONFIG_KEYS: [&str; 5] = [
    DB_USER_KEY,
    DB_PASSWORD_KEY,
    NEO4J_URI_KEY,
    NEO4J_DATABASE_KEY,
    BOSS_IMPORT_MODE_KEY,
];

// Remote CSV sources, fetched server-side by LOAD CSV
pub const CSV_BASE_URL: &str =
    "https://raw.githubusercontent.com/veben/neo4j_employees/main/resources/data";
pub const BOSS_CSV_FILE: &str = "employees-and-their-boss.csv";
pub const FRIENDS_CSV_FILE: &str = "employees-and-their-friends.csv";
pub const SKILLS_CSV_FILE: &str = "employees-and-their-skills.csv";

// Dry-run download timeout
pub const PREVIEW_FETCH_TIMEOUT_SECS: u64 = 30;

/// Get the env file path, honouring `EMPLOYEES_ENV_FILE` when set
pub fn get_env_file_path() -> PathBuf {
    std::env::var(ENV_FILE_OVERRIDE_VAR)
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_ENV_FILE))
}

/// Key/value pairs parsed once from a dotenv file.
///
/// Parsing never writes to the process environment. Variables already set in
/// the process take precedence only for the keys passed to
/// [`EnvFile::with_process_overrides`].
#[derive(Debug, Clone, Default)]
pub struct EnvFile {
    values: HashMap<String, String>,
}

impl EnvFile {
    /// Parse the file at `path`. An unreadable or malformed file is an error.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, LoaderError> {
        let path = path.as_ref();
        let env_error = |source| LoaderError::EnvFile {
            path: path.to_path_buf(),
            source,
        };

        // `from_path` would load straight into the process environment
        #[allow(deprecated)]
        let items = dotenv::from_path_iter(path).map_err(env_error)?;

        let mut values = HashMap::new();
        for item in items {
            let (key, value) = item.map_err(env_error)?;
            values.insert(key, value);
        }

        Ok(Self { values })
    }

    /// Replace the file's value for each of `keys` that is set in the process
    /// environment, so an exported variable wins over the file.
    pub fn with_process_overrides(mut self, keys: &[&str]) -> Self {
        for key in keys {
            if let Ok(value) = std::env::var(key) {
                self.values.insert((*key).to_string(), value);
            }
        }
        self
    }

    /// Value for `key`, or an empty string when the key is absent
    pub fn get(&self, key: &str) -> String {
        self.values.get(key).cloned().unwrap_or_default()
    }

    /// Value for `key`, treating absent and empty values alike
    pub fn get_non_empty(&self, key: &str) -> Option<&str> {
        self.values
            .get(key)
            .map(String::as_str)
            .filter(|value| !value.is_empty())
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for EnvFile {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        }
    }
}

/// How the boss import binds the employee node of each row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BossImportMode {
    /// `CREATE` the employee on every row. Re-running duplicates Employee
    /// nodes and REPORTS_TO edges.
    #[default]
    Create,
    /// `MERGE` the employee, making the boss import idempotent like the
    /// friends and skills imports.
    Merge,
}

impl BossImportMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            BossImportMode::Create => "create",
            BossImportMode::Merge => "merge",
        }
    }
}

impl fmt::Display for BossImportMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for BossImportMode {
    type Err = LoaderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "create" => Ok(BossImportMode::Create),
            "merge" => Ok(BossImportMode::Merge),
            other => Err(LoaderError::InvalidConfig(format!(
                "{} must be 'create' or 'merge', got '{}'",
                BOSS_IMPORT_MODE_KEY, other
            ))),
        }
    }
}

/// Everything the loader needs to reach the database.
///
/// Built once at startup and handed to [`crate::neo4j::connect`].
#[derive(Clone)]
pub struct LoaderConfig {
    pub uri: String,
    pub user: String,
    pub password: String,
    /// Target database; `None` uses the server's default database.
    pub database: Option<String>,
    pub boss_mode: BossImportMode,
}

impl LoaderConfig {
    /// Build the config from a parsed env file.
    ///
    /// Missing credentials become empty strings and are left for the server
    /// to reject.
    pub fn from_env_file(env: &EnvFile) -> Result<Self, LoaderError> {
        let boss_mode = match env.get_non_empty(BOSS_IMPORT_MODE_KEY) {
            Some(mode) => mode.parse()?,
            None => BossImportMode::default(),
        };

        Ok(Self {
            uri: env
                .get_non_empty(NEO4J_URI_KEY)
                .unwrap_or(DEFAULT_NEO4J_URI)
                .to_string(),
            user: env.get(DB_USER_KEY),
            password: env.get(DB_PASSWORD_KEY),
            database: env.get_non_empty(NEO4J_DATABASE_KEY).map(str::to_string),
            boss_mode,
        })
    }

    /// Load the env file at `path` and build the config from it.
    ///
    /// Any of the [`CONFIG_KEYS`] already exported in the process overrides
    /// the file's value.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, LoaderError> {
        Self::from_env_file(&EnvFile::load(path)?.with_process_overrides(&CONFIG_KEYS))
    }
}

impl fmt::Debug for LoaderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoaderConfig")
            .field("uri", &self.uri)
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .field("database", &self.database)
            .field("boss_mode", &self.boss_mode)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_env_file(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_env_file_reads_credentials() {
        let file = write_env_file("DB_USER=neo4j\nDB_PASSWORD=s3cret\n");
        let env = EnvFile::load(file.path()).unwrap();

        assert_eq!(env.get(DB_USER_KEY), "neo4j");
        assert_eq!(env.get(DB_PASSWORD_KEY), "s3cret");
    }

    #[test]
    fn test_env_file_missing_key_is_empty() {
        let file = write_env_file("DB_USER=neo4j\n");
        let env = EnvFile::load(file.path()).unwrap();

        assert_eq!(env.get(DB_PASSWORD_KEY), "");
        assert!(env.get_non_empty(DB_PASSWORD_KEY).is_none());
    }

    #[test]
    fn test_env_file_unreadable_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.env");

        let err = EnvFile::load(&missing).unwrap_err();
        match err {
            LoaderError::EnvFile { path, .. } => assert_eq!(path, missing),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_env_file_does_not_touch_process_env() {
        let file = write_env_file("EMPLOYEES_LOADER_TEST_ONLY_KEY=1\n");
        let _env = EnvFile::load(file.path()).unwrap();

        assert!(std::env::var("EMPLOYEES_LOADER_TEST_ONLY_KEY").is_err());
    }

    #[test]
    fn test_process_env_overrides_file() {
        let file = write_env_file(
            "EMPLOYEES_LOADER_TEST_USER=from_file\nEMPLOYEES_LOADER_TEST_PASSWORD=from_file\n",
        );
        std::env::set_var("EMPLOYEES_LOADER_TEST_USER", "from_process");

        let env = EnvFile::load(file.path()).unwrap().with_process_overrides(&[
            "EMPLOYEES_LOADER_TEST_USER",
            "EMPLOYEES_LOADER_TEST_PASSWORD",
            "EMPLOYEES_LOADER_TEST_UNSET",
        ]);
        std::env::remove_var("EMPLOYEES_LOADER_TEST_USER");

        assert_eq!(env.get("EMPLOYEES_LOADER_TEST_USER"), "from_process");
        assert_eq!(env.get("EMPLOYEES_LOADER_TEST_PASSWORD"), "from_file");
        assert_eq!(env.get("EMPLOYEES_LOADER_TEST_UNSET"), "");
    }

    #[test]
    fn test_config_defaults() {
        let env: EnvFile = [("DB_USER", "neo4j"), ("DB_PASSWORD", "pw")]
            .into_iter()
            .collect();
        let config = LoaderConfig::from_env_file(&env).unwrap();

        assert_eq!(config.uri, DEFAULT_NEO4J_URI);
        assert_eq!(config.user, "neo4j");
        assert_eq!(config.password, "pw");
        assert_eq!(config.database, None);
        assert_eq!(config.boss_mode, BossImportMode::Create);
    }

    #[test]
    fn test_config_overrides() {
        let env: EnvFile = [
            ("NEO4J_URI", "neo4j://db.internal:7687"),
            ("NEO4J_DATABASE", "employees"),
            ("BOSS_IMPORT_MODE", "Merge"),
        ]
        .into_iter()
        .collect();
        let config = LoaderConfig::from_env_file(&env).unwrap();

        assert_eq!(config.uri, "neo4j://db.internal:7687");
        assert_eq!(config.database.as_deref(), Some("employees"));
        assert_eq!(config.boss_mode, BossImportMode::Merge);
        assert_eq!(config.user, "");
    }

    #[test]
    fn test_config_rejects_unknown_boss_mode() {
        let env: EnvFile = [("BOSS_IMPORT_MODE", "upsert")].into_iter().collect();
        let err = LoaderConfig::from_env_file(&env).unwrap_err();

        assert!(matches!(err, LoaderError::InvalidConfig(_)));
    }

    #[test]
    fn test_debug_redacts_password() {
        let env: EnvFile = [("DB_PASSWORD", "hunter2")].into_iter().collect();
        let config = LoaderConfig::from_env_file(&env).unwrap();

        assert!(!format!("{config:?}").contains("hunter2"));
    }
}
