use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::path::Path;

/// Application configuration.
///
/// Every field has a built-in default so the binary runs without a config
/// file: the standard seven-department catalog, lenient unknown-id handling,
/// and the embedded fallback dataset. Remote credentials are never read from
/// the file; they come from the `TIMETABLE_REMOTE_URL` and
/// `TIMETABLE_REMOTE_KEY` environment variables.
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Department id unknown ids resolve to under the `default` policy.
    #[serde(default = "default_department_id")]
    pub default_department: String,
    #[serde(default)]
    pub unknown_department: UnknownDepartmentPolicy,
    /// The department catalog. Omitting all `[[departments]]` entries uses
    /// the built-in set.
    #[serde(default = "default_departments")]
    pub departments: Vec<DepartmentEntry>,
    #[serde(default)]
    pub remote: RemoteConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_department: default_department_id(),
            unknown_department: UnknownDepartmentPolicy::default(),
            departments: default_departments(),
            remote: RemoteConfig::default(),
            server: ServerConfig::default(),
        }
    }
}

/// What to do when a search names a department id not in the catalog.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum UnknownDepartmentPolicy {
    /// Resolve unknown ids to `default_department`. The lenient behavior the
    /// search forms have always relied on.
    #[default]
    Default,
    /// Fail the search with an error.
    Strict,
}

/// One department catalog entry: UI id, backend table, display name.
#[derive(Debug, Deserialize, Clone)]
pub struct DepartmentEntry {
    pub id: String,
    /// Backend table name. Defaults to the id.
    #[serde(default)]
    pub table: Option<String>,
    pub name: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct RemoteConfig {
    /// Per-request timeout for remote lookups, in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

fn default_department_id() -> String {
    "bca".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_bind() -> String {
    "127.0.0.1:7430".to_string()
}

fn default_departments() -> Vec<DepartmentEntry> {
    let entry = |id: &str, name: &str| DepartmentEntry {
        id: id.to_string(),
        table: None,
        name: name.to_string(),
    };
    vec![
        entry("bca", "BCA"),
        entry("bsc_ai_ds", "BSc.AI&DS"),
        entry("cs", "Computer Science"),
        entry("math", "Mathematics"),
        entry("eng", "Engineering"),
        entry("sci", "Science"),
        entry("arts", "Arts & Humanities"),
    ]
}

/// Load configuration from a TOML file.
///
/// A missing file is not an error: built-in defaults apply, so `tts` works
/// out of the box against the embedded dataset.
pub fn load_config(path: &Path) -> Result<Config> {
    if !path.exists() {
        return Ok(Config::default());
    }
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    parse_config(&content)
}

/// Parse and validate a TOML configuration string.
pub fn parse_config(content: &str) -> Result<Config> {
    let config: Config = toml::from_str(content).with_context(|| "Failed to parse config file")?;

    if config.departments.is_empty() {
        bail!("departments must not be empty");
    }

    let mut seen = std::collections::HashSet::new();
    for entry in &config.departments {
        // Ids are matched with hyphens normalized to underscores, so the
        // uniqueness check must use the same form.
        let id = entry.id.replace('-', "_");
        if id.is_empty() {
            bail!("department id must not be empty");
        }
        if entry.name.is_empty() {
            bail!("department '{}' must have a display name", entry.id);
        }
        if !seen.insert(id) {
            bail!("duplicate department id: {}", entry.id);
        }
    }

    let default_id = config.default_department.replace('-', "_");
    if !config
        .departments
        .iter()
        .any(|d| d.id.replace('-', "_") == default_id)
    {
        bail!(
            "default_department '{}' is not in the department catalog",
            config.default_department
        );
    }

    if config.remote.timeout_secs == 0 {
        bail!("remote.timeout_secs must be > 0");
    }

    if config.server.bind.is_empty() {
        bail!("server.bind must not be empty");
    }

    Ok(config)
}
