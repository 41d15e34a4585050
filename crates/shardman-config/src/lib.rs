//! Configuration loading for shardman.
//!
//! The game install uses two small files under `~/.config/dontstarve/`:
//!
//! - `config`: shell-style `KEY="value"` assignments (shared with the unit
//!   files, hence the format)
//! - `shards.conf`: one shard name per line, in operator-defined priority
//!   order; `#` starts a comment
//!
//! Both are read exactly once at startup into an owned [`Config`] that is
//! passed by reference to every component. There is no process-wide cache
//! and no re-read; a config edit requires a restart.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use shardman_core::{Result, ShardmanError, MASTER_SHARD};
use tracing::{debug, warn};

/// Resolved configuration, constructed once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory the config files were read from.
    pub config_dir: PathBuf,
    /// Game install/save directory (`DONTSTARVE_DIR`).
    pub install_dir: PathBuf,
    /// Cluster name (`CLUSTER_NAME`), names the save subdirectory.
    pub cluster_name: String,
    /// Desired shard names in declared order.
    pub shards: Vec<String>,
    /// Optional override for the updater script (`UPDATER_PATH`).
    pub updater_path: Option<PathBuf>,
}

impl Config {
    /// Load from the default config directory (`~/.config/dontstarve/`).
    pub fn load() -> Result<Self> {
        let base = dirs::config_dir().ok_or_else(|| {
            ShardmanError::internal("could not determine the user config directory")
        })?;
        Self::load_from(&base.join("dontstarve"))
    }

    /// Load from an explicit config directory.
    ///
    /// Missing files degrade to defaults (empty shard list, default install
    /// dir); only an unreadable file that *exists* is an error. The dashboard
    /// stays usable against an unconfigured machine.
    pub fn load_from(config_dir: &Path) -> Result<Self> {
        let values = read_kv_file(&config_dir.join("config"))?;
        let shards = read_shard_list(&config_dir.join("shards.conf"))?;

        let install_dir = match values.get("DONTSTARVE_DIR") {
            Some(dir) => PathBuf::from(dir),
            None => default_install_dir()?,
        };
        let cluster_name = values
            .get("CLUSTER_NAME")
            .cloned()
            .unwrap_or_else(|| "MyDediServer".to_string());
        let updater_path = values.get("UPDATER_PATH").map(PathBuf::from);

        debug!(
            config_dir = %config_dir.display(),
            cluster = %cluster_name,
            shard_count = shards.len(),
            "configuration loaded"
        );

        Ok(Self {
            config_dir: config_dir.to_path_buf(),
            install_dir,
            cluster_name,
            shards,
            updater_path,
        })
    }

    /// Path to the cluster chat log, written by the Master shard.
    pub fn chat_log_path(&self) -> PathBuf {
        self.install_dir
            .join(&self.cluster_name)
            .join(MASTER_SHARD)
            .join("server_chat_log.txt")
    }
}

fn default_install_dir() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| ShardmanError::internal("could not determine the home directory"))?;
    Ok(home.join(".klei").join("DoNotStarveTogether"))
}

/// Parse shell-style `KEY="value"` assignments.
///
/// Blank lines and `#` comments are skipped; quotes around the value are
/// optional; `$VAR`/`${VAR}` references are expanded from the environment.
fn parse_kv(contents: &str) -> HashMap<String, String> {
    let mut values = HashMap::new();
    for line in contents.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let Some((key, raw)) = line.split_once('=') else {
            continue;
        };
        let key = key.trim();
        if key.is_empty() || key.contains(char::is_whitespace) {
            continue;
        }
        let value = raw.trim().trim_matches('"');
        values.insert(key.to_string(), expand_env(value));
    }
    values
}

/// Expand `$NAME` and `${NAME}` from the environment, leaving unset
/// variables in place.
fn expand_env(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.char_indices().peekable();
    while let Some((_, c)) = chars.next() {
        if c != '$' {
            out.push(c);
            continue;
        }
        let braced = matches!(chars.peek(), Some((_, '{')));
        if braced {
            chars.next();
        }
        let mut name = String::new();
        while let Some((_, n)) = chars.peek().copied() {
            if n == '}' && braced {
                chars.next();
                break;
            }
            if n.is_ascii_alphanumeric() || n == '_' {
                name.push(n);
                chars.next();
            } else {
                break;
            }
        }
        if name.is_empty() {
            out.push('$');
            if braced {
                out.push('{');
            }
        } else {
            match std::env::var(&name) {
                Ok(v) => out.push_str(&v),
                Err(_) => {
                    // Leave the reference as written
                    if braced {
                        out.push_str(&format!("${{{name}}}"));
                    } else {
                        out.push_str(&format!("${name}"));
                    }
                }
            }
        }
    }
    out
}

fn read_kv_file(path: &Path) -> Result<HashMap<String, String>> {
    if !path.is_file() {
        warn!(path = %path.display(), "config file missing, using defaults");
        return Ok(HashMap::new());
    }
    let contents = std::fs::read_to_string(path).map_err(|e| ShardmanError::ConfigRead {
        path: path.to_path_buf(),
        source: e,
    })?;
    Ok(parse_kv(&contents))
}

/// Parse the shard list: one name per line, `#` comments, declared order kept.
fn parse_shard_list(contents: &str) -> Vec<String> {
    contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect()
}

fn read_shard_list(path: &Path) -> Result<Vec<String>> {
    if !path.is_file() {
        warn!(path = %path.display(), "shard list missing, fleet is empty");
        return Ok(Vec::new());
    }
    let contents = std::fs::read_to_string(path).map_err(|e| ShardmanError::ConfigRead {
        path: path.to_path_buf(),
        source: e,
    })?;
    Ok(parse_shard_list(&contents))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_kv_quotes_and_comments() {
        let values = parse_kv(
            r#"
# game install
DONTSTARVE_DIR="/srv/dst"
CLUSTER_NAME=Winter

= broken
NOT A KEY = x
"#,
        );
        assert_eq!(values.get("DONTSTARVE_DIR").unwrap(), "/srv/dst");
        assert_eq!(values.get("CLUSTER_NAME").unwrap(), "Winter");
        assert_eq!(values.len(), 2);
    }

    #[test]
    fn test_expand_env() {
        std::env::set_var("SHARDMAN_TEST_VAR", "value");
        assert_eq!(expand_env("$SHARDMAN_TEST_VAR/x"), "value/x");
        assert_eq!(expand_env("${SHARDMAN_TEST_VAR}y"), "valuey");
        assert_eq!(expand_env("$SHARDMAN_UNSET_VAR"), "$SHARDMAN_UNSET_VAR");
        assert_eq!(expand_env("plain"), "plain");
        assert_eq!(expand_env("a$"), "a$");
    }

    #[test]
    fn test_parse_shard_list_keeps_order() {
        let shards = parse_shard_list("Master\n# disabled\n\n  Caves  \nIslands\n");
        assert_eq!(shards, vec!["Master", "Caves", "Islands"]);
    }

    #[test]
    fn test_load_from_missing_files_degrades() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(dir.path()).unwrap();
        assert!(config.shards.is_empty());
        assert_eq!(config.cluster_name, "MyDediServer");
    }

    #[test]
    fn test_load_from_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("config"),
            "DONTSTARVE_DIR=\"/srv/dst\"\nCLUSTER_NAME=\"Winter\"\nUPDATER_PATH=\"/opt/bin/dst-updater\"\n",
        )
        .unwrap();
        std::fs::write(dir.path().join("shards.conf"), "Master\nCaves\n").unwrap();

        let config = Config::load_from(dir.path()).unwrap();
        assert_eq!(config.install_dir, PathBuf::from("/srv/dst"));
        assert_eq!(config.cluster_name, "Winter");
        assert_eq!(config.shards, vec!["Master", "Caves"]);
        assert_eq!(
            config.updater_path.as_deref(),
            Some(Path::new("/opt/bin/dst-updater"))
        );
        assert_eq!(
            config.chat_log_path(),
            PathBuf::from("/srv/dst/Winter/Master/server_chat_log.txt")
        );
    }
}
