use std::path::PathBuf;

/// Namespace prefix used when nothing else is configured.
pub const DEFAULT_PREFIX: &str = "finquest_";

/// Database file name used when no explicit path is given.
const DEFAULT_DB_FILE: &str = "finquest.redb";

/// Configuration for building a [`NamespacedStore`] and its on-disk backend.
///
/// [`NamespacedStore`]: crate::NamespacedStore
#[derive(Debug, Clone, PartialEq)]
pub struct StoreConfig {
    /// Prefix prepended to every physical key.
    pub prefix: String,

    /// Path to the redb database file.
    /// Defaults to `{data_dir}/finquest.redb` if not specified.
    pub db_path: Option<PathBuf>,

    /// Directory holding app data.
    pub data_dir: Option<PathBuf>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            prefix: DEFAULT_PREFIX.to_string(),
            db_path: None,
            data_dir: None,
        }
    }
}

impl StoreConfig {
    /// Parse configuration from command-line style arguments.
    ///
    /// Supported flags:
    /// - `--prefix=PREFIX`
    /// - `--db=PATH`
    /// - `--data-dir=PATH`
    ///
    /// Unknown arguments are ignored.
    pub fn from_args(args: &[String]) -> Self {
        let mut config = StoreConfig::default();

        for arg in args {
            if let Some(val) = arg.strip_prefix("--prefix=") {
                config.prefix = val.to_string();
            } else if let Some(val) = arg.strip_prefix("--db=") {
                config.db_path = Some(PathBuf::from(val));
            } else if let Some(val) = arg.strip_prefix("--data-dir=") {
                config.data_dir = Some(PathBuf::from(val));
            }
        }

        config
    }

    /// Whether `arg` is one of the flags understood by [`StoreConfig::from_args`].
    pub fn is_config_flag(arg: &str) -> bool {
        ["--prefix=", "--db=", "--data-dir="]
            .iter()
            .any(|flag| arg.starts_with(flag))
    }

    /// Resolve the redb database path, falling back to `{data_dir}/finquest.redb`.
    pub fn resolve_db_path(&self) -> PathBuf {
        self.db_path.clone().unwrap_or_else(|| {
            self.data_dir
                .as_ref()
                .map(|d| d.join(DEFAULT_DB_FILE))
                .unwrap_or_else(|| PathBuf::from(DEFAULT_DB_FILE))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_args() {
        let args = vec![
            "--prefix=demo_".to_string(),
            "--data-dir=/tmp/finquest".to_string(),
            "--verbose".to_string(),
        ];
        let config = StoreConfig::from_args(&args);
        assert_eq!(config.prefix, "demo_");
        assert_eq!(config.data_dir, Some(PathBuf::from("/tmp/finquest")));
        assert_eq!(config.db_path, None);
    }

    #[test]
    fn test_is_config_flag() {
        assert!(StoreConfig::is_config_flag("--prefix="));
        assert!(StoreConfig::is_config_flag("--db=/tmp/kv.redb"));
        assert!(StoreConfig::is_config_flag("--data-dir=/data"));
        assert!(!StoreConfig::is_config_flag("--db"));
        assert!(!StoreConfig::is_config_flag("get"));
    }

    #[test]
    fn test_resolve_defaults() {
        assert_eq!(StoreConfig::default().prefix, "finquest_");
        assert_eq!(
            StoreConfig::default().resolve_db_path(),
            PathBuf::from("finquest.redb")
        );

        let config = StoreConfig {
            data_dir: Some(PathBuf::from("/data")),
            ..Default::default()
        };
        assert_eq!(config.resolve_db_path(), PathBuf::from("/data/finquest.redb"));

        let config = StoreConfig {
            data_dir: Some(PathBuf::from("/data")),
            db_path: Some(PathBuf::from("/elsewhere/kv.redb")),
            ..Default::default()
        };
        assert_eq!(config.resolve_db_path(), PathBuf::from("/elsewhere/kv.redb"));
    }
}
