//! Configuration loading for the darkroom workspace.
//!
//! Configuration is merged from two providers: an optional TOML file and
//! `DARKROOM_*` environment variables, environment winning. Credentials are
//! opaque strings threaded to consumers at construction time — no ambient
//! global state, so tests can build a [`Config`] by hand.

pub mod error;

use crate::error::{ErrorKind, Result};
use directories::ProjectDirs;
use exn::{OptionExt, ResultExt};
use figment::Figment;
use figment::providers::{Env, Format, Toml};
use serde::Deserialize;
use std::fmt;
use std::path::{Path, PathBuf};

const ENV_PREFIX: &str = "DARKROOM_";
const CONFIG_FILENAME: &str = "darkroom.toml";

/// API credentials for the remote photo service.
///
/// Treated as opaque strings by everything downstream: the index client
/// sends the access key verbatim in its authorisation header, and nothing
/// in this workspace inspects either value's structure.
#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct Credentials {
    access_key: String,
    secret_key: String,
}

impl Credentials {
    pub fn new(access_key: impl Into<String>, secret_key: impl Into<String>) -> Self {
        Self {
            access_key: access_key.into(),
            secret_key: secret_key.into(),
        }
    }

    pub fn access_key(&self) -> &str {
        &self.access_key
    }

    pub fn secret_key(&self) -> &str {
        &self.secret_key
    }
}
// The secret key must never end up in logs or error reports, and `Debug` is
// exactly how it would get there.
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("access_key", &self.access_key)
            .field("secret_key", &"[redacted]")
            .finish()
    }
}

/// Top-level configuration.
///
/// # Examples
///
/// ```toml
/// # darkroom.toml
/// store_root = "/var/cache/darkroom/objects"
///
/// [credentials]
/// access_key = "..."
/// secret_key = "..."
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub credentials: Credentials,
    /// Override for the on-disk object store location
    #[serde(default)]
    store_root: Option<PathBuf>,
}

impl Config {
    /// Load from the platform config file (if present) merged with the
    /// environment.
    pub fn load() -> Result<Self> {
        let file = project_dirs()?.config_dir().join(CONFIG_FILENAME);
        tracing::debug!(file = %file.display(), "Loading configuration");
        Self::load_from(file)
    }

    /// Load from an explicit TOML file path merged with `DARKROOM_*`
    /// environment variables (environment wins; nested keys use a
    /// double-underscore separator, e.g. `DARKROOM_CREDENTIALS__ACCESS_KEY`).
    ///
    /// The file may be absent — the environment alone can carry a complete
    /// configuration.
    pub fn load_from(file: impl AsRef<Path>) -> Result<Self> {
        Figment::new()
            .merge(Toml::file(file.as_ref()))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
            .or_raise(|| ErrorKind::Load)
    }

    /// Root directory for the persistent object store: the configured
    /// override, or an `objects/` directory under the platform cache dir.
    pub fn store_root(&self) -> Result<PathBuf> {
        match &self.store_root {
            Some(root) => Ok(root.clone()),
            None => Ok(project_dirs()?.cache_dir().join("objects")),
        }
    }
}

fn project_dirs() -> Result<ProjectDirs> {
    ProjectDirs::from("", "", "darkroom").ok_or_raise(|| ErrorKind::MissingProjectDirs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_environment_alone_is_a_complete_configuration() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("DARKROOM_CREDENTIALS__ACCESS_KEY", "env-access");
            jail.set_env("DARKROOM_CREDENTIALS__SECRET_KEY", "env-secret");
            let config = Config::load_from("does-not-exist.toml").unwrap();
            assert_eq!(config.credentials.access_key(), "env-access");
            assert_eq!(config.credentials.secret_key(), "env-secret");
            Ok(())
        });
    }

    #[test]
    fn test_file_provides_configuration() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(
                "darkroom.toml",
                r#"
                    store_root = "/tmp/objects"

                    [credentials]
                    access_key = "file-access"
                    secret_key = "file-secret"
                "#,
            )?;
            let config = Config::load_from("darkroom.toml").unwrap();
            assert_eq!(config.credentials.access_key(), "file-access");
            assert_eq!(config.store_root().unwrap(), PathBuf::from("/tmp/objects"));
            Ok(())
        });
    }

    #[test]
    fn test_environment_overrides_file() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(
                "darkroom.toml",
                r#"
                    [credentials]
                    access_key = "file-access"
                    secret_key = "file-secret"
                "#,
            )?;
            jail.set_env("DARKROOM_CREDENTIALS__ACCESS_KEY", "env-access");
            let config = Config::load_from("darkroom.toml").unwrap();
            assert_eq!(config.credentials.access_key(), "env-access");
            // Unset keys still come from the file.
            assert_eq!(config.credentials.secret_key(), "file-secret");
            Ok(())
        });
    }

    #[test]
    fn test_missing_credentials_fail_to_load() {
        figment::Jail::expect_with(|_jail| {
            let err = Config::load_from("does-not-exist.toml").unwrap_err();
            assert!(matches!(&*err, ErrorKind::Load));
            Ok(())
        });
    }

    #[test]
    fn test_debug_redacts_the_secret_key() {
        let credentials = Credentials::new("visible", "super-secret");
        let debug = format!("{credentials:?}");
        assert!(debug.contains("visible"));
        assert!(debug.contains("[redacted]"));
        assert!(!debug.contains("super-secret"));
    }
}
