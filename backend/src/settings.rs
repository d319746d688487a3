//! Service settings loaded via OrthoConfig.
//!
//! Every field is layered from `BOOKSTORE_*` environment variables and the
//! command line. The connection string itself normally lives in
//! `appsettings.json`; `BOOKSTORE_DEFAULT_CONNECTION` overrides it.

use std::fmt;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;

use ortho_config::OrthoConfig;
use serde::Deserialize;
use thiserror::Error;

use crate::outbound::persistence::{
    ConnectionConfig, ConnectionConfigError, ContextFactoryError, SETTINGS_FILE_NAME,
    load_connection_string,
};

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";

/// Hosting environment; controls developer diagnostics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Environment {
    /// Local development; failures render the diagnostics page.
    Development,
    /// Any deployed environment; internal errors stay redacted.
    #[default]
    Production,
}

impl Environment {
    /// Whether developer diagnostics should be installed.
    ///
    /// # Examples
    /// ```
    /// use bookstore::settings::Environment;
    ///
    /// let env: Environment = "dev".parse().expect("known environment");
    /// assert!(env.is_development());
    /// assert!(!Environment::default().is_development());
    /// ```
    #[must_use]
    pub fn is_development(self) -> bool {
        self == Self::Development
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Development => "Development",
            Self::Production => "Production",
        })
    }
}

impl FromStr for Environment {
    type Err = SettingsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" => Ok(Self::Development),
            "production" | "prod" => Ok(Self::Production),
            _ => Err(SettingsError::UnknownEnvironment {
                value: s.to_owned(),
            }),
        }
    }
}

/// Errors raised while resolving settings into usable values.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// `BOOKSTORE_ENVIRONMENT` names no known environment.
    #[error("unknown environment `{value}` (expected Development or Production)")]
    UnknownEnvironment { value: String },
    /// `BOOKSTORE_BIND_ADDR` is not a socket address.
    #[error("invalid bind address `{value}`: {source}")]
    BindAddr {
        value: String,
        #[source]
        source: std::net::AddrParseError,
    },
    /// The settings file could not be read or lacks the connection string.
    #[error(transparent)]
    SettingsFile(#[from] ContextFactoryError),
    /// The connection string is not a usable PostgreSQL URL.
    #[error("invalid connection string: {0}")]
    Connection(#[from] ConnectionConfigError),
}

/// Configuration values controlling the service process.
#[derive(Debug, Clone, Default, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "BOOKSTORE")]
pub struct AppSettings {
    /// Connection string overriding `ConnectionStrings.DefaultConnection`.
    pub default_connection: Option<String>,
    /// Location of `appsettings.json`.
    pub settings_path: Option<PathBuf>,
    /// Socket address to listen on.
    pub bind_addr: Option<String>,
    /// `Development` or `Production`.
    pub environment: Option<String>,
    /// Port used to build HTTPS redirect targets.
    pub https_port: Option<u16>,
}

impl AppSettings {
    /// Return the settings file path, defaulting to the working directory.
    pub fn settings_path(&self) -> PathBuf {
        self.settings_path
            .clone()
            .unwrap_or_else(|| PathBuf::from(SETTINGS_FILE_NAME))
    }

    /// Return the bind address, falling back to `0.0.0.0:8080`.
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let raw = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        raw.parse().map_err(|source| SettingsError::BindAddr {
            value: raw.to_owned(),
            source,
        })
    }

    /// Return the hosting environment; absent means production.
    pub fn environment(&self) -> Result<Environment, SettingsError> {
        self.environment
            .as_deref()
            .map_or(Ok(Environment::default()), str::parse)
    }

    /// Resolve the active connection configuration.
    ///
    /// A non-blank override wins; otherwise the settings file must supply
    /// `ConnectionStrings.DefaultConnection`.
    pub fn connection(&self) -> Result<ConnectionConfig, SettingsError> {
        let raw = match self
            .default_connection
            .as_deref()
            .filter(|raw| !raw.trim().is_empty())
        {
            Some(raw) => raw.to_owned(),
            None => load_connection_string(&self.settings_path())?,
        };
        Ok(ConnectionConfig::parse(&raw)?)
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for settings layering and resolution.

    use super::*;
    use std::ffi::OsString;
    use std::fs;

    use env_lock::lock_env;
    use rstest::rstest;

    const VARS: [&str; 5] = [
        "BOOKSTORE_DEFAULT_CONNECTION",
        "BOOKSTORE_SETTINGS_PATH",
        "BOOKSTORE_BIND_ADDR",
        "BOOKSTORE_ENVIRONMENT",
        "BOOKSTORE_HTTPS_PORT",
    ];

    fn load_from_empty_args() -> AppSettings {
        AppSettings::load_from_iter([OsString::from("bookstore")]).expect("config should load")
    }

    fn cleared() -> Vec<(&'static str, Option<String>)> {
        VARS.iter().map(|name| (*name, None)).collect()
    }

    #[rstest]
    fn defaults_apply_when_unset() {
        let _guard = lock_env(cleared());

        let settings = load_from_empty_args();
        assert_eq!(
            settings.bind_addr().expect("default address"),
            DEFAULT_BIND_ADDR.parse::<SocketAddr>().expect("literal")
        );
        assert_eq!(
            settings.environment().expect("default environment"),
            Environment::Production
        );
        assert_eq!(settings.settings_path(), PathBuf::from(SETTINGS_FILE_NAME));
        assert!(settings.https_port.is_none());
    }

    #[rstest]
    fn environment_overrides_are_respected() {
        let mut vars = cleared();
        vars.extend([
            ("BOOKSTORE_BIND_ADDR", Some("127.0.0.1:9000".to_owned())),
            ("BOOKSTORE_ENVIRONMENT", Some("Development".to_owned())),
            ("BOOKSTORE_HTTPS_PORT", Some("8443".to_owned())),
        ]);
        let _guard = lock_env(vars);

        let settings = load_from_empty_args();
        assert_eq!(
            settings.bind_addr().expect("bind address"),
            "127.0.0.1:9000".parse::<SocketAddr>().expect("literal")
        );
        assert!(settings.environment().expect("environment").is_development());
        assert_eq!(settings.https_port, Some(8443));
    }

    #[rstest]
    #[case("development", Environment::Development)]
    #[case("PRODUCTION", Environment::Production)]
    #[case(" dev ", Environment::Development)]
    fn parses_environment_names(#[case] raw: &str, #[case] expected: Environment) {
        assert_eq!(raw.parse::<Environment>().expect("known name"), expected);
    }

    #[rstest]
    fn rejects_unknown_environment() {
        let settings = AppSettings {
            environment: Some("Staging".to_owned()),
            ..AppSettings::default()
        };
        assert!(matches!(
            settings.environment(),
            Err(SettingsError::UnknownEnvironment { .. })
        ));
    }

    #[rstest]
    fn rejects_malformed_bind_addr() {
        let settings = AppSettings {
            bind_addr: Some("localhost".to_owned()),
            ..AppSettings::default()
        };
        assert!(matches!(
            settings.bind_addr(),
            Err(SettingsError::BindAddr { .. })
        ));
    }

    #[rstest]
    fn override_takes_precedence_over_file() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join(SETTINGS_FILE_NAME);
        fs::write(
            &path,
            r#"{"ConnectionStrings":{"DefaultConnection":"postgres://file@localhost/from_file"}}"#,
        )
        .expect("write settings");
        let settings = AppSettings {
            default_connection: Some("postgres://env@localhost/from_env".to_owned()),
            settings_path: Some(path),
            ..AppSettings::default()
        };

        let config = settings.connection().expect("connection");
        assert_eq!(config.database(), "from_env");
    }

    #[rstest]
    fn falls_back_to_settings_file() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join(SETTINGS_FILE_NAME);
        fs::write(
            &path,
            r#"{"ConnectionStrings":{"DefaultConnection":"postgres://file@localhost/from_file"}}"#,
        )
        .expect("write settings");
        let settings = AppSettings {
            default_connection: Some("   ".to_owned()),
            settings_path: Some(path),
            ..AppSettings::default()
        };

        let config = settings.connection().expect("connection");
        assert_eq!(config.database(), "from_file");
    }

    #[rstest]
    fn missing_settings_file_is_an_error() {
        let dir = tempfile::tempdir().expect("temp dir");
        let settings = AppSettings {
            settings_path: Some(dir.path().join("absent.json")),
            ..AppSettings::default()
        };
        assert!(matches!(
            settings.connection(),
            Err(SettingsError::SettingsFile(ContextFactoryError::Read { .. }))
        ));
    }

    #[rstest]
    fn malformed_override_is_an_error() {
        let settings = AppSettings {
            default_connection: Some("mysql://localhost/books".to_owned()),
            ..AppSettings::default()
        };
        assert!(matches!(
            settings.connection(),
            Err(SettingsError::Connection(
                ConnectionConfigError::UnsupportedScheme { .. }
            ))
        ));
    }
}
