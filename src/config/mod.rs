//! Settings for the server binary. Sources are layered lowest first:
//! `config/default.toml`, `quire.toml`, an explicit `--config-file`,
//! `QUIRE__SECTION__KEY` environment variables and finally CLI flags.

mod cli;

pub use cli::{CliArgs, Command, DatabaseOverride, MigrateArgs, ServeArgs, ServeOverrides};

use std::{net::SocketAddr, num::NonZeroU32, str::FromStr, time::Duration};

use config::{Config, ConfigBuilder, Environment, File, Value, builder::DefaultState};
use serde::Deserialize;
use thiserror::Error;
use tracing::level_filters::LevelFilter;

const DEFAULT_CONFIG_BASENAME: &str = "config/default";
const LOCAL_CONFIG_BASENAME: &str = "quire";
const ENV_PREFIX: &str = "QUIRE";
const DEFAULT_SITE_TITLE: &str = "Quire";
const DEFAULT_SITE_TAGLINE: &str = "Notes, essays and updates.";

#[derive(Debug, Clone)]
pub struct Settings {
    pub server: ServerSettings,
    pub logging: LoggingSettings,
    pub database: DatabaseSettings,
    pub site: SiteSettings,
}

#[derive(Debug, Clone)]
pub struct ServerSettings {
    pub addr: SocketAddr,
    /// How long in-flight requests may run after a shutdown signal.
    pub graceful_shutdown: Duration,
}

#[derive(Debug, Clone)]
pub struct LoggingSettings {
    pub level: LevelFilter,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Json,
    Compact,
}

#[derive(Debug, Clone)]
pub struct DatabaseSettings {
    /// `None` when unset or blank; only the commands that touch the
    /// database insist on it.
    pub url: Option<String>,
    pub max_connections: NonZeroU32,
}

/// Strings rendered in the public site's header and `<title>`.
#[derive(Debug, Clone)]
pub struct SiteSettings {
    pub title: String,
    pub tagline: String,
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to build configuration: {0}")]
    Build(#[from] config::ConfigError),
    #[error("invalid configuration for `{key}`: {reason}")]
    Invalid { key: &'static str, reason: String },
}

impl LoadError {
    fn invalid(key: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            key,
            reason: reason.into(),
        }
    }
}

pub fn load(cli: &CliArgs) -> Result<Settings, LoadError> {
    let mut builder = Config::builder()
        .add_source(File::with_name(DEFAULT_CONFIG_BASENAME).required(false))
        .add_source(File::with_name(LOCAL_CONFIG_BASENAME).required(false));

    if let Some(path) = cli.config_file.as_deref() {
        builder = builder.add_source(File::from(path).required(true));
    }

    resolve(builder, cli)
}

/// Adds the environment and CLI layers on top of the file sources and
/// validates the merged result.
fn resolve(builder: ConfigBuilder<DefaultState>, cli: &CliArgs) -> Result<Settings, LoadError> {
    let mut builder =
        builder.add_source(Environment::with_prefix(ENV_PREFIX).separator("__"));

    for (key, value) in cli_overrides(cli) {
        builder = builder.set_override(key, value)?;
    }

    let raw: RawSettings = builder.build()?.try_deserialize()?;
    Settings::try_from(raw)
}

fn cli_overrides(cli: &CliArgs) -> Vec<(&'static str, Value)> {
    fn push<T: Into<Value>>(
        out: &mut Vec<(&'static str, Value)>,
        key: &'static str,
        value: Option<T>,
    ) {
        if let Some(value) = value {
            out.push((key, value.into()));
        }
    }

    let mut out = Vec::new();
    match cli.command.as_ref() {
        Some(Command::Serve(args)) => {
            let flags = &args.overrides;
            push(&mut out, "server.host", flags.server_host.clone());
            push(&mut out, "server.port", flags.server_port.map(i64::from));
            push(
                &mut out,
                "server.graceful_shutdown_seconds",
                flags
                    .server_graceful_shutdown_seconds
                    .map(|secs| i64::try_from(secs).unwrap_or(i64::MAX)),
            );
            push(&mut out, "logging.level", flags.log_level.clone());
            push(&mut out, "logging.json", flags.log_json);
            push(&mut out, "database.url", flags.database.database_url.clone());
            push(
                &mut out,
                "database.max_connections",
                flags.database_max_connections.map(i64::from),
            );
            push(&mut out, "site.title", flags.site_title.clone());
        }
        Some(Command::Migrate(args)) => {
            push(&mut out, "database.url", args.database.database_url.clone());
        }
        None => {}
    }
    out
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawSettings {
    server: RawServer,
    logging: RawLogging,
    database: RawDatabase,
    site: RawSite,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct RawServer {
    host: String,
    port: u16,
    graceful_shutdown_seconds: u64,
}

impl Default for RawServer {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
            graceful_shutdown_seconds: 30,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct RawLogging {
    level: String,
    json: bool,
}

impl Default for RawLogging {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct RawDatabase {
    url: Option<String>,
    max_connections: u32,
}

impl Default for RawDatabase {
    fn default() -> Self {
        Self {
            url: None,
            max_connections: 8,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawSite {
    title: Option<String>,
    tagline: Option<String>,
}

impl TryFrom<RawSettings> for Settings {
    type Error = LoadError;

    fn try_from(raw: RawSettings) -> Result<Self, Self::Error> {
        Ok(Self {
            server: raw.server.try_into()?,
            logging: raw.logging.try_into()?,
            database: raw.database.try_into()?,
            site: raw.site.into(),
        })
    }
}

impl TryFrom<RawServer> for ServerSettings {
    type Error = LoadError;

    fn try_from(raw: RawServer) -> Result<Self, Self::Error> {
        if raw.port == 0 {
            return Err(LoadError::invalid("server.port", "must be greater than zero"));
        }
        if raw.graceful_shutdown_seconds == 0 {
            return Err(LoadError::invalid(
                "server.graceful_shutdown_seconds",
                "must be greater than zero",
            ));
        }

        let host = raw.host.trim();
        let candidate = if host.contains(':') && !host.starts_with('[') {
            format!("[{host}]:{}", raw.port)
        } else {
            format!("{host}:{}", raw.port)
        };
        let addr = candidate.parse().map_err(|err| {
            LoadError::invalid(
                "server.host",
                format!("`{candidate}` is not a socket address: {err}"),
            )
        })?;

        Ok(Self {
            addr,
            graceful_shutdown: Duration::from_secs(raw.graceful_shutdown_seconds),
        })
    }
}

impl TryFrom<RawLogging> for LoggingSettings {
    type Error = LoadError;

    fn try_from(raw: RawLogging) -> Result<Self, Self::Error> {
        let level = LevelFilter::from_str(raw.level.trim())
            .map_err(|err| LoadError::invalid("logging.level", err.to_string()))?;
        let format = if raw.json {
            LogFormat::Json
        } else {
            LogFormat::Compact
        };
        Ok(Self { level, format })
    }
}

impl TryFrom<RawDatabase> for DatabaseSettings {
    type Error = LoadError;

    fn try_from(raw: RawDatabase) -> Result<Self, Self::Error> {
        let max_connections = NonZeroU32::new(raw.max_connections).ok_or_else(|| {
            LoadError::invalid("database.max_connections", "must be greater than zero")
        })?;
        Ok(Self {
            url: non_blank(raw.url),
            max_connections,
        })
    }
}

impl From<RawSite> for SiteSettings {
    fn from(raw: RawSite) -> Self {
        Self {
            title: non_blank(raw.title).unwrap_or_else(|| DEFAULT_SITE_TITLE.to_string()),
            tagline: non_blank(raw.tagline).unwrap_or_else(|| DEFAULT_SITE_TAGLINE.to_string()),
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use clap::Parser;
    use config::FileFormat;

    use super::*;

    const FILE: &str = r#"
        [server]
        port = 4000

        [logging]
        level = "warn"

        [database]
        url = "postgres://from-file"
        max_connections = 2

        [site]
        title = "Field Notes"
    "#;

    fn with_file(cli: &[&str]) -> Result<Settings, LoadError> {
        let builder = Config::builder().add_source(File::from_str(FILE, FileFormat::Toml));
        resolve(builder, &CliArgs::parse_from(cli))
    }

    #[test]
    fn defaults_are_valid() {
        let settings = Settings::try_from(RawSettings::default()).expect("valid settings");
        assert_eq!(settings.server.addr.to_string(), "127.0.0.1:3000");
        assert_eq!(settings.server.graceful_shutdown, Duration::from_secs(30));
        assert_eq!(settings.logging.level, LevelFilter::INFO);
        assert_eq!(settings.logging.format, LogFormat::Compact);
        assert_eq!(settings.database.max_connections.get(), 8);
        assert!(settings.database.url.is_none());
        assert_eq!(settings.site.title, DEFAULT_SITE_TITLE);
        assert_eq!(settings.site.tagline, DEFAULT_SITE_TAGLINE);
    }

    #[test]
    fn file_values_apply_without_flags() {
        let settings = with_file(&["quire"]).expect("valid settings");
        assert_eq!(settings.server.addr.port(), 4000);
        assert_eq!(settings.logging.level, LevelFilter::WARN);
        assert_eq!(settings.database.url.as_deref(), Some("postgres://from-file"));
        assert_eq!(settings.database.max_connections.get(), 2);
        assert_eq!(settings.site.title, "Field Notes");
    }

    #[test]
    fn serve_flags_beat_the_file() {
        let settings = with_file(&[
            "quire",
            "serve",
            "--server-port",
            "4321",
            "--log-level",
            "debug",
            "--log-json",
            "true",
            "--database-url",
            "postgres://from-cli",
            "--site-title",
            "Quire Daily",
        ])
        .expect("valid settings");

        assert_eq!(settings.server.addr.port(), 4321);
        assert_eq!(settings.logging.level, LevelFilter::DEBUG);
        assert_eq!(settings.logging.format, LogFormat::Json);
        assert_eq!(settings.database.url.as_deref(), Some("postgres://from-cli"));
        assert_eq!(settings.database.max_connections.get(), 2);
        assert_eq!(settings.site.title, "Quire Daily");
    }

    #[test]
    fn migrate_only_overrides_the_database_url() {
        let settings = with_file(&["quire", "migrate", "--database-url", "postgres://example"])
            .expect("valid settings");
        assert_eq!(settings.database.url.as_deref(), Some("postgres://example"));
        assert_eq!(settings.server.addr.port(), 4000);
    }

    #[test]
    fn invalid_values_name_their_key() {
        let mut raw = RawSettings::default();
        raw.server.port = 0;
        assert!(matches!(
            Settings::try_from(raw),
            Err(LoadError::Invalid { key: "server.port", .. })
        ));

        let mut raw = RawSettings::default();
        raw.logging.level = "loud".to_string();
        assert!(matches!(
            Settings::try_from(raw),
            Err(LoadError::Invalid { key: "logging.level", .. })
        ));

        let mut raw = RawSettings::default();
        raw.database.max_connections = 0;
        assert!(matches!(
            Settings::try_from(raw),
            Err(LoadError::Invalid { key: "database.max_connections", .. })
        ));

        let mut raw = RawSettings::default();
        raw.server.host = "not a host".to_string();
        assert!(matches!(
            Settings::try_from(raw),
            Err(LoadError::Invalid { key: "server.host", .. })
        ));
    }

    #[test]
    fn blank_strings_count_as_missing() {
        let mut raw = RawSettings::default();
        raw.database.url = Some("   ".to_string());
        raw.site.title = Some(String::new());
        let settings = Settings::try_from(raw).expect("valid settings");
        assert!(settings.database.url.is_none());
        assert_eq!(settings.site.title, DEFAULT_SITE_TITLE);
    }

    #[test]
    fn ipv6_hosts_are_bracketed() {
        let mut raw = RawSettings::default();
        raw.server.host = "::1".to_string();
        let settings = Settings::try_from(raw).expect("valid settings");
        assert_eq!(settings.server.addr.to_string(), "[::1]:3000");
    }

    #[test]
    fn bare_invocation_has_no_subcommand() {
        let args = CliArgs::parse_from(["quire"]);
        assert!(args.command.is_none());
        assert!(cli_overrides(&args).is_empty());
    }
}
