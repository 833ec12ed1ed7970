//! CLI-owned configuration: TOML profiles and credential resolution.
//!
//! The library never sees these types -- it receives a pre-built
//! `huelink_api::ClientConfig` assembled here from flags, environment,
//! keyring, and the config file.

use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use huelink_api::{AppIdentity, ClientConfig};

use crate::cli::GlobalOpts;
use crate::error::CliError;

const KEYRING_SERVICE: &str = "huelink";

// ── TOML config structs ──────────────────────────────────────────────

#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    /// Default profile name (used when --profile is not specified).
    pub default_profile: Option<String>,

    /// Named bridge profiles.
    #[serde(default)]
    pub profiles: HashMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some("default".into()),
            profiles: HashMap::new(),
        }
    }
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct Profile {
    /// Bridge address, host or host:port. Absent means cloud discovery.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bridge: Option<String>,

    /// Bridge credential (plaintext -- prefer keyring or env var).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub credential: Option<String>,

    /// Environment variable name containing the credential.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub credential_env: Option<String>,

    /// Override GET timeout (seconds).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u64>,
}

// ── Config file path ─────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("dev", "huelink", "huelink")
        .map(|dirs| dirs.config_dir().join("config.toml"))
        .unwrap_or_else(|| {
            let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
            p.push(".config");
            p.push("huelink");
            p.push("config.toml");
            p
        })
}

// ── Config loading ───────────────────────────────────────────────────

/// Load the full Config from file + environment.
pub fn load_config() -> Result<Config, CliError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(config_path()))
        .merge(Env::prefixed("HUE_").split("_"));

    let config: Config = figment.extract()?;
    Ok(config)
}

/// Load config, returning a default if the file doesn't exist.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    global
        .profile
        .clone()
        .or_else(|| config.default_profile.clone())
        .unwrap_or_else(|| "default".into())
}

// ── Connection resolution ────────────────────────────────────────────

/// Everything needed to reach (and authenticate against) a bridge.
pub struct Connection {
    pub bridge: Option<String>,
    pub credential: Option<SecretString>,
    pub timeout: Duration,
}

/// Resolve bridge address and credential from flag > env > keyring >
/// profile, in that order. Both stay optional: a missing address means
/// cloud discovery, a missing credential means pairing.
pub fn resolve_connection(global: &GlobalOpts) -> Connection {
    let config = load_config_or_default();
    let profile_name = active_profile_name(global, &config);
    let profile = config.profiles.get(&profile_name).cloned().unwrap_or_default();

    let bridge = global.bridge.clone().or_else(|| profile.bridge.clone());
    let credential = resolve_credential(&profile, &profile_name, global);
    let timeout = Duration::from_secs(if global.timeout != 10 {
        global.timeout
    } else {
        profile.timeout.unwrap_or(global.timeout)
    });

    Connection {
        bridge,
        credential,
        timeout,
    }
}

/// Credential chain: CLI flag (clap also reads HUE_CREDENTIAL), the
/// profile's credential_env, the system keyring, plaintext in the file.
fn resolve_credential(
    profile: &Profile,
    profile_name: &str,
    global: &GlobalOpts,
) -> Option<SecretString> {
    if let Some(ref credential) = global.credential {
        return Some(SecretString::from(credential.clone()));
    }

    if let Some(ref env_name) = profile.credential_env {
        if let Ok(val) = std::env::var(env_name) {
            return Some(SecretString::from(val));
        }
    }

    if let Ok(entry) = keyring::Entry::new(KEYRING_SERVICE, &format!("{profile_name}/credential")) {
        if let Ok(secret) = entry.get_password() {
            return Some(SecretString::from(secret));
        }
    }

    profile
        .credential
        .as_ref()
        .map(|c| SecretString::from(c.clone()))
}

/// Translate a resolved [`Connection`] into the library's `ClientConfig`.
pub fn client_config(conn: &Connection, identity: AppIdentity) -> ClientConfig {
    ClientConfig {
        address: conn.bridge.clone(),
        credential: conn
            .credential
            .as_ref()
            .map(|c| c.expose_secret().to_owned()),
        identity,
        get_timeout: conn.timeout,
        ..ClientConfig::default()
    }
}

// ── Credential storage ───────────────────────────────────────────────

/// Where a saved credential ended up.
pub enum SavedTo {
    Keyring,
    ConfigFile(PathBuf),
}

/// Store a freshly minted credential: keyring first, config file as the
/// fallback when no keyring backend is available.
pub fn store_credential(profile_name: &str, credential: &str) -> Result<SavedTo, CliError> {
    if let Ok(entry) = keyring::Entry::new(KEYRING_SERVICE, &format!("{profile_name}/credential")) {
        if entry.set_password(credential).is_ok() {
            return Ok(SavedTo::Keyring);
        }
    }

    let mut config = load_config_or_default();
    config
        .profiles
        .entry(profile_name.to_owned())
        .or_default()
        .credential = Some(credential.to_owned());

    let path = write_config(&config)?;
    Ok(SavedTo::ConfigFile(path))
}

/// Serialize the config back to its TOML file, creating parent
/// directories as needed.
pub fn write_config(config: &Config) -> Result<PathBuf, CliError> {
    let path = config_path();
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let rendered = toml::to_string_pretty(config).map_err(|e| CliError::Validation {
        field: "config".into(),
        reason: e.to_string(),
    })?;
    std::fs::write(&path, rendered)?;
    Ok(path)
}

/// A commented starter config for `config init`.
pub const STARTER_CONFIG: &str = r#"# huelink configuration
#
# default_profile = "default"
#
# [profiles.default]
# bridge = "192.168.1.20"          # omit to use cloud discovery
# credential_env = "HUE_CREDENTIAL" # or: credential = "..."
# timeout = 10
"#;
