//! Tray configuration management.
//!
//! Configuration is stored as TOML:
//! - Linux: `~/.config/gatetray/gatetray.toml`
//! - Windows: `%APPDATA%/gatetray/gatetray.toml`

use std::path::{Path, PathBuf};

use gatetray_client::ClientConfig;
use gatetray_tray::INSTALL_DOCS_URL;
use serde::{Deserialize, Serialize};

/// Tray configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Client binary name or path.
    #[serde(default = "default_client_binary")]
    pub client_binary: String,

    /// Notifier binary that prints the session JSON.
    #[serde(default = "default_notifier_binary")]
    pub notifier_binary: String,

    /// Wrapper for privileged client commands (empty = run directly).
    #[serde(default = "default_elevation_command")]
    pub elevation_command: String,

    /// Program that opens URLs in the browser.
    #[serde(default = "default_open_command")]
    pub open_command: String,

    /// Target of the "Install CLI" menu item.
    #[serde(default = "default_install_docs_url")]
    pub install_docs_url: String,

    /// How many times to look for the network auth URL after starting
    /// the service.
    #[serde(default = "default_auth_poll_attempts")]
    pub auth_poll_attempts: u32,

    /// Delay before each of those attempts, in milliseconds.
    #[serde(default = "default_auth_poll_interval_ms")]
    pub auth_poll_interval_ms: u64,
}

fn default_client_binary() -> String {
    "twingate".into()
}

fn default_notifier_binary() -> String {
    "twingate-notifier".into()
}

fn default_elevation_command() -> String {
    "pkexec".into()
}

fn default_open_command() -> String {
    if cfg!(target_os = "macos") {
        "open".into()
    } else if cfg!(target_os = "windows") {
        "explorer".into()
    } else {
        "xdg-open".into()
    }
}

fn default_install_docs_url() -> String {
    INSTALL_DOCS_URL.into()
}

fn default_auth_poll_attempts() -> u32 {
    5
}

fn default_auth_poll_interval_ms() -> u64 {
    1000
}

impl Default for Config {
    fn default() -> Self {
        Self {
            client_binary: default_client_binary(),
            notifier_binary: default_notifier_binary(),
            elevation_command: default_elevation_command(),
            open_command: default_open_command(),
            install_docs_url: default_install_docs_url(),
            auth_poll_attempts: default_auth_poll_attempts(),
            auth_poll_interval_ms: default_auth_poll_interval_ms(),
        }
    }
}

impl Config {
    /// Loads configuration from disk, or creates a default if not found.
    pub fn load() -> anyhow::Result<Self> {
        Self::load_from(&config_path()?)
    }

    fn load_from(path: &Path) -> anyhow::Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Config = toml::from_str(&content)?;
            Ok(config)
        } else {
            let config = Config::default();
            config.save_to(path)?;
            Ok(config)
        }
    }

    /// Writes the configuration to `path`, readable by the owner only.
    fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;

        // Restrict permissions on Unix.
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))?;
        }

        tracing::debug!(path = %path.display(), "configuration saved");
        Ok(())
    }

    /// Program names handed to the CLI adapter.
    pub fn client_config(&self) -> ClientConfig {
        ClientConfig {
            binary: self.client_binary.clone(),
            notifier_binary: self.notifier_binary.clone(),
            elevation_command: self.elevation_command.clone(),
        }
    }
}

/// Returns the platform-specific configuration file path.
fn config_path() -> anyhow::Result<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        let appdata =
            std::env::var("APPDATA").unwrap_or_else(|_| "C:\\Users\\Default\\AppData".into());
        Ok(PathBuf::from(appdata).join("gatetray").join("gatetray.toml"))
    }

    #[cfg(not(target_os = "windows"))]
    {
        let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".into());
        Ok(PathBuf::from(home)
            .join(".config")
            .join("gatetray")
            .join("gatetray.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = Config::default();
        assert_eq!(config.client_binary, "twingate");
        assert_eq!(config.notifier_binary, "twingate-notifier");
        assert_eq!(config.elevation_command, "pkexec");
        assert!(!config.open_command.is_empty());
        assert_eq!(config.install_docs_url, INSTALL_DOCS_URL);
        assert_eq!(config.auth_poll_attempts, 5);
        assert_eq!(config.auth_poll_interval_ms, 1000);
    }

    #[test]
    fn config_partial_toml() {
        // Only specify the binary, rest should use defaults.
        let config: Config = toml::from_str(r#"client_binary = "/opt/twingate/bin/twingate""#).unwrap();
        assert_eq!(config.client_binary, "/opt/twingate/bin/twingate");
        assert_eq!(config.notifier_binary, "twingate-notifier");
        assert_eq!(config.auth_poll_attempts, 5);
    }

    #[test]
    fn empty_elevation_is_kept() {
        let config: Config = toml::from_str(r#"elevation_command = """#).unwrap();
        assert!(config.elevation_command.is_empty());
        assert!(config.client_config().elevation_command.is_empty());
    }

    #[test]
    fn client_config_mapping() {
        let config = Config {
            client_binary: "tg".into(),
            notifier_binary: "tg-notifier".into(),
            elevation_command: "sudo".into(),
            ..Config::default()
        };
        let client = config.client_config();
        assert_eq!(client.binary, "tg");
        assert_eq!(client.notifier_binary, "tg-notifier");
        assert_eq!(client.elevation_command, "sudo");
    }

    #[test]
    fn config_path_not_empty() {
        let path = config_path().unwrap();
        assert!(path.to_string_lossy().contains("gatetray"));
    }

    #[test]
    fn load_creates_default_file() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("nested").join("gatetray.toml");

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config, Config::default());
        assert!(path.exists());

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mode = std::fs::metadata(&path).unwrap().permissions().mode();
            assert_eq!(mode & 0o777, 0o600);
        }
    }

    #[test]
    fn config_save_and_load() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("gatetray.toml");

        let config = Config {
            client_binary: "tg".into(),
            auth_poll_attempts: 2,
            ..Config::default()
        };
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn invalid_toml_is_an_error() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("gatetray.toml");
        std::fs::write(&path, "auth_poll_attempts = \"many\"").unwrap();
        assert!(Config::load_from(&path).is_err());
    }
}
