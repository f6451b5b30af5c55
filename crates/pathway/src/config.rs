// File: src/config.rs
// Purpose: Server configuration, programmatic and from pathway.toml

use anyhow::{Context, Result};
use pathway_router::TranslatorConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::context::RequestContext;
use crate::handler::{LaunchHook, RequestHook};

/// Port used when none (or `0`) is given
pub const DEFAULT_PORT: u16 = 8080;

/// Value of the `server` response header
pub const DEFAULT_SERVER_NAME: &str = "pathway";

/// Default config file name, looked up in the working directory
pub const CONFIG_FILE: &str = "pathway.toml";

/// Configuration of a [`Server`](crate::Server)
///
/// Immutable once handed to the server.
///
/// ```
/// use pathway::ServerConfig;
///
/// let config = ServerConfig::new("routes", 0).live_reload(true);
/// assert_eq!(config.port(), 8080);
/// ```
#[derive(Clone)]
pub struct ServerConfig {
    base_path: PathBuf,
    port: u16,
    host: String,
    live_reload: bool,
    on_init: Option<RequestHook>,
    on_launch: Option<LaunchHook>,
    server_name: String,
    translator: TranslatorConfig,
}

impl std::fmt::Debug for ServerConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServerConfig")
            .field("base_path", &self.base_path)
            .field("port", &self.port)
            .field("host", &self.host)
            .field("live_reload", &self.live_reload)
            .field("on_init", &self.on_init.is_some())
            .field("on_launch", &self.on_launch.is_some())
            .field("server_name", &self.server_name)
            .field("translator", &self.translator)
            .finish()
    }
}

impl ServerConfig {
    pub fn new(base_path: impl Into<PathBuf>, port: u16) -> Self {
        Self {
            base_path: base_path.into(),
            port: if port == 0 { DEFAULT_PORT } else { port },
            host: default_host(),
            live_reload: false,
            on_init: None,
            on_launch: None,
            server_name: DEFAULT_SERVER_NAME.to_string(),
            translator: TranslatorConfig::default(),
        }
    }

    pub fn live_reload(mut self, enabled: bool) -> Self {
        self.live_reload = enabled;
        self
    }

    /// Hook run with the request context before every discovered handler
    pub fn on_init<F>(mut self, hook: F) -> Self
    where
        F: Fn(&mut RequestContext) + Send + Sync + 'static,
    {
        self.on_init = Some(Arc::new(hook));
        self
    }

    /// Hook run once when the server fires, before routes are built
    pub fn on_launch<F>(mut self, hook: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.on_launch = Some(Arc::new(hook));
        self
    }

    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    pub fn server_name(mut self, name: impl Into<String>) -> Self {
        self.server_name = name.into();
        self
    }

    pub fn translator(mut self, translator: TranslatorConfig) -> Self {
        self.translator = translator;
        self
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn host_name(&self) -> &str {
        &self.host
    }

    pub fn live_reload_enabled(&self) -> bool {
        self.live_reload
    }

    pub(crate) fn init_hook(&self) -> Option<RequestHook> {
        self.on_init.clone()
    }

    pub(crate) fn launch_hook(&self) -> Option<LaunchHook> {
        self.on_launch.clone()
    }

    pub fn name(&self) -> &str {
        &self.server_name
    }

    pub fn translator_config(&self) -> &TranslatorConfig {
        &self.translator
    }

    /// `host:port` to bind
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// File configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct PathwayConfig {
    #[serde(default)]
    pub server: ServerSection,

    #[serde(default)]
    pub routing: RoutingSection,

    #[serde(default)]
    pub dev: DevSection,
}

/// `[server]`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerSection {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_server_name")]
    pub server_name: String,
}

/// `[routing]`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoutingSection {
    /// Directory holding route files (default: "routes")
    #[serde(default = "default_base_path")]
    pub base_path: String,

    /// File stem that maps to its directory (default: "index")
    #[serde(default = "default_index_marker")]
    pub index_marker: String,

    /// Prefix marking a dynamic segment (default: '@')
    #[serde(default = "default_dynamic_marker")]
    pub dynamic_marker: char,
}

/// `[dev]`
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct DevSection {
    #[serde(default)]
    pub live_reload: bool,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_server_name() -> String {
    DEFAULT_SERVER_NAME.to_string()
}

fn default_base_path() -> String {
    "routes".to_string()
}

fn default_index_marker() -> String {
    TranslatorConfig::default().index_marker
}

fn default_dynamic_marker() -> char {
    TranslatorConfig::default().dynamic_marker
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            server_name: default_server_name(),
        }
    }
}

impl Default for RoutingSection {
    fn default() -> Self {
        Self {
            base_path: default_base_path(),
            index_marker: default_index_marker(),
            dynamic_marker: default_dynamic_marker(),
        }
    }
}

impl PathwayConfig {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        // Missing or empty file means defaults
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;

        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        let config: PathwayConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", path))?;

        Ok(config)
    }

    /// Load configuration from ./pathway.toml
    pub fn load_default() -> Result<Self> {
        Self::load(CONFIG_FILE)
    }

    pub fn translator(&self) -> TranslatorConfig {
        TranslatorConfig::new(self.routing.index_marker.clone(), self.routing.dynamic_marker)
    }

    /// Programmatic configuration equivalent to this file
    pub fn into_server_config(self) -> ServerConfig {
        let translator = self.translator();
        ServerConfig::new(self.routing.base_path, self.server.port)
            .host(self.server.host)
            .server_name(self.server.server_name)
            .live_reload(self.dev.live_reload)
            .translator(translator)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case(0, DEFAULT_PORT)]
    #[case(1, 1)]
    #[case(3000, 3000)]
    fn test_port_falls_back_to_default(#[case] port: u16, #[case] expected: u16) {
        assert_eq!(ServerConfig::new("routes", port).port(), expected);
    }

    #[test]
    fn test_builder_methods() {
        let config = ServerConfig::new("site", 9000)
            .host("127.0.0.1")
            .live_reload(true)
            .server_name("edge")
            .on_init(|_ctx| {})
            .on_launch(|| {});

        assert_eq!(config.base_path(), Path::new("site"));
        assert_eq!(config.address(), "127.0.0.1:9000");
        assert!(config.live_reload_enabled());
        assert_eq!(config.name(), "edge");
        assert!(config.init_hook().is_some());
        assert!(config.launch_hook().is_some());
    }

    #[test]
    fn test_default_file_config() {
        let config = PathwayConfig::default();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.routing.base_path, "routes");
        assert_eq!(config.routing.index_marker, "index");
        assert_eq!(config.routing.dynamic_marker, '@');
        assert!(!config.dev.live_reload);
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = PathwayConfig::load(dir.path().join("pathway.toml")).unwrap();
        assert_eq!(config.server.port, 8080);
    }

    #[test]
    fn test_empty_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pathway.toml");
        fs::write(&path, "  \n").unwrap();
        assert_eq!(PathwayConfig::load(&path).unwrap().routing.base_path, "routes");
    }

    #[test]
    fn test_parse_partial_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pathway.toml");
        fs::write(
            &path,
            r#"
[server]
port = 4000

[routing]
base_path = "pages"
dynamic_marker = "_"

[dev]
live_reload = true
"#,
        )
        .unwrap();

        let config = PathwayConfig::load(&path).unwrap();
        assert_eq!(config.server.port, 4000);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.routing.index_marker, "index");

        let server = config.into_server_config();
        assert_eq!(server.base_path(), Path::new("pages"));
        assert_eq!(server.port(), 4000);
        assert!(server.live_reload_enabled());
        assert_eq!(server.translator_config().dynamic_marker, '_');
    }

    #[test]
    fn test_invalid_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pathway.toml");
        fs::write(&path, "[server\nport = ").unwrap();
        assert!(PathwayConfig::load(&path).is_err());
    }
}
