use std::net::SocketAddr;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

/// Where the qualification pipeline gets its creator metrics from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalsMode {
    /// Fixed placeholder numbers. Only meant for demos and local iteration.
    Demo,
    /// Latest manually entered snapshot stored in the database.
    Snapshot,
}

impl std::fmt::Display for SignalsMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SignalsMode::Demo => write!(f, "demo"),
            SignalsMode::Snapshot => write!(f, "snapshot"),
        }
    }
}

/// What the classifier does when no niche keyword matched at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ZeroHitPolicy {
    /// Always fall back to `general`, ignoring the declared category.
    #[default]
    General,
    /// Use the declared category when it names a known niche tag.
    DeclaredCategory,
}

/// Instagram app credentials. OAuth routes are disabled when absent.
#[derive(Clone)]
pub struct InstagramAppConfig {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
}

impl std::fmt::Debug for InstagramAppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InstagramAppConfig")
            .field("client_id", &self.client_id)
            .field("client_secret", &"[redacted]")
            .field("redirect_uri", &self.redirect_uri)
            .finish()
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    pub static_dir: PathBuf,
    pub taxonomy_path: Option<PathBuf>,
    pub signals_mode: SignalsMode,
    pub zero_hit_policy: ZeroHitPolicy,
    pub oauth_state_secret: String,
    pub instagram: Option<InstagramAppConfig>,
    pub http_timeout_secs: u64,
    pub db_max_connections: u32,
    pub db_min_connections: u32,
    pub db_acquire_timeout_secs: u64,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("bind_addr", &self.bind_addr)
            .field("log_level", &self.log_level)
            .field("static_dir", &self.static_dir)
            .field("taxonomy_path", &self.taxonomy_path)
            .field("signals_mode", &self.signals_mode)
            .field("zero_hit_policy", &self.zero_hit_policy)
            .field("database_url", &"[redacted]")
            .field("oauth_state_secret", &"[redacted]")
            .field("instagram", &self.instagram)
            .field("http_timeout_secs", &self.http_timeout_secs)
            .field("db_max_connections", &self.db_max_connections)
            .field("db_min_connections", &self.db_min_connections)
            .field("db_acquire_timeout_secs", &self.db_acquire_timeout_secs)
            .finish()
    }
}
