use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub checkout: CheckoutConfig,
    #[serde(default)]
    pub assets: AssetsConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_server_host")]
    pub host: String,
    #[serde(default = "default_server_port")]
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Full connection URL. When set it wins over everything below.
    #[serde(default)]
    pub url: String,
    /// Non-empty value switches the store to a local SQLite file.
    #[serde(default)]
    pub use_sqlite: bool,
    #[serde(default = "default_sqlite_path")]
    pub sqlite_path: String,
    #[serde(default = "default_postgres_host")]
    pub postgres_host: String,
    #[serde(default = "default_postgres_port")]
    pub postgres_port: u16,
    #[serde(default = "default_postgres_user")]
    pub postgres_user: String,
    #[serde(default)]
    pub postgres_password: String,
    #[serde(default = "default_postgres_db")]
    pub postgres_db: String,
    #[serde(default = "default_pool_size")]
    pub pool_size: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default)]
    pub jwt_secret: String,
    #[serde(default = "default_access_token_minutes")]
    pub access_token_minutes: u64,
    #[serde(default = "default_refresh_token_days")]
    pub refresh_token_days: u64,
    #[serde(default)]
    pub cookie_secure: bool,
    #[serde(default = "default_admin_email")]
    pub admin_email: String,
    /// Password for the bootstrap administrator. Empty disables bootstrap.
    #[serde(default)]
    pub admin_password: String,
    #[serde(default)]
    pub webhook_secret: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutConfig {
    /// Tax percentage applied on subtotal plus delivery.
    #[serde(default = "default_tax_rate")]
    pub tax_rate: f64,
    #[serde(default = "default_delivery_cost")]
    pub delivery_cost: f64,
    #[serde(default = "default_form_window_minutes")]
    pub form_window_minutes: u64,
    #[serde(default = "default_payment_window_minutes")]
    pub payment_window_minutes: u64,
    /// Grace added on top of both windows before an unpaid order is purged.
    #[serde(default = "default_reservation_grace_minutes")]
    pub reservation_grace_minutes: u64,
    #[serde(default = "default_cleanup_interval_seconds")]
    pub cleanup_interval_seconds: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssetsConfig {
    #[serde(default = "default_static_dir")]
    pub static_dir: String,
    #[serde(default = "default_static_route")]
    pub static_route: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default)]
    pub file: Option<String>,
    #[serde(default = "default_log_format")]
    pub format: String,
}

// Default value functions
fn default_server_host() -> String {
    "127.0.0.1".to_string()
}

fn default_server_port() -> u16 {
    8000
}

fn default_sqlite_path() -> String {
    "calzados.db".to_string()
}

fn default_postgres_host() -> String {
    "127.0.0.1".to_string()
}

fn default_postgres_port() -> u16 {
    15432
}

fn default_postgres_user() -> String {
    "postgres".to_string()
}

fn default_postgres_db() -> String {
    "calzados_marilo".to_string()
}

fn default_pool_size() -> u32 {
    10
}

fn default_access_token_minutes() -> u64 {
    15
}

fn default_refresh_token_days() -> u64 {
    7
}

fn default_admin_email() -> String {
    "admin@calzmarilo.es".to_string()
}

fn default_tax_rate() -> f64 {
    21.0
}

fn default_delivery_cost() -> f64 {
    4.99
}

fn default_form_window_minutes() -> u64 {
    10
}

fn default_payment_window_minutes() -> u64 {
    10
}

fn default_reservation_grace_minutes() -> u64 {
    5
}

fn default_cleanup_interval_seconds() -> u64 {
    300
}

fn default_static_dir() -> String {
    "static".to_string()
}

fn default_static_route() -> String {
    "/static".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "plain".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            database: DatabaseConfig::default(),
            api: ApiConfig::default(),
            checkout: CheckoutConfig::default(),
            assets: AssetsConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_server_host(),
            port: default_server_port(),
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            use_sqlite: false,
            sqlite_path: default_sqlite_path(),
            postgres_host: default_postgres_host(),
            postgres_port: default_postgres_port(),
            postgres_user: default_postgres_user(),
            postgres_password: String::new(),
            postgres_db: default_postgres_db(),
            pool_size: default_pool_size(),
        }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            jwt_secret: String::new(),
            access_token_minutes: default_access_token_minutes(),
            refresh_token_days: default_refresh_token_days(),
            cookie_secure: false,
            admin_email: default_admin_email(),
            admin_password: String::new(),
            webhook_secret: String::new(),
        }
    }
}

impl Default for CheckoutConfig {
    fn default() -> Self {
        Self {
            tax_rate: default_tax_rate(),
            delivery_cost: default_delivery_cost(),
            form_window_minutes: default_form_window_minutes(),
            payment_window_minutes: default_payment_window_minutes(),
            reservation_grace_minutes: default_reservation_grace_minutes(),
            cleanup_interval_seconds: default_cleanup_interval_seconds(),
        }
    }
}

impl Default for AssetsConfig {
    fn default() -> Self {
        Self {
            static_dir: default_static_dir(),
            static_route: default_static_route(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: None,
            format: default_log_format(),
        }
    }
}

impl Config {
    /// Load configuration from TOML file with environment variable fallback
    pub fn load() -> Self {
        let mut config = Self::load_from_file();
        config.override_with_env();
        config
    }

    /// Load configuration from TOML file
    fn load_from_file() -> Self {
        let config_paths = [
            "config.toml",
            "calzados.toml",
            "config/config.toml",
            "/etc/calzados-marilo/config.toml",
        ];

        for path in &config_paths {
            if Path::new(path).exists() {
                debug!("Loading config from: {}", path);
                match fs::read_to_string(path) {
                    Ok(content) => match toml::from_str::<Config>(&content) {
                        Ok(config) => {
                            debug!("Successfully loaded config from: {}", path);
                            return config;
                        }
                        Err(e) => {
                            warn!("Failed to parse config file {}: {}", path, e);
                        }
                    },
                    Err(e) => {
                        warn!("Failed to read config file {}: {}", path, e);
                    }
                }
            }
        }

        debug!("No config file found, using defaults");
        Self::default()
    }

    /// Override configuration with environment variables
    fn override_with_env(&mut self) {
        // Server config
        if let Ok(host) = env::var("SERVER_HOST") {
            self.server.host = host;
        }
        if let Ok(port) = env::var("SERVER_PORT") {
            if let Ok(port) = port.parse() {
                self.server.port = port;
            }
        }

        // Database config
        if let Ok(url) = env::var("DATABASE_URL") {
            self.database.url = url;
        }
        if let Ok(use_sqlite) = env::var("USE_SQLITE") {
            self.database.use_sqlite = !use_sqlite.is_empty();
        }
        if let Ok(path) = env::var("SQLITE_PATH") {
            self.database.sqlite_path = path;
        }
        if let Ok(host) = env::var("POSTGRES_HOST") {
            self.database.postgres_host = host;
        }
        if let Ok(port) = env::var("POSTGRES_PORT") {
            if let Ok(port) = port.parse() {
                self.database.postgres_port = port;
            }
        }
        if let Ok(user) = env::var("POSTGRES_USER") {
            self.database.postgres_user = user;
        }
        if let Ok(password) = env::var("POSTGRES_PASSWORD") {
            self.database.postgres_password = password;
        }
        if let Ok(db) = env::var("POSTGRES_DB") {
            self.database.postgres_db = db;
        }
        if let Ok(pool_size) = env::var("DATABASE_POOL_SIZE") {
            if let Ok(size) = pool_size.parse() {
                self.database.pool_size = size;
            }
        }

        // API config
        if let Ok(secret) = env::var("JWT_SECRET") {
            self.api.jwt_secret = secret;
        }
        if let Ok(minutes) = env::var("ACCESS_TOKEN_MINUTES") {
            if let Ok(minutes) = minutes.parse() {
                self.api.access_token_minutes = minutes;
            }
        }
        if let Ok(days) = env::var("REFRESH_TOKEN_DAYS") {
            if let Ok(days) = days.parse() {
                self.api.refresh_token_days = days;
            }
        }
        if let Ok(secure) = env::var("COOKIE_SECURE") {
            self.api.cookie_secure = secure == "true";
        }
        if let Ok(email) = env::var("ADMIN_EMAIL") {
            self.api.admin_email = email;
        }
        if let Ok(password) = env::var("ADMIN_PASSWORD") {
            self.api.admin_password = password;
        }
        if let Ok(secret) = env::var("WEBHOOK_SECRET") {
            self.api.webhook_secret = secret;
        }

        // Checkout config
        if let Ok(rate) = env::var("TAX_RATE") {
            if let Ok(rate) = rate.parse() {
                self.checkout.tax_rate = rate;
            }
        }
        if let Ok(cost) = env::var("DELIVERY_COST") {
            if let Ok(cost) = cost.parse() {
                self.checkout.delivery_cost = cost;
            }
        }
        if let Ok(minutes) = env::var("FORM_WINDOW_MINUTES") {
            if let Ok(minutes) = minutes.parse() {
                self.checkout.form_window_minutes = minutes;
            }
        }
        if let Ok(minutes) = env::var("PAYMENT_WINDOW_MINUTES") {
            if let Ok(minutes) = minutes.parse() {
                self.checkout.payment_window_minutes = minutes;
            }
        }
        if let Ok(seconds) = env::var("CLEANUP_INTERVAL_SECONDS") {
            if let Ok(seconds) = seconds.parse() {
                self.checkout.cleanup_interval_seconds = seconds;
            }
        }

        // Assets config
        if let Ok(dir) = env::var("STATIC_DIR") {
            self.assets.static_dir = dir;
        }

        // Logging config
        if let Ok(log_level) = env::var("RUST_LOG") {
            self.logging.level = log_level;
        }
        if let Ok(file) = env::var("LOG_FILE") {
            self.logging.file = Some(file);
        }
    }

    /// Effective connection URL, resolved from the URL override, the SQLite
    /// toggle, or the Postgres parts, in that order.
    pub fn effective_database_url(&self) -> String {
        if !self.database.url.is_empty() {
            return self.database.url.clone();
        }
        if self.database.use_sqlite {
            return format!("sqlite://{}?mode=rwc", self.database.sqlite_path);
        }
        format!(
            "postgres://{}:{}@{}:{}/{}",
            self.database.postgres_user,
            self.database.postgres_password,
            self.database.postgres_host,
            self.database.postgres_port,
            self.database.postgres_db
        )
    }
}

// Global configuration instance
use std::sync::OnceLock;
static CONFIG: OnceLock<Config> = OnceLock::new();

/// Get the global configuration instance
pub fn get_config() -> &'static Config {
    CONFIG.get_or_init(Config::load)
}

/// Initialize the global configuration
pub fn init_config() {
    CONFIG.get_or_init(Config::load);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_database_is_postgres_on_custom_port() {
        let config = Config::default();
        assert_eq!(config.database.postgres_port, 15432);
        assert!(
            config
                .effective_database_url()
                .starts_with("postgres://postgres:@127.0.0.1:15432/")
        );
    }

    #[test]
    fn test_sqlite_toggle_builds_file_url() {
        let mut config = Config::default();
        config.database.use_sqlite = true;
        config.database.sqlite_path = "store.db".to_string();
        assert_eq!(config.effective_database_url(), "sqlite://store.db?mode=rwc");
    }

    #[test]
    fn test_explicit_url_wins() {
        let mut config = Config::default();
        config.database.use_sqlite = true;
        config.database.url = "postgres://u:p@db:5432/shop".to_string();
        assert_eq!(config.effective_database_url(), "postgres://u:p@db:5432/shop");
    }

    #[test]
    fn test_bootstrap_admin_defaults() {
        let config = Config::default();
        assert_eq!(config.api.admin_email, "admin@calzmarilo.es");
        assert!(config.api.admin_password.is_empty());
    }

    #[test]
    fn test_checkout_defaults() {
        let config = Config::default();
        assert_eq!(config.checkout.tax_rate, 21.0);
        assert_eq!(config.checkout.form_window_minutes, 10);
        assert_eq!(config.checkout.payment_window_minutes, 10);
    }
}
