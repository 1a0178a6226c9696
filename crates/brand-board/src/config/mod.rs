use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};

const DEV_JWT_SECRET: &str = "brand-board-development-secret";

/// Distinguishes runtime behavior for different stages of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }

    pub fn is_production(self) -> bool {
        matches!(self, Self::Production)
    }
}

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub auth: AuthConfig,
    pub media: MediaConfig,
    pub notifications: NotificationConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let jwt_secret = match env::var("APP_JWT_SECRET") {
            Ok(secret) if !secret.trim().is_empty() => secret,
            _ if environment.is_production() => return Err(ConfigError::MissingJwtSecret),
            _ => DEV_JWT_SECRET.to_string(),
        };
        let token_ttl_hours = env::var("APP_TOKEN_TTL_HOURS")
            .unwrap_or_else(|_| "24".to_string())
            .parse::<i64>()
            .ok()
            .filter(|hours| *hours > 0)
            .ok_or(ConfigError::InvalidTokenTtl)?;
        let bcrypt_cost = env::var("APP_BCRYPT_COST")
            .unwrap_or_else(|_| "10".to_string())
            .parse::<u32>()
            .ok()
            .filter(|cost| (4..=31).contains(cost))
            .ok_or(ConfigError::InvalidBcryptCost)?;

        let bootstrap_admin = match (env::var("APP_ADMIN_EMAIL"), env::var("APP_ADMIN_PASSWORD")) {
            (Ok(email), Ok(password)) if !email.trim().is_empty() => {
                Some(BootstrapAdmin { email, password })
            }
            _ => None,
        };

        let public_base_url =
            env::var("APP_MEDIA_BASE_URL").unwrap_or_else(|_| "/media".to_string());
        let notify_email = env::var("APP_NOTIFY_EMAIL")
            .ok()
            .filter(|value| !value.trim().is_empty());

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            auth: AuthConfig {
                jwt_secret,
                token_ttl_hours,
                bcrypt_cost,
                bootstrap_admin,
            },
            media: MediaConfig {
                public_base_url: public_base_url.trim_end_matches('/').to_string(),
            },
            notifications: NotificationConfig { notify_email },
        })
    }
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|source| ConfigError::InvalidHost { source })?;

        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Token signing and password hashing parameters.
#[derive(Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub token_ttl_hours: i64,
    pub bcrypt_cost: u32,
    pub bootstrap_admin: Option<BootstrapAdmin>,
}

impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthConfig")
            .field("jwt_secret", &"<redacted>")
            .field("token_ttl_hours", &self.token_ttl_hours)
            .field("bcrypt_cost", &self.bcrypt_cost)
            .field(
                "bootstrap_admin",
                &self.bootstrap_admin.as_ref().map(|admin| &admin.email),
            )
            .finish()
    }
}

/// Admin account created at startup when no account with that email exists.
#[derive(Clone)]
pub struct BootstrapAdmin {
    pub email: String,
    pub password: String,
}

/// Where uploaded logos are served from.
#[derive(Debug, Clone)]
pub struct MediaConfig {
    pub public_base_url: String,
}

#[derive(Debug, Clone)]
pub struct NotificationConfig {
    pub notify_email: Option<String>,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    MissingJwtSecret,
    InvalidTokenTtl,
    InvalidBcryptCost,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::MissingJwtSecret => {
                write!(f, "APP_JWT_SECRET must be set in production")
            }
            ConfigError::InvalidTokenTtl => {
                write!(f, "APP_TOKEN_TTL_HOURS must be a positive integer")
            }
            ConfigError::InvalidBcryptCost => {
                write!(f, "APP_BCRYPT_COST must be between 4 and 31")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::InvalidPort
            | ConfigError::MissingJwtSecret
            | ConfigError::InvalidTokenTtl
            | ConfigError::InvalidBcryptCost => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::{Mutex, OnceLock};

    fn env_guard() -> &'static Mutex<()> {
        static GUARD: OnceLock<Mutex<()>> = OnceLock::new();
        GUARD.get_or_init(|| Mutex::new(()))
    }

    fn reset_env() {
        for key in [
            "APP_ENV",
            "APP_HOST",
            "APP_PORT",
            "APP_LOG_LEVEL",
            "APP_JWT_SECRET",
            "APP_TOKEN_TTL_HOURS",
            "APP_BCRYPT_COST",
            "APP_ADMIN_EMAIL",
            "APP_ADMIN_PASSWORD",
            "APP_MEDIA_BASE_URL",
            "APP_NOTIFY_EMAIL",
        ] {
            env::remove_var(key);
        }
    }

    #[test]
    fn load_uses_defaults_when_env_missing() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        let config = AppConfig::load().expect("config loads with defaults");
        assert_eq!(config.environment, AppEnvironment::Development);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.telemetry.log_level, "info");
        assert_eq!(config.auth.token_ttl_hours, 24);
        assert_eq!(config.auth.bcrypt_cost, 10);
        assert!(config.auth.bootstrap_admin.is_none());
        assert_eq!(config.media.public_base_url, "/media");
    }

    #[test]
    fn accepts_localhost_host() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_HOST", "localhost");
        let config = AppConfig::load().expect("config loads");
        let addr = config.server.socket_addr().expect("localhost resolves");
        assert_eq!(addr, SocketAddr::new(IpAddr::from([127, 0, 0, 1]), 3000));
    }

    #[test]
    fn production_requires_jwt_secret() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_ENV", "production");
        match AppConfig::load() {
            Err(ConfigError::MissingJwtSecret) => {}
            other => panic!("expected missing secret error, got {other:?}"),
        }
        env::set_var("APP_JWT_SECRET", "s3cret");
        let config = AppConfig::load().expect("config loads with secret");
        assert!(config.environment.is_production());
        reset_env();
    }

    #[test]
    fn rejects_out_of_range_bcrypt_cost() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_BCRYPT_COST", "2");
        assert!(matches!(
            AppConfig::load(),
            Err(ConfigError::InvalidBcryptCost)
        ));
        reset_env();
    }

    #[test]
    fn media_base_url_drops_trailing_slash() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_MEDIA_BASE_URL", "https://cdn.example.com/logos/");
        let config = AppConfig::load().expect("config loads");
        assert_eq!(config.media.public_base_url, "https://cdn.example.com/logos");
        reset_env();
    }
}
