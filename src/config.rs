use crate::constants::DEFAULT_TIME_ZONE;
use crate::error::{FreightError, Result};

/// Top-level configuration for the freight core.
#[derive(Debug, Clone)]
pub struct FreightConfig {
    pub database: DatabaseConfig,
    pub tms: TmsConfig,
}

/// Local store connection settings.
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub name: String,
    pub max_connections: u32,
}

/// External TMS provider settings.
#[derive(Debug, Clone)]
pub struct TmsConfig {
    pub api_key: String,
    pub client_id: String,
    pub client_secret: String,
    pub username: String,
    pub password: String,
    pub sandbox: bool,
    /// Overrides the sandbox/production base URL when set. Used by tests
    /// pointing the client at a local server.
    pub base_url_override: Option<String>,
    /// Time zone attached to shipment appointment timestamps.
    pub time_zone: String,
}

impl Default for FreightConfig {
    fn default() -> Self {
        Self {
            database: DatabaseConfig {
                host: "localhost".to_string(),
                port: 5432,
                user: "postgres".to_string(),
                password: String::new(),
                name: "freight_broker".to_string(),
                max_connections: 10,
            },
            tms: TmsConfig {
                api_key: String::new(),
                client_id: String::new(),
                client_secret: String::new(),
                username: String::new(),
                password: String::new(),
                sandbox: true,
                base_url_override: None,
                time_zone: DEFAULT_TIME_ZONE.to_string(),
            },
        }
    }
}

impl FreightConfig {
    /// Load configuration from environment variables, falling back to
    /// defaults for anything unset.
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(host) = std::env::var("DB_HOST") {
            config.database.host = host;
        }
        if let Ok(port) = std::env::var("DB_PORT") {
            config.database.port = port
                .parse()
                .map_err(|e| FreightError::configuration(format!("Invalid DB_PORT: {e}")))?;
        }
        if let Ok(user) = std::env::var("DB_USER") {
            config.database.user = user;
        }
        if let Ok(password) = std::env::var("DB_PASSWORD") {
            config.database.password = password;
        }
        if let Ok(name) = std::env::var("DB_NAME") {
            config.database.name = name;
        }
        if let Ok(max) = std::env::var("DB_MAX_CONNECTIONS") {
            config.database.max_connections = max.parse().map_err(|e| {
                FreightError::configuration(format!("Invalid DB_MAX_CONNECTIONS: {e}"))
            })?;
        }

        if let Ok(api_key) = std::env::var("TMS_API_KEY") {
            config.tms.api_key = api_key;
        }
        if let Ok(client_id) = std::env::var("TMS_CLIENT_ID") {
            config.tms.client_id = client_id;
        }
        if let Ok(client_secret) = std::env::var("TMS_CLIENT_SECRET") {
            config.tms.client_secret = client_secret;
        }
        if let Ok(username) = std::env::var("TMS_USERNAME") {
            config.tms.username = username;
        }
        if let Ok(password) = std::env::var("TMS_PASSWORD") {
            config.tms.password = password;
        }
        if let Ok(tz) = std::env::var("TMS_TIME_ZONE") {
            config.tms.time_zone = tz;
        }
        if let Ok(base_url) = std::env::var("TMS_BASE_URL") {
            config.tms.base_url_override = Some(base_url);
        }
        config.tms.sandbox =
            std::env::var("ENVIRONMENT").unwrap_or_else(|_| "sandbox".to_string()) == "sandbox";

        Ok(config)
    }
}

impl DatabaseConfig {
    /// Postgres connection URL for the local store.
    pub fn url(&self) -> String {
        format!(
            "postgresql://{}:{}@{}:{}/{}",
            self.user, self.password, self.host, self.port, self.name
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = FreightConfig::default();
        assert!(config.tms.sandbox);
        assert_eq!(config.tms.time_zone, "America/New_York");
        assert_eq!(config.database.port, 5432);
    }

    #[test]
    fn test_database_url() {
        let config = FreightConfig::default();
        assert_eq!(
            config.database.url(),
            "postgresql://postgres:@localhost:5432/freight_broker"
        );
    }
}
