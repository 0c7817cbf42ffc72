// Application configuration loaded from environment variables

/// Runtime configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub host: String,
    pub port: String,
    /// How long before a booking starts cancellation stays open
    pub cancellation_cutoff_minutes: i64,
}

impl AppConfig {
    /// Load configuration from the environment
    ///
    /// `DATABASE_URL` is required; everything else has a default.
    pub fn from_env() -> Result<Self, String> {
        let database_url = std::env::var("DATABASE_URL")
            .map_err(|_| "DATABASE_URL must be set in environment".to_string())?;

        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = std::env::var("PORT").unwrap_or_else(|_| "8080".to_string());

        let cancellation_cutoff_minutes = match std::env::var("CANCELLATION_CUTOFF_MINUTES") {
            Ok(raw) => raw
                .parse::<i64>()
                .map_err(|_| format!("CANCELLATION_CUTOFF_MINUTES must be an integer, got '{}'", raw))?,
            Err(_) => 60,
        };
        if cancellation_cutoff_minutes < 0 {
            return Err("CANCELLATION_CUTOFF_MINUTES must not be negative".to_string());
        }

        Ok(Self {
            database_url,
            host,
            port,
            cancellation_cutoff_minutes,
        })
    }

    /// Socket address string for the HTTP listener
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bind_addr_joins_host_and_port() {
        let config = AppConfig {
            database_url: "postgres://localhost/test".to_string(),
            host: "127.0.0.1".to_string(),
            port: "3000".to_string(),
            cancellation_cutoff_minutes: 60,
        };
        assert_eq!(config.bind_addr(), "127.0.0.1:3000");
    }
}
