//! Service configuration from environment variables

/// Server configuration struct
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address the HTTP service binds to
    pub bind_addr: String,
}

impl ServerConfig {
    /// Create a new ServerConfig from environment variables
    ///
    /// # Environment Variables
    /// - `BIND_ADDR`: listen address (default: "0.0.0.0:3001")
    pub fn from_env() -> Self {
        ServerConfig {
            bind_addr: std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3001".to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_server_config_defaults() {
        unsafe { std::env::remove_var("BIND_ADDR") };
        let config = ServerConfig::from_env();
        assert_eq!(config.bind_addr, "0.0.0.0:3001");
    }

    #[test]
    #[serial]
    fn test_server_config_override() {
        unsafe { std::env::set_var("BIND_ADDR", "127.0.0.1:9000") };
        let config = ServerConfig::from_env();
        assert_eq!(config.bind_addr, "127.0.0.1:9000");
        unsafe { std::env::remove_var("BIND_ADDR") };
    }
}
