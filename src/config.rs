use std::env;

/// AppConfig
///
/// Holds the gateway's entire configuration state. The struct is immutable once
/// loaded and is shared across all request handling via the application state,
/// embodying the "immutable AppConfig" part of the Unified State Pattern.
#[derive(Clone)]
pub struct AppConfig {
    // Base URL of the external identity service. The gateway issues one
    // `GET {identity_base_url}/api/me` per protected request.
    pub identity_base_url: String,
    // Address the HTTP server binds to.
    pub bind_addr: String,
    // Runtime environment marker. Controls the log output format.
    pub env: Env,
}

/// Env
///
/// Defines the runtime context, used to switch between human-readable logging
/// in development and structured JSON logging in production.
#[derive(Clone, PartialEq, Debug)]
pub enum Env {
    Local,
    Production,
}

impl Default for AppConfig {
    /// default
    ///
    /// Provides a safe, non-panicking AppConfig instance primarily used for test
    /// setup. This allows tests to build an application state without touching
    /// process environment variables.
    fn default() -> Self {
        Self {
            identity_base_url: "http://localhost:8000".to_string(),
            bind_addr: "0.0.0.0:3000".to_string(),
            env: Env::Local,
        }
    }
}

impl AppConfig {
    /// load
    ///
    /// The canonical function for initializing the gateway configuration at
    /// startup. It reads all parameters from environment variables and
    /// implements the **fail-fast** principle.
    ///
    /// # Panics
    /// Panics if a variable required for the current runtime environment
    /// (especially Production) is not set. This prevents the gateway from
    /// starting with an incomplete configuration and silently guarding
    /// against the wrong identity service.
    pub fn load() -> Self {
        let env_str = env::var("APP_ENV").unwrap_or_else(|_| "local".to_string());
        let env = match env_str.as_str() {
            "production" => Env::Production,
            _ => Env::Local,
        };

        // The identity service location is mandatory in production; local
        // development falls back to the Dockerized identity stub.
        let identity_base_url = match env {
            Env::Production => env::var("IDENTITY_BASE_URL")
                .expect("FATAL: IDENTITY_BASE_URL must be set in production."),
            _ => env::var("IDENTITY_BASE_URL")
                .unwrap_or_else(|_| "http://localhost:8000".to_string()),
        };

        let bind_addr = env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string());

        Self {
            identity_base_url,
            bind_addr,
            env,
        }
    }
}
