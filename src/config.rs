//! Environment-supplied configuration for the server and the client.

use std::env;
use std::net::SocketAddr;

/// Server settings.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Address the HTTP listener binds to.
    pub bind: SocketAddr,
    /// Path of the redb save file.
    pub save_path: String,
    /// The one origin the CORS policy admits.
    pub client_origin: String,
}

impl Settings {
    pub fn from_env() -> Settings {
        let bind = env::var("TASKBOARD_ADDR")
            .unwrap_or_else(|_| "0.0.0.0:5000".to_string())
            .parse()
            .expect("TASKBOARD_ADDR must be a host:port address");

        Settings {
            bind,
            save_path: env::var("TASKBOARD_DB").unwrap_or_else(|_| "taskboard.redb".to_string()),
            client_origin: env::var("CLIENT_ORIGIN")
                .unwrap_or_else(|_| "http://localhost:5173".to_string()),
        }
    }
}

/// Client settings.
#[derive(Debug, Clone)]
pub struct ClientSettings {
    /// Base URL of the API, up to and including `/api`.
    pub api_base_url: String,
}

impl ClientSettings {
    pub fn from_env() -> ClientSettings {
        ClientSettings {
            api_base_url: env::var("API_BASE_URL")
                .unwrap_or_else(|_| "http://localhost:5000/api".to_string()),
        }
    }
}
