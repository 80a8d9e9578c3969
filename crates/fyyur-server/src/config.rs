//! Server settings read from the environment.

use axum::http::{HeaderValue, Method};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use tower_http::cors::{AllowOrigin, CorsLayer};

#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    pub host: IpAddr,
    pub port: u16,
    /// Origins allowed to call the API from a browser. Empty means
    /// same-origin only.
    pub cors_origins: Vec<String>,
}

impl ServerConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            host: lookup("FYYUR_HOST")
                .and_then(|v| v.parse().ok())
                .unwrap_or(IpAddr::V4(Ipv4Addr::UNSPECIFIED)),
            port: lookup("PORT")
                .and_then(|v| v.parse().ok())
                .unwrap_or(5000),
            cors_origins: lookup("CORS_ORIGINS")
                .map(|v| {
                    v.split(',')
                        .map(str::trim)
                        .filter(|s| !s.is_empty())
                        .map(str::to_string)
                        .collect()
                })
                .unwrap_or_default(),
        }
    }

    pub fn addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    pub fn cors_layer(&self) -> CorsLayer {
        let origins: Vec<HeaderValue> = self
            .cors_origins
            .iter()
            .filter_map(|s| HeaderValue::from_str(s).ok())
            .collect();

        if origins.is_empty() {
            tracing::warn!("CORS_ORIGINS not set, cross-origin requests will be rejected");
        } else {
            tracing::info!("CORS allowed origins: {:?}", origins);
        }

        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
            .allow_headers(tower_http::cors::Any)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> ServerConfig {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ServerConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]);
        assert_eq!(config.addr(), "0.0.0.0:5000".parse().unwrap());
        assert!(config.cors_origins.is_empty());
    }

    #[test]
    fn test_custom_host_and_port() {
        let config = config_from(&[("FYYUR_HOST", "127.0.0.1"), ("PORT", "8080")]);
        assert_eq!(config.addr(), "127.0.0.1:8080".parse().unwrap());
    }

    #[test]
    fn test_invalid_port_falls_back() {
        let config = config_from(&[("PORT", "eighty")]);
        assert_eq!(config.port, 5000);
    }

    #[test]
    fn test_cors_origins_split() {
        let config = config_from(&[(
            "CORS_ORIGINS",
            "http://localhost:3000, https://fyyur.example.com,,",
        )]);
        assert_eq!(
            config.cors_origins,
            vec!["http://localhost:3000", "https://fyyur.example.com"]
        );
    }
}
