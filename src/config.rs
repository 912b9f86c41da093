//! Configuration management for the CRM MCP Server.
//!
//! This module handles loading and validating configuration from environment variables.
//! It avoids polluting stdout (which MCP uses for communication) by loading the .env
//! file through `dotenvy`, which never prints.

use crate::error::{ConfigError, ConfigResult};
use std::env;

/// Configuration for the CRM MCP Server.
#[derive(Debug, Clone)]
pub struct Config {
    /// CRM API base URL
    pub crm_api_url: String,

    /// CRM API key for authentication
    pub crm_api_key: String,

    /// HTTP request timeout in seconds (default: 10)
    pub request_timeout: u64,

    /// Page size used when paginating through the record store (default: 100)
    pub page_size: usize,

    /// Upper bound on records fetched per entity type during an orphan
    /// sweep (default: 10000). The sweep is exhaustive only up to this bound.
    pub orphan_scan_limit: usize,

    /// Log level (default: "error")
    pub log_level: String,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Required environment variables:
    /// - `CRM_API_BASE_URL`: Base URL for the CRM API
    /// - `CRM_API_KEY`: API key for authentication
    ///
    /// Optional environment variables:
    /// - `REQUEST_TIMEOUT`: HTTP timeout in seconds (default: 10)
    /// - `CRM_PAGE_SIZE`: Pagination page size (default: 100)
    /// - `ORPHAN_SCAN_LIMIT`: Max records per type in an orphan sweep (default: 10000)
    /// - `LOG_LEVEL`: Logging level (default: "error")
    pub fn from_env() -> ConfigResult<Self> {
        // Try to load .env file if it exists (but don't fail if it doesn't)
        let _ = dotenvy::dotenv();

        let crm_api_url = env::var("CRM_API_BASE_URL")
            .map_err(|_| ConfigError::MissingVar("CRM_API_BASE_URL".to_string()))?;

        let crm_api_key = env::var("CRM_API_KEY")
            .map_err(|_| ConfigError::MissingVar("CRM_API_KEY".to_string()))?;

        // Validate API URL format
        if !crm_api_url.starts_with("http://") && !crm_api_url.starts_with("https://") {
            return Err(ConfigError::InvalidValue {
                var: "CRM_API_BASE_URL".to_string(),
                reason: "Must start with http:// or https://".to_string(),
            });
        }

        // Validate API key is not empty
        if crm_api_key.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                var: "CRM_API_KEY".to_string(),
                reason: "Cannot be empty".to_string(),
            });
        }

        let request_timeout = Self::parse_env_u64("REQUEST_TIMEOUT", 10)?;
        let page_size = Self::parse_env_usize("CRM_PAGE_SIZE", 100)?;
        let orphan_scan_limit = Self::parse_env_usize("ORPHAN_SCAN_LIMIT", 10_000)?;

        if page_size == 0 {
            return Err(ConfigError::InvalidValue {
                var: "CRM_PAGE_SIZE".to_string(),
                reason: "Must be greater than zero".to_string(),
            });
        }

        let log_level = env::var("LOG_LEVEL").unwrap_or_else(|_| "error".to_string());

        Ok(Config {
            crm_api_url,
            crm_api_key,
            request_timeout,
            page_size,
            orphan_scan_limit,
            log_level,
        })
    }

    /// Parse an environment variable as u64 with a default value.
    fn parse_env_u64(var_name: &str, default: u64) -> ConfigResult<u64> {
        match env::var(var_name) {
            Ok(val) => val.parse::<u64>().map_err(|_| ConfigError::InvalidValue {
                var: var_name.to_string(),
                reason: format!("Must be a positive number, got: {}", val),
            }),
            Err(_) => Ok(default),
        }
    }

    /// Parse an environment variable as usize with a default value.
    fn parse_env_usize(var_name: &str, default: usize) -> ConfigResult<usize> {
        match env::var(var_name) {
            Ok(val) => val.parse::<usize>().map_err(|_| ConfigError::InvalidValue {
                var: var_name.to_string(),
                reason: format!("Must be a positive number, got: {}", val),
            }),
            Err(_) => Ok(default),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            crm_api_url: String::new(),
            crm_api_key: String::new(),
            request_timeout: 10,
            page_size: 100,
            orphan_scan_limit: 10_000,
            log_level: "error".to_string(),
        }
    }
}
