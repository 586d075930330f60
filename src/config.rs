//! Service configuration
//!
//! Values come from `STOREFRONT_*` environment variables, optionally seeded
//! from a `.env` file. Anything unset falls back to a default.

use std::{net::SocketAddr, path::PathBuf, time::Duration};

pub const DEFAULT_STORE_NAME: &str = "Al-Noor Kesar";
pub const DEFAULT_WHATSAPP_NUMBER: &str = "919697499557";
pub const DEFAULT_UPI_QR: &str = "/upi-qr.png";
pub const DEFAULT_SESSION_IDLE: Duration = Duration::from_secs(30 * 60);

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid value {value:?} for {key}")]
    Invalid { key: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct StorefrontConfig {
    /// Address the HTTP server binds to
    pub addr: SocketAddr,
    /// Shop name used in order messages
    pub store_name: String,
    /// Directory holding `products.json`; discovered when `None`
    pub data_dir: Option<PathBuf>,
    /// Directory for cart snapshots; carts live in memory when `None`
    pub cart_dir: Option<PathBuf>,
    /// WhatsApp number orders and contact messages go to
    pub whatsapp_number: String,
    /// Pause before the contact form reports success
    pub contact_delay: Duration,
    /// Image of the shop's UPI code
    pub upi_qr: String,
    /// How long an unused session keeps its cart in memory
    pub session_idle: Duration,
}

impl Default for StorefrontConfig {
    fn default() -> Self {
        Self {
            addr: SocketAddr::from(([0, 0, 0, 0], 8000)),
            store_name: DEFAULT_STORE_NAME.to_string(),
            data_dir: None,
            cart_dir: None,
            whatsapp_number: DEFAULT_WHATSAPP_NUMBER.to_string(),
            contact_delay: Duration::from_millis(1000),
            upi_qr: DEFAULT_UPI_QR.to_string(),
            session_idle: DEFAULT_SESSION_IDLE,
        }
    }
}

impl StorefrontConfig {
    /// Loads `.env` (if any) and reads the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let mut config = Self::default();

        if let Some(value) = get("STOREFRONT_ADDR") {
            config.addr = value.trim().parse().map_err(|_| ConfigError::Invalid {
                key: "STOREFRONT_ADDR",
                value,
            })?;
        }
        if let Some(value) = get("STOREFRONT_NAME") {
            config.store_name = value;
        }
        config.data_dir = get("STOREFRONT_DATA_DIR").map(PathBuf::from);
        config.cart_dir = get("STOREFRONT_CART_DIR").map(PathBuf::from);
        if let Some(value) = get("STOREFRONT_WHATSAPP_NUMBER") {
            let number = value.trim().trim_start_matches('+');
            if number.is_empty() || !number.chars().all(|c| c.is_ascii_digit()) {
                return Err(ConfigError::Invalid {
                    key: "STOREFRONT_WHATSAPP_NUMBER",
                    value,
                });
            }
            config.whatsapp_number = number.to_string();
        }
        if let Some(value) = get("STOREFRONT_CONTACT_DELAY_MS") {
            let ms: u64 = value.trim().parse().map_err(|_| ConfigError::Invalid {
                key: "STOREFRONT_CONTACT_DELAY_MS",
                value,
            })?;
            config.contact_delay = Duration::from_millis(ms);
        }
        if let Some(value) = get("STOREFRONT_UPI_QR") {
            config.upi_qr = value;
        }
        if let Some(value) = get("STOREFRONT_SESSION_IDLE_SECS") {
            match value.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => config.session_idle = Duration::from_secs(secs),
                _ => {
                    return Err(ConfigError::Invalid {
                        key: "STOREFRONT_SESSION_IDLE_SECS",
                        value,
                    })
                }
            }
        }

        Ok(config)
    }
}
