use std::{env, time::Duration};

use log::*;
use sf_common::Secret;

const DEFAULT_SFS_HOST: &str = "127.0.0.1";
const DEFAULT_SFS_PORT: u16 = 8470;
const DEFAULT_RAZORPAY_BASE_URL: &str = "https://api.razorpay.com";
const DEFAULT_GATEWAY_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    /// Payment provider configuration, including the webhook shared secret.
    pub razorpay: RazorpayConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_SFS_HOST.to_string(),
            port: DEFAULT_SFS_PORT,
            database_url: String::default(),
            razorpay: RazorpayConfig::default(),
        }
    }
}

impl ServerConfig {
    pub fn new(host: &str, port: u16) -> Self {
        Self { host: host.to_string(), port, ..Default::default() }
    }

    pub fn from_env_or_default() -> Self {
        let host = env::var("SFS_HOST").ok().unwrap_or_else(|| DEFAULT_SFS_HOST.into());
        let port = env::var("SFS_PORT")
            .map(|s| {
                s.parse::<u16>().unwrap_or_else(|e| {
                    error!(
                        "🪛️ {s} is not a valid port for SFS_PORT. {e} Using the default, {DEFAULT_SFS_PORT}, instead."
                    );
                    DEFAULT_SFS_PORT
                })
            })
            .ok()
            .unwrap_or(DEFAULT_SFS_PORT);
        let database_url = env::var("SF_DATABASE_URL").ok().unwrap_or_else(|| {
            error!("🪛️ SF_DATABASE_URL is not set. Please set it to the URL for the storefront database.");
            String::default()
        });
        let razorpay = RazorpayConfig::from_env_or_default();
        Self { host, port, database_url, razorpay }
    }
}

/// Credentials and endpoints for the Razorpay integration. The API key doubles as the public client key handed to
/// the frontend; the API secret and the webhook secret must never appear in logs, so they live in [`Secret`]s.
#[derive(Clone, Debug, Default)]
pub struct RazorpayConfig {
    pub api_key: String,
    pub api_secret: Secret<String>,
    /// The shared secret that signs webhook payloads.
    pub webhook_secret: Secret<String>,
    pub base_url: String,
    /// How long to wait on the gateway before calling the checkout off.
    pub timeout: Duration,
}

impl RazorpayConfig {
    pub fn from_env_or_default() -> Self {
        let api_key = env::var("SFS_RAZORPAY_API_KEY").ok().unwrap_or_else(|| {
            error!("🪛️ SFS_RAZORPAY_API_KEY is not set. Please set it to the key id for your Razorpay account.");
            String::default()
        });
        let api_secret = env::var("SFS_RAZORPAY_API_SECRET").ok().unwrap_or_else(|| {
            error!("🪛️ SFS_RAZORPAY_API_SECRET is not set. Please set it to the key secret for your Razorpay account.");
            String::default()
        });
        let webhook_secret = env::var("SFS_RAZORPAY_WEBHOOK_SECRET").ok().unwrap_or_else(|| {
            error!(
                "🪛️ SFS_RAZORPAY_WEBHOOK_SECRET is not set. Incoming payment webhooks cannot be verified and will be \
                 rejected."
            );
            String::default()
        });
        let base_url = env::var("SFS_RAZORPAY_BASE_URL").ok().unwrap_or_else(|| {
            info!("🪛️ SFS_RAZORPAY_BASE_URL is not set. Using the default, {DEFAULT_RAZORPAY_BASE_URL}.");
            DEFAULT_RAZORPAY_BASE_URL.to_string()
        });
        let timeout = env::var("SFS_GATEWAY_TIMEOUT")
            .map_err(|_| {
                info!(
                    "🪛️ SFS_GATEWAY_TIMEOUT is not set. Using the default value of {} s.",
                    DEFAULT_GATEWAY_TIMEOUT.as_secs()
                )
            })
            .and_then(|s| {
                s.parse::<u64>()
                    .map(Duration::from_secs)
                    .map_err(|e| warn!("🪛️ Invalid configuration value for SFS_GATEWAY_TIMEOUT. {e}"))
            })
            .ok()
            .unwrap_or(DEFAULT_GATEWAY_TIMEOUT);
        Self { api_key, api_secret: Secret::new(api_secret), webhook_secret: Secret::new(webhook_secret), base_url, timeout }
    }
}
