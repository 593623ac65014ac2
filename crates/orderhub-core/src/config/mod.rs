//! Application configuration schemas.
//!
//! All configuration structs are deserialized from TOML files via the
//! `config` crate. Each sub-module represents a logical configuration
//! section.

pub mod app;
pub mod campaign;
pub mod logging;
pub mod realtime;

use serde::{Deserialize, Serialize};

pub use self::app::ServerConfig;
pub use self::campaign::{CampaignConfig, CampaignSeed, DiscountPolicy};
pub use self::logging::LoggingConfig;
pub use self::realtime::RealtimeConfig;

use crate::error::AppError;

/// Root application configuration.
///
/// This struct is the top-level deserialization target for the merged
/// configuration sources (default file, environment overlay, env vars).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerConfig,
    /// Real-time delivery settings.
    #[serde(default)]
    pub realtime: RealtimeConfig,
    /// Campaign redemption settings.
    #[serde(default)]
    pub campaign: CampaignConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from TOML files.
    ///
    /// Merges the default configuration with an environment-specific overlay
    /// and environment variables prefixed with `ORDERHUB__`.
    pub fn load(env: &str) -> Result<Self, AppError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{env}")).required(false))
            .add_source(
                config::Environment::with_prefix("ORDERHUB")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        config
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_sources_fall_back_to_defaults() {
        let config: AppConfig = config::Config::builder()
            .build()
            .and_then(|c| c.try_deserialize())
            .expect("defaults");

        assert_eq!(config.realtime.ping_interval_seconds, 60);
        assert_eq!(config.campaign.discount_policy, DiscountPolicy::AllowNegative);
        assert_eq!(config.server.port, 8080);
    }

    #[test]
    fn test_partial_toml_overrides_single_field() {
        let config: AppConfig = config::Config::builder()
            .add_source(config::File::from_str(
                "[campaign]\ndiscount_policy = \"clamp\"\n[realtime]\nping_interval_seconds = 5\n",
                config::FileFormat::Toml,
            ))
            .build()
            .and_then(|c| c.try_deserialize())
            .expect("overrides");

        assert_eq!(config.campaign.discount_policy, DiscountPolicy::Clamp);
        assert_eq!(config.realtime.ping_interval_seconds, 5);
        assert_eq!(config.realtime.stale_after_seconds, 0);
    }

    #[test]
    fn test_campaign_seed_tables() {
        let toml = r#"
[[campaign.seed]]
code = "hosgeldin20"
name = "Welcome"
discount_type = "percentage"
discount_value = 20.0
start_date = "2026-01-01T00:00:00Z"
end_date = "2026-12-31T23:59:59Z"
minimum_purchase = 50.0
usage_limit = 100
user_limit = 1

[[campaign.seed]]
code = "FLAT10"
discount_type = "fixed"
discount_value = 10
start_date = "2026-01-01T00:00:00Z"
end_date = "2026-12-31T23:59:59Z"
"#;
        let config: AppConfig = config::Config::builder()
            .add_source(config::File::from_str(toml, config::FileFormat::Toml))
            .build()
            .and_then(|c| c.try_deserialize())
            .expect("seeds");

        let seeds = &config.campaign.seeds;
        assert_eq!(seeds.len(), 2);
        assert_eq!(seeds[0].code, "hosgeldin20");
        assert_eq!(seeds[0].discount_type, crate::types::DiscountType::Percentage);
        assert_eq!(seeds[0].discount_value, rust_decimal::Decimal::from(20));
        assert_eq!(seeds[0].user_limit, 1);
        assert!(seeds[1].is_active);
        assert_eq!(seeds[1].usage_limit, 0);
        assert_eq!(seeds[1].minimum_purchase, rust_decimal::Decimal::ZERO);
    }
}
