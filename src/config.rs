use std::{env, fmt::Display, str::FromStr};

use anyhow::{Context, anyhow};
use dotenvy::dotenv;

use crate::service::ClockPolicy;

#[derive(Clone, Debug)]
pub struct Config {
    pub server_addr: String,
    pub api_prefix: String,
    pub log_dir: String,
    pub policy: ClockPolicy,
    pub seed_demo_data: bool,

    // Rate limiting, 0 disables
    pub rate_clock_per_min: u32,
    pub rate_protected_per_min: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_addr: "127.0.0.1:8080".to_string(),
            api_prefix: "/api".to_string(),
            log_dir: "logs".to_string(),
            policy: ClockPolicy::default(),
            seed_demo_data: true,
            rate_clock_per_min: 60,
            rate_protected_per_min: 1000,
        }
    }
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from any key/value source, falling back to defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let defaults = Self::default();

        Ok(Self {
            server_addr: lookup("SERVER_ADDR").unwrap_or(defaults.server_addr),
            api_prefix: lookup("API_PREFIX").unwrap_or(defaults.api_prefix),
            log_dir: lookup("LOG_DIR").unwrap_or(defaults.log_dir),
            policy: ClockPolicy {
                require_location_on_clock_in: flag(
                    &lookup,
                    "REQUIRE_LOCATION_ON_CLOCK_IN",
                    defaults.policy.require_location_on_clock_in,
                )?,
                enforce_geofence_on_clock_out: flag(
                    &lookup,
                    "ENFORCE_GEOFENCE_ON_CLOCK_OUT",
                    defaults.policy.enforce_geofence_on_clock_out,
                )?,
            },
            seed_demo_data: flag(&lookup, "SEED_DEMO_DATA", defaults.seed_demo_data)?,
            rate_clock_per_min: parsed(&lookup, "RATE_CLOCK_PER_MIN", defaults.rate_clock_per_min)?,
            rate_protected_per_min: parsed(
                &lookup,
                "RATE_PROTECTED_PER_MIN",
                defaults.rate_protected_per_min,
            )?,
        })
    }
}

fn parsed<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: Display,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e| anyhow!("{e}"))
            .with_context(|| format!("{key} has an invalid value: {raw:?}")),
        None => Ok(default),
    }
}

fn flag(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: bool) -> anyhow::Result<bool> {
    match lookup(key).map(|raw| raw.trim().to_ascii_lowercase()).as_deref() {
        None => Ok(default),
        Some("1" | "true" | "yes" | "on") => Ok(true),
        Some("0" | "false" | "no" | "off") => Ok(false),
        Some(other) => Err(anyhow!("{key} must be a boolean, got {other:?}")),
    }
}
