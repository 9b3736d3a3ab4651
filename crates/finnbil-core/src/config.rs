use chrono::Datelike;

use crate::app_config::{AppConfig, CurveSelection, Environment};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key), chrono::Utc::now().year())
}

/// Build application configuration using the provided env-var lookup function.
///
/// `current_year` is the fallback evaluation year when
/// `FINNBIL_EVALUATION_YEAR` is unset; passing it in keeps this function
/// independent of the wall clock.
fn build_app_config<F>(lookup: F, current_year: i32) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let env = parse_environment(&or_default("FINNBIL_ENV", "development"))?;
    let log_level = or_default("FINNBIL_LOG_LEVEL", "info");
    let reference_csv_path = PathBuf::from(or_default("FINNBIL_REFERENCE_CSV", "./data/rav4.csv"));

    let depreciation_curve = or_default("FINNBIL_DEPRECIATION_CURVE", "new")
        .parse::<CurveSelection>()
        .map_err(|reason| ConfigError::InvalidEnvVar {
            var: "FINNBIL_DEPRECIATION_CURVE".to_string(),
            reason,
        })?;

    let evaluation_year = match lookup("FINNBIL_EVALUATION_YEAR") {
        Ok(raw) => parse_year(&raw).map_err(|reason| ConfigError::InvalidEnvVar {
            var: "FINNBIL_EVALUATION_YEAR".to_string(),
            reason,
        })?,
        Err(_) => current_year,
    };

    Ok(AppConfig {
        env,
        log_level,
        reference_csv_path,
        depreciation_curve,
        evaluation_year,
    })
}

fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "FINNBIL_ENV".to_string(),
            reason: format!("unknown environment '{other}'"),
        }),
    }
}

fn parse_year(raw: &str) -> Result<i32, String> {
    let year = raw.trim().parse::<i32>().map_err(|e| e.to_string())?;
    if (1000..=9999).contains(&year) {
        Ok(year)
    } else {
        Err(format!("{year} is not a four-digit year"))
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
