use std::env;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;

use logreport_application::PageSizePolicy;
use logreport_core::AppError;
use logreport_domain::{ReportSchema, SqlIdentifier};
use logreport_infrastructure::DEFAULT_CUSTOM_GROUP_TABLE;
use tracing_subscriber::EnvFilter;

/// Largest page a request may ask for.
pub const MAX_PAGE_SIZE: u64 = 500;

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub database_url: String,
    pub database_max_connections: u32,
    pub frontend_url: String,
    pub api_host: String,
    pub api_port: u16,
    pub report_schema: ReportSchema,
    pub custom_group_table: SqlIdentifier,
    pub page_size: PageSizePolicy,
}

impl ApiConfig {
    pub fn load() -> Result<Self, AppError> {
        let database_url = required_non_empty_env("DATABASE_URL")?;
        let database_max_connections = parsed_env("DATABASE_MAX_CONNECTIONS", 10_u32)?;
        let frontend_url =
            env::var("FRONTEND_URL").unwrap_or_else(|_| "http://localhost:3000".to_owned());

        let api_host = env::var("API_HOST").unwrap_or_else(|_| "127.0.0.1".to_owned());
        let api_port = parsed_env("API_PORT", 3001_u16)?;

        let report_schema = ReportSchema::new(
            env_or("REPORT_PRIMARY_LOG_TABLE", "log_civicrm_activity"),
            env_or("REPORT_CONTACT_TABLE", "civicrm_contact"),
            env_or("REPORT_OPTION_GROUP_TABLE", "civicrm_option_group"),
            env_or("REPORT_OPTION_VALUE_TABLE", "civicrm_option_value"),
        )?;
        let custom_group_table =
            SqlIdentifier::new(env_or("REPORT_CUSTOM_GROUP_TABLE", DEFAULT_CUSTOM_GROUP_TABLE))?;

        let default_page_size =
            parsed_env("REPORT_DEFAULT_PAGE_SIZE", PageSizePolicy::default().default_limit)?;
        let page_size = PageSizePolicy::new(default_page_size, MAX_PAGE_SIZE)?;

        Ok(Self {
            database_url,
            database_max_connections,
            frontend_url,
            api_host,
            api_port,
            report_schema,
            custom_group_table,
            page_size,
        })
    }

    pub fn socket_address(&self) -> Result<SocketAddr, AppError> {
        let host = IpAddr::from_str(&self.api_host).map_err(|error| {
            AppError::Internal(format!("invalid API_HOST '{}': {error}", self.api_host))
        })?;
        Ok(SocketAddr::from((host, self.api_port)))
    }
}

pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .init();
}

fn env_or(name: &str, default: &str) -> String {
    env::var(name)
        .ok()
        .filter(|value| !value.trim().is_empty())
        .unwrap_or_else(|| default.to_owned())
}

fn parsed_env<T>(name: &str, default: T) -> Result<T, AppError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(value) if !value.trim().is_empty() => value
            .trim()
            .parse::<T>()
            .map_err(|error| AppError::Validation(format!("invalid {name}: {error}"))),
        _ => Ok(default),
    }
}

fn required_env(name: &str) -> Result<String, AppError> {
    env::var(name).map_err(|_| AppError::Validation(format!("{name} is required")))
}

fn required_non_empty_env(name: &str) -> Result<String, AppError> {
    let value = required_env(name)?;
    if value.trim().is_empty() {
        return Err(AppError::Validation(format!("{name} must not be empty")));
    }

    Ok(value)
}
