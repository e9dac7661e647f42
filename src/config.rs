//! Runtime configuration loaded from the environment.

use std::env;
use std::path::PathBuf;

use thiserror::Error;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_JWT_SECRET: &str = "advance-request-jwt-secret-change-in-production";
const DEFAULT_SHEETS_API_BASE: &str = "https://sheets.googleapis.com/v4";
const DEFAULT_TEMPLATE_PATH: &str = "resources/archives/Solicitud Anticipo-2.pdf";
const DEFAULT_FONTS_DIR: &str = "resources/fonts";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} is set but empty")]
    Empty(&'static str),
    #[error("GOOGLE_CREDENTIALS_PATH or SHEETS_ACCESS_TOKEN must be set when SPREADSHEET_ID is set")]
    MissingCredentials,
}

/// How the ledger talks to the spreadsheet API.
#[derive(Debug, Clone)]
pub enum SheetsAuth {
    /// Service-account JSON key exchanged for short-lived access tokens.
    ServiceAccount(PathBuf),
    /// Pre-issued OAuth access token, mostly for local runs.
    StaticToken(String),
}

#[derive(Debug, Clone)]
pub struct SheetsConfig {
    pub spreadsheet_id: String,
    pub api_base: String,
    pub auth: SheetsAuth,
}

/// Allow-list overrides; `None` keeps the compiled-in list for that role.
#[derive(Debug, Clone, Default)]
pub struct RoleOverrides {
    pub admin: Option<Vec<String>>,
    pub commercial: Option<Vec<String>>,
    pub inside: Option<Vec<String>>,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: String,
    pub jwt_secret: String,
    /// When absent the ledger is kept in memory.
    pub sheets: Option<SheetsConfig>,
    pub template_path: PathBuf,
    pub fonts_dir: PathBuf,
    pub roles: RoleOverrides,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            jwt_secret: DEFAULT_JWT_SECRET.to_string(),
            sheets: None,
            template_path: PathBuf::from(DEFAULT_TEMPLATE_PATH),
            fonts_dir: PathBuf::from(DEFAULT_FONTS_DIR),
            roles: RoleOverrides::default(),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let jwt_secret = env::var("JWT_SECRET").unwrap_or_else(|_| {
            log::warn!("JWT_SECRET not set, using default secret. SET THIS IN PRODUCTION!");
            DEFAULT_JWT_SECRET.to_string()
        });

        let sheets = match optional_var("SPREADSHEET_ID")? {
            Some(spreadsheet_id) => {
                let auth = if let Some(path) = optional_var("GOOGLE_CREDENTIALS_PATH")? {
                    SheetsAuth::ServiceAccount(PathBuf::from(path))
                } else if let Some(token) = optional_var("SHEETS_ACCESS_TOKEN")? {
                    SheetsAuth::StaticToken(token)
                } else {
                    return Err(ConfigError::MissingCredentials);
                };
                Some(SheetsConfig {
                    spreadsheet_id,
                    api_base: env::var("SHEETS_API_BASE")
                        .unwrap_or_else(|_| DEFAULT_SHEETS_API_BASE.to_string()),
                    auth,
                })
            }
            None => {
                log::warn!("SPREADSHEET_ID not set, submissions will be kept in memory only");
                None
            }
        };

        Ok(Self {
            bind_addr: env::var("BIND_ADDR").unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string()),
            jwt_secret,
            sheets,
            template_path: env::var("TEMPLATE_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(DEFAULT_TEMPLATE_PATH)),
            fonts_dir: env::var("FONTS_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(DEFAULT_FONTS_DIR)),
            roles: RoleOverrides {
                admin: email_list("ROLE_ADMIN_EMAILS"),
                commercial: email_list("ROLE_COMMERCIAL_EMAILS"),
                inside: email_list("ROLE_INSIDE_EMAILS"),
            },
        })
    }
}

fn optional_var(key: &'static str) -> Result<Option<String>, ConfigError> {
    match env::var(key) {
        Ok(value) if value.trim().is_empty() => Err(ConfigError::Empty(key)),
        Ok(value) => Ok(Some(value)),
        Err(_) => Ok(None),
    }
}

fn email_list(key: &str) -> Option<Vec<String>> {
    env::var(key).ok().map(|raw| parse_email_list(&raw))
}

/// Split a comma separated allow-list. Entries are trimmed but keep their case.
pub fn parse_email_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(str::to_string)
        .collect()
}
