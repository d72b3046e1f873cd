use crate::error::{Result, Search1ApiError};

pub const DEFAULT_API_URL: &str = "https://api.search1api.com";
pub const DEFAULT_TIMEOUT_SECS: u64 = 40;
pub const API_KEY_ENV: &str = "SEARCH1API_API_KEY";
const API_URL_ENV: &str = "SEARCH1API_API_URL";
const TIMEOUT_ENV: &str = "SEARCH1API_TIMEOUT";
const MIN_TIMEOUT_SECS: u64 = 1;
const MAX_TIMEOUT_SECS: u64 = 600;

#[derive(Clone)]
pub struct Config {
    pub api_key: String,
    pub api_url: String,
    pub timeout_secs: u64,
}

impl Config {
    /// Uses `api_key` when given, otherwise reads `SEARCH1API_API_KEY`.
    pub fn resolve(api_key: Option<String>) -> Result<Self> {
        Self::resolve_with(api_key, process_env)
    }

    pub fn resolve_with(api_key: Option<String>, env: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let api_key = match api_key {
            Some(key) => key,
            None => env(API_KEY_ENV).ok_or_else(|| {
                Search1ApiError::ConfigMissing(format!(
                    "API key must be provided either as a parameter or in the {API_KEY_ENV} environment variable"
                ))
            })?,
        };

        let api_key = api_key.trim().to_string();
        if api_key.is_empty() {
            return Err(Search1ApiError::ConfigInvalid(format!("{API_KEY_ENV} cannot be empty")));
        }

        Ok(Self {
            api_key,
            api_url: DEFAULT_API_URL.into(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        })
    }

    /// Environment-only configuration, as used by the server binary.
    pub fn load() -> Result<Self> {
        Self::load_with(process_env)
    }

    pub fn load_with(env: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let lookup = |name: &str| env(name).filter(|s| !s.trim().is_empty());
        let mut config = Self::resolve_with(None, lookup)?;

        if let Some(url) = lookup(API_URL_ENV) {
            config = config.with_api_url(&url)?;
        }
        config.timeout_secs = env_u64_range(lookup, TIMEOUT_ENV, DEFAULT_TIMEOUT_SECS, MIN_TIMEOUT_SECS, MAX_TIMEOUT_SECS)?;
        Ok(config)
    }

    pub fn with_api_url(mut self, url: &str) -> Result<Self> {
        validate_url(url)?;
        self.api_url = url.trim().trim_end_matches('/').to_string();
        Ok(self)
    }

    pub fn with_timeout(mut self, secs: u64) -> Result<Self> {
        if !(MIN_TIMEOUT_SECS..=MAX_TIMEOUT_SECS).contains(&secs) {
            return Err(Search1ApiError::ConfigInvalid(format!(
                "timeout must be between {MIN_TIMEOUT_SECS} and {MAX_TIMEOUT_SECS} seconds"
            )));
        }
        self.timeout_secs = secs;
        Ok(self)
    }

    pub fn mask_api_key(&self) -> String {
        mask_key(&self.api_key)
    }
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("api_key", &self.mask_api_key())
            .field("api_url", &self.api_url)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

fn process_env(name: &str) -> Option<String> {
    std::env::var(name).ok()
}

fn env_u64_range(
    env: impl Fn(&str) -> Option<String>,
    name: &str,
    default: u64,
    min: u64,
    max: u64,
) -> Result<u64> {
    let Some(raw) = env(name) else { return Ok(default) };
    let val: u64 = raw.trim().parse().map_err(|_| {
        Search1ApiError::ConfigInvalid(format!("{name} must be an integer between {min} and {max}"))
    })?;
    if !(min..=max).contains(&val) {
        return Err(Search1ApiError::ConfigInvalid(format!("{name} must be an integer between {min} and {max}")));
    }
    Ok(val)
}

fn validate_url(url: &str) -> Result<()> {
    let url = url.trim();
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(Search1ApiError::ConfigInvalid(format!("{API_URL_ENV} must be a valid http or https URL")));
    }
    Ok(())
}

fn mask_key(key: &str) -> String {
    let chars: Vec<char> = key.trim().chars().collect();
    if chars.len() <= 8 {
        return "********".into();
    }
    let first: String = chars[..4].iter().collect();
    let last: String = chars[chars.len()-4..].iter().collect();
    format!("{first}********{last}")
}
