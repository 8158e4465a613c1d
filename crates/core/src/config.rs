use std::time::Duration;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("no data store configured: set DATABASE_URL or SUPABASE_URL and SUPABASE_SERVICE_KEY")]
    MissingStore,
    #[error("{var} is set but {missing} is not")]
    Incomplete {
        var: &'static str,
        missing: &'static str,
    },
    #[error("invalid value for {var}: {value:?}")]
    Invalid { var: &'static str, value: String },
}

/// Which backend the data store client talks to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreSettings {
    Postgres {
        database_url: String,
        max_connections: u32,
    },
    Rest {
        url: String,
        service_key: String,
        timeout: Duration,
    },
}

impl StoreSettings {
    pub fn backend_name(&self) -> &'static str {
        match self {
            StoreSettings::Postgres { .. } => "postgres",
            StoreSettings::Rest { .. } => "rest",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub bulletin_env: String,
    pub api_bind: String,
    pub store: StoreSettings,
    pub enrich_concurrency: Option<usize>,
}

impl Settings {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let bulletin_env = lookup("BULLETIN_ENV").unwrap_or_else(|| "development".to_string());
        let api_bind = lookup("BULLETIN_API_BIND").unwrap_or_else(|| "0.0.0.0:3000".to_string());

        let database_url = lookup("DATABASE_URL").or_else(|| lookup("BULLETIN_DATABASE_URL"));
        let store = match database_url {
            Some(database_url) => StoreSettings::Postgres {
                database_url,
                max_connections: parse_var(&lookup, "BULLETIN_DB_MAX_CONNECTIONS")?.unwrap_or(10),
            },
            None => match (lookup("SUPABASE_URL"), lookup("SUPABASE_SERVICE_KEY")) {
                (Some(url), Some(service_key)) => StoreSettings::Rest {
                    url,
                    service_key,
                    timeout: Duration::from_secs(
                        parse_var(&lookup, "BULLETIN_STORE_TIMEOUT_SECS")?.unwrap_or(30),
                    ),
                },
                (Some(_), None) => {
                    return Err(ConfigError::Incomplete {
                        var: "SUPABASE_URL",
                        missing: "SUPABASE_SERVICE_KEY",
                    })
                }
                (None, Some(_)) => {
                    return Err(ConfigError::Incomplete {
                        var: "SUPABASE_SERVICE_KEY",
                        missing: "SUPABASE_URL",
                    })
                }
                (None, None) => return Err(ConfigError::MissingStore),
            },
        };

        let enrich_concurrency = parse_var(&lookup, "BULLETIN_ENRICH_CONCURRENCY")?;

        Ok(Self {
            bulletin_env,
            api_bind,
            store,
            enrich_concurrency,
        })
    }
}

fn parse_var<F, T>(lookup: &F, var: &'static str) -> Result<Option<T>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(var) {
        Some(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::Invalid { var, value }),
        None => Ok(None),
    }
}
