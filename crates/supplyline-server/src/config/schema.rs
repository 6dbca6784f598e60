use serde::Deserialize;
use supplyline_core::error::{Result, SupplyError};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServiceConfig {
    pub version: u32,

    #[serde(default)]
    pub server: ServerSection,

    #[serde(default)]
    pub database: DatabaseSection,

    pub auth: AuthSection,
}

impl ServiceConfig {
    pub fn validate(&self) -> Result<()> {
        if self.version != 1 {
            return Err(SupplyError::BadRequest("unsupported config version".into()));
        }
        self.database.validate()?;
        self.auth.validate()?;
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerSection {
    #[serde(default = "default_listen")]
    pub listen: String,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            listen: default_listen(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DatabaseSection {
    #[serde(default = "default_database_url")]
    pub url: String,

    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

impl Default for DatabaseSection {
    fn default() -> Self {
        Self {
            url: default_database_url(),
            max_connections: default_max_connections(),
        }
    }
}

impl DatabaseSection {
    pub fn validate(&self) -> Result<()> {
        if self.url.trim().is_empty() {
            return Err(SupplyError::BadRequest("database.url must not be empty".into()));
        }
        if self.max_connections == 0 {
            return Err(SupplyError::BadRequest(
                "database.max_connections must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AuthSection {
    pub users: Vec<UserConfig>,
}

impl AuthSection {
    pub fn validate(&self) -> Result<()> {
        if self.users.is_empty() {
            return Err(SupplyError::BadRequest("auth.users must not be empty".into()));
        }
        for u in &self.users {
            if u.username.trim().is_empty() {
                return Err(SupplyError::BadRequest("auth user username must not be empty".into()));
            }
            if u.password_sha256.len() != 64
                || !u.password_sha256.chars().all(|c| c.is_ascii_hexdigit())
            {
                return Err(SupplyError::BadRequest(format!(
                    "auth user {} password_sha256 must be 64 hex chars",
                    u.username
                )));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UserConfig {
    pub username: String,
    pub password_sha256: String,
}

fn default_listen() -> String {
    "0.0.0.0:8080".into()
}
fn default_database_url() -> String {
    "sqlite://supplyline.db".into()
}
fn default_max_connections() -> u32 {
    5
}
