//! Service config loader (strict parsing).

pub mod schema;

use std::fs;

use supplyline_core::error::{Result, SupplyError};

pub use schema::{AuthSection, DatabaseSection, ServerSection, ServiceConfig, UserConfig};

pub fn load_from_file(path: &str) -> Result<ServiceConfig> {
    let s = fs::read_to_string(path)
        .map_err(|e| SupplyError::Internal(format!("read config failed: {e}")))?;
    load_from_str(&s)
}

pub fn load_from_str(s: &str) -> Result<ServiceConfig> {
    let cfg: ServiceConfig = serde_yaml::from_str(s)
        .map_err(|e| SupplyError::BadRequest(format!("invalid yaml: {e}")))?;
    cfg.validate()?;
    Ok(cfg)
}
