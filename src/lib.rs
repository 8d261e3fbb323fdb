//! Home Stock family groups.
//!
//! Households share inventory and meal plans through a family group. A group
//! is identified by a short numeric code that is read out to relatives and
//! protected by one shared password.
//!
//! - [`family`]: code issuance, group creation and joining
//! - [`db`]: SQLite group store
//! - [`server`]: axum HTTP surface and bearer sessions
//! - [`config`]: YAML and environment configuration

pub mod config;
pub mod db;
pub mod family;
pub mod models;
pub mod server;

use config::Config;
use family::{Argon2Hasher, CodeIssuer, FamilyGroupService};

/// Opens the database named in `config` and wires the production service.
pub async fn build_service(
    config: &Config,
) -> Result<server::GroupService, Box<dyn std::error::Error>> {
    let pool = db::init_db(&config.database_path).await?;
    let hasher = Argon2Hasher::with_params(
        config.hash_memory_kib,
        config.hash_iterations,
        config.hash_parallelism,
    )?;

    Ok(FamilyGroupService::new(
        db::GroupRepository::new(pool),
        hasher,
        CodeIssuer::new(config.code_max_attempts),
        config.group_policy(),
    ))
}
