//! Fixture procedures exposed over HTTP for integration suites.

use std::str::FromStr;

use axum::{extract::State, http::StatusCode};
use strum::{AsRefStr, EnumString};

use crate::db::{AppState, seed};
use crate::error::{AppError, Result};
use crate::extractors::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, AsRefStr, EnumString)]
#[strum(serialize_all = "snake_case")]
pub enum Procedure {
    ResetAndSeedData,
    ResetAndSeedStatsData,
}

pub async fn call_procedure(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<StatusCode> {
    let procedure = Procedure::from_str(&name)
        .map_err(|_| AppError::NotFound(format!("Unknown procedure {}", name)))?;

    let mut conn = state.db.get()?;
    match procedure {
        Procedure::ResetAndSeedData => seed::reset_and_seed_data(&mut conn)?,
        Procedure::ResetAndSeedStatsData => seed::reset_and_seed_stats_data(&mut conn)?,
    }

    tracing::info!(procedure = procedure.as_ref(), "Ran fixture procedure");
    Ok(StatusCode::NO_CONTENT)
}
