use std::{process::ExitStatus, time::Duration};
use thiserror::Error;
use tlp_structs::error::PlanError;

/// Fatal evaluation errors. Missing or empty simulator logs are not here:
/// those degrade to zero-valued statistics so a long-running search survives
/// runs where no vehicle was ever active.
#[derive(Debug, Error)]
pub enum EvalError {
    #[error(transparent)]
    Plan(#[from] PlanError),
    #[error("cannot start simulator '{command}': {source}")]
    SimulatorSpawn {
        command: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed waiting for simulator: {0}")]
    SimulatorWait(#[source] std::io::Error),
    #[error("simulator exited with {status}: {stderr}")]
    SimulatorFailed { status: ExitStatus, stderr: String },
    #[error("simulator did not finish within {timeout:?} and was killed")]
    SimulatorTimeout { timeout: Duration },
    #[error("{arrived} arrived vehicles exceed the declared demand of {demand}")]
    DataIntegrity { arrived: u32, demand: u32 },
}
