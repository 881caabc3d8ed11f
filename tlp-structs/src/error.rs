use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PlanError {
    #[error("cannot read timing plan {}: {source}", .path.display())]
    Load {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("timing plan {} contains a non-integer value '{token}'", .path.display())]
    Parse { path: PathBuf, token: String },
    #[error("timing plan has {actual} values but the instance requires {expected} (one offset plus one duration per phase, for each program)")]
    Length { expected: usize, actual: usize },
}
