use thiserror::Error;

#[derive(Debug, Error)]
pub enum KmlError {
    #[error("no {0} found")]
    MarkerNotFound(String),
    #[error("1st coordinate not 3D")]
    FirstWaypoint,
    #[error("read error: {0}")]
    Io(#[from] std::io::Error),
}
