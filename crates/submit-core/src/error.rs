use thiserror::Error;

use crate::button::{Operation, Phase};

#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid color: {0}")]
    InvalidColor(String),

    #[error("Invalid easing curve: {0}")]
    InvalidCurve(String),

    #[error("{operation} is not allowed while {phase}")]
    UnexpectedPhase { operation: Operation, phase: Phase },
}

pub type Result<T> = std::result::Result<T, Error>;
