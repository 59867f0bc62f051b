//! Error types for relsim.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum SimError {
    #[error("body mass must be positive, got {mass}")]
    NonPositiveMass { mass: f64 },

    #[error("speed {speed} is at or above the light-speed cap of 24")]
    Superluminal { speed: f64 },

    #[error("simulation speed must be positive and finite, got {speed}")]
    InvalidSimSpeed { speed: f64 },

    #[error("invalid scenario: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, SimError>;
