use bridge_traits::BridgeError;
use thiserror::Error;

use crate::color::ColorError;

#[derive(Error, Debug)]
pub enum NavBarError {
    #[error(transparent)]
    InvalidColor(#[from] ColorError),

    #[error("Platform call failed: {0}")]
    Platform(#[from] BridgeError),

    #[error("Runtime error: {0}")]
    Runtime(#[from] core_runtime::Error),
}

pub type Result<T> = std::result::Result<T, NavBarError>;
