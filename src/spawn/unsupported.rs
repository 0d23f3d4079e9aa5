//! Fallback backend for targets with no native spawn facility.

use crate::error::{Result, SpawnError};

/// Uninhabited child type; no spawn ever produces one on this backend.
pub enum SpawnedProcess {}

impl SpawnedProcess {
    pub fn id(&self) -> u32 {
        match *self {}
    }
}

pub fn spawn(_tokens: &[String]) -> Result<SpawnedProcess> {
    Err(SpawnError::Unsupported)
}

pub fn spawnp(_tokens: &[String]) -> Result<SpawnedProcess> {
    Err(SpawnError::Unsupported)
}
