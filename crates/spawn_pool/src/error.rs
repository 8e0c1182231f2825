//! Errors returned by pools and the spawner

use crate::host::HostError;

/// Errors that can occur while spawning or despawning
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum SpawnError {
    /// The host engine failed to create an object
    #[error("Host failed to instantiate '{template}': {source}")]
    Host {
        /// Template being instantiated
        template: String,
        /// Underlying host error
        #[source]
        source: HostError,
    },

    /// Spawn pose contains NaN or infinite values
    #[error("Invalid pose for '{template}': {reason}")]
    InvalidPose {
        /// Template being spawned
        template: String,
        /// Description of the problem
        reason: String,
    },

    /// The instance belongs to a different pool
    #[error("Instance '{object}' is not owned by pool '{pool}'")]
    ForeignInstance {
        /// Pool the instance was handed to
        pool: String,
        /// Debug form of the host object
        object: String,
    },

    /// The instance was issued before its pool was cleared
    #[error("Instance '{object}' of pool '{pool}' is stale (generation {generation}, pool at {current})")]
    StaleInstance {
        /// Owning pool
        pool: String,
        /// Debug form of the host object
        object: String,
        /// Generation carried by the handle
        generation: u32,
        /// Current pool generation
        current: u32,
    },

    /// No pool manages the object and the policy is to reject it
    #[error("Object '{object}' is not managed by any pool")]
    UnmanagedInstance {
        /// Debug form of the host object
        object: String,
    },

    /// No pool is registered under this name
    #[error("No pool registered for '{name}'")]
    PoolNotFound {
        /// Template name
        name: String,
    },

    /// The spawner has been shut down
    #[error("Spawner has been shut down")]
    ShutDown,
}

/// Result alias for spawning operations
pub type SpawnResult<T> = Result<T, SpawnError>;
