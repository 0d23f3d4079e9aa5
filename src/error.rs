use thiserror::Error;

/// Exit codes reported by the spoon command-line front end
#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReturnCode {
    NoError = 0,
    InvalidArguments = 1,
    Unsupported = 2,
    RuntimeError = 3,
    SpawnFailure = 4,
    Unimplemented = 5,
}

impl ReturnCode {
    pub fn as_exit_code(self) -> i32 {
        self as i32
    }
}

/// Main error type for spawn operations
#[derive(Error, Debug)]
pub enum SpawnError {
    #[error("Invalid spawn arguments: {0}")]
    InvalidArguments(String),

    #[error("No native spawn facility is available on this platform")]
    Unsupported,

    #[error("Native spawn failed: {message} (OS error {code})")]
    NativeSpawnFailure { code: i32, message: String },

    #[error("The {backend} backend does not implement {operation}")]
    Unimplemented {
        backend: &'static str,
        operation: &'static str,
    },
}

impl SpawnError {
    /// Convert error to the appropriate return code
    pub fn to_return_code(&self) -> ReturnCode {
        match self {
            SpawnError::InvalidArguments(_) => ReturnCode::InvalidArguments,
            SpawnError::Unsupported => ReturnCode::Unsupported,
            SpawnError::NativeSpawnFailure { .. } => ReturnCode::SpawnFailure,
            SpawnError::Unimplemented { .. } => ReturnCode::Unimplemented,
        }
    }

    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        self.to_return_code().as_exit_code()
    }
}

#[cfg(unix)]
impl From<nix::errno::Errno> for SpawnError {
    fn from(errno: nix::errno::Errno) -> Self {
        SpawnError::NativeSpawnFailure {
            code: errno as i32,
            message: errno.desc().to_string(),
        }
    }
}

#[cfg(windows)]
impl From<windows::core::Error> for SpawnError {
    fn from(error: windows::core::Error) -> Self {
        SpawnError::NativeSpawnFailure {
            code: error.code().0,
            message: error.message().to_string(),
        }
    }
}

/// Result type alias for spawn operations
pub type Result<T> = std::result::Result<T, SpawnError>;

impl From<SpawnError> for i32 {
    fn from(error: SpawnError) -> Self {
        error.exit_code()
    }
}
