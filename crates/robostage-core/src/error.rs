use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid fps: {0} (must be finite and > 0)")]
    InvalidFps(f32),

    #[error("Invalid terrain resolution {0:?} (each axis must be >= 2)")]
    InvalidResolution([usize; 2]),

    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
