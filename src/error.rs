use thiserror::Error;

/// Crate-wide result type alias.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while starting or hosting a show.
///
/// The simulation and the renderer never fail; everything here comes from
/// configuration, the terminal, or the timer table.
#[derive(Debug, Error)]
pub enum Error {
    /// Terminal or file I/O failed.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// The config file is not valid TOML or has unknown keys.
    #[error("could not parse config: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// A config value is out of range.
    #[error("invalid config: {0}")]
    InvalidConfig(String),

    /// A colour string is not `RRGGBB` hex.
    #[error("invalid hex color: {0} (expected RRGGBB)")]
    InvalidColor(String),

    /// A timer period that is not a positive finite number of milliseconds.
    #[error("timer period must be positive, got {0} ms")]
    InvalidTimer(f64),

    /// No drawable area, e.g. no terminal or a zero-sized one.
    #[error("drawing surface unavailable: {0}")]
    SurfaceUnavailable(String),
}
