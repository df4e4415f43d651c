use std::fmt;
use std::io;

/// Failure to bring up the terminal. Not recoverable; the process exits.
#[derive(Debug)]
pub enum StartupError {
    /// Raw mode, alternate screen or size query failed
    Terminal(io::Error),
    /// The terminal cannot fit a playable view of the play area
    TooSmall { cols: u16, rows: u16 },
}

impl fmt::Display for StartupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StartupError::Terminal(e) => write!(f, "terminal setup failed: {e}"),
            StartupError::TooSmall { cols, rows } => {
                write!(f, "terminal too small ({cols}x{rows}) for the play area")
            }
        }
    }
}

impl std::error::Error for StartupError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StartupError::Terminal(e) => Some(e),
            StartupError::TooSmall { .. } => None,
        }
    }
}

impl From<io::Error> for StartupError {
    fn from(e: io::Error) -> Self {
        StartupError::Terminal(e)
    }
}
