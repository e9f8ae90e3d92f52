//! Crate-level error types.

use std::fmt;

use crate::assets::AssetError;
use crate::navigation::NavigationError;

/// Errors produced by the galleria crate.
#[derive(Debug)]
pub enum GalleriaError {
    /// Asset cache misuse (disposed cache, released resource).
    Asset(AssetError),
    /// Navigation request for a viewpoint that does not exist.
    Navigation(NavigationError),
    /// Generic I/O failure.
    Io(std::io::Error),
    /// TOML options parsing/serialization failure.
    OptionsParse(String),
}

impl fmt::Display for GalleriaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Asset(e) => write!(f, "asset error: {e}"),
            Self::Navigation(e) => write!(f, "navigation error: {e}"),
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::OptionsParse(msg) => {
                write!(f, "options parse error: {msg}")
            }
        }
    }
}

impl std::error::Error for GalleriaError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Asset(e) => Some(e),
            Self::Navigation(e) => Some(e),
            Self::Io(e) => Some(e),
            Self::OptionsParse(_) => None,
        }
    }
}

impl From<AssetError> for GalleriaError {
    fn from(e: AssetError) -> Self {
        Self::Asset(e)
    }
}

impl From<NavigationError> for GalleriaError {
    fn from(e: NavigationError) -> Self {
        Self::Navigation(e)
    }
}

impl From<std::io::Error> for GalleriaError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

#[cfg(test)]
mod tests {
    use std::error::Error;

    use super::*;

    #[test]
    fn navigation_error_is_wrapped_with_source() {
        let err: GalleriaError = NavigationError::UnknownViewpoint {
            id: "atrium".to_owned(),
        }
        .into();
        assert!(err.to_string().contains("atrium"));
        assert!(err.source().is_some());
    }

    #[test]
    fn options_parse_has_no_source() {
        let err = GalleriaError::OptionsParse("bad key".to_owned());
        assert_eq!(err.to_string(), "options parse error: bad key");
        assert!(err.source().is_none());
    }
}
