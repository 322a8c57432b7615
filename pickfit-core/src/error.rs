//! Error types for pickfit

use thiserror::Error;

/// Failure codes reported by a surface fitting oracle
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FitError {
    #[error("no primitive found around the seed point")]
    NotFound,

    #[error("the fitted primitive was rejected as unacceptable")]
    UnacceptableResult,

    #[error("the fitting license is invalid or expired")]
    LicenseInvalid,

    #[error("the fitting engine ran out of memory")]
    OutOfMemory,
}

impl FitError {
    /// Whether the session may keep fitting after this failure.
    ///
    /// `NotFound` and `UnacceptableResult` only mean this particular seed did not
    /// produce a usable primitive; the other kinds disable fitting.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, FitError::NotFound | FitError::UnacceptableResult)
    }
}

/// Errors produced while picking a seed point
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickError {
    #[error("cannot pick from an empty point cloud")]
    EmptyCloud,
}

/// Main error type for pickfit operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("Device error: {0}")]
    Device(String),

    #[error("Fit error: {0}")]
    Fit(#[from] FitError),

    #[error("Pick error: {0}")]
    Pick(#[from] PickError),

    #[error("Fitting is disabled after a fatal oracle failure")]
    FittingDisabled,

    #[error("Invalid data: {0}")]
    InvalidData(String),
}

impl Error {
    /// Whether the error leaves the session usable.
    ///
    /// Device failures and fatal oracle failures are not recoverable; empty clouds,
    /// misses and rejected fits are.
    pub fn is_recoverable(&self) -> bool {
        match self {
            Error::Fit(e) => e.is_recoverable(),
            Error::Pick(_) => true,
            Error::InvalidData(_) => true,
            Error::Device(_) | Error::FittingDisabled => false,
        }
    }
}

/// Result type alias for pickfit operations
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fit_error_recoverability() {
        assert!(FitError::NotFound.is_recoverable());
        assert!(FitError::UnacceptableResult.is_recoverable());
        assert!(!FitError::LicenseInvalid.is_recoverable());
        assert!(!FitError::OutOfMemory.is_recoverable());
    }

    #[test]
    fn test_error_conversion() {
        let err: Error = FitError::OutOfMemory.into();
        assert!(matches!(err, Error::Fit(FitError::OutOfMemory)));
        assert!(!err.is_recoverable());

        let err: Error = PickError::EmptyCloud.into();
        assert!(err.is_recoverable());
        assert_eq!(err.to_string(), "Pick error: cannot pick from an empty point cloud");
    }

    #[test]
    fn test_session_error_recoverability() {
        assert!(!Error::Device("unplugged".to_string()).is_recoverable());
        assert!(!Error::FittingDisabled.is_recoverable());
        assert!(Error::InvalidData("mask length".to_string()).is_recoverable());
        assert!(Error::Fit(FitError::UnacceptableResult).is_recoverable());
    }
}
