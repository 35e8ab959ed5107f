// CASCHED-TRACE ERROR TAXONOMY
// ONLY I/O AVAILABILITY SURFACES AS AN ERROR. LINE-LEVEL PARSE FAILURES,
// EMPTY GROUPS AND ZERO BASELINES ARE RECOVERED WHERE THEY HAPPEN.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TraceError {
    #[error("trace file not found: {}", path.display())]
    SourceNotFound { path: PathBuf },

    #[error("failed to read trace file {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid line pattern")]
    Pattern(#[from] regex::Error),
}

impl TraceError {
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        let path = path.into();
        if source.kind() == io::ErrorKind::NotFound {
            Self::SourceNotFound { path }
        } else {
            Self::Io { path, source }
        }
    }

    // TRUE WHEN THE CALLER MAY FALL BACK TO AN EMPTY DATASET
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::SourceNotFound { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_maps_to_source_not_found() {
        let err = TraceError::io("missing.log", io::Error::from(io::ErrorKind::NotFound));
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "trace file not found: missing.log");
    }

    #[test]
    fn other_kinds_stay_io() {
        let err = TraceError::io("x.log", io::Error::from(io::ErrorKind::PermissionDenied));
        assert!(!err.is_not_found());
        assert!(matches!(err, TraceError::Io { .. }));
    }
}
