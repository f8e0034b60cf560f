use thiserror::Error;

use crate::mesh::AreaId;

/// Convenient result alias for the navigation mesh library.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level library error type.
#[derive(Debug, Error)]
pub enum Error {
    /// The stream did not start with the `.nav` magic marker.
    #[error("magic number is incorrect ({found:#010X} vs {expected:#010X}); this is not a .nav file")]
    InvalidMagic { found: u32, expected: u32 },

    /// The major version is outside the range this decoder understands.
    #[error("unsupported nav mesh major version {major} (supported: {min}..={max})")]
    UnsupportedVersion { major: u32, min: u32, max: u32 },

    /// The stream ended (or failed) while decoding a section.
    #[error("failed to read {section} from nav mesh")]
    TruncatedInput {
        section: &'static str,
        #[source]
        source: std::io::Error,
    },

    /// Raised when a geometric query has no meaningful answer, e.g. the
    /// centroid of a place with zero footprint area.
    #[error("invalid geometry: {message}")]
    InvalidGeometry { message: String },

    /// Raised when the search exhausts every reachable area without finding
    /// the goal.
    #[error("no path found between area {start} and area {goal}")]
    PathNotFound { start: AreaId, goal: AreaId },

    /// Raised when an area identifier is not part of the mesh.
    #[error("unknown area id: {id}")]
    UnknownArea { id: AreaId },

    /// Raised when a place name is not part of the mesh.
    #[error("unknown place name: {name}")]
    UnknownPlace { name: String },

    /// Wrapper for IO errors raised before decoding starts (e.g. opening the file).
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Returns `true` for the decode-time failures that reject a whole load.
    pub fn is_malformed_input(&self) -> bool {
        matches!(
            self,
            Error::InvalidMagic { .. } | Error::UnsupportedVersion { .. } | Error::TruncatedInput { .. }
        )
    }
}
