/// Convenience result type used across the maze engine.
pub type MazeResult<T> = Result<T, MazeError>;

/// Top-level error taxonomy used by engine APIs.
#[derive(thiserror::Error, Debug)]
pub enum MazeError {
    /// Caller-supplied input the engine refuses to work with (ring count out of range,
    /// malformed documents, impossible options).
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// An internal invariant does not hold: the carved structure is not a spanning tree,
    /// adjacency is asymmetric, or a document describes walls that cannot belong to one maze.
    #[error("inconsistent maze: {0}")]
    InconsistentMaze(String),

    /// Errors when serializing or deserializing the structured document.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl MazeError {
    /// Build a [`MazeError::InvalidInput`] value.
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Build a [`MazeError::InconsistentMaze`] value.
    pub fn inconsistent(msg: impl Into<String>) -> Self {
        Self::InconsistentMaze(msg.into())
    }

    /// Build a [`MazeError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }

    /// Return `true` for [`MazeError::InvalidInput`].
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, Self::InvalidInput(_))
    }

    /// Return `true` for [`MazeError::InconsistentMaze`].
    pub fn is_inconsistent(&self) -> bool {
        matches!(self, Self::InconsistentMaze(_))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
