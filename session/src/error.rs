use thiserror::Error;

/// Errors raised while acquiring the media behind a catalogue entry.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MediaError {
    /// The entry is not in the catalogue, or its media could not be opened.
    #[error("media unavailable for \"{name}\": {reason}")]
    ResourceUnavailable {
        /// Display name of the entry that was requested.
        name: String,
        /// Human-readable cause reported by the catalogue or backend.
        reason: String,
    },

    /// The backend could not reposition the media.
    #[error("cannot seek in \"{name}\": {reason}")]
    Unseekable {
        /// Display name of the selected entry.
        name: String,
        /// Cause reported by the backend.
        reason: String,
    },
}

impl MediaError {
    /// Build a [`MediaError::ResourceUnavailable`].
    pub fn unavailable(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::ResourceUnavailable {
            name: name.into(),
            reason: reason.into(),
        }
    }
}

/// Errors returned by transport operations on a session.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// A transport operation was attempted before a successful selection.
    #[error("nothing selected")]
    NothingSelected,

    /// The media handle could not be reacquired after a stop.
    #[error(transparent)]
    Media(#[from] MediaError),
}

/// Errors that can occur while building a catalogue.
#[derive(Error, Debug)]
pub enum CatalogueError {
    /// Two entries share the same display name.
    #[error("duplicate catalogue entry: {0}")]
    DuplicateName(String),

    /// An entry has an empty display name.
    #[error("catalogue entry with empty display name")]
    EmptyName,

    /// The catalogue document is not valid JSON.
    #[error("Invalid catalogue document: {0}")]
    Json(#[from] serde_json::Error),

    /// The catalogue file could not be read.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
