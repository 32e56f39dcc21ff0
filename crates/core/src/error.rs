#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("{entity} with ID {id} not found")]
    NotFound { entity: &'static str, id: String },

    #[error("{entity} with ID {id} not found for artist {artist_id}")]
    NotFoundForArtist {
        entity: &'static str,
        id: String,
        artist_id: String,
    },

    #[error("No release found containing song with ID {0}")]
    NoReleaseForSong(String),

    #[error("Release {0} found but has no cover image associated")]
    CoverMissing(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    /// Several field rules failed at once. `errors` lists every failing rule.
    #[error("{message}: {}", errors.join("; "))]
    InvalidFields {
        message: String,
        errors: Vec<String>,
    },

    #[error("Artist with ID '{0}' already exists")]
    ArtistIdTaken(String),

    #[error("Artist with name '{0}' already exists")]
    ArtistNameTaken(String),

    #[error("A release with the title \"{0}\" already exists for this artist")]
    ReleaseTitleTaken(String),

    /// Song membership of a published release is frozen.
    #[error("{0}")]
    SongSetLocked(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<validator::ValidationErrors> for CoreError {
    fn from(errs: validator::ValidationErrors) -> Self {
        let mut errors: Vec<String> = errs
            .field_errors()
            .into_iter()
            .flat_map(|(field, list)| {
                list.iter().map(move |e| match &e.message {
                    Some(msg) => msg.to_string(),
                    None => format!("{field} is invalid ({})", e.code),
                })
            })
            .collect();
        // HashMap iteration order is unstable; keep responses deterministic.
        errors.sort();
        CoreError::InvalidFields {
            message: "Validation failed".to_string(),
            errors,
        }
    }
}
