use std::io;

use thiserror::Error;

use crate::blogml::BlogMlError;
use crate::pipeline::Stage;

pub type Result<T> = std::result::Result<T, ConvertError>;

#[derive(Debug, Error)]
pub enum ConvertError {
    /// An absolute URL points at a host other than the configured blog host.
    #[error("URL ({url}) does not contain expected host ({expected})")]
    HostMismatch { url: String, expected: String },

    #[error("Unable to parse URL ({url}): {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    /// Two distinct posts would be written to the same file.
    #[error("Slug '{slug}' is already mapped to {existing}; cannot map it to {conflicting}")]
    ConflictingSlug {
        slug: String,
        existing: String,
        conflicting: String,
    },

    #[error("URL ({0}) is not a mapped image URL")]
    UnmappedUrl(String),

    #[error("Cannot execute an empty pipeline")]
    EmptyPipeline,

    #[error("Step '{step}' ({stage:?}) cannot be added after stage {previous:?}")]
    StepOutOfOrder {
        step: &'static str,
        stage: Stage,
        previous: Stage,
    },

    #[error("Step '{step}' needs the {field}, which has not been set yet")]
    StateNotReady {
        step: &'static str,
        field: &'static str,
    },

    #[error("The {field} of the post has already been set")]
    StateAlreadySet { field: &'static str },

    #[error("Step '{step}' expects {expected} content")]
    UnexpectedContent {
        step: &'static str,
        expected: &'static str,
    },

    #[error("Post {post_id} references unknown category '{category}'")]
    UnknownCategory { post_id: String, category: String },

    #[error("Invalid CSS selector '{0}'")]
    Selector(&'static str),

    #[error("Subfolder ({subfolder}) does not match date for post ({date})")]
    SubfolderMismatch { subfolder: String, date: String },

    #[error("Error rendering template: {0}")]
    Template(String),

    #[error("Error reading BlogML: {0}")]
    BlogMl(#[from] BlogMlError),

    #[error(transparent)]
    Io(#[from] io::Error),
}
