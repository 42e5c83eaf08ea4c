use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("avatar skeleton root is missing or destroyed")]
    MissingAvatarRoot,

    #[error("outfit root is missing or destroyed")]
    MissingOutfitRoot,

    #[error("outfit '{outfit}' has no used bones")]
    NoUsedBones { outfit: String },

    #[cfg(feature = "json")]
    #[error("failed to parse merge config: {message}")]
    ConfigParse { message: String },

    #[cfg(feature = "json")]
    #[error("unknown resolution policy '{value}'")]
    ConfigUnknownPolicy { value: String },
}
