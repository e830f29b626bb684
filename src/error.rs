use thiserror::Error;

/// All errors that the crate can generate
#[derive(Error, Debug)]
pub enum Error {
    /// The invocation itself is unusable: a required input selector is
    /// missing, or a remote document was requested without credentials.
    /// Reported before any work begins.
    #[error("{0}")]
    Usage(String),

    /// A required file (image, template, font, stylesheet, document) was
    /// missing or unreadable
    #[error("{0}")]
    Resource(String),

    /// Downloading a remote document failed; carries the upstream detail
    #[error("remote fetch failed: {0}")]
    RemoteFetch(String),

    /// A single word cannot fit inside the writable page area, even at the
    /// start of a line on a fresh page
    #[error("word {word:?} cannot fit inside the writable page area")]
    LayoutOverflow { word: String },

    #[error(transparent)]
    /// An I/O error occurred
    Io(#[from] std::io::Error),

    #[error(transparent)]
    /// [image] failed to decode or encode an image
    Image(#[from] image::ImageError),

    #[error(transparent)]
    /// [toml] failed to parse the stylesheet
    Toml(#[from] toml::de::Error),
}
