use waste_common::error::CommonError;

/// Application errors. The query-shaped variants (`EmptyQuery`, `NoMatch`,
/// `MissingUpload`) render as the exact user-facing messages; none of these
/// is fatal to the server.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Common(#[from] CommonError),

    #[error("config error: {0}")]
    Config(String),

    #[error("invalid catalog: {0}")]
    Catalog(String),

    #[error("Please enter a search term.")]
    EmptyQuery,

    #[error("No results found for \"{query}\"")]
    NoMatch { query: String },

    #[error("Please upload an image.")]
    MissingUpload,

    #[error("no guide for category: {0}")]
    UnknownCategory(String),

    #[error("could not locate address: {0}")]
    AddressNotFound(String),
}
