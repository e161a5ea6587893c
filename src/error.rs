use thiserror::Error;

/// Failures that end a cloud generation call.
#[derive(Error, Debug)]
pub enum CloudError {
    /// The word grammar matched nothing in the input text.
    #[error("no words found in provided text")]
    NoWordsFound,

    /// The font resource could not be parsed.
    #[error("failed to load font: {0}")]
    FontLoad(String),

    /// The rendered canvas could not be encoded.
    #[error("failed to encode image: {0}")]
    Encode(#[from] image::ImageError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Palette service failures. Never fatal to a generation call.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PaletteError {
    #[error("cannot generate an empty palette")]
    EmptyPalette,

    #[error("palette generator produced {produced} of {requested} colors")]
    Exhausted { requested: usize, produced: usize },
}
