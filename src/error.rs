use thiserror::Error;

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("unknown site '{0}'")]
    NotFound(String),

    #[error("site '{0}' is declared more than once")]
    DuplicateKey(String),

    #[error("site '{0}' has an empty tile URL")]
    EmptyTileUrl(String),

    #[error("site '{key}' tile URL must contain {{z}}, {{x}} and {{y}} exactly once: {url}")]
    BadPlaceholders { key: String, url: String },

    #[error("site '{key}' default zoom {zoom} is above the maximum of {max}")]
    ZoomOutOfRange { key: String, zoom: u32, max: u32 },

    #[error("site '{0}' sets both boundaryUrl and layers.boundaries")]
    ConflictingBoundary(String),

    #[error("site '{key}' uses unknown template ${{{name}}}")]
    UnknownTemplate { key: String, name: String },

    #[error("site '{key}' has an unterminated template in {input}")]
    UnterminatedTemplate { key: String, input: String },

    #[error("failed to read catalog {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse catalog {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}
