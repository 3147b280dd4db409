use thiserror::Error;

#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("Unsupported platform: {0} (expected gitlab or jenkins)")]
    UnsupportedPlatform(String),

    #[error("Unknown stage: {0}")]
    UnknownStage(String),

    #[error("Invalid template {name}: {source}")]
    Template {
        name: String,
        #[source]
        source: Box<handlebars::TemplateError>,
    },

    #[error("Failed to render {name}: {source}")]
    Render {
        name: String,
        #[source]
        source: Box<handlebars::RenderError>,
    },

    #[error("Failed to read templates from {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}
