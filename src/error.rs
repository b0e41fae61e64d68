use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML deserialize error: {0}")]
    TomlDe(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSer(#[from] toml::ser::Error),

    #[error("Invalid package reference '{0}'\n\n\
             Hint: packages are written as owner/repo#version, e.g. PolymerElements/paper-button#1.0.0")]
    InvalidRequest(String),

    #[error("Installed {0}, but it declares no main entry point")]
    MissingEntryPoint(String),

    #[error("No matching packages were installed for {0}")]
    PackageNotInstalled(String),

    #[error("Install failed: {0}")]
    Install(String),

    #[error("Dependency resolution failed: {0}")]
    Resolution(String),

    #[error("{0}")]
    Other(String),
}
