use thiserror::Error;

/// A translation catalog could not be loaded.
///
/// Only raised while building a [`crate::Translator`]; a locale without a
/// catalog is not an error.
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("failed to parse translation catalog for {locale}: {source}")]
    Parse {
        locale: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("translation catalog for {locale} has an entry with an empty id")]
    EmptyId { locale: String },

    /// A translation that cannot be rendered with the data its id is
    /// rendered with.
    #[error("translation catalog for {locale}: entry {id:?}: {reason}")]
    Placeholder {
        locale: String,
        id: String,
        reason: String,
    },
}

/// A template could not be compiled or rendered.
///
/// Templates are authored alongside the code that displays them, so these are
/// programming errors rather than user-facing conditions.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TemplateError {
    #[error("template {template:?}: {reason}")]
    Syntax { template: String, reason: String },

    #[error("template {template:?}: no value for key {key:?}")]
    MissingKey { template: String, key: String },

    #[error("template {template:?}: {key:?} is not a map")]
    NotAMap { template: String, key: String },
}

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Template(#[from] TemplateError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
