//! Language service errors.
//!
//! Symbol lookups never fail with an error: anything that cannot be found is
//! `None`. Errors only come from inputs that are themselves malformed, such as
//! an unparsable directive selector or a bad configuration file.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SelectorError {
    #[error("Nesting :not in a selector is not allowed")]
    NestedNot,

    #[error("Multiple selectors in :not are not supported")]
    MultipleInNot,

    #[error(
        "Error in attribute selector \"{0}\". Unescaped \"$\" is not supported. Please escape with \"\\$\"."
    )]
    UnescapedDollar(String),
}

#[derive(Debug, Error)]
pub enum LanguageServiceError {
    #[error("invalid language service configuration: {0}")]
    Config(#[from] serde_json::Error),
}

pub type Result<T, E = LanguageServiceError> = std::result::Result<T, E>;
