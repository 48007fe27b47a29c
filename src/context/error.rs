use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum FlagError {
    #[error("flag redefined: {0}")]
    Redefined(String),

    #[error("invalid flag name: {0:?}")]
    InvalidName(String),

    #[error("bad flag syntax: {0}")]
    BadSyntax(String),

    #[error("flag provided but not defined: -{0}")]
    Undefined(String),

    #[error("no such flag -{0}")]
    NoSuchFlag(String),

    #[error("flag needs an argument: -{0}")]
    MissingArgument(String),

    #[error("invalid value {value:?} for flag -{name}: {reason}")]
    InvalidValue {
        name: String,
        value: String,
        reason: String,
    },

    #[error("help requested")]
    Help,
}
