//! Classification of raw command-line arguments.
//!
//! Every argument is one of three things: a flag (`-name`, `--name`,
//! optionally with `=value`), the `--` terminator, or a positional argument
//! that ends flag parsing.

use super::FlagError;

/// The dash prefix a flag was written with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Designator {
    Single,
    Double,
}

impl Designator {
    pub fn as_str(self) -> &'static str {
        match self {
            Designator::Single => "-",
            Designator::Double => "--",
        }
    }
}

/// A flag argument split into its designator, name and inline value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlagToken<'a> {
    pub designator: Designator,
    pub name: &'a str,
    pub value: Option<&'a str>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token<'a> {
    Flag(FlagToken<'a>),
    Terminator,
    Positional(&'a str),
}

/// Classifies a single argument.
///
/// Empty strings and a lone `-` are positional. A name that itself starts
/// with `-` or `=` (as in `---x` or `-=x`) is rejected as bad syntax.
pub fn classify(arg: &str) -> Result<Token<'_>, FlagError> {
    let Some(single) = arg.strip_prefix('-') else {
        return Ok(Token::Positional(arg));
    };
    if single.is_empty() {
        return Ok(Token::Positional(arg));
    }

    let (designator, body) = match single.strip_prefix('-') {
        Some("") => return Ok(Token::Terminator),
        Some(body) => (Designator::Double, body),
        None => (Designator::Single, single),
    };

    if body.starts_with('-') || body.starts_with('=') {
        return Err(FlagError::BadSyntax(arg.to_owned()));
    }

    let (name, value) = match body.split_once('=') {
        Some((name, value)) => (name, Some(value)),
        None => (body, None),
    };

    Ok(Token::Flag(FlagToken {
        designator,
        name,
        value,
    }))
}
