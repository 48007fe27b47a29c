use std::fmt;

/// A typed flag value. The variant is fixed at registration; assignments
/// parse their input into the same variant.
#[derive(Debug, Clone, PartialEq)]
pub enum FlagValue {
    String(String),
    Int(i64),
    Uint(u64),
    Float(f64),
    Bool(bool),
}

impl FlagValue {
    /// Returns `true` for boolean values, which take no separate argument.
    pub fn is_bool(&self) -> bool {
        matches!(self, FlagValue::Bool(_))
    }

    /// Placeholder used in usage text when the usage string names none.
    pub(crate) fn type_name(&self) -> &'static str {
        match self {
            FlagValue::String(_) => "string",
            FlagValue::Int(_) => "int",
            FlagValue::Uint(_) => "uint",
            FlagValue::Float(_) => "float",
            FlagValue::Bool(_) => "",
        }
    }

    pub(crate) fn is_zero(&self) -> bool {
        match self {
            FlagValue::String(s) => s.is_empty(),
            FlagValue::Int(i) => *i == 0,
            FlagValue::Uint(u) => *u == 0,
            FlagValue::Float(f) => *f == 0.0,
            FlagValue::Bool(b) => !b,
        }
    }

    /// Parses `raw` into a value of the same kind as `self`.
    ///
    /// Integers accept `0x`, `0o` and `0b` prefixes. Booleans accept the
    /// spellings `1 t T true TRUE True` and `0 f F false FALSE False`.
    pub(crate) fn parse_like(&self, raw: &str) -> Result<FlagValue, String> {
        match self {
            FlagValue::String(_) => Ok(FlagValue::String(raw.to_owned())),
            FlagValue::Int(_) => parse_int(raw).map(FlagValue::Int),
            FlagValue::Uint(_) => parse_uint(raw).map(FlagValue::Uint),
            FlagValue::Float(_) => raw
                .parse::<f64>()
                .map(FlagValue::Float)
                .map_err(|e| e.to_string()),
            FlagValue::Bool(_) => parse_bool(raw).map(FlagValue::Bool),
        }
    }
}

impl fmt::Display for FlagValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FlagValue::String(s) => f.write_str(s),
            FlagValue::Int(i) => write!(f, "{i}"),
            FlagValue::Uint(u) => write!(f, "{u}"),
            FlagValue::Float(x) => write!(f, "{x}"),
            FlagValue::Bool(b) => write!(f, "{b}"),
        }
    }
}

fn split_radix(digits: &str) -> (u32, &str) {
    for (prefix, radix) in [("0x", 16), ("0X", 16), ("0o", 8), ("0O", 8), ("0b", 2), ("0B", 2)] {
        if let Some(rest) = digits.strip_prefix(prefix) {
            return (radix, rest);
        }
    }
    (10, digits)
}

fn parse_int(raw: &str) -> Result<i64, String> {
    let (sign, unsigned) = match raw.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", raw),
    };
    let (radix, digits) = split_radix(unsigned);
    i64::from_str_radix(&format!("{sign}{digits}"), radix).map_err(|e| e.to_string())
}

fn parse_uint(raw: &str) -> Result<u64, String> {
    let (radix, digits) = split_radix(raw);
    u64::from_str_radix(digits, radix).map_err(|e| e.to_string())
}

fn parse_bool(raw: &str) -> Result<bool, String> {
    match raw {
        "1" | "t" | "T" | "true" | "TRUE" | "True" => Ok(true),
        "0" | "f" | "F" | "false" | "FALSE" | "False" => Ok(false),
        _ => Err(format!("invalid boolean {raw:?}")),
    }
}
