use thiserror::Error;

/// Message returned for every malformed date, whatever the reason.
pub const INVALID_DATE_MESSAGE: &str = "Invalid date received - please use ISO8601!";

/// Errors produced by type operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("Invalid date received - please use ISO8601!")]
    InvalidDate(String),

    #[error("Must have an integer as the todo ID!")]
    InvalidId(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

impl TypeError {
    /// The raw input that failed to parse, if any.
    pub fn input(&self) -> Option<&str> {
        match self {
            Self::InvalidDate(input) | Self::InvalidId(input) => Some(input),
            Self::Serialization(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_date_message_is_uniform() {
        let a = TypeError::InvalidDate("asdf".into());
        let b = TypeError::InvalidDate("2018-31-10".into());
        assert_eq!(a.to_string(), INVALID_DATE_MESSAGE);
        assert_eq!(a.to_string(), b.to_string());
        assert_eq!(a.input(), Some("asdf"));
    }

    #[test]
    fn invalid_id_message() {
        let e = TypeError::InvalidId("abc".into());
        assert_eq!(e.to_string(), "Must have an integer as the todo ID!");
    }
}
