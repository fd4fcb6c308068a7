//! Utility functions and types.

use std::fmt::{Debug, Display, Formatter};

/// Redact hides secret material in logs and `Debug` output.
///
/// Values shorter than 12 characters are fully masked. Longer values keep
/// their first and last three characters so that two different keys can
/// still be told apart in a log line.
#[derive(Clone, Copy)]
pub struct Redact<'a>(&'a str);

impl<'a> From<&'a str> for Redact<'a> {
    fn from(value: &'a str) -> Self {
        Redact(value)
    }
}

impl<'a> From<&'a String> for Redact<'a> {
    fn from(value: &'a String) -> Self {
        Redact(value.as_str())
    }
}

impl<'a> From<&'a Option<String>> for Redact<'a> {
    fn from(value: &'a Option<String>) -> Self {
        Redact(value.as_deref().unwrap_or_default())
    }
}

impl Display for Redact<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let chars = self.0.chars().count();
        if chars == 0 {
            return f.write_str("EMPTY");
        }
        if chars < 12 {
            return f.write_str("***");
        }

        let head: String = self.0.chars().take(3).collect();
        let tail: String = self.0.chars().skip(chars - 3).collect();
        write!(f, "{head}***{tail}")
    }
}

impl Debug for Redact<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Display::fmt(self, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("", "EMPTY"; "empty")]
    #[test_case("AK1", "***"; "short")]
    #[test_case("HelloWorld", "***"; "just under limit")]
    #[test_case("yRdQE7hybEfPD5Kgt4fXCe", "yRd***XCe"; "access key")]
    #[test_case("密钥密钥密钥密钥密钥密钥", "密钥密***钥密钥"; "multibyte")]
    fn test_redact(input: &str, expected: &str) {
        assert_eq!(format!("{:?}", Redact::from(input)), expected);
        assert_eq!(Redact::from(input).to_string(), expected);
    }

    #[test]
    fn test_redact_option() {
        let none: Option<String> = None;
        assert_eq!(Redact::from(&none).to_string(), "EMPTY");
    }
}
