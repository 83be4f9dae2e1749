//! Common utilities shared by the CLI, the runner and the mock instance

pub mod config;
pub mod error;
pub mod logging;
pub mod paths;

pub use error::{Error, Result};

/// Parse an unsigned 32-bit numeric literal.
///
/// Accepts decimal and `0x`/`0o`/`0b` prefixed forms, surrounding whitespace
/// and single `_` separators between digits (or right after the prefix).
/// Returns `None` for anything else, including negative numbers, decimals
/// with a leading zero and values wider than 32 bits.
pub fn parse_int_literal(text: &str) -> Option<u32> {
    let text = text.trim();
    let (digits, radix) = match text.get(..2).map(str::to_ascii_lowercase).as_deref() {
        Some("0x") => (text[2..].strip_prefix('_').unwrap_or(&text[2..]), 16),
        Some("0o") => (text[2..].strip_prefix('_').unwrap_or(&text[2..]), 8),
        Some("0b") => (text[2..].strip_prefix('_').unwrap_or(&text[2..]), 2),
        _ => (text, 10),
    };

    if digits.is_empty()
        || digits.starts_with('_')
        || digits.ends_with('_')
        || digits.contains("__")
    {
        return None;
    }
    // from_str_radix would accept a leading '+'
    if digits.starts_with('+') {
        return None;
    }

    let cleaned: String = digits.chars().filter(|c| *c != '_').collect();
    // "0", "00" are fine; "010" is not
    if radix == 10 && cleaned.starts_with('0') && cleaned.chars().any(|c| c != '0') {
        return None;
    }
    u32::from_str_radix(&cleaned, radix).ok()
}

/// Parse a numeric literal or report it as invalid command-line input
pub fn parse_literal_arg(text: &str) -> Result<u32> {
    parse_int_literal(text).ok_or_else(|| Error::InvalidLiteral(text.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_decimal_and_hex() {
        assert_eq!(parse_int_literal("42"), Some(42));
        assert_eq!(parse_int_literal("0x2a"), Some(42));
        assert_eq!(parse_int_literal("0X2A"), Some(42));
        assert_eq!(parse_int_literal("  0x12345678\n"), Some(0x1234_5678));
        assert_eq!(parse_int_literal("0xffffffff"), Some(u32::MAX));
        assert_eq!(parse_int_literal("0"), Some(0));
    }

    #[test]
    fn test_parse_other_radixes_and_separators() {
        assert_eq!(parse_int_literal("0b101"), Some(5));
        assert_eq!(parse_int_literal("0o17"), Some(15));
        assert_eq!(parse_int_literal("1_000"), Some(1000));
        assert_eq!(parse_int_literal("0x1234_5678"), Some(0x1234_5678));
        assert_eq!(parse_int_literal("0x_1a"), Some(0x1a));
        assert_eq!(parse_int_literal("0b_1_0"), Some(2));
        assert_eq!(parse_int_literal("00"), Some(0));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert_eq!(parse_int_literal(""), None);
        assert_eq!(parse_int_literal("0x"), None);
        assert_eq!(parse_int_literal("-1"), None);
        assert_eq!(parse_int_literal("+1"), None);
        assert_eq!(parse_int_literal("0x100000000"), None);
        assert_eq!(parse_int_literal("error: no such register"), None);
        assert_eq!(parse_int_literal("_1"), None);
        assert_eq!(parse_int_literal("1_"), None);
        assert_eq!(parse_int_literal("1__0"), None);
        assert_eq!(parse_int_literal("0x__1a"), None);
        assert_eq!(parse_int_literal("0x_"), None);
        assert_eq!(parse_int_literal("010"), None);
        assert_eq!(parse_int_literal("0_7"), None);
    }

    #[test]
    fn test_parse_literal_arg_error() {
        let err = parse_literal_arg("zz").unwrap_err();
        assert!(err.to_string().contains("zz"));
    }
}
