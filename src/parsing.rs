use std::fmt::Display;
use std::str::FromStr;

use pest::Parser;

use crate::value_error::{VError, VResult};

#[derive(Parser)]
#[grammar = "plants.pest"]
pub(crate) struct TokenParser;

/// Parse a Fortran-style logical: `T`, `t`, `.true.`, `F`, `false`, ...
///
/// Only the first letter (after an optional leading period) matters, so any
/// trailing text after the `T` or `F` is accepted.
pub(crate) fn parse_logical(s: &str) -> VResult<bool> {
    let inner = TokenParser::parse(Rule::logical, s)
        .map_err(|e| VError::from_pest(e, s, "logical"))?
        .next()
        .and_then(|pair| pair.into_inner().next());

    match inner.map(|pair| pair.as_rule()) {
        Some(Rule::true_value) => Ok(true),
        Some(Rule::false_value) => Ok(false),
        _ => Err(VError::ParsingError { s: s.to_owned(), t: "logical", reason: "expected T or F".to_owned() })
    }
}

/// Parse a decimal integer into any integer type.
///
/// The token must match the integer grammar; range errors from the target type
/// (e.g. `-1` for a `u32`) are reported as [`VError::ConversionError`].
pub(crate) fn parse_integer<T>(s: &str) -> VResult<T>
where T: FromStr,
      T::Err: Display
{
    TokenParser::parse(Rule::integer, s)
        .map_err(|e| VError::from_pest(e, s, "integer"))?;

    s.parse::<T>()
        .map_err(|e| VError::ConversionError { s: s.to_owned(), t: std::any::type_name::<T>(), reason: e.to_string() })
}

/// Parse a real number, accepting Fortran `d` exponents.
pub(crate) fn parse_real(s: &str) -> VResult<f64> {
    TokenParser::parse(Rule::real, s)
        .map_err(|e| VError::from_pest(e, s, "real"))?;

    // Rust does not know about the double precision exponent character
    let normalized = s.replace(['d', 'D'], "e");
    normalized.parse::<f64>()
        .map_err(|e| VError::ConversionError { s: s.to_owned(), t: "f64", reason: e.to_string() })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_logical() -> VResult<()> {
        for s in ["T", "t", ".true.", "TRUE", "t,"] {
            assert!(parse_logical(s)?, "'{s}' should parse as true");
        }

        for s in ["F", "f", ".false.", "False"] {
            assert!(!parse_logical(s)?, "'{s}' should parse as false");
        }

        let e = parse_logical("x");
        assert!(e.is_err(), "Parsing 'x' as a logical did not return an error");
        let e = parse_logical("");
        assert!(e.is_err(), "Parsing an empty string as a logical did not return an error");
        Ok(())
    }

    #[test]
    fn test_integer() -> VResult<()> {
        assert_eq!(parse_integer::<i32>("2015")?, 2015);
        assert_eq!(parse_integer::<i64>("-7")?, -7);
        assert_eq!(parse_integer::<usize>("+12")?, 12);

        let e = parse_integer::<i32>("1.5").unwrap_err();
        assert!(matches!(e, VError::ParsingError { .. }), "'1.5' should fail the integer grammar, got {e:?}");

        let e = parse_integer::<u32>("-1").unwrap_err();
        assert!(matches!(e, VError::ConversionError { .. }), "'-1' should fail to convert to u32, got {e:?}");
        assert_eq!(e.token(), "-1");
        Ok(())
    }

    #[test]
    fn test_real() -> VResult<()> {
        assert_eq!(parse_real("45.2")?, 45.2);
        assert_eq!(parse_real("-3")?, -3.0);
        assert_eq!(parse_real("1.")?, 1.0);
        assert_eq!(parse_real(".5")?, 0.5);
        assert_eq!(parse_real("2.5e-3")?, 2.5e-3);
        assert_eq!(parse_real("1.5D2")?, 150.0);
        assert_eq!(parse_real("+0.0001")?, 0.0001);

        for s in ["abc", "1.2.3", "", "e5", "NaN", "1,5"] {
            assert!(parse_real(s).is_err(), "Parsing '{s}' as a real did not return an error");
        }
        Ok(())
    }
}
