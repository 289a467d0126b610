//! Page spec resolution
//!
//! Pure functions from a [`PageSpec`] and a default page size to a [`PageWindow`].

use super::types::{Coercion, PageParam, PageSpec, PageWindow};
use crate::error::{Error, Result};

/// Resolve a page spec into an offset/limit window.
///
/// Every supplied parameter is coerced first, so malformed input is
/// reported even when precedence would have ignored that field.
pub fn resolve(spec: &PageSpec, default_limit: usize, coercion: Coercion) -> Result<PageWindow> {
    let limit = resolve_limit(spec.limit.as_ref(), default_limit, coercion)?;
    let page = spec
        .page
        .as_ref()
        .map(|p| coerce("page", p, coercion))
        .transpose()?;
    let offset = spec
        .offset
        .as_ref()
        .map(|o| coerce("offset", o, coercion))
        .transpose()?;

    let offset = match (page, offset) {
        (Some(page), _) if page > 0 => {
            let page = usize::try_from(page - 1)
                .map_err(|_| Error::invalid_input("page", page.to_string(), "page is too large"))?;
            page.checked_mul(limit).ok_or_else(|| {
                Error::invalid_input(
                    "page",
                    (page + 1).to_string(),
                    "page offset overflows with the requested limit",
                )
            })?
        }
        (_, Some(offset)) if offset >= 0 => usize::try_from(offset).map_err(|_| {
            Error::invalid_input("offset", offset.to_string(), "offset is too large")
        })?,
        _ => 0,
    };

    Ok(PageWindow::new(offset, limit))
}

/// Resolve just the page size: the explicit limit, or `default_limit`.
pub fn resolve_limit(
    limit: Option<&PageParam>,
    default_limit: usize,
    coercion: Coercion,
) -> Result<usize> {
    let Some(param) = limit else {
        return default_or_error(default_limit);
    };

    let value = coerce("limit", param, coercion)?;
    if value > 0 {
        return usize::try_from(value)
            .map_err(|_| Error::invalid_input("limit", param.to_string(), "limit is too large"));
    }

    match coercion {
        Coercion::Strict => Err(Error::invalid_input(
            "limit",
            param.to_string(),
            "limit must be a positive integer",
        )),
        Coercion::Lenient => default_or_error(default_limit),
    }
}

fn default_or_error(default_limit: usize) -> Result<usize> {
    if default_limit == 0 {
        return Err(Error::invalid_input(
            "limit",
            "0",
            "default page size must be a positive integer",
        ));
    }
    Ok(default_limit)
}

/// Coerce a raw parameter into an integer.
pub fn coerce(field: &str, param: &PageParam, coercion: Coercion) -> Result<i64> {
    match (param, coercion) {
        (PageParam::Int(i), _) => Ok(*i),
        (PageParam::Text(s), Coercion::Strict) => s
            .trim()
            .parse::<i64>()
            .map_err(|_| Error::invalid_input(field, s.as_str(), "expected an integer")),
        (PageParam::Text(s), Coercion::Lenient) => Ok(leading_integer(s)),
    }
}

/// Parse the leading integer of a string: optional whitespace, an optional
/// sign, then digits. Anything without digits is 0; overflow saturates.
fn leading_integer(s: &str) -> i64 {
    let s = s.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };

    let mut value: i64 = 0;
    for b in digits.bytes().take_while(u8::is_ascii_digit) {
        let digit = i64::from(b - b'0');
        value = value.saturating_mul(10).saturating_add(digit);
    }

    if negative {
        -value
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_leading_integer() {
        assert_eq!(leading_integer("12"), 12);
        assert_eq!(leading_integer("  7"), 7);
        assert_eq!(leading_integer("-3"), -3);
        assert_eq!(leading_integer("+4"), 4);
        assert_eq!(leading_integer("12abc"), 12);
        assert_eq!(leading_integer("abc"), 0);
        assert_eq!(leading_integer(""), 0);
        assert_eq!(leading_integer("99999999999999999999999"), i64::MAX);
    }
}
