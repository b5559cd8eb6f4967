//! Candidate expression parsing for the CLI.
//!
//! Accepts a plain decimal integer or a small arithmetic expression:
//! `74513`, `269*277`, `2^61 - 1`, `10^20 + 39`, `1_000_003`.
//! Grammar: sum of terms joined by `+`/`-`; a term is a product of factors
//! joined by `*`; a factor is a decimal integer optionally raised with `^`
//! to a u32 exponent. Whitespace and `_` separators are ignored.

use anyhow::{anyhow, bail, Result};
use rug::ops::Pow;
use rug::Integer;

/// Parse a candidate expression into an integer.
pub fn parse_candidate(expr: &str) -> Result<Integer> {
    let cleaned: String = expr
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '_')
        .collect();
    if cleaned.is_empty() {
        bail!("empty candidate expression");
    }

    let mut total = Integer::new();
    let mut sign_positive = true;
    let mut term_start = 0;
    let bytes = cleaned.as_bytes();

    // A leading sign applies to the first term.
    if bytes[0] == b'+' || bytes[0] == b'-' {
        sign_positive = bytes[0] == b'+';
        term_start = 1;
    }

    let mut i = term_start;
    loop {
        let at_end = i == bytes.len();
        if at_end || bytes[i] == b'+' || bytes[i] == b'-' {
            let term = parse_term(&cleaned[term_start..i])
                .map_err(|e| anyhow!("invalid expression '{}': {}", expr.trim(), e))?;
            if sign_positive {
                total += term;
            } else {
                total -= term;
            }
            if at_end {
                break;
            }
            sign_positive = bytes[i] == b'+';
            term_start = i + 1;
        }
        i += 1;
    }
    Ok(total)
}

/// "a*b^c*d"
fn parse_term(term: &str) -> Result<Integer> {
    if term.is_empty() {
        bail!("missing operand");
    }
    let mut product = Integer::from(1u32);
    for factor in term.split('*') {
        product *= parse_factor(factor)?;
    }
    Ok(product)
}

/// "b" or "b^e"
fn parse_factor(factor: &str) -> Result<Integer> {
    let (base, exp) = match factor.split_once('^') {
        Some((b, e)) => (b, Some(e)),
        None => (factor, None),
    };
    let base = parse_digits(base)?;
    match exp {
        None => Ok(base),
        Some(e) => {
            if e.contains('^') {
                bail!("chained exponent in '{}'", factor);
            }
            let e: u32 = e
                .parse()
                .map_err(|_| anyhow!("exponent '{}' is not a u32", e))?;
            Ok(base.pow(e))
        }
    }
}

fn parse_digits(s: &str) -> Result<Integer> {
    if s.is_empty() {
        bail!("missing operand");
    }
    if !s.bytes().all(|b| b.is_ascii_digit()) {
        bail!("'{}' is not a decimal integer", s);
    }
    Integer::from_str_radix(s, 10).map_err(|e| anyhow!("'{}': {}", s, e))
}
