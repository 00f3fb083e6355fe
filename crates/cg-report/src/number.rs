//! CEA number notation.
//!
//! CEA prints small and large values with the exponent glued to the mantissa
//! and the `E` dropped: `9.8212-1` is 0.98212, `2.5123-2` is 0.025123. A zero
//! exponent leaves a space instead of a sign, so `1.5994 0` arrives as two
//! whitespace tokens. Every real value CEA prints carries a decimal point,
//! which is what tells a trailing exponent token apart from a value.

/// Parse one token: plain (`3320.06`, `-1.5e3`, `NaN`) or compact (`9.8212-1`).
pub fn parse_token(token: &str) -> Option<f64> {
    let token = token.trim();
    if token.is_empty() {
        return None;
    }
    if let Ok(v) = token.parse::<f64>() {
        return Some(v);
    }
    let split = compact_exponent_at(token)?;
    let (mantissa, exponent) = token.split_at(split);
    exponent.parse::<i32>().ok()?;
    format!("{mantissa}e{exponent}").parse::<f64>().ok()
}

/// Byte index of the sign that starts a compact exponent.
fn compact_exponent_at(token: &str) -> Option<usize> {
    let bytes = token.as_bytes();
    (1..bytes.len())
        .rev()
        .find(|&i| matches!(bytes[i], b'+' | b'-') && !matches!(bytes[i - 1], b'e' | b'E'))
}

/// A bare integer: the zero-or-positive exponent half of a split value.
fn is_exponent_token(token: &str) -> bool {
    let digits = token.strip_prefix(['+', '-']).unwrap_or(token);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

fn is_mantissa_token(token: &str) -> bool {
    token.contains('.') && compact_exponent_at(token).is_none() && !token.contains(['e', 'E'])
}

/// Parse the value columns of one report row.
///
/// Returns the offending token when something does not parse.
pub fn parse_values(columns: &str) -> Result<Vec<f64>, String> {
    let tokens: Vec<&str> = columns.split_whitespace().collect();
    let mut values = Vec::with_capacity(tokens.len());
    let mut i = 0;
    while i < tokens.len() {
        let token = tokens[i];
        if let Some(&next) = tokens.get(i + 1)
            && is_mantissa_token(token)
            && is_exponent_token(next)
        {
            let joined = format!("{token}e{next}");
            let v = joined.parse::<f64>().map_err(|_| format!("{token} {next}"))?;
            values.push(v);
            i += 2;
            continue;
        }
        values.push(parse_token(token).ok_or_else(|| token.to_string())?);
        i += 1;
    }
    Ok(values)
}
