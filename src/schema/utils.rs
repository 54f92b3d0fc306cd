// Utility functions for the schema module
//
// Shared by the builder, the synthesizer and the renderer.

use serde_json::Value;

/// Key used for `additionalProperties` entries in examples and renderings.
pub const ANY_KEY: &str = "<any>";

/// Stands in for an array whose item schema is not declared.
pub const ANY_ARRAY: &str = "[<any>]";

/// Placeholder emitted where a recursive schema would be expanded again.
pub const RECURSIVE_REF: &str = "<recursive ref>";

/// Formats a constraint number the way it appears in renderings.
///
/// Shortest round-trip digits. Integral values print without a fractional part
/// (`5`, not `5.0`); exponents below -4 or from 6 up switch to exponent form
/// with a signed, two-digit exponent (`1e+21`, `1.5e-07`).
pub fn format_number(value: f64) -> String {
    if value == 0.0 || !value.is_finite() {
        return format!("{}", value);
    }

    let scientific = format!("{:e}", value);
    let Some((mantissa, exponent)) = scientific.split_once('e') else {
        return format!("{}", value);
    };
    let Ok(exponent) = exponent.parse::<i32>() else {
        return format!("{}", value);
    };

    if (-4..6).contains(&exponent) {
        format!("{}", value)
    } else {
        let sign = if exponent < 0 { '-' } else { '+' };
        format!("{}e{}{:02}", mantissa, sign, exponent.unsigned_abs())
    }
}

/// Formats a literal from the document for inline display.
///
/// Strings are shown bare, everything else as compact JSON.
pub fn literal_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Escapes one JSON pointer reference token (RFC 6901).
pub fn escape_pointer_token(token: &str) -> String {
    token.replace('~', "~0").replace('/', "~1")
}
