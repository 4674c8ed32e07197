//! Column name derivation for dynamic attributes
//!
//! Turns an arbitrary JSON key path into a relational column identifier that
//! is safe to splice into DDL and insert statements.
//!
//! ## Rules
//!
//! | Input condition | Result |
//! |-----------------|--------|
//! | Non-alphanumeric character | Replaced with `_` |
//! | Leading/trailing `_` after replacement | Trimmed |
//! | Nothing left after trimming | Fallback name `Field` |
//! | First character is a digit | Prefixed with `F_` |
//! | Longer than 120 characters | First 113 chars + `_` + 6-hex fingerprint |
//!
//! The fingerprint is derived from a SHA-256 hash of the *original* raw path,
//! not the truncated name, so the same path always truncates to the same
//! identifier. Truncation collisions across different raw paths are
//! vanishingly unlikely but not impossible; that residual risk is accepted.

use sha2::{Digest, Sha256};

/// Maximum length of a derived column name
pub const MAX_COLUMN_NAME_LEN: usize = 120;

/// Fallback name when sanitization leaves an empty identifier
pub const FALLBACK_COLUMN_NAME: &str = "Field";

/// Characters of the sanitized name kept when truncating
const TRUNCATED_PREFIX_LEN: usize = 113;

/// Hex characters of the path fingerprint appended after truncation
const FINGERPRINT_HEX_LEN: usize = 6;

/// Derive a column identifier from a raw JSON key path.
///
/// Total and pure: never fails, and a given path always produces the same
/// identifier. The output is non-empty, at most [`MAX_COLUMN_NAME_LEN`]
/// characters, matches `[A-Za-z0-9_]+`, and never starts with a digit.
pub fn column_name(raw_path: &str) -> String {
    let sanitized: String = raw_path
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();
    let trimmed = sanitized.trim_matches('_');

    let mut name = if trimmed.is_empty() {
        FALLBACK_COLUMN_NAME.to_string()
    } else {
        trimmed.to_string()
    };

    if name.as_bytes()[0].is_ascii_digit() {
        name.insert_str(0, "F_");
    }

    // All characters are ASCII at this point, so byte positions are char
    // positions and truncation cannot split a code point.
    if name.len() > MAX_COLUMN_NAME_LEN {
        name.truncate(TRUNCATED_PREFIX_LEN);
        name.push('_');
        name.push_str(&path_fingerprint(raw_path));
    }

    name
}

/// First [`FINGERPRINT_HEX_LEN`] hex characters of SHA-256 over the raw path.
fn path_fingerprint(raw_path: &str) -> String {
    let digest = Sha256::digest(raw_path.as_bytes());
    digest
        .iter()
        .take(FINGERPRINT_HEX_LEN / 2)
        .map(|b| format!("{:02x}", b))
        .collect()
}
