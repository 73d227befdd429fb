//! Content fingerprints used to deduplicate mailing lists

use crate::constants::{FINGERPRINT_MODULUS, LIST_TITLE_PREFIX};
use sha1::{Digest, Sha1};
use unisender_types::{NestedValue, Recipient};

/// Concatenate the string form of every scalar in `value`, depth first.
/// Map keys and sequence indices are not part of the output.
pub fn string_repr(value: &NestedValue) -> String {
    let mut out = String::new();
    push_repr(value, &mut out);
    out
}

fn push_repr(value: &NestedValue, out: &mut String) {
    match value {
        NestedValue::Scalar(scalar) => out.push_str(&scalar.to_repr_string()),
        NestedValue::Map(map) => map.values().for_each(|child| push_repr(child, out)),
        NestedValue::Seq(items) => items.iter().for_each(|child| push_repr(child, out)),
    }
}

/// SHA-1 of the string form, read as a big-endian integer, modulo 10^10.
///
/// Collisions are unlikely but possible; callers use this only to find a
/// list they probably created before.
pub fn fingerprint(value: &NestedValue) -> u64 {
    let digest = Sha1::digest(string_repr(value).as_bytes());
    digest.iter().fold(0u64, |acc, byte| {
        // acc < 10^10, so acc * 256 + 255 stays well inside u64
        (acc * 256 + u64::from(*byte)) % FINGERPRINT_MODULUS
    })
}

/// Title of the mailing list that holds exactly these recipients
pub fn list_title(recipients: &[Recipient]) -> String {
    let value = NestedValue::Seq(recipients.iter().map(NestedValue::from).collect());
    format!("{}{}", LIST_TITLE_PREFIX, fingerprint(&value))
}
