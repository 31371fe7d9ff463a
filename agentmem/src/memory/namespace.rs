//! Memory namespace derivation from a user identity.

use super::store::Namespace;

/// Outer namespace segment for user memories.
pub const MEMORIES_SEGMENT: &str = "memories";

/// Escapes a user id into a namespace segment.
///
/// ASCII alphanumerics, `-`, `_` and `@` are kept; every other byte is
/// percent-encoded, `%` included, so distinct ids never map to the same segment.
pub fn escape_user_id(user_id: &str) -> String {
    let mut out = String::with_capacity(user_id.len());
    for b in user_id.bytes() {
        if b.is_ascii_alphanumeric() || matches!(b, b'-' | b'_' | b'@') {
            out.push(b as char);
        } else {
            out.push_str(&format!("%{:02X}", b));
        }
    }
    out
}

/// Namespace holding the memories of `user_id`: `["memories", <escaped id>]`.
pub fn memory_namespace(user_id: &str) -> Namespace {
    vec![MEMORIES_SEGMENT.to_string(), escape_user_id(user_id)]
}
