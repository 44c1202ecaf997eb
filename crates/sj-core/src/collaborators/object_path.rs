//! `sanitize_object_path_segment`: escapes bytes that cannot appear in a
//! D-Bus object path element, grounded on
//! `original_source/src/udisksdaemonutil.c:udisks_safe_append_to_object_path`.

use std::fmt::Write as _;

/// Maps each input byte: ASCII alphanumeric passes through unchanged; every
/// other byte (including `_` itself, matching udisks' exact character-class
/// check) becomes `_` followed by two lowercase hex digits.
pub fn sanitize_object_path_segment(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for &b in input.as_bytes() {
        if b.is_ascii_alphanumeric() {
            out.push(b as char);
        } else {
            write!(out, "_{b:02x}").expect("writing to a String cannot fail");
        }
    }
    out
}
