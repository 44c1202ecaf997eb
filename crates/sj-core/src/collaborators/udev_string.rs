//! `decode_udev_string`: unescapes `\xHH` sequences, grounded on
//! `original_source/src/udisksdaemonutil.c:udisks_decode_udev_string`.

/// Replaces every `\xHH` escape with the byte `0xHH`. If the escaped/raw
/// bytes assembled this way are not valid UTF-8, the result is truncated at
/// the first invalid UTF-8 boundary (mirroring udisks' `g_utf8_validate` +
/// `g_strndup` fallback).
///
/// A malformed escape (a trailing `\`, or `\x` not followed by two more
/// bytes) stops decoding at that point, discarding the remainder of the
/// input — matching udisks' `break` out of its scan loop.
pub fn decode_udev_string(input: &str) -> String {
    let bytes = input.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut n = 0;

    while n < bytes.len() {
        if bytes[n] == b'\\' {
            let has_escape = n + 3 < bytes.len()
                && bytes[n + 1] == b'x'
                && (bytes[n + 2] as char).is_ascii_hexdigit()
                && (bytes[n + 3] as char).is_ascii_hexdigit();
            if !has_escape {
                break;
            }
            let hi = (bytes[n + 2] as char).to_digit(16).unwrap();
            let lo = (bytes[n + 3] as char).to_digit(16).unwrap();
            out.push(((hi << 4) | lo) as u8);
            n += 4;
        } else {
            out.push(bytes[n]);
            n += 1;
        }
    }

    match String::from_utf8(out) {
        Ok(s) => s,
        Err(e) => {
            let valid_up_to = e.utf8_error().valid_up_to();
            let mut bytes = e.into_bytes();
            bytes.truncate(valid_up_to);
            String::from_utf8(bytes).expect("valid_up_to guarantees a valid UTF-8 prefix")
        }
    }
}
