//! Request signing for the check-in API.
//!
//! The endpoint authenticates the body with a keyed MD5 over the request
//! fields. The shape is validated byte-for-byte by the server, so every
//! step below is part of the external contract:
//!
//! 1. concatenate `key=value` pairs in field order with no separator,
//! 2. percent-decode that concatenation exactly once,
//! 3. append the fixed shared secret and MD5 the result (lowercase hex),
//! 4. body = `&key=value` pairs joined, plus `&sign=<hex>`, with exactly
//!    the first leading `&` removed.
//!
//! Any deviation (ordering, a second decode, a different secret) does not
//! fail locally; it surfaces later as an API-level rejection.

use std::collections::BTreeMap;

use md5::{Digest, Md5};
use percent_encoding::percent_decode_str;

/// Shared secret appended before hashing. Fixed by the mobile client the
/// endpoint was built for.
const SIGN_SECRET: &str = "tiebaclient!!!";

/// Builds the signed `application/x-www-form-urlencoded` body for `fields`.
///
/// `BTreeMap` iteration gives the stable ascending key order the signature
/// scheme expects. Pure function: same fields, same bytes.
#[must_use]
pub fn signed_form(fields: &BTreeMap<String, String>) -> String {
    let mut joined = String::new();
    for (key, value) in fields {
        joined.push_str(key);
        joined.push('=');
        joined.push_str(value);
    }

    // Decode once: values are stored percent-encoded in the field map, but
    // the digest is computed over their decoded form.
    let decoded = percent_decode_str(&joined).decode_utf8_lossy();
    let digest = Md5::digest(format!("{decoded}{SIGN_SECRET}").as_bytes());
    let sign = format!("{digest:x}");

    let mut body = String::new();
    for (key, value) in fields {
        body.push('&');
        body.push_str(key);
        body.push('=');
        body.push_str(value);
    }
    body.push_str("&sign=");
    body.push_str(&sign);

    match body.strip_prefix('&') {
        Some(stripped) => stripped.to_owned(),
        None => body,
    }
}
