//! Callback-envelope handling for the search endpoint.
//!
//! Without `nojsoncallback=1` the endpoint wraps its JSON payload in
//! `jsonFlickrApi(...)`. The wrapper is a fixed 14-byte prefix and one
//! trailing byte; raw JSON bodies pass through untouched.

/// The callback prefix, 14 bytes.
const WRAPPER_PREFIX: &[u8] = b"jsonFlickrApi(";

/// The trailing byte closing the callback.
const WRAPPER_SUFFIX: u8 = b')';

/// Trims the callback wrapper from a response body when present.
///
/// Deterministic on the raw bytes: a body starting with the exact prefix
/// and ending with the closing byte is trimmed to the JSON payload
/// between them; anything else is returned unchanged.
#[must_use]
pub fn strip_envelope(body: &[u8]) -> &[u8] {
    if body.len() > WRAPPER_PREFIX.len()
        && body.starts_with(WRAPPER_PREFIX)
        && body.last() == Some(&WRAPPER_SUFFIX)
    {
        &body[WRAPPER_PREFIX.len()..body.len() - 1]
    } else {
        body
    }
}
