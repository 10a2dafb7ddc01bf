//! Cookie header lookup
//!
//! The move service checks a CSRF token sent in a header against the one in
//! the session's cookies, so the client reads the token back out of the
//! cookie header it was configured with.

use percent_encoding::percent_decode_str;

/// Value of cookie `name` in a `Cookie` header string, percent-decoded.
///
/// Everything after the first `=` is the value; `+`, `&` and further `=`
/// are kept as they are. Invalid UTF-8 after decoding is replaced.
///
/// ```
/// use stockzero_client::networking::cookies::get_cookie;
///
/// let header = "sessionid=abc; csrftoken=tok%3D1";
/// assert_eq!(get_cookie(header, "csrftoken").as_deref(), Some("tok=1"));
/// assert_eq!(get_cookie(header, "missing"), None);
/// ```
pub fn get_cookie(header: &str, name: &str) -> Option<String> {
    header.split(';').map(str::trim).find_map(|pair| {
        let value = pair.strip_prefix(name)?.strip_prefix('=')?;
        Some(percent_decode_str(value).decode_utf8_lossy().into_owned())
    })
}
