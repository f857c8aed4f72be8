//! Character-set boundary for text payloads
//!
//! Text never travels through the codec as `String`; it is transcoded at
//! the edges using a charset identified by label ("GBK", "UTF-8", ...).
//! Label resolution follows the WHATWG registry via `encoding_rs`. An
//! unknown or empty label turns the surrounding operation into a silent
//! no-op, matching the crate-wide degrade policy.

use encoding_rs::Encoding;

/// Label used by the convenience methods that take no charset argument.
/// GBK is the house encoding of the vehicle protocols this crate grew up
/// alongside.
pub const DEFAULT_CHARSET: &str = "GBK";

/// Encode text under the labeled charset. `None` when the label is
/// unknown.
pub fn encode(text: &str, label: &str) -> Option<Vec<u8>> {
    let encoding = Encoding::for_label(label.as_bytes())?;
    let (bytes, _, _) = encoding.encode(text);
    Some(bytes.into_owned())
}

/// Decode bytes under the labeled charset. `None` when the label is
/// unknown.
pub fn decode(bytes: &[u8], label: &str) -> Option<String> {
    let encoding = Encoding::for_label(label.as_bytes())?;
    let (text, _, _) = encoding.decode(bytes);
    Some(text.into_owned())
}
