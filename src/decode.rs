//! Recovers the HTML of the user page.
//!
//! The panel has served this page as plain HTML, as base64 HTML inside a JSON object,
//! as base64 assigned to `originBody` in an inline script,
//! and as base64 in a `data-clipboard` attribute.
//! The strategies below are tried in that order of likelihood,
//! and the raw body is used as-is when none of them produces HTML.

use base64::{
    alphabet,
    engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig},
    Engine,
};
use ikuuu_checkin_utils::regex;
use log::debug;

use crate::api::UserPage;

/// Decoded bytes count as HTML when `<` appears within this many leading bytes.
pub const HTML_PROBE_LEN: usize = 120;

const BASE64: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new()
        .with_decode_padding_mode(DecodePaddingMode::Indifferent)
        .with_decode_allow_trailing_bits(true),
);

type Strategy = fn(&UserPage) -> Option<String>;

const STRATEGIES: [(&str, Strategy); 4] = [
    ("json field", from_json_fields),
    ("originBody script", from_origin_body),
    ("clipboard attribute", from_clipboard_attribute),
    ("whole body", from_whole_body),
];

pub fn looks_like_html(bytes: &[u8]) -> bool {
    bytes.iter().take(HTML_PROBE_LEN).any(|&b| b == b'<')
}

/// Base64-decodes `payload` and keeps the result only if it looks like HTML.
/// Line wrapping and other ASCII whitespace inside the payload is ignored.
pub fn decode_html(payload: &str) -> Option<String> {
    let payload = payload
        .chars()
        .filter(|c| !c.is_ascii_whitespace())
        .collect::<String>();
    let bytes = BASE64.decode(payload).ok()?;
    looks_like_html(&bytes).then(|| String::from_utf8_lossy(&bytes).into_owned())
}

pub fn extract_html(page: &UserPage) -> String {
    for (name, strategy) in STRATEGIES {
        if let Some(html) = strategy(page) {
            debug!("Recovered user page HTML from {name}");
            return html;
        }
    }
    debug!("Using the user page body as-is");
    page.raw.clone()
}

fn from_json_fields(page: &UserPage) -> Option<String> {
    let serde_json::Value::Object(fields) = page.json.as_ref()? else {
        return None;
    };
    fields
        .values()
        .filter_map(|value| value.as_str())
        .filter(|value| !value.trim().is_empty())
        .find_map(decode_html)
}

fn from_origin_body(page: &UserPage) -> Option<String> {
    let captures = regex!(r#"originBody\s*=\s*["']([A-Za-z0-9+/=\n\r]+)["']"#).captures(&page.raw)?;
    decode_html(&captures[1])
}

fn from_clipboard_attribute(page: &UserPage) -> Option<String> {
    let captures =
        regex!(r#"data-clipboard(?:-text)?=["']([A-Za-z0-9+/=]+)["']"#).captures(&page.raw)?;
    decode_html(&captures[1])
}

fn from_whole_body(page: &UserPage) -> Option<String> {
    decode_html(&page.raw)
}
