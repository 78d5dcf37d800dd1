//! Content access
//!
//! Fetches raw bytes for a URI and parses them into a generic JSON tree.
//! Scheme dispatch: `resource:`/`classpath:` load from an embedded
//! resource namespace, `file:` and bare paths open the filesystem,
//! `http:`/`https:` fetch over the network. Every failure surfaces as a
//! single `ContentUnavailable` kind; there are no retries and no caching
//! here (the registry owns caching).

use include_dir::Dir;
use serde_json::Value;
use url::Url;

use crate::error::{GeneratorError, Result};

/// Fetches and parses schema content by URI.
///
/// The trait seam exists so tests and embedding applications can supply
/// content without touching the filesystem or network.
pub trait ContentResolver {
    fn resolve(&self, uri: &str) -> Result<Value>;
}

/// Default resolver with scheme dispatch.
pub struct DefaultContentResolver {
    /// Embedded resource namespace for `resource:`/`classpath:` URIs
    embedded: Option<&'static Dir<'static>>,
}

impl DefaultContentResolver {
    pub fn new() -> Self {
        Self { embedded: None }
    }

    /// Attach an embedded directory (via `include_dir!`) serving the
    /// `resource:` and `classpath:` schemes.
    pub fn with_embedded(embedded: &'static Dir<'static>) -> Self {
        Self {
            embedded: Some(embedded),
        }
    }

    fn read_embedded(&self, uri: &str, resource_path: &str) -> Result<String> {
        let dir = self.embedded.ok_or_else(|| {
            GeneratorError::unavailable(uri, "no embedded resource namespace configured")
        })?;
        let path = resource_path.trim_start_matches('/');
        let file = dir
            .get_file(path)
            .ok_or_else(|| GeneratorError::unavailable(uri, "no such embedded resource"))?;
        file.contents_utf8()
            .map(|s| s.to_string())
            .ok_or_else(|| GeneratorError::unavailable(uri, "embedded resource is not UTF-8"))
    }

    fn read_file(&self, uri: &str, url: &Url) -> Result<String> {
        let path = url
            .to_file_path()
            .map_err(|_| GeneratorError::unavailable(uri, "not a valid file path"))?;
        std::fs::read_to_string(&path)
            .map_err(|e| GeneratorError::unavailable(uri, e.to_string()))
    }

    fn read_http(&self, uri: &str) -> Result<String> {
        // Blocking fetch, no internal timeout; cancellation policy belongs
        // to the caller.
        let response = ureq::get(uri)
            .call()
            .map_err(|e| GeneratorError::unavailable(uri, e.to_string()))?;
        response
            .into_string()
            .map_err(|e| GeneratorError::unavailable(uri, e.to_string()))
    }
}

impl Default for DefaultContentResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl ContentResolver for DefaultContentResolver {
    fn resolve(&self, uri: &str) -> Result<Value> {
        let raw = match uri.split_once(':') {
            Some(("resource", rest)) | Some(("classpath", rest)) => {
                self.read_embedded(uri, rest)?
            }
            Some(("http", _)) | Some(("https", _)) => self.read_http(uri)?,
            Some(("file", _)) => {
                let url = Url::parse(uri)
                    .map_err(|e| GeneratorError::unavailable(uri, e.to_string()))?;
                self.read_file(uri, &url)?
            }
            _ => {
                // Bare path with no scheme
                std::fs::read_to_string(uri)
                    .map_err(|e| GeneratorError::unavailable(uri, e.to_string()))?
            }
        };

        parse_document(&raw).map_err(|e| GeneratorError::unavailable(uri, e.to_string()))
    }
}

/// Parse a schema document, tolerating `//`, `/* */` and `#` comments.
///
/// Numeric literals are preserved losslessly: serde_json is built with
/// arbitrary-precision numbers so default/example values round-trip.
pub fn parse_document(raw: &str) -> serde_json::Result<Value> {
    let stripped = strip_comments(raw);
    serde_json::from_str(&stripped)
}

/// Replace comments with spaces, leaving string literals untouched.
///
/// Byte offsets are preserved so parse errors still point at the
/// original location.
fn strip_comments(input: &str) -> String {
    let bytes = input.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'"' => {
                // String literal: copy through the closing quote
                out.push(bytes[i]);
                i += 1;
                while i < bytes.len() {
                    out.push(bytes[i]);
                    match bytes[i] {
                        b'\\' if i + 1 < bytes.len() => {
                            out.push(bytes[i + 1]);
                            i += 2;
                        }
                        b'"' => {
                            i += 1;
                            break;
                        }
                        _ => i += 1,
                    }
                }
            }
            b'/' if i + 1 < bytes.len() && bytes[i + 1] == b'/' => {
                while i < bytes.len() && bytes[i] != b'\n' {
                    out.push(b' ');
                    i += 1;
                }
            }
            b'/' if i + 1 < bytes.len() && bytes[i + 1] == b'*' => {
                out.extend_from_slice(b"  ");
                i += 2;
                while i < bytes.len() {
                    if bytes[i] == b'*' && i + 1 < bytes.len() && bytes[i + 1] == b'/' {
                        out.extend_from_slice(b"  ");
                        i += 2;
                        break;
                    }
                    out.push(if bytes[i] == b'\n' { b'\n' } else { b' ' });
                    i += 1;
                }
            }
            b'#' => {
                while i < bytes.len() && bytes[i] != b'\n' {
                    out.push(b' ');
                    i += 1;
                }
            }
            other => {
                out.push(other);
                i += 1;
            }
        }
    }

    // Input was valid UTF-8 and only ASCII bytes were replaced
    String::from_utf8(out).unwrap_or_else(|_| input.to_string())
}
