//! Key and value serializers.
//!
//! Each message key and value is typed into the form as text and turned into
//! wire bytes by the serde named in the connection settings. None of the
//! supported serdes transform the text: `json` is passed through unvalidated
//! (validation only happens through the explicit Format command) and unknown
//! names behave like `bytearray`.

use std::{fmt, string::FromUtf8Error};

/// Serde used for a message key or value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Serde {
    /// UTF-8 text.
    String,
    /// JSON document, sent as its UTF-8 text.
    Json,
    /// Raw bytes of the typed text.
    ByteArray,
}

impl Serde {
    /// Every serde name the form accepts without falling back.
    pub const NAMES: [&'static str; 3] = ["string", "json", "bytearray"];

    /// Resolve a serde name. Unrecognized names resolve to [`Serde::ByteArray`].
    pub fn from_name(name: &str) -> Self {
        match name.trim() {
            "string" => Self::String,
            "json" => Self::Json,
            _ => Self::ByteArray,
        }
    }

    /// Whether `name` is one of [`Serde::NAMES`].
    pub fn is_known(name: &str) -> bool {
        Self::NAMES.contains(&name.trim())
    }

    /// Canonical name.
    pub fn name(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Json => "json",
            Self::ByteArray => "bytearray",
        }
    }

    /// Encode form text into wire bytes.
    pub fn encode(self, text: &str) -> Vec<u8> {
        match self {
            Self::String | Self::Json | Self::ByteArray => text.as_bytes().to_vec(),
        }
    }

    /// Encode a message key. An empty key means "no key", not a zero-length
    /// key.
    pub fn encode_key(self, text: &str) -> Option<Vec<u8>> {
        if text.is_empty() { None } else { Some(self.encode(text)) }
    }

    /// Decode wire bytes back into text.
    pub fn decode(self, bytes: &[u8]) -> Result<String, FromUtf8Error> {
        String::from_utf8(bytes.to_vec())
    }
}

impl fmt::Display for Serde {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
