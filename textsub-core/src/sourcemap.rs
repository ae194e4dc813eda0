// textsub-core/src/sourcemap.rs
//! Provides the position-mapping artifact produced by rewrite engines when a
//! caller requests one, in the standard source map v3 JSON shape with
//! base64-VLQ encoded mappings.

use serde::{Deserialize, Serialize};

const BASE64_CHARS: &[u8; 64] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+/";

/// A source map v3 document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceMap {
    pub version: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    pub sources: Vec<String>,
    pub sources_content: Vec<String>,
    pub names: Vec<String>,
    pub mappings: String,
}

impl SourceMap {
    /// Builds an identity-biased map over `text`, keyed by `key`.
    ///
    /// Every output line maps to the same line of the recorded source, which
    /// is the text itself. This is the naive artifact shape: it says nothing
    /// about positions moved by earlier substitutions.
    pub fn identity_for(key: &str, text: &str) -> Self {
        Self {
            version: 3,
            file: None,
            sources: vec![key.to_string()],
            sources_content: vec![text.to_string()],
            names: Vec::new(),
            mappings: identity_mappings(text),
        }
    }

    /// Serializes the map to its JSON document form.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

/// Encodes one signed value as base64 VLQ, appending to `out`.
fn encode_vlq(value: i64, out: &mut String) {
    let mut vlq: u64 = if value < 0 {
        (((-value) as u64) << 1) | 1
    } else {
        (value as u64) << 1
    };
    loop {
        let mut digit = (vlq & 0b11111) as usize;
        vlq >>= 5;
        if vlq > 0 {
            digit |= 0b100000;
        }
        out.push(BASE64_CHARS[digit] as char);
        if vlq == 0 {
            break;
        }
    }
}

/// One `[generated column, source index, source line, source column]` segment
/// per line, all zeros except the running source line. Fields are deltas
/// against the previous segment, per the mappings grammar.
fn identity_mappings(text: &str) -> String {
    let mut mappings = String::new();
    let mut previous_source_line: i64 = 0;
    for (line, _) in text.split('\n').enumerate() {
        let line = line as i64;
        if line > 0 {
            mappings.push(';');
        }
        encode_vlq(0, &mut mappings);
        encode_vlq(0, &mut mappings);
        encode_vlq(line - previous_source_line, &mut mappings);
        encode_vlq(0, &mut mappings);
        previous_source_line = line;
    }
    mappings
}
