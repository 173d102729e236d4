//! Two-attempt text decoding: primary encoding first, then one fallback.

use encoding_rs::{Encoding, UTF_8};
use std::fs;
use std::io;
use std::path::Path;
use thiserror::Error;

/// Why a file's content could not be turned into text
#[derive(Debug, Error)]
pub enum ReadError {
    #[error("could not read file: {0}")]
    Io(#[from] io::Error),
    #[error("could not decode file as {primary} or {fallback}")]
    Undecodable {
        primary: &'static str,
        fallback: &'static str,
    },
}

#[derive(Debug, PartialEq, Eq)]
pub struct DecodedText {
    pub text: String,
    pub encoding: &'static Encoding,
}

impl DecodedText {
    pub fn used_fallback(&self, primary: &'static Encoding) -> bool {
        self.encoding != primary
    }
}

/// Read the whole file, then decode it with `primary`, retrying once with `fallback`.
pub fn read_text(
    path: &Path,
    primary: &'static Encoding,
    fallback: &'static Encoding,
) -> Result<DecodedText, ReadError> {
    let bytes = fs::read(path)?;
    decode_bytes(&bytes, primary, fallback)
}

pub fn decode_bytes(
    bytes: &[u8],
    primary: &'static Encoding,
    fallback: &'static Encoding,
) -> Result<DecodedText, ReadError> {
    for encoding in [primary, fallback] {
        // Strict decoding: any malformed or unmappable byte counts as failure
        let Some(text) = encoding.decode_without_bom_handling_and_without_replacement(bytes)
        else {
            continue;
        };
        if encoding != UTF_8 && text.chars().any(is_c1_control) {
            // Legacy code pages leave some bytes undefined and WHATWG maps
            // those to C1 controls instead of rejecting them.
            continue;
        }
        return Ok(DecodedText {
            text: text.into_owned(),
            encoding,
        });
    }
    Err(ReadError::Undecodable {
        primary: primary.name(),
        fallback: fallback.name(),
    })
}

fn is_c1_control(c: char) -> bool {
    ('\u{80}'..='\u{9f}').contains(&c)
}
