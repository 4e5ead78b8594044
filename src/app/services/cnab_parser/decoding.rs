//! Byte decoding and line handling for return files
//!
//! Candidates are tried in configured order and the first successful decode
//! wins. Latin-1 maps every byte to a character, so it only fails to apply when
//! it is left out of the candidate list. Outputs are re-encoded with the same
//! encoding, UTF-8 byte order mark and line terminator so fixed-width positions
//! survive a round trip. A file that mixes terminators is written back with the
//! terminator of its first line.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::{debug, warn};

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Supported text encodings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TextEncoding {
    #[serde(rename = "utf-8")]
    Utf8,
    #[serde(rename = "latin-1")]
    Latin1,
}

impl TextEncoding {
    /// Decode bytes, `None` when they are not valid in this encoding
    pub fn decode(&self, bytes: &[u8]) -> Option<String> {
        match self {
            TextEncoding::Utf8 => {
                let text = std::str::from_utf8(bytes).ok()?;
                Some(text.strip_prefix('\u{feff}').unwrap_or(text).to_string())
            }
            TextEncoding::Latin1 => Some(bytes.iter().map(|&b| b as char).collect()),
        }
    }

    /// Encode text, failing on characters the encoding cannot represent
    pub fn encode(&self, text: &str) -> Result<Vec<u8>> {
        match self {
            TextEncoding::Utf8 => Ok(text.as_bytes().to_vec()),
            TextEncoding::Latin1 => text
                .chars()
                .map(|c| {
                    u8::try_from(u32::from(c)).map_err(|_| {
                        Error::decode(
                            "output",
                            format!("character '{}' cannot be encoded as Latin-1", c),
                        )
                    })
                })
                .collect(),
        }
    }
}

impl fmt::Display for TextEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TextEncoding::Utf8 => f.write_str("utf-8"),
            TextEncoding::Latin1 => f.write_str("latin-1"),
        }
    }
}

impl FromStr for TextEncoding {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "utf-8" | "utf8" => Ok(TextEncoding::Utf8),
            "latin-1" | "latin1" | "iso-8859-1" | "iso8859-1" => Ok(TextEncoding::Latin1),
            other => Err(Error::configuration(format!(
                "Unsupported encoding '{}'",
                other
            ))),
        }
    }
}

/// Line terminator used by a file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineEnding {
    Lf,
    CrLf,
}

impl LineEnding {
    pub fn as_str(&self) -> &'static str {
        match self {
            LineEnding::Lf => "\n",
            LineEnding::CrLf => "\r\n",
        }
    }
}

/// A decoded return file split into lines without terminators
#[derive(Debug, Clone)]
pub struct DecodedFile {
    pub lines: Vec<String>,
    pub encoding: TextEncoding,
    pub line_ending: LineEnding,
    /// Whether the last line was terminated
    pub trailing_newline: bool,
    /// Whether the input started with a UTF-8 byte order mark
    pub byte_order_mark: bool,
}

impl DecodedFile {
    /// Render lines with this file's terminator and encoding
    pub fn render(&self, lines: &[String]) -> Result<Vec<u8>> {
        let ending = self.line_ending.as_str();
        let mut text = lines.join(ending);
        if self.trailing_newline && !lines.is_empty() {
            text.push_str(ending);
        }
        let encoded = self.encoding.encode(&text)?;
        if self.byte_order_mark {
            let mut bytes = UTF8_BOM.to_vec();
            bytes.extend(encoded);
            Ok(bytes)
        } else {
            Ok(encoded)
        }
    }
}

/// Decode file bytes with the first encoding that succeeds
pub fn decode_file(bytes: &[u8], candidates: &[TextEncoding], file: &str) -> Result<DecodedFile> {
    let (encoding, text) = candidates
        .iter()
        .find_map(|encoding| encoding.decode(bytes).map(|text| (*encoding, text)))
        .ok_or_else(|| {
            Error::decode(
                file,
                format!(
                    "none of the encodings [{}] could decode the content",
                    candidates
                        .iter()
                        .map(|e| e.to_string())
                        .collect::<Vec<_>>()
                        .join(", ")
                ),
            )
        })?;

    let line_ending = detect_line_ending(&text);
    let mixed = match line_ending {
        LineEnding::Lf => text.contains("\r\n"),
        LineEnding::CrLf => text.replace("\r\n", "").contains('\n'),
    };
    if mixed {
        warn!(
            "{} mixes line terminators; outputs use {:?} throughout",
            file, line_ending
        );
    }
    let byte_order_mark = encoding == TextEncoding::Utf8 && bytes.starts_with(UTF8_BOM);
    let trailing_newline = text.ends_with('\n');
    let lines: Vec<String> = text.lines().map(str::to_string).collect();

    debug!(
        "Decoded {} as {} ({} lines, {:?} endings)",
        file,
        encoding,
        lines.len(),
        line_ending
    );

    Ok(DecodedFile {
        lines,
        encoding,
        line_ending,
        trailing_newline,
        byte_order_mark,
    })
}

/// Terminator of the first line, LF when the text has no line break
fn detect_line_ending(text: &str) -> LineEnding {
    match text.find('\n') {
        Some(index) if text[..index].ends_with('\r') => LineEnding::CrLf,
        _ => LineEnding::Lf,
    }
}
