//! Comment stripping for source files
//!
//! Comments are located on the [`SourceTree`], so comment markers inside
//! string literals are left alone. A matching comment alone on its line removes
//! the whole line; a trailing one is cut off and the code before it keeps
//! its original line terminator.

use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::LazyLock;

use regex::bytes::Regex;

use super::ContentTransformer;
use super::syntax::SourceTree;
use crate::error::TransformError;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

static CODING_COOKIE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[ \t\x0c]*#.*?coding[:=][ \t]*([-\w.]+)").expect("valid coding regex")
});

/// Removes comments that start with a given prefix
#[derive(Debug, Clone)]
pub struct SourceCommentStripper {
    prefix: String,
}

impl SourceCommentStripper {
    /// Strip comments starting with `prefix` (`# ` or `# ¤` by default)
    #[must_use]
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    /// The prefix a comment must start with to be removed
    #[must_use]
    pub fn prefix(&self) -> &str {
        &self.prefix
    }
}

impl ContentTransformer for SourceCommentStripper {
    fn transform(&self, text: &str) -> String {
        let Some(tree) = SourceTree::parse(text) else {
            tracing::warn!("python grammar unavailable, leaving comments in place");
            return text.to_string();
        };
        let lines: Vec<&str> = text.split_inclusive('\n').collect();

        let mut drop_lines = HashSet::new();
        let mut cut_at = HashMap::new();
        for comment in tree.comments() {
            if !comment.text.starts_with(&self.prefix) {
                continue;
            }
            let Some(before) = lines
                .get(comment.line - 1)
                .and_then(|line| line.get(..comment.col))
            else {
                continue;
            };
            if before.trim().is_empty() {
                drop_lines.insert(comment.line);
            } else {
                cut_at.insert(comment.line, comment.col);
            }
        }

        let mut out = String::with_capacity(text.len());
        for (idx, line) in lines.iter().enumerate() {
            let number = idx + 1;
            if drop_lines.contains(&number) {
                continue;
            }
            match cut_at.get(&number) {
                Some(&col) => {
                    out.push_str(line[..col].trim_end());
                    out.push_str(line_terminator(line));
                }
                None => out.push_str(line),
            }
        }
        out
    }
}

fn line_terminator(line: &str) -> &'static str {
    if line.ends_with("\r\n") {
        "\r\n"
    } else if line.ends_with('\n') {
        "\n"
    } else {
        ""
    }
}

/// Decode source bytes, honouring a UTF-8 BOM and a coding declaration
///
/// The declaration is looked for on the first line, and on the second when
/// the first is blank or a comment. UTF-8 and ASCII declarations decode as
/// UTF-8, Latin-1 declarations byte for byte.
///
/// # Errors
///
/// Returns an error for undecodable content or an unsupported declaration.
pub fn decode_source(bytes: &[u8], path: &Path) -> Result<String, TransformError> {
    let (has_bom, body) = match bytes.strip_prefix(UTF8_BOM) {
        Some(rest) => (true, rest),
        None => (false, bytes),
    };

    let declared = declared_encoding(body);
    let encoding = match declared.as_deref() {
        None => SourceEncoding::Utf8,
        Some(name) => {
            // a BOM only agrees with a UTF-8 declaration
            let supported = SourceEncoding::from_name(name)
                .filter(|enc| !has_bom || *enc == SourceEncoding::Utf8);
            supported.ok_or_else(|| TransformError::UnsupportedEncoding {
                path: path.to_path_buf(),
                encoding: name.to_string(),
            })?
        }
    };

    match encoding {
        SourceEncoding::Utf8 => {
            String::from_utf8(body.to_vec()).map_err(|_| TransformError::Decode {
                path: path.to_path_buf(),
                encoding: "utf-8",
            })
        }
        SourceEncoding::Ascii => {
            if body.is_ascii() {
                Ok(String::from_utf8_lossy(body).into_owned())
            } else {
                Err(TransformError::Decode {
                    path: path.to_path_buf(),
                    encoding: "ascii",
                })
            }
        }
        SourceEncoding::Latin1 => Ok(body.iter().map(|&b| char::from(b)).collect()),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SourceEncoding {
    Utf8,
    Ascii,
    Latin1,
}

impl SourceEncoding {
    fn from_name(name: &str) -> Option<Self> {
        let norm = name.to_ascii_lowercase().replace('_', "-");
        match norm.as_str() {
            "utf-8" | "utf8" => Some(Self::Utf8),
            n if n.starts_with("utf-8-") => Some(Self::Utf8),
            "ascii" | "us-ascii" => Some(Self::Ascii),
            "latin-1" | "latin1" | "iso-8859-1" | "iso8859-1" | "iso-latin-1" | "l1" => {
                Some(Self::Latin1)
            }
            n if n.starts_with("latin-1-") || n.starts_with("iso-8859-1-") => Some(Self::Latin1),
            _ => None,
        }
    }
}

fn declared_encoding(body: &[u8]) -> Option<String> {
    let mut lines = body.split(|&b| b == b'\n');
    let first = lines.next()?;
    if let Some(name) = cookie(first) {
        return Some(name);
    }
    if !is_blank_or_comment(first) {
        return None;
    }
    lines.next().and_then(cookie)
}

fn cookie(line: &[u8]) -> Option<String> {
    CODING_COOKIE
        .captures(line)
        .and_then(|caps| caps.get(1))
        .map(|m| String::from_utf8_lossy(m.as_bytes()).into_owned())
}

fn is_blank_or_comment(line: &[u8]) -> bool {
    let trimmed = line
        .iter()
        .position(|b| !matches!(b, b' ' | b'\t' | b'\x0c' | b'\r'))
        .map_or(&[][..], |start| &line[start..]);
    trimmed.is_empty() || trimmed[0] == b'#'
}
