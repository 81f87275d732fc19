//! # funcmock — Call-Site Detection and Function Mocking
//!
//! Token-based call-site classifier and mock-function synthesizer for
//! PHP-style source. Finds free-function calls whose targets have no
//! implementation yet, and synthesizes forwarding callables for them so
//! tests can control each one through a stub registry.
//!
//! ## Library usage
//!
//! The typical flow is the one [`mock::MockHarness`] bundles:
//! load sources → tokenize → classify call sites → filter by the
//! definition oracle → synthesize mocks → stub values per test.
//!
//! Each stage is also usable on its own: [`lexer::tokenize_source`]
//! produces the token stream, [`classify::find_call_sites`] walks it,
//! [`registry::StubRegistry`] holds per-test stub values.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

pub mod classify;
pub mod error;
pub mod lexer;
pub mod mock;
pub mod oracle;
pub mod registry;

pub use classify::{find_call_sites, needing_mocks, scan_definitions};
pub use error::MockError;
pub use lexer::tokenize_source;
pub use mock::{MockHarness, MockSet};
pub use oracle::DefinitionOracle;
pub use registry::{StubKey, StubRegistry};

// ─── Token schema ────────────────────────────────────────────────────

/// Syntactic category of a source token.
///
/// This is the stable schema the classifier is written against. Only the
/// kinds the decision table inspects are distinguished; everything else
/// collapses into [`TokenKind::Symbol`]. Whitespace is preserved as its own
/// kind because the classifier's look-around skips exactly whitespace and
/// nothing else — a comment between an identifier and `(` breaks the
/// call-site shape.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// Bare name: candidate function call, definition name, or constant.
    Identifier,
    /// Run of whitespace (spaces, tabs, newlines). One token per run.
    Whitespace,
    /// `(`
    OpenParen,
    /// `)`
    CloseParen,
    /// The `function` keyword (case-insensitive, as in PHP).
    FunctionKeyword,
    /// `->` member access.
    MemberAccess,
    /// `::` scope resolution.
    ScopeResolution,
    /// The `new` keyword (case-insensitive).
    NewKeyword,
    /// `$name` variable.
    Variable,
    /// Complete single- or double-quoted string literal, quotes included.
    StringLiteral,
    /// Integer or float literal.
    Number,
    /// Complete `//`, `#`, or `/* */` comment, delimiters included.
    Comment,
    /// Any other punctuation or operator character(s).
    Symbol,
}

impl TokenKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Identifier => "identifier",
            Self::Whitespace => "whitespace",
            Self::OpenParen => "openParen",
            Self::CloseParen => "closeParen",
            Self::FunctionKeyword => "functionKeyword",
            Self::MemberAccess => "memberAccess",
            Self::ScopeResolution => "scopeResolution",
            Self::NewKeyword => "newKeyword",
            Self::Variable => "variable",
            Self::StringLiteral => "stringLiteral",
            Self::Number => "number",
            Self::Comment => "comment",
            Self::Symbol => "symbol",
        }
    }
}

impl std::fmt::Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single source token: kind, original text, and position in the stream.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    /// The token's offset in the stream it was produced into, so a
    /// [`CallCandidate`] can point back at the exact occurrence.
    pub index: usize,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>, index: usize) -> Self {
        Self { kind, text: text.into(), index }
    }
}

/// One classified call-site occurrence.
///
/// The classifier emits these in stream order, duplicates included — the
/// same name called twice is two candidates. Consumers that want set
/// semantics deduplicate (see [`classify::needing_mocks`]).
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct CallCandidate {
    /// Function name as it appears in source.
    pub name: String,
    /// Index of the identifier token in the scanned stream.
    pub token_index: usize,
}

// ─── Source loading ──────────────────────────────────────────────────

/// Strip the `\\?\` extended-length path prefix that Windows canonicalize adds.
#[must_use]
pub fn clean_path(p: &str) -> String {
    p.strip_prefix(r"\\?\").unwrap_or(p).to_string()
}

/// Read a file as a String, using lossy UTF-8 conversion for non-UTF8 files.
/// Returns `(content, was_lossy)` where `was_lossy` is true if replacement
/// characters were inserted. Legacy PHP modules are frequently Windows-1252
/// encoded (smart quotes in comments), so a hard UTF-8 requirement would
/// reject otherwise scannable sources.
pub fn read_file_lossy(path: &Path) -> std::io::Result<(String, bool)> {
    let raw = std::fs::read(path)?;
    match String::from_utf8(raw) {
        Ok(s) => Ok((s, false)),
        Err(e) => Ok((String::from_utf8_lossy(e.as_bytes()).into_owned(), true)),
    }
}

/// Load an ordered list of source files and concatenate their text.
///
/// Files are joined with a newline so a token can never span two files.
/// I/O errors propagate to the caller; recovery policy is not ours.
pub fn load_sources<P: AsRef<Path>>(paths: &[P]) -> Result<String, MockError> {
    let mut combined = String::new();
    for path in paths {
        let path = path.as_ref();
        let (content, was_lossy) = read_file_lossy(path)?;
        if was_lossy {
            warn!(path = %path.display(), "non-UTF8 source read with lossy conversion");
        }
        debug!(path = %path.display(), bytes = content.len(), "loaded source file");
        combined.push_str(&content);
        if !combined.ends_with('\n') {
            combined.push('\n');
        }
    }
    Ok(combined)
}

// ─── Tests ───────────────────────────────────────────────────────────
