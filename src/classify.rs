//! Call-site classification over a token stream.
//!
//! A single linear pass with whitespace-skipping look-around decides, for
//! every identifier followed by `(`, whether the occurrence is a genuine
//! free-function call. The decision is a flat table over the category of
//! the nearest preceding non-whitespace token — auditable in isolation
//! from any tokenizer.

use std::collections::BTreeSet;

use tracing::debug;

use crate::oracle::DefinitionOracle;
use crate::{CallCandidate, Token, TokenKind};

// ─── Decision table ──────────────────────────────────────────────────

/// Category of the token preceding a would-be call site.
///
/// Every `TokenKind` maps into exactly one of these; the classifier's
/// verdict depends on nothing else about the left context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrecedingCategory {
    /// Start of stream — no non-whitespace token exists to the left.
    Boundary,
    /// The `function` keyword: this identifier names a declaration.
    DefinitionKeyword,
    /// `->`: method invocation on an object.
    MemberAccess,
    /// `::`: static or otherwise scoped invocation.
    ScopeResolution,
    /// `new`: object instantiation.
    ConstructionKeyword,
    /// Anything else.
    Other,
}

impl PrecedingCategory {
    /// Categorize a look-back result. `None` is the stream boundary.
    #[must_use]
    pub fn of(token: Option<&Token>) -> Self {
        match token.map(|t| t.kind) {
            None => Self::Boundary,
            Some(TokenKind::FunctionKeyword) => Self::DefinitionKeyword,
            Some(TokenKind::MemberAccess) => Self::MemberAccess,
            Some(TokenKind::ScopeResolution) => Self::ScopeResolution,
            Some(TokenKind::NewKeyword) => Self::ConstructionKeyword,
            Some(_) => Self::Other,
        }
    }
}

/// The flat verdict table: is `name(` with this left context a call?
///
/// The boundary case is excluded: an identifier opening the stream has no
/// usable context, and a truncated stream should never widen the mock set.
#[must_use]
pub fn is_call_context(category: PrecedingCategory) -> bool {
    match category {
        PrecedingCategory::Boundary => false,
        PrecedingCategory::DefinitionKeyword => false,
        PrecedingCategory::MemberAccess => false,
        PrecedingCategory::ScopeResolution => false,
        PrecedingCategory::ConstructionKeyword => false,
        PrecedingCategory::Other => true,
    }
}

// ─── Look-around ─────────────────────────────────────────────────────

/// Nearest non-whitespace token strictly after `i`, or `None` at stream end.
fn next_non_whitespace(tokens: &[Token], i: usize) -> Option<&Token> {
    tokens[i + 1..].iter().find(|t| t.kind != TokenKind::Whitespace)
}

/// Nearest non-whitespace token strictly before `i`, or `None` at stream start.
fn prev_non_whitespace(tokens: &[Token], i: usize) -> Option<&Token> {
    tokens[..i].iter().rev().find(|t| t.kind != TokenKind::Whitespace)
}

// ─── Classifier ──────────────────────────────────────────────────────

/// Walk the token stream and emit every free-function call occurrence.
///
/// Output is in stream order and keeps duplicates; deduplication belongs
/// to consumers with set semantics. The scan never backtracks and never
/// mutates its input.
#[must_use]
pub fn find_call_sites(tokens: &[Token]) -> Vec<CallCandidate> {
    let mut candidates = Vec::new();

    for (i, token) in tokens.iter().enumerate() {
        if token.kind != TokenKind::Identifier {
            continue;
        }

        // An argument list must open immediately (whitespace aside).
        match next_non_whitespace(tokens, i) {
            Some(next) if next.kind == TokenKind::OpenParen => {}
            _ => continue,
        }

        let category = PrecedingCategory::of(prev_non_whitespace(tokens, i));
        if is_call_context(category) {
            candidates.push(CallCandidate {
                name: token.text.clone(),
                token_index: i,
            });
        }
    }

    debug!(candidates = candidates.len(), tokens = tokens.len(), "classified call sites");
    candidates
}

/// Collect the names declared with the `function` keyword in the stream.
///
/// The dual of [`find_call_sites`]: an identifier whose preceding
/// non-whitespace token is `function` names a definition. Used to seed the
/// definition oracle so the scanned files' own functions are never mocked.
#[must_use]
pub fn scan_definitions(tokens: &[Token]) -> BTreeSet<String> {
    let mut defined = BTreeSet::new();

    for (i, token) in tokens.iter().enumerate() {
        if token.kind != TokenKind::Identifier {
            continue;
        }
        if prev_non_whitespace(tokens, i).is_some_and(|t| t.kind == TokenKind::FunctionKeyword) {
            defined.insert(token.text.clone());
        }
    }

    defined
}

// ─── Existence filter ────────────────────────────────────────────────

/// Deduplicate candidates and keep only names with no implementation.
///
/// `BTreeSet` output gives deterministic iteration for reports and tests;
/// order carries no meaning downstream.
pub fn needing_mocks<O: DefinitionOracle + ?Sized>(
    candidates: &[CallCandidate],
    oracle: &O,
) -> BTreeSet<String> {
    let names: BTreeSet<String> = candidates.iter().map(|c| c.name.clone()).collect();
    let needed: BTreeSet<String> = names
        .into_iter()
        .filter(|name| !oracle.is_defined(name))
        .collect();

    debug!(needed = needed.len(), "filtered candidates against definition oracle");
    needed
}

// ─── Tests ───────────────────────────────────────────────────────────

#[cfg(test)]
#[path = "classify_tests.rs"]
mod tests;
