//! Definition oracle: "does this name already have an implementation?"
//!
//! The filter between raw call candidates and the mock set. The runtime
//! truth lives wherever the sources were loaded; this trait is the seam
//! through which that truth is injected.

use std::collections::BTreeSet;

use crate::classify::scan_definitions;
use crate::Token;

/// Answers whether a function name is already callable, after all candidate
/// sources have been loaded. Names the oracle knows are never mocked.
pub trait DefinitionOracle {
    fn is_defined(&self, name: &str) -> bool;
}

/// Any predicate closure works as an oracle; handy in tests.
impl<F: Fn(&str) -> bool> DefinitionOracle for F {
    fn is_defined(&self, name: &str) -> bool {
        self(name)
    }
}

/// Oracle built from the scanned sources themselves, plus any ambient
/// names the embedding environment provides (host builtins, prelude
/// libraries). A `function foo()` declaration in the scanned files counts
/// as defined, so self-contained sources never get their own functions
/// mocked.
#[derive(Debug, Clone, Default)]
pub struct ScannedDefinitions {
    names: BTreeSet<String>,
}

impl ScannedDefinitions {
    /// Scan a token stream for `function` declarations.
    #[must_use]
    pub fn from_tokens(tokens: &[Token]) -> Self {
        Self { names: scan_definitions(tokens) }
    }

    /// Add ambient names that exist outside the scanned sources.
    #[must_use]
    pub fn with_ambient<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.names.extend(names.into_iter().map(Into::into));
        self
    }

    /// All names this oracle considers defined, in sorted order.
    pub fn names(&self) -> &BTreeSet<String> {
        &self.names
    }
}

impl DefinitionOracle for ScannedDefinitions {
    fn is_defined(&self, name: &str) -> bool {
        self.names.contains(name)
    }
}
