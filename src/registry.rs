//! Per-test stub registry: function name → stubbed return values.
//!
//! An explicit owned instance, created per harness (or per test worker),
//! never a process-wide global. Values and argument tuples are
//! [`serde_json::Value`], compared structurally — same length, same order,
//! same types — so signature keys do not depend on any serialization
//! format.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::MockError;

/// Key a stub value is registered under: the signature-less default, or an
/// exact argument tuple.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub enum StubKey {
    Default,
    Exact(Vec<Value>),
}

/// All stub values registered for one function name.
///
/// At most one default entry; any number of signature entries. Signature
/// entries live in a vec and are matched by structural equality — the
/// entry count per function is tiny (a handful per test), so a linear
/// scan beats forcing an unstable encoding into a hash key.
#[derive(Debug, Clone, Default)]
pub struct StubEntries {
    default: Option<Value>,
    by_signature: Vec<(Vec<Value>, Value)>,
}

impl StubEntries {
    pub fn default_value(&self) -> Option<&Value> {
        self.default.as_ref()
    }

    pub fn signatures(&self) -> &[(Vec<Value>, Value)] {
        &self.by_signature
    }

    /// Snapshot of every entry as `(key, value)` pairs, default first.
    pub fn entries(&self) -> Vec<(StubKey, Value)> {
        let mut out = Vec::with_capacity(self.by_signature.len() + 1);
        if let Some(v) = &self.default {
            out.push((StubKey::Default, v.clone()));
        }
        for (args, v) in &self.by_signature {
            out.push((StubKey::Exact(args.clone()), v.clone()));
        }
        out
    }
}

/// Mapping function name → stub entries, with default-value fallback.
///
/// Lookup prefers an exact signature match over the default; a name with
/// no entries at all is an error, never a silent fallback — an un-stubbed
/// mocked function must fail loudly at call time.
#[derive(Debug, Clone, Default)]
pub struct StubRegistry {
    entries: HashMap<String, StubEntries>,
}

impl StubRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the default stub value for a function. Unconditional upsert.
    pub fn stub(&mut self, name: impl Into<String>, value: Value) {
        self.entries.entry(name.into()).or_default().default = Some(value);
    }

    /// Set a stub value for an exact argument tuple. Unconditional upsert:
    /// a structurally equal signature replaces its previous value in place.
    pub fn stub_for(&mut self, name: impl Into<String>, args: Vec<Value>, value: Value) {
        let entry = self.entries.entry(name.into()).or_default();
        match entry.by_signature.iter_mut().find(|(sig, _)| *sig == args) {
            Some((_, existing)) => *existing = value,
            None => entry.by_signature.push((args, value)),
        }
    }

    /// Look up the stub value for a call.
    ///
    /// `args = None` means a zero-argument invocation: only the default
    /// entry applies. With `Some(args)`, an exact signature match wins,
    /// then the default. No applicable entry fails with
    /// [`MockError::MissingStub`].
    pub fn stubbed_value(&self, name: &str, args: Option<&[Value]>) -> Result<Value, MockError> {
        let entry = self
            .entries
            .get(name)
            .ok_or_else(|| MockError::missing_stub(name))?;

        if let Some(args) = args {
            if let Some((_, value)) = entry.by_signature.iter().find(|(sig, _)| sig == args) {
                return Ok(value.clone());
            }
        }

        entry
            .default
            .clone()
            .ok_or_else(|| MockError::missing_stub(name))
    }

    /// Discard every entry. Full-replace, so no per-signature state can
    /// leak across resets; subsequent lookups fail until re-stubbed.
    pub fn reset(&mut self) {
        self.entries = HashMap::new();
    }

    /// Introspection: all registered names and their entries. No side
    /// effects.
    pub fn list_stubbed(&self) -> &HashMap<String, StubEntries> {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// ─── Tests ───────────────────────────────────────────────────────────

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;
