//! Mock synthesis: forwarding callables for not-yet-defined functions.
//!
//! A compiled target cannot define a global function at runtime, so the
//! generated callables live in an explicit dispatch table ([`MockSet`])
//! that code under test resolves free calls through. Synthesis populates
//! the table; each callable forwards its invocation to the stub registry
//! and propagates `MissingStub` unchanged.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use serde_json::Value;
use tracing::{debug, info};

use crate::classify::{find_call_sites, needing_mocks};
use crate::error::MockError;
use crate::lexer::tokenize_source;
use crate::oracle::{DefinitionOracle, ScannedDefinitions};
use crate::registry::StubRegistry;
use crate::{load_sources, CallCandidate};

/// A synthesized callable: takes the registry and the call's arguments,
/// returns the stubbed value.
type MockFn = Box<dyn Fn(&StubRegistry, &[Value]) -> Result<Value, MockError>>;

fn forwarding_shim(name: String) -> MockFn {
    Box::new(move |registry, args| {
        let signature = if args.is_empty() { None } else { Some(args) };
        registry.stubbed_value(&name, signature)
    })
}

// ─── Mock set ────────────────────────────────────────────────────────

/// Dispatch table of synthesized callables, keyed by function name.
///
/// A name is registered at most once per set lifetime and never removed;
/// resetting the registry does not unregister mocks. Batch synthesis
/// skips names that already exist (as real implementations or as mocks);
/// a direct [`register`](MockSet::register) collision is an error.
#[derive(Default)]
pub struct MockSet {
    mocks: BTreeMap<String, MockFn>,
}

impl MockSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a forwarding mock for `name`.
    ///
    /// Errors with [`MockError::DuplicateMock`] if the name already has
    /// one — redefinition is a programming error, surfaced rather than
    /// silently replacing the existing callable.
    pub fn register(&mut self, name: impl Into<String>) -> Result<(), MockError> {
        let name = name.into();
        if self.mocks.contains_key(&name) {
            return Err(MockError::DuplicateMock { name });
        }
        let shim = forwarding_shim(name.clone());
        self.mocks.insert(name, shim);
        Ok(())
    }

    /// Synthesize mocks for every name not already callable.
    ///
    /// Names the oracle knows (real implementations) and names already in
    /// the set are skipped silently, making repeated synthesis over the
    /// same sources an idempotent no-op. Returns the number of mocks
    /// newly registered.
    pub fn synthesize<O, I, S>(&mut self, names: I, oracle: &O) -> usize
    where
        O: DefinitionOracle + ?Sized,
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut registered = 0usize;
        for name in names {
            let name = name.into();
            if oracle.is_defined(&name) {
                debug!(name = %name, "skipping synthesis: already defined");
                continue;
            }
            if self.mocks.contains_key(&name) {
                debug!(name = %name, "skipping synthesis: mock already registered");
                continue;
            }
            let shim = forwarding_shim(name.clone());
            self.mocks.insert(name, shim);
            registered += 1;
        }
        if registered > 0 {
            info!(registered, total = self.mocks.len(), "synthesized mock functions");
        }
        registered
    }

    /// Invoke a synthesized mock by name, resolving through `registry`.
    ///
    /// A zero-argument call consults only the default stub entry; calls
    /// with arguments prefer an exact signature match. `MissingStub`
    /// propagates unchanged; an unsynthesized name is [`MockError::UnknownMock`].
    pub fn call(
        &self,
        registry: &StubRegistry,
        name: &str,
        args: &[Value],
    ) -> Result<Value, MockError> {
        let shim = self
            .mocks
            .get(name)
            .ok_or_else(|| MockError::UnknownMock { name: name.to_string() })?;
        shim(registry, args)
    }

    #[must_use]
    pub fn is_registered(&self, name: &str) -> bool {
        self.mocks.contains_key(name)
    }

    /// Registered names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.mocks.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.mocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mocks.is_empty()
    }

    /// Render the synthesized shims as PHP-style source text.
    ///
    /// Diagnostic only — nothing evaluates this. It shows, per mock, the
    /// definition the dispatch table stands in for.
    #[must_use]
    pub fn definition_text(&self) -> String {
        let mut out = String::new();
        for name in self.mocks.keys() {
            out.push_str(&format!(
                "function {name}() {{ return funcmock_stubbed_value('{name}'); }}\n"
            ));
        }
        out
    }
}

impl std::fmt::Debug for MockSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockSet")
            .field("names", &self.mocks.keys().collect::<Vec<_>>())
            .finish()
    }
}

// ─── Harness ─────────────────────────────────────────────────────────

/// The full pipeline bundled for test use: load → tokenize → classify →
/// filter → synthesize, with the registry and mock set owned as one
/// explicit value.
///
/// One harness per test worker; there is no shared or global state, so
/// parallel test runners get isolation for free. State persists across
/// test cases within a worker unless [`reset_stubs`](Self::reset_stubs)
/// is called — resetting stubs between tests is the caller's job.
///
/// # Examples
///
/// ```
/// use funcmock::MockHarness;
/// use serde_json::json;
///
/// let mut harness = MockHarness::from_source("function f() { helper(); }", []);
/// assert!(harness.needed().contains("helper"));
///
/// harness.stub("helper", json!(42));
/// assert_eq!(harness.call("helper", &[]).unwrap(), json!(42));
/// ```
pub struct MockHarness {
    registry: StubRegistry,
    mocks: MockSet,
    oracle: ScannedDefinitions,
    candidates: Vec<CallCandidate>,
    needed: BTreeSet<String>,
}

impl MockHarness {
    /// Build a harness from source files on disk.
    ///
    /// `ambient` lists names callable in the embedding environment beyond
    /// the scanned sources (host builtins, prelude libraries); they are
    /// treated as defined and never mocked.
    pub fn from_files<P: AsRef<Path>>(
        paths: &[P],
        ambient: impl IntoIterator<Item = String>,
    ) -> Result<Self, MockError> {
        let source = load_sources(paths)?;
        Ok(Self::from_source(&source, ambient))
    }

    /// Build a harness from already-loaded source text.
    pub fn from_source(source: &str, ambient: impl IntoIterator<Item = String>) -> Self {
        let tokens = tokenize_source(source);
        let candidates = find_call_sites(&tokens);
        let oracle = ScannedDefinitions::from_tokens(&tokens).with_ambient(ambient);
        let needed = needing_mocks(&candidates, &oracle);

        let mut mocks = MockSet::new();
        mocks.synthesize(needed.iter().cloned(), &oracle);

        info!(
            candidates = candidates.len(),
            defined = oracle.names().len(),
            mocked = mocks.len(),
            "mock harness ready"
        );

        Self { registry: StubRegistry::new(), mocks, oracle, candidates, needed }
    }

    /// Set the default stub value for a mocked function.
    pub fn stub(&mut self, name: impl Into<String>, value: Value) {
        self.registry.stub(name, value);
    }

    /// Set a stub value for an exact argument tuple.
    pub fn stub_for(&mut self, name: impl Into<String>, args: Vec<Value>, value: Value) {
        self.registry.stub_for(name, args, value);
    }

    /// Invoke a mocked function. This is the seam code under test calls
    /// free functions through.
    pub fn call(&self, name: &str, args: &[Value]) -> Result<Value, MockError> {
        self.mocks.call(&self.registry, name, args)
    }

    /// Clear all stub values. Mock registrations persist — only the
    /// values behind them go away.
    pub fn reset_stubs(&mut self) {
        self.registry.reset();
    }

    /// Names that needed a mock, deduplicated and sorted.
    pub fn needed(&self) -> &BTreeSet<String> {
        &self.needed
    }

    /// Every call-site occurrence found, in stream order with duplicates.
    pub fn candidates(&self) -> &[CallCandidate] {
        &self.candidates
    }

    pub fn oracle(&self) -> &ScannedDefinitions {
        &self.oracle
    }

    pub fn registry(&self) -> &StubRegistry {
        &self.registry
    }

    pub fn mocks(&self) -> &MockSet {
        &self.mocks
    }

    /// PHP-style rendering of the synthesized shims (diagnostic).
    #[must_use]
    pub fn definition_text(&self) -> String {
        self.mocks.definition_text()
    }
}

// ─── Tests ───────────────────────────────────────────────────────────
