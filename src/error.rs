//! Unified error type for detection, stubbing, and mock dispatch.

use thiserror::Error;

/// All errors that can occur while detecting call sites or driving mocks.
#[derive(Error, Debug)]
pub enum MockError {
    /// A mocked function was invoked before any stub value was set for it.
    /// The wording is a contract: test suites assert against this message.
    #[error("{name} has not been stubbed yet. Please call stub('{name}', <value>) to set one.")]
    MissingStub { name: String },

    /// A mock was registered directly for a name that already has one.
    /// Batch synthesis skips existing names; a direct collision is a
    /// programming error and is surfaced instead of overwriting.
    #[error("A mock for '{name}' is already registered and cannot be redefined")]
    DuplicateMock { name: String },

    /// Dispatch was attempted for a name no mock was ever synthesized for.
    #[error("No mock registered for '{name}'. Run synthesis over the sources that call it first")]
    UnknownMock { name: String },

    /// I/O error while loading source files.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid regex supplied to a CLI name filter.
    #[error("Invalid filter pattern '{pattern}': {source}")]
    InvalidFilter {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

impl MockError {
    /// Convenience constructor; `MissingStub` is built in several places.
    pub fn missing_stub(name: impl Into<String>) -> Self {
        Self::MissingStub { name: name.into() }
    }
}
