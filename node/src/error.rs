use thiserror::Error;

#[derive(Debug, Error)]
pub enum NodeError {
    #[error("ledger error: {0}")]
    Ledger(#[from] token_ledger::LedgerError),

    #[error("config error: {0}")]
    Config(String),

    #[error("metrics error: {0}")]
    Metrics(#[from] prometheus::Error),

    #[error("ledger lock poisoned by a panicked invocation")]
    LockPoisoned,
}

impl NodeError {
    /// Failure category reported to callers.
    pub fn kind_str(&self) -> &'static str {
        match self {
            Self::Ledger(e) => e.kind().as_str(),
            Self::Config(_) => "Config",
            Self::Metrics(_) | Self::LockPoisoned => "Internal",
        }
    }
}
