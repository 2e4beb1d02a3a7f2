//! The ledger host: one ledger behind one lock.

use std::sync::Mutex;
use std::time::Instant;

use tracing::{debug, info, warn};

use token_ledger::{ErrorKind, LedgerEvent, LedgerSnapshot, LedgerState, OperationKind, Receipt};
use token_store::KvStore;

use crate::ledger_event::EventBus;
use crate::metrics::NodeMetrics;
use crate::tracing_spans::invoke_span;
use crate::{NodeConfig, NodeError};

/// Serializes invocations against a single [`LedgerState`].
///
/// Every invocation holds the lock across its precondition reads and its
/// commit, so concurrent callers observe some sequential order of calls and
/// no update is lost. Events are emitted and metrics recorded under the same
/// lock.
pub struct LedgerHost<S> {
    ledger: Mutex<LedgerState<S>>,
    events: EventBus,
    metrics: NodeMetrics,
}

impl<S: KvStore> LedgerHost<S> {
    /// Build a host over `store` and initialize the ledger from `config`.
    pub fn new(store: S, config: &NodeConfig) -> Result<Self, NodeError> {
        let genesis = config.genesis()?;
        let host = Self {
            ledger: Mutex::new(LedgerState::new(store, genesis)),
            events: EventBus::new(),
            metrics: NodeMetrics::new()?,
        };
        let receipt = host.invoke::<&str>(OperationKind::Init.name(), &[])?;
        info!(
            total_supply = config.total_supply,
            issuer = config.issuer.as_deref().unwrap_or("none"),
            events = receipt.events.len(),
            "ledger host initialized"
        );
        Ok(host)
    }

    /// Register an event listener. Only possible before the host is shared.
    pub fn subscribe(&mut self, listener: Box<dyn Fn(&LedgerEvent) + Send + Sync>) {
        self.events.subscribe(listener);
    }

    /// Execute one named operation with positional string arguments.
    pub fn invoke<A: AsRef<str>>(&self, name: &str, args: &[A]) -> Result<Receipt, NodeError> {
        let _span = invoke_span(name, args.len()).entered();
        let operation = OperationKind::from_name(name);
        let label = operation.map_or("unknown", |k| k.name());
        self.metrics.invocations.with_label_values(&[label]).inc();

        let mut ledger = self.ledger.lock().map_err(|_| NodeError::LockPoisoned)?;
        let started = Instant::now();
        let result = ledger.invoke(name, args);
        self.metrics
            .invoke_time_us
            .observe(started.elapsed().as_secs_f64() * 1_000_000.0);

        match result {
            Ok(receipt) => {
                if operation.is_some_and(|k| k.is_mutating()) {
                    self.metrics.state_changes.with_label_values(&[label]).inc();
                }
                for event in &receipt.events {
                    self.metrics.observe_event(event);
                    self.events.emit(event);
                }
                debug!(payload_len = receipt.payload.len(), "invocation succeeded");
                Ok(receipt)
            }
            Err(e) => {
                let kind = e.kind();
                self.metrics
                    .failures
                    .with_label_values(&[label, kind.as_str()])
                    .inc();
                if kind == ErrorKind::Storage {
                    warn!(error = %e, "invocation failed in storage");
                } else {
                    debug!(error = %e, kind = %kind, "invocation rejected");
                }
                Err(e.into())
            }
        }
    }

    /// Capture the whole ledger under the lock.
    pub fn snapshot(&self) -> Result<LedgerSnapshot, NodeError> {
        let ledger = self.ledger.lock().map_err(|_| NodeError::LockPoisoned)?;
        Ok(ledger.snapshot()?)
    }

    pub fn metrics(&self) -> &NodeMetrics {
        &self.metrics
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use token_nullables::NullStore;

    fn config_with_issuer() -> NodeConfig {
        NodeConfig {
            total_supply: 1_000,
            issuer: Some("issuer".into()),
            ..NodeConfig::default()
        }
    }

    #[test]
    fn new_initializes_ledger() {
        let host = LedgerHost::new(NullStore::new(), &config_with_issuer()).unwrap();
        let receipt = host.invoke("balanceOf", &["issuer"]).unwrap();
        assert_eq!(receipt.as_amount().map(|a| a.raw()), Some(1_000));
        assert_eq!(host.metrics().account_count.get(), 1);
    }

    #[test]
    fn failures_are_counted_by_kind() {
        let host = LedgerHost::new(NullStore::new(), &config_with_issuer()).unwrap();
        assert!(host.invoke("balanceOf", &["ghost"]).is_err());
        assert!(host.invoke::<&str>("burn", &[]).is_err());

        let failures = &host.metrics().failures;
        assert_eq!(failures.with_label_values(&["balanceOf", "NotFound"]).get(), 1);
        assert_eq!(failures.with_label_values(&["unknown", "UnknownOperation"]).get(), 1);
    }

    #[test]
    fn only_successful_writes_count_as_state_changes() {
        let host = LedgerHost::new(NullStore::new(), &config_with_issuer()).unwrap();
        host.invoke("approve", &["alice", "issuer", "5"]).unwrap();
        host.invoke("balanceOf", &["alice"]).unwrap();
        host.invoke::<&str>("totalSupply", &[]).unwrap();
        assert!(host.invoke("transfer", &["alice", "issuer", "1"]).is_err());

        let changes = &host.metrics().state_changes;
        assert_eq!(changes.with_label_values(&["init"]).get(), 1);
        assert_eq!(changes.with_label_values(&["approve"]).get(), 1);
        assert_eq!(changes.with_label_values(&["transfer"]).get(), 0);
        assert_eq!(changes.with_label_values(&["balanceOf"]).get(), 0);
    }

    #[test]
    fn ledger_errors_keep_their_kind() {
        let host = LedgerHost::new(NullStore::new(), &config_with_issuer()).unwrap();
        let err = host.invoke("transfer", &["issuer", "ghost", "1"]).unwrap_err();
        assert_eq!(err.kind_str(), "NotFound");
    }

    #[test]
    fn listeners_see_committed_events() {
        let seen = Arc::new(AtomicUsize::new(0));
        let mut host = LedgerHost::new(NullStore::new(), &config_with_issuer()).unwrap();
        let s = Arc::clone(&seen);
        host.subscribe(Box::new(move |_| {
            s.fetch_add(1, Ordering::SeqCst);
        }));

        // AccountCreated + Approval
        host.invoke("approve", &["alice", "issuer", "5"]).unwrap();
        // Rejected: no events.
        let _ = host.invoke("transfer", &["alice", "issuer", "1"]);
        assert_eq!(seen.load(Ordering::SeqCst), 2);
        assert_eq!(host.metrics().account_count.get(), 2);
    }

    #[test]
    fn invalid_issuer_fails_construction() {
        let config = NodeConfig {
            issuer: Some(String::new()),
            ..NodeConfig::default()
        };
        assert!(matches!(
            LedgerHost::new(NullStore::new(), &config),
            Err(NodeError::Config(_))
        ));
    }
}
