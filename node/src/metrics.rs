//! Prometheus metrics for the ledger host.
//!
//! The [`NodeMetrics`] struct owns a dedicated [`Registry`]; [`NodeMetrics::encode`]
//! renders it in the Prometheus text exposition format.

use prometheus::{
    register_histogram_with_registry, register_int_counter_vec_with_registry,
    register_int_gauge_with_registry, Encoder, Histogram, HistogramOpts, IntCounterVec, IntGauge,
    Opts, Registry, TextEncoder,
};

use token_ledger::LedgerEvent;

/// Central collection of all host-level Prometheus metrics.
pub struct NodeMetrics {
    /// The Prometheus registry that owns every metric below.
    pub registry: Registry,

    // ── Counters ────────────────────────────────────────────────────────
    /// Invocations by operation name (unknown names are counted as "unknown").
    pub invocations: IntCounterVec,
    /// Failed invocations by operation name and failure kind.
    pub failures: IntCounterVec,
    /// Successful invocations of state-changing operations, by operation name.
    pub state_changes: IntCounterVec,

    // ── Gauges ──────────────────────────────────────────────────────────
    /// Current number of existing accounts.
    pub account_count: IntGauge,

    // ── Histograms ──────────────────────────────────────────────────────
    /// Time spent inside the ledger lock per invocation, in microseconds.
    pub invoke_time_us: Histogram,
}

impl NodeMetrics {
    /// Create a fresh set of metrics, all registered under a new [`Registry`].
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let invocations = register_int_counter_vec_with_registry!(
            Opts::new("token_invocations_total", "Total ledger invocations"),
            &["operation"],
            registry
        )?;

        let failures = register_int_counter_vec_with_registry!(
            Opts::new("token_failures_total", "Total failed ledger invocations"),
            &["operation", "kind"],
            registry
        )?;

        let state_changes = register_int_counter_vec_with_registry!(
            Opts::new(
                "token_state_changes_total",
                "Total committed state-changing invocations"
            ),
            &["operation"],
            registry
        )?;

        let account_count = register_int_gauge_with_registry!(
            Opts::new("token_account_count", "Current number of accounts"),
            registry
        )?;

        // Exponential buckets covering 1 µs → ~16 ms.
        let invoke_time_us = register_histogram_with_registry!(
            HistogramOpts::new(
                "token_invoke_time_us",
                "Ledger invocation time in microseconds"
            )
            .buckets(prometheus::exponential_buckets(1.0, 2.0, 15)?),
            registry
        )?;

        Ok(Self {
            registry,
            invocations,
            failures,
            state_changes,
            account_count,
            invoke_time_us,
        })
    }

    /// Track the account gauge from committed events.
    pub fn observe_event(&self, event: &LedgerEvent) {
        match event {
            LedgerEvent::Initialized { issuer, .. } => {
                self.account_count.set(i64::from(issuer.is_some()));
            }
            LedgerEvent::AccountCreated { .. } => self.account_count.inc(),
            LedgerEvent::Transfer { .. } | LedgerEvent::Approval { .. } => {}
        }
    }

    /// Render every metric in the Prometheus text format.
    pub fn encode(&self) -> Result<String, prometheus::Error> {
        let mut buf = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buf)?;
        String::from_utf8(buf).map_err(|e| prometheus::Error::Msg(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use token_types::{AccountId, TokenAmount};

    #[test]
    fn account_gauge_follows_events() {
        let metrics = NodeMetrics::new().unwrap();
        metrics.observe_event(&LedgerEvent::Initialized {
            total_supply: TokenAmount::new(10),
            issuer: Some(AccountId::new("issuer")),
        });
        assert_eq!(metrics.account_count.get(), 1);

        metrics.observe_event(&LedgerEvent::AccountCreated {
            account: AccountId::new("alice"),
        });
        assert_eq!(metrics.account_count.get(), 2);

        metrics.observe_event(&LedgerEvent::Initialized {
            total_supply: TokenAmount::new(10),
            issuer: None,
        });
        assert_eq!(metrics.account_count.get(), 0);
    }

    #[test]
    fn encode_includes_labelled_counters() {
        let metrics = NodeMetrics::new().unwrap();
        metrics.invocations.with_label_values(&["transfer"]).inc();
        metrics
            .failures
            .with_label_values(&["transfer", "NotFound"])
            .inc();
        let text = metrics.encode().unwrap();
        assert!(text.contains("token_invocations_total{operation=\"transfer\"} 1"));
        assert!(text.contains("token_failures_total{kind=\"NotFound\",operation=\"transfer\"} 1"));
    }
}
