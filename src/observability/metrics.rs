use prometheus::{IntCounter, Registry};
use tracing::{info, warn};

use crate::utils::constants::METRICS_NAMESPACE;

lazy_static::lazy_static! {
    static ref METRICS_INSTANCE: Option<Metrics> = Metrics::new()
        .inspect(|_| info!("Initializing Metrics ..."))
        .inspect_err(|e| warn!("metrics disabled: {}", e))
        .ok();
}

/// Process-wide metrics, `None` if the registry could not be built.
pub fn get_metrics() -> Option<&'static Metrics> {
    METRICS_INSTANCE.as_ref()
}

#[derive(Clone)]
pub struct Metrics {
    pub registry: Registry,

    // Token manager
    pub tokens_generated: IntCounter,
    pub tokens_reused: IntCounter,
    pub signing_failures: IntCounter,
}

impl Metrics {
    fn new() -> prometheus::Result<Self> {
        let registry = Registry::new_custom(Some(METRICS_NAMESPACE.into()), None)?;

        let metrics = Self {
            tokens_generated: IntCounter::new("tokens_generated_total", "Provider tokens signed")?,
            tokens_reused: IntCounter::new(
                "tokens_reused_total",
                "Cached provider tokens handed out",
            )?,
            signing_failures: IntCounter::new(
                "signing_failures_total",
                "Token generation attempts that failed to sign",
            )?,
            registry,
        };

        let reg = &metrics.registry;
        reg.register(Box::new(metrics.tokens_generated.clone()))?;
        reg.register(Box::new(metrics.tokens_reused.clone()))?;
        reg.register(Box::new(metrics.signing_failures.clone()))?;

        Ok(metrics)
    }

    /// Text exposition of everything in the registry.
    pub fn render(&self) -> String {
        let encoder = prometheus::TextEncoder::new();
        encoder
            .encode_to_string(&self.registry.gather())
            .unwrap_or_default()
    }
}

pub fn record_generated() {
    if let Some(m) = get_metrics() {
        m.tokens_generated.inc();
    }
}

pub fn record_reused() {
    if let Some(m) = get_metrics() {
        m.tokens_reused.inc();
    }
}

pub fn record_signing_failure() {
    if let Some(m) = get_metrics() {
        m.signing_failures.inc();
    }
}
