//! Prometheus counters for the conditions the event layer absorbs silently.
//!
//! Unresolved aliases and malformed JSON never surface as errors from the
//! accessors and mutators, so they are counted here instead. Enabled with the
//! `metrics` feature.

use once_cell::sync::Lazy;
use opentelemetry::metrics::{Counter, MeterProvider as _};
use opentelemetry_sdk::metrics::SdkMeterProvider;
use prometheus::{Encoder, Registry, TextEncoder};

pub static METRICS: Lazy<RowguardMetrics> = Lazy::new(RowguardMetrics::init);

pub struct RowguardMetrics {
    pub registry: Registry,
    // Owns the exporter; dropping it stops collection
    _provider: SdkMeterProvider,
    pub resolver_calls_total: Counter<u64>,
    pub unresolved_aliases_total: Counter<u64>,
    pub decode_failures_total: Counter<u64>,
}

impl RowguardMetrics {
    pub fn init() -> Self {
        let registry = Registry::new();
        let exporter = opentelemetry_prometheus::exporter()
            .with_registry(registry.clone())
            .build()
            .expect("failed to build prometheus exporter");
        let provider = SdkMeterProvider::builder()
            .with_reader(exporter)
            .build();
        let meter = provider.meter("rowguard");

        let resolver_calls_total = meter
            .u64_counter("rowguard_resolver_calls_total")
            .with_description("Schema resolver invocations")
            .build();

        let unresolved_aliases_total = meter
            .u64_counter("rowguard_unresolved_aliases_total")
            .with_description("Aliases that resolved to no table")
            .build();

        let decode_failures_total = meter
            .u64_counter("rowguard_json_decode_failures_total")
            .with_description("JSON payloads that failed to decode and were stored as null")
            .build();

        Self {
            registry,
            _provider: provider,
            resolver_calls_total,
            unresolved_aliases_total,
            decode_failures_total,
        }
    }

    pub fn record_resolution(&self, resolved: bool) {
        self.resolver_calls_total.add(1, &[]);
        if !resolved {
            self.unresolved_aliases_total.add(1, &[]);
        }
    }

    pub fn record_decode_failure(&self) {
        self.decode_failures_total.add(1, &[]);
    }

    /// Render the registry in the Prometheus text exposition format.
    pub fn encode(&self) -> String {
        let mut buf = Vec::new();
        if let Err(e) = TextEncoder::new().encode(&self.registry.gather(), &mut buf) {
            log::warn!("failed to encode metrics: {}", e);
        }
        String::from_utf8_lossy(&buf).into_owned()
    }
}
