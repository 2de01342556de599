use prometheus::{Encoder, IntCounter, IntCounterVec, IntGauge, Opts, Registry, TextEncoder};
use std::{ops::Deref, sync::Arc};

#[derive(Clone)]
pub struct SharedMetrics {
    metrics: Arc<Metrics>,
}

impl SharedMetrics {
    pub fn new() -> Self {
        Self {
            metrics: Arc::new(Metrics::new()),
        }
    }
}

impl Default for SharedMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Deref for SharedMetrics {
    type Target = Metrics;

    fn deref(&self) -> &Self::Target {
        &self.metrics
    }
}

/// Counters for one client. Every client owns a private registry, so any
/// number of clients can live in the same process.
pub struct Metrics {
    registry: Registry,
    commands_sent: IntCounterVec,
    command_errors: IntCounter,
    reconnects: IntCounter,
    bytes_written: IntCounter,
    requests_in_flight: IntGauge,
}

impl Metrics {
    pub fn new() -> Self {
        let registry = Registry::new();

        let commands_sent = IntCounterVec::new(
            Opts::new(
                "redis_client_commands_sent",
                "Amount of times a particular command has been sent by this client",
            ),
            &["command"],
        )
        .expect("can create an int counter vec");

        let command_errors = IntCounter::new(
            "redis_client_command_errors",
            "Amount of commands that ended in an error, including server error replies",
        )
        .expect("can create an int counter");

        let reconnects = IntCounter::new(
            "redis_client_reconnects",
            "Amount of times the connection was reopened after being lost",
        )
        .expect("can create an int counter");

        let bytes_written = IntCounter::new(
            "redis_client_bytes_written",
            "Amount of request bytes written to the socket",
        )
        .expect("can create an int counter");

        let requests_in_flight = IntGauge::new(
            "redis_client_requests_in_flight",
            "Amount of requests written but not yet fully answered",
        )
        .expect("can create an int gauge");

        registry
            .register(Box::new(commands_sent.clone()))
            .expect("can register an int counter vec in the client registry");
        registry
            .register(Box::new(command_errors.clone()))
            .expect("can register an int counter in the client registry");
        registry
            .register(Box::new(reconnects.clone()))
            .expect("can register an int counter in the client registry");
        registry
            .register(Box::new(bytes_written.clone()))
            .expect("can register an int counter in the client registry");
        registry
            .register(Box::new(requests_in_flight.clone()))
            .expect("can register an int gauge in the client registry");

        Self {
            registry,
            commands_sent,
            command_errors,
            reconnects,
            bytes_written,
            requests_in_flight,
        }
    }

    pub fn command_sent(&self, command: &str) {
        self.commands_sent.with_label_values(&[command]).inc();
    }

    pub fn command_failed(&self) {
        self.command_errors.inc();
    }

    pub fn reconnected(&self) {
        self.reconnects.inc();
    }

    pub fn bytes_written(&self, amount: usize) {
        self.bytes_written.inc_by(amount as u64);
    }

    pub fn request_started(&self) {
        self.requests_in_flight.inc();
    }

    pub fn request_finished(&self) {
        self.requests_in_flight.dec();
    }

    pub fn commands_sent_total(&self, command: &str) -> u64 {
        self.commands_sent.with_label_values(&[command]).get()
    }

    pub fn command_errors_total(&self) -> u64 {
        self.command_errors.get()
    }

    pub fn reconnects_total(&self) -> u64 {
        self.reconnects.get()
    }

    pub fn in_flight(&self) -> i64 {
        self.requests_in_flight.get()
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Render all counters in the prometheus text exposition format
    pub fn encode_text(&self) -> prometheus::Result<String> {
        let mut buffer = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buffer)?;
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}
