//! Prometheus metrics collection for pairpad.
//!
//! Tracks room and connection population, update throughput, broadcast
//! fan-out, and dropped/malformed message counts, exposed on an HTTP
//! endpoint for Prometheus scraping.

use prometheus::{
    Encoder, Histogram, HistogramOpts, IntCounter, IntGauge, IntGaugeVec, Opts, Registry,
    TextEncoder,
};
use std::sync::OnceLock;

/// Global Prometheus registry for all metrics.
pub static REGISTRY: OnceLock<Registry> = OnceLock::new();

pub fn registry() -> &'static Registry {
    REGISTRY.get_or_init(Registry::new)
}

// ========================================================================
// Counters (monotonic increasing)
// ========================================================================

/// Total document updates accepted across all rooms.
pub static UPDATES_TOTAL: OnceLock<IntCounter> = OnceLock::new();

/// Messages dropped because a member's outbound queue was full.
pub static MESSAGES_DROPPED: OnceLock<IntCounter> = OnceLock::new();

/// Inbound frames dropped as malformed.
pub static MALFORMED_MESSAGES: OnceLock<IntCounter> = OnceLock::new();

// ========================================================================
// Gauges (can increase/decrease)
// ========================================================================

/// Currently connected clients.
pub static CONNECTED_CLIENTS: OnceLock<IntGauge> = OnceLock::new();

/// Rooms currently registered.
pub static ACTIVE_ROOMS: OnceLock<IntGauge> = OnceLock::new();

/// Member counts per room (gauge).
pub static ROOM_MEMBERS: OnceLock<IntGaugeVec> = OnceLock::new();

/// Broadcast fan-out histogram: recipients per room broadcast.
pub static BROADCAST_FANOUT: OnceLock<Histogram> = OnceLock::new();

/// Initialize the Prometheus metrics registry.
///
/// Must be called once at server startup before any metrics are recorded.
pub fn init() {
    let r = registry();

    // Helper macro to register metric
    macro_rules! register {
        ($metric:ident, $init:expr) => {
            let m = $init.expect(concat!(stringify!($metric), " creation failed"));
            if let Err(e) = r.register(Box::new(m.clone())) {
                tracing::warn!(error = %e, concat!("Failed to register metric ", stringify!($metric)));
            }
            let _ = $metric.set(m);
        };
    }

    register!(
        UPDATES_TOTAL,
        IntCounter::new("pairpad_updates_total", "Document updates accepted")
    );
    register!(
        MESSAGES_DROPPED,
        IntCounter::new(
            "pairpad_messages_dropped_total",
            "Messages dropped due to backpressure"
        )
    );
    register!(
        MALFORMED_MESSAGES,
        IntCounter::new(
            "pairpad_malformed_messages_total",
            "Inbound frames dropped as malformed"
        )
    );
    register!(
        CONNECTED_CLIENTS,
        IntGauge::new("pairpad_connected_clients", "Currently connected clients")
    );
    register!(
        ACTIVE_ROOMS,
        IntGauge::new("pairpad_active_rooms", "Rooms currently registered")
    );
    register!(
        ROOM_MEMBERS,
        IntGaugeVec::new(
            Opts::new("pairpad_room_members", "Members per room"),
            &["room"]
        )
    );
    register!(
        BROADCAST_FANOUT,
        Histogram::with_opts(
            HistogramOpts::new("pairpad_broadcast_fanout", "Recipients per room broadcast")
                .buckets(vec![0.0, 1.0, 2.0, 5.0, 10.0, 25.0, 50.0, 100.0])
        )
    );
}

/// Gather all metrics and encode them in Prometheus text format.
pub fn gather_metrics() -> String {
    let encoder = TextEncoder::new();
    let metric_families = registry().gather();
    let mut buffer = vec![];
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        tracing::error!(error = %e, "Failed to encode Prometheus metrics");
        return String::new();
    }
    match String::from_utf8(buffer) {
        Ok(s) => s,
        Err(e) => {
            tracing::error!(error = %e, "Prometheus metrics were not valid UTF-8");
            String::new()
        }
    }
}

// ============================================================================
// Helper functions; all are no-ops before init() (tests do not init)
// ============================================================================

#[inline]
pub fn inc_active_rooms() {
    if let Some(g) = ACTIVE_ROOMS.get() {
        g.inc();
    }
}

#[inline]
pub fn dec_active_rooms() {
    if let Some(g) = ACTIVE_ROOMS.get() {
        g.dec();
    }
}

#[inline]
pub fn inc_connected_clients() {
    if let Some(g) = CONNECTED_CLIENTS.get() {
        g.inc();
    }
}

#[inline]
pub fn dec_connected_clients() {
    if let Some(g) = CONNECTED_CLIENTS.get() {
        g.dec();
    }
}

#[inline]
pub fn record_update() {
    if let Some(c) = UPDATES_TOTAL.get() {
        c.inc();
    }
}

#[inline]
pub fn record_dropped_message() {
    if let Some(c) = MESSAGES_DROPPED.get() {
        c.inc();
    }
}

#[inline]
pub fn record_malformed_message() {
    if let Some(c) = MALFORMED_MESSAGES.get() {
        c.inc();
    }
}

/// Update a room's member count gauge.
#[inline]
pub fn set_room_members(room: &str, count: i64) {
    if let Some(g) = ROOM_MEMBERS.get() {
        g.with_label_values(&[room]).set(count);
    }
}

/// Zero a room's member gauge when the room is torn down.
#[inline]
pub fn remove_room_metrics(room: &str) {
    if let Some(g) = ROOM_MEMBERS.get() {
        g.with_label_values(&[room]).set(0);
    }
}

/// Record broadcast fan-out (how many recipients received a room message).
#[inline]
pub fn record_fanout(recipients: usize) {
    if let Some(h) = BROADCAST_FANOUT.get() {
        h.observe(recipients as f64);
    }
}
