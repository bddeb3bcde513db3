//! AI client metrics collection.
//!
//! Provides standardized metrics for monitoring upstream AI requests:
//! - Request counters by endpoint and status
//! - Latency histograms

use metrics::{counter, histogram};

// =============================================================================
// Metric Names
// =============================================================================

/// Metric name constants for consistency.
pub mod names {
    /// Total AI requests by endpoint and status.
    pub const REQUESTS_TOTAL: &str = "ai_requests_total";

    /// Request latency in seconds by endpoint.
    pub const LATENCY_SECONDS: &str = "ai_request_latency_seconds";
}

/// Endpoint label for chat completions.
pub const ENDPOINT_CHAT: &str = "chat_completions";
/// Endpoint label for image generation.
pub const ENDPOINT_IMAGES: &str = "image_generations";

// =============================================================================
// Recording Functions
// =============================================================================

/// Record metrics for a completed request.
///
/// `status` is the HTTP status, or 0 when no response was received.
pub fn record_request(endpoint: &'static str, status: u16, latency_ms: f64) {
    counter!(
        names::REQUESTS_TOTAL,
        "endpoint" => endpoint,
        "status" => status.to_string()
    )
    .increment(1);

    histogram!(
        names::LATENCY_SECONDS,
        "endpoint" => endpoint
    )
    .record(latency_ms / 1000.0);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metric_names() {
        assert!(names::REQUESTS_TOTAL.contains("requests"));
        assert!(names::LATENCY_SECONDS.contains("latency"));
    }

    #[test]
    fn test_record_without_recorder_is_noop() {
        record_request(ENDPOINT_CHAT, 200, 12.5);
        record_request(ENDPOINT_IMAGES, 0, 0.0);
    }
}
