//! Prometheus metrics collection and exposition endpoint.

use std::sync::OnceLock;

use prometheus::{
    Encoder, HistogramOpts, HistogramVec, IntCounterVec, IntGauge, Opts, Registry, TextEncoder,
    core::Collector,
};
use salvo::{
    Request, Response, handler,
    http::{
        StatusCode,
        header::{CONTENT_TYPE, HeaderValue},
    },
};
use settle::payments::PaymentMode;
use tracing::error;

#[derive(Debug)]
struct Metrics {
    registry: Registry,
    requests_total: IntCounterVec,
    request_duration_seconds: HistogramVec,
    requests_in_flight: IntGauge,
    checkouts_total: IntCounterVec,
    reversals_total: IntCounterVec,
    gateway_callbacks_total: IntCounterVec,
}

static METRICS: OnceLock<Option<Metrics>> = OnceLock::new();

/// Which reversal an order went through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ReversalKind {
    OrderCanceled,
    ItemCanceled,
    ItemReturned,
}

impl ReversalKind {
    fn as_str(self) -> &'static str {
        match self {
            Self::OrderCanceled => "order_canceled",
            Self::ItemCanceled => "item_canceled",
            Self::ItemReturned => "item_returned",
        }
    }
}

/// How a gateway callback was handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum CallbackMetric {
    Applied,
    Duplicate,
    Rejected,
}

impl CallbackMetric {
    fn as_str(self) -> &'static str {
        match self {
            Self::Applied => "applied",
            Self::Duplicate => "duplicate",
            Self::Rejected => "rejected",
        }
    }
}

#[derive(Debug)]
pub(super) struct InFlightRequestGuard {
    tracked: bool,
}

impl InFlightRequestGuard {
    pub(super) fn track() -> Self {
        if let Some(metrics) = metrics() {
            metrics.requests_in_flight.inc();
            return Self { tracked: true };
        }

        Self { tracked: false }
    }
}

impl Drop for InFlightRequestGuard {
    fn drop(&mut self) {
        if self.tracked
            && let Some(metrics) = metrics()
        {
            metrics.requests_in_flight.dec();
        }
    }
}

pub(super) fn observe_request(method: &str, route: &str, status_code: u16, duration_seconds: f64) {
    let Some(metrics) = metrics() else {
        return;
    };

    let status_class = status_class(status_code);
    let status_code = status_code.to_string();

    metrics
        .requests_total
        .with_label_values(&[method, route, status_class, status_code.as_str()])
        .inc();

    metrics
        .request_duration_seconds
        .with_label_values(&[method, route])
        .observe(duration_seconds);
}

/// Count a placed order.
pub(crate) fn record_checkout(mode: PaymentMode) {
    if let Some(metrics) = metrics() {
        metrics
            .checkouts_total
            .with_label_values(&[mode.as_str()])
            .inc();
    }
}

/// Count a cancellation or return.
pub(crate) fn record_reversal(kind: ReversalKind) {
    if let Some(metrics) = metrics() {
        metrics
            .reversals_total
            .with_label_values(&[kind.as_str()])
            .inc();
    }
}

/// Count a gateway callback by outcome.
pub(crate) fn record_callback(outcome: CallbackMetric) {
    if let Some(metrics) = metrics() {
        metrics
            .gateway_callbacks_total
            .with_label_values(&[outcome.as_str()])
            .inc();
    }
}

#[handler]
pub(crate) async fn metrics_handler(_req: &mut Request, res: &mut Response) {
    let Some(metrics) = metrics() else {
        res.status_code(StatusCode::INTERNAL_SERVER_ERROR);
        return;
    };

    let encoder = TextEncoder::new();
    let metric_families = metrics.registry.gather();

    let mut encoded = Vec::new();

    if let Err(source) = encoder.encode(&metric_families, &mut encoded) {
        error!("failed to encode metrics response: {source}");
        res.status_code(StatusCode::INTERNAL_SERVER_ERROR);

        return;
    }

    let content_type = match HeaderValue::from_str(encoder.format_type()) {
        Ok(value) => value,
        Err(source) => {
            error!("failed to encode metrics content type header: {source}");
            res.status_code(StatusCode::INTERNAL_SERVER_ERROR);

            return;
        }
    };

    res.headers_mut().insert(CONTENT_TYPE, content_type);
    res.render(String::from_utf8_lossy(&encoded).into_owned());
}

fn metrics() -> Option<&'static Metrics> {
    METRICS.get_or_init(build_metrics).as_ref()
}

fn register<M>(registry: &Registry, name: &str, metric: prometheus::Result<M>) -> Option<M>
where
    M: Collector + Clone + 'static,
{
    let metric = match metric {
        Ok(metric) => metric,
        Err(source) => {
            error!("failed to create {name} metric: {source}");
            return None;
        }
    };

    if let Err(source) = registry.register(Box::new(metric.clone())) {
        error!("failed to register {name} metric: {source}");
        return None;
    }

    Some(metric)
}

fn build_metrics() -> Option<Metrics> {
    let registry = Registry::new();

    let requests_total = register(
        &registry,
        "requests_total",
        IntCounterVec::new(
            Opts::new(
                "settle_json_http_requests_total",
                "Total HTTP requests partitioned by method, route, status class, and status code.",
            ),
            &["method", "route", "status_class", "status_code"],
        ),
    )?;

    let request_duration_seconds = register(
        &registry,
        "request_duration",
        HistogramVec::new(
            HistogramOpts::new(
                "settle_json_http_request_duration_seconds",
                "HTTP request duration in seconds partitioned by method and route.",
            )
            .buckets(vec![
                0.001, 0.0025, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0,
            ]),
            &["method", "route"],
        ),
    )?;

    let requests_in_flight = register(
        &registry,
        "in-flight gauge",
        IntGauge::with_opts(Opts::new(
            "settle_json_http_requests_in_flight",
            "Current number of in-flight HTTP requests.",
        )),
    )?;

    let checkouts_total = register(
        &registry,
        "checkouts_total",
        IntCounterVec::new(
            Opts::new(
                "settle_checkouts_total",
                "Orders placed, partitioned by payment mode.",
            ),
            &["payment_mode"],
        ),
    )?;

    let reversals_total = register(
        &registry,
        "reversals_total",
        IntCounterVec::new(
            Opts::new(
                "settle_reversals_total",
                "Order cancellations and item returns, partitioned by kind.",
            ),
            &["kind"],
        ),
    )?;

    let gateway_callbacks_total = register(
        &registry,
        "gateway_callbacks_total",
        IntCounterVec::new(
            Opts::new(
                "settle_gateway_callbacks_total",
                "Gateway payment callbacks, partitioned by outcome.",
            ),
            &["outcome"],
        ),
    )?;

    Some(Metrics {
        registry,
        requests_total,
        request_duration_seconds,
        requests_in_flight,
        checkouts_total,
        reversals_total,
        gateway_callbacks_total,
    })
}

fn status_class(status_code: u16) -> &'static str {
    match status_code {
        100..=199 => "1xx",
        200..=299 => "2xx",
        300..=399 => "3xx",
        400..=499 => "4xx",
        500..=599 => "5xx",
        _ => "other",
    }
}

#[cfg(test)]
mod tests {
    use salvo::{
        Router, Service,
        test::{ResponseExt, TestClient},
    };

    use super::*;

    #[tokio::test]
    async fn metrics_endpoint_exposes_http_and_settlement_metrics() {
        observe_request("GET", "/orders", 200, 0.042);
        observe_request("POST", "/checkout", 409, 0.123);
        record_checkout(PaymentMode::Wallet);
        record_reversal(ReversalKind::ItemReturned);
        record_callback(CallbackMetric::Duplicate);

        let service =
            Service::new(Router::new().push(Router::with_path("metrics").get(metrics_handler)));

        let response = TestClient::get("http://example.com/metrics")
            .send(&service)
            .await
            .take_string()
            .await
            .unwrap_or_default();

        for expected in [
            "settle_json_http_requests_total",
            "settle_json_http_request_duration_seconds",
            "settle_json_http_requests_in_flight",
            "settle_checkouts_total{payment_mode=\"wallet\"}",
            "settle_reversals_total{kind=\"item_returned\"}",
            "settle_gateway_callbacks_total{outcome=\"duplicate\"}",
        ] {
            assert!(
                response.contains(expected),
                "expected {expected} in metrics response"
            );
        }
    }

    #[test]
    fn status_codes_group_by_class() {
        assert_eq!(status_class(201), "2xx");
        assert_eq!(status_class(409), "4xx");
        assert_eq!(status_class(502), "5xx");
        assert_eq!(status_class(42), "other");
    }
}
