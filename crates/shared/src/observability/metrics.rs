//! Prometheus 指标模块
//!
//! 基于 metrics crate 和 metrics-exporter-prometheus 实现指标收集与导出。
//! 指标通过独立的 HTTP 端口暴露，供 Prometheus 抓取。

use anyhow::Result;
use axum::{Router, routing::get};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tracing::{error, info};

use super::ObservabilityConfig;

/// Metrics 资源守卫
pub struct MetricsHandle {
    _server_handle: tokio::task::JoinHandle<()>,
}

/// 初始化 Prometheus 指标导出
///
/// 启动一个独立的 HTTP 服务器在指定端口暴露 `/metrics` 端点。
pub async fn init(config: &ObservabilityConfig) -> Result<MetricsHandle> {
    let handle = PrometheusBuilder::new().install_recorder()?;

    register_common_metrics(&config.service_name);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.metrics_port));
    let server_handle = start_metrics_server(addr, handle).await?;

    Ok(MetricsHandle {
        _server_handle: server_handle,
    })
}

/// 注册通用指标描述
///
/// 描述会出现在 /metrics 端点的 HELP 注释中
fn register_common_metrics(service_name: &str) {
    metrics::describe_counter!("http_requests_total", "Total number of HTTP requests");
    metrics::describe_histogram!(
        "http_request_duration_seconds",
        "HTTP request duration in seconds"
    );

    metrics::describe_counter!(
        "enquiries_submitted_total",
        "Total number of art class enquiries submitted, by outcome"
    );
    metrics::describe_histogram!(
        "enquiry_matched_artists",
        "Number of artists matched per accepted enquiry"
    );
    metrics::describe_counter!(
        "contact_reveals_total",
        "Total number of contact reveal attempts, by result"
    );
    metrics::describe_counter!(
        "enquiries_expired_total",
        "Total number of enquiries lazily transitioned to expired"
    );
    metrics::describe_counter!(
        "exhibitions_created_total",
        "Total number of exhibitions submitted, by tier"
    );
    metrics::describe_counter!(
        "exhibition_fees_total",
        "Sum of exhibition fees quoted at creation, by tier"
    );

    metrics::counter!("service_starts_total", "service" => service_name.to_string()).increment(1);
}

/// 启动指标 HTTP 服务器
async fn start_metrics_server(
    addr: SocketAddr,
    handle: PrometheusHandle,
) -> Result<tokio::task::JoinHandle<()>> {
    let app = Router::new()
        .route("/metrics", get(move || std::future::ready(handle.render())))
        .route("/health", get(|| async { "OK" }));

    let listener = TcpListener::bind(addr).await?;
    info!("Metrics server listening on {}", addr);

    let server_handle = tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            error!("Metrics server error: {}", e);
        }
    });

    Ok(server_handle)
}

// ============================================================================
// 便捷的指标记录函数
// ============================================================================

/// 记录 HTTP 请求
#[inline]
pub fn record_http_request(method: &str, path: &str, status: u16, duration_secs: f64) {
    let status_str = status.to_string();
    metrics::counter!(
        "http_requests_total",
        "method" => method.to_string(),
        "path" => path.to_string(),
        "status" => status_str.clone()
    )
    .increment(1);

    metrics::histogram!(
        "http_request_duration_seconds",
        "method" => method.to_string(),
        "path" => path.to_string(),
        "status" => status_str
    )
    .record(duration_secs);
}

/// 记录咨询提交结果
///
/// `outcome` 取值：matched / pending / rate_limited / invalid
#[inline]
pub fn record_enquiry_submission(outcome: &str, matched_count: usize) {
    metrics::counter!(
        "enquiries_submitted_total",
        "status" => outcome.to_string()
    )
    .increment(1);

    if outcome == "matched" || outcome == "pending" {
        metrics::histogram!("enquiry_matched_artists").record(matched_count as f64);
    }
}

/// 记录联系方式揭示结果
#[inline]
pub fn record_contact_reveal(result: &str) {
    metrics::counter!(
        "contact_reveals_total",
        "result" => result.to_string()
    )
    .increment(1);
}

/// 记录咨询过期
#[inline]
pub fn record_enquiry_expired() {
    metrics::counter!("enquiries_expired_total").increment(1);
}

/// 记录展览创建
#[inline]
pub fn record_exhibition_created(tier: &str, total_fee: i64) {
    metrics::counter!(
        "exhibitions_created_total",
        "tier" => tier.to_string()
    )
    .increment(1);

    metrics::counter!(
        "exhibition_fees_total",
        "tier" => tier.to_string()
    )
    .increment(total_fee.max(0) as u64);
}
