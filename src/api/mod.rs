use axum::{
    Router,
    extract::{Json, Query},
    http::{StatusCode, header},
    response::{Html, IntoResponse, Response},
    routing::get,
};
use chrono::Datelike;
use clap::Args;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use tokio::net::TcpListener;

use crate::core::{
    CurrencyFormatter, PercentUplift, Projection, RupiahFormatter, SimulationInput, compute,
};

const INDEX_HTML: &str = include_str!("../../web/index.html");
const STYLES_CSS: &str = include_str!("../../web/styles.css");
const APP_JS: &str = include_str!("../../web/app.js");

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct ComputePayload {
    start_year: Option<i32>,
    end_year: Option<i32>,
    initial_balance: Option<f64>,
    monthly_deposit: Option<f64>,
    yearly_interest: Option<f64>,
}

#[derive(Args, Debug, Clone, PartialEq)]
pub struct ProjectionArgs {
    #[arg(
        long,
        default_value_t = current_year(),
        help = "First year; the projection starts the year after"
    )]
    pub start_year: i32,
    #[arg(
        long,
        default_value_t = default_end_year(current_year()),
        help = "Last projected year; pulled up to start-year + 1 when not after it"
    )]
    pub end_year: i32,
    #[arg(long, default_value_t = 0.0, help = "Opening balance")]
    pub initial_balance: f64,
    #[arg(long, default_value_t = 10_000_000.0, help = "Deposit paid in every month")]
    pub monthly_deposit: f64,
    #[arg(
        long,
        default_value_t = 6.15,
        help = "Expected yearly return in percent, compounded monthly"
    )]
    pub yearly_interest: f64,
}

#[derive(Debug)]
struct ApiRequest {
    input: SimulationInput,
    requested_end_year: i32,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RowResponse {
    year: i32,
    balance: f64,
    balance_formatted: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SummaryResponse {
    no_interest_balance: f64,
    no_interest_balance_formatted: String,
    percent_uplift: PercentUplift,
    percent_uplift_label: String,
    monthly_withdrawal: f64,
    monthly_withdrawal_formatted: String,
    annual_withdrawal: f64,
    annual_withdrawal_formatted: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComputeResponse {
    start_year: i32,
    end_year: i32,
    end_year_clamped: bool,
    rows: Vec<RowResponse>,
    summary: SummaryResponse,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

pub fn current_year() -> i32 {
    chrono::Local::now().year()
}

/// The later of 2042 and ten years after `current_year`.
pub fn default_end_year(current_year: i32) -> i32 {
    current_year.saturating_add(10).max(2042)
}

pub fn build_input(args: &ProjectionArgs) -> SimulationInput {
    SimulationInput::new(
        args.start_year,
        args.end_year,
        args.initial_balance,
        args.monthly_deposit,
        args.yearly_interest,
    )
}

pub async fn run_http_server(port: u16) -> std::io::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let app = Router::new()
        .route("/", get(index_handler))
        .route("/index.html", get(index_handler))
        .route("/styles.css", get(styles_handler))
        .route("/app.js", get(app_js_handler))
        .route(
            "/api/compute",
            get(compute_get_handler).post(compute_post_handler),
        )
        .fallback(not_found_handler);

    let listener = TcpListener::bind(addr).await?;
    log::info!("bumuk HTTP API listening on http://{addr}");
    log::info!("Local access: http://127.0.0.1:{port}/");

    axum::serve(listener, app).await
}

async fn index_handler() -> impl IntoResponse {
    with_cache_control(Html(INDEX_HTML))
}

async fn styles_handler() -> impl IntoResponse {
    with_cache_control((
        [(header::CONTENT_TYPE, "text/css; charset=utf-8")],
        STYLES_CSS,
    ))
}

async fn app_js_handler() -> impl IntoResponse {
    with_cache_control((
        [(
            header::CONTENT_TYPE,
            "application/javascript; charset=utf-8",
        )],
        APP_JS,
    ))
}

async fn not_found_handler() -> Response {
    error_response(StatusCode::NOT_FOUND, "Not found")
}

async fn compute_get_handler(Query(payload): Query<ComputePayload>) -> Response {
    compute_handler_impl(payload).await
}

async fn compute_post_handler(Json(payload): Json<ComputePayload>) -> Response {
    compute_handler_impl(payload).await
}

async fn compute_handler_impl(payload: ComputePayload) -> Response {
    let request = api_request_from_payload(payload);
    log::debug!(
        "compute {} -> {}",
        request.input.start_year,
        request.requested_end_year
    );

    match compute(request.input) {
        Ok(projection) => json_response(
            StatusCode::OK,
            build_compute_response(&projection, request.requested_end_year, &RupiahFormatter),
        ),
        Err(err) => {
            log::warn!("rejected compute request: {err}");
            error_response(StatusCode::BAD_REQUEST, &err.to_string())
        }
    }
}

fn with_cache_control<R: IntoResponse>(response: R) -> Response {
    let mut response = response.into_response();
    response.headers_mut().insert(
        header::CACHE_CONTROL,
        header::HeaderValue::from_static("no-store"),
    );
    response
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    with_cache_control((status, Json(body)))
}

fn error_response(status: StatusCode, msg: &str) -> Response {
    json_response(
        status,
        ErrorResponse {
            error: msg.to_string(),
        },
    )
}

#[cfg(test)]
fn api_request_from_json(json: &str) -> Result<ApiRequest, String> {
    let payload = serde_json::from_str::<ComputePayload>(json)
        .map_err(|e| format!("Invalid API JSON payload: {e}"))?;
    Ok(api_request_from_payload(payload))
}

fn api_request_from_payload(payload: ComputePayload) -> ApiRequest {
    let mut args = default_args_for_api();

    if let Some(v) = payload.start_year {
        args.start_year = v;
        if payload.end_year.is_none() {
            args.end_year = default_end_year(v);
        }
    }
    if let Some(v) = payload.end_year {
        args.end_year = v;
    }
    if let Some(v) = payload.initial_balance {
        args.initial_balance = v;
    }
    if let Some(v) = payload.monthly_deposit {
        args.monthly_deposit = v;
    }
    if let Some(v) = payload.yearly_interest {
        args.yearly_interest = v;
    }

    ApiRequest {
        input: build_input(&args),
        requested_end_year: args.end_year,
    }
}

fn default_args_for_api() -> ProjectionArgs {
    let start_year = current_year();
    ProjectionArgs {
        start_year,
        end_year: default_end_year(start_year),
        initial_balance: 0.0,
        monthly_deposit: 10_000_000.0,
        yearly_interest: 6.15,
    }
}

/// Shapes a projection for the wire, formatting every amount with `formatter`.
pub fn build_compute_response(
    projection: &Projection,
    requested_end_year: i32,
    formatter: &impl CurrencyFormatter,
) -> ComputeResponse {
    let summary = &projection.summary;
    ComputeResponse {
        start_year: projection.input.start_year,
        end_year: projection.input.end_year,
        end_year_clamped: projection.input.end_year != requested_end_year,
        rows: projection
            .trajectory
            .rows()
            .iter()
            .map(|row| RowResponse {
                year: row.year,
                balance: row.balance,
                balance_formatted: formatter.format(row.balance),
            })
            .collect(),
        summary: SummaryResponse {
            no_interest_balance: summary.no_interest_balance,
            no_interest_balance_formatted: formatter.format(summary.no_interest_balance),
            percent_uplift: summary.percent_uplift,
            percent_uplift_label: summary.percent_uplift.to_string(),
            monthly_withdrawal: summary.monthly_withdrawal,
            monthly_withdrawal_formatted: formatter.format(summary.monthly_withdrawal),
            annual_withdrawal: summary.annual_withdrawal,
            annual_withdrawal_formatted: formatter.format(summary.annual_withdrawal),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ProjectionError;
    use axum::body::to_bytes;

    const EPS: f64 = 1e-6;

    fn assert_approx(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() <= EPS,
            "expected {expected}, got {actual}"
        );
    }

    fn sample_args() -> ProjectionArgs {
        ProjectionArgs {
            start_year: 2024,
            end_year: 2025,
            initial_balance: 0.0,
            monthly_deposit: 10_000_000.0,
            yearly_interest: 6.15,
        }
    }

    fn compute_response(
        args: &ProjectionArgs,
    ) -> Result<(Projection, ComputeResponse), ProjectionError> {
        let projection = compute(build_input(args))?;
        let response = build_compute_response(&projection, args.end_year, &RupiahFormatter);
        Ok((projection, response))
    }

    async fn response_json(response: Response) -> serde_json::Value {
        let body = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body should be readable");
        serde_json::from_slice(&body).expect("body should be JSON")
    }

    #[test]
    fn default_end_year_is_at_least_2042() {
        assert_eq!(default_end_year(2024), 2042);
        assert_eq!(default_end_year(2040), 2050);
    }

    #[test]
    fn build_input_clamps_end_year() {
        let mut args = sample_args();
        args.end_year = 2010;
        let input = build_input(&args);
        assert_eq!(input.end_year, 2025);
    }

    #[test]
    fn api_request_from_json_parses_web_keys() {
        let request = api_request_from_json(
            r#"{
                "startYear": 2030,
                "endYear": 2040,
                "initialBalance": 5000000,
                "monthlyDeposit": 250000,
                "yearlyInterest": 7.5
            }"#,
        )
        .expect("valid payload");

        assert_eq!(request.input.start_year, 2030);
        assert_eq!(request.input.end_year, 2040);
        assert_eq!(request.requested_end_year, 2040);
        assert_approx(request.input.initial_balance, 5_000_000.0);
        assert_approx(request.input.monthly_deposit, 250_000.0);
        assert_approx(request.input.annual_interest_rate_percent, 7.5);
    }

    #[test]
    fn api_request_from_empty_json_uses_defaults() {
        let request = api_request_from_json("{}").expect("valid payload");
        let defaults = default_args_for_api();
        assert_eq!(request.input.start_year, defaults.start_year);
        assert_eq!(request.input.end_year, defaults.end_year);
        assert_approx(request.input.initial_balance, 0.0);
        assert_approx(request.input.monthly_deposit, 10_000_000.0);
        assert_approx(request.input.annual_interest_rate_percent, 6.15);
    }

    #[test]
    fn api_request_start_year_only_moves_default_end_year() {
        let request = api_request_from_json(r#"{"startYear": 2100}"#).expect("valid payload");
        assert_eq!(request.input.start_year, 2100);
        assert_eq!(request.input.end_year, 2110);
    }

    #[test]
    fn api_request_clamps_inverted_range() {
        let request = api_request_from_json(r#"{"startYear": 2030, "endYear": 2020}"#)
            .expect("valid payload");
        assert_eq!(request.input.end_year, 2031);
        assert_eq!(request.requested_end_year, 2020);
    }

    #[test]
    fn api_request_from_json_rejects_non_numeric_amounts() {
        let err = api_request_from_json(r#"{"monthlyDeposit": "lots"}"#)
            .expect_err("must reject string amount");
        assert!(err.contains("Invalid API JSON payload"));
    }

    #[test]
    fn compute_response_formats_rupiah() {
        let (projection, response) = compute_response(&sample_args()).expect("valid input");
        assert_eq!(projection.trajectory.rows().len(), 1);
        assert_eq!(response.rows.len(), 1);
        assert_eq!(response.rows[0].year, 2025);
        assert_eq!(response.rows[0].balance_formatted, "Rp\u{a0}123.440.956");
        assert_eq!(
            response.summary.no_interest_balance_formatted,
            "Rp\u{a0}120.000.000"
        );
        assert_eq!(response.summary.percent_uplift_label, "+2.87%");
        assert!(!response.end_year_clamped);
    }

    #[test]
    fn compute_response_serialization_contains_expected_fields() {
        let (_, response) = compute_response(&sample_args()).expect("valid input");
        let json = serde_json::to_string(&response).expect("response should serialize");
        assert!(json.contains("\"startYear\":2024"));
        assert!(json.contains("\"endYearClamped\":false"));
        assert!(json.contains("\"rows\""));
        assert!(json.contains("\"balanceFormatted\""));
        assert!(json.contains("\"noInterestBalance\""));
        assert!(json.contains("\"percentUplift\":{\"kind\":\"finite\",\"value\":2.87}"));
        assert!(json.contains("\"monthlyWithdrawalFormatted\""));
        assert!(json.contains("\"annualWithdrawal\""));
    }

    #[test]
    fn unbounded_uplift_serializes_without_value() {
        let mut args = sample_args();
        args.initial_balance = -120_000_000.0;
        let (projection, response) = compute_response(&args).expect("valid input");
        assert_eq!(projection.summary.percent_uplift, PercentUplift::Unbounded);
        let json = serde_json::to_string(&response).expect("response should serialize");
        assert!(json.contains("\"percentUplift\":{\"kind\":\"unbounded\"}"));
        assert!(json.contains("\"percentUpliftLabel\":\"n/a\""));
    }

    #[tokio::test]
    async fn compute_handler_returns_projection() {
        let payload = ComputePayload {
            start_year: Some(2024),
            end_year: Some(2027),
            initial_balance: Some(1_000.0),
            monthly_deposit: Some(0.0),
            yearly_interest: Some(0.0),
        };
        let response = compute_handler_impl(payload).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(header::CACHE_CONTROL).map(|v| v.as_bytes()),
            Some(&b"no-store"[..])
        );

        let body = response_json(response).await;
        let rows = body["rows"].as_array().expect("rows array");
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[2]["year"], 2027);
        assert_eq!(rows[2]["balanceFormatted"], "Rp\u{a0}1.000");
        assert_eq!(body["summary"]["percentUplift"]["value"], 0.0);
    }

    #[tokio::test]
    async fn compute_handler_rejects_nan_rate() {
        let payload = ComputePayload {
            yearly_interest: Some(f64::NAN),
            ..ComputePayload::default()
        };
        let response = compute_handler_impl(payload).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = response_json(response).await;
        let error = body["error"].as_str().expect("error message");
        assert!(error.contains("yearlyInterest"));
    }

    #[tokio::test]
    async fn compute_handler_rejects_unbounded_year_span() {
        let payload = ComputePayload {
            start_year: Some(i32::MIN),
            end_year: Some(i32::MAX),
            ..ComputePayload::default()
        };
        let response = compute_handler_impl(payload).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = response_json(response).await;
        let error = body["error"].as_str().expect("error message");
        assert!(error.contains("at most 500"));
    }

    #[tokio::test]
    async fn compute_handler_rejects_overflowing_balance() {
        let payload = ComputePayload {
            start_year: Some(2024),
            end_year: Some(2124),
            yearly_interest: Some(1.0e6),
            ..ComputePayload::default()
        };
        let response = compute_handler_impl(payload).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = response_json(response).await;
        let error = body["error"].as_str().expect("error message");
        assert!(error.contains("overflows"));
    }

    #[tokio::test]
    async fn not_found_handler_returns_json_error() {
        let response = not_found_handler().await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = response_json(response).await;
        assert_eq!(body["error"], "Not found");
    }
}
