//! One-method-per-endpoint client for the marketplace backend.
//!
//! Every method performs a single request: bearer header when a token is
//! present, JSON in and out (multipart for image-bearing listing writes),
//! and non-2xx responses normalized into errors carrying the server-provided
//! message. No retries, no dedup, no cross-request ordering.

use anyhow::{anyhow, Result};
use reqwest::multipart::{Form, Part};
use reqwest::{Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::json;
use std::path::Path;
use std::sync::OnceLock;
use std::time::Duration;

use crate::filter::{FilterState, Freshness};
use crate::models::{
    AnalyticsSummary, Bank, DashboardOverview, DateRange, Invoice, InvoiceDraft, PaymentMethod,
    PaymentMethodDraft, Payout, Product, ProductDraft, ReportPeriod, ReportRow, TransactionRecord,
};

/// Fixed user-facing message for transport and decode failures.
pub const NETWORK_ERROR: &str = "Connection failed. Please try again.";
/// Surfaced when an authenticated endpoint is called with no stored token.
pub const MISSING_TOKEN: &str = "No access token found. Sign in first.";

static HTTP: OnceLock<reqwest::Client> = OnceLock::new();

fn http_client() -> &'static reqwest::Client {
    HTTP.get_or_init(|| {
        reqwest::Client::builder()
            .pool_max_idle_per_host(8)
            .tcp_nodelay(true)
            .build()
            .expect("reqwest client")
    })
}

/// Extract the user-facing message from a non-2xx response body.
///
/// The backend reports failures as `{"error": "..."}` (some endpoints use
/// `"message"`); anything else falls back to the HTTP status line.
pub fn error_message(status: StatusCode, body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| {
            v.get("error")
                .or_else(|| v.get("message"))
                .and_then(|m| m.as_str())
                .map(str::to_string)
        })
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| format!("HTTP {status}"))
}

#[derive(Clone)]
pub struct MarketApi {
    base_url: String,
    timeout: Duration,
    token: Option<String>,
}

impl MarketApi {
    pub fn new(base_url: &str, timeout_ms: u64, token: Option<String>) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout: Duration::from_millis(timeout_ms),
            token,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let mut req = http_client()
            .request(method, self.url(path))
            .timeout(self.timeout);
        if let Some(token) = &self.token {
            req = req.header("Authorization", format!("Bearer {token}"));
        }
        req
    }

    fn require_token(&self) -> Result<()> {
        if self.token.is_none() {
            return Err(anyhow!(MISSING_TOKEN));
        }
        Ok(())
    }

    async fn read_json<T: DeserializeOwned>(req: RequestBuilder, what: &str) -> Result<T> {
        let res = req.send().await.map_err(|e| {
            log::warn!("[api] {what}: transport error: {e}");
            anyhow!(NETWORK_ERROR)
        })?;
        let status = res.status();
        if !status.is_success() {
            let body = res.text().await.unwrap_or_default();
            let msg = error_message(status, &body);
            log::warn!("[api] {what}: {status}: {msg}");
            return Err(anyhow!(msg));
        }
        res.json::<T>().await.map_err(|e| {
            log::warn!("[api] {what}: decode error: {e}");
            anyhow!(NETWORK_ERROR)
        })
    }

    /// Like [`read_json`] for endpoints whose success body is irrelevant.
    async fn read_ok(req: RequestBuilder, what: &str) -> Result<()> {
        let res = req.send().await.map_err(|e| {
            log::warn!("[api] {what}: transport error: {e}");
            anyhow!(NETWORK_ERROR)
        })?;
        let status = res.status();
        if !status.is_success() {
            let body = res.text().await.unwrap_or_default();
            let msg = error_message(status, &body);
            log::warn!("[api] {what}: {status}: {msg}");
            return Err(anyhow!(msg));
        }
        Ok(())
    }

    async fn get<T: DeserializeOwned>(&self, path: &str, what: &str) -> Result<T> {
        log::debug!("[api] GET {path}");
        Self::read_json(self.request(Method::GET, path), what).await
    }

    async fn post_json<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
        what: &str,
    ) -> Result<T> {
        log::debug!("[api] POST {path}");
        Self::read_json(self.request(Method::POST, path).json(body), what).await
    }

    // ---- products ------------------------------------------------------

    /// Wholesale listing fetch; the filter snapshot is mirrored into query
    /// parameters so server- and client-side filtering agree.
    pub async fn fetch_products(&self, filter: &FilterState) -> Result<Vec<Product>> {
        let qs = product_query(filter);
        let path = if qs.is_empty() {
            "/products".to_string()
        } else {
            format!("/products?{qs}")
        };
        self.get(&path, "fetch products").await
    }

    pub async fn create_product(&self, draft: &ProductDraft) -> Result<Product> {
        self.require_token()?;
        let form = product_form(draft).await?;
        log::debug!("[api] POST /products (multipart)");
        Self::read_json(
            self.request(Method::POST, "/products").multipart(form),
            "create listing",
        )
        .await
    }

    pub async fn update_product(&self, id: &str, draft: &ProductDraft) -> Result<Product> {
        self.require_token()?;
        let form = product_form(draft).await?;
        let path = format!("/products/{}", urlencoding::encode(id));
        log::debug!("[api] PUT {path} (multipart)");
        Self::read_json(self.request(Method::PUT, &path).multipart(form), "update listing").await
    }

    pub async fn delete_product(&self, id: &str) -> Result<()> {
        self.require_token()?;
        let path = format!("/products/{}", urlencoding::encode(id));
        log::debug!("[api] DELETE {path}");
        Self::read_ok(self.request(Method::DELETE, &path), "delete listing").await
    }

    // ---- payments dashboard --------------------------------------------

    pub async fn fetch_overview(&self) -> Result<DashboardOverview> {
        self.require_token()?;
        self.get("/payments/overview", "fetch overview").await
    }

    pub async fn fetch_analytics(&self, range: DateRange) -> Result<AnalyticsSummary> {
        self.require_token()?;
        let path = format!("/payments/analytics?range={}", range.query_value());
        self.get(&path, "fetch analytics").await
    }

    pub async fn fetch_reports(&self, period: ReportPeriod) -> Result<Vec<ReportRow>> {
        self.require_token()?;
        let path = format!("/payments/reports?period={}", period.query_value());
        self.get(&path, "fetch reports").await
    }

    pub async fn fetch_transactions(&self, range: DateRange) -> Result<Vec<TransactionRecord>> {
        self.require_token()?;
        let path = format!("/payments/transactions?range={}", range.query_value());
        self.get(&path, "fetch transactions").await
    }

    // ---- payment methods -----------------------------------------------

    pub async fn fetch_payment_methods(&self) -> Result<Vec<PaymentMethod>> {
        self.require_token()?;
        self.get("/payments/methods", "fetch payment methods").await
    }

    pub async fn add_payment_method(&self, draft: &PaymentMethodDraft) -> Result<PaymentMethod> {
        self.require_token()?;
        self.post_json("/payments/methods", &method_body(draft), "add payment method")
            .await
    }

    pub async fn update_payment_method(
        &self,
        id: &str,
        draft: &PaymentMethodDraft,
    ) -> Result<PaymentMethod> {
        self.require_token()?;
        let path = format!("/payments/methods/{}", urlencoding::encode(id));
        log::debug!("[api] PUT {path}");
        Self::read_json(
            self.request(Method::PUT, &path).json(&method_body(draft)),
            "update payment method",
        )
        .await
    }

    pub async fn delete_payment_method(&self, id: &str) -> Result<()> {
        self.require_token()?;
        let path = format!("/payments/methods/{}", urlencoding::encode(id));
        log::debug!("[api] DELETE {path}");
        Self::read_ok(self.request(Method::DELETE, &path), "delete payment method").await
    }

    pub async fn verify_payment_method(&self, id: &str, code: &str) -> Result<PaymentMethod> {
        self.require_token()?;
        let path = format!("/payments/methods/{}/verify", urlencoding::encode(id));
        self.post_json(&path, &json!({ "code": code }), "verify payment method")
            .await
    }

    // ---- payouts -------------------------------------------------------

    pub async fn fetch_payouts(&self) -> Result<Vec<Payout>> {
        self.require_token()?;
        self.get("/payments/payouts", "fetch payouts").await
    }

    pub async fn request_payout(&self, amount: f64, method_id: &str) -> Result<Payout> {
        self.require_token()?;
        let body = json!({ "amount": amount, "method_id": method_id });
        self.post_json("/payments/payouts", &body, "request payout").await
    }

    pub async fn process_payout(&self, id: &str) -> Result<Payout> {
        self.require_token()?;
        let path = format!("/payments/payouts/{}/process", urlencoding::encode(id));
        self.post_json(&path, &json!({}), "process payout").await
    }

    // ---- invoices ------------------------------------------------------

    pub async fn fetch_invoices(&self) -> Result<Vec<Invoice>> {
        self.require_token()?;
        self.get("/payments/invoices", "fetch invoices").await
    }

    pub async fn create_invoice(&self, draft: &InvoiceDraft) -> Result<Invoice> {
        self.require_token()?;
        let body = json!({
            "order_id": draft.order_id,
            "customer": draft.customer,
            "amount": draft.amount.trim().parse::<f64>().unwrap_or(0.0),
            "due_date": if draft.due_date.trim().is_empty() { None } else { Some(draft.due_date.trim()) },
        });
        self.post_json("/payments/invoices", &body, "create invoice").await
    }

    pub async fn generate_invoice(&self, order_id: &str) -> Result<Invoice> {
        self.require_token()?;
        let body = json!({ "order_id": order_id });
        self.post_json("/payments/invoices/generate", &body, "generate invoice")
            .await
    }

    pub async fn send_invoice(&self, id: &str) -> Result<Invoice> {
        self.require_token()?;
        let path = format!("/payments/invoices/{}/send", urlencoding::encode(id));
        self.post_json(&path, &json!({}), "send invoice").await
    }

    // ---- reference data ------------------------------------------------

    pub async fn fetch_supported_banks(&self) -> Result<Vec<Bank>> {
        self.get("/payments/banks", "fetch banks").await
    }
}

fn method_body(draft: &PaymentMethodDraft) -> serde_json::Value {
    json!({
        "kind": draft.kind,
        "label": draft.label,
        "account_number": draft.account_number,
        "bank_code": if draft.bank_code.is_empty() { None } else { Some(draft.bank_code.as_str()) },
    })
}

/// Mirror a filter snapshot into `key=value` query pairs.
pub fn product_query(filter: &FilterState) -> String {
    let mut pairs: Vec<(String, String)> = Vec::new();
    if !filter.search.is_empty() {
        pairs.push(("search".into(), filter.search.clone()));
    }
    if !filter.categories.is_empty() {
        pairs.push(("categories".into(), filter.categories.join(",")));
    }
    if !filter.locations.is_empty() {
        pairs.push(("locations".into(), filter.locations.join(",")));
    }
    if let Some(min) = filter.min_price {
        pairs.push(("min_price".into(), min.to_string()));
    }
    if let Some(max) = filter.max_price {
        pairs.push(("max_price".into(), max.to_string()));
    }
    if let Some(rating) = filter.min_rating {
        pairs.push(("min_rating".into(), rating.to_string()));
    }
    if filter.verified_only {
        pairs.push(("verified".into(), "true".into()));
    }
    if filter.organic_only {
        pairs.push(("organic".into(), "true".into()));
    }
    match filter.freshness {
        Freshness::Any => {}
        Freshness::Today => pairs.push(("freshness".into(), "today".into())),
        Freshness::ThisWeek => pairs.push(("freshness".into(), "week".into())),
    }
    if let Some(window) = filter.delivery {
        pairs.push(("delivery".into(), window.label().into()));
    }
    pairs
        .iter()
        .map(|(k, v)| format!("{k}={}", urlencoding::encode(v)))
        .collect::<Vec<_>>()
        .join("&")
}

/// Serialize a listing draft as multipart form-data, attaching the image
/// file when one was picked.
async fn product_form(draft: &ProductDraft) -> Result<Form> {
    let mut form = Form::new()
        .text("title", draft.title.clone())
        .text("description", draft.description.clone())
        .text("price", draft.price.trim().to_string())
        .text("quantity", draft.quantity.trim().to_string())
        .text("unit", draft.unit.clone())
        .text("category", draft.category.clone())
        .text("organic", if draft.organic { "true" } else { "false" })
        .text("harvest_date", draft.harvest_date.trim().to_string());

    if let Some(path) = &draft.image_path {
        let bytes = tokio::fs::read(path).await.map_err(|e| {
            log::warn!("[api] reading image {}: {e}", path.display());
            anyhow!("Could not read image file {}", path.display())
        })?;
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("image")
            .to_string();
        let part = Part::bytes(bytes)
            .file_name(file_name)
            .mime_str(guess_image_mime(path))
            .map_err(|e| anyhow!("invalid image mime type: {e}"))?;
        form = form.part("image", part);
    }
    Ok(form)
}

fn guess_image_mime(path: &Path) -> &'static str {
    match path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .as_deref()
    {
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("webp") => "image/webp",
        Some("gif") => "image/gif",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::FilterState;
    use crate::models::DeliveryWindow;

    #[test]
    fn server_error_field_wins() {
        let msg = error_message(StatusCode::NOT_FOUND, r#"{"error":"not found"}"#);
        assert_eq!(msg, "not found");
    }

    #[test]
    fn message_field_is_accepted_too() {
        let msg = error_message(StatusCode::BAD_REQUEST, r#"{"message":"amount too small"}"#);
        assert_eq!(msg, "amount too small");
    }

    #[test]
    fn non_json_body_falls_back_to_status_line() {
        let msg = error_message(StatusCode::BAD_GATEWAY, "<html>upstream down</html>");
        assert_eq!(msg, "HTTP 502 Bad Gateway");
    }

    #[test]
    fn empty_error_field_falls_back_to_status_line() {
        let msg = error_message(StatusCode::NOT_FOUND, r#"{"error":""}"#);
        assert_eq!(msg, "HTTP 404 Not Found");
    }

    #[test]
    fn network_fallback_is_a_fixed_string() {
        // The channel to the UI carries plain strings; a transport failure
        // must never surface as an empty or debug-formatted message.
        assert!(!NETWORK_ERROR.is_empty());
        assert!(NETWORK_ERROR.contains("try again"));
    }

    #[test]
    fn query_is_empty_for_default_filter() {
        assert_eq!(product_query(&FilterState::default()), "");
    }

    #[test]
    fn query_encodes_and_joins_fields() {
        let f = FilterState {
            search: "green beans".to_string(),
            categories: vec!["coffee".to_string(), "tea".to_string()],
            min_price: Some(2.5),
            verified_only: true,
            delivery: Some(DeliveryWindow::SameDay),
            ..FilterState::default()
        };
        let qs = product_query(&f);
        assert!(qs.contains("search=green%20beans"));
        assert!(qs.contains("categories=coffee%2Ctea"));
        assert!(qs.contains("min_price=2.5"));
        assert!(qs.contains("verified=true"));
        assert!(qs.contains("delivery=same-day"));
    }

    #[test]
    fn base_url_trailing_slash_is_normalized() {
        let api = MarketApi::new("https://api.example.com/v1/", 5000, None);
        assert_eq!(api.url("/products"), "https://api.example.com/v1/products");
    }

    #[test]
    fn missing_token_blocks_authenticated_calls() {
        let api = MarketApi::new("https://api.example.com/v1", 5000, None);
        let err = api.require_token().unwrap_err();
        assert_eq!(err.to_string(), MISSING_TOKEN);
    }

    #[test]
    fn image_mime_guessing() {
        assert_eq!(guess_image_mime(Path::new("a/b/photo.JPG")), "image/jpeg");
        assert_eq!(guess_image_mime(Path::new("leaf.png")), "image/png");
        assert_eq!(guess_image_mime(Path::new("noext")), "application/octet-stream");
    }
}
