use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// A marketplace listing as returned by the backend.
///
/// The backend owns pricing and stock; this struct is a faithful mirror of
/// the wire shape plus the fields the filter panel keys on (farmer, location,
/// rating, delivery window).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: f64,
    pub unit: String,
    pub quantity: u32,
    pub category: String,
    #[serde(default)]
    pub farmer: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub rating: f32,
    #[serde(default)]
    pub verified: bool,
    #[serde(default)]
    pub organic: bool,
    pub harvest_date: Option<NaiveDate>,
    #[serde(default, rename = "delivery_window")]
    pub delivery: DeliveryWindow,
    pub image_url: Option<String>,
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

/// How quickly a listing can be delivered. Ordered fastest first so a filter
/// setting acts as an upper bound (`SameDay <= TwoDay <= Standard`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryWindow {
    SameDay,
    TwoDay,
    #[default]
    Standard,
}

impl DeliveryWindow {
    pub fn label(self) -> &'static str {
        match self {
            DeliveryWindow::SameDay => "same-day",
            DeliveryWindow::TwoDay => "2-day",
            DeliveryWindow::Standard => "standard",
        }
    }
}

/// Unsaved form state for creating or editing a listing. Serialized as
/// multipart form-data on submit so the optional image can ride along.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductDraft {
    pub title: String,
    pub description: String,
    pub price: String,
    pub quantity: String,
    pub unit: String,
    pub category: String,
    pub organic: bool,
    pub harvest_date: String,
    pub image_path: Option<PathBuf>,
}

impl ProductDraft {
    /// Prefill a draft from an existing listing for the edit modal.
    pub fn from_product(p: &Product) -> Self {
        Self {
            title: p.name.clone(),
            description: p.description.clone(),
            price: format!("{:.2}", p.price),
            quantity: p.quantity.to_string(),
            unit: p.unit.clone(),
            category: p.category.clone(),
            organic: p.organic,
            harvest_date: p.harvest_date.map(|d| d.to_string()).unwrap_or_default(),
            image_path: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethodKind {
    BankAccount,
    MobileMoney,
    Card,
}

impl PaymentMethodKind {
    pub fn label(self) -> &'static str {
        match self {
            PaymentMethodKind::BankAccount => "bank account",
            PaymentMethodKind::MobileMoney => "mobile money",
            PaymentMethodKind::Card => "card",
        }
    }

    pub const ALL: [PaymentMethodKind; 3] = [
        PaymentMethodKind::BankAccount,
        PaymentMethodKind::MobileMoney,
        PaymentMethodKind::Card,
    ];
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentMethod {
    pub id: String,
    pub kind: PaymentMethodKind,
    pub label: String,
    /// Trailing digits of the account/card, already masked by the backend.
    #[serde(default)]
    pub account_suffix: String,
    #[serde(default)]
    pub bank_code: Option<String>,
    #[serde(default)]
    pub verified: bool,
    #[serde(default)]
    pub is_default: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PaymentMethodDraft {
    pub kind: PaymentMethodKind,
    pub label: String,
    pub account_number: String,
    pub bank_code: String,
}

impl Default for PaymentMethodDraft {
    fn default() -> Self {
        Self {
            kind: PaymentMethodKind::BankAccount,
            label: String::new(),
            account_number: String::new(),
            bank_code: String::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PayoutStatus {
    Pending,
    Processing,
    Completed,
    Failed,
}

impl PayoutStatus {
    pub fn label(self) -> &'static str {
        match self {
            PayoutStatus::Pending => "pending",
            PayoutStatus::Processing => "processing",
            PayoutStatus::Completed => "completed",
            PayoutStatus::Failed => "failed",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Payout {
    pub id: String,
    pub amount: f64,
    pub method_id: String,
    pub status: PayoutStatus,
    pub requested_at: DateTime<Utc>,
    pub processed_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvoiceStatus {
    Draft,
    Sent,
    Paid,
    Overdue,
}

impl InvoiceStatus {
    pub fn label(self) -> &'static str {
        match self {
            InvoiceStatus::Draft => "draft",
            InvoiceStatus::Sent => "sent",
            InvoiceStatus::Paid => "paid",
            InvoiceStatus::Overdue => "overdue",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Invoice {
    pub id: String,
    pub order_id: String,
    pub customer: String,
    pub amount: f64,
    pub status: InvoiceStatus,
    pub issued_at: DateTime<Utc>,
    pub due_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct InvoiceDraft {
    pub order_id: String,
    pub customer: String,
    pub amount: String,
    pub due_date: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionKind {
    Sale,
    Payout,
    Refund,
    Fee,
}

impl TransactionKind {
    pub fn label(self) -> &'static str {
        match self {
            TransactionKind::Sale => "sale",
            TransactionKind::Payout => "payout",
            TransactionKind::Refund => "refund",
            TransactionKind::Fee => "fee",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionRecord {
    pub id: String,
    pub kind: TransactionKind,
    pub amount: f64,
    #[serde(default)]
    pub counterparty: String,
    #[serde(default)]
    pub reference: String,
    pub created_at: DateTime<Utc>,
}

/// Headline numbers for the payments overview tab. Escrow amounts are held
/// and computed backend-side; this is display-only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardOverview {
    pub available_balance: f64,
    pub pending_balance: f64,
    pub escrow_held: f64,
    pub next_payout_date: Option<NaiveDate>,
    #[serde(default)]
    pub recent_transactions: Vec<TransactionRecord>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategorySales {
    pub category: String,
    pub amount: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailySales {
    pub date: NaiveDate,
    pub amount: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyticsSummary {
    pub gross_sales: f64,
    pub net_sales: f64,
    pub fees: f64,
    pub payout_total: f64,
    pub order_count: u32,
    pub average_order_value: f64,
    #[serde(default)]
    pub top_categories: Vec<CategorySales>,
    #[serde(default)]
    pub daily: Vec<DailySales>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportRow {
    pub period: String,
    pub orders: u32,
    pub gross: f64,
    pub fees: f64,
    pub net: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    Info,
    Success,
    Warning,
    Error,
}

/// Client-side notification row. Read/dismiss state lives entirely in the
/// app; nothing here is written back to the backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationItem {
    pub id: String,
    pub kind: NotificationKind,
    pub message: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub read: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bank {
    pub code: String,
    pub name: String,
}

/// Date-range selector shared by the analytics and transactions tabs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DateRange {
    Last7Days,
    #[default]
    Last30Days,
    Quarter,
    Year,
}

impl DateRange {
    /// Value sent as the `range` query parameter.
    pub fn query_value(self) -> &'static str {
        match self {
            DateRange::Last7Days => "7d",
            DateRange::Last30Days => "30d",
            DateRange::Quarter => "90d",
            DateRange::Year => "365d",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            DateRange::Last7Days => "last 7 days",
            DateRange::Last30Days => "last 30 days",
            DateRange::Quarter => "last quarter",
            DateRange::Year => "last year",
        }
    }

    pub fn next(self) -> Self {
        match self {
            DateRange::Last7Days => DateRange::Last30Days,
            DateRange::Last30Days => DateRange::Quarter,
            DateRange::Quarter => DateRange::Year,
            DateRange::Year => DateRange::Last7Days,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReportPeriod {
    Weekly,
    #[default]
    Monthly,
    Quarterly,
}

impl ReportPeriod {
    pub fn query_value(self) -> &'static str {
        match self {
            ReportPeriod::Weekly => "weekly",
            ReportPeriod::Monthly => "monthly",
            ReportPeriod::Quarterly => "quarterly",
        }
    }

    pub fn label(self) -> &'static str {
        self.query_value()
    }

    pub fn next(self) -> Self {
        match self {
            ReportPeriod::Weekly => ReportPeriod::Monthly,
            ReportPeriod::Monthly => ReportPeriod::Quarterly,
            ReportPeriod::Quarterly => ReportPeriod::Weekly,
        }
    }
}
