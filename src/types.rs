use crate::filter::FilterState;
use crate::models::{
    AnalyticsSummary, Bank, DashboardOverview, DateRange, Invoice, InvoiceDraft, PaymentMethod,
    PaymentMethodDraft, Payout, Product, ProductDraft, ReportPeriod, ReportRow, TransactionRecord,
};

/// Pre-normalized, user-facing failure message (see `api::error_message`).
pub type FetchOutcome<T> = Result<T, String>;

/// Work order sent from the app to the network worker. Each request becomes
/// one independent HTTP round trip; nothing is deduplicated or cancelled.
#[derive(Debug, Clone)]
pub enum FetchRequest {
    /// `generation` comes back on the response so the app can drop replies
    /// that were overtaken by a newer filter snapshot.
    Products { generation: u64, filter: FilterState },
    Overview,
    Analytics { range: DateRange },
    Reports { period: ReportPeriod },
    Transactions { range: DateRange },
    PaymentMethods,
    Payouts,
    Invoices,
    Banks,

    CreateProduct { draft: ProductDraft },
    UpdateProduct { id: String, draft: ProductDraft },
    DeleteProduct { id: String },

    AddPaymentMethod { draft: PaymentMethodDraft },
    UpdatePaymentMethod { id: String, draft: PaymentMethodDraft },
    DeletePaymentMethod { id: String },
    VerifyPaymentMethod { id: String, code: String },

    RequestPayout { amount: f64, method_id: String },
    ProcessPayout { id: String },

    CreateInvoice { draft: InvoiceDraft },
    GenerateInvoice { order_id: String },
    SendInvoice { id: String },
}

/// Everything that can reach the UI loop from outside a key press.
#[derive(Debug, Clone)]
pub enum AppEvent {
    ProductsLoaded { generation: u64, outcome: FetchOutcome<Vec<Product>> },
    OverviewLoaded(FetchOutcome<DashboardOverview>),
    AnalyticsLoaded(FetchOutcome<AnalyticsSummary>),
    ReportsLoaded(FetchOutcome<Vec<ReportRow>>),
    TransactionsLoaded(FetchOutcome<Vec<TransactionRecord>>),
    PaymentMethodsLoaded(FetchOutcome<Vec<PaymentMethod>>),
    PayoutsLoaded(FetchOutcome<Vec<Payout>>),
    InvoicesLoaded(FetchOutcome<Vec<Invoice>>),
    BanksLoaded(FetchOutcome<Vec<Bank>>),

    ProductCreated(FetchOutcome<Product>),
    ProductUpdated(FetchOutcome<Product>),
    ProductDeleted { id: String, outcome: FetchOutcome<()> },

    PaymentMethodSaved(FetchOutcome<PaymentMethod>),
    PaymentMethodDeleted { id: String, outcome: FetchOutcome<()> },
    PaymentMethodVerified(FetchOutcome<PaymentMethod>),

    PayoutRequested(FetchOutcome<Payout>),
    PayoutProcessed(FetchOutcome<Payout>),

    InvoiceSaved(FetchOutcome<Invoice>),
    InvoiceSent(FetchOutcome<Invoice>),

    Quit,
}
