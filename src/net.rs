//! Network worker: turns [`FetchRequest`]s into façade calls and sends the
//! outcome back to the UI loop as [`AppEvent`]s.
//!
//! Each request is served on its own task, so overlapping requests are
//! independent round trips with no ordering guarantee between completions;
//! the product-list generation number is how the app copes with that.

use std::sync::Arc;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};

use crate::api::MarketApi;
use crate::types::{AppEvent, FetchRequest};

pub async fn run_fetch_worker(
    api: Arc<MarketApi>,
    mut rx: UnboundedReceiver<FetchRequest>,
    tx: UnboundedSender<AppEvent>,
) {
    log::info!("[net] fetch worker up, base url {}", api.base_url());
    while let Some(req) = rx.recv().await {
        let api = api.clone();
        let tx = tx.clone();
        tokio::spawn(async move {
            let ev = serve(&api, req).await;
            let _ = tx.send(ev);
        });
    }
    log::info!("[net] fetch worker shutting down");
}

async fn serve(api: &MarketApi, req: FetchRequest) -> AppEvent {
    // Errors crossing the channel are plain strings, already normalized for
    // display by the façade.
    fn user<T>(r: anyhow::Result<T>) -> Result<T, String> {
        r.map_err(|e| e.to_string())
    }

    match req {
        FetchRequest::Products { generation, filter } => AppEvent::ProductsLoaded {
            generation,
            outcome: user(api.fetch_products(&filter).await),
        },
        FetchRequest::Overview => AppEvent::OverviewLoaded(user(api.fetch_overview().await)),
        FetchRequest::Analytics { range } => {
            AppEvent::AnalyticsLoaded(user(api.fetch_analytics(range).await))
        }
        FetchRequest::Reports { period } => {
            AppEvent::ReportsLoaded(user(api.fetch_reports(period).await))
        }
        FetchRequest::Transactions { range } => {
            AppEvent::TransactionsLoaded(user(api.fetch_transactions(range).await))
        }
        FetchRequest::PaymentMethods => {
            AppEvent::PaymentMethodsLoaded(user(api.fetch_payment_methods().await))
        }
        FetchRequest::Payouts => AppEvent::PayoutsLoaded(user(api.fetch_payouts().await)),
        FetchRequest::Invoices => AppEvent::InvoicesLoaded(user(api.fetch_invoices().await)),
        FetchRequest::Banks => AppEvent::BanksLoaded(user(api.fetch_supported_banks().await)),

        FetchRequest::CreateProduct { draft } => {
            AppEvent::ProductCreated(user(api.create_product(&draft).await))
        }
        FetchRequest::UpdateProduct { id, draft } => {
            AppEvent::ProductUpdated(user(api.update_product(&id, &draft).await))
        }
        FetchRequest::DeleteProduct { id } => {
            let outcome = user(api.delete_product(&id).await);
            AppEvent::ProductDeleted { id, outcome }
        }

        FetchRequest::AddPaymentMethod { draft } => {
            AppEvent::PaymentMethodSaved(user(api.add_payment_method(&draft).await))
        }
        FetchRequest::UpdatePaymentMethod { id, draft } => {
            AppEvent::PaymentMethodSaved(user(api.update_payment_method(&id, &draft).await))
        }
        FetchRequest::DeletePaymentMethod { id } => {
            let outcome = user(api.delete_payment_method(&id).await);
            AppEvent::PaymentMethodDeleted { id, outcome }
        }
        FetchRequest::VerifyPaymentMethod { id, code } => {
            AppEvent::PaymentMethodVerified(user(api.verify_payment_method(&id, &code).await))
        }

        FetchRequest::RequestPayout { amount, method_id } => {
            AppEvent::PayoutRequested(user(api.request_payout(amount, &method_id).await))
        }
        FetchRequest::ProcessPayout { id } => {
            AppEvent::PayoutProcessed(user(api.process_payout(&id).await))
        }

        FetchRequest::CreateInvoice { draft } => {
            AppEvent::InvoiceSaved(user(api.create_invoice(&draft).await))
        }
        FetchRequest::GenerateInvoice { order_id } => {
            AppEvent::InvoiceSaved(user(api.generate_invoice(&order_id).await))
        }
        FetchRequest::SendInvoice { id } => {
            AppEvent::InvoiceSent(user(api.send_invoice(&id).await))
        }
    }
}
