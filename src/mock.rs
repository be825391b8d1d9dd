//! Built-in sample datasets for `--demo` mode.
//!
//! Served only when demo mode is explicitly on; a failed live fetch renders
//! an error banner instead of silently substituting these.

use chrono::{Duration, Local, Utc};

use crate::models::{
    AnalyticsSummary, Bank, CategorySales, DailySales, DashboardOverview, DateRange,
    DeliveryWindow, Invoice, InvoiceStatus, NotificationItem, NotificationKind, PaymentMethod,
    PaymentMethodKind, Payout, PayoutStatus, Product, ReportPeriod, ReportRow, TransactionKind,
    TransactionRecord,
};

pub fn sample_products() -> Vec<Product> {
    let today = Local::now().date_naive();
    let items = [
        // (id, name, price, unit, qty, category, farmer, location, rating,
        //  verified, organic, harvest days ago, delivery)
        ("p-101", "Roma Tomatoes", 3.50, "kg", 120, "vegetables", "Rivera Farm", "valley-west", 4.6, true, true, 0, DeliveryWindow::SameDay),
        ("p-102", "Arabica Beans", 18.00, "kg", 45, "coffee", "Monte Alto Estate", "highlands", 4.9, true, false, 6, DeliveryWindow::TwoDay),
        ("p-103", "Curly Kale", 2.20, "bunch", 80, "vegetables", "Green Fold Co-op", "valley-west", 4.3, false, true, 1, DeliveryWindow::SameDay),
        ("p-104", "Wildflower Honey", 9.75, "jar", 60, "pantry", "Amber Apiary", "river-south", 4.8, true, false, 20, DeliveryWindow::Standard),
        ("p-105", "Hass Avocados", 6.40, "kg", 200, "fruit", "Loma Verde", "coast-north", 4.1, false, true, 3, DeliveryWindow::TwoDay),
        ("p-106", "Red Lentils", 4.10, "kg", 300, "grains", "Prairie Gold", "plains-east", 3.9, true, false, 40, DeliveryWindow::Standard),
        ("p-107", "Goat Cheese", 12.30, "wheel", 25, "dairy", "Two Bells Dairy", "river-south", 4.7, true, false, 2, DeliveryWindow::SameDay),
        ("p-108", "Heirloom Carrots", 2.80, "kg", 150, "vegetables", "Green Fold Co-op", "valley-west", 4.0, false, true, 5, DeliveryWindow::TwoDay),
    ];
    items
        .into_iter()
        .map(
            |(id, name, price, unit, qty, category, farmer, location, rating, verified, organic, days_ago, delivery)| Product {
                id: id.to_string(),
                name: name.to_string(),
                description: format!("{name} from {farmer}."),
                price,
                unit: unit.to_string(),
                quantity: qty,
                category: category.to_string(),
                farmer: farmer.to_string(),
                location: location.to_string(),
                rating,
                verified,
                organic,
                harvest_date: Some(today - Duration::days(days_ago)),
                delivery,
                image_url: None,
                active: true,
            },
        )
        .collect()
}

pub fn sample_overview() -> DashboardOverview {
    DashboardOverview {
        available_balance: 2417.65,
        pending_balance: 830.00,
        escrow_held: 412.50,
        next_payout_date: Some(Local::now().date_naive() + Duration::days(3)),
        recent_transactions: sample_transactions(DateRange::Last7Days),
    }
}

pub fn sample_analytics(range: DateRange) -> AnalyticsSummary {
    let days: i64 = match range {
        DateRange::Last7Days => 7,
        DateRange::Last30Days => 30,
        DateRange::Quarter => 90,
        DateRange::Year => 365,
    };
    let today = Local::now().date_naive();
    let daily: Vec<DailySales> = (0..days.min(30))
        .rev()
        .map(|i| DailySales {
            date: today - Duration::days(i),
            amount: 80.0 + 17.0 * ((i * 7) % 13) as f64,
        })
        .collect();
    let gross: f64 = daily.iter().map(|d| d.amount).sum::<f64>() * (days as f64 / days.min(30) as f64);
    let fees = gross * 0.045;
    AnalyticsSummary {
        gross_sales: gross,
        net_sales: gross - fees,
        fees,
        payout_total: gross * 0.8,
        order_count: (days * 6) as u32,
        average_order_value: gross / (days * 6) as f64,
        top_categories: vec![
            CategorySales { category: "vegetables".into(), amount: gross * 0.4 },
            CategorySales { category: "coffee".into(), amount: gross * 0.3 },
            CategorySales { category: "dairy".into(), amount: gross * 0.2 },
        ],
        daily,
    }
}

pub fn sample_reports(period: ReportPeriod) -> Vec<ReportRow> {
    let labels: &[&str] = match period {
        ReportPeriod::Weekly => &["W28", "W29", "W30", "W31"],
        ReportPeriod::Monthly => &["May", "June", "July", "August"],
        ReportPeriod::Quarterly => &["Q3 '25", "Q4 '25", "Q1 '26", "Q2 '26"],
    };
    labels
        .iter()
        .enumerate()
        .map(|(i, label)| {
            let gross = 1200.0 + 310.0 * i as f64;
            ReportRow {
                period: label.to_string(),
                orders: 40 + 9 * i as u32,
                gross,
                fees: gross * 0.045,
                net: gross * 0.955,
            }
        })
        .collect()
}

pub fn sample_transactions(_range: DateRange) -> Vec<TransactionRecord> {
    let now = Utc::now();
    let rows = [
        ("t-9001", TransactionKind::Sale, 54.20, "Marta K.", "order ord-2201", 2),
        ("t-9002", TransactionKind::Sale, 18.00, "Cafe Roble", "order ord-2202", 8),
        ("t-9003", TransactionKind::Fee, -2.43, "platform", "order ord-2201", 8),
        ("t-9004", TransactionKind::Payout, -240.00, "bank ****2210", "payout po-871", 26),
        ("t-9005", TransactionKind::Refund, -12.30, "Marta K.", "order ord-2188", 50),
    ];
    rows.into_iter()
        .map(|(id, kind, amount, counterparty, reference, hours_ago)| TransactionRecord {
            id: id.to_string(),
            kind,
            amount,
            counterparty: counterparty.to_string(),
            reference: reference.to_string(),
            created_at: now - Duration::hours(hours_ago),
        })
        .collect()
}

pub fn sample_payment_methods() -> Vec<PaymentMethod> {
    vec![
        PaymentMethod {
            id: "pm-1".into(),
            kind: PaymentMethodKind::BankAccount,
            label: "Harvest checking".into(),
            account_suffix: "2210".into(),
            bank_code: Some("AGB".into()),
            verified: true,
            is_default: true,
        },
        PaymentMethod {
            id: "pm-2".into(),
            kind: PaymentMethodKind::MobileMoney,
            label: "Field wallet".into(),
            account_suffix: "7744".into(),
            bank_code: None,
            verified: false,
            is_default: false,
        },
    ]
}

pub fn sample_payouts() -> Vec<Payout> {
    let now = Utc::now();
    vec![
        Payout {
            id: "po-871".into(),
            amount: 240.00,
            method_id: "pm-1".into(),
            status: PayoutStatus::Completed,
            requested_at: now - Duration::days(2),
            processed_at: Some(now - Duration::days(1)),
        },
        Payout {
            id: "po-884".into(),
            amount: 400.00,
            method_id: "pm-1".into(),
            status: PayoutStatus::Pending,
            requested_at: now - Duration::hours(5),
            processed_at: None,
        },
    ]
}

pub fn sample_invoices() -> Vec<Invoice> {
    let now = Utc::now();
    let today = Local::now().date_naive();
    vec![
        Invoice {
            id: "inv-311".into(),
            order_id: "ord-2201".into(),
            customer: "Marta K.".into(),
            amount: 54.20,
            status: InvoiceStatus::Paid,
            issued_at: now - Duration::days(4),
            due_date: Some(today - Duration::days(1)),
        },
        Invoice {
            id: "inv-312".into(),
            order_id: "ord-2202".into(),
            customer: "Cafe Roble".into(),
            amount: 180.00,
            status: InvoiceStatus::Sent,
            issued_at: now - Duration::days(1),
            due_date: Some(today + Duration::days(13)),
        },
        Invoice {
            id: "inv-313".into(),
            order_id: "ord-2188".into(),
            customer: "Verde Market".into(),
            amount: 96.50,
            status: InvoiceStatus::Overdue,
            issued_at: now - Duration::days(40),
            due_date: Some(today - Duration::days(10)),
        },
    ]
}

pub fn sample_notifications() -> Vec<NotificationItem> {
    let now = Utc::now();
    let rows = [
        ("n-1", NotificationKind::Success, "Payout po-871 completed", 26),
        ("n-2", NotificationKind::Info, "Invoice inv-312 was viewed by Cafe Roble", 20),
        ("n-3", NotificationKind::Warning, "Invoice inv-313 is overdue", 12),
        ("n-4", NotificationKind::Info, "New order ord-2203 received", 3),
    ];
    rows.into_iter()
        .map(|(id, kind, message, hours_ago)| NotificationItem {
            id: id.to_string(),
            kind,
            message: message.to_string(),
            created_at: now - Duration::hours(hours_ago),
            read: false,
        })
        .collect()
}

pub fn sample_banks() -> Vec<Bank> {
    vec![
        Bank { code: "AGB".into(), name: "Agrarian Bank".into() },
        Bank { code: "CVU".into(), name: "Central Valley Union".into() },
        Bank { code: "RCB".into(), name: "Rural Credit Bank".into() },
    ]
}
