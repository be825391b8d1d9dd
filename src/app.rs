use std::path::PathBuf;
use std::time::{Duration, Instant};
use tokio::sync::mpsc::UnboundedSender;

use crate::filter::{self, FilterState};
use crate::mock;
use crate::models::{
    DateRange, DeliveryWindow, Invoice, InvoiceDraft, InvoiceStatus, NotificationItem, Payout,
    PayoutStatus, PaymentMethod, PaymentMethodDraft, PaymentMethodKind, Product, ProductDraft,
    ReportPeriod,
};
use crate::session::Session;
use crate::theme::Theme;
use crate::types::{AppEvent, FetchRequest};

const TOAST_TTL: Duration = Duration::from_secs(3);
const DEBUG_LOG_CAP: usize = 200;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum View {
    Market,
    Cart,
    Payments,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PayTab {
    Overview,
    Methods,
    Payouts,
    Invoices,
    Transactions,
    Reports,
    Notifications,
}

impl PayTab {
    pub const ALL: [PayTab; 7] = [
        PayTab::Overview,
        PayTab::Methods,
        PayTab::Payouts,
        PayTab::Invoices,
        PayTab::Transactions,
        PayTab::Reports,
        PayTab::Notifications,
    ];

    pub fn label(self) -> &'static str {
        match self {
            PayTab::Overview => "Overview",
            PayTab::Methods => "Methods",
            PayTab::Payouts => "Payouts",
            PayTab::Invoices => "Invoices",
            PayTab::Transactions => "Transactions",
            PayTab::Reports => "Reports",
            PayTab::Notifications => "Notifications",
        }
    }

    fn index(self) -> usize {
        PayTab::ALL.iter().position(|t| *t == self).unwrap_or(0)
    }

    pub fn next(self) -> Self {
        PayTab::ALL[(self.index() + 1) % PayTab::ALL.len()]
    }

    pub fn prev(self) -> Self {
        PayTab::ALL[(self.index() + PayTab::ALL.len() - 1) % PayTab::ALL.len()]
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Search,
    FilterPanel,
    ProductForm,
    MethodForm,
    PayoutForm,
    InvoiceForm,
    ConfirmDelete,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
}

#[derive(Clone, Debug)]
pub struct Toast {
    pub message: String,
    pub kind: ToastKind,
    pub shown_at: Instant,
}

/// One remote dataset with the loading/error/data triple every widget
/// renders from.
#[derive(Clone, Debug)]
pub struct Loadable<T> {
    pub data: Option<T>,
    pub loading: bool,
    pub error: Option<String>,
}

impl<T> Default for Loadable<T> {
    fn default() -> Self {
        Self { data: None, loading: false, error: None }
    }
}

impl<T> Loadable<T> {
    fn begin(&mut self) {
        self.loading = true;
        self.error = None;
    }

    fn resolve(&mut self, outcome: Result<T, String>) {
        self.loading = false;
        match outcome {
            Ok(data) => {
                self.data = Some(data);
                self.error = None;
            }
            // Explicit error state: stale data stays visible underneath the
            // banner but is never silently replaced with fabricated rows.
            Err(msg) => self.error = Some(msg),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct CartLine {
    pub product_id: String,
    pub name: String,
    pub unit: String,
    pub unit_price: f64,
    pub quantity: u32,
}

/// Filter panel rows in display order; category/location toggles are
/// appended dynamically after these fixed controls.
pub const FILTER_FIXED_ROWS: usize = 8;

#[derive(Clone, Debug, Default)]
pub struct ProductForm {
    pub draft: ProductDraft,
    /// `Some` when editing an existing listing.
    pub editing_id: Option<String>,
    pub focus: usize,
    pub image_path_input: String,
}

impl ProductForm {
    pub const FIELDS: [&'static str; 8] = [
        "Title",
        "Description",
        "Price",
        "Quantity",
        "Unit",
        "Category",
        "Harvest date (YYYY-MM-DD)",
        "Image path",
    ];
    /// Text fields plus the trailing organic toggle row.
    pub const ROWS: usize = Self::FIELDS.len() + 1;

    pub fn field_mut(&mut self) -> Option<&mut String> {
        match self.focus {
            0 => Some(&mut self.draft.title),
            1 => Some(&mut self.draft.description),
            2 => Some(&mut self.draft.price),
            3 => Some(&mut self.draft.quantity),
            4 => Some(&mut self.draft.unit),
            5 => Some(&mut self.draft.category),
            6 => Some(&mut self.draft.harvest_date),
            7 => Some(&mut self.image_path_input),
            _ => None,
        }
    }

    pub fn field_value(&self, row: usize) -> &str {
        match row {
            0 => &self.draft.title,
            1 => &self.draft.description,
            2 => &self.draft.price,
            3 => &self.draft.quantity,
            4 => &self.draft.unit,
            5 => &self.draft.category,
            6 => &self.draft.harvest_date,
            7 => &self.image_path_input,
            _ => "",
        }
    }
}

/// Linear step machine: select type -> enter details -> (separately) verify.
#[derive(Clone, Debug, Default)]
pub struct MethodForm {
    pub kind_idx: usize,
    pub draft: PaymentMethodDraft,
    pub editing_id: Option<String>,
    /// 0 = type select, 1 = details, 2 = verification code entry.
    pub step: u8,
    pub code: String,
    pub focus: usize,
}

impl MethodForm {
    pub const DETAIL_FIELDS: [&'static str; 3] = ["Label", "Account number", "Bank code"];

    pub fn field_mut(&mut self) -> Option<&mut String> {
        match self.focus {
            0 => Some(&mut self.draft.label),
            1 => Some(&mut self.draft.account_number),
            2 => Some(&mut self.draft.bank_code),
            _ => None,
        }
    }

    pub fn field_value(&self, row: usize) -> &str {
        match row {
            0 => &self.draft.label,
            1 => &self.draft.account_number,
            2 => &self.draft.bank_code,
            _ => "",
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct PayoutForm {
    pub amount: String,
    pub method_idx: usize,
    /// 0 = entry, 1 = confirm.
    pub step: u8,
}

#[derive(Clone, Debug, Default)]
pub struct InvoiceForm {
    pub draft: InvoiceDraft,
    pub focus: usize,
}

impl InvoiceForm {
    pub const FIELDS: [&'static str; 4] =
        ["Order id", "Customer", "Amount", "Due date (YYYY-MM-DD)"];

    pub fn field_mut(&mut self) -> Option<&mut String> {
        match self.focus {
            0 => Some(&mut self.draft.order_id),
            1 => Some(&mut self.draft.customer),
            2 => Some(&mut self.draft.amount),
            3 => Some(&mut self.draft.due_date),
            _ => None,
        }
    }

    pub fn field_value(&self, row: usize) -> &str {
        match row {
            0 => &self.draft.order_id,
            1 => &self.draft.customer,
            2 => &self.draft.amount,
            3 => &self.draft.due_date,
            _ => "",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum DeleteTarget {
    Product(String),
    Method(String),
}

pub struct App {
    quit: bool,
    theme: Theme,
    demo: bool,
    demo_seq: u64,

    view: View,
    pay_tab: PayTab,
    input_mode: InputMode,

    fps: u32,
    fps_choices: Vec<u32>,
    spinner_frame: usize,

    // Market
    pub products: Loadable<Vec<Product>>,
    products_generation: u64,
    visible: Vec<Product>,
    market_sel: usize,
    pub filter: FilterState,
    filter_focus: usize,

    // Cart
    cart: Vec<CartLine>,
    cart_sel: usize,

    // Payments dashboard
    pub overview: Loadable<crate::models::DashboardOverview>,
    pub analytics: Loadable<crate::models::AnalyticsSummary>,
    pub reports: Loadable<Vec<crate::models::ReportRow>>,
    pub transactions: Loadable<Vec<crate::models::TransactionRecord>>,
    pub methods: Loadable<Vec<PaymentMethod>>,
    pub payouts: Loadable<Vec<Payout>>,
    pub invoices: Loadable<Vec<Invoice>>,
    pub banks: Loadable<Vec<crate::models::Bank>>,
    pub range: DateRange,
    pub report_period: ReportPeriod,
    methods_sel: usize,
    payouts_sel: usize,
    invoices_sel: usize,
    transactions_sel: usize,

    // Notifications (client-side only)
    notifications: Vec<NotificationItem>,
    notifications_sel: usize,

    // Modals
    pub product_form: ProductForm,
    pub method_form: MethodForm,
    pub payout_form: PayoutForm,
    pub invoice_form: InvoiceForm,
    pub delete_target: Option<DeleteTarget>,

    session: Session,
    toast: Option<Toast>,

    debug_log: Vec<String>,
    debug_visible: bool,

    fetch_tx: UnboundedSender<FetchRequest>,
}

impl App {
    pub fn new(
        theme: Theme,
        fps: u32,
        fps_choices: Vec<u32>,
        demo: bool,
        session: Session,
        fetch_tx: UnboundedSender<FetchRequest>,
    ) -> Self {
        Self {
            quit: false,
            theme,
            demo,
            demo_seq: 0,
            view: View::Market,
            pay_tab: PayTab::Overview,
            input_mode: InputMode::Normal,
            fps,
            fps_choices,
            spinner_frame: 0,
            products: Loadable::default(),
            products_generation: 0,
            visible: Vec::new(),
            market_sel: 0,
            filter: FilterState::default(),
            filter_focus: 0,
            cart: Vec::new(),
            cart_sel: 0,
            overview: Loadable::default(),
            analytics: Loadable::default(),
            reports: Loadable::default(),
            transactions: Loadable::default(),
            methods: Loadable::default(),
            payouts: Loadable::default(),
            invoices: Loadable::default(),
            banks: Loadable::default(),
            range: DateRange::default(),
            report_period: ReportPeriod::default(),
            methods_sel: 0,
            payouts_sel: 0,
            invoices_sel: 0,
            transactions_sel: 0,
            notifications: Vec::new(),
            notifications_sel: 0,
            product_form: ProductForm::default(),
            method_form: MethodForm::default(),
            payout_form: PayoutForm::default(),
            invoice_form: InvoiceForm::default(),
            delete_target: None,
            session,
            toast: None,
            debug_log: Vec::new(),
            debug_visible: false,
            fetch_tx,
        }
    }

    /// Initial fetches after the terminal is up.
    pub fn start(&mut self) {
        self.refetch_products();
        if self.demo {
            self.notifications = mock::sample_notifications();
        }
    }

    // ---- basic accessors ----------------------------------------------

    pub fn quit_flag(&self) -> bool {
        self.quit
    }
    pub fn theme(&self) -> &Theme {
        &self.theme
    }
    pub fn demo(&self) -> bool {
        self.demo
    }
    pub fn view(&self) -> View {
        self.view
    }
    pub fn pay_tab(&self) -> PayTab {
        self.pay_tab
    }
    pub fn input_mode(&self) -> InputMode {
        self.input_mode
    }
    pub fn fps(&self) -> u32 {
        self.fps
    }
    pub fn session(&self) -> &Session {
        &self.session
    }
    pub fn filter_focus(&self) -> usize {
        self.filter_focus
    }
    pub fn debug_log(&self) -> &[String] {
        &self.debug_log
    }
    pub fn debug_visible(&self) -> bool {
        self.debug_visible
    }
    pub fn notifications(&self) -> &[NotificationItem] {
        &self.notifications
    }
    pub fn notifications_sel(&self) -> usize {
        self.notifications_sel
    }
    pub fn cart(&self) -> &[CartLine] {
        &self.cart
    }
    pub fn cart_sel(&self) -> usize {
        self.cart_sel
    }

    pub fn cycle_fps(&mut self) {
        if self.fps_choices.is_empty() {
            return;
        }
        let idx = self.fps_choices.iter().position(|f| *f == self.fps).unwrap_or(0);
        self.fps = self.fps_choices[(idx + 1) % self.fps_choices.len()];
    }

    pub fn tick_spinner(&mut self) {
        self.spinner_frame = self.spinner_frame.wrapping_add(1);
    }

    pub fn spinner_char(&self) -> char {
        const FRAMES: [char; 4] = ['|', '/', '-', '\\'];
        FRAMES[(self.spinner_frame / 2) % FRAMES.len()]
    }

    pub fn log_debug(&mut self, msg: String) {
        log::debug!("{msg}");
        self.debug_log.push(msg);
        if self.debug_log.len() > DEBUG_LOG_CAP {
            let overflow = self.debug_log.len() - DEBUG_LOG_CAP;
            self.debug_log.drain(..overflow);
        }
    }

    pub fn toggle_debug_panel(&mut self) {
        self.debug_visible = !self.debug_visible;
    }

    // ---- toasts --------------------------------------------------------

    pub fn show_toast(&mut self, message: impl Into<String>, kind: ToastKind) {
        self.toast = Some(Toast { message: message.into(), kind, shown_at: Instant::now() });
    }

    /// Current toast if it has not aged out yet (3 s lifetime).
    pub fn toast(&self) -> Option<(&str, ToastKind)> {
        self.toast
            .as_ref()
            .filter(|t| t.shown_at.elapsed() < TOAST_TTL)
            .map(|t| (t.message.as_str(), t.kind))
    }

    // ---- view switching ------------------------------------------------

    pub fn set_view(&mut self, view: View) {
        self.view = view;
        if view == View::Payments {
            self.enter_pay_tab(self.pay_tab);
        }
    }

    pub fn next_pay_tab(&mut self) {
        self.enter_pay_tab(self.pay_tab.next());
    }

    pub fn prev_pay_tab(&mut self) {
        self.enter_pay_tab(self.pay_tab.prev());
    }

    /// Entering a tab behaves like a component mount: its dataset refetches
    /// every time.
    pub fn enter_pay_tab(&mut self, tab: PayTab) {
        self.pay_tab = tab;
        match tab {
            PayTab::Overview => {
                self.overview.begin();
                self.dispatch(FetchRequest::Overview);
                self.analytics.begin();
                self.dispatch(FetchRequest::Analytics { range: self.range });
            }
            PayTab::Methods => {
                self.methods.begin();
                self.dispatch(FetchRequest::PaymentMethods);
                if self.banks.data.is_none() && !self.banks.loading {
                    self.banks.begin();
                    self.dispatch(FetchRequest::Banks);
                }
            }
            PayTab::Payouts => {
                self.payouts.begin();
                self.dispatch(FetchRequest::Payouts);
            }
            PayTab::Invoices => {
                self.invoices.begin();
                self.dispatch(FetchRequest::Invoices);
            }
            PayTab::Transactions => {
                self.transactions.begin();
                self.dispatch(FetchRequest::Transactions { range: self.range });
            }
            PayTab::Reports => {
                self.reports.begin();
                self.dispatch(FetchRequest::Reports { period: self.report_period });
            }
            PayTab::Notifications => {}
        }
    }

    /// Date-range selector shared by overview/analytics/transactions.
    pub fn cycle_range(&mut self) {
        self.range = self.range.next();
        match self.pay_tab {
            PayTab::Overview => {
                self.analytics.begin();
                self.dispatch(FetchRequest::Analytics { range: self.range });
            }
            PayTab::Transactions => {
                self.transactions.begin();
                self.dispatch(FetchRequest::Transactions { range: self.range });
            }
            _ => {}
        }
    }

    pub fn cycle_report_period(&mut self) {
        self.report_period = self.report_period.next();
        if self.pay_tab == PayTab::Reports {
            self.reports.begin();
            self.dispatch(FetchRequest::Reports { period: self.report_period });
        }
    }

    // ---- product listing ----------------------------------------------

    pub fn visible_products(&self) -> &[Product] {
        &self.visible
    }

    pub fn market_sel(&self) -> usize {
        self.market_sel
    }

    pub fn selected_product(&self) -> Option<&Product> {
        self.visible.get(self.market_sel)
    }

    /// Distinct category ids present in the loaded listing, sorted.
    pub fn known_categories(&self) -> Vec<String> {
        let mut cats: Vec<String> = self
            .products
            .data
            .iter()
            .flatten()
            .map(|p| p.category.to_lowercase())
            .collect();
        cats.sort();
        cats.dedup();
        cats
    }

    pub fn known_locations(&self) -> Vec<String> {
        let mut locs: Vec<String> = self
            .products
            .data
            .iter()
            .flatten()
            .map(|p| p.location.to_lowercase())
            .filter(|l| !l.is_empty())
            .collect();
        locs.sort();
        locs.dedup();
        locs
    }

    fn refresh_visible(&mut self) {
        let source = self.products.data.as_deref().unwrap_or(&[]);
        self.visible = filter::apply(source, &self.filter);
        if self.market_sel >= self.visible.len() {
            self.market_sel = self.visible.len().saturating_sub(1);
        }
    }

    /// Re-apply the pipeline locally AND refetch from the backend. Called on
    /// every single control interaction; there is deliberately no debounce.
    fn filter_changed(&mut self) {
        self.refresh_visible();
        self.refetch_products();
    }

    pub fn refetch_products(&mut self) {
        self.products_generation += 1;
        self.products.begin();
        self.dispatch(FetchRequest::Products {
            generation: self.products_generation,
            filter: self.filter.clone(),
        });
    }

    // ---- filter panel --------------------------------------------------

    pub fn open_filter_panel(&mut self) {
        self.input_mode = InputMode::FilterPanel;
    }

    pub fn close_filter_panel(&mut self) {
        self.input_mode = InputMode::Normal;
    }

    pub fn filter_row_count(&self) -> usize {
        FILTER_FIXED_ROWS + self.known_categories().len() + self.known_locations().len() + 1
    }

    pub fn filter_focus_up(&mut self) {
        let n = self.filter_row_count();
        self.filter_focus = (self.filter_focus + n - 1) % n;
    }

    pub fn filter_focus_down(&mut self) {
        self.filter_focus = (self.filter_focus + 1) % self.filter_row_count();
    }

    /// Space/Enter on the focused row: toggles and the clear-all action.
    pub fn filter_toggle(&mut self) {
        let cats = self.known_categories();
        let locs = self.known_locations();
        match self.filter_focus {
            0 => self.filter.sort = self.filter.sort.next(),
            3 => self.filter.verified_only = !self.filter.verified_only,
            4 => self.filter.organic_only = !self.filter.organic_only,
            5 => self.filter.freshness = self.filter.freshness.next(),
            6 => self.cycle_delivery(1),
            7 => {
                // min-rating rows handled by left/right, space resets
                self.filter.min_rating = None;
            }
            i if i >= FILTER_FIXED_ROWS && i < FILTER_FIXED_ROWS + cats.len() => {
                self.filter.toggle_category(&cats[i - FILTER_FIXED_ROWS]);
            }
            i if i >= FILTER_FIXED_ROWS + cats.len()
                && i < FILTER_FIXED_ROWS + cats.len() + locs.len() =>
            {
                self.filter.toggle_location(&locs[i - FILTER_FIXED_ROWS - cats.len()]);
            }
            i if i == FILTER_FIXED_ROWS + cats.len() + locs.len() => {
                self.clear_filters();
                return;
            }
            _ => return,
        }
        self.filter_changed();
    }

    /// Left/right on the focused row adjusts enums and numeric steppers.
    pub fn filter_adjust(&mut self, delta: i32) {
        match self.filter_focus {
            0 => self.filter.sort = self.filter.sort.next(),
            1 => {
                let cur = self.filter.min_price.unwrap_or(0.0);
                let next = (cur + delta as f64).max(0.0);
                self.filter.min_price = if next == 0.0 && delta < 0 { None } else { Some(next) };
            }
            2 => {
                let cur = self.filter.max_price.unwrap_or(0.0);
                let next = (cur + delta as f64).max(0.0);
                self.filter.max_price = if next == 0.0 && delta < 0 { None } else { Some(next) };
            }
            5 => self.filter.freshness = self.filter.freshness.next(),
            6 => self.cycle_delivery(delta),
            7 => {
                let cur = self.filter.min_rating.unwrap_or(0) as i32;
                let next = (cur + delta).clamp(0, 5);
                self.filter.min_rating = if next == 0 { None } else { Some(next as u8) };
            }
            _ => return,
        }
        self.filter_changed();
    }

    fn cycle_delivery(&mut self, delta: i32) {
        const ORDER: [Option<DeliveryWindow>; 4] = [
            None,
            Some(DeliveryWindow::SameDay),
            Some(DeliveryWindow::TwoDay),
            Some(DeliveryWindow::Standard),
        ];
        let idx = ORDER.iter().position(|w| *w == self.filter.delivery).unwrap_or(0) as i32;
        let next = (idx + delta).rem_euclid(ORDER.len() as i32) as usize;
        self.filter.delivery = ORDER[next];
    }

    /// Direct digit entry on the price rows. Values are parsed permissively;
    /// min <= max is not enforced before the snapshot is emitted.
    pub fn filter_input_char(&mut self, c: char) {
        let target = match self.filter_focus {
            1 => &mut self.filter.min_price,
            2 => &mut self.filter.max_price,
            _ => return,
        };
        if !c.is_ascii_digit() && c != '.' {
            return;
        }
        let mut text = target.map(|v| format_num(v)).unwrap_or_default();
        text.push(c);
        *target = text.parse::<f64>().ok();
        self.filter_changed();
    }

    pub fn filter_backspace(&mut self) {
        let target = match self.filter_focus {
            1 => &mut self.filter.min_price,
            2 => &mut self.filter.max_price,
            _ => return,
        };
        let mut text = target.map(|v| format_num(v)).unwrap_or_default();
        text.pop();
        *target = if text.is_empty() { None } else { text.parse::<f64>().ok() };
        self.filter_changed();
    }

    pub fn clear_filters(&mut self) {
        self.filter.clear();
        self.filter_changed();
    }

    // ---- search --------------------------------------------------------

    pub fn start_search(&mut self) {
        self.input_mode = InputMode::Search;
    }

    pub fn search_add_char(&mut self, c: char) {
        self.filter.search.push(c);
        self.filter_changed();
    }

    pub fn search_backspace(&mut self) {
        self.filter.search.pop();
        self.filter_changed();
    }

    pub fn accept_search(&mut self) {
        self.input_mode = InputMode::Normal;
    }

    pub fn cancel_search(&mut self) {
        self.filter.search.clear();
        self.input_mode = InputMode::Normal;
        self.filter_changed();
    }

    // ---- selection movement -------------------------------------------

    pub fn up(&mut self) {
        self.move_sel(-1);
    }

    pub fn down(&mut self) {
        self.move_sel(1);
    }

    fn move_sel(&mut self, delta: i64) {
        let (sel, len) = match (self.view, self.pay_tab) {
            (View::Market, _) => (&mut self.market_sel, self.visible.len()),
            (View::Cart, _) => (&mut self.cart_sel, self.cart.len()),
            (View::Payments, PayTab::Methods) => {
                (&mut self.methods_sel, self.methods.data.as_ref().map_or(0, Vec::len))
            }
            (View::Payments, PayTab::Payouts) => {
                (&mut self.payouts_sel, self.payouts.data.as_ref().map_or(0, Vec::len))
            }
            (View::Payments, PayTab::Invoices) => {
                (&mut self.invoices_sel, self.invoices.data.as_ref().map_or(0, Vec::len))
            }
            (View::Payments, PayTab::Transactions) => {
                (&mut self.transactions_sel, self.transactions.data.as_ref().map_or(0, Vec::len))
            }
            (View::Payments, PayTab::Notifications) => {
                (&mut self.notifications_sel, self.notifications.len())
            }
            _ => return,
        };
        if len == 0 {
            *sel = 0;
            return;
        }
        let next = (*sel as i64 + delta).rem_euclid(len as i64);
        *sel = next as usize;
    }

    pub fn methods_sel(&self) -> usize {
        self.methods_sel
    }
    pub fn payouts_sel(&self) -> usize {
        self.payouts_sel
    }
    pub fn invoices_sel(&self) -> usize {
        self.invoices_sel
    }
    pub fn transactions_sel(&self) -> usize {
        self.transactions_sel
    }

    // ---- cart ----------------------------------------------------------

    pub fn add_selected_to_cart(&mut self) {
        let Some(p) = self.selected_product().cloned() else {
            return;
        };
        if let Some(line) = self.cart.iter_mut().find(|l| l.product_id == p.id) {
            line.quantity += 1;
        } else {
            self.cart.push(CartLine {
                product_id: p.id.clone(),
                name: p.name.clone(),
                unit: p.unit.clone(),
                unit_price: p.price,
                quantity: 1,
            });
        }
        self.show_toast(format!("Added {} to cart", p.name), ToastKind::Success);
    }

    pub fn cart_increment(&mut self) {
        if let Some(line) = self.cart.get_mut(self.cart_sel) {
            line.quantity += 1;
        }
    }

    pub fn cart_decrement(&mut self) {
        if let Some(line) = self.cart.get_mut(self.cart_sel) {
            if line.quantity > 1 {
                line.quantity -= 1;
            } else {
                self.cart.remove(self.cart_sel);
                if self.cart_sel >= self.cart.len() {
                    self.cart_sel = self.cart.len().saturating_sub(1);
                }
            }
        }
    }

    pub fn cart_remove(&mut self) {
        if self.cart_sel < self.cart.len() {
            self.cart.remove(self.cart_sel);
            if self.cart_sel >= self.cart.len() {
                self.cart_sel = self.cart.len().saturating_sub(1);
            }
        }
    }

    pub fn cart_total(&self) -> f64 {
        self.cart.iter().map(|l| l.unit_price * l.quantity as f64).sum()
    }

    // ---- notifications (client-side only) ------------------------------

    pub fn set_notifications(&mut self, items: Vec<NotificationItem>) {
        self.notifications = items;
        self.notifications_sel = 0;
    }

    pub fn unread_count(&self) -> usize {
        self.notifications.iter().filter(|n| !n.read).count()
    }

    pub fn notification_mark_read(&mut self) {
        if let Some(n) = self.notifications.get_mut(self.notifications_sel) {
            n.read = true;
        }
    }

    pub fn notification_dismiss(&mut self) {
        if self.notifications_sel < self.notifications.len() {
            self.notifications.remove(self.notifications_sel);
            if self.notifications_sel >= self.notifications.len() {
                self.notifications_sel = self.notifications.len().saturating_sub(1);
            }
        }
    }

    pub fn notifications_mark_all_read(&mut self) {
        for n in &mut self.notifications {
            n.read = true;
        }
    }

    // ---- listing CRUD modals ------------------------------------------

    pub fn open_create_listing(&mut self) {
        self.product_form = ProductForm::default();
        self.input_mode = InputMode::ProductForm;
    }

    pub fn open_edit_listing(&mut self) {
        let Some(p) = self.selected_product() else {
            return;
        };
        self.product_form = ProductForm {
            draft: ProductDraft::from_product(p),
            editing_id: Some(p.id.clone()),
            focus: 0,
            image_path_input: String::new(),
        };
        self.input_mode = InputMode::ProductForm;
    }

    pub fn open_delete_listing(&mut self) {
        if let Some(p) = self.selected_product() {
            self.delete_target = Some(DeleteTarget::Product(p.id.clone()));
            self.input_mode = InputMode::ConfirmDelete;
        }
    }

    pub fn submit_product_form(&mut self) {
        let mut draft = self.product_form.draft.clone();
        let path = self.product_form.image_path_input.trim();
        if !path.is_empty() {
            draft.image_path = Some(PathBuf::from(path));
        }
        let req = match &self.product_form.editing_id {
            Some(id) => FetchRequest::UpdateProduct { id: id.clone(), draft },
            None => FetchRequest::CreateProduct { draft },
        };
        self.input_mode = InputMode::Normal;
        self.dispatch(req);
    }

    pub fn close_modal(&mut self) {
        self.input_mode = InputMode::Normal;
        self.delete_target = None;
    }

    pub fn confirm_delete(&mut self) {
        let Some(target) = self.delete_target.take() else {
            return;
        };
        self.input_mode = InputMode::Normal;
        match target {
            DeleteTarget::Product(id) => self.dispatch(FetchRequest::DeleteProduct { id }),
            DeleteTarget::Method(id) => self.dispatch(FetchRequest::DeletePaymentMethod { id }),
        }
    }

    // ---- payment method modals ----------------------------------------

    pub fn open_add_method(&mut self) {
        self.method_form = MethodForm::default();
        self.input_mode = InputMode::MethodForm;
    }

    pub fn open_edit_method(&mut self) {
        let Some(m) = self
            .methods
            .data
            .as_ref()
            .and_then(|ms| ms.get(self.methods_sel))
        else {
            return;
        };
        self.method_form = MethodForm {
            kind_idx: PaymentMethodKind::ALL.iter().position(|k| *k == m.kind).unwrap_or(0),
            draft: PaymentMethodDraft {
                kind: m.kind,
                label: m.label.clone(),
                account_number: String::new(),
                bank_code: m.bank_code.clone().unwrap_or_default(),
            },
            editing_id: Some(m.id.clone()),
            step: 1,
            code: String::new(),
            focus: 0,
        };
        self.input_mode = InputMode::MethodForm;
    }

    pub fn open_delete_method(&mut self) {
        if let Some(m) = self.methods.data.as_ref().and_then(|ms| ms.get(self.methods_sel)) {
            self.delete_target = Some(DeleteTarget::Method(m.id.clone()));
            self.input_mode = InputMode::ConfirmDelete;
        }
    }

    pub fn open_verify_method(&mut self) {
        let Some(m) = self.methods.data.as_ref().and_then(|ms| ms.get(self.methods_sel)) else {
            return;
        };
        if m.verified {
            self.show_toast("Method is already verified", ToastKind::Success);
            return;
        }
        self.method_form = MethodForm {
            editing_id: Some(m.id.clone()),
            step: 2,
            ..MethodForm::default()
        };
        self.input_mode = InputMode::MethodForm;
    }

    pub fn method_form_cycle_kind(&mut self, delta: i32) {
        if self.method_form.step != 0 {
            return;
        }
        let n = PaymentMethodKind::ALL.len() as i32;
        let next = (self.method_form.kind_idx as i32 + delta).rem_euclid(n) as usize;
        self.method_form.kind_idx = next;
        self.method_form.draft.kind = PaymentMethodKind::ALL[next];
    }

    /// Enter on the method form: forward through the step sequence.
    pub fn method_form_advance(&mut self) {
        match self.method_form.step {
            0 => self.method_form.step = 1,
            1 => {
                let draft = self.method_form.draft.clone();
                let req = match &self.method_form.editing_id {
                    Some(id) => FetchRequest::UpdatePaymentMethod { id: id.clone(), draft },
                    None => FetchRequest::AddPaymentMethod { draft },
                };
                self.input_mode = InputMode::Normal;
                self.dispatch(req);
            }
            _ => {
                let Some(id) = self.method_form.editing_id.clone() else {
                    self.input_mode = InputMode::Normal;
                    return;
                };
                let code = self.method_form.code.clone();
                self.input_mode = InputMode::Normal;
                self.dispatch(FetchRequest::VerifyPaymentMethod { id, code });
            }
        }
    }

    /// Esc on the method form: back one step, closing from the first.
    pub fn method_form_back(&mut self) {
        match self.method_form.step {
            0 | 2 => self.input_mode = InputMode::Normal,
            _ => {
                if self.method_form.editing_id.is_some() {
                    self.input_mode = InputMode::Normal;
                } else {
                    self.method_form.step = 0;
                }
            }
        }
    }

    // ---- payout / invoice modals --------------------------------------

    pub fn open_request_payout(&mut self) {
        self.payout_form = PayoutForm::default();
        self.input_mode = InputMode::PayoutForm;
        if self.methods.data.is_none() && !self.methods.loading {
            self.methods.begin();
            self.dispatch(FetchRequest::PaymentMethods);
        }
    }

    pub fn payout_form_cycle_method(&mut self, delta: i32) {
        let n = self.methods.data.as_ref().map_or(0, Vec::len) as i32;
        if n == 0 {
            return;
        }
        self.payout_form.method_idx =
            (self.payout_form.method_idx as i32 + delta).rem_euclid(n) as usize;
    }

    pub fn payout_form_advance(&mut self) {
        match self.payout_form.step {
            0 => self.payout_form.step = 1,
            _ => {
                let amount = self.payout_form.amount.trim().parse::<f64>().unwrap_or(0.0);
                let Some(method_id) = self
                    .methods
                    .data
                    .as_ref()
                    .and_then(|ms| ms.get(self.payout_form.method_idx))
                    .map(|m| m.id.clone())
                else {
                    self.show_toast("No payout method available", ToastKind::Error);
                    self.input_mode = InputMode::Normal;
                    return;
                };
                self.input_mode = InputMode::Normal;
                self.dispatch(FetchRequest::RequestPayout { amount, method_id });
            }
        }
    }

    pub fn payout_form_back(&mut self) {
        if self.payout_form.step > 0 {
            self.payout_form.step -= 1;
        } else {
            self.input_mode = InputMode::Normal;
        }
    }

    pub fn process_selected_payout(&mut self) {
        let Some(p) = self.payouts.data.as_ref().and_then(|ps| ps.get(self.payouts_sel)) else {
            return;
        };
        if p.status != PayoutStatus::Pending {
            self.show_toast("Only pending payouts can be processed", ToastKind::Error);
            return;
        }
        let id = p.id.clone();
        self.dispatch(FetchRequest::ProcessPayout { id });
    }

    pub fn open_create_invoice(&mut self) {
        self.invoice_form = InvoiceForm::default();
        if let Some(order) = &self.session.last_order_id {
            self.invoice_form.draft.order_id = order.clone();
        }
        self.input_mode = InputMode::InvoiceForm;
    }

    pub fn submit_invoice_form(&mut self) {
        let draft = self.invoice_form.draft.clone();
        self.input_mode = InputMode::Normal;
        self.dispatch(FetchRequest::CreateInvoice { draft });
    }

    /// Generate an invoice for the most recent order, if one is on file.
    pub fn generate_invoice_for_last_order(&mut self) {
        match self.session.last_order_id.clone() {
            Some(order_id) => self.dispatch(FetchRequest::GenerateInvoice { order_id }),
            None => self.show_toast("No recent order on file", ToastKind::Error),
        }
    }

    pub fn send_selected_invoice(&mut self) {
        let Some(inv) = self.invoices.data.as_ref().and_then(|is| is.get(self.invoices_sel))
        else {
            return;
        };
        if inv.status == InvoiceStatus::Paid {
            self.show_toast("Invoice is already paid", ToastKind::Error);
            return;
        }
        let id = inv.id.clone();
        self.dispatch(FetchRequest::SendInvoice { id });
    }

    // ---- copy ----------------------------------------------------------

    pub fn copy_content(&self) -> Option<String> {
        match (self.view, self.pay_tab) {
            (View::Market, _) => self.selected_product().map(|p| p.id.clone()),
            (View::Cart, _) => self.session.last_order_id.clone(),
            (View::Payments, PayTab::Invoices) => self
                .invoices
                .data
                .as_ref()
                .and_then(|is| is.get(self.invoices_sel))
                .map(|i| i.id.clone()),
            (View::Payments, PayTab::Payouts) => self
                .payouts
                .data
                .as_ref()
                .and_then(|ps| ps.get(self.payouts_sel))
                .map(|p| p.id.clone()),
            (View::Payments, PayTab::Transactions) => self
                .transactions
                .data
                .as_ref()
                .and_then(|ts| ts.get(self.transactions_sel))
                .map(|t| t.id.clone()),
            _ => None,
        }
    }

    // ---- dispatch / events --------------------------------------------

    /// Demo mode answers from the built-in datasets; live mode hands the
    /// request to the network worker.
    fn dispatch(&mut self, req: FetchRequest) {
        if self.demo {
            let ev = self.demo_event(req);
            self.on_event(ev);
        } else {
            let _ = self.fetch_tx.send(req);
        }
    }

    fn demo_event(&mut self, req: FetchRequest) -> AppEvent {
        self.demo_seq += 1;
        let seq = self.demo_seq;
        match req {
            FetchRequest::Products { generation, .. } => AppEvent::ProductsLoaded {
                generation,
                outcome: Ok(mock::sample_products()),
            },
            FetchRequest::Overview => AppEvent::OverviewLoaded(Ok(mock::sample_overview())),
            FetchRequest::Analytics { range } => {
                AppEvent::AnalyticsLoaded(Ok(mock::sample_analytics(range)))
            }
            FetchRequest::Reports { period } => {
                AppEvent::ReportsLoaded(Ok(mock::sample_reports(period)))
            }
            FetchRequest::Transactions { range } => {
                AppEvent::TransactionsLoaded(Ok(mock::sample_transactions(range)))
            }
            FetchRequest::PaymentMethods => {
                AppEvent::PaymentMethodsLoaded(Ok(mock::sample_payment_methods()))
            }
            FetchRequest::Payouts => AppEvent::PayoutsLoaded(Ok(mock::sample_payouts())),
            FetchRequest::Invoices => AppEvent::InvoicesLoaded(Ok(mock::sample_invoices())),
            FetchRequest::Banks => AppEvent::BanksLoaded(Ok(mock::sample_banks())),
            FetchRequest::CreateProduct { draft } => {
                AppEvent::ProductCreated(Ok(demo_product(&draft, seq)))
            }
            FetchRequest::UpdateProduct { id, draft } => {
                let mut p = demo_product(&draft, seq);
                p.id = id;
                AppEvent::ProductUpdated(Ok(p))
            }
            FetchRequest::DeleteProduct { id } => {
                AppEvent::ProductDeleted { id, outcome: Ok(()) }
            }
            FetchRequest::AddPaymentMethod { draft } => {
                AppEvent::PaymentMethodSaved(Ok(demo_method(&draft, format!("pm-demo-{seq}"))))
            }
            FetchRequest::UpdatePaymentMethod { id, draft } => {
                AppEvent::PaymentMethodSaved(Ok(demo_method(&draft, id)))
            }
            FetchRequest::DeletePaymentMethod { id } => {
                AppEvent::PaymentMethodDeleted { id, outcome: Ok(()) }
            }
            FetchRequest::VerifyPaymentMethod { id, .. } => {
                let found = self
                    .methods
                    .data
                    .iter()
                    .flatten()
                    .find(|m| m.id == id)
                    .cloned();
                match found {
                    Some(mut m) => {
                        m.verified = true;
                        AppEvent::PaymentMethodVerified(Ok(m))
                    }
                    None => AppEvent::PaymentMethodVerified(Err("Unknown method".to_string())),
                }
            }
            FetchRequest::RequestPayout { amount, method_id } => {
                AppEvent::PayoutRequested(Ok(Payout {
                    id: format!("po-demo-{seq}"),
                    amount,
                    method_id,
                    status: PayoutStatus::Pending,
                    requested_at: chrono::Utc::now(),
                    processed_at: None,
                }))
            }
            FetchRequest::ProcessPayout { id } => {
                let found = self.payouts.data.iter().flatten().find(|p| p.id == id).cloned();
                match found {
                    Some(mut p) => {
                        p.status = PayoutStatus::Processing;
                        AppEvent::PayoutProcessed(Ok(p))
                    }
                    None => AppEvent::PayoutProcessed(Err("Unknown payout".to_string())),
                }
            }
            FetchRequest::CreateInvoice { draft } => AppEvent::InvoiceSaved(Ok(Invoice {
                id: format!("inv-demo-{seq}"),
                order_id: draft.order_id,
                customer: draft.customer,
                amount: draft.amount.trim().parse().unwrap_or(0.0),
                status: InvoiceStatus::Draft,
                issued_at: chrono::Utc::now(),
                due_date: draft.due_date.trim().parse().ok(),
            })),
            FetchRequest::GenerateInvoice { order_id } => AppEvent::InvoiceSaved(Ok(Invoice {
                id: format!("inv-demo-{seq}"),
                order_id,
                customer: "Marketplace buyer".to_string(),
                amount: 0.0,
                status: InvoiceStatus::Draft,
                issued_at: chrono::Utc::now(),
                due_date: None,
            })),
            FetchRequest::SendInvoice { id } => {
                let found = self.invoices.data.iter().flatten().find(|i| i.id == id).cloned();
                match found {
                    Some(mut i) => {
                        i.status = InvoiceStatus::Sent;
                        AppEvent::InvoiceSent(Ok(i))
                    }
                    None => AppEvent::InvoiceSent(Err("Unknown invoice".to_string())),
                }
            }
        }
    }

    pub fn on_event(&mut self, ev: AppEvent) {
        match ev {
            AppEvent::Quit => self.quit = true,

            AppEvent::ProductsLoaded { generation, outcome } => {
                // A newer snapshot has been issued since this request left;
                // applying it would overwrite fresh state with stale rows.
                if generation != self.products_generation {
                    self.log_debug(format!(
                        "drop stale products response gen={generation} current={}",
                        self.products_generation
                    ));
                    return;
                }
                self.products.resolve(outcome);
                self.refresh_visible();
            }

            AppEvent::OverviewLoaded(outcome) => self.overview.resolve(outcome),
            AppEvent::AnalyticsLoaded(outcome) => self.analytics.resolve(outcome),
            AppEvent::ReportsLoaded(outcome) => self.reports.resolve(outcome),
            AppEvent::TransactionsLoaded(outcome) => self.transactions.resolve(outcome),
            AppEvent::PaymentMethodsLoaded(outcome) => self.methods.resolve(outcome),
            AppEvent::PayoutsLoaded(outcome) => self.payouts.resolve(outcome),
            AppEvent::InvoicesLoaded(outcome) => self.invoices.resolve(outcome),
            AppEvent::BanksLoaded(outcome) => self.banks.resolve(outcome),

            AppEvent::ProductCreated(outcome) => match outcome {
                Ok(p) => {
                    // Optimistic prepend, then reconcile with the server's
                    // persisted list.
                    let name = p.name.clone();
                    self.products.data.get_or_insert_with(Vec::new).insert(0, p);
                    self.refresh_visible();
                    self.show_toast(format!("Listing {name} created"), ToastKind::Success);
                    if !self.demo {
                        self.refetch_products();
                    }
                }
                Err(msg) => self.show_toast(msg, ToastKind::Error),
            },

            AppEvent::ProductUpdated(outcome) => match outcome {
                Ok(p) => {
                    if let Some(list) = &mut self.products.data {
                        if let Some(slot) = list.iter_mut().find(|x| x.id == p.id) {
                            *slot = p.clone();
                        }
                    }
                    self.refresh_visible();
                    self.show_toast(format!("Listing {} updated", p.name), ToastKind::Success);
                    if !self.demo {
                        self.refetch_products();
                    }
                }
                Err(msg) => self.show_toast(msg, ToastKind::Error),
            },

            AppEvent::ProductDeleted { id, outcome } => match outcome {
                Ok(()) => {
                    if let Some(list) = &mut self.products.data {
                        list.retain(|p| p.id != id);
                    }
                    self.refresh_visible();
                    self.show_toast("Listing deleted", ToastKind::Success);
                    if !self.demo {
                        self.refetch_products();
                    }
                }
                Err(msg) => self.show_toast(msg, ToastKind::Error),
            },

            AppEvent::PaymentMethodSaved(outcome) => match outcome {
                Ok(m) => {
                    let list = self.methods.data.get_or_insert_with(Vec::new);
                    match list.iter_mut().find(|x| x.id == m.id) {
                        Some(slot) => *slot = m,
                        None => list.push(m),
                    }
                    self.show_toast("Payment method saved", ToastKind::Success);
                }
                Err(msg) => self.show_toast(msg, ToastKind::Error),
            },

            AppEvent::PaymentMethodDeleted { id, outcome } => match outcome {
                Ok(()) => {
                    if let Some(list) = &mut self.methods.data {
                        list.retain(|m| m.id != id);
                        if self.methods_sel >= list.len() {
                            self.methods_sel = list.len().saturating_sub(1);
                        }
                    }
                    self.show_toast("Payment method removed", ToastKind::Success);
                }
                Err(msg) => self.show_toast(msg, ToastKind::Error),
            },

            AppEvent::PaymentMethodVerified(outcome) => match outcome {
                Ok(m) => {
                    if let Some(list) = &mut self.methods.data {
                        if let Some(slot) = list.iter_mut().find(|x| x.id == m.id) {
                            *slot = m;
                        }
                    }
                    self.show_toast("Payment method verified", ToastKind::Success);
                }
                Err(msg) => self.show_toast(msg, ToastKind::Error),
            },

            AppEvent::PayoutRequested(outcome) => match outcome {
                Ok(p) => {
                    let amount = p.amount;
                    self.payouts.data.get_or_insert_with(Vec::new).insert(0, p);
                    self.show_toast(
                        format!("Payout of {} requested", crate::util_text::format_money(amount)),
                        ToastKind::Success,
                    );
                }
                Err(msg) => self.show_toast(msg, ToastKind::Error),
            },

            AppEvent::PayoutProcessed(outcome) => match outcome {
                Ok(p) => {
                    if let Some(list) = &mut self.payouts.data {
                        if let Some(slot) = list.iter_mut().find(|x| x.id == p.id) {
                            *slot = p;
                        }
                    }
                    self.show_toast("Payout processing", ToastKind::Success);
                }
                Err(msg) => self.show_toast(msg, ToastKind::Error),
            },

            AppEvent::InvoiceSaved(outcome) => match outcome {
                Ok(inv) => {
                    let id = inv.id.clone();
                    let list = self.invoices.data.get_or_insert_with(Vec::new);
                    match list.iter_mut().find(|x| x.id == inv.id) {
                        Some(slot) => *slot = inv,
                        None => list.insert(0, inv),
                    }
                    self.show_toast(format!("Invoice {id} saved"), ToastKind::Success);
                }
                Err(msg) => self.show_toast(msg, ToastKind::Error),
            },

            AppEvent::InvoiceSent(outcome) => match outcome {
                Ok(inv) => {
                    if let Some(list) = &mut self.invoices.data {
                        if let Some(slot) = list.iter_mut().find(|x| x.id == inv.id) {
                            *slot = inv;
                        }
                    }
                    self.show_toast("Invoice sent", ToastKind::Success);
                }
                Err(msg) => self.show_toast(msg, ToastKind::Error),
            },
        }
    }
}

fn format_num(v: f64) -> String {
    if v.fract() == 0.0 {
        format!("{}", v as i64)
    } else {
        format!("{v}")
    }
}

fn demo_product(draft: &ProductDraft, seq: u64) -> Product {
    Product {
        id: format!("p-demo-{seq}"),
        name: draft.title.clone(),
        description: draft.description.clone(),
        price: draft.price.trim().parse().unwrap_or(0.0),
        unit: if draft.unit.is_empty() { "kg".to_string() } else { draft.unit.clone() },
        quantity: draft.quantity.trim().parse().unwrap_or(0),
        category: draft.category.clone(),
        farmer: "You".to_string(),
        location: String::new(),
        rating: 0.0,
        verified: false,
        organic: draft.organic,
        harvest_date: draft.harvest_date.trim().parse().ok(),
        delivery: DeliveryWindow::Standard,
        image_url: None,
        active: true,
    }
}

fn demo_method(draft: &PaymentMethodDraft, id: String) -> PaymentMethod {
    let digits: String = draft
        .account_number
        .chars()
        .filter(|c| c.is_ascii_digit())
        .collect();
    let suffix = digits
        .chars()
        .rev()
        .take(4)
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .collect();
    PaymentMethod {
        id,
        kind: draft.kind,
        label: draft.label.clone(),
        account_suffix: suffix,
        bank_code: if draft.bank_code.is_empty() { None } else { Some(draft.bank_code.clone()) },
        verified: false,
        is_default: false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NotificationKind;
    use tokio::sync::mpsc::unbounded_channel;

    fn test_app(demo: bool) -> App {
        let (tx, _rx) = unbounded_channel();
        let mut app = App::new(Theme::default(), 30, vec![20, 30, 60], demo, Session::default(), tx);
        if demo {
            app.start();
        }
        app
    }

    fn loaded_app() -> App {
        let mut app = test_app(false);
        app.on_event(AppEvent::ProductsLoaded {
            generation: app.products_generation,
            outcome: Ok(mock::sample_products()),
        });
        app
    }

    #[test]
    fn stale_product_response_is_dropped() {
        let mut app = test_app(false);
        app.refetch_products(); // generation 1
        let stale_gen = app.products_generation;
        app.refetch_products(); // generation 2

        app.on_event(AppEvent::ProductsLoaded {
            generation: stale_gen,
            outcome: Ok(vec![]),
        });
        // The stale empty reply must not have been applied.
        assert!(app.products.data.is_none());

        app.on_event(AppEvent::ProductsLoaded {
            generation: app.products_generation,
            outcome: Ok(mock::sample_products()),
        });
        assert!(app.products.data.is_some());
        assert!(!app.visible_products().is_empty());
    }

    #[test]
    fn create_success_prepends_then_error_leaves_list_untouched() {
        let mut app = loaded_app();
        let before = app.products.data.as_ref().unwrap().len();

        let mut p = mock::sample_products()[0].clone();
        p.id = "p-new".to_string();
        p.name = "Purple Basil".to_string();
        app.on_event(AppEvent::ProductCreated(Ok(p)));
        let list = app.products.data.as_ref().unwrap();
        assert_eq!(list.len(), before + 1);
        assert_eq!(list[0].id, "p-new");

        app.on_event(AppEvent::ProductCreated(Err("stock limit reached".to_string())));
        assert_eq!(app.products.data.as_ref().unwrap().len(), before + 1);
        let (msg, kind) = app.toast().unwrap();
        assert_eq!(msg, "stock limit reached");
        assert_eq!(kind, ToastKind::Error);
    }

    #[test]
    fn update_replaces_in_place_and_delete_filters_out() {
        let mut app = loaded_app();
        let mut target = app.products.data.as_ref().unwrap()[2].clone();
        let id = target.id.clone();
        target.name = "Renamed".to_string();

        app.on_event(AppEvent::ProductUpdated(Ok(target)));
        let pos = app
            .products
            .data
            .as_ref()
            .unwrap()
            .iter()
            .position(|p| p.id == id)
            .unwrap();
        assert_eq!(pos, 2);
        assert_eq!(app.products.data.as_ref().unwrap()[2].name, "Renamed");

        app.on_event(AppEvent::ProductDeleted { id: id.clone(), outcome: Ok(()) });
        assert!(app.products.data.as_ref().unwrap().iter().all(|p| p.id != id));
    }

    #[test]
    fn fetch_error_sets_banner_but_keeps_old_data() {
        let mut app = loaded_app();
        let before = app.products.data.as_ref().unwrap().len();
        app.refetch_products();
        app.on_event(AppEvent::ProductsLoaded {
            generation: app.products_generation,
            outcome: Err("HTTP 503 Service Unavailable".to_string()),
        });
        assert_eq!(app.products.error.as_deref(), Some("HTTP 503 Service Unavailable"));
        assert_eq!(app.products.data.as_ref().unwrap().len(), before);
    }

    #[test]
    fn toast_expires_after_ttl() {
        let mut app = test_app(false);
        app.show_toast("saved", ToastKind::Success);
        assert!(app.toast().is_some());
        if let Some(t) = &mut app.toast {
            t.shown_at = Instant::now() - Duration::from_secs(4);
        }
        assert!(app.toast().is_none());
    }

    #[test]
    fn cart_add_increments_existing_line() {
        let mut app = loaded_app();
        app.add_selected_to_cart();
        app.add_selected_to_cart();
        assert_eq!(app.cart().len(), 1);
        assert_eq!(app.cart()[0].quantity, 2);

        app.cart_decrement();
        app.cart_decrement();
        assert!(app.cart().is_empty());
    }

    #[test]
    fn cart_total_sums_line_prices() {
        let mut app = loaded_app();
        app.add_selected_to_cart();
        let unit = app.cart()[0].unit_price;
        app.cart_increment();
        assert!((app.cart_total() - unit * 2.0).abs() < 1e-9);
    }

    #[test]
    fn notification_state_is_client_side() {
        let mut app = test_app(false);
        app.set_notifications(mock::sample_notifications());
        let n = app.notifications().len();
        assert!(app.unread_count() > 0);

        app.notification_mark_read();
        assert_eq!(app.unread_count(), n - 1);

        app.notification_dismiss();
        assert_eq!(app.notifications().len(), n - 1);

        app.notifications_mark_all_read();
        assert_eq!(app.unread_count(), 0);
    }

    #[test]
    fn clear_filters_restores_all_products() {
        let mut app = loaded_app();
        let all = app.visible_products().len();
        app.filter.search = "tomato".to_string();
        app.filter.organic_only = true;
        app.refresh_visible();
        assert!(app.visible_products().len() < all);

        app.clear_filters();
        assert_eq!(app.visible_products().len(), all);
    }

    #[test]
    fn demo_mode_serves_sample_data_synchronously() {
        let mut app = test_app(true);
        assert!(app.products.data.is_some());
        app.enter_pay_tab(PayTab::Payouts);
        assert!(app.payouts.data.is_some());
    }

    #[test]
    fn demo_verify_marks_method_verified() {
        let mut app = test_app(true);
        app.enter_pay_tab(PayTab::Methods);
        let unverified = app
            .methods
            .data
            .as_ref()
            .unwrap()
            .iter()
            .position(|m| !m.verified)
            .unwrap();
        app.methods_sel = unverified;
        app.open_verify_method();
        app.method_form.code = "123456".to_string();
        app.method_form_advance();
        assert!(app.methods.data.as_ref().unwrap()[unverified].verified);
    }

    #[test]
    fn method_form_steps_go_forward_and_back() {
        let mut app = test_app(false);
        app.open_add_method();
        assert_eq!(app.method_form.step, 0);
        app.method_form_advance();
        assert_eq!(app.method_form.step, 1);
        app.method_form_back();
        assert_eq!(app.method_form.step, 0);
        app.method_form_back();
        assert_eq!(app.input_mode(), InputMode::Normal);
    }

    #[test]
    fn generate_invoice_requires_last_order() {
        let mut app = test_app(false);
        app.generate_invoice_for_last_order();
        let (msg, kind) = app.toast().unwrap();
        assert_eq!(kind, ToastKind::Error);
        assert!(msg.contains("No recent order"));
    }

    #[test]
    fn filter_price_entry_is_permissive_about_inversion() {
        let mut app = loaded_app();
        app.filter_focus = 1; // min price
        app.filter_input_char('9');
        app.filter_input_char('9');
        app.filter_focus = 2; // max price
        app.filter_input_char('1');
        assert_eq!(app.filter.min_price, Some(99.0));
        assert_eq!(app.filter.max_price, Some(1.0));
        // Inverted range: nothing matches, nothing panics.
        assert!(app.visible_products().is_empty());
    }

    #[test]
    fn search_keystrokes_refetch_without_debounce() {
        let (tx, mut rx) = unbounded_channel();
        let mut app = App::new(Theme::default(), 30, vec![30], false, Session::default(), tx);
        app.start_search();
        app.search_add_char('k');
        app.search_add_char('a');
        let mut issued = 0;
        while rx.try_recv().is_ok() {
            issued += 1;
        }
        // One request per keystroke.
        assert_eq!(issued, 2);
    }

    #[test]
    fn unknown_notification_kind_not_needed_for_dismiss_all() {
        // Guard against index drift when dismissing the last row.
        let mut app = test_app(false);
        app.set_notifications(vec![NotificationItem {
            id: "n-x".to_string(),
            kind: NotificationKind::Info,
            message: "only one".to_string(),
            created_at: chrono::Utc::now(),
            read: false,
        }]);
        app.notification_dismiss();
        assert!(app.notifications().is_empty());
        app.notification_dismiss();
        assert!(app.notifications().is_empty());
    }
}
