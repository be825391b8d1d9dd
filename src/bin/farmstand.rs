// Terminal UI entry point for the marketplace storefront.

use anyhow::{Context, Result};
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::{
    io,
    sync::Arc,
    time::{Duration, Instant},
};
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver};

use farmstand::{
    api::MarketApi,
    app::{App, InputMode, InvoiceForm, MethodForm, PayTab, ProductForm, ToastKind, View},
    clipboard, config, net, session,
    types::{AppEvent, FetchRequest},
    ui,
};

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();

    let cfg = config::load().context("Failed to load configuration")?;
    let sess = session::load(&cfg.session_path);

    // app + channels
    let (event_tx, event_rx) = unbounded_channel::<AppEvent>();
    let (fetch_tx, fetch_rx) = unbounded_channel::<FetchRequest>();

    // network worker (skipped entirely in demo mode)
    let worker = if cfg.demo {
        None
    } else {
        let api = Arc::new(MarketApi::new(
            &cfg.api_url,
            cfg.timeout_ms,
            sess.token().map(str::to_string),
        ));
        Some(tokio::spawn(net::run_fetch_worker(api, fetch_rx, event_tx.clone())))
    };

    // terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let mut app = App::new(
        cfg.theme,
        cfg.render_fps,
        cfg.render_fps_choices.clone(),
        cfg.demo,
        sess,
        fetch_tx,
    );
    app.start();

    let res = run_loop(&mut app, &mut terminal, event_rx).await;

    // cleanup
    if let Some(task) = worker {
        task.abort();
    }
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    res
}

async fn run_loop(
    app: &mut App,
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    mut rx: UnboundedReceiver<AppEvent>,
) -> Result<()> {
    let mut last_frame = Instant::now();
    loop {
        // frame budget (coalesced renders)
        let frame_ms = 1000u32.saturating_div(app.fps()) as u64;
        let budget = Duration::from_millis(frame_ms.max(1));
        let wait = budget.saturating_sub(last_frame.elapsed());

        if event::poll(wait)? {
            if let Event::Key(k) = event::read()? {
                if k.kind == KeyEventKind::Press || k.kind == KeyEventKind::Repeat {
                    handle_key(app, k);
                }
            }
        }
        while let Ok(ev) = rx.try_recv() {
            app.on_event(ev);
        }

        if last_frame.elapsed() >= budget {
            terminal.draw(|f| ui::draw(f, app))?;
            last_frame = Instant::now();
        }
        if app.quit_flag() {
            break;
        }
    }
    Ok(())
}

fn handle_key(app: &mut App, k: KeyEvent) {
    // Ctrl+C quits from any mode
    if k.code == KeyCode::Char('c') && k.modifiers.contains(KeyModifiers::CONTROL) {
        app.on_event(AppEvent::Quit);
        return;
    }

    match app.input_mode() {
        InputMode::Search => match k.code {
            KeyCode::Char(c) => app.search_add_char(c),
            KeyCode::Backspace => app.search_backspace(),
            KeyCode::Enter => app.accept_search(),
            KeyCode::Esc => app.cancel_search(),
            _ => {}
        },
        InputMode::FilterPanel => match k.code {
            KeyCode::Up => app.filter_focus_up(),
            KeyCode::Down => app.filter_focus_down(),
            KeyCode::Left => app.filter_adjust(-1),
            KeyCode::Right => app.filter_adjust(1),
            KeyCode::Char(' ') | KeyCode::Enter => app.filter_toggle(),
            KeyCode::Char(c) if c.is_ascii_digit() || c == '.' => app.filter_input_char(c),
            KeyCode::Backspace => app.filter_backspace(),
            KeyCode::Esc | KeyCode::Char('f') => app.close_filter_panel(),
            _ => {}
        },
        InputMode::ProductForm => product_form_key(app, k),
        InputMode::MethodForm => method_form_key(app, k),
        InputMode::PayoutForm => payout_form_key(app, k),
        InputMode::InvoiceForm => invoice_form_key(app, k),
        InputMode::ConfirmDelete => match k.code {
            KeyCode::Char('y') | KeyCode::Char('Y') => app.confirm_delete(),
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => app.close_modal(),
            _ => {}
        },
        InputMode::Normal => normal_key(app, k),
    }
}

fn normal_key(app: &mut App, k: KeyEvent) {
    match (k.code, k.modifiers) {
        (KeyCode::Char('q'), _) => app.on_event(AppEvent::Quit),
        (KeyCode::Char('o'), KeyModifiers::CONTROL) => app.cycle_fps(),
        (KeyCode::Char('d'), KeyModifiers::CONTROL) => app.toggle_debug_panel(),

        (KeyCode::Char('1'), _) => app.set_view(View::Market),
        (KeyCode::Char('2'), _) => app.set_view(View::Cart),
        (KeyCode::Char('3'), _) => app.set_view(View::Payments),

        (KeyCode::Tab, _) if app.view() == View::Payments => app.next_pay_tab(),
        (KeyCode::BackTab, _) if app.view() == View::Payments => app.prev_pay_tab(),

        (KeyCode::Up, _) => app.up(),
        (KeyCode::Down, _) => app.down(),

        (KeyCode::Char('/'), _) => app.start_search(),
        (KeyCode::Char('f'), _) if app.view() == View::Market => app.open_filter_panel(),
        (KeyCode::Esc, _) if app.view() == View::Market => app.clear_filters(),

        (KeyCode::Char('a'), _) if app.view() == View::Market => app.add_selected_to_cart(),
        (KeyCode::Char('a'), _)
            if app.view() == View::Payments && app.pay_tab() == PayTab::Notifications =>
        {
            app.notifications_mark_all_read()
        }

        (KeyCode::Char('+'), _) | (KeyCode::Char('='), _) if app.view() == View::Cart => {
            app.cart_increment()
        }
        (KeyCode::Char('-'), _) if app.view() == View::Cart => app.cart_decrement(),

        (KeyCode::Char('n'), _) => match (app.view(), app.pay_tab()) {
            (View::Market, _) => app.open_create_listing(),
            (View::Payments, PayTab::Methods) => app.open_add_method(),
            (View::Payments, PayTab::Payouts) => app.open_request_payout(),
            (View::Payments, PayTab::Invoices) => app.open_create_invoice(),
            _ => {}
        },
        (KeyCode::Char('e'), _) => match (app.view(), app.pay_tab()) {
            (View::Market, _) => app.open_edit_listing(),
            (View::Payments, PayTab::Methods) => app.open_edit_method(),
            _ => {}
        },
        (KeyCode::Char('d'), _) => match (app.view(), app.pay_tab()) {
            (View::Market, _) => app.open_delete_listing(),
            (View::Cart, _) => app.cart_remove(),
            (View::Payments, PayTab::Methods) => app.open_delete_method(),
            (View::Payments, PayTab::Notifications) => app.notification_dismiss(),
            _ => {}
        },
        (KeyCode::Char('v'), _)
            if app.view() == View::Payments && app.pay_tab() == PayTab::Methods =>
        {
            app.open_verify_method()
        }
        (KeyCode::Char('p'), _) if app.view() == View::Payments => match app.pay_tab() {
            PayTab::Payouts => app.process_selected_payout(),
            PayTab::Reports => app.cycle_report_period(),
            _ => {}
        },
        (KeyCode::Char('r'), _) if app.view() == View::Payments => app.cycle_range(),
        (KeyCode::Char('s'), _)
            if app.view() == View::Payments && app.pay_tab() == PayTab::Invoices =>
        {
            app.send_selected_invoice()
        }
        (KeyCode::Char('g'), _)
            if app.view() == View::Payments && app.pay_tab() == PayTab::Invoices =>
        {
            app.generate_invoice_for_last_order()
        }
        (KeyCode::Enter, _)
            if app.view() == View::Payments && app.pay_tab() == PayTab::Notifications =>
        {
            app.notification_mark_read()
        }

        (KeyCode::Char('c'), _) => match app.copy_content() {
            Some(content) => {
                if clipboard::copy_to_clipboard(&content) {
                    app.show_toast(format!("Copied {content}"), ToastKind::Success);
                } else {
                    app.show_toast("Copy failed", ToastKind::Error);
                }
            }
            None => app.show_toast("Nothing to copy here", ToastKind::Error),
        },
        _ => {}
    }
}

fn product_form_key(app: &mut App, k: KeyEvent) {
    match k.code {
        KeyCode::Up => {
            let rows = ProductForm::ROWS;
            app.product_form.focus = (app.product_form.focus + rows - 1) % rows;
        }
        KeyCode::Down | KeyCode::Tab => {
            app.product_form.focus = (app.product_form.focus + 1) % ProductForm::ROWS;
        }
        KeyCode::Char(' ') if app.product_form.focus == ProductForm::FIELDS.len() => {
            app.product_form.draft.organic = !app.product_form.draft.organic;
        }
        KeyCode::Char(c) => {
            if let Some(field) = app.product_form.field_mut() {
                field.push(c);
            }
        }
        KeyCode::Backspace => {
            if let Some(field) = app.product_form.field_mut() {
                field.pop();
            }
        }
        KeyCode::Enter => app.submit_product_form(),
        KeyCode::Esc => app.close_modal(),
        _ => {}
    }
}

fn method_form_key(app: &mut App, k: KeyEvent) {
    match (app.method_form.step, k.code) {
        (0, KeyCode::Left) => app.method_form_cycle_kind(-1),
        (0, KeyCode::Right) => app.method_form_cycle_kind(1),
        (1, KeyCode::Up) => {
            let rows = MethodForm::DETAIL_FIELDS.len();
            app.method_form.focus = (app.method_form.focus + rows - 1) % rows;
        }
        (1, KeyCode::Down) | (1, KeyCode::Tab) => {
            app.method_form.focus = (app.method_form.focus + 1) % MethodForm::DETAIL_FIELDS.len();
        }
        (1, KeyCode::Char(c)) => {
            if let Some(field) = app.method_form.field_mut() {
                field.push(c);
            }
        }
        (1, KeyCode::Backspace) => {
            if let Some(field) = app.method_form.field_mut() {
                field.pop();
            }
        }
        (2, KeyCode::Char(c)) => app.method_form.code.push(c),
        (2, KeyCode::Backspace) => {
            app.method_form.code.pop();
        }
        (_, KeyCode::Enter) => app.method_form_advance(),
        (_, KeyCode::Esc) => app.method_form_back(),
        _ => {}
    }
}

fn payout_form_key(app: &mut App, k: KeyEvent) {
    match k.code {
        KeyCode::Left => app.payout_form_cycle_method(-1),
        KeyCode::Right => app.payout_form_cycle_method(1),
        KeyCode::Char(c) if c.is_ascii_digit() || c == '.' => {
            if app.payout_form.step == 0 {
                app.payout_form.amount.push(c);
            }
        }
        KeyCode::Backspace => {
            if app.payout_form.step == 0 {
                app.payout_form.amount.pop();
            }
        }
        KeyCode::Enter => app.payout_form_advance(),
        KeyCode::Esc => app.payout_form_back(),
        _ => {}
    }
}

fn invoice_form_key(app: &mut App, k: KeyEvent) {
    match k.code {
        KeyCode::Up => {
            let rows = InvoiceForm::FIELDS.len();
            app.invoice_form.focus = (app.invoice_form.focus + rows - 1) % rows;
        }
        KeyCode::Down | KeyCode::Tab => {
            app.invoice_form.focus = (app.invoice_form.focus + 1) % InvoiceForm::FIELDS.len();
        }
        KeyCode::Char(c) => {
            if let Some(field) = app.invoice_form.field_mut() {
                field.push(c);
            }
        }
        KeyCode::Backspace => {
            if let Some(field) = app.invoice_form.field_mut() {
                field.pop();
            }
        }
        KeyCode::Enter => app.submit_invoice_form(),
        KeyCode::Esc => app.close_modal(),
        _ => {}
    }
}
