use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{
        Block, BorderType, Borders, Clear, List, ListItem, ListState, Paragraph, Row, Table, Wrap,
    },
    Frame,
};

use crate::app::{
    App, InputMode, InvoiceForm, MethodForm, PayTab, ProductForm, ToastKind, View,
    FILTER_FIXED_ROWS,
};
use crate::models::{NotificationKind, PaymentMethodKind};
use crate::util_text::{format_date, format_datetime, format_money, format_price_unit, stars, truncate};

// ===============================
// Top-level draw
// ===============================
pub fn draw(f: &mut Frame, app: &mut App) {
    app.tick_spinner();

    let show_debug = app.debug_visible() && !app.debug_log().is_empty();

    let mut constraints: Vec<Constraint> = Vec::with_capacity(4);
    constraints.push(Constraint::Length(1)); // header
    constraints.push(Constraint::Min(0)); // body
    if show_debug {
        constraints.push(Constraint::Length(4));
    }
    constraints.push(Constraint::Length(1)); // footer

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(f.area());

    let mut idx = 0usize;
    header(f, chunks[idx], app);
    idx += 1;
    match app.view() {
        View::Market => market_view(f, chunks[idx], app),
        View::Cart => cart_view(f, chunks[idx], app),
        View::Payments => payments_view(f, chunks[idx], app),
    }
    idx += 1;
    if show_debug {
        debug_panel(f, chunks[idx], app);
        idx += 1;
    }
    footer(f, chunks[idx], app);

    // Overlays render last
    match app.input_mode() {
        InputMode::ProductForm => draw_product_form(f, app),
        InputMode::MethodForm => draw_method_form(f, app),
        InputMode::PayoutForm => draw_payout_form(f, app),
        InputMode::InvoiceForm => draw_invoice_form(f, app),
        InputMode::ConfirmDelete => draw_confirm_delete(f, app),
        _ => {}
    }
    if app.toast().is_some() {
        draw_toast_modal(f, app);
    }
}

// ===============================
// Chrome
// ===============================
fn header(f: &mut Frame, area: Rect, app: &App) {
    let t = app.theme();
    let mut spans: Vec<Span> = Vec::new();
    let titles = [
        (View::Market, "1 Market"),
        (View::Cart, "2 Cart"),
        (View::Payments, "3 Payments"),
    ];
    for (view, title) in titles {
        spans.push(Span::raw(" "));
        if view == app.view() {
            spans.push(Span::styled(
                format!("[{title}]"),
                Style::default().fg(t.focus_border.color()).add_modifier(Modifier::BOLD),
            ));
        } else {
            spans.push(Span::styled(
                format!(" {title} "),
                Style::default().fg(t.text_dim.color()),
            ));
        }
    }
    let unread = app.unread_count();
    if unread > 0 {
        spans.push(Span::styled(
            format!("  ({unread} unread)"),
            Style::default().fg(t.warning.color()),
        ));
    }
    if app.demo() {
        spans.push(Span::styled(
            "  DEMO DATA",
            Style::default().fg(t.warning.color()).add_modifier(Modifier::BOLD),
        ));
    }
    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn footer(f: &mut Frame, area: Rect, app: &App) {
    let t = app.theme();
    let hints = match (app.input_mode(), app.view()) {
        (InputMode::Search, _) => "type to search · Enter keep · Esc clear",
        (InputMode::FilterPanel, _) => {
            "↑↓ move · space toggle · ←→ adjust · 0-9 price digits · Esc close"
        }
        (InputMode::ProductForm, _) => "↑↓ field · space organic · Enter submit · Esc cancel",
        (InputMode::MethodForm, _) => "←→ choose · ↑↓ field · Enter next/submit · Esc back",
        (InputMode::PayoutForm, _) => "←→ method · digits amount · Enter confirm · Esc back",
        (InputMode::InvoiceForm, _) => "↑↓ field · Enter submit · Esc cancel",
        (InputMode::ConfirmDelete, _) => "y confirm · n / Esc cancel",
        (_, View::Market) => {
            "/ search · f filters · a add-to-cart · n new · e edit · d delete · c copy id · q quit"
        }
        (_, View::Cart) => "+/- quantity · d remove · q quit",
        (_, View::Payments) => {
            "Tab next tab · r range · p period · n new · v verify · s send · g generate · q quit"
        }
    };
    f.render_widget(
        Paragraph::new(Span::styled(hints, Style::default().fg(t.text_dim.color()))),
        area,
    );
}

fn debug_panel(f: &mut Frame, area: Rect, app: &App) {
    let t = app.theme();
    let lines: Vec<ListItem> = app
        .debug_log()
        .iter()
        .rev()
        .take(area.height.saturating_sub(2) as usize)
        .map(|l| ListItem::new(truncate(l, area.width.saturating_sub(2) as usize)))
        .collect();
    let list = List::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" debug ")
                .border_style(Style::default().fg(t.unfocused_border.color())),
        )
        .style(Style::default().fg(t.text_dim.color()));
    f.render_widget(list, area);
}

// ===============================
// Market view
// ===============================
fn market_view(f: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(30),
            Constraint::Min(36),
            Constraint::Length(38),
        ])
        .split(area);
    filter_panel(f, chunks[0], app);
    product_list(f, chunks[1], app);
    product_details(f, chunks[2], app);
}

fn filter_panel(f: &mut Frame, area: Rect, app: &App) {
    let t = app.theme();
    let focused = app.input_mode() == InputMode::FilterPanel;
    let filter = &app.filter;

    let check = |on: bool| if on { "[x]" } else { "[ ]" };
    let mut rows: Vec<String> = vec![
        format!("Sort: {}", filter.sort.label()),
        format!(
            "Min price: {}",
            filter.min_price.map(|v| format_money(v)).unwrap_or_else(|| "-".into())
        ),
        format!(
            "Max price: {}",
            filter.max_price.map(|v| format_money(v)).unwrap_or_else(|| "-".into())
        ),
        format!("{} Verified only", check(filter.verified_only)),
        format!("{} Organic only", check(filter.organic_only)),
        format!("Freshness: {}", filter.freshness.label()),
        format!(
            "Delivery: {}",
            filter.delivery.map(|d| d.label()).unwrap_or("any")
        ),
        format!(
            "Min rating: {}",
            filter.min_rating.map(|r| stars(r as f32)).unwrap_or_else(|| "any".into())
        ),
    ];
    debug_assert_eq!(rows.len(), FILTER_FIXED_ROWS);

    let cats = app.known_categories();
    for c in &cats {
        let on = filter.categories.iter().any(|x| x.eq_ignore_ascii_case(c));
        rows.push(format!("{} cat: {c}", check(on)));
    }
    for l in app.known_locations() {
        let on = filter.locations.iter().any(|x| x.eq_ignore_ascii_case(&l));
        rows.push(format!("{} loc: {l}", check(on)));
    }
    rows.push("Clear all filters".to_string());

    let items: Vec<ListItem> = rows.into_iter().map(ListItem::new).collect();
    let border = if focused { t.focus_border } else { t.unfocused_border };
    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .title(" filters (f) ")
                .border_style(Style::default().fg(border.color())),
        )
        .style(Style::default().fg(t.text.color()))
        .highlight_style(
            Style::default()
                .bg(t.selection_bg.color())
                .fg(t.selection_fg.color())
                .add_modifier(Modifier::BOLD),
        );
    let mut state = ListState::default();
    if focused {
        state.select(Some(app.filter_focus()));
    }
    f.render_stateful_widget(list, area, &mut state);
}

fn product_list(f: &mut Frame, area: Rect, app: &App) {
    let t = app.theme();
    let searching = app.input_mode() == InputMode::Search || !app.filter.search.is_empty();

    let mut constraints = Vec::with_capacity(3);
    if searching {
        constraints.push(Constraint::Length(3));
    }
    if app.products.error.is_some() {
        constraints.push(Constraint::Length(1));
    }
    constraints.push(Constraint::Min(0));
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(area);

    let mut idx = 0usize;
    if searching {
        let focused = app.input_mode() == InputMode::Search;
        let border = if focused { t.focus_border } else { t.unfocused_border };
        let text = if app.filter.search.is_empty() && !focused {
            "(press / to search)"
        } else {
            app.filter.search.as_str()
        };
        let p = Paragraph::new(text).style(Style::default().fg(t.text.color())).block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .title(" search ")
                .border_style(Style::default().fg(border.color())),
        );
        f.render_widget(p, chunks[idx]);
        idx += 1;
    }
    if let Some(err) = &app.products.error {
        error_banner(f, chunks[idx], app, err);
        idx += 1;
    }

    let total = app.products.data.as_ref().map_or(0, Vec::len);
    let shown = app.visible_products().len();
    let title = if app.products.loading {
        format!(" listings {}/{} {} ", shown, total, app.spinner_char())
    } else {
        format!(" listings {shown}/{total} ")
    };

    let body = chunks[idx];
    if app.products.loading && app.products.data.is_none() {
        loading_skeleton(f, body, app, &title);
        return;
    }

    let width = body.width.saturating_sub(4) as usize;
    let items: Vec<ListItem> = app
        .visible_products()
        .iter()
        .map(|p| {
            let mut badges = String::new();
            if p.organic {
                badges.push_str(" ORG");
            }
            if p.verified {
                badges.push_str(" VER");
            }
            let left = format!(
                "{} {} {}{}",
                truncate(&p.name, width.saturating_sub(24).max(8)),
                format_price_unit(p.price, &p.unit),
                stars(p.rating),
                badges
            );
            ListItem::new(left)
        })
        .collect();
    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .title(title)
                .border_style(Style::default().fg(t.unfocused_border.color())),
        )
        .style(Style::default().fg(t.text.color()))
        .highlight_style(
            Style::default()
                .bg(t.selection_bg.color())
                .fg(t.selection_fg.color())
                .add_modifier(Modifier::BOLD),
        );
    let mut state = ListState::default();
    if shown > 0 {
        state.select(Some(app.market_sel()));
    }
    f.render_stateful_widget(list, body, &mut state);
}

fn product_details(f: &mut Frame, area: Rect, app: &App) {
    let t = app.theme();
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .title(" details ")
        .border_style(Style::default().fg(t.unfocused_border.color()));

    let Some(p) = app.selected_product() else {
        let empty = Paragraph::new("No listing selected")
            .style(Style::default().fg(t.text_dim.color()))
            .block(block);
        f.render_widget(empty, area);
        return;
    };

    let dim = Style::default().fg(t.text_dim.color());
    let val = Style::default().fg(t.text.color());
    let in_cart = app
        .cart()
        .iter()
        .find(|l| l.product_id == p.id)
        .map(|l| l.quantity)
        .unwrap_or(0);

    let mut lines = vec![
        Line::from(Span::styled(
            p.name.clone(),
            Style::default().fg(t.accent.color()).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(vec![Span::styled("price     ", dim), Span::styled(format_price_unit(p.price, &p.unit), val)]),
        Line::from(vec![Span::styled("stock     ", dim), Span::styled(format!("{} {}", p.quantity, p.unit), val)]),
        Line::from(vec![Span::styled("category  ", dim), Span::styled(p.category.clone(), val)]),
        Line::from(vec![Span::styled("farmer    ", dim), Span::styled(p.farmer.clone(), val)]),
        Line::from(vec![Span::styled("location  ", dim), Span::styled(p.location.clone(), val)]),
        Line::from(vec![Span::styled("rating    ", dim), Span::styled(format!("{} ({:.1})", stars(p.rating), p.rating), val)]),
        Line::from(vec![Span::styled("delivery  ", dim), Span::styled(p.delivery.label(), val)]),
        Line::from(vec![
            Span::styled("harvested ", dim),
            Span::styled(
                p.harvest_date.map(format_date).unwrap_or_else(|| "unknown".into()),
                val,
            ),
        ]),
    ];
    if p.organic {
        lines.push(Line::from(Span::styled("organic", Style::default().fg(t.success.color()))));
    }
    if p.verified {
        lines.push(Line::from(Span::styled(
            "verified farmer",
            Style::default().fg(t.success.color()),
        )));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(p.description.clone(), dim)));
    if in_cart > 0 {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            format!("{in_cart} in cart"),
            Style::default().fg(t.accent.color()),
        )));
    }

    let para = Paragraph::new(lines).wrap(Wrap { trim: true }).block(block);
    f.render_widget(para, area);
}

// ===============================
// Cart view
// ===============================
fn cart_view(f: &mut Frame, area: Rect, app: &App) {
    let t = app.theme();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(2)])
        .split(area);

    let rows: Vec<Row> = app
        .cart()
        .iter()
        .map(|l| {
            Row::new(vec![
                l.name.clone(),
                format!("{} x", l.quantity),
                format_price_unit(l.unit_price, &l.unit),
                format_money(l.unit_price * l.quantity as f64),
            ])
        })
        .collect();
    let table = Table::new(
        rows,
        [
            Constraint::Min(20),
            Constraint::Length(6),
            Constraint::Length(14),
            Constraint::Length(12),
        ],
    )
    .header(
        Row::new(vec!["item", "qty", "unit price", "total"])
            .style(Style::default().fg(t.text_dim.color())),
    )
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .title(format!(" cart ({} items) ", app.cart().len()))
            .border_style(Style::default().fg(t.unfocused_border.color())),
    )
    .style(Style::default().fg(t.text.color()))
    .row_highlight_style(
        Style::default()
            .bg(t.selection_bg.color())
            .fg(t.selection_fg.color()),
    );
    let mut state = ratatui::widgets::TableState::default();
    if !app.cart().is_empty() {
        state.select(Some(app.cart_sel()));
    }
    f.render_stateful_widget(table, chunks[0], &mut state);

    let last_order = app
        .session()
        .last_order_id
        .clone()
        .unwrap_or_else(|| "none".into());
    let summary = Paragraph::new(Line::from(vec![
        Span::styled("total ", Style::default().fg(t.text_dim.color())),
        Span::styled(
            format_money(app.cart_total()),
            Style::default().fg(t.accent.color()).add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!("   last order: {last_order}"),
            Style::default().fg(t.text_dim.color()),
        ),
    ]));
    f.render_widget(summary, chunks[1]);
}

// ===============================
// Payments dashboard
// ===============================
fn payments_view(f: &mut Frame, area: Rect, app: &App) {
    let t = app.theme();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(0)])
        .split(area);

    // Sub-tab bar
    let mut spans: Vec<Span> = Vec::new();
    for tab in PayTab::ALL {
        if tab == app.pay_tab() {
            spans.push(Span::styled(
                format!(" {} ", tab.label()),
                Style::default().fg(t.focus_border.color()).add_modifier(Modifier::BOLD),
            ));
        } else {
            spans.push(Span::styled(
                format!(" {} ", tab.label()),
                Style::default().fg(t.text_dim.color()),
            ));
        }
        spans.push(Span::raw("·"));
    }
    spans.pop();
    f.render_widget(Paragraph::new(Line::from(spans)), chunks[0]);

    let body = chunks[1];
    match app.pay_tab() {
        PayTab::Overview => overview_tab(f, body, app),
        PayTab::Methods => methods_tab(f, body, app),
        PayTab::Payouts => payouts_tab(f, body, app),
        PayTab::Invoices => invoices_tab(f, body, app),
        PayTab::Transactions => transactions_tab(f, body, app),
        PayTab::Reports => reports_tab(f, body, app),
        PayTab::Notifications => notifications_tab(f, body, app),
    }
}

fn overview_tab(f: &mut Frame, area: Rect, app: &App) {
    let t = app.theme();
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
        .split(area);

    // Balances
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .title(overview_title(app))
        .border_style(Style::default().fg(t.unfocused_border.color()));
    if app.overview.loading && app.overview.data.is_none() {
        loading_skeleton(f, chunks[0], app, " overview ");
    } else if let Some(err) = &app.overview.error {
        f.render_widget(
            Paragraph::new(error_line(app, err)).wrap(Wrap { trim: true }).block(block),
            chunks[0],
        );
    } else if let Some(o) = &app.overview.data {
        let dim = Style::default().fg(t.text_dim.color());
        let strong = Style::default().fg(t.accent.color()).add_modifier(Modifier::BOLD);
        let val = Style::default().fg(t.text.color());
        let mut lines = vec![
            Line::from(vec![Span::styled("available  ", dim), Span::styled(format_money(o.available_balance), strong)]),
            Line::from(vec![Span::styled("pending    ", dim), Span::styled(format_money(o.pending_balance), val)]),
            Line::from(vec![Span::styled("in escrow  ", dim), Span::styled(format_money(o.escrow_held), val)]),
            Line::from(vec![
                Span::styled("next payout ", dim),
                Span::styled(
                    o.next_payout_date.map(format_date).unwrap_or_else(|| "not scheduled".into()),
                    val,
                ),
            ]),
        ];
        if let Some(a) = &app.analytics.data {
            lines.push(Line::from(""));
            lines.push(Line::from(vec![
                Span::styled(format!("{} ", app.range.label()), dim),
                Span::styled(
                    format!("{} gross / {} orders", format_money(a.gross_sales), a.order_count),
                    val,
                ),
            ]));
            for c in a.top_categories.iter().take(3) {
                lines.push(Line::from(vec![
                    Span::styled(format!("  {} ", c.category), dim),
                    Span::styled(format_money(c.amount), val),
                ]));
            }
        } else if let Some(err) = &app.analytics.error {
            lines.push(Line::from(""));
            lines.push(error_line(app, err));
        }
        f.render_widget(Paragraph::new(lines).block(block), chunks[0]);
    } else {
        f.render_widget(Paragraph::new("").block(block), chunks[0]);
    }

    // Recent transactions
    let recent: Vec<ListItem> = app
        .overview
        .data
        .iter()
        .flat_map(|o| o.recent_transactions.iter())
        .map(|tx| {
            ListItem::new(format!(
                "{}  {:<7} {:>10}  {}",
                format_datetime(tx.created_at),
                tx.kind.label(),
                format_money(tx.amount),
                truncate(&tx.counterparty, 18),
            ))
        })
        .collect();
    let list = List::new(recent)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .title(" recent activity ")
                .border_style(Style::default().fg(t.unfocused_border.color())),
        )
        .style(Style::default().fg(t.text.color()));
    f.render_widget(list, chunks[1]);
}

fn overview_title(app: &App) -> String {
    if app.overview.loading {
        format!(" overview {} ", app.spinner_char())
    } else {
        " overview ".to_string()
    }
}

fn methods_tab(f: &mut Frame, area: Rect, app: &App) {
    let t = app.theme();
    if app.methods.loading && app.methods.data.is_none() {
        loading_skeleton(f, area, app, " payment methods ");
        return;
    }
    let (rows, banner) = match (&app.methods.data, &app.methods.error) {
        (_, Some(err)) => (Vec::new(), Some(err.clone())),
        (Some(ms), None) => {
            let rows: Vec<Row> = ms
                .iter()
                .map(|m| {
                    let bank = m
                        .bank_code
                        .as_ref()
                        .and_then(|code| bank_name(app, code))
                        .unwrap_or_else(|| m.bank_code.clone().unwrap_or_default());
                    Row::new(vec![
                        m.label.clone(),
                        m.kind.label().to_string(),
                        if m.account_suffix.is_empty() {
                            String::new()
                        } else {
                            format!("****{}", m.account_suffix)
                        },
                        bank,
                        if m.verified { "verified".into() } else { "unverified".into() },
                        if m.is_default { "default".into() } else { String::new() },
                    ])
                })
                .collect();
            (rows, None)
        }
        (None, None) => (Vec::new(), None),
    };
    if let Some(err) = banner {
        error_banner_full(f, area, app, &err, " payment methods ");
        return;
    }
    let table = Table::new(
        rows,
        [
            Constraint::Min(16),
            Constraint::Length(13),
            Constraint::Length(9),
            Constraint::Length(20),
            Constraint::Length(11),
            Constraint::Length(8),
        ],
    )
    .header(
        Row::new(vec!["label", "kind", "account", "bank", "status", ""])
            .style(Style::default().fg(t.text_dim.color())),
    )
    .block(tab_block(app, " payment methods (n new · e edit · v verify · d delete) "))
    .style(Style::default().fg(t.text.color()))
    .row_highlight_style(
        Style::default()
            .bg(t.selection_bg.color())
            .fg(t.selection_fg.color()),
    );
    let mut state = ratatui::widgets::TableState::default();
    if app.methods.data.as_ref().is_some_and(|m| !m.is_empty()) {
        state.select(Some(app.methods_sel()));
    }
    f.render_stateful_widget(table, area, &mut state);
}

fn bank_name(app: &App, code: &str) -> Option<String> {
    app.banks
        .data
        .as_ref()
        .and_then(|bs| bs.iter().find(|b| b.code == code))
        .map(|b| b.name.clone())
}

fn payouts_tab(f: &mut Frame, area: Rect, app: &App) {
    let t = app.theme();
    if app.payouts.loading && app.payouts.data.is_none() {
        loading_skeleton(f, area, app, " payouts ");
        return;
    }
    if let Some(err) = &app.payouts.error {
        error_banner_full(f, area, app, err, " payouts ");
        return;
    }
    let rows: Vec<Row> = app
        .payouts
        .data
        .iter()
        .flatten()
        .map(|p| {
            Row::new(vec![
                p.id.clone(),
                format_money(p.amount),
                p.status.label().to_string(),
                format_datetime(p.requested_at),
                p.processed_at.map(format_datetime).unwrap_or_default(),
            ])
        })
        .collect();
    let table = Table::new(
        rows,
        [
            Constraint::Length(14),
            Constraint::Length(12),
            Constraint::Length(11),
            Constraint::Length(17),
            Constraint::Length(17),
        ],
    )
    .header(
        Row::new(vec!["id", "amount", "status", "requested", "processed"])
            .style(Style::default().fg(t.text_dim.color())),
    )
    .block(tab_block(app, " payouts (n request · p process) "))
    .style(Style::default().fg(t.text.color()))
    .row_highlight_style(
        Style::default()
            .bg(t.selection_bg.color())
            .fg(t.selection_fg.color()),
    );
    let mut state = ratatui::widgets::TableState::default();
    if app.payouts.data.as_ref().is_some_and(|p| !p.is_empty()) {
        state.select(Some(app.payouts_sel()));
    }
    f.render_stateful_widget(table, area, &mut state);
}

fn invoices_tab(f: &mut Frame, area: Rect, app: &App) {
    let t = app.theme();
    if app.invoices.loading && app.invoices.data.is_none() {
        loading_skeleton(f, area, app, " invoices ");
        return;
    }
    if let Some(err) = &app.invoices.error {
        error_banner_full(f, area, app, err, " invoices ");
        return;
    }
    let rows: Vec<Row> = app
        .invoices
        .data
        .iter()
        .flatten()
        .map(|i| {
            Row::new(vec![
                i.id.clone(),
                i.order_id.clone(),
                truncate(&i.customer, 18),
                format_money(i.amount),
                i.status.label().to_string(),
                i.due_date.map(format_date).unwrap_or_default(),
            ])
        })
        .collect();
    let table = Table::new(
        rows,
        [
            Constraint::Length(12),
            Constraint::Length(10),
            Constraint::Min(14),
            Constraint::Length(12),
            Constraint::Length(8),
            Constraint::Length(11),
        ],
    )
    .header(
        Row::new(vec!["id", "order", "customer", "amount", "status", "due"])
            .style(Style::default().fg(t.text_dim.color())),
    )
    .block(tab_block(app, " invoices (n new · g generate last order · s send) "))
    .style(Style::default().fg(t.text.color()))
    .row_highlight_style(
        Style::default()
            .bg(t.selection_bg.color())
            .fg(t.selection_fg.color()),
    );
    let mut state = ratatui::widgets::TableState::default();
    if app.invoices.data.as_ref().is_some_and(|i| !i.is_empty()) {
        state.select(Some(app.invoices_sel()));
    }
    f.render_stateful_widget(table, area, &mut state);
}

fn transactions_tab(f: &mut Frame, area: Rect, app: &App) {
    let t = app.theme();
    let title = format!(" transactions · {} (r to change) ", app.range.label());
    if app.transactions.loading && app.transactions.data.is_none() {
        loading_skeleton(f, area, app, &title);
        return;
    }
    if let Some(err) = &app.transactions.error {
        error_banner_full(f, area, app, err, &title);
        return;
    }
    let rows: Vec<Row> = app
        .transactions
        .data
        .iter()
        .flatten()
        .map(|x| {
            Row::new(vec![
                x.id.clone(),
                x.kind.label().to_string(),
                format_money(x.amount),
                truncate(&x.counterparty, 20),
                x.reference.clone(),
                format_datetime(x.created_at),
            ])
        })
        .collect();
    let table = Table::new(
        rows,
        [
            Constraint::Length(9),
            Constraint::Length(7),
            Constraint::Length(11),
            Constraint::Min(14),
            Constraint::Length(16),
            Constraint::Length(17),
        ],
    )
    .header(
        Row::new(vec!["id", "kind", "amount", "counterparty", "reference", "when"])
            .style(Style::default().fg(t.text_dim.color())),
    )
    .block(tab_block(app, &title))
    .style(Style::default().fg(t.text.color()))
    .row_highlight_style(
        Style::default()
            .bg(t.selection_bg.color())
            .fg(t.selection_fg.color()),
    );
    let mut state = ratatui::widgets::TableState::default();
    if app.transactions.data.as_ref().is_some_and(|x| !x.is_empty()) {
        state.select(Some(app.transactions_sel()));
    }
    f.render_stateful_widget(table, area, &mut state);
}

fn reports_tab(f: &mut Frame, area: Rect, app: &App) {
    let t = app.theme();
    let title = format!(" reports · {} (p to change) ", app.report_period.label());
    if app.reports.loading && app.reports.data.is_none() {
        loading_skeleton(f, area, app, &title);
        return;
    }
    if let Some(err) = &app.reports.error {
        error_banner_full(f, area, app, err, &title);
        return;
    }
    let rows: Vec<Row> = app
        .reports
        .data
        .iter()
        .flatten()
        .map(|r| {
            Row::new(vec![
                r.period.clone(),
                r.orders.to_string(),
                format_money(r.gross),
                format_money(r.fees),
                format_money(r.net),
            ])
        })
        .collect();
    let table = Table::new(
        rows,
        [
            Constraint::Length(10),
            Constraint::Length(8),
            Constraint::Length(12),
            Constraint::Length(12),
            Constraint::Length(12),
        ],
    )
    .header(
        Row::new(vec!["period", "orders", "gross", "fees", "net"])
            .style(Style::default().fg(t.text_dim.color())),
    )
    .block(tab_block(app, &title))
    .style(Style::default().fg(t.text.color()));
    f.render_widget(table, area);
}

fn notifications_tab(f: &mut Frame, area: Rect, app: &App) {
    let t = app.theme();
    let items: Vec<ListItem> = app
        .notifications()
        .iter()
        .map(|n| {
            let marker = if n.read { "  " } else { "• " };
            let color = match n.kind {
                NotificationKind::Success => t.success,
                NotificationKind::Warning => t.warning,
                NotificationKind::Error => t.error,
                NotificationKind::Info => t.text,
            };
            ListItem::new(Line::from(vec![
                Span::styled(marker, Style::default().fg(t.accent.color())),
                Span::styled(format_datetime(n.created_at), Style::default().fg(t.text_dim.color())),
                Span::raw("  "),
                Span::styled(n.message.clone(), Style::default().fg(color.color())),
            ]))
        })
        .collect();
    let list = List::new(items)
        .block(tab_block(
            app,
            &format!(
                " notifications · {} unread (Enter read · d dismiss · a all read) ",
                app.unread_count()
            ),
        ))
        .style(Style::default().fg(t.text.color()))
        .highlight_style(
            Style::default()
                .bg(t.selection_bg.color())
                .fg(t.selection_fg.color()),
        );
    let mut state = ListState::default();
    if !app.notifications().is_empty() {
        state.select(Some(app.notifications_sel()));
    }
    f.render_stateful_widget(list, area, &mut state);
}

// ===============================
// Shared widgets
// ===============================
fn tab_block<'a>(app: &App, title: &str) -> Block<'a> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .title(title.to_string())
        .border_style(Style::default().fg(app.theme().unfocused_border.color()))
}

/// Skeleton shown while a dataset is in flight and nothing is cached yet.
fn loading_skeleton(f: &mut Frame, area: Rect, app: &App, title: &str) {
    let t = app.theme();
    let rows = area.height.saturating_sub(2).min(6) as usize;
    let width = area.width.saturating_sub(4) as usize;
    let mut lines = Vec::with_capacity(rows);
    for i in 0..rows {
        let bar = "░".repeat(width.saturating_sub(i % 3 * 4));
        lines.push(Line::from(Span::styled(bar, Style::default().fg(t.unfocused_border.color()))));
    }
    let para = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .title(format!("{title}{} ", app.spinner_char()))
            .border_style(Style::default().fg(t.unfocused_border.color())),
    );
    f.render_widget(para, area);
}

fn error_line<'a>(app: &App, err: &str) -> Line<'a> {
    Line::from(Span::styled(
        format!("⚠ {err}"),
        Style::default().fg(app.theme().error.color()).add_modifier(Modifier::BOLD),
    ))
}

fn error_banner(f: &mut Frame, area: Rect, app: &App, err: &str) {
    f.render_widget(Paragraph::new(error_line(app, err)), area);
}

fn error_banner_full(f: &mut Frame, area: Rect, app: &App, err: &str, title: &str) {
    let para = Paragraph::new(error_line(app, err))
        .wrap(Wrap { trim: true })
        .block(tab_block(app, title));
    f.render_widget(para, area);
}

fn centered_rect(f: &Frame, width: u16, height: u16) -> Rect {
    let area = f.area();
    let w = width.min(area.width);
    let h = height.min(area.height);
    Rect {
        x: (area.width.saturating_sub(w)) / 2,
        y: (area.height.saturating_sub(h)) / 2,
        width: w,
        height: h,
    }
}

// ===============================
// Modals
// ===============================
fn form_field_line<'a>(app: &App, label: &str, value: &str, focused: bool) -> Line<'a> {
    let t = app.theme();
    let label_style = if focused {
        Style::default().fg(t.focus_border.color()).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(t.text_dim.color())
    };
    let cursor = if focused { "_" } else { "" };
    Line::from(vec![
        Span::styled(format!("{label:<26}"), label_style),
        Span::styled(format!("{value}{cursor}"), Style::default().fg(t.text.color())),
    ])
}

fn modal_block<'a>(app: &App, title: &str) -> Block<'a> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .title(title.to_string())
        .border_style(Style::default().fg(app.theme().focus_border.color()))
}

fn draw_product_form(f: &mut Frame, app: &App) {
    let form = &app.product_form;
    let title = match &form.editing_id {
        Some(id) => format!(" edit listing {id} "),
        None => " new listing ".to_string(),
    };
    let overlay = centered_rect(f, 64, (ProductForm::ROWS + 4) as u16);
    f.render_widget(Clear, overlay);

    let mut lines = Vec::with_capacity(ProductForm::ROWS);
    for (row, label) in ProductForm::FIELDS.iter().enumerate() {
        lines.push(form_field_line(app, label, form.field_value(row), form.focus == row));
    }
    let organic_row = ProductForm::FIELDS.len();
    lines.push(form_field_line(
        app,
        "Organic",
        if form.draft.organic { "[x]" } else { "[ ]" },
        form.focus == organic_row,
    ));
    let para = Paragraph::new(lines).block(modal_block(app, &title));
    f.render_widget(para, overlay);
}

fn draw_method_form(f: &mut Frame, app: &App) {
    let t = app.theme();
    let form = &app.method_form;
    let overlay = centered_rect(f, 58, 9);
    f.render_widget(Clear, overlay);

    let lines = match form.step {
        0 => {
            let mut lines = vec![Line::from(Span::styled(
                "Step 1/3 · choose a method type (←/→)",
                Style::default().fg(t.text_dim.color()),
            ))];
            lines.push(Line::from(""));
            let mut spans = Vec::new();
            for kind in PaymentMethodKind::ALL {
                if kind == form.draft.kind {
                    spans.push(Span::styled(
                        format!("  [{}]  ", kind.label()),
                        Style::default().fg(t.focus_border.color()).add_modifier(Modifier::BOLD),
                    ));
                } else {
                    spans.push(Span::styled(
                        format!("   {}   ", kind.label()),
                        Style::default().fg(t.text_dim.color()),
                    ));
                }
            }
            lines.push(Line::from(spans));
            lines
        }
        1 => {
            let mut lines = vec![Line::from(Span::styled(
                format!("Step 2/3 · {} details", form.draft.kind.label()),
                Style::default().fg(t.text_dim.color()),
            ))];
            lines.push(Line::from(""));
            for (row, label) in MethodForm::DETAIL_FIELDS.iter().enumerate() {
                lines.push(form_field_line(app, label, form.field_value(row), form.focus == row));
            }
            lines
        }
        _ => vec![
            Line::from(Span::styled(
                "Step 3/3 · enter the verification code",
                Style::default().fg(t.text_dim.color()),
            )),
            Line::from(""),
            form_field_line(app, "Code", &form.code, true),
        ],
    };
    let title = match &form.editing_id {
        Some(_) if form.step == 2 => " verify payment method ",
        Some(_) => " edit payment method ",
        None => " add payment method ",
    };
    f.render_widget(Paragraph::new(lines).block(modal_block(app, title)), overlay);
}

fn draw_payout_form(f: &mut Frame, app: &App) {
    let t = app.theme();
    let form = &app.payout_form;
    let overlay = centered_rect(f, 56, 8);
    f.render_widget(Clear, overlay);

    let method_label = app
        .methods
        .data
        .as_ref()
        .and_then(|ms| ms.get(form.method_idx))
        .map(|m| format!("{} ({})", m.label, m.kind.label()))
        .unwrap_or_else(|| "no methods on file".into());

    let lines = if form.step == 0 {
        vec![
            Line::from(Span::styled(
                "Step 1/2 · amount and destination",
                Style::default().fg(t.text_dim.color()),
            )),
            Line::from(""),
            form_field_line(app, "Amount", &form.amount, true),
            form_field_line(app, "Method (←/→)", &method_label, false),
        ]
    } else {
        vec![
            Line::from(Span::styled(
                "Step 2/2 · confirm",
                Style::default().fg(t.text_dim.color()),
            )),
            Line::from(""),
            Line::from(Span::styled(
                format!(
                    "Request a payout of {} to {}?",
                    format_money(form.amount.trim().parse().unwrap_or(0.0)),
                    method_label
                ),
                Style::default().fg(t.text.color()),
            )),
            Line::from(Span::styled(
                "Enter to confirm · Esc to go back",
                Style::default().fg(t.text_dim.color()),
            )),
        ]
    };
    f.render_widget(
        Paragraph::new(lines).wrap(Wrap { trim: true }).block(modal_block(app, " request payout ")),
        overlay,
    );
}

fn draw_invoice_form(f: &mut Frame, app: &App) {
    let form = &app.invoice_form;
    let overlay = centered_rect(f, 58, (InvoiceForm::FIELDS.len() + 4) as u16);
    f.render_widget(Clear, overlay);
    let mut lines = Vec::new();
    for (row, label) in InvoiceForm::FIELDS.iter().enumerate() {
        lines.push(form_field_line(app, label, form.field_value(row), form.focus == row));
    }
    f.render_widget(
        Paragraph::new(lines).block(modal_block(app, " new invoice ")),
        overlay,
    );
}

fn draw_confirm_delete(f: &mut Frame, app: &App) {
    let t = app.theme();
    let overlay = centered_rect(f, 48, 5);
    f.render_widget(Clear, overlay);
    let what = match &app.delete_target {
        Some(crate::app::DeleteTarget::Product(id)) => format!("listing {id}"),
        Some(crate::app::DeleteTarget::Method(id)) => format!("payment method {id}"),
        None => "item".to_string(),
    };
    let para = Paragraph::new(vec![
        Line::from(Span::styled(
            format!("Delete {what}?"),
            Style::default().fg(t.text.color()).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            "y to confirm · n to cancel",
            Style::default().fg(t.text_dim.color()),
        )),
    ])
    .wrap(Wrap { trim: true })
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(t.error.color())),
    );
    f.render_widget(para, overlay);
}

fn draw_toast_modal(f: &mut Frame, app: &App) {
    let t = app.theme();
    let Some((message, kind)) = app.toast() else {
        return;
    };
    let color = match kind {
        ToastKind::Success => t.success,
        ToastKind::Error => t.error,
    };
    let prefix = match kind {
        ToastKind::Success => "✓",
        ToastKind::Error => "✗",
    };

    let area = f.area();
    let width = ((message.len() + 6) as u16).clamp(24, area.width * 6 / 10);
    let overlay = Rect {
        x: (area.width.saturating_sub(width)) / 2,
        y: area.height.saturating_sub(5).max(1),
        width,
        height: 3,
    };
    f.render_widget(Clear, overlay);
    let para = Paragraph::new(format!("{prefix} {message}"))
        .style(Style::default().fg(color.color()).add_modifier(Modifier::BOLD))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(color.color())),
        );
    f.render_widget(para, overlay);
}

#[cfg(test)]
mod tests {
    use crate::filter::SortKey;

    #[test]
    fn sort_labels_cover_every_key() {
        let mut key = SortKey::default();
        for _ in 0..5 {
            assert!(!key.label().is_empty());
            key = key.next();
        }
        assert_eq!(key, SortKey::default());
    }
}
