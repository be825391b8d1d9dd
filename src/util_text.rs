use chrono::{DateTime, NaiveDate, Utc};

/// Format a money amount for display, e.g. `$1,204.50`.
pub fn format_money(amount: f64) -> String {
    let negative = amount < 0.0;
    let cents = (amount.abs() * 100.0).round() as u64;
    let whole = cents / 100;
    let frac = cents % 100;
    let mut digits = whole.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    while digits.len() > 3 {
        let rest = digits.split_off(digits.len() - 3);
        grouped = if grouped.is_empty() { rest } else { format!("{rest},{grouped}") };
    }
    grouped = if grouped.is_empty() { digits } else { format!("{digits},{grouped}") };
    let sign = if negative { "-" } else { "" };
    format!("{sign}${grouped}.{frac:02}")
}

/// Price with its sale unit, e.g. `$3.50/kg`.
pub fn format_price_unit(price: f64, unit: &str) -> String {
    format!("{}/{unit}", format_money(price))
}

/// Five-slot star bar, rounded to the nearest whole star.
pub fn stars(rating: f32) -> String {
    let filled = rating.round().clamp(0.0, 5.0) as usize;
    let mut s = String::with_capacity(5 * 3);
    for _ in 0..filled {
        s.push('★');
    }
    for _ in filled..5 {
        s.push('☆');
    }
    s
}

pub fn format_date(d: NaiveDate) -> String {
    d.format("%Y-%m-%d").to_string()
}

pub fn format_datetime(t: DateTime<Utc>) -> String {
    t.format("%Y-%m-%d %H:%M").to_string()
}

/// Truncate with a trailing ellipsis so table cells stay one line.
pub fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        return s.to_string();
    }
    let keep = max_chars.saturating_sub(1);
    let mut out: String = s.chars().take(keep).collect();
    out.push('…');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn money_groups_thousands_and_pads_cents() {
        assert_eq!(format_money(0.0), "$0.00");
        assert_eq!(format_money(3.5), "$3.50");
        assert_eq!(format_money(1204.5), "$1,204.50");
        assert_eq!(format_money(1_234_567.89), "$1,234,567.89");
        assert_eq!(format_money(-42.0), "-$42.00");
    }

    #[test]
    fn stars_round_to_nearest() {
        assert_eq!(stars(4.9), "★★★★★");
        assert_eq!(stars(4.2), "★★★★☆");
        assert_eq!(stars(0.0), "☆☆☆☆☆");
        assert_eq!(stars(7.0), "★★★★★");
    }

    #[test]
    fn truncate_keeps_short_strings_intact() {
        assert_eq!(truncate("kale", 10), "kale");
        assert_eq!(truncate("heirloom tomatoes", 9), "heirloom…");
    }

    #[test]
    fn price_unit_format() {
        assert_eq!(format_price_unit(3.5, "kg"), "$3.50/kg");
    }
}
