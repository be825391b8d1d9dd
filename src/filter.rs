use crate::models::{DeliveryWindow, Product};
use chrono::{Local, NaiveDate};

/// Minimum harvest recency a listing must satisfy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Freshness {
    #[default]
    Any,
    Today,
    ThisWeek,
}

impl Freshness {
    pub fn label(self) -> &'static str {
        match self {
            Freshness::Any => "any",
            Freshness::Today => "harvested today",
            Freshness::ThisWeek => "this week",
        }
    }

    pub fn next(self) -> Self {
        match self {
            Freshness::Any => Freshness::Today,
            Freshness::Today => Freshness::ThisWeek,
            Freshness::ThisWeek => Freshness::Any,
        }
    }
}

/// Ordering applied after filtering. `Relevance` keeps input order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortKey {
    #[default]
    Relevance,
    PriceAsc,
    PriceDesc,
    RatingDesc,
    PopularityDesc,
}

impl SortKey {
    pub fn label(self) -> &'static str {
        match self {
            SortKey::Relevance => "relevance",
            SortKey::PriceAsc => "price ↑",
            SortKey::PriceDesc => "price ↓",
            SortKey::RatingDesc => "rating",
            SortKey::PopularityDesc => "popularity",
        }
    }

    pub fn next(self) -> Self {
        match self {
            SortKey::Relevance => SortKey::PriceAsc,
            SortKey::PriceAsc => SortKey::PriceDesc,
            SortKey::PriceDesc => SortKey::RatingDesc,
            SortKey::RatingDesc => SortKey::PopularityDesc,
            SortKey::PopularityDesc => SortKey::Relevance,
        }
    }
}

/// Full filter-panel snapshot. Every control interaction mutates one field
/// and the whole snapshot is re-applied; there is no debouncing and no
/// cross-field validation (an inverted price range simply matches nothing).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterState {
    /// Selected category ids; empty means all categories.
    pub categories: Vec<String>,
    /// Selected location ids; empty means all locations.
    pub locations: Vec<String>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    /// Minimum star rating, 1-5.
    pub min_rating: Option<u8>,
    pub verified_only: bool,
    pub organic_only: bool,
    pub freshness: Freshness,
    pub delivery: Option<DeliveryWindow>,
    /// Case-insensitive substring match over name, farmer and location.
    pub search: String,
    pub sort: SortKey,
}

impl FilterState {
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
            && self.locations.is_empty()
            && self.min_price.is_none()
            && self.max_price.is_none()
            && self.min_rating.is_none()
            && !self.verified_only
            && !self.organic_only
            && self.freshness == Freshness::Any
            && self.delivery.is_none()
            && self.search.is_empty()
    }

    /// Reset every control to its default ("Clear all").
    pub fn clear(&mut self) {
        *self = FilterState::default();
    }

    pub fn toggle_category(&mut self, id: &str) {
        toggle(&mut self.categories, id);
    }

    pub fn toggle_location(&mut self, id: &str) {
        toggle(&mut self.locations, id);
    }
}

fn toggle(set: &mut Vec<String>, id: &str) {
    if let Some(pos) = set.iter().position(|c| c.eq_ignore_ascii_case(id)) {
        set.remove(pos);
    } else {
        set.push(id.to_string());
    }
}

/// Filter, then sort. Recomputed from scratch on every snapshot change; the
/// dataset is one wholesale backend fetch, so no index is kept.
pub fn apply(products: &[Product], filter: &FilterState) -> Vec<Product> {
    apply_at(products, filter, Local::now().date_naive())
}

/// Same as [`apply`] with an explicit "today" so freshness is testable.
pub fn apply_at(products: &[Product], filter: &FilterState, today: NaiveDate) -> Vec<Product> {
    let mut out: Vec<Product> = products
        .iter()
        .filter(|p| matches(p, filter, today))
        .cloned()
        .collect();
    sort_products(&mut out, filter.sort);
    out
}

/// Conjunction of independent predicates; a filter can only remove items.
pub fn matches(p: &Product, f: &FilterState, today: NaiveDate) -> bool {
    if !p.active {
        return false;
    }
    if !f.categories.is_empty()
        && !f.categories.iter().any(|c| c.eq_ignore_ascii_case(&p.category))
    {
        return false;
    }
    if !f.locations.is_empty() && !f.locations.iter().any(|l| l.eq_ignore_ascii_case(&p.location)) {
        return false;
    }
    if let Some(min) = f.min_price {
        if p.price < min {
            return false;
        }
    }
    if let Some(max) = f.max_price {
        if p.price > max {
            return false;
        }
    }
    if let Some(min) = f.min_rating {
        if p.rating < min as f32 {
            return false;
        }
    }
    if f.verified_only && !p.verified {
        return false;
    }
    if f.organic_only && !p.organic {
        return false;
    }
    match f.freshness {
        Freshness::Any => {}
        Freshness::Today => match p.harvest_date {
            Some(d) if d == today => {}
            _ => return false,
        },
        Freshness::ThisWeek => match p.harvest_date {
            Some(d) if (today - d).num_days() <= 7 && d <= today => {}
            _ => return false,
        },
    }
    if let Some(window) = f.delivery {
        if p.delivery > window {
            return false;
        }
    }
    if !f.search.is_empty() {
        let needle = f.search.to_lowercase();
        let hit = p.name.to_lowercase().contains(&needle)
            || p.farmer.to_lowercase().contains(&needle)
            || p.location.to_lowercase().contains(&needle);
        if !hit {
            return false;
        }
    }
    true
}

/// Total order per sort key. `sort_by` is stable, so ties keep input order.
pub fn sort_products(products: &mut [Product], key: SortKey) {
    match key {
        SortKey::Relevance => {}
        SortKey::PriceAsc => products.sort_by(|a, b| a.price.total_cmp(&b.price)),
        SortKey::PriceDesc => products.sort_by(|a, b| b.price.total_cmp(&a.price)),
        SortKey::RatingDesc => products.sort_by(|a, b| b.rating.total_cmp(&a.rating)),
        SortKey::PopularityDesc => products.sort_by(|a, b| b.quantity.cmp(&a.quantity)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DeliveryWindow;

    fn product(id: &str, name: &str, category: &str, price: f64, rating: f32) -> Product {
        Product {
            id: id.to_string(),
            name: name.to_string(),
            description: String::new(),
            price,
            unit: "kg".to_string(),
            quantity: 10,
            category: category.to_string(),
            farmer: "Rivera Farm".to_string(),
            location: "valley-west".to_string(),
            rating,
            verified: false,
            organic: false,
            harvest_date: None,
            delivery: DeliveryWindow::Standard,
            image_url: None,
            active: true,
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 8, 8).unwrap()
    }

    #[test]
    fn filtered_set_is_subset_of_input() {
        let input = vec![
            product("1", "Tomatoes", "vegetables", 3.5, 4.2),
            product("2", "Arabica Beans", "coffee", 18.0, 4.9),
            product("3", "Honey", "pantry", 9.0, 3.1),
        ];
        let mut f = FilterState::default();
        f.min_rating = Some(4);
        f.search = "o".to_string();
        let out = apply_at(&input, &f, today());
        assert!(out.len() <= input.len());
        for p in &out {
            assert!(input.iter().any(|i| i.id == p.id));
        }
    }

    #[test]
    fn price_sorts_are_reverses_of_each_other() {
        let input = vec![
            product("1", "a", "c", 5.0, 1.0),
            product("2", "b", "c", 2.0, 1.0),
            product("3", "c", "c", 9.0, 1.0),
        ];
        let mut asc = FilterState::default();
        asc.sort = SortKey::PriceAsc;
        let mut desc = FilterState::default();
        desc.sort = SortKey::PriceDesc;

        let up: Vec<String> = apply_at(&input, &asc, today()).into_iter().map(|p| p.id).collect();
        let mut down: Vec<String> =
            apply_at(&input, &desc, today()).into_iter().map(|p| p.id).collect();
        down.reverse();
        assert_eq!(up, down);
    }

    #[test]
    fn search_is_case_insensitive() {
        let input = vec![
            product("1", "Roma Tomatoes", "vegetables", 3.5, 4.2),
            product("2", "Arabica Beans", "coffee", 18.0, 4.9),
        ];
        let mut lower = FilterState::default();
        lower.search = "tomato".to_string();
        let mut upper = FilterState::default();
        upper.search = "TOMATO".to_string();

        let a: Vec<String> = apply_at(&input, &lower, today()).into_iter().map(|p| p.id).collect();
        let b: Vec<String> = apply_at(&input, &upper, today()).into_iter().map(|p| p.id).collect();
        assert_eq!(a, vec!["1"]);
        assert_eq!(a, b);
    }

    #[test]
    fn search_covers_farmer_and_location() {
        let input = vec![product("1", "Roma Tomatoes", "vegetables", 3.5, 4.2)];
        for needle in ["rivera", "VALLEY-WEST"] {
            let mut f = FilterState::default();
            f.search = needle.to_string();
            assert_eq!(apply_at(&input, &f, today()).len(), 1, "needle {needle}");
        }
    }

    #[test]
    fn clearing_filters_restores_full_list_in_input_order() {
        let input = vec![
            product("1", "a", "vegetables", 5.0, 2.0),
            product("2", "b", "coffee", 2.0, 5.0),
            product("3", "c", "pantry", 9.0, 3.0),
        ];
        let mut f = FilterState {
            categories: vec!["coffee".to_string()],
            min_rating: Some(4),
            sort: SortKey::PriceDesc,
            ..FilterState::default()
        };
        assert_eq!(apply_at(&input, &f, today()).len(), 1);

        f.clear();
        assert!(f.is_empty());
        let out: Vec<String> = apply_at(&input, &f, today()).into_iter().map(|p| p.id).collect();
        assert_eq!(out, vec!["1", "2", "3"]);
    }

    #[test]
    fn category_and_rating_conjunction() {
        let mut coffee = product("1", "Arabica Beans", "coffee", 18.0, 4.9);
        coffee.verified = true;
        let veg = product("2", "Kale", "vegetables", 2.0, 4.9);

        let f = FilterState {
            categories: vec!["coffee".to_string()],
            min_rating: Some(4),
            ..FilterState::default()
        };
        let out = apply_at(&[coffee, veg], &f, today());
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].id, "1");
    }

    #[test]
    fn inverted_price_range_matches_nothing() {
        // min > max is accepted as-is; the conjunction simply never holds.
        let input = vec![product("1", "a", "c", 5.0, 1.0)];
        let f = FilterState {
            min_price: Some(10.0),
            max_price: Some(1.0),
            ..FilterState::default()
        };
        assert!(apply_at(&input, &f, today()).is_empty());
    }

    #[test]
    fn freshness_today_and_week_windows() {
        let mut fresh = product("1", "a", "c", 1.0, 1.0);
        fresh.harvest_date = Some(today());
        let mut old = product("2", "b", "c", 1.0, 1.0);
        old.harvest_date = Some(today() - chrono::Duration::days(12));
        let undated = product("3", "c", "c", 1.0, 1.0);

        let mut f = FilterState::default();
        f.freshness = Freshness::Today;
        let out = apply_at(&[fresh.clone(), old.clone(), undated.clone()], &f, today());
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].id, "1");

        f.freshness = Freshness::ThisWeek;
        let mut recent = product("4", "d", "c", 1.0, 1.0);
        recent.harvest_date = Some(today() - chrono::Duration::days(5));
        let out = apply_at(&[fresh, old, undated, recent], &f, today());
        let ids: Vec<&str> = out.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "4"]);
    }

    #[test]
    fn delivery_filter_is_an_upper_bound() {
        let mut same_day = product("1", "a", "c", 1.0, 1.0);
        same_day.delivery = DeliveryWindow::SameDay;
        let mut two_day = product("2", "b", "c", 1.0, 1.0);
        two_day.delivery = DeliveryWindow::TwoDay;
        let standard = product("3", "c", "c", 1.0, 1.0);

        let mut f = FilterState::default();
        f.delivery = Some(DeliveryWindow::TwoDay);
        let out = apply_at(&[same_day, two_day, standard], &f, today());
        let ids: Vec<&str> = out.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2"]);
    }

    #[test]
    fn inactive_listings_are_hidden() {
        let mut p = product("1", "a", "c", 1.0, 1.0);
        p.active = false;
        assert!(apply_at(&[p], &FilterState::default(), today()).is_empty());
    }

    #[test]
    fn popularity_sorts_by_stock_descending() {
        let mut a = product("1", "a", "c", 1.0, 1.0);
        a.quantity = 3;
        let mut b = product("2", "b", "c", 1.0, 1.0);
        b.quantity = 40;
        let mut f = FilterState::default();
        f.sort = SortKey::PopularityDesc;
        let out = apply_at(&[a, b], &f, today());
        assert_eq!(out[0].id, "2");
    }

    #[test]
    fn toggle_category_adds_then_removes() {
        let mut f = FilterState::default();
        f.toggle_category("coffee");
        assert_eq!(f.categories, vec!["coffee"]);
        f.toggle_category("Coffee");
        assert!(f.categories.is_empty());
    }
}
