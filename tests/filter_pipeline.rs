//! End-to-end properties of the listing filter/sort pipeline.

use chrono::NaiveDate;
use farmstand::filter::{apply_at, FilterState, SortKey};
use farmstand::models::{DeliveryWindow, Product};

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 8, 8).unwrap()
}

fn listing(id: &str, name: &str, category: &str, price: f64, rating: f32, qty: u32) -> Product {
    Product {
        id: id.to_string(),
        name: name.to_string(),
        description: String::new(),
        price,
        unit: "kg".to_string(),
        quantity: qty,
        category: category.to_string(),
        farmer: "Rivera Farm".to_string(),
        location: "valley-west".to_string(),
        rating,
        verified: true,
        organic: false,
        harvest_date: Some(today()),
        delivery: DeliveryWindow::TwoDay,
        image_url: None,
        active: true,
    }
}

fn catalog() -> Vec<Product> {
    vec![
        listing("p1", "Roma Tomatoes", "vegetables", 3.50, 4.2, 120),
        listing("p2", "Arabica Beans", "coffee", 18.00, 4.9, 45),
        listing("p3", "Curly Kale", "vegetables", 2.20, 4.3, 80),
        listing("p4", "Wildflower Honey", "pantry", 9.75, 4.8, 60),
        listing("p5", "Hass Avocados", "fruit", 6.40, 4.1, 200),
    ]
}

#[test]
fn no_filter_snapshot_can_add_items() {
    let input = catalog();
    let snapshots = vec![
        FilterState { search: "a".to_string(), ..FilterState::default() },
        FilterState { min_rating: Some(4), ..FilterState::default() },
        FilterState {
            categories: vec!["vegetables".to_string(), "fruit".to_string()],
            min_price: Some(2.0),
            max_price: Some(10.0),
            verified_only: true,
            ..FilterState::default()
        },
        FilterState { min_price: Some(100.0), ..FilterState::default() },
    ];
    for f in snapshots {
        let out = apply_at(&input, &f, today());
        assert!(out.len() <= input.len());
        for p in &out {
            assert!(input.iter().any(|i| i.id == p.id), "{} not in input", p.id);
        }
    }
}

#[test]
fn ascending_and_descending_price_are_exact_reverses() {
    let input = catalog(); // all prices distinct
    let asc = FilterState { sort: SortKey::PriceAsc, ..FilterState::default() };
    let desc = FilterState { sort: SortKey::PriceDesc, ..FilterState::default() };

    let up: Vec<String> = apply_at(&input, &asc, today()).into_iter().map(|p| p.id).collect();
    let mut down: Vec<String> =
        apply_at(&input, &desc, today()).into_iter().map(|p| p.id).collect();
    down.reverse();
    assert_eq!(up, down);
}

#[test]
fn search_is_case_insensitive_end_to_end() {
    let input = catalog();
    let lower = FilterState { search: "tomato".to_string(), ..FilterState::default() };
    let upper = FilterState { search: "TOMATO".to_string(), ..FilterState::default() };

    let a: Vec<String> = apply_at(&input, &lower, today()).into_iter().map(|p| p.id).collect();
    let b: Vec<String> = apply_at(&input, &upper, today()).into_iter().map(|p| p.id).collect();
    assert_eq!(a, b);
    assert_eq!(a, vec!["p1"]);
}

#[test]
fn cleared_snapshot_returns_everything_in_input_order() {
    let input = catalog();
    let mut f = FilterState {
        categories: vec!["coffee".to_string()],
        min_rating: Some(4),
        sort: SortKey::PriceDesc,
        search: "bean".to_string(),
        ..FilterState::default()
    };
    assert_eq!(apply_at(&input, &f, today()).len(), 1);

    f.clear();
    let out: Vec<String> = apply_at(&input, &f, today()).into_iter().map(|p| p.id).collect();
    let expected: Vec<String> = input.iter().map(|p| p.id.clone()).collect();
    assert_eq!(out, expected);
}

#[test]
fn category_plus_rating_picks_only_the_coffee_item() {
    let mut coffee = listing("c1", "Peaberry Lot 7", "coffee", 21.0, 4.9, 12);
    coffee.organic = false;
    let veg = listing("v1", "Rainbow Chard", "vegetables", 3.0, 4.9, 30);

    let f = FilterState {
        categories: vec!["coffee".to_string()],
        min_rating: Some(4),
        ..FilterState::default()
    };
    let out = apply_at(&[coffee, veg], &f, today());
    assert_eq!(out.len(), 1);
    assert_eq!(out[0].id, "c1");
}

#[test]
fn popularity_uses_stock_as_proxy() {
    let input = catalog();
    let f = FilterState { sort: SortKey::PopularityDesc, ..FilterState::default() };
    let out = apply_at(&input, &f, today());
    let quantities: Vec<u32> = out.iter().map(|p| p.quantity).collect();
    let mut sorted = quantities.clone();
    sorted.sort_unstable_by(|a, b| b.cmp(a));
    assert_eq!(quantities, sorted);
}

#[test]
fn relevance_keeps_input_order() {
    let input = catalog();
    let f = FilterState::default();
    let out: Vec<String> = apply_at(&input, &f, today()).into_iter().map(|p| p.id).collect();
    let expected: Vec<String> = input.iter().map(|p| p.id.clone()).collect();
    assert_eq!(out, expected);
}
