// Property-based coverage of the aggregation engine: the summaries every
// exporter prints must stay derivable from, and equal to, the line items.

use chrono::{Duration, NaiveDate, TimeZone, Utc};
use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use stocksight::modules::reports::models::StockStatus;
use stocksight::modules::reports::services::aggregation;
use stocksight::modules::upstream::models::{Sale, SaleItem, SaleStatus};

fn completed_sale(day_offset: i64, cents: i64, customer_id: i64) -> Sale {
    let base = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap() + Duration::days(day_offset);
    Sale {
        id: day_offset * 1000 + customer_id,
        customer_id: Some(customer_id),
        customer_name: Some(format!("Customer {}", customer_id)),
        sale_date: Utc.from_utc_datetime(&base.and_hms_opt(10, 30, 0).unwrap()),
        total_amount: Decimal::new(cents, 2),
        status: SaleStatus::Completed,
        payment_method: "Cash".to_string(),
        items: vec![],
    }
}

proptest! {
    /// Summary totals always equal the sum over the daily series
    #[test]
    fn summary_reconciles_with_daily_series(
        amounts in prop::collection::vec((0i64..30, 1i64..500_000), 0..40)
    ) {
        let sales: Vec<Sale> = amounts
            .iter()
            .enumerate()
            .map(|(i, (day, cents))| completed_sale(*day, *cents, i as i64 + 1))
            .collect();

        let start = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2025, 3, 30).unwrap();
        let series = aggregation::daily_series(start, end, &sales);
        let summary = aggregation::sales_summary(&series);

        let series_total: Decimal = series.iter().map(|d| d.total_amount).sum();
        let series_orders: i64 = series.iter().map(|d| d.order_count).sum();

        prop_assert_eq!(summary.total_sales, series_total);
        prop_assert_eq!(summary.total_orders, series_orders);
        prop_assert_eq!(summary.total_orders, sales.len() as i64);
    }

    /// The daily series is gap-free and exactly spans the range
    #[test]
    fn daily_series_is_gap_free(
        amounts in prop::collection::vec((0i64..30, 1i64..500_000), 0..40),
        span_days in 0i64..60
    ) {
        let sales: Vec<Sale> = amounts
            .iter()
            .enumerate()
            .map(|(i, (day, cents))| completed_sale(*day, *cents, i as i64 + 1))
            .collect();

        let start = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
        let end = start + Duration::days(span_days);
        let series = aggregation::daily_series(start, end, &sales);

        prop_assert_eq!(series.len() as i64, span_days + 1);
        for (offset, entry) in series.iter().enumerate() {
            prop_assert_eq!(entry.date, start + Duration::days(offset as i64));
        }
    }

    /// Ranking twice over the same input yields the same list, and the
    /// list is descending and never longer than n
    #[test]
    fn top_customers_ranking_is_stable_and_bounded(
        amounts in prop::collection::vec((0i64..10, 1i64..100_000, 1i64..8), 0..30),
        n in 1usize..12
    ) {
        let sales: Vec<Sale> = amounts
            .iter()
            .map(|(day, cents, customer)| completed_sale(*day, *cents, *customer))
            .collect();

        let first = aggregation::top_customers(&sales, &[], n);
        let second = aggregation::top_customers(&sales, &[], n);

        prop_assert_eq!(&first, &second);
        prop_assert!(first.len() <= n);
        for pair in first.windows(2) {
            prop_assert!(pair[0].total_amount >= pair[1].total_amount);
        }
    }

    /// Growth of a month after a positive month matches the formula
    #[test]
    fn monthly_growth_matches_formula(
        january in 1i64..1_000_000,
        february in 0i64..1_000_000
    ) {
        let sales = vec![
            month_sale(1, january),
            month_sale(2, february),
        ];
        let months = aggregation::monthly_revenue(2025, &sales);

        let jan = Decimal::new(january, 2);
        let feb = Decimal::new(february, 2);
        let expected = ((feb - jan) / jan * Decimal::from(100)).round_dp(2);

        prop_assert_eq!(months[0].growth_percent, Decimal::ZERO);
        prop_assert_eq!(months[1].growth_percent, expected);
    }
}

fn month_sale(month: u32, cents: i64) -> Sale {
    let date = NaiveDate::from_ymd_opt(2025, month, 15).unwrap();
    Sale {
        id: i64::from(month),
        customer_id: Some(1),
        customer_name: None,
        sale_date: Utc.from_utc_datetime(&date.and_hms_opt(9, 0, 0).unwrap()),
        total_amount: Decimal::new(cents, 2),
        status: SaleStatus::Completed,
        payment_method: "Card".to_string(),
        items: vec![],
    }
}

/// Stock status boundary table
#[test]
fn test_stock_status_boundaries() {
    assert_eq!(StockStatus::of(0, 10), StockStatus::OutOfStock);
    assert_eq!(StockStatus::of(0, 0), StockStatus::OutOfStock);
    assert_eq!(StockStatus::of(1, 10), StockStatus::Low);
    assert_eq!(StockStatus::of(10, 10), StockStatus::Low);
    assert_eq!(StockStatus::of(11, 10), StockStatus::Normal);
    assert_eq!(StockStatus::of(5, 0), StockStatus::Normal);
}

/// Line-item net revenue uses the discounted unit price
#[test]
fn test_line_item_net_amount() {
    let item = SaleItem {
        product_id: 1,
        product_name: None,
        quantity: 3,
        unit_price: dec!(10.00),
        discount: dec!(1.50),
    };
    assert_eq!(item.net_amount(), dec!(25.50));
}

/// Pending and cancelled sales never reach financial aggregates
#[test]
fn test_non_completed_sales_are_excluded_everywhere() {
    let mut pending = completed_sale(0, 10_000, 1);
    pending.status = SaleStatus::Pending;
    let mut cancelled = completed_sale(1, 20_000, 2);
    cancelled.status = SaleStatus::Cancelled;
    let sales = vec![pending, cancelled];

    let start = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
    let series = aggregation::daily_series(start, start + Duration::days(2), &sales);
    assert!(series.iter().all(|d| d.order_count == 0));

    assert!(aggregation::top_customers(&sales, &[], 10).is_empty());
    assert!(aggregation::revenue_by_payment_method(&sales).is_empty());

    let months = aggregation::monthly_revenue(2025, &sales);
    assert!(months.iter().all(|m| m.revenue == Decimal::ZERO));
}
