// Chart renderer behavior: deterministic output, PNG encoding, and the
// empty-data placeholder path.

use chrono::{Duration, NaiveDate};
use rust_decimal::Decimal;

use stocksight::modules::export::{ChartRenderer, CHART_HEIGHT, CHART_WIDTH};
use stocksight::modules::reports::models::DailySales;

fn series(days: usize) -> Vec<DailySales> {
    let start = NaiveDate::from_ymd_opt(2025, 5, 1).unwrap();
    (0..days)
        .map(|i| DailySales {
            date: start + Duration::days(i as i64),
            total_amount: Decimal::new(1000 + i as i64 * 250, 2),
            order_count: i as i64 % 4,
        })
        .collect()
}

#[test]
fn test_line_chart_produces_png_and_rgb() {
    let chart = ChartRenderer::new()
        .line_chart("Daily Sales", &series(14))
        .unwrap();

    assert_eq!(chart.width, CHART_WIDTH);
    assert_eq!(chart.height, CHART_HEIGHT);
    assert_eq!(chart.rgb.len(), (CHART_WIDTH * CHART_HEIGHT * 3) as usize);
    // PNG signature
    assert_eq!(&chart.png[..8], &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A]);
}

#[test]
fn test_empty_series_renders_placeholder_not_error() {
    let renderer = ChartRenderer::new();

    assert!(renderer.line_chart("Daily Sales", &[]).is_ok());
    assert!(renderer.bar_chart("Top Products", &[]).is_ok());
    assert!(renderer.pie_chart("Revenue by Category", &[]).is_ok());
}

#[test]
fn test_rendering_is_deterministic() {
    let renderer = ChartRenderer::new();
    let data = series(30);

    let first = renderer.line_chart("Daily Sales", &data).unwrap();
    let second = renderer.line_chart("Daily Sales", &data).unwrap();

    assert_eq!(first.rgb, second.rgb);
    assert_eq!(first.png, second.png);
}

#[test]
fn test_bar_chart_handles_single_entry() {
    let chart = ChartRenderer::new()
        .bar_chart("Top Products", &[("Americano".to_string(), 420.0)])
        .unwrap();
    assert!(!chart.png.is_empty());
}

#[test]
fn test_pie_chart_drops_nonpositive_slices() {
    let entries = vec![
        ("Beverages".to_string(), 300.0),
        ("Refunds".to_string(), -25.0),
        ("Empty".to_string(), 0.0),
    ];
    // One positive slice remains; must render without error
    let chart = ChartRenderer::new()
        .pie_chart("Revenue by Category", &entries)
        .unwrap();
    assert!(!chart.png.is_empty());
}

#[test]
fn test_long_series_still_renders() {
    // Label thinning path: more than 10 points
    let chart = ChartRenderer::new()
        .line_chart("Daily Sales", &series(90))
        .unwrap();
    assert!(!chart.png.is_empty());
}
