//! Pure aggregation over raw upstream entities. No I/O: everything here is
//! a deterministic function of its inputs, which is what keeps the PDF,
//! XLSX, CSV, and JSON renderings of one report numerically identical.

use std::collections::HashMap;

use chrono::{Datelike, Duration, NaiveDate};
use rust_decimal::Decimal;

use crate::modules::reports::models::{
    CategoryInventory, CategoryRevenue, CustomerSales, DailySales, MonthlyRevenue,
    PaymentMethodRevenue, ProductInventory, ProductSales, SalesSummary, StockStatus,
};
use crate::modules::upstream::models::{Category, Customer, Product, Sale, SaleStatus};

/// Default ranking size for top-N lists
pub const DEFAULT_TOP_N: usize = 10;

fn is_completed(sale: &Sale) -> bool {
    sale.status == SaleStatus::Completed
}

/// Build a gap-free daily series over `[start, end]` inclusive.
/// Days without completed sales carry zero amount and zero count, so date
/// axes never have holes.
pub fn daily_series(start: NaiveDate, end: NaiveDate, sales: &[Sale]) -> Vec<DailySales> {
    let mut by_day: HashMap<NaiveDate, (Decimal, i64)> = HashMap::new();
    for sale in sales.iter().filter(|s| is_completed(s)) {
        let day = sale.sale_date.date_naive();
        let entry = by_day.entry(day).or_insert((Decimal::ZERO, 0));
        entry.0 += sale.total_amount;
        entry.1 += 1;
    }

    let mut series = Vec::new();
    let mut day = start;
    while day <= end {
        let (total_amount, order_count) = by_day.get(&day).copied().unwrap_or((Decimal::ZERO, 0));
        series.push(DailySales {
            date: day,
            total_amount,
            order_count,
        });
        day += Duration::days(1);
    }

    series
}

/// Summarize a daily series. Deriving the summary from the same line items
/// the exporters print guarantees the totals always reconcile.
pub fn sales_summary(daily: &[DailySales]) -> SalesSummary {
    let total_sales: Decimal = daily.iter().map(|d| d.total_amount).sum();
    let total_orders: i64 = daily.iter().map(|d| d.order_count).sum();
    let average_order_value = if total_orders > 0 {
        (total_sales / Decimal::from(total_orders)).round_dp(2)
    } else {
        Decimal::ZERO
    };

    SalesSummary {
        total_sales,
        total_orders,
        average_order_value,
    }
}

/// Rank products by revenue across completed sales.
///
/// Grouping preserves first-seen order so the descending stable sort breaks
/// revenue ties by insertion order. Truncation to `n` happens only after
/// the full sort. Products missing from the catalog keep their sale-line
/// name or fall back to "Product ID {id}" rather than being dropped.
pub fn top_products(sales: &[Sale], products: &[Product], n: usize) -> Vec<ProductSales> {
    let catalog: HashMap<i64, &Product> = products.iter().map(|p| (p.id, p)).collect();

    let mut order: Vec<i64> = Vec::new();
    let mut grouped: HashMap<i64, ProductSales> = HashMap::new();

    for sale in sales.iter().filter(|s| is_completed(s)) {
        for item in &sale.items {
            let entry = grouped.entry(item.product_id).or_insert_with(|| {
                order.push(item.product_id);
                let (product_name, sku) = match catalog.get(&item.product_id) {
                    Some(product) => (product.name.clone(), product.sku.clone()),
                    None => (
                        item.product_name
                            .clone()
                            .unwrap_or_else(|| format!("Product ID {}", item.product_id)),
                        None,
                    ),
                };
                ProductSales {
                    product_id: item.product_id,
                    product_name,
                    sku,
                    quantity_sold: 0,
                    revenue: Decimal::ZERO,
                }
            });
            entry.quantity_sold += i64::from(item.quantity);
            entry.revenue += item.net_amount();
        }
    }

    let mut ranked: Vec<ProductSales> = order
        .into_iter()
        .filter_map(|id| grouped.remove(&id))
        .collect();
    ranked.sort_by(|a, b| b.revenue.cmp(&a.revenue));
    ranked.truncate(n);
    ranked
}

/// Rank customers by completed-sale amount, same stable-sort-then-truncate
/// policy as [`top_products`]. Anonymous sales (no customer id) are skipped.
pub fn top_customers(sales: &[Sale], customers: &[Customer], n: usize) -> Vec<CustomerSales> {
    let directory: HashMap<i64, &Customer> = customers.iter().map(|c| (c.id, c)).collect();

    let mut order: Vec<i64> = Vec::new();
    let mut grouped: HashMap<i64, CustomerSales> = HashMap::new();

    for sale in sales.iter().filter(|s| is_completed(s)) {
        let Some(customer_id) = sale.customer_id else {
            continue;
        };
        let entry = grouped.entry(customer_id).or_insert_with(|| {
            order.push(customer_id);
            let customer_name = match directory.get(&customer_id) {
                Some(customer) => customer.name.clone(),
                None => sale
                    .customer_name
                    .clone()
                    .unwrap_or_else(|| format!("Customer ID {}", customer_id)),
            };
            CustomerSales {
                customer_id,
                customer_name,
                order_count: 0,
                total_amount: Decimal::ZERO,
            }
        });
        entry.order_count += 1;
        entry.total_amount += sale.total_amount;
    }

    let mut ranked: Vec<CustomerSales> = order
        .into_iter()
        .filter_map(|id| grouped.remove(&id))
        .collect();
    ranked.sort_by(|a, b| b.total_amount.cmp(&a.total_amount));
    ranked.truncate(n);
    ranked
}

/// Per-category stock rollup. Every fetched category appears, including
/// those with no matching products.
pub fn category_rollup(categories: &[Category], products: &[Product]) -> Vec<CategoryInventory> {
    categories
        .iter()
        .map(|category| {
            let mut product_count = 0i64;
            let mut stock_count = 0i64;
            let mut stock_value = Decimal::ZERO;

            for product in products
                .iter()
                .filter(|p| p.category_id == Some(category.id))
            {
                product_count += 1;
                stock_count += i64::from(product.stock_quantity);
                stock_value += product.price * Decimal::from(product.stock_quantity);
            }

            CategoryInventory {
                category_id: category.id,
                category_name: category.name.clone(),
                product_count,
                stock_count,
                stock_value,
            }
        })
        .collect()
}

/// Per-product inventory lines with derived stock value and status
pub fn product_inventory(products: &[Product]) -> Vec<ProductInventory> {
    products
        .iter()
        .map(|product| ProductInventory {
            product_id: product.id,
            product_name: product.name.clone(),
            sku: product.sku.clone(),
            stock_quantity: product.stock_quantity,
            minimum_stock: product.minimum_stock,
            unit_price: product.price,
            stock_value: product.price * Decimal::from(product.stock_quantity),
            status: StockStatus::of(product.stock_quantity, product.minimum_stock),
        })
        .collect()
}

/// Completed-sale line-item net revenue grouped by resolved category name.
/// Lines whose product or category cannot be resolved land in
/// "Uncategorized". Output is sorted descending by revenue.
pub fn revenue_by_category(
    sales: &[Sale],
    products: &[Product],
    categories: &[Category],
) -> Vec<CategoryRevenue> {
    let catalog: HashMap<i64, &Product> = products.iter().map(|p| (p.id, p)).collect();
    let category_names: HashMap<i64, &str> =
        categories.iter().map(|c| (c.id, c.name.as_str())).collect();

    let mut order: Vec<String> = Vec::new();
    let mut grouped: HashMap<String, CategoryRevenue> = HashMap::new();

    for sale in sales.iter().filter(|s| is_completed(s)) {
        for item in &sale.items {
            let name = catalog
                .get(&item.product_id)
                .and_then(|product| {
                    product
                        .category_id
                        .and_then(|id| category_names.get(&id).map(|n| n.to_string()))
                        .or_else(|| product.category_name.clone())
                })
                .unwrap_or_else(|| "Uncategorized".to_string());

            let entry = grouped.entry(name.clone()).or_insert_with(|| {
                order.push(name.clone());
                CategoryRevenue {
                    category_name: name,
                    revenue: Decimal::ZERO,
                    transaction_count: 0,
                }
            });
            entry.revenue += item.net_amount();
            entry.transaction_count += 1;
        }
    }

    let mut rollup: Vec<CategoryRevenue> = order
        .into_iter()
        .filter_map(|name| grouped.remove(&name))
        .collect();
    rollup.sort_by(|a, b| b.revenue.cmp(&a.revenue));
    rollup
}

/// Completed-sale line-item net revenue grouped by payment method string,
/// sorted descending by revenue.
pub fn revenue_by_payment_method(sales: &[Sale]) -> Vec<PaymentMethodRevenue> {
    let mut order: Vec<String> = Vec::new();
    let mut grouped: HashMap<String, PaymentMethodRevenue> = HashMap::new();

    for sale in sales.iter().filter(|s| is_completed(s)) {
        let entry = grouped
            .entry(sale.payment_method.clone())
            .or_insert_with(|| {
                order.push(sale.payment_method.clone());
                PaymentMethodRevenue {
                    payment_method: sale.payment_method.clone(),
                    revenue: Decimal::ZERO,
                    transaction_count: 0,
                }
            });
        for item in &sale.items {
            entry.revenue += item.net_amount();
            entry.transaction_count += 1;
        }
    }

    let mut rollup: Vec<PaymentMethodRevenue> = order
        .into_iter()
        .filter_map(|name| grouped.remove(&name))
        .collect();
    rollup.sort_by(|a, b| b.revenue.cmp(&a.revenue));
    rollup
}

/// Revenue and transaction count for months 1..=12 of `year`, with growth
/// computed against the preceding month of this very sequence.
pub fn monthly_revenue(year: i32, sales: &[Sale]) -> Vec<MonthlyRevenue> {
    let mut months = Vec::with_capacity(12);
    let mut previous_revenue: Option<Decimal> = None;

    for month in 1..=12u32 {
        let mut revenue = Decimal::ZERO;
        let mut transaction_count = 0i64;

        for sale in sales.iter().filter(|s| is_completed(s)) {
            let date = sale.sale_date.date_naive();
            if date.year() == year && date.month() == month {
                revenue += sale.total_amount;
                transaction_count += 1;
            }
        }

        let growth_percent = match previous_revenue {
            Some(prev) if prev > Decimal::ZERO => {
                ((revenue - prev) / prev * Decimal::from(100)).round_dp(2)
            }
            _ => Decimal::ZERO,
        };

        months.push(MonthlyRevenue {
            year,
            month,
            revenue,
            transaction_count,
            growth_percent,
        });
        previous_revenue = Some(revenue);
    }

    months
}
