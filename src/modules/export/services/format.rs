// Money formatting shared by the chart axes and the PDF tables. The XLSX
// exporter formats numbers through cell format strings instead.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// "$1,234.56" style rendering of a monetary amount
pub fn currency(amount: Decimal) -> String {
    let rounded = amount.round_dp(2);
    let negative = rounded.is_sign_negative();
    let abs = rounded.abs();
    let text = format!("{:.2}", abs);
    let (whole, cents) = text.split_once('.').unwrap_or((text.as_str(), "00"));

    format!(
        "{}${}.{}",
        if negative { "-" } else { "" },
        group_thousands(whole),
        cents
    )
}

/// Whole-dollar axis tick label, "$1,234"
pub fn axis_currency(value: f64) -> String {
    let negative = value < 0.0;
    let whole = value.abs().round() as u64;
    format!(
        "{}${}",
        if negative { "-" } else { "" },
        group_thousands(&whole.to_string())
    )
}

/// "12.34%" rendering of an already-scaled percentage
pub fn percent(value: Decimal) -> String {
    format!("{}%", value.round_dp(2))
}

/// Convert a Decimal to the f64 the chart and spreadsheet layers need
pub fn to_f64(amount: Decimal) -> f64 {
    amount.to_f64().unwrap_or(0.0)
}
