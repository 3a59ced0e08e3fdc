//! Formatting money amounts for people to read.

use std::sync::OnceLock;

use numfmt::{Formatter, Precision};

/// Format `number` as dollars with a thousands separator and two decimal places,
/// e.g. `-$1,234.50`.
pub fn format_currency(number: f64) -> String {
    static POSITIVE_FMT: OnceLock<Option<Formatter>> = OnceLock::new();
    static NEGATIVE_FMT: OnceLock<Option<Formatter>> = OnceLock::new();

    let positive_fmt = POSITIVE_FMT.get_or_init(|| currency_formatter("$"));
    let negative_fmt = NEGATIVE_FMT.get_or_init(|| currency_formatter("-$"));

    let formatted = if number == 0.0 || !number.is_finite() {
        None
    } else if number < 0.0 {
        negative_fmt
            .as_ref()
            .map(|formatter| formatter.fmt_string(number.abs()))
    } else {
        positive_fmt
            .as_ref()
            .map(|formatter| formatter.fmt_string(number))
    };

    match formatted {
        Some(formatted) => pad_cents(formatted),
        // numfmt renders zero as a bare "0"
        None if number == 0.0 => "$0.00".to_owned(),
        None => format!("${number:.2}"),
    }
}

fn currency_formatter(prefix: &str) -> Option<Formatter> {
    Formatter::currency(prefix)
        .ok()
        .map(|formatter| formatter.precision(Precision::Decimals(2)))
}

/// numfmt drops trailing zeros, so "12.30" comes out as "12.3" and "12.00" as "12".
fn pad_cents(mut formatted: String) -> String {
    match formatted.rfind('.') {
        Some(dot) => {
            let decimals = formatted.len() - dot - 1;
            for _ in decimals..2 {
                formatted.push('0');
            }
        }
        None => formatted.push_str(".00"),
    }

    formatted
}
