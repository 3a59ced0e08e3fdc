//! Checks for amounts and dates before they reach the database.
//!
//! Dates use a single canonical format, `YYYY-MM-DD`, for input, storage and
//! display. Inputs with a time of day are rejected rather than truncated.

use time::{Date, format_description::BorrowedFormatItem, macros::format_description};

use crate::Error;

/// The canonical date format.
pub const DATE_FORMAT: &[BorrowedFormatItem] = format_description!("[year]-[month]-[day]");

// Serde (de)serialization in the canonical format, for `#[serde(with = "...")]`.
time::serde::format_description!(
    pub iso_date,
    Date,
    "[year]-[month]-[day]"
);

/// Check that `amount` is a finite number strictly greater than zero.
///
/// Returns the amount unchanged so the check can be chained.
///
/// # Errors
/// Returns [Error::InvalidAmount] for zero, negative, NaN or infinite amounts.
pub fn validate_amount(amount: f64) -> Result<f64, Error> {
    if amount.is_finite() && amount > 0.0 {
        Ok(amount)
    } else {
        Err(Error::InvalidAmount(format!(
            "{amount} is not a positive number"
        )))
    }
}

/// Parse `text` as a number and validate it with [validate_amount].
///
/// # Errors
/// Returns [Error::InvalidAmount] if `text` is not a number or is not positive.
pub fn parse_amount(text: &str) -> Result<f64, Error> {
    let text = text.trim();
    let amount: f64 = text
        .parse()
        .map_err(|_| Error::InvalidAmount(format!("\"{text}\" is not a number")))?;

    validate_amount(amount)
}

/// Parse a date in the canonical `YYYY-MM-DD` format.
///
/// Leading and trailing whitespace is ignored.
///
/// # Errors
/// Returns [Error::InvalidDate] if `text` does not match the format exactly or
/// names a day that does not exist, e.g. `2023-02-30`.
pub fn parse_date(text: &str) -> Result<Date, Error> {
    let text = text.trim();

    Date::parse(text, DATE_FORMAT).map_err(|error| {
        tracing::debug!("could not parse date {text:?}: {error}");
        Error::InvalidDate(text.to_owned())
    })
}

/// Format `date` in the canonical `YYYY-MM-DD` format.
pub fn format_date(date: Date) -> String {
    // The format only contains numeric components, which always format.
    date.format(DATE_FORMAT)
        .unwrap_or_else(|_| date.to_string())
}

#[cfg(test)]
mod amount_tests {
    use crate::{
        Error,
        validation::{parse_amount, validate_amount},
    };

    #[test]
    fn accepts_positive_amounts() {
        for amount in [0.01, 1.0, 42.5, 1_000_000.0] {
            assert_eq!(validate_amount(amount), Ok(amount));
        }
    }

    #[test]
    fn rejects_zero() {
        assert!(matches!(validate_amount(0.0), Err(Error::InvalidAmount(_))));
    }

    #[test]
    fn rejects_negative_amounts() {
        assert!(matches!(
            validate_amount(-12.5),
            Err(Error::InvalidAmount(_))
        ));
    }

    #[test]
    fn rejects_non_finite_amounts() {
        for amount in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            assert!(
                matches!(validate_amount(amount), Err(Error::InvalidAmount(_))),
                "{amount} should be rejected"
            );
        }
    }

    #[test]
    fn parse_amount_accepts_number_text() {
        assert_eq!(parse_amount(" 19.99 "), Ok(19.99));
    }

    #[test]
    fn parse_amount_rejects_non_numeric_text() {
        for text in ["", "abc", "12,50", "$5"] {
            assert!(
                matches!(parse_amount(text), Err(Error::InvalidAmount(_))),
                "{text:?} should be rejected"
            );
        }
    }

    #[test]
    fn parse_amount_rejects_negative_text() {
        assert!(matches!(parse_amount("-3"), Err(Error::InvalidAmount(_))));
    }
}

#[cfg(test)]
mod date_tests {
    use time::macros::date;

    use crate::{
        Error,
        validation::{format_date, parse_date},
    };

    #[test]
    fn parses_canonical_date() {
        assert_eq!(parse_date("2023-01-01"), Ok(date!(2023 - 01 - 01)));
    }

    #[test]
    fn ignores_surrounding_whitespace() {
        assert_eq!(parse_date(" 2024-02-29\n"), Ok(date!(2024 - 02 - 29)));
    }

    #[test]
    fn round_trips_dates() {
        for text in ["2023-01-01", "1999-12-31", "2024-02-29", "2025-10-05"] {
            let date = parse_date(text).expect("date should parse");

            assert_eq!(format_date(date), text);
        }
    }

    #[test]
    fn rejects_malformed_dates() {
        for text in [
            "",
            "2023-1-01",
            "23-01-01",
            "2023/01/01",
            "01.01.2023",
            "2023-13-01",
            "2023-02-30",
            "2023-01-01T10:30",
            "2023-01-01 10:30",
            "not a date",
        ] {
            assert_eq!(
                parse_date(text),
                Err(Error::InvalidDate(text.trim().to_owned())),
                "{text:?} should be rejected"
            );
        }
    }
}
