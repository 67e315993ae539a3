use chrono::NaiveDate;
use core_types::Transaction;
use rust_decimal::Decimal;

/// Parses a ledger date written as "M/D/YYYY" or "M/D/YY".
///
/// Two-digit years are read as 20YY. Returns `None` for anything else,
/// including impossible calendar dates such as 2/30/2024.
pub fn parse_ledger_date(raw: &str) -> Option<NaiveDate> {
    let mut parts = raw.trim().split('/');
    let (month, day, year) = (parts.next()?, parts.next()?, parts.next()?);
    if parts.next().is_some() {
        return None;
    }

    let month: u32 = parse_digits(month)?;
    let day: u32 = parse_digits(day)?;
    let year = year.trim();
    let year: i32 = match year.len() {
        2 => 2000 + parse_digits::<i32>(year)?,
        4 => parse_digits(year)?,
        _ => return None,
    };

    NaiveDate::from_ymd_opt(year, month, day)
}

fn parse_digits<T: std::str::FromStr>(s: &str) -> Option<T> {
    let s = s.trim();
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

/// Returns the ledger ordered by date, oldest first.
///
/// Entries with a missing or malformed date sort before every dated entry.
/// Entries on the same date keep their input order.
pub fn transaction_ledger_sort(transactions: &[Transaction]) -> Vec<Transaction> {
    let mut sorted = transactions.to_vec();
    // `None` orders before any `Some`, which places malformed dates first.
    sorted.sort_by_cached_key(|tx| parse_ledger_date(&tx.date));
    sorted
}

/// Total realized profit/loss booked across the ledger, or `None` if it overflows.
pub fn realized_pl_total(transactions: &[Transaction]) -> Option<Decimal> {
    transactions
        .iter()
        .filter_map(|tx| tx.realized_pl)
        .try_fold(Decimal::ZERO, |acc, pl| acc.checked_add(pl))
}
