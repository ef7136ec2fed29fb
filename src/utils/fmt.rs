// src/utils/fmt.rs

//! Notification formatting helpers.

use std::fmt::Display;

use chrono::{DateTime, TimeZone, Utc};
use chrono_tz::US::Pacific;

/// Format a byte count as megabytes with the raw count alongside.
pub fn format_size(byte_amount: u64) -> String {
    let megabytes = byte_amount as f64 / 1_000_000.0;
    format!(
        "{:.2} MB ({} bytes)",
        megabytes,
        group_thousands(byte_amount)
    )
}

/// Short day/month 12-hour timestamp.
pub fn format_datetime<Tz: TimeZone>(dt: &DateTime<Tz>) -> String
where
    Tz::Offset: Display,
{
    dt.format("%d/%m %I:%M %p").to_string()
}

/// Footer line showing the moment in both UTC and US/Pacific.
pub fn dual_timezone_footer(now: DateTime<Utc>) -> String {
    let pacific = now.with_timezone(&Pacific);
    format!(
        "{} UTC, {} Pacific",
        format_datetime(&now),
        format_datetime(&pacific)
    )
}

fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}
