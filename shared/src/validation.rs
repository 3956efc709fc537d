//! Validation and parsing utilities for Rekod Pejabat
//!
//! Record dates arrive in the `DD/MM/YYYY` display format used by the office
//! spreadsheets. Parsing is deliberately forgiving: anything malformed yields
//! `None` so list screens keep working over imperfect legacy data.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use rust_decimal::Decimal;

// ============================================================================
// Display Dates
// ============================================================================

/// Parse a `DD/MM/YYYY` display date.
///
/// Returns `None` for a wrong separator, wrong segment count, non-numeric
/// segments or an impossible calendar date. A trailing time component
/// (`DD/MM/YYYY HH:MM`) is accepted and ignored.
pub fn parse_display_date(value: &str) -> Option<NaiveDate> {
    parse_display_datetime(value).map(|dt| dt.date())
}

/// Parse a `DD/MM/YYYY[ HH:MM[:SS]]` display timestamp.
///
/// A date without a time component is placed at midnight.
pub fn parse_display_datetime(value: &str) -> Option<NaiveDateTime> {
    let mut parts = value.split_whitespace();
    let date_part = parts.next()?;
    let time_part = parts.next();
    if parts.next().is_some() {
        return None;
    }

    let segments: Vec<&str> = date_part.split('/').collect();
    if segments.len() != 3 {
        return None;
    }
    if segments
        .iter()
        .any(|s| s.is_empty() || !s.chars().all(|c| c.is_ascii_digit()))
    {
        return None;
    }
    if segments[0].len() > 2 || segments[1].len() > 2 || segments[2].len() != 4 {
        return None;
    }

    let day: u32 = segments[0].parse().ok()?;
    let month: u32 = segments[1].parse().ok()?;
    let year: i32 = segments[2].parse().ok()?;
    let date = NaiveDate::from_ymd_opt(year, month, day)?;

    let time = match time_part {
        None => NaiveTime::MIN,
        Some(t) => NaiveTime::parse_from_str(t, "%H:%M:%S")
            .or_else(|_| NaiveTime::parse_from_str(t, "%H:%M"))
            .ok()?,
    };

    Some(date.and_time(time))
}

/// Format a date in the `DD/MM/YYYY` display format
pub fn format_display_date(date: NaiveDate) -> String {
    date.format("%d/%m/%Y").to_string()
}

/// Validate that a user-entered date is a well-formed display date
pub fn validate_display_date(value: &str) -> Result<(), &'static str> {
    if parse_display_date(value).is_some() {
        Ok(())
    } else {
        Err("Date must use the DD/MM/YYYY format")
    }
}

// ============================================================================
// Search
// ============================================================================

/// Extract the numeric id from an exact-id search such as `#42`.
///
/// Returns `None` when the query does not start with `#`. Returns `Some("")`
/// or a non-numeric remainder unchanged so the caller can treat it as a
/// lookup that matches nothing.
pub fn id_lookup(query: &str) -> Option<&str> {
    query.strip_prefix('#')
}

/// Check that an id lookup remainder is purely numeric
pub fn is_numeric_id(value: &str) -> bool {
    !value.is_empty() && value.chars().all(|c| c.is_ascii_digit())
}

// ============================================================================
// Roles and Accounts
// ============================================================================

/// Validate a role machine name (2-50 chars of letters, digits or underscore)
pub fn validate_role_name(name: &str) -> Result<(), &'static str> {
    if name.len() < 2 {
        return Err("Role name must be at least 2 characters");
    }
    if name.len() > 50 {
        return Err("Role name must be at most 50 characters");
    }
    if !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err("Role name may only contain letters, digits and underscores");
    }
    Ok(())
}

/// Validate email format (basic check)
pub fn validate_email(email: &str) -> Result<(), &'static str> {
    if email.contains('@') && email.contains('.') && email.len() >= 5 {
        Ok(())
    } else {
        Err("Invalid email format")
    }
}

/// Validate password strength
pub fn validate_password(password: &str) -> Result<(), &'static str> {
    if password.len() < 8 {
        return Err("Password must be at least 8 characters");
    }
    Ok(())
}

// ============================================================================
// Payments
// ============================================================================

/// Validate a payment amount (non-negative, at most two decimal places)
pub fn validate_amount(amount: Decimal) -> Result<(), &'static str> {
    if amount < Decimal::ZERO {
        return Err("Amount cannot be negative");
    }
    if amount.normalize().scale() > 2 {
        return Err("Amount cannot have more than two decimal places");
    }
    Ok(())
}
