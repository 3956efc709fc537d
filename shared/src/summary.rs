//! Dashboard and report aggregation over record snapshots

use std::collections::HashMap;

use chrono::Datelike;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::Bayaran;
use crate::query::ListRecord;
use crate::validation::parse_display_date;

/// Label used for records with no value in the grouped field
pub const NO_VALUE_LABEL: &str = "Tiada";

/// Number of records sharing one field value
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GroupCount {
    pub label: String,
    pub count: usize,
}

/// Count records per distinct value of `field`, largest group first and
/// ties broken by label
pub fn count_by<'a, R, I>(records: I, field: R::Field) -> Vec<GroupCount>
where
    R: ListRecord + 'a,
    I: IntoIterator<Item = &'a R>,
{
    let mut counts: HashMap<String, usize> = HashMap::new();
    for record in records {
        let value = record.field(field);
        let text = value.as_text();
        let label = if text.trim().is_empty() {
            NO_VALUE_LABEL.to_string()
        } else {
            text.into_owned()
        };
        *counts.entry(label).or_default() += 1;
    }

    let mut groups: Vec<GroupCount> = counts
        .into_iter()
        .map(|(label, count)| GroupCount { label, count })
        .collect();
    groups.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.label.cmp(&b.label)));
    groups
}

/// Sum of `amaun` bucketed by the month of `tarikh_terima` within `year`.
/// Index 0 is January. Records with unparsable dates are skipped.
pub fn monthly_totals<'a, I>(payments: I, year: i32) -> [Decimal; 12]
where
    I: IntoIterator<Item = &'a Bayaran>,
{
    let mut totals = [Decimal::ZERO; 12];
    for payment in payments {
        let Some(date) = payment.tarikh_terima.as_deref().and_then(parse_display_date) else {
            continue;
        };
        if date.year() == year {
            totals[date.month0() as usize] += payment.amaun;
        }
    }
    totals
}

/// Total `amaun` of the given payments
pub fn sum_amount<'a, I>(payments: I) -> Decimal
where
    I: IntoIterator<Item = &'a Bayaran>,
{
    payments.into_iter().map(|p| p.amaun).sum()
}
