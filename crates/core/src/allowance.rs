//! Allowance deduction for a member's active checklist.
//!
//! Every list item marked absent deducts its `value` from the member's base
//! allowance. The summary is recomputed on each read; nothing is cached
//! except the absence count the caller persists.

use serde::Serialize;

/// Result of applying a checklist's absences to a base allowance.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AllowanceSummary {
    /// Base allowance of the member.
    pub allowance: f64,
    /// Number of items marked absent.
    pub absence_count: i32,
    /// Sum of the values of absent items.
    pub discount: f64,
    /// `allowance - discount`. May go negative when deductions exceed the base.
    pub total: f64,
}

/// Summarize `(value, absent)` pairs against a base allowance.
pub fn summarize<I>(allowance: f64, items: I) -> AllowanceSummary
where
    I: IntoIterator<Item = (f64, bool)>,
{
    let (absence_count, discount) = items
        .into_iter()
        .filter(|(_, absent)| *absent)
        .fold((0i32, 0.0f64), |(count, sum), (value, _)| {
            (count + 1, sum + value)
        });

    AllowanceSummary {
        allowance,
        absence_count,
        discount,
        total: allowance - discount,
    }
}
