//! Scalar surveillance indicators
//!
//! Headline numbers computed over a filtered view: cured cases, LTBI
//! preventive-therapy coverage, annualized incidence, and the pediatric and
//! notification summaries.

use serde::Serialize;

use crate::algorithm::filter::DatasetView;
use crate::models::PatientRecord;

/// Average number of days in a month, used to annualize case counts
pub const DAYS_PER_MONTH: f64 = 30.44;

/// Incidence and rates are expressed per this many people
pub const PER_POPULATION: f64 = 100_000.0;

/// Round to one decimal place
#[must_use]
pub fn round_to_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Headline indicators
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BigNumbers {
    /// Records whose outcome is strictly "cured"
    pub total_cured: usize,
    /// LTBI preventive-therapy coverage in percent, within [0, 100]
    pub ltbi_coverage_pct: f64,
    /// Annualized new and relapse cases per 100 000 population
    pub yearly_incidence_per_100k: f64,
}

/// Summed LTBI contact-tracing counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct LtbiTotals {
    /// Contacts under 5 living with an index case
    pub contacts_under5: f64,
    /// Positive TB cases among those contacts
    pub positive_under5: f64,
    /// Contacts under 5 who completed TPT
    pub tpt_completed: f64,
    /// Contacts eligible for TPT, never negative
    pub eligible: f64,
}

impl LtbiTotals {
    /// Coverage in percent, capped at 100, zero without eligible contacts
    #[must_use]
    pub fn coverage_pct(&self) -> f64 {
        if self.eligible <= 0.0 {
            return 0.0;
        }
        (self.tpt_completed / self.eligible * 100.0).min(100.0)
    }
}

/// Under-14 case mix
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct PediatricSummary {
    /// Records with age below 14
    pub total_under14: usize,
    /// New or relapse cases among them
    pub new_or_relapse_under14: usize,
    /// Share of new or relapse cases in percent, one decimal
    pub new_or_relapse_pct: f64,
}

/// New and relapse notifications in their most recent month
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LatestNotifications {
    /// New cases in the latest month with any new case
    pub new_cases: usize,
    /// Relapse cases in the latest month with any relapse case
    pub relapse_cases: usize,
}

/// Compute the headline indicators over a view
#[must_use]
pub fn big_numbers(view: &DatasetView<'_>, reference_population: f64) -> BigNumbers {
    let total_cured = view.iter().filter(|r| r.is_cured()).count();
    let ltbi_coverage_pct = ltbi_totals(view).map_or(0.0, |totals| totals.coverage_pct());

    BigNumbers {
        total_cured,
        ltbi_coverage_pct: round_to_one_decimal(ltbi_coverage_pct),
        yearly_incidence_per_100k: round_to_one_decimal(yearly_incidence_per_100k(
            view,
            reference_population,
        )),
    }
}

/// Sum the LTBI counters of a view
///
/// Returns `None` when the source data lacked any of the LTBI columns.
#[must_use]
pub fn ltbi_totals(view: &DatasetView<'_>) -> Option<LtbiTotals> {
    if !view.ltbi_available() {
        return None;
    }

    let mut totals = view.iter().fold(LtbiTotals::default(), |mut acc, record| {
        acc.contacts_under5 += record.ltbi.contacts_under5;
        acc.positive_under5 += record.ltbi.positive_under5;
        acc.tpt_completed += record.ltbi.tpt_completed;
        acc
    });
    // Eligibility is taken on the sums, not per record
    totals.eligible = (totals.contacts_under5 - totals.positive_under5).max(0.0);
    Some(totals)
}

/// Annualized incidence of new and relapse cases per 100 000, unrounded
///
/// The observation span is the distance between the earliest and latest
/// enrollment date in the view, at least one month.
#[must_use]
pub fn yearly_incidence_per_100k(view: &DatasetView<'_>, reference_population: f64) -> f64 {
    let Some((first, last)) = view.date_bounds() else {
        return 0.0;
    };
    if reference_population <= 0.0 {
        return 0.0;
    }

    let total_cases = view.iter().filter(|r| r.is_new_or_relapse()).count() as f64;
    let days = (last - first).num_days() as f64;
    let months_span = (days / DAYS_PER_MONTH).max(1.0);
    let yearly_cases = total_cases / months_span * 12.0;
    yearly_cases / reference_population * PER_POPULATION
}

/// Count under-14 records and the new or relapse cases among them
#[must_use]
pub fn pediatric_summary(view: &DatasetView<'_>) -> PediatricSummary {
    let (total_under14, new_or_relapse_under14) = view
        .iter()
        .filter(|r| r.is_under_14)
        .fold((0, 0), |(total, new_or_relapse), r| {
            (total + 1, new_or_relapse + usize::from(r.is_new_or_relapse()))
        });

    let new_or_relapse_pct = if total_under14 == 0 {
        0.0
    } else {
        round_to_one_decimal(new_or_relapse_under14 as f64 / total_under14 as f64 * 100.0)
    };

    PediatricSummary {
        total_under14,
        new_or_relapse_under14,
        new_or_relapse_pct,
    }
}

/// Count new and relapse cases in their respective latest months
#[must_use]
pub fn latest_notifications(view: &DatasetView<'_>) -> LatestNotifications {
    let latest_count = |matches: fn(&PatientRecord) -> bool| -> usize {
        let Some(latest) = view.iter().filter(|r| matches(r)).map(|r| r.period_month).max()
        else {
            return 0;
        };
        view.iter()
            .filter(|r| matches(r) && r.period_month == latest)
            .count()
    };

    LatestNotifications {
        new_cases: latest_count(|r| r.is_new_case()),
        relapse_cases: latest_count(|r| r.is_relapse_case()),
    }
}
