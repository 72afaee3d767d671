//! Categorical distributions for pie-style summaries
//!
//! Outcome and high-risk distributions look at the latest calendar month of
//! the view only, and list the categories that actually occur. The under-14
//! distribution covers the whole view.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use crate::algorithm::filter::DatasetView;
use crate::models::{OutcomeDefinition, PatientRecord};

/// Category counts keyed by category
pub type Distribution<C> = BTreeMap<C, usize>;

/// Treatment outcome category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum OutcomeCategory {
    /// Cured, when success means "cured" only
    #[serde(rename = "Cured")]
    Cured,
    /// Cured or completed, when success includes completion
    #[serde(rename = "Cured+Completed")]
    CuredOrCompleted,
    /// Every other outcome
    #[serde(rename = "Others")]
    Others,
}

impl OutcomeCategory {
    /// Category of a record under the given definition
    #[must_use]
    pub fn of(record: &PatientRecord, definition: OutcomeDefinition) -> Self {
        match (record.is_successful(definition), definition) {
            (false, _) => Self::Others,
            (true, OutcomeDefinition::CuredOnly) => Self::Cured,
            (true, OutcomeDefinition::CuredOrCompleted) => Self::CuredOrCompleted,
        }
    }
}

impl fmt::Display for OutcomeCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cured => write!(f, "Cured"),
            Self::CuredOrCompleted => write!(f, "Cured+Completed"),
            Self::Others => write!(f, "Others"),
        }
    }
}

/// High-risk membership category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum RiskCategory {
    /// Any risk indicator, or age under 15 or above 65
    #[serde(rename = "High Risk")]
    HighRisk,
    /// Everyone else
    #[serde(rename = "Others")]
    Others,
}

impl fmt::Display for RiskCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::HighRisk => write!(f, "High Risk"),
            Self::Others => write!(f, "Others"),
        }
    }
}

/// Case type category for pediatric cases
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum CaseTypeCategory {
    /// New or relapse case
    #[serde(rename = "New/Relapse")]
    NewOrRelapse,
    /// Any other treatment history
    #[serde(rename = "Other")]
    Other,
}

impl fmt::Display for CaseTypeCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NewOrRelapse => write!(f, "New/Relapse"),
            Self::Other => write!(f, "Other"),
        }
    }
}

/// Count occurrences; categories that never occur are absent
fn tally<C: Ord>(categories: impl Iterator<Item = C>) -> Distribution<C> {
    categories.fold(BTreeMap::new(), |mut counts, category| {
        *counts.entry(category).or_insert(0) += 1;
        counts
    })
}

/// Outcome distribution of the latest month in the view
#[must_use]
pub fn treatment_outcome_distribution(
    view: &DatasetView<'_>,
    definition: OutcomeDefinition,
) -> Distribution<OutcomeCategory> {
    tally(
        view.latest_month()
            .into_iter()
            .map(|r| OutcomeCategory::of(r, definition)),
    )
}

/// High-risk distribution of the latest month in the view
#[must_use]
pub fn high_risk_distribution(view: &DatasetView<'_>) -> Distribution<RiskCategory> {
    tally(view.latest_month().into_iter().map(|r| {
        if r.is_high_risk() {
            RiskCategory::HighRisk
        } else {
            RiskCategory::Others
        }
    }))
}

/// New or relapse share among under-14 records of the whole view
///
/// Empty when the view has no under-14 records; otherwise both categories
/// are present, possibly with a zero count.
#[must_use]
pub fn under14_distribution(view: &DatasetView<'_>) -> Distribution<CaseTypeCategory> {
    let (total, new_or_relapse) = view
        .iter()
        .filter(|r| r.is_under_14)
        .fold((0usize, 0usize), |(total, hits), r| {
            (total + 1, hits + usize::from(r.is_new_or_relapse()))
        });

    if total == 0 {
        return Distribution::new();
    }
    Distribution::from([
        (CaseTypeCategory::NewOrRelapse, new_or_relapse),
        (CaseTypeCategory::Other, total - new_or_relapse),
    ])
}
