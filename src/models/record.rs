//! Normalized patient record
//!
//! A `PatientRecord` is derived once from the raw cells of one table row and
//! never changes afterwards. Every flag on it is a pure function of those
//! cells.

use chrono::NaiveDate;
use serde::Serialize;

use crate::algorithm::period::{Granularity, PeriodKey};
use crate::models::classify::{
    OutcomeDefinition, TreatmentHistory, TreatmentOutcome, is_risk_flag_set, parse_age,
    parse_count,
};
use crate::schema::{DateFormatConfig, RiskFactor, parse_date_string};

/// Raw cells of one table row, borrowed from the source columns
///
/// `None` means the cell is null or its column is absent; both are treated
/// the same way.
#[derive(Debug, Clone, Copy, Default)]
pub struct RawPatientRow<'a> {
    /// Diagnostic (enrollment) date text
    pub enrollment_date: Option<&'a str>,
    /// Treatment outcome text
    pub treatment_outcome: Option<&'a str>,
    /// Previous treatment history text
    pub treatment_history: Option<&'a str>,
    /// Age text
    pub age: Option<&'a str>,
    /// Risk indicator cells, indexed by [`RiskFactor::index`]
    pub risk: [Option<&'a str>; RiskFactor::COUNT],
    /// Contacts under 5 living with the index case
    pub ltbi_contacts_under5: Option<&'a str>,
    /// Positive TB cases among those contacts
    pub ltbi_positive_under5: Option<&'a str>,
    /// Contacts under 5 who completed TPT
    pub ltbi_tpt_completed: Option<&'a str>,
}

/// Yes/no risk indicators of one patient
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RiskIndicators {
    flags: [bool; RiskFactor::COUNT],
}

impl RiskIndicators {
    /// Classify the raw risk cells of a row
    #[must_use]
    pub fn from_raw(cells: &[Option<&str>; RiskFactor::COUNT]) -> Self {
        let mut flags = [false; RiskFactor::COUNT];
        for factor in RiskFactor::ALL {
            flags[factor.index()] = is_risk_flag_set(factor, cells[factor.index()]);
        }
        Self { flags }
    }

    /// Whether the given factor is set
    #[must_use]
    pub const fn is_set(&self, factor: RiskFactor) -> bool {
        self.flags[factor.index()]
    }

    /// Whether any factor is set
    #[must_use]
    pub fn any(&self) -> bool {
        self.flags.iter().any(|flag| *flag)
    }

    /// Iterate over the factors that are set
    pub fn factors(&self) -> impl Iterator<Item = RiskFactor> + '_ {
        RiskFactor::ALL.into_iter().filter(|f| self.is_set(*f))
    }
}

/// LTBI contact-tracing counters of one index case
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct LtbiContacts {
    /// Contacts under 5 living with the index case
    pub contacts_under5: f64,
    /// Positive TB cases among those contacts
    pub positive_under5: f64,
    /// Contacts under 5 who completed TPT
    pub tpt_completed: f64,
}

/// A normalized surveillance record
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PatientRecord {
    /// Diagnostic (enrollment) date
    pub enrollment_date: NaiveDate,
    /// Calendar month bucket of the enrollment date
    pub period_month: PeriodKey,
    /// Calendar quarter bucket of the enrollment date
    pub period_quarter: PeriodKey,
    /// Outcome text as recorded
    pub treatment_outcome_raw: String,
    /// Classified outcome
    pub treatment_outcome: TreatmentOutcome,
    /// Treatment history text as recorded
    pub previous_treatment_history: String,
    /// Classified treatment history
    pub treatment_history: TreatmentHistory,
    /// Age in years, `None` when not numeric
    pub age: Option<f64>,
    /// Age strictly below 14
    pub is_under_14: bool,
    /// Age strictly below 15
    pub is_under_15: bool,
    /// Age strictly above 65
    pub is_above_65: bool,
    /// Risk indicators from yes/no columns and HIV status
    pub risk: RiskIndicators,
    /// LTBI contact-tracing counters
    pub ltbi: LtbiContacts,
}

impl PatientRecord {
    /// Normalize one raw row
    ///
    /// Returns `None` when the enrollment date cannot be parsed; such rows
    /// are excluded from the dataset entirely.
    #[must_use]
    pub fn from_raw(row: &RawPatientRow<'_>, date_config: &DateFormatConfig) -> Option<Self> {
        let enrollment_date = parse_date_string(row.enrollment_date?, date_config)?;
        let age = parse_age(row.age);
        // A missing age compares false against every threshold
        let age_below = |limit: f64| age.is_some_and(|a| a < limit);

        Some(Self {
            enrollment_date,
            period_month: PeriodKey::from_date(enrollment_date, Granularity::Monthly),
            period_quarter: PeriodKey::from_date(enrollment_date, Granularity::Quarterly),
            treatment_outcome_raw: row.treatment_outcome.unwrap_or_default().to_string(),
            treatment_outcome: TreatmentOutcome::from_raw(row.treatment_outcome),
            previous_treatment_history: row.treatment_history.unwrap_or_default().to_string(),
            treatment_history: TreatmentHistory::from_raw(row.treatment_history),
            age,
            is_under_14: age_below(14.0),
            is_under_15: age_below(15.0),
            is_above_65: age.is_some_and(|a| a > 65.0),
            risk: RiskIndicators::from_raw(&row.risk),
            ltbi: LtbiContacts {
                contacts_under5: parse_count(row.ltbi_contacts_under5),
                positive_under5: parse_count(row.ltbi_positive_under5),
                tpt_completed: parse_count(row.ltbi_tpt_completed),
            },
        })
    }

    /// Outcome is "cured"
    #[must_use]
    pub fn is_cured(&self) -> bool {
        self.treatment_outcome == TreatmentOutcome::Cured
    }

    /// Outcome is "cured" or "completed"
    #[must_use]
    pub fn is_cured_or_completed(&self) -> bool {
        matches!(
            self.treatment_outcome,
            TreatmentOutcome::Cured | TreatmentOutcome::Completed
        )
    }

    /// Treatment counts as a success under the given definition
    #[must_use]
    pub fn is_successful(&self, definition: OutcomeDefinition) -> bool {
        match definition {
            OutcomeDefinition::CuredOnly => self.is_cured(),
            OutcomeDefinition::CuredOrCompleted => self.is_cured_or_completed(),
        }
    }

    /// Previous treatment history is "new"
    #[must_use]
    pub fn is_new_case(&self) -> bool {
        self.treatment_history == TreatmentHistory::New
    }

    /// Previous treatment history is "relapse"
    #[must_use]
    pub fn is_relapse_case(&self) -> bool {
        self.treatment_history == TreatmentHistory::Relapse
    }

    /// New or relapse case, the numerator of incidence
    #[must_use]
    pub fn is_new_or_relapse(&self) -> bool {
        self.is_new_case() || self.is_relapse_case()
    }

    /// Any risk indicator set, or under 15, or above 65
    #[must_use]
    pub fn is_high_risk(&self) -> bool {
        self.risk.any() || self.is_under_15 || self.is_above_65
    }

    /// Period bucket for the given granularity
    #[must_use]
    pub const fn period(&self, granularity: Granularity) -> PeriodKey {
        match granularity {
            Granularity::Monthly => self.period_month,
            Granularity::Quarterly => self.period_quarter,
        }
    }
}
