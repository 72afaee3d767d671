//! Column contract for raw surveillance tables
//!
//! Column names are matched exactly. Two columns are required; all others
//! are optional and degrade to a neutral default when absent.

use std::fmt;

use arrow::datatypes::Schema;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SurveillanceError};

/// Risk indicators that make a patient part of the high-risk group
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskFactor {
    /// Incarcerated
    Prisoner,
    /// Contact of a bacteriologically confirmed (TPB+) case
    ContactOfConfirmedCase,
    /// Contact of a multidrug-resistant TB case
    ContactOfDrugResistantCase,
    /// Diabetic
    Diabetic,
    /// Mining worker
    MiningWorker,
    /// Refugee
    Refugee,
    /// HIV positive
    HivPositive,
}

impl RiskFactor {
    /// Number of risk factors
    pub const COUNT: usize = 7;

    /// All risk factors in column order
    pub const ALL: [Self; Self::COUNT] = [
        Self::Prisoner,
        Self::ContactOfConfirmedCase,
        Self::ContactOfDrugResistantCase,
        Self::Diabetic,
        Self::MiningWorker,
        Self::Refugee,
        Self::HivPositive,
    ];

    /// Position of this factor in [`RiskFactor::ALL`]
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// The literal a normalized cell value must equal for the flag to be set
    #[must_use]
    pub const fn positive_literal(self) -> &'static str {
        match self {
            Self::HivPositive => "positive",
            _ => "yes",
        }
    }

    /// Get the display name for this risk factor
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Prisoner => "Prisoner",
            Self::ContactOfConfirmedCase => "Contact of TPB+",
            Self::ContactOfDrugResistantCase => "Contact of MDR-TB",
            Self::Diabetic => "Diabetic",
            Self::MiningWorker => "Mining worker",
            Self::Refugee => "Refugee",
            Self::HivPositive => "HIV positive",
        }
    }
}

impl fmt::Display for RiskFactor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Exact column names of the raw dataset
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnNames {
    /// Diagnostic (enrollment) date, required
    pub enrollment_date: String,
    /// Treatment outcome, required
    pub treatment_outcome: String,
    /// Previous treatment history (new / relapse / ...)
    pub treatment_history: String,
    /// Current age in years
    pub age: String,
    /// Prisoner yes/no
    pub prisoner: String,
    /// Contact of TPB+ yes/no
    pub contact_of_confirmed_case: String,
    /// Contact of MDR-TB yes/no
    pub contact_of_drug_resistant_case: String,
    /// Diabetic yes/no
    pub diabetic: String,
    /// Mining worker yes/no
    pub mining_worker: String,
    /// Refugee yes/no
    pub refugee: String,
    /// HIV status (positive / negative / ...)
    pub hiv_status: String,
    /// Number of contacts under 5 living with the index case
    pub ltbi_contacts_under5: String,
    /// Number of positive TB cases among contacts under 5
    pub ltbi_positive_under5: String,
    /// Number of contacts under 5 with TPT completed
    pub ltbi_tpt_completed: String,
}

impl Default for ColumnNames {
    fn default() -> Self {
        Self {
            enrollment_date: "Enrollment date(Diagnostic Date)".to_string(),
            treatment_outcome: "Treatment outcome".to_string(),
            treatment_history: "Previous treatment history".to_string(),
            age: "TB_Current age".to_string(),
            prisoner: "Prisoners".to_string(),
            contact_of_confirmed_case: "Contact of TPB+".to_string(),
            contact_of_drug_resistant_case: "Contact of MDR - TB".to_string(),
            diabetic: "Diabetic (new)".to_string(),
            mining_worker: "Mining worker (new)".to_string(),
            // Trailing space is part of the source column name
            refugee: "Refugee ".to_string(),
            hiv_status: "HIV status".to_string(),
            ltbi_contacts_under5: "Number of contacts <5 years living with index case".to_string(),
            ltbi_positive_under5: "Number of positive TB cases among contacts <5 years"
                .to_string(),
            ltbi_tpt_completed: "Number of < 5 years contacts with TPT completed".to_string(),
        }
    }
}

impl ColumnNames {
    /// Column holding the given risk factor
    #[must_use]
    pub fn risk_column(&self, factor: RiskFactor) -> &str {
        match factor {
            RiskFactor::Prisoner => &self.prisoner,
            RiskFactor::ContactOfConfirmedCase => &self.contact_of_confirmed_case,
            RiskFactor::ContactOfDrugResistantCase => &self.contact_of_drug_resistant_case,
            RiskFactor::Diabetic => &self.diabetic,
            RiskFactor::MiningWorker => &self.mining_worker,
            RiskFactor::Refugee => &self.refugee,
            RiskFactor::HivPositive => &self.hiv_status,
        }
    }

    /// Columns without which no dataset can be built
    #[must_use]
    pub fn required(&self) -> [&str; 2] {
        [&self.enrollment_date, &self.treatment_outcome]
    }

    /// The three LTBI contact-tracing columns
    #[must_use]
    pub fn ltbi(&self) -> [&str; 3] {
        [
            &self.ltbi_contacts_under5,
            &self.ltbi_positive_under5,
            &self.ltbi_tpt_completed,
        ]
    }

    /// Every optional column, in a stable order
    #[must_use]
    pub fn optional(&self) -> Vec<&str> {
        let mut columns = vec![self.treatment_history.as_str(), self.age.as_str()];
        columns.extend(RiskFactor::ALL.iter().map(|f| self.risk_column(*f)));
        columns.extend(self.ltbi());
        columns
    }
}

/// Which columns a particular table provides
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnPresence {
    /// Previous treatment history present
    pub treatment_history: bool,
    /// Age present
    pub age: bool,
    /// Per risk factor, indexed by [`RiskFactor::index`]
    pub risk: [bool; RiskFactor::COUNT],
    /// All three LTBI columns present
    pub ltbi: bool,
    /// Names of optional columns that are absent
    pub missing_optional: Vec<String>,
}

impl ColumnPresence {
    /// Check a table schema against the column contract
    ///
    /// Fails only when a required column is absent.
    pub fn detect(schema: &Schema, columns: &ColumnNames) -> Result<Self> {
        let has = |name: &str| schema.index_of(name).is_ok();

        if let Some(missing) = columns.required().into_iter().find(|name| !has(*name)) {
            return Err(SurveillanceError::missing_column(missing));
        }

        let mut risk = [false; RiskFactor::COUNT];
        for factor in RiskFactor::ALL {
            risk[factor.index()] = has(columns.risk_column(factor));
        }

        let missing_optional = columns
            .optional()
            .into_iter()
            .filter(|name| !has(*name))
            .map(str::to_string)
            .collect();

        Ok(Self {
            treatment_history: has(columns.treatment_history.as_str()),
            age: has(columns.age.as_str()),
            risk,
            ltbi: columns.ltbi().into_iter().all(has),
            missing_optional,
        })
    }
}
