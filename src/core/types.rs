use std::fmt;

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulationInput {
    pub start_year: i32,
    pub end_year: i32,
    pub initial_balance: f64,
    pub monthly_deposit: f64,
    pub annual_interest_rate_percent: f64,
}

impl SimulationInput {
    /// Builds an input snapshot, pulling `end_year` up to `start_year + 1` when the
    /// range is empty or inverted.
    pub fn new(
        start_year: i32,
        end_year: i32,
        initial_balance: f64,
        monthly_deposit: f64,
        annual_interest_rate_percent: f64,
    ) -> Self {
        Self {
            start_year,
            end_year: clamp_end_year(start_year, end_year),
            initial_balance,
            monthly_deposit,
            annual_interest_rate_percent,
        }
    }

    /// Number of projected years. Zero when `end_year` is not after `start_year`,
    /// which `clamp_end_year` only lets through at `i32::MAX`.
    pub fn years(&self) -> u32 {
        u32::try_from(self.end_year.saturating_sub(self.start_year)).unwrap_or(0)
    }

    pub fn monthly_rate(&self) -> f64 {
        (self.annual_interest_rate_percent / 12.0) / 100.0
    }
}

pub fn clamp_end_year(start_year: i32, end_year: i32) -> i32 {
    if end_year <= start_year {
        start_year.saturating_add(1)
    } else {
        end_year
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct YearRow {
    pub year: i32,
    pub balance: f64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Trajectory {
    rows: Vec<YearRow>,
}

impl Trajectory {
    pub(crate) fn from_rows(rows: Vec<YearRow>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[YearRow] {
        &self.rows
    }

    pub fn final_balance(&self) -> Option<f64> {
        self.rows.last().map(|row| row.balance)
    }
}

/// Growth of the final balance over the no-interest baseline, in percent.
///
/// A zero baseline with a nonzero final balance has no finite percentage and is
/// reported as `Unbounded` instead of an infinite float.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum PercentUplift {
    Finite(f64),
    Unbounded,
}

impl fmt::Display for PercentUplift {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PercentUplift::Finite(value) => write!(f, "{value:+.2}%"),
            PercentUplift::Unbounded => f.write_str("n/a"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Summary {
    pub no_interest_balance: f64,
    pub percent_uplift: PercentUplift,
    pub monthly_withdrawal: f64,
    pub annual_withdrawal: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Projection {
    pub input: SimulationInput,
    pub trajectory: Trajectory,
    pub summary: Summary,
}
