use super::error::ProjectionError;
use super::summary::summarize;
use super::types::{Projection, SimulationInput, Trajectory, YearRow};

/// Monthly compounding.
pub const PERIODS_PER_YEAR: u32 = 12;

/// Longest year range `compute` will project.
pub const MAX_PROJECTION_YEARS: u32 = 500;

/// Balance after one year of compounding at `monthly_rate` per period with `deposit`
/// paid in at the end of every period.
///
/// A zero rate takes the limit of the annuity term (`deposit * periods_per_year`)
/// instead of dividing by zero.
pub fn compound_interest_step(
    principal: f64,
    monthly_rate: f64,
    periods_per_year: u32,
    deposit: f64,
) -> f64 {
    if monthly_rate == 0.0 {
        return principal + deposit * periods_per_year as f64;
    }

    let growth = (1.0 + monthly_rate).powi(periods_per_year as i32);
    principal * growth + deposit * (growth - 1.0) / monthly_rate
}

pub fn run_projection(input: &SimulationInput) -> Trajectory {
    let monthly_rate = input.monthly_rate();
    let years = input.years();

    let mut rows: Vec<YearRow> = Vec::with_capacity(years as usize);
    let mut balance = input.initial_balance;
    for offset in 1..=years {
        balance = compound_interest_step(
            balance,
            monthly_rate,
            PERIODS_PER_YEAR,
            input.monthly_deposit,
        );
        rows.push(YearRow {
            year: input.start_year + offset as i32,
            balance,
        });
    }
    Trajectory::from_rows(rows)
}

pub fn compute(input: SimulationInput) -> Result<Projection, ProjectionError> {
    validate_input(&input)?;

    let input = SimulationInput::new(
        input.start_year,
        input.end_year,
        input.initial_balance,
        input.monthly_deposit,
        input.annual_interest_rate_percent,
    );
    let years = input.years();
    if years > MAX_PROJECTION_YEARS {
        return Err(ProjectionError::RangeTooLong {
            start_year: input.start_year,
            end_year: input.end_year,
            years,
            max: MAX_PROJECTION_YEARS,
        });
    }

    let trajectory = run_projection(&input);
    if let Some(row) = trajectory.rows().iter().find(|row| !row.balance.is_finite()) {
        return Err(ProjectionError::NumericOverflow { year: row.year });
    }
    let summary = summarize(&input, &trajectory).ok_or(ProjectionError::EmptyRange {
        start_year: input.start_year,
        end_year: input.end_year,
    })?;

    log::debug!(
        "projected {} -> {} ({} rows)",
        input.start_year,
        input.end_year,
        trajectory.rows().len()
    );

    Ok(Projection {
        input,
        trajectory,
        summary,
    })
}

fn validate_input(input: &SimulationInput) -> Result<(), ProjectionError> {
    for (field, value) in [
        ("initialBalance", input.initial_balance),
        ("monthlyDeposit", input.monthly_deposit),
        ("yearlyInterest", input.annual_interest_rate_percent),
    ] {
        if !value.is_finite() {
            return Err(ProjectionError::NonFiniteInput { field, value });
        }
    }
    Ok(())
}
