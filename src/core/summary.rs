use super::engine::PERIODS_PER_YEAR;
use super::types::{PercentUplift, SimulationInput, Summary, Trajectory};

/// Share of the final balance that can be withdrawn each year under the 4% rule.
pub const SAFE_WITHDRAWAL_RATE: f64 = 0.04;

/// What the balance would be with deposits alone and no interest.
pub fn no_interest_balance(input: &SimulationInput) -> f64 {
    input.initial_balance
        + PERIODS_PER_YEAR as f64 * input.years() as f64 * input.monthly_deposit
}

/// Percentage change from `baseline` to `value`, rounded to two decimals (ties toward
/// positive infinity). Changes with no finite percentage are `Unbounded`.
pub fn percentage_increase(baseline: f64, value: f64) -> PercentUplift {
    if baseline == 0.0 {
        if value != 0.0 {
            return PercentUplift::Unbounded;
        }
        return PercentUplift::Finite(0.0);
    }

    let increase = round_to_cents(((value - baseline) / baseline.abs()) * 100.0);
    if !increase.is_finite() {
        return PercentUplift::Unbounded;
    }
    PercentUplift::Finite(increase)
}

fn round_to_cents(value: f64) -> f64 {
    (value * 100.0 + 0.5).floor() / 100.0
}

pub fn monthly_withdrawal(final_balance: f64) -> f64 {
    final_balance * SAFE_WITHDRAWAL_RATE / 12.0
}

pub fn annual_withdrawal(final_balance: f64) -> f64 {
    final_balance * SAFE_WITHDRAWAL_RATE
}

/// Derives the summary figures from the last projected year. Returns `None` for an
/// empty trajectory.
pub fn summarize(input: &SimulationInput, trajectory: &Trajectory) -> Option<Summary> {
    let final_balance = trajectory.final_balance()?;
    let baseline = no_interest_balance(input);
    Some(Summary {
        no_interest_balance: baseline,
        percent_uplift: percentage_increase(baseline, final_balance),
        monthly_withdrawal: monthly_withdrawal(final_balance),
        annual_withdrawal: annual_withdrawal(final_balance),
    })
}
