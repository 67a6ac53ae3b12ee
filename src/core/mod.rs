mod engine;
mod error;
mod format;
mod session;
mod summary;
mod types;

pub use engine::{
    MAX_PROJECTION_YEARS, PERIODS_PER_YEAR, compound_interest_step, compute, run_projection,
};
pub use error::ProjectionError;
pub use format::{
    CurrencyFormat, CurrencyFormatter, INVALID_AMOUNT_PLACEHOLDER, RupiahFormatter, format_rupiah,
};
pub use session::Session;
pub use summary::{
    SAFE_WITHDRAWAL_RATE, annual_withdrawal, monthly_withdrawal, no_interest_balance,
    percentage_increase, summarize,
};
pub use types::{
    PercentUplift, Projection, SimulationInput, Summary, Trajectory, YearRow, clamp_end_year,
};
