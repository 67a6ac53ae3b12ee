use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ProjectionError {
    #[error("{field} must be a finite number, got {value}")]
    NonFiniteInput { field: &'static str, value: f64 },
    #[error("year range {start_year}..{end_year} has no years to project")]
    EmptyRange { start_year: i32, end_year: i32 },
    #[error("year range {start_year}..{end_year} spans {years} years, at most {max} allowed")]
    RangeTooLong {
        start_year: i32,
        end_year: i32,
        years: u32,
        max: u32,
    },
    #[error("balance overflows in {year}; lower the interest rate or the year range")]
    NumericOverflow { year: i32 },
}
