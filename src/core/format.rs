/// Rendered in place of an amount that is NaN or infinite.
pub const INVALID_AMOUNT_PLACEHOLDER: &str = "Rp -,-";

/// Renders an amount as a display string. Implementations must be total over
/// every `f64`.
pub trait CurrencyFormatter {
    fn format(&self, amount: f64) -> String;
}

/// Whole-unit currency layout: symbol, thousands separator, and the gap between
/// symbol and digits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurrencyFormat {
    pub symbol: &'static str,
    pub thousands_separator: char,
    pub symbol_separator: &'static str,
    pub invalid_placeholder: &'static str,
}

impl CurrencyFormat {
    /// Indonesian Rupiah as rendered by the `id-ID` locale.
    pub const RUPIAH: CurrencyFormat = CurrencyFormat {
        symbol: "Rp",
        thousands_separator: '.',
        symbol_separator: "\u{a0}",
        invalid_placeholder: INVALID_AMOUNT_PLACEHOLDER,
    };
}

impl CurrencyFormatter for CurrencyFormat {
    fn format(&self, amount: f64) -> String {
        if !amount.is_finite() {
            return self.invalid_placeholder.to_string();
        }

        // ties away from zero
        let rounded = amount.round();
        let digits = format!("{:.0}", rounded.abs());
        let grouped = group_digits(&digits, self.thousands_separator);
        let sign = if rounded < 0.0 { "-" } else { "" };
        format!("{sign}{}{}{grouped}", self.symbol, self.symbol_separator)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RupiahFormatter;

impl CurrencyFormatter for RupiahFormatter {
    fn format(&self, amount: f64) -> String {
        CurrencyFormat::RUPIAH.format(amount)
    }
}

pub fn format_rupiah(amount: f64) -> String {
    RupiahFormatter.format(amount)
}

fn group_digits(digits: &str, separator: char) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(separator);
        }
        out.push(ch);
    }
    out
}
