//! KPI number abbreviation

/// Abbreviate a KPI value for display.
///
/// Values strictly above 1000 are shown in thousands, rounded half to even,
/// with a `K` suffix. Anything else is shown as its integer part.
pub fn abbreviate(n: f64) -> String {
    if n > 1000.0 {
        format!("{}K", (n / 1000.0).round_ties_even() as i64)
    } else {
        format!("{}", n.trunc() as i64)
    }
}
