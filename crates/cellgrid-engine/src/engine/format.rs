/// Format a number for display.
///
/// Integral values print without a fraction; everything else uses the
/// shortest representation that parses back to the same `f64`.
pub fn format_number(n: f64) -> String {
    if n == 0.0 {
        "0".to_string()
    } else if n.fract() == 0.0 && n.abs() < 1e10 {
        format!("{:.0}", n)
    } else {
        format!("{}", n)
    }
}
