//! Computed cell values.

use std::fmt;

use super::format::format_number;

/// Evaluation failure carried as a value rather than an error.
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq)]
pub enum FormulaError {
    /// A reference points outside the grid.
    Ref,
    /// The expression or one of its operands is not a usable number.
    Value,
    /// Division by zero or a non-finite result.
    Arithmetic,
}

impl FormulaError {
    pub fn code(&self) -> &'static str {
        match self {
            FormulaError::Ref => "#REF!",
            FormulaError::Value => "#VALUE!",
            FormulaError::Arithmetic => "#ARITHM!",
        }
    }
}

impl fmt::Display for FormulaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// The value a cell evaluates to.
#[derive(Clone, Debug, PartialEq)]
pub enum CellValue {
    Text(String),
    Number(f64),
    Error(FormulaError),
}

impl CellValue {
    /// Interpret this value as a formula operand.
    ///
    /// Empty text reads as zero, other text must parse as a finite number.
    pub fn as_operand(&self) -> Result<f64, FormulaError> {
        match self {
            CellValue::Number(n) => Ok(*n),
            CellValue::Text(s) if s.is_empty() => Ok(0.0),
            CellValue::Text(s) => s
                .parse::<f64>()
                .ok()
                .filter(|n| n.is_finite())
                .ok_or(FormulaError::Value),
            CellValue::Error(e) => Err(*e),
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Text(s) => f.write_str(s),
            CellValue::Number(n) => f.write_str(&format_number(*n)),
            CellValue::Error(e) => write!(f, "{}", e),
        }
    }
}
