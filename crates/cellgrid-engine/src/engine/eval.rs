//! Rhai-backed formula evaluation.
//!
//! Formula expressions are evaluated as Rhai expressions. Every reference
//! token (`A1`, `b2`, ...) is bound as a constant in the evaluation scope,
//! holding the numeric value of the referenced cell. Failures never escape as
//! errors: they become [`FormulaError`] values.

use std::fmt;

use log::trace;
use rhai::{Dynamic, Engine, EvalAltResult, Scope};

use super::cell::{Cell, Formula};
use super::position::Position;
use super::value::{CellValue, FormulaError};

/// Upper bound on Rhai operations per formula.
const MAX_OPERATIONS: u64 = 100_000;

/// Read access to the cells a formula may reference.
pub trait CellLookup {
    /// The cell stored at `pos`, if any.
    fn cell_at(&self, pos: Position) -> Option<&Cell>;

    /// Engine used to evaluate formula cells reached through this lookup.
    fn formula_engine(&self) -> &FormulaEngine;

    /// Whether `pos` is addressable; reading anything else yields `#REF!`.
    fn is_valid_position(&self, pos: Position) -> bool {
        pos.is_valid()
    }
}

/// Evaluates formula expressions.
pub struct FormulaEngine {
    engine: Engine,
}

impl FormulaEngine {
    pub fn new() -> Self {
        let mut engine = Engine::new();
        engine.set_max_operations(MAX_OPERATIONS);
        FormulaEngine { engine }
    }

    /// Evaluate `formula`, reading referenced values through `lookup`.
    ///
    /// Absent cells read as zero. A reference the lookup cannot address yields `#REF!`,
    /// and the first error among referenced values is propagated as-is.
    pub fn evaluate<L: CellLookup + ?Sized>(&self, formula: &Formula, lookup: &L) -> CellValue {
        let mut scope = Scope::new();
        for reference in formula.references() {
            let Some(pos) = reference
                .valid_position()
                .filter(|&pos| lookup.is_valid_position(pos))
            else {
                return CellValue::Error(FormulaError::Ref);
            };
            let operand = match lookup.cell_at(pos) {
                Some(cell) => cell.value(lookup).as_operand(),
                None => Ok(0.0),
            };
            match operand {
                Ok(n) => {
                    scope.push_constant(reference.token.clone(), n);
                }
                Err(e) => return CellValue::Error(e),
            }
        }

        match self
            .engine
            .eval_expression_with_scope::<Dynamic>(&mut scope, formula.expression())
        {
            Ok(value) => value_from_dynamic(value),
            Err(err) => {
                trace!("formula `{}` failed: {}", formula.expression(), err);
                CellValue::Error(error_from_eval(&err))
            }
        }
    }
}

impl Default for FormulaEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for FormulaEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FormulaEngine").finish_non_exhaustive()
    }
}

fn error_from_eval(err: &EvalAltResult) -> FormulaError {
    match err {
        EvalAltResult::ErrorArithmetic(..) => FormulaError::Arithmetic,
        _ => FormulaError::Value,
    }
}

fn value_from_dynamic(value: Dynamic) -> CellValue {
    if let Ok(n) = value.as_float() {
        return number(n);
    }
    if let Ok(n) = value.as_int() {
        return number(n as f64);
    }
    if value.is_string() {
        return value
            .into_string()
            .map(CellValue::Text)
            .unwrap_or(CellValue::Error(FormulaError::Value));
    }
    CellValue::Error(FormulaError::Value)
}

fn number(n: f64) -> CellValue {
    if n.is_finite() {
        CellValue::Number(n)
    } else {
        CellValue::Error(FormulaError::Arithmetic)
    }
}
