//! Grid primitives and the formula engine.
//!
//! - [`Grid`], [`Row`], [`cell_at`] - Plain string tables with lenient reads
//! - [`CellRef`] - Cell reference parsing (A1 notation ↔ row/col indices)
//! - [`CellRange`], [`parse_range`] - Rectangular ranges such as `A1:B5`
//! - [`CellValues`] - Numeric snapshot consulted by formulas
//! - [`preprocess_formula`] - Replace range calls and references with numbers
//! - [`evaluate_formula`] - Evaluate a formula cell with the arithmetic evaluator
//! - [`numeric_value`] - The lenient "number in this cell" rule
//! - [`format_number`] - Render values for display

mod cell_ref;
mod eval;
mod format;
mod grid;
mod numeric;
mod preprocess;
mod range;
mod values;

pub use cell_ref::CellRef;
pub use eval::{MAX_NESTING_DEPTH, eval_arithmetic, evaluate_formula, validate_formula};
pub use format::{fixed_decimal_string, format_number, money_string};
pub use grid::{Grid, Row, cell_at, data_rows, header_at, is_blank};
pub use numeric::{is_plain_number, numeric_value, parse_float_prefix, plain_number, strip_non_numeric};
pub use preprocess::{expand_range_functions, preprocess_formula, substitute_cell_refs};
pub use range::{CellRange, MAX_RANGE_CELLS, cell_ref_re, parse_range, referenced_cells};
pub use values::CellValues;
