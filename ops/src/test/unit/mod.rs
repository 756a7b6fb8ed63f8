mod hardmax;

use kirin_ir::{element_count, Machine};

use crate::ExternOp;

/// Run a single-input kernel through the reference interpreter.
///
/// The output buffer starts as NaN so a missed element is visible instead
/// of blending in with the zero-fill pass.
pub(crate) fn run_unary(op: &ExternOp, input: Vec<f64>) -> Vec<f64> {
    let mut machine = Machine::new();
    machine.bind_buffer(op.input_views()[0], input);
    machine.bind_buffer(op.output_view(), vec![f64::NAN; element_count(op.output_shape())]);
    machine.run(op.body()).unwrap();
    machine.take_buffer(op.output_view()).unwrap()
}
