use snafu::Snafu;

use kirin_ir::DType;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum Error {
    /// Kernel IR construction failed.
    #[snafu(display("kernel IR construction failed"))]
    Ir { source: kirin_ir::Error },

    #[snafu(display("Element type '{dtype}' is not supported by this operator"))]
    UnsupportedElementType { dtype: DType },
}
