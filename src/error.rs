use crate::ast::Op;
use alloc::string::String;
use derive_more::Display;

pub type Result<T, E = Error> = core::result::Result<T, E>;

///
/// Everything that can go wrong while building or evaluating a tree.
///
#[derive(Debug, Clone, PartialEq, Display)]
pub enum Error {
    /// An operator was given the wrong number of operands.
    #[display("{op:?} expects {expected} operand(s), found {found}")]
    InvalidOperand {
        op: Op,
        expected: usize,
        found: usize,
    },

    /// A literal value that is neither an integer nor a real.
    #[display("invalid literal value `{_0}`")]
    InvalidLiteral(String),

    #[display("division by zero")]
    ZeroDivision,

    #[display("integer overflow")]
    Overflow,
}

impl core::error::Error for Error {}
