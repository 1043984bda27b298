#![no_std]
#![forbid(unsafe_code)]

extern crate alloc;

pub mod ast;
pub mod error;
pub mod lex;
pub mod value;

pub mod prelude {
    pub use crate::ast::{expr::*, Binary, Expr, Node, Op, Ternary, Unary};
    pub use crate::error::{Error, Result};
    pub use crate::value::Number;
}
