//
// Arithmetic nodes of the AST, and the operator sugar that builds them.
//

use super::{sealed::Sealed, Binary, Expr, Node, Unary};
use crate::{error::Result, value::Number};
use alloc::boxed::Box;
use core::{fmt, ops};
use derive_more::Display;

///
/// A number leaf.
///
#[derive(Debug, Clone, Copy, PartialEq, Display)]
pub struct Literal(Number);

impl Literal {
    #[must_use]
    pub fn new(value: impl Into<Number>) -> Self {
        Self(value.into())
    }

    #[must_use]
    pub const fn value(&self) -> Number {
        self.0
    }
}

impl Sealed for Literal {}

impl Node for Literal {
    fn eval(&self) -> Result<Number> {
        Ok(self.0)
    }
}

//
// `-a`, `a + b`, `a - b`, `a * b` and `a / b` for node types, plus
// `n / a` with a plain number `n` on the left.
//
// Only one integer and one float type get `n / a`, so that unsuffixed
// literals like `2 / a` still infer.
//
macro_rules! composition_ops {
    (@binary $ty:ty: $($trait:ident::$method:ident => $node:ident),+) => {
        $(
            impl<R: Node + 'static> ops::$trait<R> for $ty {
                type Output = $node;

                fn $method(self, rhs: R) -> $node {
                    $node::new(self, rhs)
                }
            }
        )+
    };
    (@reflected $ty:ty: $($prim:ty),+) => {
        $(
            impl ops::Div<$ty> for $prim {
                type Output = RTrueDiv;

                fn div(self, rhs: $ty) -> RTrueDiv {
                    RTrueDiv::new(rhs, Literal::new(self))
                }
            }
        )+
    };
    ($($ty:ty),+ $(,)?) => {
        $(
            impl ops::Neg for $ty {
                type Output = Neg;

                fn neg(self) -> Neg {
                    Neg::new(self)
                }
            }

            composition_ops!(@binary $ty:
                Add::add => Add,
                Sub::sub => Sub,
                Mul::mul => Mul,
                Div::div => TrueDiv
            );
            composition_ops!(@reflected $ty: i32, f64);
        )+
    };
}

macro_rules! unary_op {
    ($(#[$meta:meta])* $vis:vis $name:ident($sym:literal) => $op:expr) => {
        $(#[$meta])*
        #[derive(Debug)]
        $vis struct $name {
            arg: Expr,
        }

        impl $name {
            #[must_use]
            pub fn new(arg: impl Node + 'static) -> Self {
                Self { arg: Box::new(arg) }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "({} {})", $sym, self.arg)
            }
        }

        impl Sealed for $name {}

        impl Node for $name {
            fn eval(&self) -> Result<Number> {
                $op(self.arg.eval()?)
            }
        }

        impl Unary for $name {
            fn operand(&self) -> &dyn Node {
                &*self.arg
            }
        }

        composition_ops!($name);
    };
}

//
// A reflected node keeps its operands in constructor order but evaluates
// and renders `rhs` first.
//
macro_rules! binary_op {
    (@def $(#[$meta:meta])* $vis:vis $name:ident($sym:literal) [$first:ident, $second:ident] => $op:expr) => {
        $(#[$meta])*
        #[derive(Debug)]
        $vis struct $name {
            lhs: Expr,
            rhs: Expr,
        }

        impl $name {
            #[must_use]
            pub fn new(lhs: impl Node + 'static, rhs: impl Node + 'static) -> Self {
                Self {
                    lhs: Box::new(lhs),
                    rhs: Box::new(rhs),
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "({} {} {})", $sym, self.$first, self.$second)
            }
        }

        impl Sealed for $name {}

        impl Node for $name {
            fn eval(&self) -> Result<Number> {
                let a = self.$first.eval()?;
                let b = self.$second.eval()?;
                $op(a, b)
            }
        }

        impl Binary for $name {
            fn operands(&self) -> [&dyn Node; 2] {
                [&*self.lhs, &*self.rhs]
            }
        }

        composition_ops!($name);
    };
    ($(#[$meta:meta])* $vis:vis $name:ident($sym:literal) => $op:expr) => {
        binary_op!(@def $(#[$meta])* $vis $name($sym) [lhs, rhs] => $op);
    };
    ($(#[$meta:meta])* $vis:vis $name:ident($sym:literal, reflected) => $op:expr) => {
        binary_op!(@def $(#[$meta])* $vis $name($sym) [rhs, lhs] => $op);
    };
}

unary_op!(
    /// `(- arg)`
    ///
    /// ```compile_fail
    /// use lispex::prelude::*;
    ///
    /// let _ = Neg::new(2.5);
    /// ```
    pub Neg("-") => Number::checked_neg
);

binary_op!(
    /// `(+ lhs rhs)`
    ///
    /// ```
    /// use lispex::prelude::*;
    ///
    /// let sum = Add::new(Literal::new(1), Literal::new(2));
    /// assert_eq!(sum.render(), "(+ 1 2)");
    /// ```
    ///
    /// Operands must be nodes; a plain number is not one:
    ///
    /// ```compile_fail
    /// use lispex::prelude::*;
    ///
    /// let _ = Add::new(1, Literal::new(2));
    /// ```
    pub Add("+") => Number::checked_add
);
binary_op!(
    /// `(- lhs rhs)`
    pub Sub("-") => Number::checked_sub
);
binary_op!(
    /// `(* lhs rhs)`
    pub Mul("*") => Number::checked_mul
);
binary_op!(
    /// `(/ lhs rhs)`, always a real.
    pub TrueDiv("/") => Number::true_div
);
binary_op!(
    /// `(/ rhs lhs)`: true division with the operands swapped.
    pub RTrueDiv("/", reflected) => Number::true_div
);
binary_op!(
    /// `(// lhs rhs)`, rounded toward negative infinity.
    pub FloorDiv("//") => Number::floor_div
);
binary_op!(
    /// `(// rhs lhs)`: floor division with the operands swapped.
    pub RFloorDiv("//", reflected) => Number::floor_div
);

composition_ops!(Literal, Expr);
