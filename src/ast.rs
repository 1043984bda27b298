use crate::{
    error::{Error, Result},
    value::Number,
};
use alloc::{
    boxed::Box,
    string::{String, ToString},
    vec::Vec,
};
use core::fmt;
use expr::{
    Add, FloorDiv, Literal, Mul, Neg, RFloorDiv, RTrueDiv, Sub, TrueDiv,
};

pub mod expr;

mod sealed {
    pub trait Sealed {}

    impl<T: Sealed + ?Sized> Sealed for alloc::boxed::Box<T> {}
}

///
/// An evaluatable AST node.
///
/// A node's [`Display`](fmt::Display) output is its prefix rendering,
/// e.g. `(+ 2 (* 3 4))`. Nodes are immutable once built, so they can be
/// evaluated from several threads at once.
///
pub trait Node: fmt::Display + fmt::Debug + Send + Sync + sealed::Sealed {
    ///
    /// Evaluate the tree rooted at this node.
    ///
    /// # Errors
    ///
    /// The first numeric error raised by any node, unchanged.
    ///
    fn eval(&self) -> Result<Number>;

    fn render(&self) -> String {
        self.to_string()
    }

    ///
    /// `self // rhs`.
    ///
    fn floor_div<R: Node + 'static>(self, rhs: R) -> FloorDiv
    where
        Self: Sized + 'static,
    {
        FloorDiv::new(self, rhs)
    }

    ///
    /// `lhs / self`, for a plain number on the left.
    ///
    fn rtrue_div(self, lhs: impl Into<Number>) -> RTrueDiv
    where
        Self: Sized + 'static,
    {
        RTrueDiv::new(self, Literal::new(lhs))
    }

    ///
    /// `lhs // self`, for a plain number on the left.
    ///
    fn rfloor_div(self, lhs: impl Into<Number>) -> RFloorDiv
    where
        Self: Sized + 'static,
    {
        RFloorDiv::new(self, Literal::new(lhs))
    }
}

impl<T: Node + ?Sized> Node for Box<T> {
    fn eval(&self) -> Result<Number> {
        (**self).eval()
    }
}

///
/// An owned node of any kind.
///
pub type Expr = Box<dyn Node>;

pub trait Unary: Node {
    fn operand(&self) -> &dyn Node;
}

pub trait Binary: Node {
    ///
    /// Both operands in construction order.
    ///
    /// For reflected nodes this is the reverse of the order they are
    /// evaluated and rendered in.
    ///
    fn operands(&self) -> [&dyn Node; 2];
}

///
/// A node over three operands.
///
/// No node in this crate has three operands yet.
///
pub trait Ternary: Node {
    fn operands(&self) -> [&dyn Node; 3];
}

///
/// The operator of a non-literal node, for building nodes at run time.
///
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    Neg,
    Add,
    Sub,
    Mul,
    TrueDiv,
    RTrueDiv,
    FloorDiv,
    RFloorDiv,
}

impl Op {
    #[must_use]
    pub const fn arity(self) -> usize {
        match self {
            Op::Neg => 1,
            _ => 2,
        }
    }

    ///
    /// Build a node of this kind over `operands`, in constructor order.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidOperand`] if the number of operands doesn't match
    /// [`Op::arity`].
    ///
    pub fn apply(self, operands: Vec<Expr>) -> Result<Expr> {
        let found = operands.len();
        let mut operands = operands.into_iter();

        let expr: Expr =
            match (self, operands.next(), operands.next(), operands.next()) {
                (Op::Neg, Some(a), None, None) => Box::new(Neg::new(a)),
                (Op::Add, Some(a), Some(b), None) => Box::new(Add::new(a, b)),
                (Op::Sub, Some(a), Some(b), None) => Box::new(Sub::new(a, b)),
                (Op::Mul, Some(a), Some(b), None) => Box::new(Mul::new(a, b)),
                (Op::TrueDiv, Some(a), Some(b), None) => {
                    Box::new(TrueDiv::new(a, b))
                }
                (Op::RTrueDiv, Some(a), Some(b), None) => {
                    Box::new(RTrueDiv::new(a, b))
                }
                (Op::FloorDiv, Some(a), Some(b), None) => {
                    Box::new(FloorDiv::new(a, b))
                }
                (Op::RFloorDiv, Some(a), Some(b), None) => {
                    Box::new(RFloorDiv::new(a, b))
                }
                _ => {
                    return Err(Error::InvalidOperand {
                        op: self,
                        expected: self.arity(),
                        found,
                    })
                }
            };

        Ok(expr)
    }
}

#[cfg(test)]
mod test {
    use super::{expr::*, sealed::Sealed, Binary, Expr, Node, Op, Ternary, Unary};
    use crate::{
        error::{Error, Result},
        value::Number,
    };
    use alloc::{boxed::Box, format, vec, vec::Vec};
    use core::fmt;

    fn lit(value: impl Into<Number>) -> Expr {
        Box::new(Literal::new(value))
    }

    #[test]
    fn literal() {
        for v in [0, 7, -12] {
            assert_eq!(Literal::new(v).eval(), Ok(Number::Int(i64::from(v))));
            assert_eq!(Literal::new(v).render(), format!("{v}"));
        }

        assert_eq!(Literal::new(3_u8).value(), Number::Int(3));
        assert_eq!(Literal::new(2.5).eval(), Ok(Number::Real(2.5)));
        assert_eq!(Literal::new(2.5).render(), "2.5");
        assert_eq!(Literal::new(2.0).render(), "2.0");
        assert_eq!(Literal::new(-0.125).render(), "-0.125");
    }

    #[test]
    fn neg() {
        let expr = -Literal::new(5);
        assert_eq!(expr.eval(), Ok(Number::Int(-5)));
        assert_eq!(expr.render(), "(- 5)");

        let expr = -(Literal::new(1) + Literal::new(2.5));
        assert_eq!(expr.eval(), Ok(Number::Real(-3.5)));
        assert_eq!(expr.render(), "(- (+ 1 2.5))");

        let expr = -(-Literal::new(4));
        assert_eq!(expr.eval(), Ok(Number::Int(4)));
        assert_eq!(expr.render(), "(- (- 4))");
    }

    #[test]
    fn composition() {
        let expr = Literal::new(2) + Literal::new(3) * Literal::new(4);
        assert_eq!(expr.render(), "(+ 2 (* 3 4))");
        assert_eq!(expr.eval(), Ok(Number::Int(14)));
    }

    //
    // Subtraction and multiplication compute their own operation; they
    // must not fall back to addition.
    //
    #[test]
    fn sub_and_mul_do_not_add() {
        let sub = Literal::new(10) - Literal::new(4);
        assert_eq!(sub.render(), "(- 10 4)");
        assert_eq!(sub.eval(), Ok(Number::Int(6)));

        let mul = Literal::new(6) * Literal::new(7);
        assert_eq!(mul.render(), "(* 6 7)");
        assert_eq!(mul.eval(), Ok(Number::Int(42)));

        let expr = (Literal::new(1) - Literal::new(3)) * Literal::new(0.5);
        assert_eq!(expr.render(), "(* (- 1 3) 0.5)");
        assert_eq!(expr.eval(), Ok(Number::Real(-1.0)));
    }

    #[test]
    fn true_div() {
        let expr = Literal::new(1) / Literal::new(4);
        assert_eq!(expr.render(), "(/ 1 4)");
        assert_eq!(expr.eval(), Ok(Number::Real(0.25)));

        // whole quotients are still reals
        assert_eq!(
            (Literal::new(8) / Literal::new(2)).render(),
            "(/ 8 2)"
        );
        assert!(matches!(
            (Literal::new(8) / Literal::new(2)).eval(),
            Ok(Number::Real(_))
        ));
    }

    #[test]
    fn reflected_true_div() {
        let (a, b) = (Literal::new(7), Literal::new(2));
        let forward = TrueDiv::new(a, b);
        let reflected = RTrueDiv::new(b, a);

        assert_eq!(forward.eval(), reflected.eval());
        assert_eq!(forward.eval(), Ok(Number::Real(3.5)));
        assert_eq!(forward.render(), "(/ 7 2)");
        assert_eq!(reflected.render(), "(/ 7 2)");
    }

    #[test]
    fn number_on_the_left() {
        let expr = 2 / Literal::new(4);
        assert_eq!(expr.render(), "(/ 2 4)");
        assert_eq!(expr.eval(), Ok(Number::Real(0.5)));

        let expr = 1.5 / (Literal::new(1) + Literal::new(2));
        assert_eq!(expr.render(), "(/ 1.5 (+ 1 2))");
        assert_eq!(expr.eval(), Ok(Number::Real(0.5)));

        let expr = Literal::new(4).rtrue_div(2);
        assert_eq!(expr.render(), "(/ 2 4)");

        let expr = Literal::new(3).rfloor_div(10);
        assert_eq!(expr.render(), "(// 10 3)");
        assert_eq!(expr.eval(), Ok(Number::Int(3)));
    }

    #[test]
    fn floor_div() {
        let expr = Literal::new(10).floor_div(Literal::new(3));
        assert_eq!(expr.render(), "(// 10 3)");
        assert_eq!(expr.eval(), Ok(Number::Int(3)));

        let expr = Literal::new(-10).floor_div(Literal::new(3));
        assert_eq!(expr.eval(), Ok(Number::Int(-4)));

        let expr = FloorDiv::new(Literal::new(-7), Literal::new(2));
        assert_eq!(expr.render(), "(// -7 2)");
        assert_eq!(expr.eval(), Ok(Number::Int(-4)));

        let expr = FloorDiv::new(Literal::new(-7.0), Literal::new(2));
        assert_eq!(expr.eval(), Ok(Number::Real(-4.0)));
    }

    #[test]
    fn reflected_floor_div() {
        let forward = FloorDiv::new(Literal::new(-7), Literal::new(2));
        let reflected = RFloorDiv::new(Literal::new(2), Literal::new(-7));

        assert_eq!(forward.eval(), reflected.eval());
        assert_eq!(reflected.render(), "(// -7 2)");
    }

    #[test]
    fn numeric_errors_propagate() {
        assert_eq!(
            (Literal::new(1) / Literal::new(0)).eval(),
            Err(Error::ZeroDivision)
        );

        let expr = Literal::new(1)
            + Literal::new(2) * Literal::new(1).floor_div(Literal::new(0.0));
        assert_eq!(expr.eval(), Err(Error::ZeroDivision));
        assert_eq!(expr.render(), "(+ 1 (* 2 (// 1 0.0)))");

        let expr = -Literal::new(i64::MIN);
        assert_eq!(expr.eval(), Err(Error::Overflow));
    }

    #[test]
    fn render_is_stable() {
        let expr = (Literal::new(1) + -Literal::new(2))
            / Literal::new(3).floor_div(Literal::new(0.5));

        let first = expr.render();
        assert_eq!(first, "(/ (+ 1 (- 2)) (// 3 0.5))");
        assert_eq!(expr.render(), first);
        assert_eq!(format!("{expr}"), first);
        assert_eq!(expr.eval(), expr.eval());
    }

    #[test]
    fn boxed() {
        let expr = lit(1) + lit(2) * -lit(3);
        assert_eq!(expr.render(), "(+ 1 (* 2 (- 3)))");
        assert_eq!(expr.eval(), Ok(Number::Int(-5)));

        let expr = 6 / lit(4);
        assert_eq!(expr.eval(), Ok(Number::Real(1.5)));
    }

    #[test]
    fn apply() {
        let expr = Op::Add.apply(vec![lit(1), lit(2)]);
        assert_eq!(expr.map(|e| e.render()), Ok("(+ 1 2)".into()));

        let expr = Op::RFloorDiv.apply(vec![lit(3), lit(10)]);
        assert_eq!(expr.and_then(|e| e.eval()), Ok(Number::Int(3)));

        let expr = Op::Neg.apply(vec![lit(1)]);
        assert_eq!(expr.map(|e| e.render()), Ok("(- 1)".into()));
    }

    #[test]
    fn apply_wrong_arity() {
        assert_eq!(
            Op::Neg.apply(vec![lit(1), lit(2)]).err(),
            Some(Error::InvalidOperand {
                op: Op::Neg,
                expected: 1,
                found: 2,
            })
        );

        assert_eq!(
            Op::Sub.apply(vec![lit(1)]).err(),
            Some(Error::InvalidOperand {
                op: Op::Sub,
                expected: 2,
                found: 1,
            })
        );

        for op in [
            Op::Neg,
            Op::Add,
            Op::Sub,
            Op::Mul,
            Op::TrueDiv,
            Op::RTrueDiv,
            Op::FloorDiv,
            Op::RFloorDiv,
        ] {
            assert!(matches!(
                op.apply(Vec::new()),
                Err(Error::InvalidOperand { found: 0, .. })
            ));
            assert!(op.apply(vec![lit(1), lit(2), lit(3)]).is_err());
        }
    }

    #[test]
    fn operands() {
        let neg = Neg::new(Literal::new(1));
        assert_eq!(neg.operand().render(), "1");

        // construction order, not evaluation order
        let div = RTrueDiv::new(Literal::new(1), Literal::new(2));
        let [a, b] = div.operands();
        assert_eq!(a.render(), "1");
        assert_eq!(b.render(), "2");
        assert_eq!(div.render(), "(/ 2 1)");
    }

    #[derive(Debug)]
    struct MulAdd {
        a: Expr,
        b: Expr,
        c: Expr,
    }

    impl fmt::Display for MulAdd {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "(fma {} {} {})", self.a, self.b, self.c)
        }
    }

    impl Sealed for MulAdd {}

    impl Node for MulAdd {
        fn eval(&self) -> Result<Number> {
            self.a.eval()?.checked_mul(self.b.eval()?)?.checked_add(self.c.eval()?)
        }
    }

    impl Ternary for MulAdd {
        fn operands(&self) -> [&dyn Node; 3] {
            [&*self.a, &*self.b, &*self.c]
        }
    }

    #[test]
    fn ternary() {
        let node = MulAdd {
            a: lit(2),
            b: lit(3),
            c: lit(4),
        };
        assert_eq!(node.eval(), Ok(Number::Int(10)));
        assert_eq!(node.render(), "(fma 2 3 4)");
        assert_eq!(Ternary::operands(&node).map(|n| n.render()), ["2", "3", "4"]);

        let expr = Literal::new(1) + node;
        assert_eq!(expr.render(), "(+ 1 (fma 2 3 4))");
    }

    #[test]
    fn shareable() {
        fn assert_send_sync<T: Send + Sync>() {}

        assert_send_sync::<Expr>();
        assert_send_sync::<Add>();
    }
}
