use crate::{ast::expr::Literal, error::Error, value::Number};
use alloc::string::ToString;
use core::str::FromStr;

pub type Result<'src, O> = nom::IResult<&'src str, O>;

impl Number {
    ///
    /// Parse a [`Number`] from an input slice, assuming no preceding whitespace.
    ///
    /// A literal without a fractional part or exponent is an integer, and
    /// must fit inside an [`i64`].
    ///
    #[allow(clippy::missing_errors_doc)]
    pub fn parse(src: &str) -> Result<Self> {
        use nom::{
            character::complete::{char, digit0, digit1, one_of},
            combinator::opt,
            error::{make_error, ErrorKind},
            sequence::{pair, preceded, tuple},
            Err,
        };

        let (rest, (fract, exp)) = preceded(
            pair(opt(one_of("+-")), digit1),
            pair(
                opt(preceded(char('.'), digit0)),
                opt(tuple((one_of("eE"), opt(one_of("+-")), digit1))),
            ),
        )(src)?;
        let text = &src[..src.len() - rest.len()];

        let number = if fract.is_none() && exp.is_none() {
            text.parse().map(Number::Int).ok()
        } else {
            text.parse().map(Number::Real).ok()
        };

        number
            .map(|number| (rest, number))
            .ok_or_else(|| Err::Failure(make_error(src, ErrorKind::Digit)))
    }
}

impl FromStr for Number {
    type Err = Error;

    fn from_str(s: &str) -> core::result::Result<Self, Self::Err> {
        match Number::parse(s.trim()) {
            Ok(("", number)) => Ok(number),
            _ => Err(Error::InvalidLiteral(s.to_string())),
        }
    }
}

impl FromStr for Literal {
    type Err = Error;

    fn from_str(s: &str) -> core::result::Result<Self, Self::Err> {
        s.parse::<Number>().map(Literal::new)
    }
}
