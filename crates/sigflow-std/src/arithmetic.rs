//! Value arithmetic with numeric promotion
//!
//! Operands are promoted to the smallest common kind of the numeric tower
//! (Integer → Rational → Real → Complex). Exact results narrow back to
//! Integer, so `1/2 + 1/2` is `Integer(1)`.

use serde::{Deserialize, Serialize};
use sigflow_core::{
    Complex, Error, Identifier, Rational, Result, Value, ValueKind, STD_DOMAIN,
};
use std::fmt;

/// The four arithmetic operators of the standard library
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ArithmeticOp {
    Add,
    Subtract,
    Multiply,
    Divide,
}

impl ArithmeticOp {
    pub const ALL: [ArithmeticOp; 4] = [
        ArithmeticOp::Add,
        ArithmeticOp::Subtract,
        ArithmeticOp::Multiply,
        ArithmeticOp::Divide,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ArithmeticOp::Add => "Add",
            ArithmeticOp::Subtract => "Subtract",
            ArithmeticOp::Multiply => "Multiply",
            ArithmeticOp::Divide => "Divide",
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            ArithmeticOp::Add => "+",
            ArithmeticOp::Subtract => "-",
            ArithmeticOp::Multiply => "*",
            ArithmeticOp::Divide => "/",
        }
    }

    /// Identifier of the entity implementing this operator, e.g. `Std.Add`
    pub fn entity_id(&self) -> Identifier {
        Identifier::new(self.name(), STD_DOMAIN)
    }

    /// Result published by an operator port without inputs
    pub fn identity(&self) -> Value {
        match self {
            ArithmeticOp::Add | ArithmeticOp::Subtract => Value::Integer(0),
            ArithmeticOp::Multiply | ArithmeticOp::Divide => Value::Integer(1),
        }
    }

    /// Fold `values` left to right; the identity if there are none
    pub fn fold<'a, I>(&self, values: I) -> Result<Value>
    where
        I: IntoIterator<Item = &'a Value>,
    {
        let mut values = values.into_iter();
        let Some(first) = values.next() else {
            return Ok(self.identity());
        };
        let mut acc = first.clone();
        for value in values {
            acc = self.apply(&acc, value)?;
        }
        Ok(acc)
    }

    /// Apply the operator to two values
    pub fn apply(&self, lhs: &Value, rhs: &Value) -> Result<Value> {
        let kind = ValueKind::common_numeric(lhs.kind(), rhs.kind()).ok_or_else(|| {
            Error::unsupported(format!(
                "cannot {} {} and {}",
                self.name().to_lowercase(),
                lhs.kind(),
                rhs.kind()
            ))
        })?;
        let promoted = lhs.convert_to(kind).zip(rhs.convert_to(kind));
        match promoted {
            Some((Value::Integer(a), Value::Integer(b))) => self.integers(a, b),
            Some((Value::Rational(a), Value::Rational(b))) => self.rationals(a, b),
            Some((Value::Real(a), Value::Real(b))) => self.reals(a, b),
            Some((Value::Complex(a), Value::Complex(b))) => self.complexes(a, b),
            _ => Err(Error::unsupported(format!(
                "no {} promotion for {} and {}",
                kind,
                lhs.kind(),
                rhs.kind()
            ))),
        }
    }

    fn integers(&self, a: i64, b: i64) -> Result<Value> {
        let result = match self {
            ArithmeticOp::Add => a.checked_add(b),
            ArithmeticOp::Subtract => a.checked_sub(b),
            ArithmeticOp::Multiply => a.checked_mul(b),
            ArithmeticOp::Divide => {
                if b == 0 {
                    return Err(division_by_zero());
                }
                return Ok(narrow(Rational::new(a, b)?));
            }
        };
        result
            .map(Value::Integer)
            .ok_or_else(|| overflow(self, a, b))
    }

    fn rationals(&self, a: Rational, b: Rational) -> Result<Value> {
        let (an, ad, bn, bd) = (a.numerator(), a.denominator(), b.numerator(), b.denominator());
        let parts = match self {
            ArithmeticOp::Add => cross(an, bd, bn, ad, i64::checked_add).zip(ad.checked_mul(bd)),
            ArithmeticOp::Subtract => {
                cross(an, bd, bn, ad, i64::checked_sub).zip(ad.checked_mul(bd))
            }
            ArithmeticOp::Multiply => an.checked_mul(bn).zip(ad.checked_mul(bd)),
            ArithmeticOp::Divide => {
                if bn == 0 {
                    return Err(division_by_zero());
                }
                an.checked_mul(bd).zip(ad.checked_mul(bn))
            }
        };
        let (numerator, denominator) = parts.ok_or_else(|| overflow(self, a, b))?;
        Ok(narrow(Rational::new(numerator, denominator)?))
    }

    fn reals(&self, a: f64, b: f64) -> Result<Value> {
        Ok(Value::Real(match self {
            ArithmeticOp::Add => a + b,
            ArithmeticOp::Subtract => a - b,
            ArithmeticOp::Multiply => a * b,
            ArithmeticOp::Divide => {
                if b == 0.0 {
                    return Err(division_by_zero());
                }
                a / b
            }
        }))
    }

    fn complexes(&self, a: Complex, b: Complex) -> Result<Value> {
        Ok(Value::Complex(match self {
            ArithmeticOp::Add => Complex::new(a.re + b.re, a.im + b.im),
            ArithmeticOp::Subtract => Complex::new(a.re - b.re, a.im - b.im),
            ArithmeticOp::Multiply => {
                Complex::new(a.re * b.re - a.im * b.im, a.re * b.im + a.im * b.re)
            }
            ArithmeticOp::Divide => {
                let norm = b.re * b.re + b.im * b.im;
                if norm == 0.0 {
                    return Err(division_by_zero());
                }
                Complex::new(
                    (a.re * b.re + a.im * b.im) / norm,
                    (a.im * b.re - a.re * b.im) / norm,
                )
            }
        }))
    }
}

impl fmt::Display for ArithmeticOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// `op(an * bd, bn * ad)` with overflow checks
fn cross(
    an: i64,
    bd: i64,
    bn: i64,
    ad: i64,
    op: fn(i64, i64) -> Option<i64>,
) -> Option<i64> {
    op(an.checked_mul(bd)?, bn.checked_mul(ad)?)
}

fn narrow(r: Rational) -> Value {
    if r.is_integer() {
        Value::Integer(r.numerator())
    } else {
        Value::Rational(r)
    }
}

fn division_by_zero() -> Error {
    Error::unsupported("division by zero")
}

fn overflow(op: &ArithmeticOp, a: impl fmt::Display, b: impl fmt::Display) -> Error {
    Error::unsupported(format!("overflow in {} {} {}", a, op.symbol(), b))
}
