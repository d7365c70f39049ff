//! Typed values carried by signals and buses
//!
//! The engine only relies on equality and conversion; arithmetic over these
//! structures lives in the standard library crate.

use crate::{Error, Identifier, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Domain used for the identifiers of the built-in value structures
pub const STD_DOMAIN: &str = "Std";

/// A normalized fraction (denominator always positive, gcd 1)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rational {
    numerator: i64,
    denominator: i64,
}

impl Rational {
    /// Create a new rational, normalizing sign and common factors
    pub fn new(numerator: i64, denominator: i64) -> Result<Self> {
        if denominator == 0 {
            return Err(Error::unsupported("rational with zero denominator"));
        }
        // widened so `i64::MIN` can be negated and reduced
        let divisor = gcd(numerator.unsigned_abs(), denominator.unsigned_abs()).max(1) as i128;
        let sign: i128 = if denominator < 0 { -1 } else { 1 };
        let narrow = |part: i64| {
            i64::try_from(sign * i128::from(part) / divisor).map_err(|_| {
                Error::unsupported(format!("overflow normalizing {}/{}", numerator, denominator))
            })
        };
        Ok(Self {
            numerator: narrow(numerator)?,
            denominator: narrow(denominator)?,
        })
    }

    /// A whole number as a rational
    pub fn from_integer(value: i64) -> Self {
        Self {
            numerator: value,
            denominator: 1,
        }
    }

    pub fn numerator(&self) -> i64 {
        self.numerator
    }

    pub fn denominator(&self) -> i64 {
        self.denominator
    }

    /// Check if the denominator is one
    pub fn is_integer(&self) -> bool {
        self.denominator == 1
    }

    pub fn to_f64(&self) -> f64 {
        self.numerator as f64 / self.denominator as f64
    }
}

impl fmt::Display for Rational {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.numerator, self.denominator)
    }
}

fn gcd(mut a: u64, mut b: u64) -> u64 {
    while b != 0 {
        let t = a % b;
        a = b;
        b = t;
    }
    a
}

/// A complex number in cartesian form
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Complex {
    pub re: f64,
    pub im: f64,
}

impl Complex {
    pub fn new(re: f64, im: f64) -> Self {
        Self { re, im }
    }
}

impl fmt::Display for Complex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.im < 0.0 {
            write!(f, "{}-{}i", self.re, -self.im)
        } else {
            write!(f, "{}+{}i", self.re, self.im)
        }
    }
}

/// Resolved level of a logic signal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LogicLevel {
    Low,
    High,
    Unknown,
    HighImpedance,
}

impl fmt::Display for LogicLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let c = match self {
            LogicLevel::Low => '0',
            LogicLevel::High => '1',
            LogicLevel::Unknown => 'X',
            LogicLevel::HighImpedance => 'Z',
        };
        write!(f, "{}", c)
    }
}

/// The structure (type) of a value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ValueKind {
    Integer,
    Rational,
    Real,
    Complex,
    Logic,
    Toggle,
    Literal,
}

impl ValueKind {
    /// Name of the structure, also the label of its identifier
    pub fn name(&self) -> &'static str {
        match self {
            ValueKind::Integer => "Integer",
            ValueKind::Rational => "Rational",
            ValueKind::Real => "Real",
            ValueKind::Complex => "Complex",
            ValueKind::Logic => "Logic",
            ValueKind::Toggle => "Toggle",
            ValueKind::Literal => "Literal",
        }
    }

    /// Identifier of the value structure, e.g. `Std.Integer`
    pub fn structure_id(&self) -> Identifier {
        Identifier::new(self.name(), STD_DOMAIN)
    }

    /// Position in the numeric tower, `None` for non-numeric kinds
    pub fn numeric_rank(&self) -> Option<u8> {
        match self {
            ValueKind::Integer => Some(0),
            ValueKind::Rational => Some(1),
            ValueKind::Real => Some(2),
            ValueKind::Complex => Some(3),
            _ => None,
        }
    }

    /// Smallest numeric kind both kinds convert to losslessly
    pub fn common_numeric(a: ValueKind, b: ValueKind) -> Option<ValueKind> {
        let (ra, rb) = (a.numeric_rank()?, b.numeric_rank()?);
        Some(if ra >= rb { a } else { b })
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A typed value held by a signal or bus
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    Integer(i64),
    Rational(Rational),
    Real(f64),
    Complex(Complex),
    Logic(LogicLevel),
    Toggle(bool),
    Literal(String),
}

impl Value {
    /// Get the structure kind of this value
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Integer(_) => ValueKind::Integer,
            Value::Rational(_) => ValueKind::Rational,
            Value::Real(_) => ValueKind::Real,
            Value::Complex(_) => ValueKind::Complex,
            Value::Logic(_) => ValueKind::Logic,
            Value::Toggle(_) => ValueKind::Toggle,
            Value::Literal(_) => ValueKind::Literal,
        }
    }

    /// Identifier of this value's structure
    pub fn structure_id(&self) -> Identifier {
        self.kind().structure_id()
    }

    /// Check whether a lossless conversion to `kind` exists
    pub fn can_convert_to(&self, kind: ValueKind) -> bool {
        self.convert_to(kind).is_some()
    }

    /// Convert losslessly to another structure
    ///
    /// Numeric values widen along Integer → Rational → Real → Complex and
    /// narrow only when no information is lost. Logic High/Low and Toggle
    /// convert into each other.
    pub fn convert_to(&self, kind: ValueKind) -> Option<Value> {
        if self.kind() == kind {
            return Some(self.clone());
        }
        match (self, kind) {
            (Value::Integer(i), ValueKind::Rational) => {
                Some(Value::Rational(Rational::from_integer(*i)))
            }
            (Value::Integer(i), ValueKind::Real) => Some(Value::Real(*i as f64)),
            (Value::Integer(i), ValueKind::Complex) => {
                Some(Value::Complex(Complex::new(*i as f64, 0.0)))
            }
            (Value::Rational(r), ValueKind::Integer) if r.is_integer() => {
                Some(Value::Integer(r.numerator()))
            }
            (Value::Rational(r), ValueKind::Real) => Some(Value::Real(r.to_f64())),
            (Value::Rational(r), ValueKind::Complex) => {
                Some(Value::Complex(Complex::new(r.to_f64(), 0.0)))
            }
            (Value::Real(x), ValueKind::Integer) if x.fract() == 0.0 && x.is_finite() => {
                Some(Value::Integer(*x as i64))
            }
            (Value::Real(x), ValueKind::Complex) => Some(Value::Complex(Complex::new(*x, 0.0))),
            (Value::Complex(c), ValueKind::Real) if c.im == 0.0 => Some(Value::Real(c.re)),
            (Value::Logic(LogicLevel::High), ValueKind::Toggle) => Some(Value::Toggle(true)),
            (Value::Logic(LogicLevel::Low), ValueKind::Toggle) => Some(Value::Toggle(false)),
            (Value::Toggle(b), ValueKind::Logic) => Some(Value::Logic(if *b {
                LogicLevel::High
            } else {
                LogicLevel::Low
            })),
            _ => None,
        }
    }

    /// Compare by value after converting to a common structure
    ///
    /// `Integer(2)` and `Real(2.0)` are equivalent but not `==`.
    pub fn equivalent(&self, other: &Value) -> bool {
        if self == other {
            return true;
        }
        if let Some(common) = ValueKind::common_numeric(self.kind(), other.kind()) {
            return self.convert_to(common) == other.convert_to(common);
        }
        other
            .convert_to(self.kind())
            .map(|v| &v == self)
            .unwrap_or(false)
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self.convert_to(ValueKind::Integer)? {
            Value::Integer(i) => Some(i),
            _ => None,
        }
    }

    pub fn as_real(&self) -> Option<f64> {
        match self.convert_to(ValueKind::Real)? {
            Value::Real(x) => Some(x),
            _ => None,
        }
    }

    pub fn as_logic(&self) -> Option<LogicLevel> {
        match self.convert_to(ValueKind::Logic)? {
            Value::Logic(l) => Some(l),
            _ => None,
        }
    }

    pub fn as_literal(&self) -> Option<&str> {
        match self {
            Value::Literal(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Integer(i) => write!(f, "{}", i),
            Value::Rational(r) => write!(f, "{}", r),
            Value::Real(x) => write!(f, "{}", x),
            Value::Complex(c) => write!(f, "{}", c),
            Value::Logic(l) => write!(f, "{}", l),
            Value::Toggle(b) => write!(f, "{}", b),
            Value::Literal(s) => write!(f, "\"{}\"", s),
        }
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Integer(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Integer(i as i64)
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Real(x)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Toggle(b)
    }
}

impl From<Rational> for Value {
    fn from(r: Rational) -> Self {
        Value::Rational(r)
    }
}

impl From<Complex> for Value {
    fn from(c: Complex) -> Self {
        Value::Complex(c)
    }
}

impl From<LogicLevel> for Value {
    fn from(l: LogicLevel) -> Self {
        Value::Logic(l)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Literal(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Literal(s)
    }
}
