use std::cmp::Ordering;
use std::fmt::Debug;
use std::fmt::Display;
use std::fmt::Formatter;
use std::fmt::Result as FmtResult;
use std::hash::Hash;
use std::hash::Hasher;

use crate::actor::ActorId;
use crate::lang::Atom;

/// A dynamically-typed value stored in table records.
///
/// Terms carry a strict total order (the "term order") used by ordered
/// tables and guard evaluation:
///
/// ```text
/// numbers < atoms < pids < tuples < lists < strings < binaries
/// ```
///
/// Numbers compare numerically across [`Int`] and [`Float`]; an exact
/// numeric tie orders the integer first so the order stays strict and
/// agrees with structural equality. Floats order by `total_cmp` and hash
/// by bit representation, keeping `Eq`, `Ord`, and `Hash` consistent.
///
/// [`Int`]: Term::Int
/// [`Float`]: Term::Float
#[derive(Clone)]
pub enum Term {
  /// Signed 64-bit integer.
  Int(i64),
  /// IEEE-754 double.
  Float(f64),
  /// Interned literal.
  Atom(Atom),
  /// Actor identity.
  Pid(ActorId),
  /// Fixed-arity composite.
  Tuple(Vec<Term>),
  /// Variable-length composite.
  List(Vec<Term>),
  /// UTF-8 text.
  Str(Box<str>),
  /// Raw bytes.
  Binary(Box<[u8]>),
}

impl Term {
  /// Creates an atom term from the given text.
  #[inline]
  pub fn atom(data: &str) -> Self {
    Self::Atom(Atom::new(data))
  }

  /// Creates a tuple term from the given elements.
  #[inline]
  pub fn tuple(elements: Vec<Term>) -> Self {
    Self::Tuple(elements)
  }

  /// Creates a list term from the given elements.
  #[inline]
  pub fn list(elements: Vec<Term>) -> Self {
    Self::List(elements)
  }

  /// Rank of the term's type class within the term order.
  #[inline]
  const fn rank(&self) -> u8 {
    match self {
      Self::Int(_) | Self::Float(_) => 0,
      Self::Atom(_) => 1,
      Self::Pid(_) => 2,
      Self::Tuple(_) => 3,
      Self::List(_) => 4,
      Self::Str(_) => 5,
      Self::Binary(_) => 6,
    }
  }
}

// -----------------------------------------------------------------------------
// Term Order
// -----------------------------------------------------------------------------

/// Orders `int` relative to `float` without losing precision.
///
/// Casting `i64` to `f64` rounds above 2^53, so a cast-equality is resolved
/// by casting back when the float is integral and in range. NaN sorts the
/// way `total_cmp` sorts it: above every number when positive, below when
/// negative.
fn cmp_int_float(int: i64, float: f64) -> Ordering {
  if float.is_nan() {
    return if float.is_sign_positive() {
      Ordering::Less
    } else {
      Ordering::Greater
    };
  }

  let cast: f64 = int as f64;

  if cast < float {
    return Ordering::Less;
  }

  if cast > float {
    return Ordering::Greater;
  }

  // The cast tied, so `float` is integral. Out-of-range magnitudes can only
  // tie against the rounded cast, never against the exact integer.
  if float >= 9_223_372_036_854_775_808.0 {
    return Ordering::Less;
  }

  if float < -9_223_372_036_854_775_808.0 {
    return Ordering::Greater;
  }

  int.cmp(&(float as i64))
}

impl Ord for Term {
  fn cmp(&self, other: &Self) -> Ordering {
    match (self, other) {
      (Self::Int(lhs), Self::Int(rhs)) => lhs.cmp(rhs),
      (Self::Float(lhs), Self::Float(rhs)) => lhs.total_cmp(rhs),
      // A numeric tie orders the integer first.
      (Self::Int(lhs), Self::Float(rhs)) => cmp_int_float(*lhs, *rhs).then(Ordering::Less),
      (Self::Float(lhs), Self::Int(rhs)) => cmp_int_float(*rhs, *lhs).reverse().then(Ordering::Greater),
      (Self::Atom(lhs), Self::Atom(rhs)) => lhs.cmp(rhs),
      (Self::Pid(lhs), Self::Pid(rhs)) => lhs.cmp(rhs),
      // Tuples order by arity before content.
      (Self::Tuple(lhs), Self::Tuple(rhs)) => {
        lhs.len().cmp(&rhs.len()).then_with(|| lhs.cmp(rhs))
      }
      (Self::List(lhs), Self::List(rhs)) => lhs.cmp(rhs),
      (Self::Str(lhs), Self::Str(rhs)) => lhs.cmp(rhs),
      (Self::Binary(lhs), Self::Binary(rhs)) => lhs.cmp(rhs),
      (lhs, rhs) => lhs.rank().cmp(&rhs.rank()),
    }
  }
}

impl PartialOrd for Term {
  #[inline]
  fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
    Some(self.cmp(other))
  }
}

impl PartialEq for Term {
  fn eq(&self, other: &Self) -> bool {
    match (self, other) {
      (Self::Int(lhs), Self::Int(rhs)) => lhs == rhs,
      (Self::Float(lhs), Self::Float(rhs)) => lhs.to_bits() == rhs.to_bits(),
      (Self::Atom(lhs), Self::Atom(rhs)) => lhs == rhs,
      (Self::Pid(lhs), Self::Pid(rhs)) => lhs == rhs,
      (Self::Tuple(lhs), Self::Tuple(rhs)) => lhs == rhs,
      (Self::List(lhs), Self::List(rhs)) => lhs == rhs,
      (Self::Str(lhs), Self::Str(rhs)) => lhs == rhs,
      (Self::Binary(lhs), Self::Binary(rhs)) => lhs == rhs,
      _ => false,
    }
  }
}

impl Eq for Term {}

impl Hash for Term {
  fn hash<H: Hasher>(&self, state: &mut H) {
    state.write_u8(match self {
      Self::Int(_) => 0,
      Self::Float(_) => 1,
      Self::Atom(_) => 2,
      Self::Pid(_) => 3,
      Self::Tuple(_) => 4,
      Self::List(_) => 5,
      Self::Str(_) => 6,
      Self::Binary(_) => 7,
    });

    match self {
      Self::Int(value) => value.hash(state),
      Self::Float(value) => value.to_bits().hash(state),
      Self::Atom(value) => value.hash(state),
      Self::Pid(value) => value.hash(state),
      Self::Tuple(value) => value.hash(state),
      Self::List(value) => value.hash(state),
      Self::Str(value) => value.hash(state),
      Self::Binary(value) => value.hash(state),
    }
  }
}

// -----------------------------------------------------------------------------
// Formatting
// -----------------------------------------------------------------------------

fn fmt_elements(f: &mut Formatter<'_>, elements: &[Term]) -> FmtResult {
  for (index, element) in elements.iter().enumerate() {
    if index > 0 {
      f.write_str(",")?;
    }

    Display::fmt(element, f)?;
  }

  Ok(())
}

impl Display for Term {
  fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
    match self {
      Self::Int(value) => write!(f, "{value}"),
      Self::Float(value) => write!(f, "{value:?}"),
      Self::Atom(value) => Display::fmt(value, f),
      Self::Pid(value) => Display::fmt(value, f),
      Self::Tuple(value) => {
        f.write_str("{")?;
        fmt_elements(f, value)?;
        f.write_str("}")
      }
      Self::List(value) => {
        f.write_str("[")?;
        fmt_elements(f, value)?;
        f.write_str("]")
      }
      Self::Str(value) => write!(f, "{value:?}"),
      Self::Binary(value) => {
        f.write_str("<<")?;

        for (index, byte) in value.iter().enumerate() {
          if index > 0 {
            f.write_str(",")?;
          }

          write!(f, "{byte}")?;
        }

        f.write_str(">>")
      }
    }
  }
}

impl Debug for Term {
  fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
    Display::fmt(self, f)
  }
}

// -----------------------------------------------------------------------------
// Conversions
// -----------------------------------------------------------------------------

impl From<i64> for Term {
  #[inline]
  fn from(other: i64) -> Self {
    Self::Int(other)
  }
}

impl From<i32> for Term {
  #[inline]
  fn from(other: i32) -> Self {
    Self::Int(i64::from(other))
  }
}

impl From<u32> for Term {
  #[inline]
  fn from(other: u32) -> Self {
    Self::Int(i64::from(other))
  }
}

impl From<f64> for Term {
  #[inline]
  fn from(other: f64) -> Self {
    Self::Float(other)
  }
}

impl From<bool> for Term {
  #[inline]
  fn from(other: bool) -> Self {
    Self::Atom(if other { Atom::TRUE } else { Atom::FALSE })
  }
}

impl From<Atom> for Term {
  #[inline]
  fn from(other: Atom) -> Self {
    Self::Atom(other)
  }
}

impl From<ActorId> for Term {
  #[inline]
  fn from(other: ActorId) -> Self {
    Self::Pid(other)
  }
}

impl<'a> From<&'a str> for Term {
  #[inline]
  fn from(other: &'a str) -> Self {
    Self::Str(Box::from(other))
  }
}

impl From<String> for Term {
  #[inline]
  fn from(other: String) -> Self {
    Self::Str(other.into_boxed_str())
  }
}

impl<'a> From<&'a [u8]> for Term {
  #[inline]
  fn from(other: &'a [u8]) -> Self {
    Self::Binary(Box::from(other))
  }
}

impl From<Vec<u8>> for Term {
  #[inline]
  fn from(other: Vec<u8>) -> Self {
    Self::Binary(other.into_boxed_slice())
  }
}

// -----------------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
  use std::cmp::Ordering;

  use super::*;

  #[test]
  fn test_type_classes_are_ordered() {
    let terms: Vec<Term> = vec![
      Term::Int(9),
      Term::atom("zebra"),
      Term::tuple(vec![Term::Int(1)]),
      Term::list(vec![Term::Int(1)]),
      Term::from("text"),
      Term::from(vec![1_u8, 2]),
    ];

    for window in terms.windows(2) {
      assert!(window[0] < window[1], "{} !< {}", window[0], window[1]);
    }
  }

  #[test]
  fn test_numbers_compare_numerically() {
    assert!(Term::Int(1) < Term::Float(1.5));
    assert!(Term::Float(0.5) < Term::Int(1));
    assert!(Term::Int(2) < Term::Float(f64::INFINITY));
    assert!(Term::Float(f64::NEG_INFINITY) < Term::Int(i64::MIN));
  }

  #[test]
  fn test_numeric_tie_orders_int_first() {
    assert_eq!(Term::Int(1).cmp(&Term::Float(1.0)), Ordering::Less);
    assert_eq!(Term::Float(1.0).cmp(&Term::Int(1)), Ordering::Greater);
  }

  #[test]
  fn test_large_int_float_precision() {
    let int: i64 = (1_i64 << 53) + 1;
    let float: f64 = 9_007_199_254_740_992.0; // 2^53

    assert_eq!(cmp_int_float(int, float), Ordering::Greater);
    assert!(Term::Int(int) > Term::Float(float));
  }

  #[test]
  fn test_nan_sorts_by_sign() {
    assert!(Term::Float(f64::NAN) > Term::Int(i64::MAX));
    assert!(Term::Float(-f64::NAN) < Term::Int(i64::MIN));
  }

  #[test]
  fn test_tuples_order_by_arity_then_content() {
    let small: Term = Term::tuple(vec![Term::Int(9), Term::Int(9)]);
    let large: Term = Term::tuple(vec![Term::Int(0), Term::Int(0), Term::Int(0)]);

    assert!(small < large);

    let lhs: Term = Term::tuple(vec![Term::Int(1), Term::Int(2)]);
    let rhs: Term = Term::tuple(vec![Term::Int(1), Term::Int(3)]);

    assert!(lhs < rhs);
  }

  #[test]
  fn test_equality_and_hash_agree_on_floats() {
    use std::collections::hash_map::DefaultHasher;
    use std::hash::Hash;
    use std::hash::Hasher;

    let lhs: Term = Term::Float(1.0);
    let rhs: Term = Term::Float(1.0);

    assert_eq!(lhs, rhs);

    let mut hash_lhs: DefaultHasher = DefaultHasher::new();
    let mut hash_rhs: DefaultHasher = DefaultHasher::new();

    lhs.hash(&mut hash_lhs);
    rhs.hash(&mut hash_rhs);

    assert_eq!(hash_lhs.finish(), hash_rhs.finish());
  }

  #[test]
  fn test_int_and_float_are_distinct_keys() {
    assert_ne!(Term::Int(1), Term::Float(1.0));
  }

  #[test]
  fn test_display() {
    let term: Term = Term::tuple(vec![
      Term::atom("user"),
      Term::Int(7),
      Term::list(vec![Term::from("a"), Term::from("b")]),
    ]);

    assert_eq!(format!("{term}"), "{user,7,[\"a\",\"b\"]}");
  }
}
