use std::cmp::Ordering;

use crate::error::TableError;
use crate::lang::Record;
use crate::lang::Term;
use crate::select::CompiledPattern;
use crate::select::Pattern;

// -----------------------------------------------------------------------------
// Operands & Guards
// -----------------------------------------------------------------------------

/// Value position within a guard expression.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Operand {
  /// A variable bound by the pattern.
  Var(u32),
  /// A literal term.
  Lit(Term),
}

impl Operand {
  /// Creates a literal operand from any term-convertible value.
  #[inline]
  pub fn lit<T>(value: T) -> Self
  where
    T: Into<Term>,
  {
    Self::Lit(value.into())
  }
}

/// Boolean condition evaluated over pattern bindings before a record
/// counts as a match.
///
/// Comparisons follow the term order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Guard {
  Eq(Operand, Operand),
  Ne(Operand, Operand),
  Lt(Operand, Operand),
  Le(Operand, Operand),
  Gt(Operand, Operand),
  Ge(Operand, Operand),
  And(Vec<Guard>),
  Or(Vec<Guard>),
  Not(Box<Guard>),
}

impl Guard {
  fn validate(&self, binds: &[u32]) -> Result<(), TableError> {
    match self {
      Self::Eq(lhs, rhs)
      | Self::Ne(lhs, rhs)
      | Self::Lt(lhs, rhs)
      | Self::Le(lhs, rhs)
      | Self::Gt(lhs, rhs)
      | Self::Ge(lhs, rhs) => {
        for operand in [lhs, rhs] {
          if let Operand::Var(var) = operand {
            if binds.binary_search(var).is_err() {
              return Err(TableError::InvalidSelectSpec);
            }
          }
        }

        Ok(())
      }
      Self::And(guards) | Self::Or(guards) => {
        if guards.is_empty() {
          return Err(TableError::InvalidSelectSpec);
        }

        guards.iter().try_for_each(|guard| guard.validate(binds))
      }
      Self::Not(guard) => guard.validate(binds),
    }
  }

  fn eval(&self, binds: &[u32], env: &[Term]) -> bool {
    // Validation guaranteed every variable is bound; lookups fail closed
    // regardless.
    fn resolve<'a>(operand: &'a Operand, binds: &[u32], env: &'a [Term]) -> Option<&'a Term> {
      match operand {
        Operand::Var(var) => binds.binary_search(var).ok().and_then(|index| env.get(index)),
        Operand::Lit(term) => Some(term),
      }
    }

    let compare = |lhs: &Operand, rhs: &Operand| -> Option<Ordering> {
      Some(resolve(lhs, binds, env)?.cmp(resolve(rhs, binds, env)?))
    };

    match self {
      Self::Eq(lhs, rhs) => compare(lhs, rhs) == Some(Ordering::Equal),
      Self::Ne(lhs, rhs) => matches!(compare(lhs, rhs), Some(Ordering::Less | Ordering::Greater)),
      Self::Lt(lhs, rhs) => compare(lhs, rhs) == Some(Ordering::Less),
      Self::Le(lhs, rhs) => matches!(compare(lhs, rhs), Some(Ordering::Less | Ordering::Equal)),
      Self::Gt(lhs, rhs) => compare(lhs, rhs) == Some(Ordering::Greater),
      Self::Ge(lhs, rhs) => matches!(compare(lhs, rhs), Some(Ordering::Greater | Ordering::Equal)),
      Self::And(guards) => guards.iter().all(|guard| guard.eval(binds, env)),
      Self::Or(guards) => guards.iter().any(|guard| guard.eval(binds, env)),
      Self::Not(guard) => !guard.eval(binds, env),
    }
  }
}

// -----------------------------------------------------------------------------
// Match Spec
// -----------------------------------------------------------------------------

/// A match pattern extended with guard conditions.
///
/// Guards are implicitly conjoined: a record counts as a match when the
/// pattern matches and every guard holds over the resulting bindings.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MatchSpec {
  pattern: Pattern,
  guards: Vec<Guard>,
}

impl MatchSpec {
  /// Creates a spec from a pattern and its guards.
  #[inline]
  pub fn new(pattern: Pattern, guards: Vec<Guard>) -> Self {
    Self { pattern, guards }
  }

  /// Returns the pattern head.
  #[inline]
  pub fn pattern(&self) -> &Pattern {
    &self.pattern
  }

  /// Returns the guard conditions.
  #[inline]
  pub fn guards(&self) -> &[Guard] {
    &self.guards
  }
}

impl From<Pattern> for MatchSpec {
  #[inline]
  fn from(other: Pattern) -> Self {
    Self::new(other, Vec::new())
  }
}

// -----------------------------------------------------------------------------
// Compiled Spec
// -----------------------------------------------------------------------------

/// A match spec compiled and validated once per select call.
#[derive(Clone, Debug)]
pub(crate) struct CompiledSpec {
  pattern: CompiledPattern,
  guards: Box<[Guard]>,
}

impl CompiledSpec {
  /// Compiles `spec`, rejecting structurally malformed guards.
  ///
  /// # Errors
  ///
  /// Returns [`TableError::InvalidSelectSpec`] when a guard references a
  /// variable the pattern never binds, or contains an empty conjunction or
  /// disjunction.
  pub(crate) fn compile(spec: &MatchSpec) -> Result<Self, TableError> {
    let pattern: CompiledPattern = CompiledPattern::compile(spec.pattern());

    for guard in spec.guards() {
      guard.validate(pattern.binds())?;
    }

    Ok(Self {
      pattern,
      guards: Box::from(spec.guards()),
    })
  }

  /// Evaluates the spec against one record.
  pub(crate) fn matches(&self, record: &Record) -> Option<Vec<Term>> {
    let env: Vec<Term> = self.pattern.matches(record)?;

    let held: bool = self
      .guards
      .iter()
      .all(|guard| guard.eval(self.pattern.binds(), &env));

    held.then_some(env)
  }
}

// -----------------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
  use super::*;
  use crate::record;
  use crate::select::Pat;

  fn spec(guards: Vec<Guard>) -> MatchSpec {
    MatchSpec::new(Pattern::new(vec![Pat::Bind(1), Pat::Bind(2)]), guards)
  }

  #[test]
  fn test_guards_filter_matches() {
    let spec: MatchSpec = spec(vec![Guard::Gt(Operand::Var(2), Operand::lit(10))]);
    let compiled: CompiledSpec = CompiledSpec::compile(&spec).unwrap();

    assert!(compiled.matches(&record!["a", 11]).is_some());
    assert!(compiled.matches(&record!["a", 10]).is_none());
  }

  #[test]
  fn test_guards_compare_variables() {
    let spec: MatchSpec = spec(vec![Guard::Lt(Operand::Var(1), Operand::Var(2))]);
    let compiled: CompiledSpec = CompiledSpec::compile(&spec).unwrap();

    assert!(compiled.matches(&record![1, 2]).is_some());
    assert!(compiled.matches(&record![2, 1]).is_none());
  }

  #[test]
  fn test_boolean_composition() {
    let spec: MatchSpec = spec(vec![Guard::Or(vec![
      Guard::Eq(Operand::Var(1), Operand::lit("alpha")),
      Guard::Not(Box::new(Guard::Le(Operand::Var(2), Operand::lit(0)))),
    ])]);

    let compiled: CompiledSpec = CompiledSpec::compile(&spec).unwrap();

    assert!(compiled.matches(&record!["alpha", 0]).is_some());
    assert!(compiled.matches(&record!["beta", 1]).is_some());
    assert!(compiled.matches(&record!["beta", 0]).is_none());
  }

  #[test]
  fn test_unbound_variable_is_invalid() {
    let spec: MatchSpec = spec(vec![Guard::Eq(Operand::Var(9), Operand::lit(1))]);

    assert_eq!(
      CompiledSpec::compile(&spec).err(),
      Some(TableError::InvalidSelectSpec),
    );
  }

  #[test]
  fn test_empty_conjunction_is_invalid() {
    let spec: MatchSpec = spec(vec![Guard::And(Vec::new())]);

    assert_eq!(
      CompiledSpec::compile(&spec).err(),
      Some(TableError::InvalidSelectSpec),
    );
  }

  #[test]
  fn test_guardless_spec_matches_like_pattern() {
    let spec: MatchSpec = spec(Vec::new());
    let compiled: CompiledSpec = CompiledSpec::compile(&spec).unwrap();

    assert_eq!(
      compiled.matches(&record![1, 2]),
      Some(vec![Term::Int(1), Term::Int(2)]),
    );
  }
}
