use std::fmt::Debug;
use std::fmt::Display;
use std::fmt::Formatter;
use std::fmt::Result as FmtResult;

use crate::lang::Record;
use crate::lang::Term;

// -----------------------------------------------------------------------------
// Pattern AST
// -----------------------------------------------------------------------------

/// Per-position specification within a match pattern.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Pat {
  /// The stored element must equal this term.
  Lit(Term),
  /// Matches anything; captures the element under a numbered variable.
  ///
  /// A variable repeated across positions requires equal elements and is
  /// captured once.
  Bind(u32),
  /// Matches anything; nothing is captured.
  Any,
}

impl Pat {
  /// Creates a literal slot from any term-convertible value.
  #[inline]
  pub fn lit<T>(value: T) -> Self
  where
    T: Into<Term>,
  {
    Self::Lit(value.into())
  }
}

/// A match pattern: one [`Pat`] per record position.
///
/// A record matches when its arity equals the pattern arity and every
/// position matches. Captured bindings are returned in variable-number
/// order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Pattern {
  slots: Vec<Pat>,
}

impl Pattern {
  /// Creates a pattern from per-position slots.
  #[inline]
  pub fn new(slots: Vec<Pat>) -> Self {
    Self { slots }
  }

  /// Returns the per-position slots.
  #[inline]
  pub fn slots(&self) -> &[Pat] {
    &self.slots
  }
}

impl From<Vec<Pat>> for Pattern {
  #[inline]
  fn from(other: Vec<Pat>) -> Self {
    Self::new(other)
  }
}

impl Display for Pattern {
  fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
    f.write_str("{")?;

    for (index, slot) in self.slots.iter().enumerate() {
      if index > 0 {
        f.write_str(",")?;
      }

      match slot {
        Pat::Lit(term) => Display::fmt(term, f)?,
        Pat::Bind(var) => write!(f, "${var}")?,
        Pat::Any => f.write_str("_")?,
      }
    }

    f.write_str("}")
  }
}

// -----------------------------------------------------------------------------
// Compiled Pattern
// -----------------------------------------------------------------------------

/// A pattern compiled once per match call.
///
/// Compilation extracts the sorted, deduplicated variable numbers so
/// evaluation fills a binding list by binary search instead of re-walking
/// the slots.
#[derive(Clone, Debug)]
pub(crate) struct CompiledPattern {
  slots: Box<[Pat]>,
  binds: Box<[u32]>,
}

impl CompiledPattern {
  /// Compiles `pattern` for repeated evaluation.
  pub(crate) fn compile(pattern: &Pattern) -> Self {
    let mut binds: Vec<u32> = pattern
      .slots()
      .iter()
      .filter_map(|slot| match slot {
        Pat::Bind(var) => Some(*var),
        _ => None,
      })
      .collect();

    binds.sort_unstable();
    binds.dedup();

    Self {
      slots: Box::from(pattern.slots()),
      binds: binds.into_boxed_slice(),
    }
  }

  /// Sorted, deduplicated variable numbers captured by the pattern.
  #[inline]
  pub(crate) fn binds(&self) -> &[u32] {
    &self.binds
  }

  /// Evaluates the pattern against one record.
  ///
  /// Returns the binding list in variable-number order, or `None` when the
  /// record does not match. A matching record with no bound variables
  /// yields an empty list.
  pub(crate) fn matches(&self, record: &Record) -> Option<Vec<Term>> {
    if record.arity() != self.slots.len() {
      return None;
    }

    let mut bound: Vec<Option<&Term>> = vec![None; self.binds.len()];

    for (slot, element) in self.slots.iter().zip(record.elements()) {
      match slot {
        Pat::Any => {}
        Pat::Lit(term) => {
          if term != element {
            return None;
          }
        }
        Pat::Bind(var) => {
          // Compilation produced the sorted variable list, so the lookup
          // cannot fail.
          let index: usize = self.binds.binary_search(var).ok()?;

          match bound[index] {
            Some(previous) if previous != element => return None,
            Some(_) => {}
            None => bound[index] = Some(element),
          }
        }
      }
    }

    Some(bound.into_iter().flatten().cloned().collect())
  }
}

// -----------------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
  use super::*;
  use crate::record;

  #[test]
  fn test_literal_and_any() {
    let pattern: Pattern = Pattern::new(vec![Pat::lit("k"), Pat::Any]);
    let compiled: CompiledPattern = CompiledPattern::compile(&pattern);

    assert_eq!(compiled.matches(&record!["k", 1]), Some(vec![]));
    assert_eq!(compiled.matches(&record!["x", 1]), None);
  }

  #[test]
  fn test_arity_must_match() {
    let pattern: Pattern = Pattern::new(vec![Pat::Any, Pat::Any]);
    let compiled: CompiledPattern = CompiledPattern::compile(&pattern);

    assert_eq!(compiled.matches(&record![1]), None);
    assert_eq!(compiled.matches(&record![1, 2, 3]), None);
    assert_eq!(compiled.matches(&record![1, 2]), Some(vec![]));
  }

  #[test]
  fn test_bindings_in_variable_order() {
    let pattern: Pattern = Pattern::new(vec![Pat::Bind(2), Pat::Bind(1)]);
    let compiled: CompiledPattern = CompiledPattern::compile(&pattern);

    assert_eq!(
      compiled.matches(&record!["second", "first"]),
      Some(vec![Term::from("first"), Term::from("second")]),
    );
  }

  #[test]
  fn test_repeated_variable_requires_equal_elements() {
    let pattern: Pattern = Pattern::new(vec![Pat::Bind(1), Pat::Bind(1)]);
    let compiled: CompiledPattern = CompiledPattern::compile(&pattern);

    assert_eq!(
      compiled.matches(&record![7, 7]),
      Some(vec![Term::Int(7)]),
    );
    assert_eq!(compiled.matches(&record![7, 8]), None);
  }

  #[test]
  fn test_display() {
    let pattern: Pattern = Pattern::new(vec![Pat::lit("k"), Pat::Bind(1), Pat::Any]);

    assert_eq!(format!("{pattern}"), "{\"k\",$1,_}");
  }
}
