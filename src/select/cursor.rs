use std::fmt::Debug;
use std::fmt::Formatter;
use std::fmt::Result as FmtResult;

use crate::core::ScanPos;
use crate::core::TableRef;
use crate::lang::Record;
use crate::lang::Term;
use crate::select::CompiledPattern;
use crate::select::CompiledSpec;

// -----------------------------------------------------------------------------
// Query
// -----------------------------------------------------------------------------

/// Compiled query carried across paginated calls.
#[derive(Clone, Debug)]
pub(crate) enum Query {
  Pattern(CompiledPattern),
  Spec(CompiledSpec),
}

impl Query {
  /// Evaluates the query against one record.
  #[inline]
  pub(crate) fn matches(&self, record: &Record) -> Option<Vec<Term>> {
    match self {
      Self::Pattern(pattern) => pattern.matches(record),
      Self::Spec(spec) => spec.matches(record),
    }
  }
}

// -----------------------------------------------------------------------------
// Continuation
// -----------------------------------------------------------------------------

/// Resume state of an unfinished paginated scan.
#[derive(Clone, Debug)]
pub(crate) struct ResumePoint {
  pub(crate) table: TableRef,
  pub(crate) query: Query,
  pub(crate) limit: usize,
  pub(crate) from: ScanPos,
}

#[derive(Clone, Debug)]
pub(crate) enum Inner {
  End,
  More(Box<ResumePoint>),
}

/// Opaque cursor produced by a paginated match or select call.
///
/// A continuation is valid only against the table and query that produced
/// it; resuming after the table is deleted fails with
/// `InvalidContinuation`. Resuming an exhausted continuation yields an
/// empty page and stays exhausted.
#[derive(Clone)]
pub struct Continuation {
  inner: Inner,
}

impl Continuation {
  /// Marks the scan as exhausted.
  #[inline]
  pub(crate) const fn end() -> Self {
    Self { inner: Inner::End }
  }

  /// Wraps a resume point.
  #[inline]
  pub(crate) fn more(point: ResumePoint) -> Self {
    Self {
      inner: Inner::More(Box::new(point)),
    }
  }

  /// Unwraps the cursor state.
  #[inline]
  pub(crate) fn into_inner(self) -> Inner {
    self.inner
  }

  /// Returns `true` if the scan reached the end of the table.
  #[inline]
  pub fn is_end(&self) -> bool {
    matches!(self.inner, Inner::End)
  }
}

impl Debug for Continuation {
  fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
    match &self.inner {
      Inner::End => f.write_str("Continuation(end)"),
      Inner::More(point) => write!(f, "Continuation({})", point.table),
    }
  }
}

// -----------------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------------
