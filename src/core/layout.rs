use std::fmt::Display;
use std::fmt::Formatter;
use std::fmt::Result as FmtResult;

/// Storage discipline of a table.
///
/// The layout fixes how keys map to records for the lifetime of the table:
/// whether keys are unique, whether identical records may coexist, and
/// whether records are kept sorted in term order.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq)]
pub enum Layout {
  /// Unordered, one record per key.
  Set,
  /// Term-ordered, one record per key.
  OrderedSet,
  /// Unordered, many records per key, identical records rejected.
  Bag,
  /// Unordered, many records per key, identical records allowed.
  DuplicateBag,
}

impl Layout {
  /// Returns `true` if at most one record may exist per key.
  #[inline]
  pub const fn is_unique(&self) -> bool {
    matches!(self, Self::Set | Self::OrderedSet)
  }

  /// Returns `true` if records are kept sorted in term order.
  #[inline]
  pub const fn is_ordered(&self) -> bool {
    matches!(self, Self::OrderedSet)
  }

  /// Returns `true` if fully identical records may coexist.
  #[inline]
  pub const fn allows_duplicates(&self) -> bool {
    matches!(self, Self::DuplicateBag)
  }
}

impl Display for Layout {
  fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
    match self {
      Self::Set => f.write_str("set"),
      Self::OrderedSet => f.write_str("ordered_set"),
      Self::Bag => f.write_str("bag"),
      Self::DuplicateBag => f.write_str("duplicate_bag"),
    }
  }
}

// -----------------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------------
