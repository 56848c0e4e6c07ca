use std::fmt::Debug;
use std::fmt::Display;
use std::fmt::Formatter;
use std::fmt::Result as FmtResult;
use std::num::NonZeroU64;
use std::sync::atomic::AtomicU64;
use std::sync::atomic::Ordering::Relaxed;

use crate::lang::Atom;

// -----------------------------------------------------------------------------
// Table Ref
// -----------------------------------------------------------------------------

static SERIAL: AtomicU64 = AtomicU64::new(1);

/// Opaque reference identity of a table.
///
/// References are unique per creation and never reused; renaming a table
/// changes only its name identity, never its reference.
#[derive(Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
#[repr(transparent)]
pub struct TableRef {
  serial: NonZeroU64,
}

impl TableRef {
  /// Allocates the next unique reference.
  #[inline]
  pub(crate) fn next() -> Self {
    let serial: u64 = SERIAL.fetch_add(1, Relaxed);

    // SAFETY: The counter starts at one and only increments.
    Self {
      serial: unsafe { NonZeroU64::new_unchecked(serial) },
    }
  }
}

impl Debug for TableRef {
  fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
    Display::fmt(self, f)
  }
}

impl Display for TableRef {
  fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
    write!(f, "#Table<{}>", self.serial)
  }
}

// -----------------------------------------------------------------------------
// Table Id
// -----------------------------------------------------------------------------

/// Either identity a table answers to: reference or registered name.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq)]
pub enum TableId {
  /// The opaque per-creation reference.
  Ref(TableRef),
  /// The process-wide registered name.
  Name(Atom),
}

impl Display for TableId {
  fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
    match self {
      Self::Ref(table) => Display::fmt(table, f),
      Self::Name(name) => Display::fmt(name, f),
    }
  }
}

impl From<TableRef> for TableId {
  #[inline]
  fn from(other: TableRef) -> Self {
    Self::Ref(other)
  }
}

impl From<Atom> for TableId {
  #[inline]
  fn from(other: Atom) -> Self {
    Self::Name(other)
  }
}

impl<'a> From<&'a str> for TableId {
  #[inline]
  fn from(other: &'a str) -> Self {
    Self::Name(Atom::new(other))
  }
}

// -----------------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_refs_are_unique() {
    assert_ne!(TableRef::next(), TableRef::next());
  }

  #[test]
  fn test_id_conversions() {
    let table: TableRef = TableRef::next();

    assert_eq!(TableId::from(table), TableId::Ref(table));
    assert_eq!(TableId::from("users"), TableId::Name(Atom::new("users")));
  }
}
