use bitflags::bitflags;
use std::fmt::Display;
use std::fmt::Formatter;
use std::fmt::Result as FmtResult;

/// Who may read and write a table.
///
/// Ownership always implies full access; visibility widens access for
/// non-owning actors.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq)]
pub enum Visibility {
  /// Only the owning actor may read or write.
  Private,
  /// Any actor may read; only the owner writes.
  Protected,
  /// Any actor may read and write.
  Public,
}

impl Display for Visibility {
  fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
    match self {
      Self::Private => f.write_str("private"),
      Self::Protected => f.write_str("protected"),
      Self::Public => f.write_str("public"),
    }
  }
}

bitflags! {
  /// Advisory table flags fixed at creation.
  ///
  /// None of these change operation semantics; they tune storage and
  /// locking behavior.
  #[derive(Clone, Copy, Debug, PartialEq, Eq)]
  pub struct TableFlags: u8 {
    /// Favor compact record encoding over raw speed.
    const COMPACT = 1 << 0;
    /// Caller expects concurrent read bursts.
    const READ_CONCURRENCY = 1 << 1;
    /// Caller expects concurrent write bursts.
    const WRITE_CONCURRENCY = 1 << 2;
  }
}

// -----------------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------------
