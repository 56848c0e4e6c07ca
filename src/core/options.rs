use crate::actor::ActorId;
use crate::consts;
use crate::core::Layout;
use crate::core::Visibility;
use crate::error::TableError;
use crate::lang::Atom;
use crate::lang::Term;

/// Complete creation-time configuration of a table.
///
/// Facade option structs project into this type; validation is pure and
/// reports the first illegal field.
#[derive(Clone, Debug)]
pub struct TableOptions {
  /// Optional process-wide registered name.
  pub name: Option<Atom>,
  /// Who may read and write.
  pub visibility: Visibility,
  /// Actor inheriting ownership when the owner terminates, with the
  /// payload delivered alongside the hand-off.
  pub heir: Option<(ActorId, Term)>,
  /// 1-indexed tuple slot holding each record's key.
  pub key_pos: usize,
  /// Storage discipline.
  pub layout: Layout,
  /// Advisory hint: expect concurrent read bursts.
  pub read_concurrency: bool,
  /// Advisory hint: expect concurrent write bursts.
  pub write_concurrency: bool,
  /// Favor compact record encoding over raw speed.
  pub compact: bool,
}

impl TableOptions {
  /// Creates options for the given layout with all defaults.
  #[inline]
  pub fn new(layout: Layout) -> Self {
    Self {
      name: None,
      visibility: Visibility::Protected,
      heir: None,
      key_pos: consts::DEF_KEY_POS,
      layout,
      read_concurrency: false,
      write_concurrency: false,
      compact: false,
    }
  }

  /// Checks every field against its legal value set.
  ///
  /// Validation is pure: no registry state is consulted, so name collisions
  /// and heir liveness are checked later, at creation and hand-off time.
  ///
  /// # Errors
  ///
  /// Returns [`TableError::InvalidKeypos`] for a key position below one and
  /// [`TableError::InvalidOption`] for the first other illegal field.
  pub fn validate(&self) -> Result<(), TableError> {
    if let Some(name) = self.name {
      if name.as_str().is_empty() {
        return Err(TableError::InvalidOption {
          option: "name",
          value: String::from("\"\""),
        });
      }
    }

    if self.key_pos < 1 {
      return Err(TableError::InvalidKeypos(self.key_pos));
    }

    Ok(())
  }
}

impl Default for TableOptions {
  #[inline]
  fn default() -> Self {
    Self::new(Layout::Set)
  }
}

// -----------------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_defaults() {
    let options: TableOptions = TableOptions::default();

    assert_eq!(options.key_pos, 1);
    assert_eq!(options.visibility, Visibility::Protected);
    assert_eq!(options.layout, Layout::Set);
    assert!(options.name.is_none());
    assert!(options.heir.is_none());
  }

  #[test]
  fn test_zero_key_pos_rejected() {
    let mut options: TableOptions = TableOptions::default();

    options.key_pos = 0;

    assert_eq!(options.validate(), Err(TableError::InvalidKeypos(0)));
  }

  #[test]
  fn test_empty_name_rejected() {
    let mut options: TableOptions = TableOptions::default();

    options.name = Some(Atom::new(""));

    assert!(matches!(
      options.validate(),
      Err(TableError::InvalidOption { option: "name", .. }),
    ));
  }

  #[test]
  fn test_valid_options_pass() {
    let mut options: TableOptions = TableOptions::new(Layout::OrderedSet);

    options.name = Some(Atom::new("users"));
    options.key_pos = 2;

    assert_eq!(options.validate(), Ok(()));
  }
}
