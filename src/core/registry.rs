use hashbrown::HashMap;
use hashbrown::hash_map::Entry;
use parking_lot::RwLock;
use parking_lot::RwLockReadGuard;
use parking_lot::RwLockWriteGuard;
use std::sync::LazyLock;
use triomphe::Arc;

use crate::actor::ActorId;
use crate::core::TableCell;
use crate::core::TableId;
use crate::core::TableOptions;
use crate::core::TableRef;
use crate::error::TableError;
use crate::lang::Atom;

// -----------------------------------------------------------------------------
// Table Registry
//
// Two maps guarded by separate locks: reference to cell, and name to
// reference. Registry locks are independent of per-table locks so
// unrelated tables never serialize through registry contention.
//
// Lock order: NAMES before TABLES before any cell lock.
// -----------------------------------------------------------------------------

static TABLES: LazyLock<RwLock<HashMap<TableRef, Arc<TableCell>>>> =
  LazyLock::new(|| RwLock::new(HashMap::new()));

static NAMES: LazyLock<RwLock<HashMap<Atom, TableRef>>> =
  LazyLock::new(|| RwLock::new(HashMap::new()));

/// Process-wide registry of live tables.
pub(crate) struct TableRegistry;

impl TableRegistry {
  /// Validates `options`, allocates a table cell, and publishes it.
  ///
  /// # Errors
  ///
  /// Returns [`TableError::TableAlreadyExists`] when the requested name is
  /// bound; the existing table is untouched. Also propagates option
  /// validation failures.
  pub(crate) fn create(options: TableOptions, owner: ActorId) -> Result<TableRef, TableError> {
    options.validate()?;

    let name: Option<Atom> = options.name;
    let cell: Arc<TableCell> = Arc::new(TableCell::new(options, owner));
    let table: TableRef = cell.readonly.table;

    match name {
      Some(name) => {
        let mut name_guard: RwLockWriteGuard<'_, HashMap<Atom, TableRef>> = NAMES.write();

        let Entry::Vacant(name_entry) = name_guard.entry(name) else {
          return Err(TableError::TableAlreadyExists(name));
        };

        TABLES.write().insert(table, cell);
        name_entry.insert(table);

        drop(name_guard);
      }
      None => {
        TABLES.write().insert(table, cell);
      }
    }

    tracing::trace!(table = %table, owner = %owner, "table created");

    Ok(table)
  }

  /// Resolves either table identity to its cell.
  ///
  /// # Errors
  ///
  /// Returns [`TableError::TableNotFound`] when the table was deleted or
  /// the name is unbound.
  pub(crate) fn resolve(id: TableId) -> Result<Arc<TableCell>, TableError> {
    let table: TableRef = match id {
      TableId::Ref(table) => table,
      TableId::Name(name) => Self::whereis(name).ok_or(TableError::TableNotFound)?,
    };

    let guard: RwLockReadGuard<'_, HashMap<TableRef, Arc<TableCell>>> = TABLES.read();

    guard.get(&table).cloned().ok_or(TableError::TableNotFound)
  }

  /// Looks up a table reference by registered name.
  #[inline]
  pub(crate) fn whereis(name: Atom) -> Option<TableRef> {
    NAMES.read().get(&name).copied()
  }

  /// Unpublishes the table and drops its name binding.
  ///
  /// Idempotent: removing an already-deleted table is a no-op.
  pub(crate) fn remove(table: TableRef) -> bool {
    let mut name_guard: RwLockWriteGuard<'_, HashMap<Atom, TableRef>> = NAMES.write();
    let mut table_guard: RwLockWriteGuard<'_, HashMap<TableRef, Arc<TableCell>>> = TABLES.write();

    let Some(cell) = table_guard.remove(&table) else {
      return false;
    };

    if let Some(name) = cell.external.read().name {
      name_guard.remove(&name);
    }

    drop(table_guard);
    drop(name_guard);

    tracing::trace!(table = %table, "table deleted");

    true
  }

  /// Rebinds the table to a new name.
  ///
  /// The caller has already checked ownership.
  ///
  /// # Errors
  ///
  /// Returns [`TableError::TableAlreadyExists`] when the new name is bound
  /// to any table other than this one.
  pub(crate) fn rename(cell: &TableCell, name: Atom) -> Result<(), TableError> {
    let mut name_guard: RwLockWriteGuard<'_, HashMap<Atom, TableRef>> = NAMES.write();

    match name_guard.entry(name) {
      Entry::Occupied(entry) if *entry.get() == cell.readonly.table => {}
      Entry::Occupied(_) => return Err(TableError::TableAlreadyExists(name)),
      Entry::Vacant(entry) => {
        entry.insert(cell.readonly.table);
      }
    }

    let mut external = cell.external.write();

    if let Some(previous) = external.name.replace(name) {
      if previous != name {
        name_guard.remove(&previous);
      }
    }

    drop(external);
    drop(name_guard);

    Ok(())
  }

  /// Returns the cells currently owned by `actor`.
  pub(crate) fn owned_by(actor: ActorId) -> Vec<Arc<TableCell>> {
    let guard: RwLockReadGuard<'_, HashMap<TableRef, Arc<TableCell>>> = TABLES.read();

    guard
      .values()
      .filter(|cell| cell.external.read().owner == actor)
      .cloned()
      .collect()
  }
}

// -----------------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
  use super::*;
  use crate::actor::ActorRegistry;
  use crate::core::Layout;

  fn options(name: Option<&str>) -> TableOptions {
    let mut options: TableOptions = TableOptions::new(Layout::Set);

    options.name = name.map(Atom::new);
    options
  }

  #[test]
  fn test_create_and_resolve_by_ref() {
    let owner: ActorId = ActorRegistry::register();
    let table: TableRef = TableRegistry::create(options(None), owner).unwrap();

    assert!(TableRegistry::resolve(TableId::Ref(table)).is_ok());
    assert!(TableRegistry::remove(table));

    ActorRegistry::terminate(owner);
  }

  #[test]
  fn test_create_named_and_resolve_by_name() {
    let owner: ActorId = ActorRegistry::register();
    let table: TableRef =
      TableRegistry::create(options(Some("registry_named")), owner).unwrap();

    assert_eq!(TableRegistry::whereis(Atom::new("registry_named")), Some(table));
    assert!(TableRegistry::resolve(TableId::from("registry_named")).is_ok());

    TableRegistry::remove(table);

    assert_eq!(TableRegistry::whereis(Atom::new("registry_named")), None);

    ActorRegistry::terminate(owner);
  }

  #[test]
  fn test_name_collision_preserves_existing() {
    let owner: ActorId = ActorRegistry::register();
    let table: TableRef =
      TableRegistry::create(options(Some("registry_collision")), owner).unwrap();

    let result: Result<TableRef, TableError> =
      TableRegistry::create(options(Some("registry_collision")), owner);

    assert_eq!(
      result,
      Err(TableError::TableAlreadyExists(Atom::new("registry_collision"))),
    );
    assert_eq!(
      TableRegistry::whereis(Atom::new("registry_collision")),
      Some(table),
    );

    TableRegistry::remove(table);
    ActorRegistry::terminate(owner);
  }

  #[test]
  fn test_rename_moves_binding() {
    let owner: ActorId = ActorRegistry::register();
    let table: TableRef =
      TableRegistry::create(options(Some("registry_before")), owner).unwrap();

    let cell = TableRegistry::resolve(TableId::Ref(table)).unwrap();

    TableRegistry::rename(&cell, Atom::new("registry_after")).unwrap();

    assert_eq!(TableRegistry::whereis(Atom::new("registry_before")), None);
    assert_eq!(TableRegistry::whereis(Atom::new("registry_after")), Some(table));

    TableRegistry::remove(table);
    ActorRegistry::terminate(owner);
  }

  #[test]
  fn test_owned_by_filters_owner() {
    let alpha: ActorId = ActorRegistry::register();
    let omega: ActorId = ActorRegistry::register();

    let one: TableRef = TableRegistry::create(options(None), alpha).unwrap();
    let two: TableRef = TableRegistry::create(options(None), omega).unwrap();

    let owned: Vec<TableRef> = TableRegistry::owned_by(alpha)
      .iter()
      .map(|cell| cell.readonly.table)
      .collect();

    assert!(owned.contains(&one));
    assert!(!owned.contains(&two));

    TableRegistry::remove(one);
    TableRegistry::remove(two);
    ActorRegistry::terminate(alpha);
    ActorRegistry::terminate(omega);
  }
}
