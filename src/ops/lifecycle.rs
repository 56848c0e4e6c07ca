// -----------------------------------------------------------------------------
// Table Lifecycle
// -----------------------------------------------------------------------------

use parking_lot::RwLockWriteGuard;
use triomphe::Arc;

use crate::actor::ActorId;
use crate::core::Heir;
use crate::core::TableCell;
use crate::core::TableExternal;
use crate::core::TableId;
use crate::core::TableInfo;
use crate::core::TableOptions;
use crate::core::TableRef;
use crate::core::TableRegistry;
use crate::core::Visibility;
use crate::error::TableError;
use crate::lang::Atom;
use crate::lang::Term;

/// Creates a table owned by `caller`.
///
/// # Errors
///
/// Propagates option validation failures and name collisions.
pub(crate) fn create(caller: ActorId, options: TableOptions) -> Result<TableRef, TableError> {
  TableRegistry::create(options, caller)
}

/// Deletes the table and drops its name binding.
///
/// # Errors
///
/// Fails the write gate for non-owners of non-public tables.
pub(crate) fn delete_table(caller: ActorId, id: TableId) -> Result<(), TableError> {
  let cell: Arc<TableCell> = super::writable(caller, id)?;

  TableRegistry::remove(cell.readonly.table);

  Ok(())
}

/// Rebinds the table's name identity; the reference identity is unchanged.
///
/// # Errors
///
/// Fails the write gate for non-owners of non-public tables, rejects empty
/// names, and fails [`TableError::TableAlreadyExists`] when the new name is
/// bound elsewhere.
pub(crate) fn rename(caller: ActorId, id: TableId, name: Atom) -> Result<Atom, TableError> {
  if name.as_str().is_empty() {
    return Err(TableError::InvalidOption {
      option: "name",
      value: String::from("\"\""),
    });
  }

  let cell: Arc<TableCell> = super::writable(caller, id)?;

  TableRegistry::rename(&cell, name)?;

  Ok(name)
}

/// Takes a point-in-time metadata snapshot.
///
/// Metadata is readable regardless of the protection level; record data is
/// not.
pub(crate) fn info(id: TableId) -> Result<TableInfo, TableError> {
  Ok(TableRegistry::resolve(id)?.info())
}

/// Looks up a table reference by registered name.
#[inline]
pub(crate) fn whereis(name: Atom) -> Option<TableRef> {
  TableRegistry::whereis(name)
}

/// Replaces the table's heir configuration.
///
/// Owner-only, regardless of visibility.
pub(crate) fn set_heir(
  caller: ActorId,
  id: TableId,
  heir: Option<(ActorId, Term)>,
) -> Result<(), TableError> {
  let cell: Arc<TableCell> = TableRegistry::resolve(id)?;
  let mut external: RwLockWriteGuard<'_, TableExternal> = cell.external.write();

  if external.owner != caller {
    return Err(TableError::WriteProtected);
  }

  external.heir = heir.map(|(actor, gift)| Heir { actor, gift });

  drop(external);

  Ok(())
}

/// Replaces the table's protection level.
///
/// Owner-only, regardless of visibility.
pub(crate) fn set_visibility(
  caller: ActorId,
  id: TableId,
  visibility: Visibility,
) -> Result<(), TableError> {
  let cell: Arc<TableCell> = TableRegistry::resolve(id)?;
  let mut external: RwLockWriteGuard<'_, TableExternal> = cell.external.write();

  if external.owner != caller {
    return Err(TableError::WriteProtected);
  }

  external.visibility = visibility;

  drop(external);

  Ok(())
}
