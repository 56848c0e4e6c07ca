// -----------------------------------------------------------------------------
// Record Lookup
// -----------------------------------------------------------------------------

use triomphe::Arc;

use crate::actor::ActorId;
use crate::core::TableCell;
use crate::core::TableId;
use crate::error::TableError;
use crate::lang::Record;
use crate::lang::Term;

/// Returns all records stored under `key`, in insertion order for
/// multi-key layouts.
pub(crate) fn lookup(caller: ActorId, id: TableId, key: &Term) -> Result<Vec<Record>, TableError> {
  let cell: Arc<TableCell> = super::readable(caller, id)?;
  let rows: Vec<Record> = cell.storage.read().lookup(key);

  Ok(rows)
}

/// Returns the single record stored under `key`.
///
/// # Errors
///
/// Returns [`TableError::KeyNotFound`] when no record matches and
/// [`TableError::MultiFound`] when more than one does.
pub(crate) fn lookup_one(caller: ActorId, id: TableId, key: &Term) -> Result<Record, TableError> {
  let mut rows: Vec<Record> = lookup(caller, id, key)?;

  match rows.len() {
    0 => Err(TableError::KeyNotFound),
    1 => Ok(rows.remove(0)),
    _ => Err(TableError::MultiFound),
  }
}

/// Projects element `position` from every record stored under `key`.
///
/// # Errors
///
/// Returns [`TableError::KeyNotFound`] when no record matches and
/// [`TableError::PositionOutOfBounds`] when `position` exceeds the arity of
/// a matched record.
pub(crate) fn lookup_element(
  caller: ActorId,
  id: TableId,
  key: &Term,
  position: usize,
) -> Result<Vec<Term>, TableError> {
  let rows: Vec<Record> = lookup(caller, id, key)?;

  if rows.is_empty() {
    return Err(TableError::KeyNotFound);
  }

  rows
    .iter()
    .map(|record| {
      record
        .get(position)
        .cloned()
        .ok_or(TableError::PositionOutOfBounds {
          position,
          arity: record.arity(),
        })
    })
    .collect()
}

/// Returns `true` if any record is stored under `key`.
pub(crate) fn member(caller: ActorId, id: TableId, key: &Term) -> Result<bool, TableError> {
  let cell: Arc<TableCell> = super::readable(caller, id)?;
  let found: bool = cell.storage.read().member(key);

  Ok(found)
}

/// Removes and returns all records stored under `key` in one critical
/// section.
pub(crate) fn take(caller: ActorId, id: TableId, key: &Term) -> Result<Vec<Record>, TableError> {
  let cell: Arc<TableCell> = super::writable(caller, id)?;
  let rows: Vec<Record> = cell.storage.write().take(key);

  Ok(rows)
}

/// Materializes every record: term order for the ordered layout, otherwise
/// an unspecified order that is stable between mutations.
pub(crate) fn to_list(caller: ActorId, id: TableId) -> Result<Vec<Record>, TableError> {
  let cell: Arc<TableCell> = super::readable(caller, id)?;
  let rows: Vec<Record> = cell.storage.read().to_list();

  Ok(rows)
}

/// Returns the number of stored records.
pub(crate) fn size(caller: ActorId, id: TableId) -> Result<usize, TableError> {
  let cell: Arc<TableCell> = super::readable(caller, id)?;
  let size: usize = cell.storage.read().len();

  Ok(size)
}
