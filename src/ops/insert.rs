// -----------------------------------------------------------------------------
// Record Insertion
// -----------------------------------------------------------------------------

use parking_lot::RwLockWriteGuard;
use triomphe::Arc;

use crate::actor::ActorId;
use crate::core::Storage;
use crate::core::TableCell;
use crate::core::TableId;
use crate::error::TableError;
use crate::lang::Record;

/// Checks a record's arity against the table's key position.
fn check_arity(record: &Record, key_pos: usize) -> Result<(), TableError> {
  if record.arity() < key_pos {
    return Err(TableError::RecordTooSmall {
      arity: record.arity(),
      key_pos,
    });
  }

  Ok(())
}

/// Inserts one record.
///
/// Unique-key layouts replace any record with the same key; multi-key
/// layouts append. Inserting a record identical to a stored one is a no-op
/// for the duplicate-rejecting multi layout.
pub(crate) fn insert(caller: ActorId, id: TableId, record: Record) -> Result<(), TableError> {
  let cell: Arc<TableCell> = super::writable(caller, id)?;

  check_arity(&record, cell.readonly.key_pos)?;

  cell.storage.write().insert(record);

  Ok(())
}

/// Inserts one record unless a conflicting entry exists.
///
/// # Errors
///
/// Returns [`TableError::KeyAlreadyExists`] (unique-key layouts) or
/// [`TableError::RecordAlreadyExists`] (duplicate-rejecting multi layout)
/// without mutating.
pub(crate) fn insert_new(caller: ActorId, id: TableId, record: Record) -> Result<(), TableError> {
  let cell: Arc<TableCell> = super::writable(caller, id)?;

  check_arity(&record, cell.readonly.key_pos)?;

  cell.storage.write().insert_new(record)
}

/// Inserts a batch of records atomically.
///
/// Every record's arity is validated before any mutation; the batch is then
/// applied inside one write critical section, so concurrent readers observe
/// either none or all of it.
///
/// # Errors
///
/// Returns [`TableError::RecordTooSmall`] if any record is too short; the
/// table is unchanged.
pub(crate) fn insert_all(
  caller: ActorId,
  id: TableId,
  records: Vec<Record>,
) -> Result<(), TableError> {
  let cell: Arc<TableCell> = super::writable(caller, id)?;

  for record in &records {
    check_arity(record, cell.readonly.key_pos)?;
  }

  let mut storage: RwLockWriteGuard<'_, Storage> = cell.storage.write();

  for record in records {
    storage.insert(record);
  }

  drop(storage);

  Ok(())
}

/// Inserts a batch of records atomically, unless any record conflicts.
///
/// Conflicts are checked against the table before any mutation; records
/// within the batch then apply sequentially with the layout's per-record
/// semantics.
///
/// # Errors
///
/// Returns the first arity or conflict error; the table is unchanged.
pub(crate) fn insert_all_new(
  caller: ActorId,
  id: TableId,
  records: Vec<Record>,
) -> Result<(), TableError> {
  let cell: Arc<TableCell> = super::writable(caller, id)?;

  for record in &records {
    check_arity(record, cell.readonly.key_pos)?;
  }

  let mut storage: RwLockWriteGuard<'_, Storage> = cell.storage.write();

  for record in &records {
    if let Some(error) = storage.conflict(record) {
      return Err(error);
    }
  }

  for record in records {
    storage.insert(record);
  }

  drop(storage);

  Ok(())
}
