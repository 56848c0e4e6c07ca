// -----------------------------------------------------------------------------
// Record Deletion
// -----------------------------------------------------------------------------

use triomphe::Arc;

use crate::actor::ActorId;
use crate::core::TableCell;
use crate::core::TableId;
use crate::error::TableError;
use crate::lang::Record;
use crate::lang::Term;

/// Removes every record stored under `key`.
///
/// Deleting an absent key succeeds without effect.
pub(crate) fn delete_key(caller: ActorId, id: TableId, key: &Term) -> Result<(), TableError> {
  let cell: Arc<TableCell> = super::writable(caller, id)?;
  let _removed: Vec<Record> = cell.storage.write().take(key);

  Ok(())
}

/// Removes every copy of an exact record.
pub(crate) fn delete_record(
  caller: ActorId,
  id: TableId,
  record: &Record,
) -> Result<(), TableError> {
  let cell: Arc<TableCell> = super::writable(caller, id)?;

  if record.arity() >= cell.readonly.key_pos {
    cell.storage.write().delete_record(record);
  }

  Ok(())
}

/// Removes every record; the table itself survives.
pub(crate) fn delete_all(caller: ActorId, id: TableId) -> Result<(), TableError> {
  let cell: Arc<TableCell> = super::writable(caller, id)?;

  cell.storage.write().clear();

  Ok(())
}
