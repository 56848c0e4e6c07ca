//! Operation layer: one file per concern.
//!
//! Every operation resolves the table cell, applies the access gate, and
//! then enters the storage critical section. Functions here take the
//! calling actor explicitly; the public facades supply it from the
//! task-local actor context.

mod delete;
mod insert;
mod lifecycle;
mod lookup;
mod matching;
mod navigate;
mod transfer;

pub(crate) use self::delete::delete_all;
pub(crate) use self::delete::delete_key;
pub(crate) use self::delete::delete_record;
pub(crate) use self::insert::insert;
pub(crate) use self::insert::insert_all;
pub(crate) use self::insert::insert_all_new;
pub(crate) use self::insert::insert_new;
pub(crate) use self::lifecycle::create;
pub(crate) use self::lifecycle::delete_table;
pub(crate) use self::lifecycle::info;
pub(crate) use self::lifecycle::rename;
pub(crate) use self::lifecycle::set_heir;
pub(crate) use self::lifecycle::set_visibility;
pub(crate) use self::lifecycle::whereis;
pub(crate) use self::lookup::lookup;
pub(crate) use self::lookup::lookup_element;
pub(crate) use self::lookup::lookup_one;
pub(crate) use self::lookup::member;
pub(crate) use self::lookup::size;
pub(crate) use self::lookup::take;
pub(crate) use self::lookup::to_list;
pub(crate) use self::matching::match_limit;
pub(crate) use self::matching::match_pattern;
pub(crate) use self::matching::match_records;
pub(crate) use self::matching::resume;
pub(crate) use self::matching::select;
pub(crate) use self::matching::select_count;
pub(crate) use self::matching::select_delete;
pub(crate) use self::matching::select_limit;
pub(crate) use self::navigate::first;
pub(crate) use self::navigate::last;
pub(crate) use self::navigate::next;
pub(crate) use self::navigate::prev;
pub(crate) use self::transfer::accept;
pub(crate) use self::transfer::give_away;
pub(crate) use self::transfer::sweep_owned;

use triomphe::Arc;

use crate::actor::ActorId;
use crate::core::TableCell;
use crate::core::TableId;
use crate::core::TableRegistry;
use crate::error::TableError;

/// Resolves `id` and checks read access for `caller`.
pub(crate) fn readable(caller: ActorId, id: TableId) -> Result<Arc<TableCell>, TableError> {
  let cell: Arc<TableCell> = TableRegistry::resolve(id)?;

  crate::core::check_read(&cell, caller)?;

  Ok(cell)
}

/// Resolves `id` and checks write access for `caller`.
pub(crate) fn writable(caller: ActorId, id: TableId) -> Result<Arc<TableCell>, TableError> {
  let cell: Arc<TableCell> = TableRegistry::resolve(id)?;

  crate::core::check_write(&cell, caller)?;

  Ok(cell)
}
