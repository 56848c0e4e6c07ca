use std::time::Duration;

use crate::actor::ActorId;
use crate::core::Layout;
use crate::core::TableId;
use crate::core::TableInfo;
use crate::core::TableOptions;
use crate::core::Visibility;
use crate::error::TableError;
use crate::lang::Atom;
use crate::lang::Record;
use crate::lang::Term;
use crate::tables::Table;
use crate::tables::Transfer;

// -----------------------------------------------------------------------------
// Set Options
// -----------------------------------------------------------------------------

/// Creation options for a [`Set`].
#[derive(Clone, Debug)]
pub struct SetOptions {
  /// Optional process-wide registered name.
  pub name: Option<Atom>,
  /// Who may read and write.
  pub visibility: Visibility,
  /// Actor inheriting ownership on owner termination, with its payload.
  pub heir: Option<(ActorId, Term)>,
  /// 1-indexed tuple slot holding each record's key.
  pub key_pos: usize,
  /// Keep records sorted in term order.
  pub ordered: bool,
  /// Advisory hint: expect concurrent read bursts.
  pub read_concurrency: bool,
  /// Advisory hint: expect concurrent write bursts.
  pub write_concurrency: bool,
  /// Favor compact record encoding over raw speed.
  pub compact: bool,
}

impl Default for SetOptions {
  fn default() -> Self {
    let base: TableOptions = TableOptions::default();

    Self {
      name: None,
      visibility: base.visibility,
      heir: None,
      key_pos: base.key_pos,
      ordered: false,
      read_concurrency: false,
      write_concurrency: false,
      compact: false,
    }
  }
}

impl From<SetOptions> for TableOptions {
  fn from(other: SetOptions) -> Self {
    Self {
      name: other.name,
      visibility: other.visibility,
      heir: other.heir,
      key_pos: other.key_pos,
      layout: if other.ordered {
        Layout::OrderedSet
      } else {
        Layout::Set
      },
      read_concurrency: other.read_concurrency,
      write_concurrency: other.write_concurrency,
      compact: other.compact,
    }
  }
}

// -----------------------------------------------------------------------------
// @api - Set
// -----------------------------------------------------------------------------

/// Unique-key table facade: at most one record per key.
///
/// The `ordered` option picks the term-ordered layout, which additionally
/// supports [`first`]/[`last`]/[`next`]/[`prev`] navigation.
///
/// [`first`]: Set::first
/// [`last`]: Set::last
/// [`next`]: Set::next
/// [`prev`]: Set::prev
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Set {
  table: Table,
}

impl Set {
  /// Creates a unique-key table owned by the calling actor.
  pub fn create(options: SetOptions) -> Result<Self, TableError> {
    Table::create(options.into()).map(|table| Self { table })
  }

  /// Raising variant of [`Set::create`].
  pub fn create_or_raise(options: SetOptions) -> Self {
    Self::create(options).unwrap_or_else(|error| error.raise())
  }

  /// Wraps an existing table, checking that its layout is unique-key.
  ///
  /// # Errors
  ///
  /// Returns [`TableError::InvalidType`] when the table is a multi-key
  /// layout.
  pub fn wrap_existing(id: impl Into<TableId>) -> Result<Self, TableError> {
    let table: Table = Table::wrap(id)?;
    let info: TableInfo = table.info()?;

    if !info.layout.is_unique() {
      return Err(TableError::InvalidType {
        expected: Layout::Set,
        actual: info.layout,
      });
    }

    Ok(Self { table })
  }

  /// Returns the untyped handle for the full table contract.
  #[inline]
  pub const fn table(&self) -> &Table {
    &self.table
  }

  /// Inserts one record, replacing any record with the same key.
  pub fn insert(&self, record: impl Into<Record>) -> Result<(), TableError> {
    self.table.insert(record)
  }

  /// Raising variant of [`Set::insert`].
  pub fn insert_or_raise(&self, record: impl Into<Record>) {
    self.table.insert_or_raise(record);
  }

  /// Inserts one record unless its key already exists.
  pub fn insert_new(&self, record: impl Into<Record>) -> Result<(), TableError> {
    self.table.insert_new(record)
  }

  /// Raising variant of [`Set::insert_new`].
  pub fn insert_new_or_raise(&self, record: impl Into<Record>) {
    self.table.insert_new_or_raise(record);
  }

  /// Inserts a batch atomically.
  pub fn insert_all(&self, records: Vec<Record>) -> Result<(), TableError> {
    self.table.insert_all(records)
  }

  /// Raising variant of [`Set::insert_all`].
  pub fn insert_all_or_raise(&self, records: Vec<Record>) {
    self.table.insert_all_or_raise(records);
  }

  /// Inserts a batch atomically, unless any key already exists.
  pub fn insert_all_new(&self, records: Vec<Record>) -> Result<(), TableError> {
    self.table.insert_all_new(records)
  }

  /// Raising variant of [`Set::insert_all_new`].
  pub fn insert_all_new_or_raise(&self, records: Vec<Record>) {
    self.table.insert_all_new_or_raise(records);
  }

  /// Returns the record stored under `key`, if any.
  pub fn lookup(&self, key: impl Into<Term>) -> Result<Option<Record>, TableError> {
    self.table.lookup(key).map(|rows| rows.into_iter().next())
  }

  /// Raising variant of [`Set::lookup`].
  pub fn lookup_or_raise(&self, key: impl Into<Term>) -> Option<Record> {
    self.lookup(key).unwrap_or_else(|error| error.raise())
  }

  /// Projects element `position` from the record stored under `key`.
  pub fn lookup_element(
    &self,
    key: impl Into<Term>,
    position: usize,
  ) -> Result<Term, TableError> {
    self
      .table
      .lookup_element(key, position)
      .map(|mut elements| elements.remove(0))
  }

  /// Raising variant of [`Set::lookup_element`].
  pub fn lookup_element_or_raise(&self, key: impl Into<Term>, position: usize) -> Term {
    self.lookup_element(key, position).unwrap_or_else(|error| error.raise())
  }

  /// Returns `true` if a record is stored under `key`.
  pub fn member(&self, key: impl Into<Term>) -> Result<bool, TableError> {
    self.table.member(key)
  }

  /// Raising variant of [`Set::member`].
  pub fn member_or_raise(&self, key: impl Into<Term>) -> bool {
    self.table.member_or_raise(key)
  }

  /// Removes and returns the record stored under `key`, if any.
  pub fn take(&self, key: impl Into<Term>) -> Result<Option<Record>, TableError> {
    self.table.take(key).map(|rows| rows.into_iter().next())
  }

  /// Raising variant of [`Set::take`].
  pub fn take_or_raise(&self, key: impl Into<Term>) -> Option<Record> {
    self.take(key).unwrap_or_else(|error| error.raise())
  }

  /// Removes the record stored under `key`.
  pub fn delete(&self, key: impl Into<Term>) -> Result<(), TableError> {
    self.table.delete(key)
  }

  /// Raising variant of [`Set::delete`].
  pub fn delete_or_raise(&self, key: impl Into<Term>) {
    self.table.delete_or_raise(key);
  }

  /// Removes every record; the table itself survives.
  pub fn delete_all(&self) -> Result<(), TableError> {
    self.table.delete_all()
  }

  /// Raising variant of [`Set::delete_all`].
  pub fn delete_all_or_raise(&self) {
    self.table.delete_all_or_raise();
  }

  /// Deletes the table.
  pub fn delete_table(self) -> Result<(), TableError> {
    self.table.delete_table()
  }

  /// Raising variant of [`Set::delete_table`].
  pub fn delete_table_or_raise(self) {
    self.table.delete_table_or_raise();
  }

  /// Materializes every record.
  pub fn to_list(&self) -> Result<Vec<Record>, TableError> {
    self.table.to_list()
  }

  /// Raising variant of [`Set::to_list`].
  pub fn to_list_or_raise(&self) -> Vec<Record> {
    self.table.to_list_or_raise()
  }

  /// Returns the number of stored records.
  pub fn size(&self) -> Result<usize, TableError> {
    self.table.size()
  }

  /// Raising variant of [`Set::size`].
  pub fn size_or_raise(&self) -> usize {
    self.table.size_or_raise()
  }

  /// Smallest key in term order. Ordered sets only.
  pub fn first(&self) -> Result<Term, TableError> {
    self.table.first()
  }

  /// Raising variant of [`Set::first`].
  pub fn first_or_raise(&self) -> Term {
    self.table.first_or_raise()
  }

  /// Largest key in term order. Ordered sets only.
  pub fn last(&self) -> Result<Term, TableError> {
    self.table.last()
  }

  /// Raising variant of [`Set::last`].
  pub fn last_or_raise(&self) -> Term {
    self.table.last_or_raise()
  }

  /// Smallest key strictly greater than `key`. Ordered sets only.
  pub fn next(&self, key: impl Into<Term>) -> Result<Term, TableError> {
    self.table.next(key)
  }

  /// Raising variant of [`Set::next`].
  pub fn next_or_raise(&self, key: impl Into<Term>) -> Term {
    self.table.next_or_raise(key)
  }

  /// Largest key strictly less than `key`. Ordered sets only.
  pub fn prev(&self, key: impl Into<Term>) -> Result<Term, TableError> {
    self.table.prev(key)
  }

  /// Raising variant of [`Set::prev`].
  pub fn prev_or_raise(&self, key: impl Into<Term>) -> Term {
    self.table.prev_or_raise(key)
  }

  /// Offers table ownership to `target`, carrying `gift`.
  pub fn give_away(&self, target: ActorId, gift: impl Into<Term>) -> Result<(), TableError> {
    self.table.give_away(target, gift)
  }

  /// Raising variant of [`Set::give_away`].
  pub fn give_away_or_raise(&self, target: ActorId, gift: impl Into<Term>) {
    self.table.give_away_or_raise(target, gift);
  }

  /// Awaits an ownership transfer and wraps the received table as a `Set`.
  ///
  /// # Errors
  ///
  /// Returns [`TableError::Timeout`] when `timeout` elapses first and
  /// [`TableError::InvalidType`] when the received table is not unique-key.
  pub async fn accept(timeout: Duration) -> Result<(Self, ActorId, Term), TableError> {
    let transfer: Transfer = Table::accept(timeout).await?;
    let wrapped: Self = Self::wrap_existing(transfer.table)?;

    Ok((wrapped, transfer.from, transfer.gift))
  }
}
