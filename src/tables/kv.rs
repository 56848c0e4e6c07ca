use std::time::Duration;

use crate::actor::ActorId;
use crate::consts;
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
// Key-Value Options
// -----------------------------------------------------------------------------

/// Creation options for a [`KeyValueSet`].
///
/// The key position is fixed at one and cannot be supplied; records are
/// always `(key, value)` pairs.
#[derive(Clone, Debug)]
pub struct KeyValueOptions {
  /// Optional process-wide registered name.
  pub name: Option<Atom>,
  /// Who may read and write.
  pub visibility: Visibility,
  /// Actor inheriting ownership on owner termination, with its payload.
  pub heir: Option<(ActorId, Term)>,
  /// Advisory hint: expect concurrent read bursts.
  pub read_concurrency: bool,
  /// Advisory hint: expect concurrent write bursts.
  pub write_concurrency: bool,
  /// Favor compact record encoding over raw speed.
  pub compact: bool,
}

impl Default for KeyValueOptions {
  fn default() -> Self {
    let base: TableOptions = TableOptions::default();

    Self {
      name: None,
      visibility: base.visibility,
      heir: None,
      read_concurrency: false,
      write_concurrency: false,
      compact: false,
    }
  }
}

impl From<KeyValueOptions> for TableOptions {
  fn from(other: KeyValueOptions) -> Self {
    Self {
      name: other.name,
      visibility: other.visibility,
      heir: other.heir,
      key_pos: consts::DEF_KEY_POS,
      layout: Layout::Set,
      read_concurrency: other.read_concurrency,
      write_concurrency: other.write_concurrency,
      compact: other.compact,
    }
  }
}

// -----------------------------------------------------------------------------
// @api - KeyValueSet
// -----------------------------------------------------------------------------

/// Key-value facade: a 1:1 projection of `(key, value)` pairs onto a
/// unique-key table keyed at position one.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct KeyValueSet {
  table: Table,
}

impl KeyValueSet {
  /// Creates a key-value table owned by the calling actor.
  pub fn create(options: KeyValueOptions) -> Result<Self, TableError> {
    Table::create(options.into()).map(|table| Self { table })
  }

  /// Raising variant of [`KeyValueSet::create`].
  pub fn create_or_raise(options: KeyValueOptions) -> Self {
    Self::create(options).unwrap_or_else(|error| error.raise())
  }

  /// Wraps an existing table, checking layout and key position.
  ///
  /// # Errors
  ///
  /// Returns [`TableError::InvalidType`] when the table is not a
  /// unique-key layout and [`TableError::InvalidKeypos`] when it is keyed
  /// anywhere other than position one.
  pub fn wrap_existing(id: impl Into<TableId>) -> Result<Self, TableError> {
    let table: Table = Table::wrap(id)?;
    let info: TableInfo = table.info()?;

    if !info.layout.is_unique() {
      return Err(TableError::InvalidType {
        expected: Layout::Set,
        actual: info.layout,
      });
    }

    if info.key_pos != consts::DEF_KEY_POS {
      return Err(TableError::InvalidKeypos(info.key_pos));
    }

    Ok(Self { table })
  }

  /// Returns the untyped handle for the full table contract.
  #[inline]
  pub const fn table(&self) -> &Table {
    &self.table
  }

  /// Stores `value` under `key`, replacing any previous value.
  pub fn put(&self, key: impl Into<Term>, value: impl Into<Term>) -> Result<(), TableError> {
    self.table.insert(Record::new(vec![key.into(), value.into()]))
  }

  /// Raising variant of [`KeyValueSet::put`].
  pub fn put_or_raise(&self, key: impl Into<Term>, value: impl Into<Term>) {
    self.put(key, value).unwrap_or_else(|error| error.raise())
  }

  /// Stores `value` under `key` unless the key already exists.
  ///
  /// # Errors
  ///
  /// Returns [`TableError::KeyAlreadyExists`] without mutating; the prior
  /// value is unchanged.
  pub fn put_new(&self, key: impl Into<Term>, value: impl Into<Term>) -> Result<(), TableError> {
    self.table.insert_new(Record::new(vec![key.into(), value.into()]))
  }

  /// Raising variant of [`KeyValueSet::put_new`].
  pub fn put_new_or_raise(&self, key: impl Into<Term>, value: impl Into<Term>) {
    self.put_new(key, value).unwrap_or_else(|error| error.raise())
  }

  /// Returns the value stored under `key`, if any.
  pub fn get(&self, key: impl Into<Term>) -> Result<Option<Term>, TableError> {
    let rows: Vec<Record> = self.table.lookup(key)?;

    Ok(rows.into_iter().next().and_then(|record| record.get(2).cloned()))
  }

  /// Raising variant of [`KeyValueSet::get`].
  pub fn get_or_raise(&self, key: impl Into<Term>) -> Option<Term> {
    self.get(key).unwrap_or_else(|error| error.raise())
  }

  /// Returns the value stored under `key`.
  ///
  /// # Errors
  ///
  /// Returns [`TableError::KeyNotFound`] when the key is absent.
  pub fn fetch(&self, key: impl Into<Term>) -> Result<Term, TableError> {
    self.get(key)?.ok_or(TableError::KeyNotFound)
  }

  /// Raising variant of [`KeyValueSet::fetch`].
  pub fn fetch_or_raise(&self, key: impl Into<Term>) -> Term {
    self.fetch(key).unwrap_or_else(|error| error.raise())
  }

  /// Returns `true` if a value is stored under `key`.
  pub fn has_key(&self, key: impl Into<Term>) -> Result<bool, TableError> {
    self.table.member(key)
  }

  /// Raising variant of [`KeyValueSet::has_key`].
  pub fn has_key_or_raise(&self, key: impl Into<Term>) -> bool {
    self.table.member_or_raise(key)
  }

  /// Removes the value stored under `key`.
  pub fn remove(&self, key: impl Into<Term>) -> Result<(), TableError> {
    self.table.delete(key)
  }

  /// Raising variant of [`KeyValueSet::remove`].
  pub fn remove_or_raise(&self, key: impl Into<Term>) {
    self.table.delete_or_raise(key);
  }

  /// Removes and returns the value stored under `key`, if any.
  pub fn take(&self, key: impl Into<Term>) -> Result<Option<Term>, TableError> {
    let rows: Vec<Record> = self.table.take(key)?;

    Ok(rows.into_iter().next().and_then(|record| record.get(2).cloned()))
  }

  /// Raising variant of [`KeyValueSet::take`].
  pub fn take_or_raise(&self, key: impl Into<Term>) -> Option<Term> {
    self.take(key).unwrap_or_else(|error| error.raise())
  }

  /// Materializes every `(key, value)` pair.
  pub fn to_list(&self) -> Result<Vec<(Term, Term)>, TableError> {
    let rows: Vec<Record> = self.table.to_list()?;

    Ok(
      rows
        .into_iter()
        .filter_map(|record| {
          let mut elements = record.into_elements().into_iter();
          let key: Term = elements.next()?;
          let value: Term = elements.next()?;

          Some((key, value))
        })
        .collect(),
    )
  }

  /// Raising variant of [`KeyValueSet::to_list`].
  pub fn to_list_or_raise(&self) -> Vec<(Term, Term)> {
    self.to_list().unwrap_or_else(|error| error.raise())
  }

  /// Returns the number of stored pairs.
  pub fn size(&self) -> Result<usize, TableError> {
    self.table.size()
  }

  /// Raising variant of [`KeyValueSet::size`].
  pub fn size_or_raise(&self) -> usize {
    self.table.size_or_raise()
  }

  /// Removes every pair; the table itself survives.
  pub fn clear(&self) -> Result<(), TableError> {
    self.table.delete_all()
  }

  /// Raising variant of [`KeyValueSet::clear`].
  pub fn clear_or_raise(&self) {
    self.table.delete_all_or_raise();
  }

  /// Deletes the table.
  pub fn delete_table(self) -> Result<(), TableError> {
    self.table.delete_table()
  }

  /// Raising variant of [`KeyValueSet::delete_table`].
  pub fn delete_table_or_raise(self) {
    self.table.delete_table_or_raise();
  }

  /// Offers table ownership to `target`, carrying `gift`.
  pub fn give_away(&self, target: ActorId, gift: impl Into<Term>) -> Result<(), TableError> {
    self.table.give_away(target, gift)
  }

  /// Raising variant of [`KeyValueSet::give_away`].
  pub fn give_away_or_raise(&self, target: ActorId, gift: impl Into<Term>) {
    self.table.give_away_or_raise(target, gift);
  }

  /// Awaits an ownership transfer and wraps the received table.
  ///
  /// # Errors
  ///
  /// Returns [`TableError::Timeout`] when `timeout` elapses first, plus
  /// the [`KeyValueSet::wrap_existing`] layout checks.
  pub async fn accept(timeout: Duration) -> Result<(Self, ActorId, Term), TableError> {
    let transfer: Transfer = Table::accept(timeout).await?;
    let wrapped: Self = Self::wrap_existing(transfer.table)?;

    Ok((wrapped, transfer.from, transfer.gift))
  }
}
