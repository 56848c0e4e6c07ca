// -----------------------------------------------------------------------------
// Match / Select
// -----------------------------------------------------------------------------

use parking_lot::RwLockReadGuard;
use std::ops::ControlFlow;
use triomphe::Arc;

use crate::actor::ActorId;
use crate::core::ScanPos;
use crate::core::Storage;
use crate::core::TableCell;
use crate::core::TableId;
use crate::core::TableRegistry;
use crate::error::TableError;
use crate::lang::Record;
use crate::lang::Term;
use crate::select::CompiledPattern;
use crate::select::CompiledSpec;
use crate::select::Continuation;
use crate::select::Inner;
use crate::select::MatchSpec;
use crate::select::Pattern;
use crate::select::Query;
use crate::select::ResumePoint;

/// Runs `query` over the whole table, collecting binding lists.
fn scan_all(storage: &Storage, query: &Query) -> Vec<Vec<Term>> {
  let mut results: Vec<Vec<Term>> = Vec::new();

  storage.scan(None, |_, record| {
    if let Some(env) = query.matches(record) {
      results.push(env);
    }

    ControlFlow::Continue(())
  });

  results
}

/// Runs one page of `query` and packages the continuation.
///
/// The cursor records the last-visited position, matched or not, so
/// resumption continues strictly after it. A page shorter than `limit`
/// proves exhaustion.
fn scan_page(
  cell: &TableCell,
  query: Query,
  from: Option<ScanPos>,
  limit: usize,
) -> (Vec<Vec<Term>>, Continuation) {
  let limit: usize = limit.max(1);
  let storage: RwLockReadGuard<'_, Storage> = cell.storage.read();

  let mut results: Vec<Vec<Term>> = Vec::new();
  let mut last: Option<ScanPos> = None;

  storage.scan(from.as_ref(), |position, record| {
    last = Some(position);

    if let Some(env) = query.matches(record) {
      results.push(env);

      if results.len() == limit {
        return ControlFlow::Break(());
      }
    }

    ControlFlow::Continue(())
  });

  drop(storage);

  let cursor: Continuation = match last {
    Some(from) if results.len() == limit => Continuation::more(ResumePoint {
      table: cell.readonly.table,
      query,
      limit,
      from,
    }),
    _ => Continuation::end(),
  };

  (results, cursor)
}

/// Full-scan match: one binding list per matching record.
pub(crate) fn match_pattern(
  caller: ActorId,
  id: TableId,
  pattern: &Pattern,
) -> Result<Vec<Vec<Term>>, TableError> {
  let cell: Arc<TableCell> = super::readable(caller, id)?;
  let query: Query = Query::Pattern(CompiledPattern::compile(pattern));

  Ok(scan_all(&cell.storage.read(), &query))
}

/// Full-scan match returning whole records instead of bindings.
pub(crate) fn match_records(
  caller: ActorId,
  id: TableId,
  pattern: &Pattern,
) -> Result<Vec<Record>, TableError> {
  let cell: Arc<TableCell> = super::readable(caller, id)?;
  let compiled: CompiledPattern = CompiledPattern::compile(pattern);

  let mut results: Vec<Record> = Vec::new();

  cell.storage.read().scan(None, |_, record| {
    if compiled.matches(record).is_some() {
      results.push(record.clone());
    }

    ControlFlow::Continue(())
  });

  Ok(results)
}

/// Paginated match: at most `limit` binding lists plus a continuation.
pub(crate) fn match_limit(
  caller: ActorId,
  id: TableId,
  pattern: &Pattern,
  limit: usize,
) -> Result<(Vec<Vec<Term>>, Continuation), TableError> {
  let cell: Arc<TableCell> = super::readable(caller, id)?;
  let query: Query = Query::Pattern(CompiledPattern::compile(pattern));

  Ok(scan_page(&cell, query, None, limit))
}

/// Full-scan select with guard evaluation.
pub(crate) fn select(
  caller: ActorId,
  id: TableId,
  spec: &MatchSpec,
) -> Result<Vec<Vec<Term>>, TableError> {
  let cell: Arc<TableCell> = super::readable(caller, id)?;
  let query: Query = Query::Spec(CompiledSpec::compile(spec)?);

  Ok(scan_all(&cell.storage.read(), &query))
}

/// Paginated select: at most `limit` binding lists plus a continuation.
pub(crate) fn select_limit(
  caller: ActorId,
  id: TableId,
  spec: &MatchSpec,
  limit: usize,
) -> Result<(Vec<Vec<Term>>, Continuation), TableError> {
  let cell: Arc<TableCell> = super::readable(caller, id)?;
  let query: Query = Query::Spec(CompiledSpec::compile(spec)?);

  Ok(scan_page(&cell, query, None, limit))
}

/// Counts records satisfying `spec` without materializing bindings.
pub(crate) fn select_count(
  caller: ActorId,
  id: TableId,
  spec: &MatchSpec,
) -> Result<usize, TableError> {
  let cell: Arc<TableCell> = super::readable(caller, id)?;
  let compiled: CompiledSpec = CompiledSpec::compile(spec)?;

  let mut count: usize = 0;

  cell.storage.read().scan(None, |_, record| {
    if compiled.matches(record).is_some() {
      count += 1;
    }

    ControlFlow::Continue(())
  });

  Ok(count)
}

/// Atomically removes every record satisfying `spec`; returns the removed
/// count.
///
/// Runs in one write critical section: no double-deletes, and records
/// inserted concurrently are either fully considered or not at all.
pub(crate) fn select_delete(
  caller: ActorId,
  id: TableId,
  spec: &MatchSpec,
) -> Result<usize, TableError> {
  let cell: Arc<TableCell> = super::writable(caller, id)?;
  let compiled: CompiledSpec = CompiledSpec::compile(spec)?;

  let removed: usize = cell
    .storage
    .write()
    .select_delete(|record| compiled.matches(record).is_some());

  Ok(removed)
}

/// Resumes a paginated match or select exactly where it left off.
///
/// # Errors
///
/// Returns [`TableError::InvalidContinuation`] when the producing table is
/// gone. Resuming an exhausted continuation yields an empty page and stays
/// exhausted.
pub(crate) fn resume(
  caller: ActorId,
  continuation: Continuation,
) -> Result<(Vec<Vec<Term>>, Continuation), TableError> {
  match continuation.into_inner() {
    Inner::End => Ok((Vec::new(), Continuation::end())),
    Inner::More(point) => {
      let cell: Arc<TableCell> = TableRegistry::resolve(TableId::Ref(point.table))
        .map_err(|_| TableError::InvalidContinuation)?;

      crate::core::check_read(&cell, caller)?;

      Ok(scan_page(&cell, point.query, Some(point.from), point.limit))
    }
  }
}
