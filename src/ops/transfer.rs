// -----------------------------------------------------------------------------
// Ownership Transfer Protocol
// -----------------------------------------------------------------------------

use parking_lot::RwLockWriteGuard;
use std::time::Duration;
use tokio::sync::MutexGuard;
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::time::Instant;
use tokio_util::future::FutureExt;
use triomphe::Arc;

use crate::actor::ActorCell;
use crate::actor::ActorId;
use crate::actor::ActorRegistry;
use crate::actor::TransferKind;
use crate::actor::TransferSignal;
use crate::core::TableCell;
use crate::core::TableExternal;
use crate::core::TableId;
use crate::core::TableRef;
use crate::core::TableRegistry;
use crate::error::TableError;
use crate::lang::Term;

/// Offers table ownership to `target`, carrying `gift`.
///
/// Ownership does not change until the target accepts; the offer is
/// serialized through the table's external-state lock, so at most one
/// hand-off commits at a time.
///
/// # Errors
///
/// - [`TableError::SenderNotTableOwner`]: `caller` does not own the table
/// - [`TableError::RecipientAlreadyOwnsTable`]: `target` already owns it
/// - [`TableError::RecipientNotAlive`]: `target` is not a live actor
///
/// All rejections are non-mutating.
pub(crate) fn give_away(
  caller: ActorId,
  id: TableId,
  target: ActorId,
  gift: Term,
) -> Result<(), TableError> {
  let cell: Arc<TableCell> = TableRegistry::resolve(id)?;
  let external: RwLockWriteGuard<'_, TableExternal> = cell.external.write();

  if external.owner != caller {
    return Err(TableError::SenderNotTableOwner);
  }

  if target == caller {
    return Err(TableError::RecipientAlreadyOwnsTable);
  }

  ActorRegistry::deliver(
    target,
    TransferSignal {
      table: cell.readonly.table,
      from: caller,
      gift,
      kind: TransferKind::Offer,
    },
  )?;

  drop(external);

  tracing::trace!(
    table = %cell.readonly.table,
    from = %caller,
    to = %target,
    "ownership offered",
  );

  Ok(())
}

/// Awaits an ownership transfer addressed to `caller`, bounded by
/// `timeout`.
///
/// On arrival of a valid offer the table transitions to the caller's
/// ownership and the sender's gift is returned. Stale offers (the sender
/// no longer owns the table, or the table is gone) are dropped and the
/// wait continues within the remaining time. A timeout leaves no side
/// effect.
///
/// # Errors
///
/// Returns [`TableError::Timeout`] when `timeout` elapses first.
pub(crate) async fn accept(
  caller: ActorId,
  timeout: Duration,
) -> Result<(TableRef, ActorId, Term), TableError> {
  let actor: Arc<ActorCell> = match ActorRegistry::resolve(caller) {
    Some(actor) => actor,
    None => {
      tracing::error!(operation = "accept", actor = %caller, "caller is not registered");
      return Err(TableError::UnknownError);
    }
  };

  let deadline: Instant = Instant::now() + timeout;
  let mut inbox: MutexGuard<'_, UnboundedReceiver<TransferSignal>> = actor.recv.lock().await;

  loop {
    let remaining: Duration = deadline.saturating_duration_since(Instant::now());

    if remaining.is_zero() {
      return Err(TableError::Timeout);
    }

    let signal: TransferSignal = match inbox.recv().timeout(remaining).await {
      Ok(Some(signal)) => signal,
      Ok(None) => {
        tracing::error!(operation = "accept", actor = %caller, "transfer inbox closed");
        return Err(TableError::UnknownError);
      }
      Err(_elapsed) => {
        return Err(TableError::Timeout);
      }
    };

    match signal.kind {
      // Ownership already moved when the previous owner terminated.
      TransferKind::Bequest => {
        tracing::trace!(
          table = %signal.table,
          from = %signal.from,
          to = %caller,
          "bequest received",
        );

        return Ok((signal.table, signal.from, signal.gift));
      }
      TransferKind::Offer => {
        let Ok(cell) = TableRegistry::resolve(TableId::Ref(signal.table)) else {
          tracing::trace!(table = %signal.table, "stale offer dropped: table gone");
          continue;
        };

        let mut external: RwLockWriteGuard<'_, TableExternal> = cell.external.write();

        if external.owner != signal.from {
          drop(external);
          tracing::trace!(table = %signal.table, "stale offer dropped: sender lost ownership");
          continue;
        }

        external.owner = caller;

        drop(external);

        tracing::trace!(
          table = %signal.table,
          from = %signal.from,
          to = %caller,
          "ownership accepted",
        );

        return Ok((signal.table, signal.from, signal.gift));
      }
    }
  }
}

/// Runs the owner-termination transition for every table `actor` owns.
///
/// Invoked by the actor registry when an actor's scope ends.
pub(crate) fn sweep_owned(actor: ActorId) {
  for cell in TableRegistry::owned_by(actor) {
    on_owner_terminated(&cell, actor);
  }
}

/// Owner-termination transition for one table.
///
/// With a live heir distinct from the dying owner, ownership transitions
/// to the heir and a bequest carrying the configured payload lands in the
/// heir's inbox; otherwise the table is destroyed.
pub(crate) fn on_owner_terminated(cell: &TableCell, owner: ActorId) {
  let mut external: RwLockWriteGuard<'_, TableExternal> = cell.external.write();

  if external.owner != owner {
    return; // Raced with a hand-off; the table is no longer ours to settle.
  }

  let heir: Option<(ActorId, Term)> = external
    .heir
    .as_ref()
    .map(|heir| (heir.actor, heir.gift.clone()));

  let mut beneficiary: Option<ActorId> = None;

  if let Some((heir, gift)) = heir {
    if heir != owner && ActorRegistry::alive(heir) {
      let delivered: Result<(), TableError> = ActorRegistry::deliver(
        heir,
        TransferSignal {
          table: cell.readonly.table,
          from: owner,
          gift,
          kind: TransferKind::Bequest,
        },
      );

      if delivered.is_ok() {
        external.owner = heir;
        beneficiary = Some(heir);
      }
    }
  }

  drop(external);

  match beneficiary {
    Some(heir) => {
      tracing::trace!(
        table = %cell.readonly.table,
        from = %owner,
        to = %heir,
        "ownership bequeathed",
      );

      // The heir may have terminated between the liveness check and the
      // ownership write; settle again if so.
      if !ActorRegistry::alive(heir) {
        on_owner_terminated(cell, heir);
      }
    }
    None => {
      TableRegistry::remove(cell.readonly.table);

      tracing::trace!(
        table = %cell.readonly.table,
        owner = %owner,
        "table destroyed with owner",
      );
    }
  }
}
