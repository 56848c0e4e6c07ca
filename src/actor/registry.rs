use hashbrown::HashMap;
use parking_lot::RwLock;
use parking_lot::RwLockReadGuard;
use parking_lot::RwLockWriteGuard;
use std::num::NonZeroU64;
use std::sync::LazyLock;
use std::sync::atomic::AtomicU64;
use std::sync::atomic::Ordering::Relaxed;
use tokio::sync::Mutex;
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::sync::mpsc::UnboundedSender;
use tokio::sync::mpsc::unbounded_channel;
use triomphe::Arc;

use crate::actor::ActorId;
use crate::core::TableRef;
use crate::error::TableError;
use crate::lang::Term;

// -----------------------------------------------------------------------------
// Transfer Signal
// -----------------------------------------------------------------------------

/// How a transfer signal affects table ownership when received.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum TransferKind {
  /// Ownership moves only once the recipient accepts.
  Offer,
  /// Ownership already moved when the previous owner terminated.
  Bequest,
}

/// An in-flight ownership hand-off delivered to an actor's inbox.
#[derive(Debug)]
pub(crate) struct TransferSignal {
  pub(crate) table: TableRef,
  pub(crate) from: ActorId,
  pub(crate) gift: Term,
  pub(crate) kind: TransferKind,
}

// -----------------------------------------------------------------------------
// Actor Cell
// -----------------------------------------------------------------------------

/// Per-actor state: identity plus the transfer inbox endpoints.
///
/// The receiver sits behind an async mutex because only the owning actor
/// reads it, and only inside [`accept`].
///
/// [`accept`]: crate::ops::accept
pub(crate) struct ActorCell {
  pub(crate) id: ActorId,
  pub(crate) send: UnboundedSender<TransferSignal>,
  pub(crate) recv: Mutex<UnboundedReceiver<TransferSignal>>,
}

impl ActorCell {
  fn new(id: ActorId) -> Self {
    let channel: (
      UnboundedSender<TransferSignal>,
      UnboundedReceiver<TransferSignal>,
    ) = unbounded_channel();

    Self {
      id,
      send: channel.0,
      recv: Mutex::new(channel.1),
    }
  }
}

// -----------------------------------------------------------------------------
// Actor Registry
// -----------------------------------------------------------------------------

static SERIAL: AtomicU64 = AtomicU64::new(1);

static ACTORS: LazyLock<RwLock<HashMap<ActorId, Arc<ActorCell>>>> =
  LazyLock::new(|| RwLock::new(HashMap::new()));

/// Registry of live actors.
///
/// Registration and termination bracket an actor's lifetime; the ownership
/// protocol consults this registry for liveness and inbox delivery.
pub(crate) struct ActorRegistry;

impl ActorRegistry {
  /// Registers a new live actor and returns its identity.
  pub(crate) fn register() -> ActorId {
    let serial: u64 = SERIAL.fetch_add(1, Relaxed);

    // SAFETY: The counter starts at one and only increments.
    let id: ActorId = ActorId::from_serial(unsafe { NonZeroU64::new_unchecked(serial) });

    let mut guard: RwLockWriteGuard<'_, HashMap<ActorId, Arc<ActorCell>>> = ACTORS.write();

    guard.insert(id, Arc::new(ActorCell::new(id)));

    drop(guard);

    tracing::trace!(actor = %id, "actor registered");

    id
  }

  /// Removes the actor from the registry and sweeps its owned tables.
  ///
  /// Idempotent: terminating an already-dead actor is a no-op.
  pub(crate) fn terminate(id: ActorId) -> bool {
    let mut guard: RwLockWriteGuard<'_, HashMap<ActorId, Arc<ActorCell>>> = ACTORS.write();
    let removed: bool = guard.remove(&id).is_some();

    drop(guard);

    if removed {
      tracing::trace!(actor = %id, "actor terminated");

      crate::ops::sweep_owned(id);
    }

    removed
  }

  /// Returns `true` if the actor is currently registered.
  ///
  /// The result may be stale immediately after returning due to concurrent
  /// termination.
  #[inline]
  pub(crate) fn alive(id: ActorId) -> bool {
    ACTORS.read().contains_key(&id)
  }

  /// Returns the cell for a live actor.
  #[inline]
  pub(crate) fn resolve(id: ActorId) -> Option<Arc<ActorCell>> {
    let guard: RwLockReadGuard<'_, HashMap<ActorId, Arc<ActorCell>>> = ACTORS.read();

    guard.get(&id).cloned()
  }

  /// Delivers a transfer signal to the target actor's inbox.
  ///
  /// # Errors
  ///
  /// Returns [`TableError::RecipientNotAlive`] if the target is not a live
  /// actor.
  pub(crate) fn deliver(target: ActorId, signal: TransferSignal) -> Result<(), TableError> {
    let Some(cell) = Self::resolve(target) else {
      return Err(TableError::RecipientNotAlive);
    };

    tracing::trace!(
      actor = %target,
      table = %signal.table,
      from = %signal.from,
      kind = ?signal.kind,
      "transfer delivered",
    );

    // The receiver lives as long as the cell, so a send cannot fail while
    // the cell is still reachable through the registry.
    cell.send.send(signal).map_err(|_| TableError::RecipientNotAlive)
  }
}

// -----------------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------------
