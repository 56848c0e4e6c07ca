use tokio::task::futures::TaskLocalFuture;

use crate::actor::ActorId;
use crate::actor::registry::ActorRegistry;
use crate::raise;

// -----------------------------------------------------------------------------
// @data - Task Globals
// -----------------------------------------------------------------------------

tokio::task_local! {
  static CONTEXT: ActorId;
}

// -----------------------------------------------------------------------------
// Exit Sweep
// -----------------------------------------------------------------------------

/// Guard tying actor termination to task exit.
///
/// Dropping the guard terminates the actor and runs the owned-table sweep,
/// even when the scoped future unwinds.
struct ExitSweep {
  id: ActorId,
}

impl ExitSweep {
  #[inline]
  const fn new(id: ActorId) -> Self {
    Self { id }
  }
}

impl Drop for ExitSweep {
  fn drop(&mut self) {
    let _ignore: bool = ActorRegistry::terminate(self.id);
  }
}

// -----------------------------------------------------------------------------
// @api - Actor
// -----------------------------------------------------------------------------

/// Actor identity API.
///
/// Every table operation executes on behalf of a calling actor; the calling
/// identity is a task-local installed by [`Actor::spawn`] or [`Actor::run`].
/// Operations invoked outside an actor scope raise a `SysInv` exception.
pub struct Actor;

impl Actor {
  /// Accesses the current task-local actor identity, if inside a scope.
  #[inline]
  pub(crate) fn try_this() -> Option<ActorId> {
    CONTEXT.try_with(|context| *context).ok()
  }

  /// Returns the identity of the calling actor.
  ///
  /// # Panics
  ///
  /// Raises a `SysInv` exception when called outside an actor scope.
  pub fn this() -> ActorId {
    match Self::try_this() {
      Some(id) => id,
      None => raise!(Error, SysInv, "no actor context"),
    }
  }

  /// Returns `true` if the actor is currently registered and live.
  #[inline]
  pub fn alive(id: ActorId) -> bool {
    ActorRegistry::alive(id)
  }

  /// Spawns a new actor to handle `future` and returns its identity.
  ///
  /// The actor stays live until the future completes (or unwinds), at which
  /// point its owned tables pass to their heirs or are destroyed.
  ///
  /// Must be called within a tokio runtime.
  pub fn spawn<F>(future: F) -> ActorId
  where
    F: Future<Output = ()> + Send + 'static,
  {
    let id: ActorId = ActorRegistry::register();

    let scoped: TaskLocalFuture<ActorId, _> = CONTEXT.scope(id, async move {
      let _sweep: ExitSweep = ExitSweep::new(id);

      future.await;
    });

    drop(tokio::spawn(scoped));

    id
  }

  /// Runs `future` with the current task registered as a fresh actor.
  ///
  /// This is the entry point for mains and tests; the actor terminates when
  /// the future resolves.
  pub async fn run<F>(future: F) -> F::Output
  where
    F: Future,
  {
    let id: ActorId = ActorRegistry::register();

    CONTEXT
      .scope(id, async move {
        let _sweep: ExitSweep = ExitSweep::new(id);

        future.await
      })
      .await
  }

  /// Terminates the calling actor's registration early.
  ///
  /// Owned tables pass to their heirs or are destroyed immediately; the
  /// surrounding scope's exit sweep then finds nothing left to do.
  pub fn exit() {
    let _ignore: bool = ActorRegistry::terminate(Self::this());
  }
}

// -----------------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_this_outside_scope_raises() {
    assert!(std::panic::catch_unwind(Actor::this).is_err());
  }

  #[tokio::test]
  async fn test_run_installs_context() {
    assert!(Actor::try_this().is_none());

    Actor::run(async {
      assert!(Actor::try_this().is_some());
    })
    .await;
  }

  #[tokio::test]
  async fn test_run_terminates_on_exit() {
    let id: ActorId = Actor::run(async { Actor::this() }).await;

    assert!(!Actor::alive(id));
  }

  #[tokio::test]
  async fn test_nested_scopes_are_distinct() {
    let outer: (ActorId, ActorId) = Actor::run(async {
      let this: ActorId = Actor::this();
      let nested: ActorId = Actor::run(async { Actor::this() }).await;

      (this, nested)
    })
    .await;

    assert_ne!(outer.0, outer.1);
  }

  #[tokio::test]
  async fn test_alive_inside_scope() {
    Actor::run(async {
      assert!(Actor::alive(Actor::this()));
    })
    .await;
  }
}
