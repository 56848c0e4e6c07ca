//! Actor identity, liveness, and transfer inboxes.

mod actor_id;
mod api;
mod registry;

pub(crate) use self::registry::ActorCell;
pub(crate) use self::registry::ActorRegistry;
pub(crate) use self::registry::TransferKind;
pub(crate) use self::registry::TransferSignal;

pub use self::actor_id::ActorId;
pub use self::api::Actor;
