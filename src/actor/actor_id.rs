use std::fmt::Debug;
use std::fmt::Display;
use std::fmt::Formatter;
use std::fmt::Result as FmtResult;
use std::num::NonZeroU64;

/// Identity of a registered actor.
///
/// Identities are unique for the lifetime of the process and never reused;
/// liveness is a separate property tracked by the actor registry.
#[derive(Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
#[repr(transparent)]
pub struct ActorId {
  serial: NonZeroU64,
}

impl ActorId {
  #[inline]
  pub(crate) const fn from_serial(serial: NonZeroU64) -> Self {
    Self { serial }
  }

  /// Returns the numeric serial behind this identity.
  #[inline]
  pub const fn into_serial(self) -> u64 {
    self.serial.get()
  }
}

impl Debug for ActorId {
  fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
    Display::fmt(self, f)
  }
}

impl Display for ActorId {
  fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
    write!(f, "#Actor<{}>", self.serial)
  }
}
