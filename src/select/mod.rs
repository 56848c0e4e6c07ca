//! Pattern matching: match patterns, guarded match specs, and cursors.

mod cursor;
mod pattern;
mod spec;

pub(crate) use self::cursor::Inner;
pub(crate) use self::cursor::Query;
pub(crate) use self::cursor::ResumePoint;
pub(crate) use self::pattern::CompiledPattern;
pub(crate) use self::spec::CompiledSpec;

pub use self::cursor::Continuation;
pub use self::pattern::Pat;
pub use self::pattern::Pattern;
pub use self::spec::Guard;
pub use self::spec::MatchSpec;
pub use self::spec::Operand;

/// Captured variable values of one match, in variable-number order.
pub type Bindings = Vec<crate::lang::Term>;
