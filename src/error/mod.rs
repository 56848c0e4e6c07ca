//! Exception handling and error types for the table engine.
//!
//! Errors travel two ways:
//!
//! 1. **As values**: every operation in the crate returns a
//!    [`TableError`] through its `Result`, propagated with `?`.
//! 2. **As exceptions**: the `*_or_raise` facade variants convert any
//!    [`TableError`] into a fatal panic via [`TableError::raise`],
//!    carrying the structured reason in the message. The core itself is
//!    exception-free.
//!
//! Exceptions carry three pieces of information:
//!
//! 1. **Class**: The severity level ([`Error`])
//! 2. **Group**: The error category ([`BadArg`], [`SysCap`], [`SysInv`])
//! 3. **Description**: A human-readable error message
//!
//! # Raising Exceptions
//!
//! Use the [`raise!`] macro to construct and panic with an exception:
//!
//! ```
//! use tabit::raise;
//!
//! fn validate_key_pos(value: usize) {
//!   if value < 1 {
//!     raise!(Error, BadArg, "key position must be at least 1");
//!   }
//! }
//! ```
//!
//! [`Error`]: ExceptionClass::Error
//! [`BadArg`]: ExceptionGroup::BadArg
//! [`SysCap`]: ExceptionGroup::SysCap
//! [`SysInv`]: ExceptionGroup::SysInv
//!
//! [`raise!`]: crate::raise!

mod exception;
mod exception_class;
mod exception_group;
mod table_error;

pub use self::exception::Exception;
pub use self::exception_class::ExceptionClass;
pub use self::exception_group::ExceptionGroup;
pub use self::table_error::TableError;

// -----------------------------------------------------------------------------
// raise!
// -----------------------------------------------------------------------------

/// Raises an exception with the specified class, group, and message.
///
/// This macro constructs an [`Exception`] and immediately panics, allowing
/// supervising callers to handle the error.
///
/// # Examples
///
/// ```
/// # use tabit::raise;
/// fn intern(name: &str) {
///   if name.is_empty() {
///     raise!(Error, BadArg, "name cannot be empty");
///   }
/// }
/// ```
#[macro_export]
macro_rules! raise {
  ($class:ident, $group:ident, $error:expr $(,)?) => {
    ::std::panic!(
      "{}",
      $crate::error::Exception::new(
        $crate::error::ExceptionClass::$class,
        $crate::error::ExceptionGroup::$group,
        $error,
      ),
    )
  };
}

// -----------------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------------
