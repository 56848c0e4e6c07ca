//! Public table facades.
//!
//! [`Table`] exposes the full untyped contract; [`Set`], [`Bag`], and
//! [`KeyValueSet`] constrain creation options and record shapes per table
//! kind and delegate to it.

mod bag;
mod kv;
mod set;
mod table;

pub use self::bag::Bag;
pub use self::bag::BagOptions;
pub use self::kv::KeyValueOptions;
pub use self::kv::KeyValueSet;
pub use self::set::Set;
pub use self::set::SetOptions;
pub use self::table::Table;
pub use self::table::Transfer;
