//! Core table engine: layouts, storage, cells, and registries.

mod access;
mod cell;
mod layout;
mod options;
mod registry;
mod status;
mod storage;
mod table_ref;

pub(crate) use self::access::check_read;
pub(crate) use self::access::check_write;
pub(crate) use self::cell::Heir;
pub(crate) use self::cell::TableCell;
pub(crate) use self::cell::TableExternal;
pub(crate) use self::registry::TableRegistry;
pub(crate) use self::storage::ScanPos;
pub(crate) use self::storage::Storage;

pub use self::cell::TableInfo;
pub use self::layout::Layout;
pub use self::options::TableOptions;
pub use self::status::TableFlags;
pub use self::status::Visibility;
pub use self::table_ref::TableId;
pub use self::table_ref::TableRef;
