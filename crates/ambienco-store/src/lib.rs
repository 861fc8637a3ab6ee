//! Key-value storage for Ambienco records.
//!
//! Every resource (products, forum posts, contacts, chat transcripts) is a
//! JSON value stored under a `kind:id` key, so listing a resource is a
//! prefix scan.
//!
//! # Main types
//!
//! - [`KvStore`]: Async trait implemented by every backend.
//! - [`KvStoreExt`]: Typed helpers on top of any [`KvStore`], including the
//!   atomic read-modify-write `update_as`.
//! - [`InMemoryKvStore`]: Ordered map behind a lock, for tests and demos.
//! - [`FileKvStore`]: One JSON file per key on disk.

/// Store trait and typed extension methods.
pub mod store;
/// File-backed store.
pub mod file;
/// In-memory store.
pub mod memory;

pub use file::FileKvStore;
pub use memory::InMemoryKvStore;
pub use store::{KvStore, KvStoreExt, UpdateFn};
