/// Storage layer for scheduler-service
///
/// All persistence goes through the [`ContentStore`] trait so handlers and
/// services never see a concrete backend. Every operation takes the owning
/// user's id; ownership scoping is enforced here, in one place, rather than
/// at each call site.
pub mod memory;
pub mod postgres;
pub mod store;

pub use memory::MemoryContentStore;
pub use postgres::PostgresContentStore;
pub use store::{ContentStore, StoreHandle};
