/// Business logic layer
pub mod posts;
pub mod schedule;

pub use posts::{PostCreation, PostService};
