pub mod store;

pub use store::{AddOutcome, TaskStore};
