//! Persistence layer: the generic JSON document store and the
//! category-partitioned long-term store built on top of it.

pub mod content;
pub mod long_term;

pub use content::ContentStore;
pub use long_term::LongTermStore;
