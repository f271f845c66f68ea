//! In-memory implementations of the resolver's capabilities, for tests in
//! this and downstream crates.

mod memory;
mod upstream;

pub use self::memory::MemoryStore;
pub use self::upstream::MockUpstream;
