pub mod memory;

pub use memory::InMemoryResultStore;
