//! Account lookup by phone number

mod memory;

pub use memory::MemoryUserDirectory;
