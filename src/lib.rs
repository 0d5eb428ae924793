// Re-export internal modules for integration tests and external crate use.
pub mod clone;
pub mod commands;
pub mod config;
pub mod git;
pub mod progress;
pub mod prompt;
pub mod sync;
pub mod templates;

#[cfg(test)]
mod testing;
