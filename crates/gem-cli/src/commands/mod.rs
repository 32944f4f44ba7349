//! Command implementations

mod generate;
mod sync;

pub use generate::run_generate;
pub use sync::run_sync;
