//! Service layer: progress scanner, writer loop, and the plugin adapter.

pub mod plugin;
pub mod scanner;
pub mod writer;

pub use plugin::TxIndexPlugin;
pub use scanner::Scanner;
pub use writer::{WriterHandle, WriterState};
