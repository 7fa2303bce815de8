//! Ports layer: inbound lifecycle hooks and outbound collaborator interfaces.

pub mod inbound;
pub mod outbound;

pub use inbound::{AppliedBlock, PluginLifecycle};
pub use outbound::{ChainIndex, StoreIter, TxLocationStore};
