//! # txindex Test Suite
//!
//! Unified test crate for the indexing pipeline.
//!
//! ## Structure
//!
//! ```text
//! tests/src/integration/
//! ├── pipeline.rs      # end-to-end queue → writer → store properties
//! ├── persistence.rs   # RocksDB durability and restart behavior
//! └── shutdown.rs      # stop signal, backlog drain, failure escalation
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p txindex-tests
//! cargo test -p txindex-tests integration::pipeline
//! ```

#![allow(dead_code)]
