//! Object storage for attachment bytes using Apache OpenDAL.
//!
//! This module provides vendor-agnostic object storage with support for:
//! - S3-compatible: AWS S3, Cloudflare R2, MinIO, DigitalOcean Spaces
//! - Local filesystem (development only)
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │               Apache OpenDAL                 │
//! │            (Unified Storage API)             │
//! ├──────────────────────────────────────────────┤
//! │ op.write("key", data)  │ op.delete("key")    │
//! │ op.stat("key")         │                     │
//! └──────────────────────────────────────────────┘
//! ```

mod config;
mod error;
mod service;

pub use config::{StorageConfig, StorageProvider};
pub use error::StorageError;
pub use service::{ObjectRemoval, ObjectStore, StorageService};
