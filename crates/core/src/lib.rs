//! Core domain logic for Pitstop attachments.
//!
//! This crate contains the attachment pipeline with ZERO web or database
//! dependencies. Persistence is reached through the `AttachmentRepository`
//! trait and bytes through the `ObjectStore` trait.
//!
//! # Modules
//!
//! - `attachment` - Attachment records, target kinds, and the upload/fetch/delete pipeline
//! - `storage` - Object storage on top of Apache OpenDAL

pub mod attachment;
pub mod storage;
