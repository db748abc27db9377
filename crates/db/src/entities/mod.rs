//! `SeaORM` entity definitions.
//!
//! `profiles`, `garages`, `vehicles` and `maintenance_logs` are owned by the
//! wider product; this service only reads them to resolve link targets.

pub mod attachment_links;
pub mod attachments;
pub mod garages;
pub mod maintenance_logs;
pub mod profiles;
pub mod vehicles;
