pub mod client;
pub mod file;
pub mod record;
pub mod transaction;
