//! Domain logic shared by the DataBridge API server and operations tool.
//!
//! Everything here is pure: no I/O, no shared state. The API crate wires
//! these types into HTTP handlers; the ops crate renders the deployment
//! descriptors to disk.

pub mod deploy;
pub mod error;
pub mod pagination;
pub mod routing;
pub mod status;
pub mod types;
pub mod validation;
