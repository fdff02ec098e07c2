pub mod discovery;
pub mod service;
pub mod workspace;

pub use service::{Service, ServiceId};
pub use workspace::Workspace;
