pub mod service;
pub mod id;
pub mod registry;
pub mod memory;
pub mod errors;

pub use service::{RegisteredService, UNASSIGNED_ID, sort_by_evaluation_order};
pub use id::ServiceId;
pub use registry::ServicesManager;
pub use memory::InMemoryServicesManager;
pub use errors::RegistryError;
