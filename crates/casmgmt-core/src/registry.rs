use crate::RegisteredService;
use crate::errors::RegistryError;

/// Storage contract for registered services.
///
/// Implementations own their locking; every method takes `&self` so a store
/// can be shared behind an `Arc` across request handlers.
pub trait ServicesManager: Send + Sync {
    /// Inserts or replaces a service. An unassigned id is allocated by the store.
    fn save(&self, service: RegisteredService) -> Result<RegisteredService, RegistryError>;

    /// Removes the service and returns what was stored.
    fn delete(&self, id: i64) -> Result<RegisteredService, RegistryError>;

    fn find_by_id(&self, id: i64) -> Result<RegisteredService, RegistryError>;

    /// All services, sorted by evaluation order.
    fn all_services(&self) -> Result<Vec<RegisteredService>, RegistryError>;

    /// Deletes `id` unless its pattern is exactly `protected_pattern`, the
    /// pattern of the service that guards the management application.
    fn delete_unprotected(&self, id: i64, protected_pattern: &str) -> Result<RegisteredService, RegistryError> {
        let target = self.find_by_id(id)?;
        if target.service_id == protected_pattern {
            return Err(RegistryError::ProtectedService(target.id));
        }
        self.delete(target.id)
    }

    /// First service, in evaluation order, whose pattern matches `url`.
    fn find_by_url(&self, url: &str) -> Result<Option<RegisteredService>, RegistryError> {
        Ok(self.all_services()?.into_iter().find(|svc| svc.matches(url)))
    }

    /// Loads many services at once, typically from a fixture file.
    fn load(&self, services: Vec<RegisteredService>) -> Result<usize, RegistryError> {
        let count = services.len();
        for service in services {
            self.save(service)?;
        }
        Ok(count)
    }
}
