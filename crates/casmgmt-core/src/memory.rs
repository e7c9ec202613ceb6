use std::collections::BTreeMap;
use std::sync::RwLock;

use crate::errors::RegistryError;
use crate::registry::ServicesManager;
use crate::service::{RegisteredService, sort_by_evaluation_order};

/// Volatile store, useful for tests and for running without a database.
#[derive(Debug, Default)]
pub struct InMemoryServicesManager {
    services: RwLock<BTreeMap<i64, RegisteredService>>,
}

impl InMemoryServicesManager {
    pub fn new() -> Self {
        Self::default()
    }

    fn poisoned() -> RegistryError {
        RegistryError::Storage("registry lock poisoned".to_string())
    }
}

impl ServicesManager for InMemoryServicesManager {
    fn save(&self, mut service: RegisteredService) -> Result<RegisteredService, RegistryError> {
        let mut services = self.services.write().map_err(|_| Self::poisoned())?;
        if !service.is_assigned() {
            service.id = match services.keys().next_back() {
                None => 0,
                Some(max) => max
                    .checked_add(1)
                    .ok_or_else(|| RegistryError::OutOfRange(format!("no id after {}", max)))?,
            };
        }
        services.insert(service.id, service.clone());
        tracing::debug!(id = service.id, name = %service.name, "service saved");
        Ok(service)
    }

    fn delete(&self, id: i64) -> Result<RegisteredService, RegistryError> {
        let mut services = self.services.write().map_err(|_| Self::poisoned())?;
        services.remove(&id).ok_or(RegistryError::NotFound(id))
    }

    fn find_by_id(&self, id: i64) -> Result<RegisteredService, RegistryError> {
        let services = self.services.read().map_err(|_| Self::poisoned())?;
        services.get(&id).cloned().ok_or(RegistryError::NotFound(id))
    }

    fn all_services(&self) -> Result<Vec<RegisteredService>, RegistryError> {
        let services = self.services.read().map_err(|_| Self::poisoned())?;
        let mut all: Vec<RegisteredService> = services.values().cloned().collect();
        sort_by_evaluation_order(&mut all);
        Ok(all)
    }
}
