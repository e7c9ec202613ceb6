use std::fs;
use std::path::Path;

use casmgmt_core::{RegisteredService, ServicesManager};

use crate::DbError;

/// Reads a JSON array of services.
pub fn read_services(path: impl AsRef<Path>) -> Result<Vec<RegisteredService>, DbError> {
    let raw = fs::read_to_string(path.as_ref())?;
    let services = serde_json::from_str(&raw)?;
    Ok(services)
}

/// Seeds `store` from the JSON file at `path`, returning how many services were saved.
pub fn seed_from_file(store: &dyn ServicesManager, path: impl AsRef<Path>) -> Result<usize, DbError> {
    let path = path.as_ref();
    let services = read_services(path)?;
    let count = store.load(services)?;
    tracing::info!(path = %path.display(), count, "seeded registered services");
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DbRegistry;

    #[test]
    fn seeds_store_from_json_file() {
        let path = std::env::temp_dir().join(format!("casmgmt-fixture-{}.json", std::process::id()));
        fs::write(
            &path,
            r#"[
                {"id": 0, "name": "first", "serviceId": "https://first/**", "evaluationOrder": 1},
                {"id": 100, "name": "second", "serviceId": "^https://second/.*", "evaluationOrder": 0}
            ]"#,
        )
        .unwrap();

        let db = DbRegistry::new(":memory:").unwrap();
        let count = seed_from_file(&db, &path).unwrap();
        fs::remove_file(&path).ok();

        assert_eq!(count, 2);
        assert_eq!(db.find_by_id(100).unwrap().name, "second");
        assert_eq!(db.all_services().unwrap()[0].id, 100);
    }

    #[test]
    fn malformed_file_is_a_json_error() {
        let path = std::env::temp_dir().join(format!("casmgmt-bad-{}.json", std::process::id()));
        fs::write(&path, "{ not json").unwrap();
        let result = read_services(&path);
        fs::remove_file(&path).ok();
        assert!(matches!(result, Err(DbError::Json(_))));
    }
}
