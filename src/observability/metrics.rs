//! Validation counters
//!
//! Counters only, monotonic, reset on process start. Atomics with
//! `Relaxed` ordering; exact totals are only read after the work is done.

use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Debug, Default)]
pub struct MetricsRegistry {
    /// Inputs accepted by a schema
    validations_passed: AtomicU64,
    /// Inputs rejected by a schema
    validations_rejected: AtomicU64,
    /// Inputs rejected by depth or size limits before validation
    limit_rejections: AtomicU64,
    /// Schema documents compiled and registered
    schemas_loaded: AtomicU64,
}

impl MetricsRegistry {
    /// Create a new metrics registry with all counters at zero
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment_passed(&self) {
        self.validations_passed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_rejected(&self) {
        self.validations_rejected.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_limit_rejections(&self) {
        self.limit_rejections.fetch_add(1, Ordering::Relaxed);
    }

    pub fn add_schemas_loaded(&self, count: u64) {
        self.schemas_loaded.fetch_add(count, Ordering::Relaxed);
    }

    /// Get all metrics as a snapshot
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            validations_passed: self.validations_passed.load(Ordering::Relaxed),
            validations_rejected: self.validations_rejected.load(Ordering::Relaxed),
            limit_rejections: self.limit_rejections.load(Ordering::Relaxed),
            schemas_loaded: self.schemas_loaded.load(Ordering::Relaxed),
        }
    }

    /// Current counters as a JSON object
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self.snapshot()).unwrap_or(serde_json::Value::Null)
    }
}

/// A point-in-time snapshot of all metrics
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    pub validations_passed: u64,
    pub validations_rejected: u64,
    pub limit_rejections: u64,
    pub schemas_loaded: u64,
}

impl MetricsSnapshot {
    /// Total validation attempts, including limit rejections
    pub fn total_validations(&self) -> u64 {
        self.validations_passed + self.validations_rejected + self.limit_rejections
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_registry_has_zero_values() {
        let snapshot = MetricsRegistry::new().snapshot();
        assert_eq!(snapshot.validations_passed, 0);
        assert_eq!(snapshot.validations_rejected, 0);
        assert_eq!(snapshot.limit_rejections, 0);
        assert_eq!(snapshot.schemas_loaded, 0);
        assert_eq!(snapshot.total_validations(), 0);
    }

    #[test]
    fn test_increment_counters() {
        let registry = MetricsRegistry::new();
        registry.increment_passed();
        registry.increment_passed();
        registry.increment_rejected();
        registry.increment_limit_rejections();
        registry.add_schemas_loaded(3);

        let snapshot = registry.snapshot();
        assert_eq!(snapshot.validations_passed, 2);
        assert_eq!(snapshot.validations_rejected, 1);
        assert_eq!(snapshot.limit_rejections, 1);
        assert_eq!(snapshot.schemas_loaded, 3);
        assert_eq!(snapshot.total_validations(), 4);
    }

    #[test]
    fn test_to_json() {
        let registry = MetricsRegistry::new();
        registry.increment_rejected();
        let json = registry.to_json();
        assert_eq!(json["validations_rejected"], 1);
        assert_eq!(json["validations_passed"], 0);
    }

    #[test]
    fn test_thread_safety() {
        use std::sync::Arc;
        use std::thread;

        let registry = Arc::new(MetricsRegistry::new());
        let handles: Vec<_> = (0..10)
            .map(|_| {
                let reg = Arc::clone(&registry);
                thread::spawn(move || {
                    for _ in 0..100 {
                        reg.increment_passed();
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(registry.snapshot().validations_passed, 1000);
    }
}
