//! The demo state service.
//!
//! [`DemoService`] owns the sample store, the number list and a handle to the
//! visit counter. It is built once at startup, wrapped in an `Arc`, and
//! shared by every handler.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tracing::warn;

use crate::counter::CounterStore;
use crate::error::ServiceError;
use crate::store::{IntegerSequence, KeyValueStore};

/// Upper bound on a single counter round-trip unless configured otherwise.
pub const DEFAULT_COUNTER_TIMEOUT: Duration = Duration::from_secs(2);

pub struct DemoService {
    samples: KeyValueStore,
    numbers: IntegerSequence,
    counter: Arc<dyn CounterStore>,
    counter_timeout: Duration,
}

impl DemoService {
    pub fn new(counter: Arc<dyn CounterStore>) -> Self {
        Self {
            samples: KeyValueStore::new(),
            numbers: IntegerSequence::new(),
            counter,
            counter_timeout: DEFAULT_COUNTER_TIMEOUT,
        }
    }

    pub fn with_counter_timeout(mut self, timeout: Duration) -> Self {
        self.counter_timeout = timeout;
        self
    }

    pub fn samples(&self) -> &KeyValueStore {
        &self.samples
    }

    pub fn numbers(&self) -> &IntegerSequence {
        &self.numbers
    }

    pub fn sample_all(&self) -> HashMap<String, String> {
        self.samples.get_all()
    }

    pub fn sample(&self, key: &str) -> Result<String, ServiceError> {
        self.samples.get(key)
    }

    pub fn add_sample(&self, key: &str, value: &str) -> String {
        self.samples.put(key, value)
    }

    pub fn remove_sample(&self, key: &str) -> Result<String, ServiceError> {
        self.samples.remove(key)
    }

    pub fn list(&self) -> Vec<i64> {
        self.numbers.get_all()
    }

    pub fn add_to_list(&self, value: i64) -> Vec<i64> {
        self.numbers.append(value)
    }

    /// Increments the external visit counter and returns the new count.
    ///
    /// Bounded by the counter timeout; on expiry the call is abandoned and
    /// reported as [`ServiceError::BackendUnavailable`].
    pub async fn visit(&self) -> Result<i64, ServiceError> {
        match tokio::time::timeout(self.counter_timeout, self.counter.increment_and_get()).await {
            Ok(result) => result,
            Err(_) => {
                warn!(timeout_ms = self.counter_timeout.as_millis() as u64, "counter timed out");
                Err(ServiceError::BackendUnavailable(format!(
                    "counter did not answer within {} ms",
                    self.counter_timeout.as_millis()
                )))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;

    use super::*;
    use crate::counter::MemoryCounter;

    struct Down;

    #[async_trait]
    impl CounterStore for Down {
        async fn increment_and_get(&self) -> Result<i64, ServiceError> {
            Err(ServiceError::BackendUnavailable("connection refused".into()))
        }
    }

    struct Stuck;

    #[async_trait]
    impl CounterStore for Stuck {
        async fn increment_and_get(&self) -> Result<i64, ServiceError> {
            std::future::pending().await
        }
    }

    #[tokio::test]
    async fn visit_counts_from_one() {
        let svc = DemoService::new(Arc::new(MemoryCounter::new()));
        assert_eq!(svc.visit().await, Ok(1));
        assert_eq!(svc.visit().await, Ok(2));
    }

    #[tokio::test]
    async fn visit_propagates_backend_failure() {
        let svc = DemoService::new(Arc::new(Down));
        assert_eq!(
            svc.visit().await,
            Err(ServiceError::BackendUnavailable("connection refused".into()))
        );
    }

    #[tokio::test(start_paused = true)]
    async fn visit_times_out_instead_of_hanging() {
        let svc = DemoService::new(Arc::new(Stuck)).with_counter_timeout(Duration::from_millis(50));
        assert!(matches!(svc.visit().await, Err(ServiceError::BackendUnavailable(_))));
    }

    #[test]
    fn sample_and_list_state_do_not_mix() {
        let svc = DemoService::new(Arc::new(MemoryCounter::new()));
        svc.add_sample("k", "v");
        svc.add_to_list(4);
        assert_eq!(svc.sample("k"), Ok("v".to_owned()));
        assert_eq!(svc.remove_sample("k"), Ok("v".to_owned()));
        assert_eq!(svc.list(), vec![4]);
        assert!(svc.samples().is_empty());
    }
}
