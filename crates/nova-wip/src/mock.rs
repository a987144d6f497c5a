//! Deterministic, in-memory [`PropertySource`] test double.

use std::collections::{BTreeSet, HashMap};

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::sync::watch;

use crate::{
    error::{WipError, WipResult},
    loader::PropertySource,
    names::{qualified_name, PropertyNameScope},
    protocol::{ObjectId, RemoteProperties},
};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MockCall {
    pub object_id: ObjectId,
    /// Fully-qualified name of the object whose properties were requested.
    pub scope: String,
}

/// Serves canned property lists and records every call.
///
/// [`MockPropertySource::pause`] holds all calls in flight until
/// [`MockPropertySource::resume`]; objects marked with
/// [`MockPropertySource::stall`] never complete at all.
pub struct MockPropertySource {
    objects: Mutex<HashMap<ObjectId, RemoteProperties>>,
    stalled: Mutex<BTreeSet<ObjectId>>,
    calls: Mutex<Vec<MockCall>>,
    gate: watch::Sender<bool>,
}

impl MockPropertySource {
    pub fn new() -> Self {
        let (gate, _) = watch::channel(true);
        Self {
            objects: Mutex::new(HashMap::new()),
            stalled: Mutex::new(BTreeSet::new()),
            calls: Mutex::new(Vec::new()),
            gate,
        }
    }

    pub fn insert(&self, object_id: impl Into<ObjectId>, properties: RemoteProperties) {
        self.objects.lock().insert(object_id.into(), properties);
    }

    /// Like [`MockPropertySource::insert`], decoding a `Runtime.getProperties`
    /// JSON result.
    pub fn insert_json(
        &self,
        object_id: impl Into<ObjectId>,
        json: &str,
    ) -> Result<(), serde_json::Error> {
        let properties = serde_json::from_str(json)?;
        self.insert(object_id, properties);
        Ok(())
    }

    pub fn stall(&self, object_id: impl Into<ObjectId>) {
        self.stalled.lock().insert(object_id.into());
    }

    /// Lets later calls for `object_id` complete again. Calls already stalled
    /// stay stalled.
    pub fn unstall(&self, object_id: impl Into<ObjectId>) {
        self.stalled.lock().remove(&object_id.into());
    }

    pub fn pause(&self) {
        self.gate.send_replace(false);
    }

    pub fn resume(&self) {
        self.gate.send_replace(true);
    }

    pub fn calls(&self) -> Vec<MockCall> {
        self.calls.lock().clone()
    }

    pub fn total_calls(&self) -> usize {
        self.calls.lock().len()
    }

    pub fn calls_for(&self, object_id: &str) -> usize {
        self.calls
            .lock()
            .iter()
            .filter(|call| call.object_id.as_str() == object_id)
            .count()
    }
}

impl Default for MockPropertySource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PropertySource for MockPropertySource {
    async fn load_properties(
        &self,
        object_id: &ObjectId,
        scope: &PropertyNameScope,
    ) -> WipResult<RemoteProperties> {
        self.calls.lock().push(MockCall {
            object_id: object_id.clone(),
            scope: qualified_name(&**scope.parent()),
        });

        let mut gate = self.gate.subscribe();
        // The sender lives in `self`, so the channel cannot close underneath us.
        let _ = gate.wait_for(|open| *open).await;

        let stalled = self.stalled.lock().contains(object_id);
        if stalled {
            std::future::pending::<()>().await;
        }

        self.objects
            .lock()
            .get(object_id)
            .cloned()
            .ok_or_else(|| WipError::Fetch {
                object_id: object_id.clone(),
                message: "no such object in mock".to_string(),
            })
    }
}
