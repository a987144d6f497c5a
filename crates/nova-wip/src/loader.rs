use std::{sync::Arc, time::Duration};

use async_trait::async_trait;

use crate::{
    dispatch::ValueBuilder,
    error::{WipError, WipResult},
    names::{NameRef, PropertyNameScope},
    protocol::{ObjectId, RemoteProperties, RemoteValueRecord},
    single_flight::{FlightState, SingleFlight},
    variable::Variable,
};

/// Fetches the property list of a remote object.
///
/// Implemented by the session layer on top of `Runtime.getProperties`. It must
/// complete each call exactly once and never with a partial result; it is
/// called concurrently for different objects. The value model applies no
/// deadline of its own, so a call that never completes stalls every caller
/// waiting on that object. Wrap the source in [`TimeoutPropertySource`] to
/// bound that.
#[async_trait]
pub trait PropertySource: Send + Sync {
    async fn load_properties(
        &self,
        object_id: &ObjectId,
        scope: &PropertyNameScope,
    ) -> WipResult<RemoteProperties>;
}

#[async_trait]
impl<S: PropertySource + ?Sized> PropertySource for Arc<S> {
    async fn load_properties(
        &self,
        object_id: &ObjectId,
        scope: &PropertyNameScope,
    ) -> WipResult<RemoteProperties> {
        (**self).load_properties(object_id, scope).await
    }
}

/// Applies a deadline to every call of the wrapped source.
pub struct TimeoutPropertySource<S> {
    inner: S,
    timeout: Duration,
}

impl<S> TimeoutPropertySource<S> {
    pub fn new(inner: S, timeout: Duration) -> Self {
        Self { inner, timeout }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

#[async_trait]
impl<S: PropertySource> PropertySource for TimeoutPropertySource<S> {
    async fn load_properties(
        &self,
        object_id: &ObjectId,
        scope: &PropertyNameScope,
    ) -> WipResult<RemoteProperties> {
        match tokio::time::timeout(self.timeout, self.inner.load_properties(object_id, scope)).await
        {
            Ok(result) => result,
            Err(_elapsed) => {
                tracing::warn!(
                    target = "nova.wip",
                    object_id = %object_id,
                    timeout = ?self.timeout,
                    "remote object property load timed out"
                );
                Err(WipError::Timeout {
                    object_id: object_id.clone(),
                    timeout: self.timeout,
                })
            }
        }
    }
}

/// Point-in-time snapshot of an object's properties.
#[derive(Clone, Debug, Default)]
pub struct ObjectProperties {
    properties: Vec<Variable>,
    internal_properties: Vec<Variable>,
}

impl ObjectProperties {
    pub fn new(properties: Vec<Variable>, internal_properties: Vec<Variable>) -> Self {
        Self {
            properties,
            internal_properties,
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn properties(&self) -> &[Variable] {
        &self.properties
    }

    pub fn internal_properties(&self) -> &[Variable] {
        &self.internal_properties
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty() && self.internal_properties.is_empty()
    }

    /// Regular property with the given short name.
    pub fn find(&self, name: &str) -> Option<&Variable> {
        self.properties.iter().find(|var| var.short_name() == name)
    }
}

/// Lazily loads, and then remembers, the properties of one object value.
pub struct PropertyLoader {
    builder: ValueBuilder,
    object_id: Option<ObjectId>,
    name: NameRef,
    snapshot: SingleFlight<ObjectProperties>,
}

impl PropertyLoader {
    pub(crate) fn new(builder: ValueBuilder, record: &RemoteValueRecord, name: NameRef) -> Self {
        Self::with_missing_id_warning(builder, record, name, true)
    }

    /// Loader for a value whose type tag was not recognized. The tag has
    /// already been reported, so a missing object id is not logged again.
    pub(crate) fn for_unknown_type(
        builder: ValueBuilder,
        record: &RemoteValueRecord,
        name: NameRef,
    ) -> Self {
        Self::with_missing_id_warning(builder, record, name, false)
    }

    fn with_missing_id_warning(
        builder: ValueBuilder,
        record: &RemoteValueRecord,
        name: NameRef,
        warn_missing_id: bool,
    ) -> Self {
        let snapshot = match &record.object_id {
            Some(_) if record.has_children() => SingleFlight::new(),
            Some(_) => SingleFlight::resolved(ObjectProperties::empty()),
            None => {
                if warn_missing_id {
                    tracing::warn!(
                        target = "nova.wip",
                        remote_type = %record.remote_type,
                        name = name.short_name(),
                        "object value has no object id; treating it as having no properties"
                    );
                }
                SingleFlight::resolved(ObjectProperties::empty())
            }
        };

        Self {
            builder,
            object_id: record.object_id.clone(),
            name,
            snapshot,
        }
    }

    /// The property snapshot, fetching it on first use.
    ///
    /// Concurrent callers share a single fetch. Once resolved, the same
    /// snapshot is returned forever.
    pub async fn properties(&self) -> WipResult<Arc<ObjectProperties>> {
        self.snapshot.get_or_try_init(|| self.fetch()).await
    }

    /// The snapshot if it is already resolved; never triggers a fetch.
    pub fn try_properties(&self) -> Option<Arc<ObjectProperties>> {
        self.snapshot.get()
    }

    pub fn state(&self) -> FlightState {
        self.snapshot.state()
    }

    async fn fetch(&self) -> WipResult<ObjectProperties> {
        let Some(object_id) = &self.object_id else {
            return Ok(ObjectProperties::empty());
        };

        let scope = PropertyNameScope::new(Arc::clone(&self.name));
        tracing::debug!(target = "nova.wip", object_id = %object_id, "loading remote object properties");

        let raw = self
            .builder
            .source()
            .load_properties(object_id, &scope)
            .await
            .inspect_err(|err| {
                tracing::debug!(target = "nova.wip", object_id = %object_id, error = %err, "property load failed");
            })?;

        let snapshot = self.builder.build_properties(&scope, raw);
        tracing::debug!(
            target = "nova.wip",
            object_id = %object_id,
            properties = snapshot.properties().len(),
            internal_properties = snapshot.internal_properties().len(),
            "loaded remote object properties"
        );
        Ok(snapshot)
    }
}

impl std::fmt::Debug for PropertyLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PropertyLoader")
            .field("object_id", &self.object_id)
            .field("state", &self.state())
            .finish()
    }
}
