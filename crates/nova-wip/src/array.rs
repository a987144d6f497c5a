use std::{
    collections::BTreeMap,
    fmt,
    sync::{Arc, OnceLock},
};

use crate::{
    error::WipResult,
    loader::ObjectProperties,
    names::is_all_digits,
    value::ObjectValue,
    variable::Variable,
};

/// Reported by [`ArrayProperties::length`] when the remote side did not give
/// a usable `length`. Callers should fall back to the sparse map's key range.
pub const UNKNOWN_ARRAY_LENGTH: i64 = -1;

/// Array view derived from one property snapshot.
#[derive(Clone, Debug)]
pub struct ArrayProperties {
    length: i64,
    elements: BTreeMap<u32, Variable>,
}

impl ArrayProperties {
    /// Projects the regular properties of `snapshot` onto an index map.
    ///
    /// All-digit names become indices (a later duplicate wins); `length` is
    /// read from the description of the property with that name.
    pub fn from_properties(snapshot: &ObjectProperties) -> Self {
        let mut elements = BTreeMap::new();
        let mut length_value = None;

        for variable in snapshot.properties() {
            let name = variable.short_name();
            if is_all_digits(name) {
                match name.parse::<u32>() {
                    Ok(index) => {
                        elements.insert(index, variable.clone());
                    }
                    Err(_) => {
                        tracing::debug!(target = "nova.wip", name, "array index out of range; skipping");
                    }
                }
            } else if name == "length" {
                length_value = Some(variable.value());
            }
        }

        let length = length_value
            .and_then(|value| value.value_string().parse::<u32>().ok())
            .map(i64::from)
            .unwrap_or(UNKNOWN_ARRAY_LENGTH);

        Self { length, elements }
    }

    /// The reported array length, or [`UNKNOWN_ARRAY_LENGTH`].
    pub fn length(&self) -> i64 {
        self.length
    }

    pub fn known_length(&self) -> Option<u64> {
        u64::try_from(self.length).ok()
    }

    pub fn get(&self, index: u32) -> Option<&Variable> {
        self.elements.get(&index)
    }

    pub fn sparse_map(&self) -> &BTreeMap<u32, Variable> {
        &self.elements
    }
}

/// A remote array: an object plus a lazily derived index view.
#[derive(Clone)]
pub struct ArrayValue {
    inner: Arc<ArrayInner>,
}

struct ArrayInner {
    object: ObjectValue,
    projection: OnceLock<Arc<ArrayProperties>>,
}

impl ArrayValue {
    pub(crate) fn new(object: ObjectValue) -> Self {
        Self {
            inner: Arc::new(ArrayInner {
                object,
                projection: OnceLock::new(),
            }),
        }
    }

    pub fn object(&self) -> &ObjectValue {
        &self.inner.object
    }

    /// The derived array view, loading properties first if necessary.
    ///
    /// Two callers racing here may both derive a view; only the first one
    /// stored is ever returned.
    pub async fn array_properties(&self) -> WipResult<Arc<ArrayProperties>> {
        if let Some(projection) = self.inner.projection.get() {
            return Ok(Arc::clone(projection));
        }

        let snapshot = self.inner.object.properties().await?;
        let derived = Arc::new(ArrayProperties::from_properties(&snapshot));
        Ok(Arc::clone(self.inner.projection.get_or_init(|| derived)))
    }

    pub async fn length(&self) -> WipResult<i64> {
        Ok(self.array_properties().await?.length())
    }

    /// Element at `index`, or `None` for a hole.
    pub async fn get(&self, index: u32) -> WipResult<Option<Variable>> {
        Ok(self.array_properties().await?.get(index).cloned())
    }

    pub async fn to_sparse_map(&self) -> WipResult<BTreeMap<u32, Variable>> {
        Ok(self.array_properties().await?.sparse_map().clone())
    }
}

impl fmt::Debug for ArrayValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArrayValue")
            .field("object", &self.inner.object)
            .field("length", &self.inner.projection.get().map(|p| p.length()))
            .finish()
    }
}
