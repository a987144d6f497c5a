use std::{fmt, sync::Arc};

use crate::{
    array::ArrayValue,
    dispatch::ValueBuilder,
    error::{UnsupportedOperation, WipError, WipResult},
    loader::{ObjectProperties, PropertyLoader},
    names::NameRef,
    protocol::{ObjectId, RemoteValueRecord},
    single_flight::FlightState,
    variable::Variable,
};

/// JavaScript-level type of a debugger value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ValueType {
    String,
    Boolean,
    Number,
    Null,
    Undefined,
    Object,
    Array,
    Function,
}

impl ValueType {
    pub fn is_primitive(self) -> bool {
        matches!(
            self,
            ValueType::String
                | ValueType::Boolean
                | ValueType::Number
                | ValueType::Null
                | ValueType::Undefined
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ValueType::String => "string",
            ValueType::Boolean => "boolean",
            ValueType::Number => "number",
            ValueType::Null => "null",
            ValueType::Undefined => "undefined",
            ValueType::Object => "object",
            ValueType::Array => "array",
            ValueType::Function => "function",
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A remote value as seen by the debugger.
///
/// Cloning is cheap and shares the underlying instance: clones observe the
/// same property snapshot.
#[derive(Clone, Debug)]
pub enum DebuggerValue {
    Primitive(PrimitiveValue),
    Object(ObjectValue),
    Array(ArrayValue),
    Function(FunctionValue),
}

impl DebuggerValue {
    pub fn value_type(&self) -> ValueType {
        match self {
            DebuggerValue::Primitive(value) => value.value_type(),
            DebuggerValue::Object(object) => object.value_type(),
            DebuggerValue::Array(array) => array.object().value_type(),
            DebuggerValue::Function(function) => function.object().value_type(),
        }
    }

    pub fn value_string(&self) -> &str {
        match self {
            DebuggerValue::Primitive(value) => value.description(),
            DebuggerValue::Object(object) => object.value_string(),
            DebuggerValue::Array(array) => array.object().value_string(),
            DebuggerValue::Function(function) => function.object().value_string(),
        }
    }

    /// The object view of any object-family value; `None` for primitives.
    pub fn as_object(&self) -> Option<&ObjectValue> {
        match self {
            DebuggerValue::Primitive(_) => None,
            DebuggerValue::Object(object) => Some(object),
            DebuggerValue::Array(array) => Some(array.object()),
            DebuggerValue::Function(function) => Some(function.object()),
        }
    }

    pub fn as_array(&self) -> Option<&ArrayValue> {
        match self {
            DebuggerValue::Array(array) => Some(array),
            _ => None,
        }
    }

    pub fn as_function(&self) -> Option<&FunctionValue> {
        match self {
            DebuggerValue::Function(function) => Some(function),
            _ => None,
        }
    }

    /// Values are never truncated by this model.
    pub fn is_truncated(&self) -> bool {
        false
    }

    pub fn reload_large_value(&self) -> WipResult<()> {
        Err(WipError::Unsupported(UnsupportedOperation::ReloadLargeValue))
    }

    /// `true` if both handles refer to the same object-family instance.
    pub fn same_instance(&self, other: &DebuggerValue) -> bool {
        match (self.as_object(), other.as_object()) {
            (Some(a), Some(b)) => a.ptr_eq(b),
            _ => false,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PrimitiveValue {
    value_type: ValueType,
    description: String,
}

impl PrimitiveValue {
    pub(crate) fn new(value_type: ValueType, description: String) -> Self {
        Self {
            value_type,
            description,
        }
    }

    pub fn value_type(&self) -> ValueType {
        self.value_type
    }

    pub fn description(&self) -> &str {
        &self.description
    }
}

/// A remote object whose properties are loaded on first use.
#[derive(Clone)]
pub struct ObjectValue {
    inner: Arc<ObjectInner>,
}

struct ObjectInner {
    value_type: ValueType,
    record: RemoteValueRecord,
    loader: PropertyLoader,
}

impl ObjectValue {
    pub(crate) fn new(
        value_type: ValueType,
        record: RemoteValueRecord,
        builder: &ValueBuilder,
        name: NameRef,
    ) -> Self {
        let loader = PropertyLoader::new(builder.clone(), &record, name);
        Self::with_loader(value_type, record, loader)
    }

    /// Generic object standing in for a value with an unrecognized type tag.
    pub(crate) fn unknown_type(
        record: RemoteValueRecord,
        builder: &ValueBuilder,
        name: NameRef,
    ) -> Self {
        let loader = PropertyLoader::for_unknown_type(builder.clone(), &record, name);
        Self::with_loader(ValueType::Object, record, loader)
    }

    fn with_loader(value_type: ValueType, record: RemoteValueRecord, loader: PropertyLoader) -> Self {
        Self {
            inner: Arc::new(ObjectInner {
                value_type,
                record,
                loader,
            }),
        }
    }

    pub fn value_type(&self) -> ValueType {
        self.inner.value_type
    }

    pub fn value_string(&self) -> &str {
        &self.inner.record.description
    }

    pub fn ref_id(&self) -> Option<&ObjectId> {
        self.inner.record.object_id.as_ref()
    }

    pub fn class_name(&self) -> WipResult<String> {
        Err(WipError::Unsupported(UnsupportedOperation::ClassName))
    }

    /// Loads (once) and returns the property snapshot.
    pub async fn properties(&self) -> WipResult<Arc<ObjectProperties>> {
        self.inner.loader.properties().await
    }

    /// The snapshot if it has already been loaded.
    pub fn try_properties(&self) -> Option<Arc<ObjectProperties>> {
        self.inner.loader.try_properties()
    }

    pub fn load_state(&self) -> FlightState {
        self.inner.loader.state()
    }

    pub fn loader(&self) -> &PropertyLoader {
        &self.inner.loader
    }

    /// Looks a regular property up by name in the loaded snapshot.
    ///
    /// Lookups never trigger a fetch; without a loaded snapshot this fails
    /// with [`UnsupportedOperation::PropertyLookup`].
    pub fn property(&self, name: &str) -> WipResult<Option<Variable>> {
        let snapshot = self
            .try_properties()
            .ok_or(WipError::Unsupported(UnsupportedOperation::PropertyLookup))?;
        Ok(snapshot.find(name).cloned())
    }

    pub fn ptr_eq(&self, other: &ObjectValue) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Debug for ObjectValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObjectValue")
            .field("type", &self.inner.value_type)
            .field("description", &self.inner.record.description)
            .field("loader", &self.inner.loader)
            .finish()
    }
}

/// A callable remote object. Properties behave exactly like [`ObjectValue`].
#[derive(Clone, Debug)]
pub struct FunctionValue {
    object: ObjectValue,
}

impl FunctionValue {
    pub(crate) fn new(object: ObjectValue) -> Self {
        Self { object }
    }

    pub fn object(&self) -> &ObjectValue {
        &self.object
    }
}
