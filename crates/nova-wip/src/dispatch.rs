use std::{
    collections::HashMap,
    sync::{Arc, OnceLock},
};

use crate::{
    array::ArrayValue,
    config::WipValuesConfig,
    loader::{ObjectProperties, PropertySource, TimeoutPropertySource},
    names::{NameRef, PropertyNameScope},
    protocol::{PropertyRecord, RemoteProperties, RemoteType, RemoteValueRecord},
    value::{DebuggerValue, FunctionValue, ObjectValue, PrimitiveValue, ValueType},
    variable::Variable,
};

type BuildFn = fn(&ValueBuilder, ValueType, RemoteValueRecord, NameRef) -> DebuggerValue;

#[derive(Clone, Copy)]
struct ValueStrategy {
    value_type: ValueType,
    build: BuildFn,
}

impl ValueStrategy {
    const fn new(value_type: ValueType, build: BuildFn) -> Self {
        Self { value_type, build }
    }
}

/// Strategy for tags missing from the table.
const DEFAULT_STRATEGY: ValueStrategy = ValueStrategy::new(ValueType::Object, build_unknown);

fn value_strategies() -> &'static HashMap<RemoteType, ValueStrategy> {
    static STRATEGIES: OnceLock<HashMap<RemoteType, ValueStrategy>> = OnceLock::new();
    STRATEGIES.get_or_init(|| {
        HashMap::from([
            (
                RemoteType::String,
                ValueStrategy::new(ValueType::String, build_primitive),
            ),
            (
                RemoteType::Boolean,
                ValueStrategy::new(ValueType::Boolean, build_primitive),
            ),
            (
                RemoteType::Number,
                ValueStrategy::new(ValueType::Number, build_primitive),
            ),
            (
                RemoteType::Null,
                ValueStrategy::new(ValueType::Null, build_primitive),
            ),
            (
                RemoteType::Undefined,
                ValueStrategy::new(ValueType::Undefined, build_primitive),
            ),
            (
                RemoteType::Object,
                ValueStrategy::new(ValueType::Object, build_object),
            ),
            (
                RemoteType::Array,
                ValueStrategy::new(ValueType::Array, build_array),
            ),
            (
                RemoteType::Function,
                ValueStrategy::new(ValueType::Function, build_function),
            ),
        ])
    })
}

fn strategy_for(remote_type: &RemoteType) -> ValueStrategy {
    match value_strategies().get(remote_type) {
        Some(strategy) => *strategy,
        None => {
            tracing::error!(
                target = "nova.wip",
                remote_type = %remote_type,
                "unexpected remote value type; treating it as an object"
            );
            DEFAULT_STRATEGY
        }
    }
}

fn build_primitive(
    _builder: &ValueBuilder,
    value_type: ValueType,
    record: RemoteValueRecord,
    _name: NameRef,
) -> DebuggerValue {
    DebuggerValue::Primitive(PrimitiveValue::new(value_type, record.description))
}

fn build_object(
    builder: &ValueBuilder,
    value_type: ValueType,
    record: RemoteValueRecord,
    name: NameRef,
) -> DebuggerValue {
    DebuggerValue::Object(ObjectValue::new(value_type, record, builder, name))
}

fn build_unknown(
    builder: &ValueBuilder,
    _value_type: ValueType,
    record: RemoteValueRecord,
    name: NameRef,
) -> DebuggerValue {
    DebuggerValue::Object(ObjectValue::unknown_type(record, builder, name))
}

fn build_array(
    builder: &ValueBuilder,
    value_type: ValueType,
    record: RemoteValueRecord,
    name: NameRef,
) -> DebuggerValue {
    DebuggerValue::Array(ArrayValue::new(ObjectValue::new(
        value_type, record, builder, name,
    )))
}

fn build_function(
    builder: &ValueBuilder,
    value_type: ValueType,
    record: RemoteValueRecord,
    name: NameRef,
) -> DebuggerValue {
    DebuggerValue::Function(FunctionValue::new(ObjectValue::new(
        value_type, record, builder, name,
    )))
}

/// Turns protocol records into [`DebuggerValue`]s and [`Variable`]s.
///
/// Object-family values keep a clone of the builder so that their properties,
/// once fetched, are wrapped the same way. Every call produces a fresh
/// instance; values are not deduplicated by object id.
#[derive(Clone)]
pub struct ValueBuilder {
    source: Arc<dyn PropertySource>,
}

impl ValueBuilder {
    pub fn new(source: Arc<dyn PropertySource>) -> Self {
        Self { source }
    }

    /// Like [`ValueBuilder::new`], bounding property loads by the configured
    /// fetch timeout (if any).
    pub fn with_config(source: Arc<dyn PropertySource>, config: &WipValuesConfig) -> Self {
        match config.fetch_timeout() {
            Some(timeout) => Self::new(Arc::new(TimeoutPropertySource::new(source, timeout))),
            None => Self::new(source),
        }
    }

    pub fn wrap(&self, record: RemoteValueRecord, name: NameRef) -> DebuggerValue {
        let strategy = strategy_for(&record.remote_type);
        (strategy.build)(self, strategy.value_type, record, name)
    }

    pub fn create_variable(&self, record: RemoteValueRecord, name: NameRef) -> Variable {
        let value = self.wrap(record, Arc::clone(&name));
        Variable::new(value, name)
    }

    pub(crate) fn source(&self) -> &dyn PropertySource {
        &*self.source
    }

    pub(crate) fn build_properties(
        &self,
        scope: &PropertyNameScope,
        raw: RemoteProperties,
    ) -> ObjectProperties {
        let wrap_all = |records: Vec<PropertyRecord>| -> Vec<Variable> {
            records
                .into_iter()
                .map(|record| self.create_variable(record.value, scope.property(record.name)))
                .collect()
        };

        ObjectProperties::new(
            wrap_all(raw.properties),
            wrap_all(raw.internal_properties),
        )
    }
}
