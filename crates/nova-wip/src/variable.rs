use std::{
    fmt,
    sync::{Arc, OnceLock},
};

use crate::{
    error::{UnsupportedOperation, WipError, WipResult},
    names::{qualified_name, NameRef},
    value::DebuggerValue,
};

/// A named value: what the debugger shows as one row of a variables view.
///
/// Variables are read-only. The fully-qualified name is rendered on first
/// request and cached; clones share that cache.
#[derive(Clone)]
pub struct Variable {
    inner: Arc<VariableInner>,
}

struct VariableInner {
    value: DebuggerValue,
    name: NameRef,
    qualified_name: OnceLock<String>,
}

impl Variable {
    pub fn new(value: DebuggerValue, name: NameRef) -> Self {
        Self {
            inner: Arc::new(VariableInner {
                value,
                name,
                qualified_name: OnceLock::new(),
            }),
        }
    }

    pub fn is_readable(&self) -> bool {
        true
    }

    pub fn is_mutable(&self) -> bool {
        false
    }

    pub fn value(&self) -> &DebuggerValue {
        &self.inner.value
    }

    pub fn short_name(&self) -> &str {
        self.inner.name.short_name()
    }

    pub fn name_builder(&self) -> &NameRef {
        &self.inner.name
    }

    pub fn fully_qualified_name(&self) -> &str {
        self.inner
            .qualified_name
            .get_or_init(|| qualified_name(&*self.inner.name))
    }

    /// Always fails: remote values cannot be modified through this model.
    pub fn set_value(&self, _new_value: &str) -> WipResult<()> {
        Err(WipError::Unsupported(UnsupportedOperation::SetValue))
    }
}

impl fmt::Debug for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Variable")
            .field("name", &self.short_name())
            .field("value", &self.inner.value)
            .finish()
    }
}
