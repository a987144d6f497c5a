//! Variable names and expression paths.
//!
//! Every value handed to the debugger carries a [`NameBuilder`] describing how
//! it was reached: a root (a local, a watch expression) or a property of some
//! parent. The short name is always at hand; the fully-qualified path (`a.b[2]`)
//! is only rendered when somebody asks for it, and [`crate::Variable`] caches
//! that rendering.

use std::sync::Arc;

pub type NameRef = Arc<dyn NameBuilder>;

pub trait NameBuilder: Send + Sync {
    /// The leaf identifier shown in the variables view.
    fn short_name(&self) -> &str;

    /// Append the fully-qualified expression for this name to `out`.
    fn append_qualified(&self, out: &mut String);

    /// Whether the qualified form must be parenthesized before a property
    /// accessor can be appended to it.
    fn needs_parentheses(&self) -> bool {
        false
    }
}

/// Root of a name chain: a plain identifier or an arbitrary expression.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RootName {
    name: String,
    expression: bool,
}

impl RootName {
    /// A root that is a plain identifier (`this`, a local, a global).
    pub fn new(name: impl Into<String>) -> NameRef {
        Arc::new(Self {
            name: name.into(),
            expression: false,
        })
    }

    /// A root that is the text of an evaluated expression (`a + b`).
    ///
    /// The expression gets parenthesized when a property path is built on
    /// top of it, unless it already is a plain identifier.
    pub fn expression(text: impl Into<String>) -> NameRef {
        let name = text.into();
        let expression = !is_identifier(&name);
        Arc::new(Self { name, expression })
    }
}

impl NameBuilder for RootName {
    fn short_name(&self) -> &str {
        &self.name
    }

    fn append_qualified(&self, out: &mut String) {
        out.push_str(&self.name);
    }

    fn needs_parentheses(&self) -> bool {
        self.expression
    }
}

/// Name scope for the properties of one object.
///
/// Passed to the property source together with the object id, and used by the
/// loader to name each loaded property.
#[derive(Clone)]
pub struct PropertyNameScope {
    parent: NameRef,
}

impl PropertyNameScope {
    pub fn new(parent: NameRef) -> Self {
        Self { parent }
    }

    pub fn parent(&self) -> &NameRef {
        &self.parent
    }

    pub fn property(&self, name: impl Into<String>) -> NameRef {
        Arc::new(PropertyName {
            parent: Arc::clone(&self.parent),
            name: name.into(),
        })
    }
}

impl std::fmt::Debug for PropertyNameScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PropertyNameScope")
            .field("parent", &self.parent.short_name())
            .finish()
    }
}

struct PropertyName {
    parent: NameRef,
    name: String,
}

impl NameBuilder for PropertyName {
    fn short_name(&self) -> &str {
        &self.name
    }

    fn append_qualified(&self, out: &mut String) {
        if self.parent.needs_parentheses() {
            out.push('(');
            self.parent.append_qualified(out);
            out.push(')');
        } else {
            self.parent.append_qualified(out);
        }

        if is_all_digits(&self.name) {
            out.push('[');
            out.push_str(&self.name);
            out.push(']');
        } else if is_identifier(&self.name) {
            out.push('.');
            out.push_str(&self.name);
        } else {
            out.push('[');
            // JSON string literals are valid JavaScript string literals.
            out.push_str(&serde_json::Value::String(self.name.clone()).to_string());
            out.push(']');
        }
    }
}

/// `true` for non-empty, ASCII-digit-only names (array indices).
pub fn is_all_digits(name: &str) -> bool {
    !name.is_empty() && name.bytes().all(|b| b.is_ascii_digit())
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    (first.is_alphabetic() || first == '_' || first == '$')
        && chars.all(|c| c.is_alphanumeric() || c == '_' || c == '$')
}

/// Render the fully-qualified expression of `name`.
pub fn qualified_name(name: &dyn NameBuilder) -> String {
    let mut out = String::new();
    name.append_qualified(&mut out);
    out
}
