//! Remote value model for WebKit inspector protocol (WIP) debugging.
//!
//! The session layer hands us `RemoteObject` records; this crate turns them
//! into [`DebuggerValue`]s whose properties are fetched lazily, once, through
//! a [`PropertySource`]. Concurrent readers of the same value share that single
//! fetch, arrays get a sparse index view derived from the loaded properties,
//! and [`Variable`]s render their fully-qualified expression (`a.b[2]`) only
//! when asked.
//!
//! The model is read-only: mutation and heavy-value reloads fail fast with
//! [`WipError::Unsupported`].

mod array;
mod config;
mod dispatch;
mod error;
mod loader;
pub mod names;
pub mod protocol;
mod single_flight;
mod value;
mod variable;

// The mock property source is only needed for tests and downstream integration suites.
#[cfg(any(test, feature = "test-support"))]
pub mod mock;

pub use array::{ArrayProperties, ArrayValue, UNKNOWN_ARRAY_LENGTH};
pub use config::{ConfigError, WipValuesConfig};
pub use dispatch::ValueBuilder;
pub use error::{UnsupportedOperation, WipError, WipResult};
pub use loader::{ObjectProperties, PropertyLoader, PropertySource, TimeoutPropertySource};
pub use names::{NameBuilder, NameRef, PropertyNameScope, RootName};
pub use protocol::{ObjectId, PropertyRecord, RemoteProperties, RemoteType, RemoteValueRecord};
pub use single_flight::{FlightState, SingleFlight};
pub use value::{DebuggerValue, FunctionValue, ObjectValue, PrimitiveValue, ValueType};
pub use variable::Variable;
