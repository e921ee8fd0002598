//! winbridge: a small RPC server for remote window lifecycle control.
//!
//! Clients send call envelopes (method name + typed parameters) and get back a
//! single-value response. The method surface is `window.make`,
//! `window.delete`, and `window.active`, all operating on a shared registry of
//! live toolkit window handles.

pub mod connection;
pub mod dispatch;
pub mod error;
pub mod protocol;
pub mod registry;
pub mod toolkit;

pub use dispatch::{Dispatcher, Method, MethodTable, ServerContext};
pub use error::{DecodeError, EncodeError, RegistryError, ToolkitError};
pub use protocol::{decode_call, encode_result, CallEnvelope, ResponseEnvelope, WireValue};
pub use registry::{WindowRegistry, NO_ACTIVE_WINDOW};
pub use toolkit::{HeadlessToolkit, WindowHandle, WindowToolkit};
