//! Request dispatch: decode, method lookup, invoke, encode.
//!
//! Each inbound payload goes through one pass of `Dispatcher::dispatch`. Any
//! failure along the way (bad envelope, unknown method, toolkit fault,
//! unencodable result) is logged and the request dropped — the client sees no
//! response frame, and the server keeps serving.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::error::ToolkitError;
use crate::protocol::{decode_call, encode_result, WireValue};
use crate::registry::WindowRegistry;
use crate::toolkit::WindowToolkit;

/// Shared state handed to every method invocation.
pub struct ServerContext {
    pub registry: Arc<WindowRegistry>,
    pub toolkit: Arc<dyn WindowToolkit>,
}

/// One RPC method. Implementations must tolerate any parameter shape; only a
/// toolkit fault may abort the request.
pub trait Method: Send + Sync {
    fn call(&self, cx: &ServerContext, params: &[WireValue]) -> Result<WireValue, ToolkitError>;
}

/// Method name → handler map. Built once at startup, immutable afterwards.
pub struct MethodTable {
    methods: HashMap<&'static str, Box<dyn Method>>,
}

impl MethodTable {
    /// The built-in window method surface.
    pub fn builtin() -> Self {
        let mut methods: HashMap<&'static str, Box<dyn Method>> = HashMap::new();
        methods.insert("window.make", Box::new(MakeWindow));
        methods.insert("window.delete", Box::new(DeleteWindow));
        methods.insert("window.active", Box::new(ActiveWindow));
        Self { methods }
    }

    pub fn get(&self, name: &str) -> Option<&dyn Method> {
        self.methods.get(name).map(Box::as_ref)
    }
}

/// Creates a toolkit window and registers it. Parameters are ignored.
struct MakeWindow;

impl Method for MakeWindow {
    fn call(&self, cx: &ServerContext, _params: &[WireValue]) -> Result<WireValue, ToolkitError> {
        let handle = cx.toolkit.create_window()?;
        let id = cx.registry.create(handle);
        Ok(WireValue::string(id))
    }
}

/// Destroys the window named by a single wrapped-string identifier parameter.
///
/// Returns `false` instead of faulting when the parameter shape is wrong or
/// the identifier is unknown; registry removal and toolkit destruction happen
/// together, with removal first so no other request can reach the dying handle.
struct DeleteWindow;

impl Method for DeleteWindow {
    fn call(&self, cx: &ServerContext, params: &[WireValue]) -> Result<WireValue, ToolkitError> {
        let id = match params.first().map(WireValue::unwrap_str) {
            Some(Ok(id)) => id,
            Some(Err(e)) => {
                warn!(error = %e, "window.delete: bad parameter");
                return Ok(WireValue::Boolean(false));
            }
            None => {
                warn!("window.delete: missing identifier parameter");
                return Ok(WireValue::Boolean(false));
            }
        };
        debug!(id = %id, "window.delete");

        match cx.registry.remove(id) {
            Ok(handle) => {
                cx.toolkit.destroy_window(handle);
                Ok(WireValue::Boolean(true))
            }
            Err(e) => {
                warn!(error = %e, "window.delete: unknown identifier");
                Ok(WireValue::Boolean(false))
            }
        }
    }
}

/// Reports the identifier of the active window, or `"-1"`. Parameters are
/// ignored.
struct ActiveWindow;

impl Method for ActiveWindow {
    fn call(&self, cx: &ServerContext, _params: &[WireValue]) -> Result<WireValue, ToolkitError> {
        Ok(WireValue::string(
            cx.registry.find_active(cx.toolkit.as_ref()),
        ))
    }
}

/// Orchestrates decode → lookup → invoke → encode for each inbound request.
pub struct Dispatcher {
    context: ServerContext,
    methods: MethodTable,
}

impl Dispatcher {
    pub fn new(registry: Arc<WindowRegistry>, toolkit: Arc<dyn WindowToolkit>) -> Self {
        Self {
            context: ServerContext { registry, toolkit },
            methods: MethodTable::builtin(),
        }
    }

    /// Handle one request payload. `None` means no response is sent: the
    /// envelope was malformed, the method unknown, or the handler faulted.
    pub fn dispatch(&self, raw: &[u8]) -> Option<Vec<u8>> {
        let call = match decode_call(raw) {
            Ok(call) => call,
            Err(e) => {
                warn!(error = %e, "rejected request");
                return None;
            }
        };

        let method = match self.methods.get(&call.method) {
            Some(method) => method,
            None => {
                warn!(method = %call.method, "unknown method");
                return None;
            }
        };
        debug!(method = %call.method, params = call.params.len(), "dispatching");

        let result = match method.call(&self.context, &call.params) {
            Ok(result) => result,
            Err(e) => {
                warn!(method = %call.method, error = %e, "method failed");
                return None;
            }
        };

        match encode_result(&result) {
            Ok(bytes) => Some(bytes),
            Err(e) => {
                warn!(method = %call.method, error = %e, "unencodable result");
                None
            }
        }
    }
}
