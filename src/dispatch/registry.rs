//! Handler registry keyed by command or SysEx subcommand code.
//!
//! Registering a code that already has a handler replaces it.

use std::collections::HashMap;
use std::fmt;

/// A frame handler: receives the routed code and the raw frame bytes.
pub trait Handler: Send + 'static {
    /// Handle one frame.
    fn call(&mut self, code: u8, data: &[u8]);
}

impl<F> Handler for F
where
    F: FnMut(u8, &[u8]) + Send + 'static,
{
    fn call(&mut self, code: u8, data: &[u8]) {
        self(code, data)
    }
}

/// Registry mapping byte codes to handlers.
#[derive(Default)]
pub struct HandlerRegistry {
    handlers: HashMap<u8, Box<dyn Handler>>,
}

impl HandlerRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler, returning `true` if it replaced an earlier one.
    pub fn register<H: Handler>(&mut self, code: u8, handler: H) -> bool {
        self.handlers.insert(code, Box::new(handler)).is_some()
    }

    /// Remove the handler for `code`.
    pub fn unregister(&mut self, code: u8) -> bool {
        self.handlers.remove(&code).is_some()
    }

    /// Look up a handler.
    pub fn get_mut(&mut self, code: u8) -> Option<&mut (dyn Handler + 'static)> {
        self.handlers.get_mut(&code).map(|h| h.as_mut())
    }

    pub fn contains(&self, code: u8) -> bool {
        self.handlers.contains_key(&code)
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl fmt::Debug for HandlerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut codes: Vec<_> = self.handlers.keys().copied().collect();
        codes.sort_unstable();
        f.debug_struct("HandlerRegistry").field("codes", &codes).finish()
    }
}
