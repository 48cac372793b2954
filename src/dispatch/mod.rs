//! Frame dispatch
//!
//! Routes decoded frames to handlers: SysEx frames by subcommand, everything
//! else by command code. Frames nobody registered for go to a replaceable
//! default handler; an unknown code is routine traffic, not an error.

pub mod handlers;
pub mod registry;

pub use self::handlers::{Ignore, LogUnrouted, VersionCheck};
pub use self::registry::{Handler, HandlerRegistry};

use tracing::trace;

use crate::protocol::Frame;

/// Where a frame was delivered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// Plain command handler
    Command(u8),
    /// SysEx subcommand handler
    Sysex(u8),
    /// Default handler
    Unrouted(u8),
}

/// Owns the command and SysEx registries plus the default handler
pub struct Dispatcher {
    commands: HandlerRegistry,
    sysex: HandlerRegistry,
    fallback: Box<dyn Handler>,
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl Dispatcher {
    /// Creates a dispatcher with empty registries and [`LogUnrouted`] as fallback
    pub fn new() -> Self {
        Self::with_default_handler(LogUnrouted)
    }

    pub fn with_default_handler<H: Handler>(fallback: H) -> Self {
        Dispatcher {
            commands: HandlerRegistry::new(),
            sysex: HandlerRegistry::new(),
            fallback: Box::new(fallback),
        }
    }

    /// Registers a handler for a command code; the last registration wins
    pub fn register<H: Handler>(&mut self, command: u8, handler: H) {
        if self.commands.register(command, handler) {
            trace!("replaced handler for command {:#04x}", command);
        }
    }

    /// Registers a handler for a SysEx subcommand; the last registration wins
    pub fn register_sysex<H: Handler>(&mut self, subcommand: u8, handler: H) {
        if self.sysex.register(subcommand, handler) {
            trace!("replaced handler for sysex {:#04x}", subcommand);
        }
    }

    /// Replaces the handler for frames with no registered handler
    pub fn set_default_handler<H: Handler>(&mut self, handler: H) {
        self.fallback = Box::new(handler);
    }

    pub fn commands(&self) -> &HandlerRegistry {
        &self.commands
    }

    pub fn sysex(&self) -> &HandlerRegistry {
        &self.sysex
    }

    /// Delivers a frame to its handler
    pub fn dispatch(&mut self, frame: &Frame) -> Route {
        let (registry, code, route) = match frame.subcommand() {
            Some(sub) => (&mut self.sysex, sub, Route::Sysex(sub)),
            None => (&mut self.commands, frame.code(), Route::Command(frame.code())),
        };

        match registry.get_mut(code) {
            Some(handler) => {
                handler.call(code, frame.data());
                route
            }
            None => {
                self.fallback.call(code, frame.data());
                Route::Unrouted(code)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};
    use crate::protocol::constants::{sysex, ANALOG_MESSAGE, REPORT_VERSION};
    use crate::protocol::FrameDecoder;

    type Log = Arc<Mutex<Vec<(&'static str, u8, Vec<u8>)>>>;

    fn recorder(log: &Log, name: &'static str) -> impl Handler {
        let log = log.clone();
        move |code: u8, data: &[u8]| log.lock().unwrap().push((name, code, data.to_vec()))
    }

    #[test]
    fn test_routes_command_and_sysex() {
        let log = Log::default();
        let mut dispatcher = Dispatcher::with_default_handler(recorder(&log, "default"));
        dispatcher.register(ANALOG_MESSAGE, recorder(&log, "analog"));
        dispatcher.register_sysex(sysex::ANALOG_MAPPING_RESPONSE, recorder(&log, "mapping"));

        let frames = FrameDecoder::new().feed_all(&[
            0xE2, 0x10, 0x02, 0xF0, 0x6A, 0x7F, 0xF7, 0xF0, 0x79, 0x02, 0x05, 0xF7,
        ]);
        let routes: Vec<Route> = frames.iter().map(|f| dispatcher.dispatch(f)).collect();

        assert_eq!(
            routes,
            vec![Route::Command(0xE0), Route::Sysex(0x6A), Route::Unrouted(0x79)]
        );
        let log = log.lock().unwrap();
        assert_eq!(log[0], ("analog", 0xE0, vec![0xE2, 0x10, 0x02]));
        assert_eq!(log[1], ("mapping", 0x6A, vec![0xF0, 0x6A, 0x7F, 0xF7]));
        assert_eq!(log[2], ("default", 0x79, vec![0xF0, 0x79, 0x02, 0x05, 0xF7]));
    }

    #[test]
    fn test_sysex_registry_does_not_match_commands() {
        let log = Log::default();
        let mut dispatcher = Dispatcher::with_default_handler(recorder(&log, "default"));
        // 0x79 as a plain command code must not catch a REPORT_FIRMWARE sysex
        dispatcher.register(0x79, recorder(&log, "plain"));

        let frame = Frame::sysex(vec![0xF0, 0x79, 0xF7]).unwrap();
        assert_eq!(dispatcher.dispatch(&frame), Route::Unrouted(0x79));
        assert_eq!(log.lock().unwrap()[0].0, "default");
    }

    #[test]
    fn test_last_registration_wins() {
        let log = Log::default();
        let mut dispatcher = Dispatcher::new();
        dispatcher.register(REPORT_VERSION, recorder(&log, "first"));
        dispatcher.register(REPORT_VERSION, recorder(&log, "second"));

        let frame = Frame::command(REPORT_VERSION, vec![0xF9, 0x02, 0x05]);
        dispatcher.dispatch(&frame);
        dispatcher.dispatch(&frame);

        let names: Vec<_> = log.lock().unwrap().iter().map(|e| e.0).collect();
        assert_eq!(names, vec!["second", "second"]);
        assert_eq!(dispatcher.commands().len(), 1);
    }

    #[test]
    fn test_default_handler_is_replaceable() {
        let log = Log::default();
        let mut dispatcher = Dispatcher::new();
        let frame = Frame::command(0x90, vec![0x90, 0x01, 0x00]);
        assert_eq!(dispatcher.dispatch(&frame), Route::Unrouted(0x90));

        dispatcher.set_default_handler(recorder(&log, "custom"));
        dispatcher.dispatch(&frame);
        assert_eq!(log.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_version_check_handler() {
        let check = VersionCheck::default();
        let flag = check.mismatch_flag();
        let mut dispatcher = Dispatcher::with_default_handler(Ignore);
        dispatcher.register(REPORT_VERSION, check);

        let frames = FrameDecoder::new().feed_all(&[0xF9, 0x02, 0x05]);
        assert_eq!(dispatcher.dispatch(&frames[0]), Route::Command(REPORT_VERSION));
        assert!(!flag.load(std::sync::atomic::Ordering::Relaxed));
    }
}
