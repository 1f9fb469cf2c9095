/*
 * observer.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Diagnostic hooks for rendering.
//!
//! A [`RenderObserver`] is told about each resolved directive and about the
//! final output. Observers are fire-and-forget: they cannot change or fail a
//! render.

use crate::ast::DirectiveKind;

/// Label used for templates rendered from a string rather than a file.
pub const INLINE_LABEL: &str = "<inline>";

/// Observer for render events.
///
/// All methods have default no-op implementations.
pub trait RenderObserver {
    /// Called once per resolved directive, in template order.
    ///
    /// # Arguments
    ///
    /// * `kind` - Which directive was resolved
    /// * `taken` - Whether its body was kept (`if` condition true, or both
    ///   `between` keys present)
    fn on_directive(&self, _kind: DirectiveKind, _taken: bool) {}

    /// Called with the final rendered text.
    ///
    /// # Arguments
    ///
    /// * `label` - Template name, or [`INLINE_LABEL`]
    /// * `output` - The rendered text
    fn on_rendered(&self, _label: &str, _output: &str) {}
}

/// Observer that does nothing. Used when no sink is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl RenderObserver for NoopObserver {}

/// Observer that emits `tracing` events.
///
/// Rendered output is logged at debug level; individual directives at trace.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl TracingObserver {
    pub fn new() -> Self {
        Self
    }
}

impl RenderObserver for TracingObserver {
    fn on_directive(&self, kind: DirectiveKind, taken: bool) {
        tracing::trace!(directive = %kind, taken = taken, "Resolved directive");
    }

    fn on_rendered(&self, label: &str, output: &str) {
        tracing::debug!(template = label, "Rendered template:\n{}", output);
    }
}

impl<T: RenderObserver + ?Sized> RenderObserver for &T {
    fn on_directive(&self, kind: DirectiveKind, taken: bool) {
        (**self).on_directive(kind, taken);
    }

    fn on_rendered(&self, label: &str, output: &str) {
        (**self).on_rendered(label, output);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::io;
    use std::sync::{Arc, Mutex};

    #[derive(Default)]
    struct Recording {
        events: RefCell<Vec<String>>,
    }

    impl RenderObserver for Recording {
        fn on_directive(&self, kind: DirectiveKind, taken: bool) {
            self.events.borrow_mut().push(format!("{kind}:{taken}"));
        }
    }

    #[test]
    fn test_default_methods_are_noops() {
        let recording = Recording::default();
        recording.on_rendered(INLINE_LABEL, "text");
        assert!(recording.events.borrow().is_empty());

        recording.on_directive(DirectiveKind::If, true);
        assert_eq!(*recording.events.borrow(), vec!["if:true".to_string()]);
    }

    fn notify(observer: impl RenderObserver) {
        observer.on_directive(DirectiveKind::Between, false);
    }

    #[test]
    fn test_reference_forwarding() {
        let recording = Recording::default();
        notify(&recording);
        assert_eq!(*recording.events.borrow(), vec!["between:false".to_string()]);
    }

    #[derive(Clone, Default)]
    struct CapturedOutput(Arc<Mutex<Vec<u8>>>);

    impl io::Write for CapturedOutput {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_tracing_observer_with_subscriber() {
        let captured = CapturedOutput::default();
        let writer = captured.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::TRACE)
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();

        tracing::subscriber::with_default(subscriber, || {
            let observer = TracingObserver::new();
            observer.on_directive(DirectiveKind::If, true);
            observer.on_rendered("query.sql", "SELECT 1");
        });

        let output = String::from_utf8(captured.0.lock().unwrap().clone()).unwrap();
        assert!(output.contains("directive=if"));
        assert!(output.contains("taken=true"));
        assert!(output.contains("query.sql"));
        assert!(output.contains("Rendered template:\nSELECT 1"));
    }
}
