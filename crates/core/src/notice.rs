//! Notifier seam — short user-visible messages and the transient
//! progress indicator shown while a request is in flight.
//!
//! Error detail never goes through here; it belongs in the log.

use tracing::info;

/// Receives user-facing notices from the generation engine.
pub trait Notifier: Send + Sync {
    /// Show a short message to the user.
    fn notify(&self, message: &str);

    /// A request started; show a transient progress indicator.
    fn progress_begin(&self, label: &str);

    /// The request finished (either way); clear the indicator.
    fn progress_end(&self);
}

/// Default notifier that routes everything to the log.
#[derive(Debug, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, message: &str) {
        info!("{message}");
    }

    fn progress_begin(&self, label: &str) {
        info!("{label}");
    }

    fn progress_end(&self) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Collects notices for assertions.
    #[derive(Default)]
    pub struct RecordingNotifier {
        pub messages: Mutex<Vec<String>>,
    }

    impl Notifier for RecordingNotifier {
        fn notify(&self, message: &str) {
            self.messages.lock().unwrap().push(message.to_string());
        }

        fn progress_begin(&self, label: &str) {
            self.messages
                .lock()
                .unwrap()
                .push(format!("progress: {label}"));
        }

        fn progress_end(&self) {}
    }

    #[test]
    fn recording_notifier_collects_in_order() {
        let notifier = RecordingNotifier::default();
        notifier.progress_begin("Generating text...");
        notifier.notify("done");
        let messages = notifier.messages.lock().unwrap();
        assert_eq!(messages.len(), 2);
        assert!(messages[0].starts_with("progress:"));
    }
}
