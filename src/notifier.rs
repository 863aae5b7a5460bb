//! User-facing progress messages.

use std::cell::RefCell;

use tracing::{error, info};

pub trait Notifier {
    /// A blocking operation has started.
    fn loading(&self, message: &str);
    fn success(&self, message: &str);
    fn error(&self, message: &str);
}

/// Sends every notification to the log.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn loading(&self, message: &str) {
        info!(target: "bookkreate::notice", "{message}");
    }

    fn success(&self, message: &str) {
        info!(target: "bookkreate::notice", "{message}");
    }

    fn error(&self, message: &str) {
        error!(target: "bookkreate::notice", "{message}");
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Loading,
    Success,
    Error,
}

/// Keeps notifications in memory, in order.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    notices: RefCell<Vec<(NoticeKind, String)>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notices(&self) -> Vec<(NoticeKind, String)> {
        self.notices.borrow().clone()
    }

    pub fn messages(&self, kind: NoticeKind) -> Vec<String> {
        self.notices
            .borrow()
            .iter()
            .filter(|(k, _)| *k == kind)
            .map(|(_, m)| m.clone())
            .collect()
    }

    fn push(&self, kind: NoticeKind, message: &str) {
        self.notices.borrow_mut().push((kind, message.to_string()));
    }
}

impl Notifier for RecordingNotifier {
    fn loading(&self, message: &str) {
        self.push(NoticeKind::Loading, message);
    }

    fn success(&self, message: &str) {
        self.push(NoticeKind::Success, message);
    }

    fn error(&self, message: &str) {
        self.push(NoticeKind::Error, message);
    }
}

impl<N: Notifier + ?Sized> Notifier for &N {
    fn loading(&self, message: &str) {
        (**self).loading(message);
    }

    fn success(&self, message: &str) {
        (**self).success(message);
    }

    fn error(&self, message: &str) {
        (**self).error(message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recording_keeps_order_and_kind() {
        let notifier = RecordingNotifier::new();
        notifier.loading("Generating PDF...");
        notifier.error("failed");
        notifier.success("done");

        assert_eq!(
            notifier.notices(),
            vec![
                (NoticeKind::Loading, "Generating PDF...".to_string()),
                (NoticeKind::Error, "failed".to_string()),
                (NoticeKind::Success, "done".to_string()),
            ]
        );
        assert_eq!(notifier.messages(NoticeKind::Error), vec!["failed"]);
    }

    #[test]
    fn references_forward() {
        fn announce<N: Notifier>(notifier: N) {
            notifier.success("ok");
        }

        let notifier = RecordingNotifier::new();
        announce(&notifier);
        assert_eq!(notifier.messages(NoticeKind::Success), vec!["ok"]);
    }
}
