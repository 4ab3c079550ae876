use async_trait::async_trait;

use crate::error::NotifyResult;

/// A channel that forwards a rendered message to the user.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, message: &str) -> NotifyResult<()>;
}

/// Drops every message. Used when notifications are disabled.
pub struct NoOpNotifier;

#[async_trait]
impl Notifier for NoOpNotifier {
    async fn notify(&self, _message: &str) -> NotifyResult<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingNotifier {
        sent: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl Notifier for RecordingNotifier {
        async fn notify(&self, message: &str) -> NotifyResult<()> {
            self.sent.lock().unwrap().push(message.to_string());
            Ok(())
        }
    }

    #[tokio::test]
    async fn noop_accepts_everything() {
        NoOpNotifier.notify("anything").await.unwrap();
    }

    #[tokio::test]
    async fn usable_as_trait_object() {
        let recorder = RecordingNotifier::default();
        {
            let notifier: &dyn Notifier = &recorder;
            notifier.notify("one").await.unwrap();
            notifier.notify("two").await.unwrap();
        }
        assert_eq!(*recorder.sent.lock().unwrap(), vec!["one", "two"]);
    }
}
