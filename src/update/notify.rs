//! Step-by-step narration of an update attempt.
//!
//! The orchestrator reports progress through a [`Notifier`]; a background
//! task owned by [`NotificationPipeline`] hands each [`Message`] to a sink
//! supplied by the caller (console, log file, UI). Delivery is asynchronous
//! but strictly FIFO, and [`NotificationPipeline::shutdown`] waits until every
//! queued message has reached the sink.
//!
//! ```rust,no_run
//! use goto_cli::update::notify::{Level, NotificationPipeline};
//!
//! # async fn example() {
//! let (notifier, pipeline) = NotificationPipeline::start(|message| {
//!     println!("[{:?}] {}", message.level, message.content);
//! });
//!
//! notifier.send(Level::Info, "Checking for updates...");
//! drop(notifier);
//! pipeline.shutdown().await;
//! # }
//! ```

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::warn;

/// Severity of a [`Message`], used by sinks for styling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Info,
    Success,
    Warning,
    Alert,
}

/// One notification event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub level: Level,
    pub content: String,
}

impl Message {
    pub fn new(level: Level, content: impl Into<String>) -> Self {
        Self {
            level,
            content: content.into(),
        }
    }
}

/// Producer half of a pipeline.
///
/// Sending never blocks and never fails. A detached notifier, or one whose
/// consumer has gone away, silently discards messages.
#[derive(Debug)]
pub struct Notifier {
    sender: Option<mpsc::UnboundedSender<Message>>,
}

impl Notifier {
    /// A notifier with no consumer. Every send is a no-op.
    #[must_use]
    pub const fn detached() -> Self {
        Self {
            sender: None,
        }
    }

    pub fn send(&self, level: Level, content: impl Into<String>) {
        if let Some(sender) = &self.sender {
            // A closed channel means nobody is listening any more
            let _ = sender.send(Message::new(level, content));
        }
    }

    pub fn info(&self, content: impl Into<String>) {
        self.send(Level::Info, content);
    }

    pub fn success(&self, content: impl Into<String>) {
        self.send(Level::Success, content);
    }

    pub fn warning(&self, content: impl Into<String>) {
        self.send(Level::Warning, content);
    }

    pub fn alert(&self, content: impl Into<String>) {
        self.send(Level::Alert, content);
    }
}

impl Default for Notifier {
    fn default() -> Self {
        Self::detached()
    }
}

/// Consumer half of a pipeline: a task draining messages into a sink.
pub struct NotificationPipeline {
    consumer: JoinHandle<()>,
}

impl NotificationPipeline {
    /// Create a channel and spawn its consumer on the current tokio runtime.
    ///
    /// The returned [`Notifier`] is the only producer. The consumer exits
    /// once the notifier is dropped and the queue is empty.
    pub fn start<F>(mut sink: F) -> (Notifier, Self)
    where
        F: FnMut(Message) + Send + 'static,
    {
        let (sender, mut receiver) = mpsc::unbounded_channel::<Message>();

        let consumer = tokio::spawn(async move {
            while let Some(message) = receiver.recv().await {
                sink(message);
            }
        });

        (
            Notifier {
                sender: Some(sender),
            },
            Self {
                consumer,
            },
        )
    }

    /// Wait for the consumer to deliver every queued message and exit.
    ///
    /// The [`Notifier`] must have been dropped first (for example by letting
    /// the [`SelfUpdater`](super::SelfUpdater) that owns it finish its run);
    /// otherwise this waits for it.
    pub async fn shutdown(self) {
        if let Err(e) = self.consumer.await {
            warn!("Notification consumer stopped abnormally: {}", e);
        }
    }
}
