use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::watch;
use tracing::debug;

/// Token identifying one selection. Only the newest generation may write
/// into the content area.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Generation(u64);

impl Generation {
    pub fn get(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for Generation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// What the content area displays.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Content {
    #[default]
    Empty,
    /// Message for a section without dynamic content.
    Placeholder(String),
    /// Filled template markup.
    Rendered(String),
    /// Localized error markup; replaces whatever was shown before.
    Error(String),
}

impl Content {
    pub fn text(&self) -> &str {
        match self {
            Self::Empty => "",
            Self::Placeholder(s) | Self::Rendered(s) | Self::Error(s) => s,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }
}

/// The single output surface. Observers subscribe to committed content.
pub struct ContentArea {
    current: AtomicU64,
    tx: watch::Sender<Content>,
}

impl Default for ContentArea {
    fn default() -> Self {
        Self::new()
    }
}

impl ContentArea {
    pub fn new() -> Self {
        let (tx, _) = watch::channel(Content::Empty);
        Self {
            current: AtomicU64::new(0),
            tx,
        }
    }

    /// Start a new generation, invalidating every load still in flight.
    pub fn begin(&self) -> Generation {
        Generation(self.current.fetch_add(1, Ordering::SeqCst) + 1)
    }

    pub fn generation(&self) -> Generation {
        Generation(self.current.load(Ordering::SeqCst))
    }

    /// Replace the displayed content if `generation` is still current.
    /// Returns false when the content was discarded as stale.
    pub fn commit(&self, generation: Generation, content: Content) -> bool {
        let accepted = self.tx.send_if_modified(|slot| {
            if self.current.load(Ordering::SeqCst) != generation.0 {
                return false;
            }
            *slot = content;
            true
        });
        if !accepted {
            debug!(
                generation = generation.0,
                current = self.generation().0,
                "discarding stale content"
            );
        }
        accepted
    }

    pub fn current(&self) -> Content {
        self.tx.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Content> {
        self.tx.subscribe()
    }
}
