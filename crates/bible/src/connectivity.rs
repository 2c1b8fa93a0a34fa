//! Network reachability, as seen by the resolver.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Answers "is the network reachable right now?" without blocking.
///
/// Any `Fn() -> bool` qualifies, so tests can pass `|| false`.
pub trait Connectivity: Send + Sync {
    fn is_online(&self) -> bool;
}

impl<F> Connectivity for F
where
    F: Fn() -> bool + Send + Sync,
{
    fn is_online(&self) -> bool {
        self()
    }
}

pub type ConnectivityHandle = Arc<dyn Connectivity>;

/// A flag flipped by whoever observes online/offline events.
///
/// ```
/// use verbum_bible::{Connectivity, NetworkSwitch};
///
/// let network = NetworkSwitch::new(true);
/// network.set_online(false);
/// assert!(!network.is_online());
/// ```
#[derive(Debug)]
pub struct NetworkSwitch {
    online: AtomicBool,
}

impl NetworkSwitch {
    pub fn new(online: bool) -> Self {
        Self { online: AtomicBool::new(online) }
    }

    pub fn set_online(&self, online: bool) {
        let was = self.online.swap(online, Ordering::SeqCst);
        if was != online {
            tracing::info!(online, "Connectivity changed");
        }
    }
}

impl Default for NetworkSwitch {
    fn default() -> Self {
        Self::new(true)
    }
}

impl Connectivity for NetworkSwitch {
    fn is_online(&self) -> bool {
        self.online.load(Ordering::SeqCst)
    }
}
