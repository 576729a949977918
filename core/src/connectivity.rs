//! Network availability probes.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Answers whether the network is currently reachable.
pub trait Connectivity: Send + Sync {
    fn is_network_available(&self) -> bool;
}

/// Probe that always reports the network as available.
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysOnline;

impl Connectivity for AlwaysOnline {
    fn is_network_available(&self) -> bool {
        true
    }
}

/// Shared flag flipped by whatever watches the platform's network state.
#[derive(Debug, Clone)]
pub struct ConnectivityFlag(Arc<AtomicBool>);

impl ConnectivityFlag {
    pub fn new(available: bool) -> Self {
        Self(Arc::new(AtomicBool::new(available)))
    }

    pub fn set_available(&self, available: bool) {
        self.0.store(available, Ordering::Release);
    }
}

impl Default for ConnectivityFlag {
    fn default() -> Self {
        Self::new(true)
    }
}

impl Connectivity for ConnectivityFlag {
    fn is_network_available(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

impl<C: Connectivity + ?Sized> Connectivity for Arc<C> {
    fn is_network_available(&self) -> bool {
        (**self).is_network_available()
    }
}
