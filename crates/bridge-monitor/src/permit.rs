//! Scoped crossings.
//!
//! [`BridgeMonitor::cross`] pairs an enter with a guaranteed leave: the
//! returned [`CrossingPermit`] leaves the bridge when released or dropped,
//! including during unwinding.

use std::sync::Arc;

use tracing::warn;

use crate::class::TrafficClass;
use crate::error::Result;
use crate::monitor::BridgeMonitor;

/// Proof that an entity is on the bridge.
#[must_use = "dropping the permit immediately leaves the bridge"]
#[derive(Debug)]
pub struct CrossingPermit {
    monitor: Arc<BridgeMonitor>,
    class: TrafficClass,
    released: bool,
}

impl CrossingPermit {
    /// Class of the entity holding the permit.
    #[inline]
    pub const fn class(&self) -> TrafficClass {
        self.class
    }

    /// Leaves the bridge.
    ///
    /// # Errors
    ///
    /// Propagates the error from [`BridgeMonitor::leave`].
    pub fn leave(mut self) -> Result<()> {
        self.released = true;
        self.monitor.leave(self.class)
    }
}

impl Drop for CrossingPermit {
    fn drop(&mut self) {
        if !self.released {
            if let Err(err) = self.monitor.leave(self.class) {
                warn!("{} could not leave on drop: {err}", self.class);
            }
        }
    }
}

impl BridgeMonitor {
    /// Enters the bridge and returns a permit that leaves it again.
    ///
    /// # Errors
    ///
    /// Propagates the error from [`BridgeMonitor::enter`].
    ///
    /// # Example
    ///
    /// ```rust
    /// use std::sync::Arc;
    /// use bridge_monitor::{BridgeMonitor, TrafficClass};
    ///
    /// let monitor = Arc::new(BridgeMonitor::new());
    /// {
    ///     let _permit = monitor.cross(TrafficClass::Pedestrian)?;
    ///     assert_eq!(monitor.status()?.crossing().pedestrian, 1);
    /// }
    /// assert!(monitor.status()?.is_idle());
    /// # Ok::<(), bridge_monitor::MonitorError>(())
    /// ```
    pub fn cross(self: &Arc<Self>, class: TrafficClass) -> Result<CrossingPermit> {
        self.enter(class)?;
        Ok(CrossingPermit {
            monitor: Arc::clone(self),
            class,
            released: false,
        })
    }
}
