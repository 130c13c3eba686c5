//! # Bridge Monitor
//!
//! Composes the shared counters, the admission predicates and the turn
//! policy into a blocking wait/signal protocol.
//!
//! ## Protocol
//!
//! ```text
//!  enter(class)                         leave(class)
//!  ────────────                         ────────────
//!  lock                                 lock
//!  waiting[class] += 1                  crossing[class] -= 1
//!  wait on cv[class] until can_cross    turn = policy(waiting)
//!  waiting[class] -= 1                  notify_all on every cv
//!  crossing[class] += 1                 unlock
//!  unlock
//! ```
//!
//! Each class waits on its own condition variable, all tied to the same
//! mutex. Every leave wakes every class: woken entities re-check their
//! own predicate and go back to sleep if it still fails.
//!
//! ## Ordering
//!
//! No FIFO order is kept within a class. Across classes only the policy
//! thresholds decide who goes first.
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//! use std::thread;
//! use bridge_monitor::{BridgeMonitor, Direction};
//!
//! let monitor = Arc::new(BridgeMonitor::new());
//! monitor.enter_car(Direction::North)?;
//!
//! // A pedestrian has to wait for the car to leave.
//! let walker = {
//!     let monitor = Arc::clone(&monitor);
//!     thread::spawn(move || -> bridge_monitor::Result<()> {
//!         monitor.enter_pedestrian()?;
//!         monitor.leave_pedestrian()
//!     })
//! };
//!
//! monitor.leave_car(Direction::North)?;
//! walker.join().unwrap()?;
//! assert!(monitor.status()?.is_idle());
//! # Ok::<(), bridge_monitor::MonitorError>(())
//! ```

use std::fmt;
use std::sync::{Arc, Condvar, Mutex, MutexGuard};

use tracing::{debug, warn};

use crate::class::{Direction, TrafficClass};
use crate::error::{MonitorError, Result};
use crate::policy::TurnPolicy;
use crate::state::BridgeState;
use crate::trace::{BridgeEvent, BridgeObserver, EventKind};

/// Monitor guarding a one-lane bridge.
///
/// # Thread Safety
///
/// `BridgeMonitor` is `Send + Sync`. Share one instance between all
/// entities through an [`Arc`].
pub struct BridgeMonitor {
    /// Counters and turn. Only touched with the lock held.
    state: Mutex<BridgeState>,
    /// Northbound cars wait here.
    north: Condvar,
    /// Southbound cars wait here.
    south: Condvar,
    /// Pedestrians wait here.
    pedestrian: Condvar,
    /// Threshold rule applied on every leave.
    policy: TurnPolicy,
    /// Optional transition sink.
    observer: Option<Arc<dyn BridgeObserver>>,
}

impl BridgeMonitor {
    /// Creates a monitor with the default [`TurnPolicy`].
    #[must_use]
    pub fn new() -> Self {
        Self::with_policy(TurnPolicy::default())
    }

    /// Creates a monitor with custom thresholds.
    ///
    /// # Example
    ///
    /// ```rust
    /// use bridge_monitor::{BridgeMonitor, TurnPolicy};
    ///
    /// let policy = TurnPolicy::new().with_car_threshold(3);
    /// let monitor = BridgeMonitor::with_policy(policy);
    /// assert_eq!(monitor.policy().car_threshold, 3);
    /// ```
    #[must_use]
    pub fn with_policy(policy: TurnPolicy) -> Self {
        Self {
            state: Mutex::new(BridgeState::new()),
            north: Condvar::new(),
            south: Condvar::new(),
            pedestrian: Condvar::new(),
            policy,
            observer: None,
        }
    }

    /// Attaches an observer that sees every transition.
    #[must_use]
    pub fn with_observer(mut self, observer: Arc<dyn BridgeObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    /// Returns the thresholds in use.
    #[inline]
    #[must_use]
    pub const fn policy(&self) -> &TurnPolicy {
        &self.policy
    }

    /// Blocks until `class` may cross, then puts it on the bridge.
    ///
    /// # Errors
    ///
    /// Returns [`MonitorError::Poisoned`] if another thread panicked
    /// while holding the monitor lock.
    pub fn enter(&self, class: TrafficClass) -> Result<()> {
        let mut state = self.lock()?;
        state.record_operation();
        state.add_waiting(class);
        self.emit(EventKind::Requested, class, &state);

        let mut state = self
            .condvar(class)
            .wait_while(state, |state| !state.can_cross(class))
            .map_err(|_| MonitorError::Poisoned)?;

        state.admit(class);
        debug!("{class} admitted: {}", *state);
        self.emit(EventKind::Admitted, class, &state);
        Ok(())
    }

    /// Takes `class` off the bridge, reassigns the turn and wakes every
    /// waiting entity.
    ///
    /// # Errors
    ///
    /// - [`MonitorError::NotCrossing`] if no entity of `class` is on the
    ///   bridge. Nothing is changed and nobody is woken.
    /// - [`MonitorError::Poisoned`] if the lock is poisoned.
    pub fn leave(&self, class: TrafficClass) -> Result<()> {
        let mut state = self.lock()?;
        if let Err(err) = state.release(class) {
            warn!("rejected leave: {err}");
            return Err(err);
        }
        state.record_operation();

        let previous = state.turn();
        let next = self.policy.assign(&state.waiting());
        state.set_turn(next);
        if previous != next {
            debug!("turn {previous} -> {next} (waiting {})", state.waiting());
        }
        debug!("{class} left: {}", *state);
        self.emit(EventKind::Left, class, &state);

        self.north.notify_all();
        self.south.notify_all();
        self.pedestrian.notify_all();
        Ok(())
    }

    /// Blocks until a car heading `direction` may cross.
    ///
    /// # Errors
    ///
    /// See [`enter`](Self::enter).
    pub fn enter_car(&self, direction: Direction) -> Result<()> {
        self.enter(TrafficClass::Car(direction))
    }

    /// Takes a car heading `direction` off the bridge.
    ///
    /// # Errors
    ///
    /// See [`leave`](Self::leave).
    pub fn leave_car(&self, direction: Direction) -> Result<()> {
        self.leave(TrafficClass::Car(direction))
    }

    /// Blocks until a pedestrian may cross.
    ///
    /// # Errors
    ///
    /// See [`enter`](Self::enter).
    pub fn enter_pedestrian(&self) -> Result<()> {
        self.enter(TrafficClass::Pedestrian)
    }

    /// Takes a pedestrian off the bridge.
    ///
    /// # Errors
    ///
    /// See [`leave`](Self::leave).
    pub fn leave_pedestrian(&self) -> Result<()> {
        self.leave(TrafficClass::Pedestrian)
    }

    /// Returns a snapshot of the current state.
    ///
    /// # Errors
    ///
    /// Returns [`MonitorError::Poisoned`] if the lock is poisoned.
    pub fn status(&self) -> Result<BridgeState> {
        self.lock().map(|state| *state)
    }

    fn lock(&self) -> Result<MutexGuard<'_, BridgeState>> {
        self.state.lock().map_err(|_| MonitorError::Poisoned)
    }

    const fn condvar(&self, class: TrafficClass) -> &Condvar {
        match class {
            TrafficClass::Car(Direction::North) => &self.north,
            TrafficClass::Car(Direction::South) => &self.south,
            TrafficClass::Pedestrian => &self.pedestrian,
        }
    }

    fn emit(&self, kind: EventKind, class: TrafficClass, state: &BridgeState) {
        if let Some(observer) = &self.observer {
            observer.on_event(&BridgeEvent {
                kind,
                class,
                state: *state,
            });
        }
    }
}

impl Default for BridgeMonitor {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for BridgeMonitor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BridgeMonitor")
            .field("state", &self.state)
            .field("policy", &self.policy)
            .field("observed", &self.observer.is_some())
            .finish_non_exhaustive()
    }
}
