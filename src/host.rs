//! Host environment capability.
//!
//! Everything the page needs from the outside world (timers, window size and
//! resize notifications) goes through [`Host`]. The browser implementation lives
//! in [`crate::browser`]; [`ManualHost`] runs on a virtual clock so the reveal,
//! typing and celebration timelines can be exercised natively.

use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;

/// Window dimensions in CSS pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimerHandle(pub u32);

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ListenerHandle(pub u32);

/// Returned by interval callbacks to keep or stop the interval.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TickControl {
    Continue,
    Stop,
}

pub type TimeoutCallback = Box<dyn FnOnce()>;
pub type IntervalCallback = Box<dyn FnMut() -> TickControl>;
pub type ResizeCallback = Box<dyn FnMut(Viewport)>;

/// Timers and viewport access for a single-threaded event loop.
///
/// Clearing a handle that already fired (or was already cleared) is a no-op.
pub trait Host {
    fn now_ms(&self) -> f64;
    fn set_timeout(&self, delay_ms: u32, callback: TimeoutCallback) -> TimerHandle;
    fn set_interval(&self, period_ms: u32, callback: IntervalCallback) -> TimerHandle;
    fn clear_timer(&self, handle: TimerHandle);
    /// `None` when the environment cannot report a size.
    fn viewport(&self) -> Option<Viewport>;
    fn on_resize(&self, callback: ResizeCallback) -> ListenerHandle;
    fn remove_listener(&self, handle: ListenerHandle);
}

enum ManualTask {
    Once(TimeoutCallback),
    Repeat { period_ms: u64, callback: IntervalCallback },
}

struct ManualTimer {
    handle: TimerHandle,
    task: ManualTask,
}

/// Deterministic host driven by [`ManualHost::advance`].
///
/// Timers due at the same instant fire in the order they were armed. Callbacks
/// run with no internal borrow held, so they may arm or clear other timers.
pub struct ManualHost {
    now: Cell<u64>,
    next_id: Cell<u32>,
    // (deadline, arming sequence) -> timer
    timers: RefCell<BTreeMap<(u64, u32), ManualTimer>>,
    viewport: Cell<Option<Viewport>>,
    listeners: RefCell<BTreeMap<ListenerHandle, Option<ResizeCallback>>>,
    // Interval currently out of the map while its callback runs, and whether
    // that callback cleared it.
    ticking: Cell<Option<TimerHandle>>,
    ticking_cleared: Cell<bool>,
}

impl ManualHost {
    pub fn new(viewport: Option<Viewport>) -> Self {
        Self {
            now: Cell::new(0),
            next_id: Cell::new(1),
            timers: RefCell::new(BTreeMap::new()),
            viewport: Cell::new(viewport),
            listeners: RefCell::new(BTreeMap::new()),
            ticking: Cell::new(None),
            ticking_cleared: Cell::new(false),
        }
    }

    pub fn elapsed_ms(&self) -> u64 {
        self.now.get()
    }

    pub fn pending_timers(&self) -> usize {
        self.timers.borrow().len()
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.borrow().len()
    }

    /// Move the clock forward, firing every timer that comes due on the way.
    pub fn advance(&self, ms: u64) {
        let target = self.now.get() + ms;
        loop {
            let next = {
                let mut timers = self.timers.borrow_mut();
                match timers.keys().next().copied() {
                    Some(key) if key.0 <= target => timers.remove(&key).map(|t| (key.0, t)),
                    _ => None,
                }
            };
            let Some((deadline, timer)) = next else { break };
            self.now.set(deadline);
            match timer.task {
                ManualTask::Once(cb) => cb(),
                ManualTask::Repeat {
                    period_ms,
                    mut callback,
                } => {
                    self.ticking.set(Some(timer.handle));
                    self.ticking_cleared.set(false);
                    let control = callback();
                    self.ticking.set(None);
                    if control == TickControl::Continue && !self.ticking_cleared.get() {
                        let seq = self.bump_id();
                        self.timers.borrow_mut().insert(
                            (deadline + period_ms, seq),
                            ManualTimer {
                                handle: timer.handle,
                                task: ManualTask::Repeat { period_ms, callback },
                            },
                        );
                    }
                }
            }
        }
        self.now.set(target);
    }

    /// Report a new window size to every subscribed listener.
    pub fn resize(&self, width: u32, height: u32) {
        let size = Viewport::new(width, height);
        self.viewport.set(Some(size));
        let handles: Vec<ListenerHandle> = self.listeners.borrow().keys().copied().collect();
        for handle in handles {
            // Take the callback out while it runs; it may remove itself.
            let cb = self
                .listeners
                .borrow_mut()
                .get_mut(&handle)
                .and_then(Option::take);
            if let Some(mut cb) = cb {
                cb(size);
                if let Some(slot) = self.listeners.borrow_mut().get_mut(&handle) {
                    *slot = Some(cb);
                }
            }
        }
    }

    fn bump_id(&self) -> u32 {
        let id = self.next_id.get();
        self.next_id.set(id.wrapping_add(1));
        id
    }

    fn arm(&self, delay_ms: u64, task: ManualTask) -> TimerHandle {
        let seq = self.bump_id();
        let handle = TimerHandle(seq);
        self.timers
            .borrow_mut()
            .insert((self.now.get() + delay_ms, seq), ManualTimer { handle, task });
        handle
    }
}

impl Default for ManualHost {
    fn default() -> Self {
        Self::new(Some(Viewport::new(1280, 720)))
    }
}

impl Host for ManualHost {
    fn now_ms(&self) -> f64 {
        self.now.get() as f64
    }

    fn set_timeout(&self, delay_ms: u32, callback: TimeoutCallback) -> TimerHandle {
        self.arm(delay_ms as u64, ManualTask::Once(callback))
    }

    fn set_interval(&self, period_ms: u32, callback: IntervalCallback) -> TimerHandle {
        // A zero period would never let the clock move forward.
        let period_ms = (period_ms as u64).max(1);
        self.arm(period_ms, ManualTask::Repeat { period_ms, callback })
    }

    fn clear_timer(&self, handle: TimerHandle) {
        if self.ticking.get() == Some(handle) {
            self.ticking_cleared.set(true);
        }
        self.timers.borrow_mut().retain(|_, t| t.handle != handle);
    }

    fn viewport(&self) -> Option<Viewport> {
        self.viewport.get()
    }

    fn on_resize(&self, callback: ResizeCallback) -> ListenerHandle {
        let handle = ListenerHandle(self.bump_id());
        self.listeners.borrow_mut().insert(handle, Some(callback));
        handle
    }

    fn remove_listener(&self, handle: ListenerHandle) {
        self.listeners.borrow_mut().remove(&handle);
    }
}
