//! [`Host`] backed by the browser window.
//!
//! The host keeps every `Closure` it hands to the browser so a timer can be
//! cancelled and its closure dropped. A closure is never dropped while it runs:
//! finished timers report their id and are reclaimed on the next host call.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::Window;

use crate::error::GreetingError;
use crate::host::{
    Host, IntervalCallback, ListenerHandle, ResizeCallback, TickControl, TimeoutCallback,
    TimerHandle, Viewport,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum TimerKind {
    Timeout,
    Interval,
}

struct BrowserTimer {
    kind: TimerKind,
    browser_id: Rc<Cell<i32>>,
    _closure: Closure<dyn FnMut()>,
}

pub struct BrowserHost {
    window: Window,
    next_id: Cell<u32>,
    timers: RefCell<HashMap<u32, BrowserTimer>>,
    finished: Rc<RefCell<Vec<u32>>>,
    listeners: RefCell<HashMap<u32, Closure<dyn FnMut(web_sys::Event)>>>,
}

impl BrowserHost {
    pub fn new() -> Result<Self, GreetingError> {
        let window = web_sys::window().ok_or(GreetingError::NoWindow)?;
        Ok(Self {
            window,
            next_id: Cell::new(1),
            timers: RefCell::new(HashMap::new()),
            finished: Rc::new(RefCell::new(Vec::new())),
            listeners: RefCell::new(HashMap::new()),
        })
    }

    pub fn window(&self) -> &Window {
        &self.window
    }

    fn bump_id(&self) -> u32 {
        let id = self.next_id.get();
        self.next_id.set(id.wrapping_add(1));
        id
    }

    // Drop closures of timers that already ran to completion.
    fn reclaim(&self) {
        let done: Vec<u32> = self.finished.borrow_mut().drain(..).collect();
        if done.is_empty() {
            return;
        }
        let mut timers = self.timers.borrow_mut();
        for id in done {
            timers.remove(&id);
        }
    }

    fn cancel(&self, timer: &BrowserTimer) {
        match timer.kind {
            TimerKind::Timeout => self.window.clear_timeout_with_handle(timer.browser_id.get()),
            TimerKind::Interval => self.window.clear_interval_with_handle(timer.browser_id.get()),
        }
    }

    fn unsubscribe(&self, closure: &Closure<dyn FnMut(web_sys::Event)>) {
        if let Err(e) = self
            .window
            .remove_event_listener_with_callback("resize", closure.as_ref().unchecked_ref())
        {
            log::warn!("could not unsubscribe from resize: {:?}", GreetingError::from(e));
        }
    }

    fn register(
        &self,
        id: u32,
        kind: TimerKind,
        browser_id: Rc<Cell<i32>>,
        closure: Closure<dyn FnMut()>,
        delay_ms: u32,
    ) -> TimerHandle {
        let delay = delay_ms.min(i32::MAX as u32) as i32;
        let armed = match kind {
            TimerKind::Timeout => self
                .window
                .set_timeout_with_callback_and_timeout_and_arguments_0(
                    closure.as_ref().unchecked_ref(),
                    delay,
                ),
            TimerKind::Interval => self
                .window
                .set_interval_with_callback_and_timeout_and_arguments_0(
                    closure.as_ref().unchecked_ref(),
                    delay,
                ),
        };
        match armed {
            Ok(raw) => {
                browser_id.set(raw);
                self.timers.borrow_mut().insert(
                    id,
                    BrowserTimer {
                        kind,
                        browser_id,
                        _closure: closure,
                    },
                );
            }
            Err(e) => log::warn!("could not arm {kind:?}: {:?}", GreetingError::from(e)),
        }
        TimerHandle(id)
    }
}

fn read_viewport(window: &Window) -> Option<Viewport> {
    let width = window.inner_width().ok()?.as_f64()?;
    let height = window.inner_height().ok()?.as_f64()?;
    Some(Viewport::new(width.max(0.0) as u32, height.max(0.0) as u32))
}

impl Host for BrowserHost {
    fn now_ms(&self) -> f64 {
        self.window.performance().map(|p| p.now()).unwrap_or(0.0)
    }

    fn set_timeout(&self, delay_ms: u32, callback: TimeoutCallback) -> TimerHandle {
        self.reclaim();
        let id = self.bump_id();
        let finished = self.finished.clone();
        let mut slot = Some(callback);
        let closure = Closure::wrap(Box::new(move || {
            let cb = slot.take();
            if let Some(cb) = cb {
                cb();
            }
            finished.borrow_mut().push(id);
        }) as Box<dyn FnMut()>);
        self.register(id, TimerKind::Timeout, Rc::new(Cell::new(0)), closure, delay_ms)
    }

    fn set_interval(&self, period_ms: u32, mut callback: IntervalCallback) -> TimerHandle {
        self.reclaim();
        let id = self.bump_id();
        let finished = self.finished.clone();
        let browser_id = Rc::new(Cell::new(0));
        let own_id = browser_id.clone();
        let window = self.window.clone();
        let mut stopped = false;
        let closure = Closure::wrap(Box::new(move || {
            if stopped {
                return;
            }
            if callback() == TickControl::Stop {
                stopped = true;
                window.clear_interval_with_handle(own_id.get());
                finished.borrow_mut().push(id);
            }
        }) as Box<dyn FnMut()>);
        self.register(id, TimerKind::Interval, browser_id, closure, period_ms)
    }

    fn clear_timer(&self, handle: TimerHandle) {
        self.reclaim();
        let removed = self.timers.borrow_mut().remove(&handle.0);
        if let Some(timer) = removed {
            self.cancel(&timer);
        }
    }

    fn viewport(&self) -> Option<Viewport> {
        read_viewport(&self.window)
    }

    fn on_resize(&self, mut callback: ResizeCallback) -> ListenerHandle {
        let id = self.bump_id();
        let window = self.window.clone();
        let closure = Closure::wrap(Box::new(move |_evt: web_sys::Event| {
            // Unreadable sizes keep the last-known value.
            if let Some(size) = read_viewport(&window) {
                callback(size);
            }
        }) as Box<dyn FnMut(web_sys::Event)>);
        match self
            .window
            .add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref())
        {
            Ok(()) => {
                self.listeners.borrow_mut().insert(id, closure);
            }
            Err(e) => log::warn!("could not subscribe to resize: {:?}", GreetingError::from(e)),
        }
        ListenerHandle(id)
    }

    fn remove_listener(&self, handle: ListenerHandle) {
        let removed = self.listeners.borrow_mut().remove(&handle.0);
        if let Some(closure) = removed {
            self.unsubscribe(&closure);
        }
    }
}

impl Drop for BrowserHost {
    fn drop(&mut self) {
        for (_, timer) in self.timers.borrow_mut().drain() {
            self.cancel(&timer);
        }
        for (_, closure) in self.listeners.borrow_mut().drain() {
            self.unsubscribe(&closure);
        }
    }
}
