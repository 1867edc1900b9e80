//! The greeting page view model.
//!
//! [`GreetingPage`] owns the transient state (viewport, reveal, typing,
//! celebration), wires it to a [`Host`]'s timers and resize events, and pushes
//! a [`PageSnapshot`] to its [`View`] whenever something visible changes.
//!
//! Host callbacks only hold a `Weak` to the state. Teardown (explicit or on
//! drop) clears every timer and listener it armed, and marks the state so a
//! callback that slips through cannot mutate or render.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use crate::celebration::CelebrationTrigger;
use crate::config::GreetingConfig;
use crate::host::{Host, ListenerHandle, TickControl, TimerHandle, Viewport};
use crate::reveal::RevealScheduler;
use crate::typing::TypingEmitter;
use crate::viewport::ViewportTracker;

/// Everything a renderer needs to draw the dynamic parts of the page.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PageSnapshot {
    pub viewport: Viewport,
    pub revealed: bool,
    pub celebrating: bool,
    pub displayed_message: String,
    pub typing_complete: bool,
}

pub trait View {
    fn render(&mut self, snapshot: &PageSnapshot);
}

struct PageState {
    viewport: ViewportTracker,
    reveal: RevealScheduler,
    typing: TypingEmitter<String>,
    celebration: CelebrationTrigger,
    view: Box<dyn View>,
    torn_down: bool,
}

impl PageState {
    fn snapshot(&self) -> PageSnapshot {
        let revealed = self.reveal.is_revealed();
        PageSnapshot {
            viewport: self.viewport.current(),
            revealed,
            celebrating: self.celebration.is_active(),
            displayed_message: self.typing.displayed(revealed).to_string(),
            typing_complete: self.typing.is_complete(),
        }
    }

    fn render(&mut self) {
        let snapshot = self.snapshot();
        self.view.render(&snapshot);
    }
}

/// Run `f` against live state; `None` once the page is gone or torn down.
fn with_live<R>(state: &Weak<RefCell<PageState>>, f: impl FnOnce(&mut PageState) -> R) -> Option<R> {
    let state = state.upgrade()?;
    let mut state = state.borrow_mut();
    if state.torn_down {
        return None;
    }
    Some(f(&mut state))
}

#[derive(Default)]
struct Registrations {
    reveal: Option<TimerHandle>,
    typing: Option<TimerHandle>,
    celebration: Option<TimerHandle>,
    resize: Option<ListenerHandle>,
}

pub struct GreetingPage<H: Host> {
    host: Rc<H>,
    config: GreetingConfig,
    state: Rc<RefCell<PageState>>,
    registrations: Registrations,
}

impl<H: Host> GreetingPage<H> {
    /// Build the state, render once and start the reveal and typing timelines.
    pub fn mount(host: Rc<H>, config: GreetingConfig, view: Box<dyn View>) -> Self {
        let config = config.sanitized();
        let state = Rc::new(RefCell::new(PageState {
            viewport: ViewportTracker::new(host.viewport()),
            reveal: RevealScheduler::new(),
            typing: TypingEmitter::new(config.message.clone()),
            celebration: CelebrationTrigger::new(),
            view,
            torn_down: false,
        }));
        let mut page = Self {
            host,
            config,
            state,
            registrations: Registrations::default(),
        };
        page.subscribe_resize();
        page.arm_reveal();
        page.start_typing();
        page.state.borrow_mut().render();
        log::info!(
            "greeting mounted at {:?}, reveal in {}ms",
            page.state.borrow().viewport.current(),
            page.config.reveal_delay_ms
        );
        page
    }

    pub fn config(&self) -> &GreetingConfig {
        &self.config
    }

    pub fn is_mounted(&self) -> bool {
        !self.state.borrow().torn_down
    }

    pub fn snapshot(&self) -> PageSnapshot {
        self.state.borrow().snapshot()
    }

    fn subscribe_resize(&mut self) {
        let weak = Rc::downgrade(&self.state);
        let handle = self.host.on_resize(Box::new(move |size| {
            with_live(&weak, |s| {
                if s.viewport.update(Some(size)) {
                    s.render();
                }
            });
        }));
        self.registrations.resize = Some(handle);
    }

    fn arm_reveal(&mut self) {
        let weak = Rc::downgrade(&self.state);
        let handle = self.host.set_timeout(
            self.config.reveal_delay_ms,
            Box::new(move || {
                with_live(&weak, |s| {
                    if s.reveal.reveal() {
                        log::debug!("reveal timer elapsed");
                        s.render();
                    }
                });
            }),
        );
        self.registrations.reveal = Some(handle);
    }

    fn start_typing(&mut self) {
        if self.state.borrow().typing.is_complete() {
            return;
        }
        let weak = Rc::downgrade(&self.state);
        let handle = self.host.set_interval(
            self.config.typing_tick_ms,
            Box::new(move || {
                with_live(&weak, |s| {
                    // Once revealed the full text is on screen; typed progress no longer matters.
                    if s.reveal.is_revealed() {
                        return TickControl::Stop;
                    }
                    if s.typing.advance().is_some() {
                        s.render();
                    }
                    if s.typing.is_complete() {
                        TickControl::Stop
                    } else {
                        TickControl::Continue
                    }
                })
                .unwrap_or(TickControl::Stop)
            }),
        );
        self.registrations.typing = Some(handle);
    }

    /// "Open surprise": reveal now. The pending reveal timer stays armed and is
    /// a no-op when it fires.
    pub fn open_surprise(&mut self) {
        with_live(&Rc::downgrade(&self.state), |s| {
            if s.reveal.reveal() {
                log::debug!("surprise opened by user");
                s.render();
            }
        });
    }

    /// "Launch celebration": show confetti and (re)start the auto-reset window.
    pub fn launch_celebration(&mut self) {
        let Some(generation) = with_live(&Rc::downgrade(&self.state), |s| {
            let generation = s.celebration.activate();
            s.render();
            generation
        }) else {
            return;
        };
        if let Some(previous) = self.registrations.celebration.take() {
            self.host.clear_timer(previous);
        }
        let weak = Rc::downgrade(&self.state);
        let handle = self.host.set_timeout(
            self.config.celebration_ms,
            Box::new(move || {
                with_live(&weak, |s| {
                    if s.celebration.expire(generation) {
                        log::debug!("celebration {generation} expired");
                        s.render();
                    }
                });
            }),
        );
        self.registrations.celebration = Some(handle);
        log::info!("celebration {generation} launched for {}ms", self.config.celebration_ms);
    }

    /// Release every timer and listener. Safe to call more than once.
    pub fn teardown(&mut self) {
        let Registrations {
            reveal,
            typing,
            celebration,
            resize,
        } = std::mem::take(&mut self.registrations);
        for handle in [reveal, typing, celebration].into_iter().flatten() {
            self.host.clear_timer(handle);
        }
        if let Some(listener) = resize {
            self.host.remove_listener(listener);
        }
        let mut state = self.state.borrow_mut();
        if !state.torn_down {
            state.torn_down = true;
            log::info!("greeting torn down");
        }
    }
}

impl<H: Host> Drop for GreetingPage<H> {
    fn drop(&mut self) {
        self.teardown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::ManualHost;

    struct Counting(Rc<RefCell<usize>>);

    impl View for Counting {
        fn render(&mut self, _snapshot: &PageSnapshot) {
            *self.0.borrow_mut() += 1;
        }
    }

    fn mount_hi(host: &Rc<ManualHost>) -> (GreetingPage<ManualHost>, Rc<RefCell<usize>>) {
        let renders = Rc::new(RefCell::new(0));
        let config = GreetingConfig {
            message: "Hi".into(),
            ..GreetingConfig::default()
        };
        let page = GreetingPage::mount(host.clone(), config, Box::new(Counting(renders.clone())));
        (page, renders)
    }

    #[test]
    fn mount_renders_empty_prefix() {
        let host = Rc::new(ManualHost::default());
        let (page, renders) = mount_hi(&host);
        assert_eq!(*renders.borrow(), 1);
        let snap = page.snapshot();
        assert_eq!(snap.displayed_message, "");
        assert!(!snap.revealed);
        assert!(!snap.celebrating);
        assert_eq!(snap.viewport, Viewport::new(1280, 720));
    }

    #[test]
    fn typing_interval_stops_itself_when_complete() {
        let host = Rc::new(ManualHost::default());
        let (page, _) = mount_hi(&host);
        host.advance(80);
        assert!(page.snapshot().typing_complete);
        // Only the reveal timer remains.
        assert_eq!(host.pending_timers(), 1);
    }

    #[test]
    fn drop_releases_everything() {
        let host = Rc::new(ManualHost::default());
        {
            let (mut page, _) = mount_hi(&host);
            page.launch_celebration();
            assert_eq!(host.pending_timers(), 3);
            assert_eq!(host.listener_count(), 1);
        }
        assert_eq!(host.pending_timers(), 0);
        assert_eq!(host.listener_count(), 0);
    }

    #[test]
    fn empty_message_never_starts_typing() {
        let host = Rc::new(ManualHost::default());
        let config = GreetingConfig {
            message: String::new(),
            ..GreetingConfig::default()
        };
        let renders = Rc::new(RefCell::new(0));
        let page = GreetingPage::mount(host.clone(), config, Box::new(Counting(renders)));
        assert!(page.snapshot().typing_complete);
        assert_eq!(host.pending_timers(), 1);
    }
}
