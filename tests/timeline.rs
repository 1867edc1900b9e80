// Integration tests (native) for the page timelines.
// These drive GreetingPage through ManualHost's virtual clock and avoid
// wasm/browser APIs so they run under `cargo test` on the host.

use std::cell::RefCell;
use std::rc::Rc;

use greeting_card::{GreetingConfig, GreetingPage, ManualHost, PageSnapshot, View, Viewport};

#[derive(Clone, Default)]
struct Recorder(Rc<RefCell<Vec<PageSnapshot>>>);

impl Recorder {
    fn count(&self) -> usize {
        self.0.borrow().len()
    }

    fn messages(&self) -> Vec<String> {
        self.0.borrow().iter().map(|s| s.displayed_message.clone()).collect()
    }
}

impl View for Recorder {
    fn render(&mut self, snapshot: &PageSnapshot) {
        self.0.borrow_mut().push(snapshot.clone());
    }
}

fn mount(message: &str) -> (Rc<ManualHost>, GreetingPage<ManualHost>, Recorder) {
    let host = Rc::new(ManualHost::new(Some(Viewport::new(1024, 768))));
    let recorder = Recorder::default();
    let config = GreetingConfig {
        message: message.to_string(),
        ..GreetingConfig::default()
    };
    let page = GreetingPage::mount(host.clone(), config, Box::new(recorder.clone()));
    (host, page, recorder)
}

#[test]
fn reveal_flips_after_800ms_without_user_action() {
    let (host, page, _) = mount("Hi");
    host.advance(799);
    assert!(!page.snapshot().revealed);
    host.advance(1);
    assert!(page.snapshot().revealed);
    host.advance(10_000);
    assert!(page.snapshot().revealed);
}

#[test]
fn open_surprise_reveals_immediately() {
    let (host, mut page, _) = mount("A long message that is still typing");
    host.advance(40);
    page.open_surprise();
    let snap = page.snapshot();
    assert!(snap.revealed);
    assert_eq!(snap.displayed_message, "A long message that is still typing");
    // The reveal timer still fires later without changing anything.
    host.advance(1_000);
    assert!(page.snapshot().revealed);
}

#[test]
fn typing_example_hi() {
    let (host, page, _) = mount("Hi");
    assert_eq!(page.snapshot().displayed_message, "");
    host.advance(40);
    assert_eq!(page.snapshot().displayed_message, "H");
    host.advance(40);
    assert_eq!(page.snapshot().displayed_message, "Hi");
    assert!(page.snapshot().typing_complete);
    host.advance(400);
    assert_eq!(page.snapshot().displayed_message, "Hi");
}

#[test]
fn reveal_mid_typing_shows_full_text() {
    let (host, mut page, _) = mount("Hi");
    host.advance(60);
    assert_eq!(page.snapshot().displayed_message, "H");
    page.open_surprise();
    assert_eq!(page.snapshot().displayed_message, "Hi");
}

#[test]
fn typed_prefix_is_monotonic_and_bounded() {
    let message = "Ты — моё вдохновение.";
    let (host, page, recorder) = mount(message);
    let total = message.chars().count();
    // Stay under the reveal delay so every render comes from typing.
    for _ in 0..19 {
        host.advance(40);
    }
    let msgs = recorder.messages();
    for pair in msgs.windows(2) {
        assert!(pair[1].chars().count() >= pair[0].chars().count());
        assert!(pair[1].starts_with(pair[0].as_str()));
    }
    assert!(msgs.iter().all(|m| m.chars().count() <= total));
    assert!(message.starts_with(page.snapshot().displayed_message.as_str()));
}

#[test]
fn full_text_after_len_ticks_with_slow_reveal() {
    let message = "Спасибо, что ты есть рядом.";
    let host = Rc::new(ManualHost::default());
    let config = GreetingConfig {
        message: message.to_string(),
        reveal_delay_ms: 60_000,
        ..GreetingConfig::default()
    };
    let page = GreetingPage::mount(host.clone(), config, Box::new(Recorder::default()));
    host.advance(message.chars().count() as u64 * 40);
    let snap = page.snapshot();
    assert!(!snap.revealed);
    assert!(snap.typing_complete);
    assert_eq!(snap.displayed_message, message);
}

#[test]
fn celebration_expires_after_6000ms() {
    let (host, mut page, _) = mount("Hi");
    page.launch_celebration();
    assert!(page.snapshot().celebrating);
    host.advance(5_999);
    assert!(page.snapshot().celebrating);
    host.advance(1);
    assert!(!page.snapshot().celebrating);
}

#[test]
fn reactivation_restarts_the_window() {
    let (host, mut page, _) = mount("Hi");
    page.launch_celebration();
    host.advance(4_000);
    page.launch_celebration();
    host.advance(2_500);
    assert!(page.snapshot().celebrating, "first reset must not end the second window");
    host.advance(3_499);
    assert!(page.snapshot().celebrating);
    host.advance(1);
    assert!(!page.snapshot().celebrating);
}

#[test]
fn rapid_reactivation_keeps_one_reset_pending() {
    let (host, mut page, _) = mount("");
    for _ in 0..10 {
        page.launch_celebration();
    }
    // reveal timer + a single celebration reset
    assert_eq!(host.pending_timers(), 2);
    host.advance(6_000);
    assert!(!page.snapshot().celebrating);
}

#[test]
fn teardown_cancels_everything_and_freezes_state() {
    let (host, mut page, recorder) = mount("Hello there");
    page.launch_celebration();
    host.advance(40);
    let before = page.snapshot();
    let renders = recorder.count();

    page.teardown();
    assert!(!page.is_mounted());
    assert_eq!(host.pending_timers(), 0);
    assert_eq!(host.listener_count(), 0);

    host.advance(10_000);
    host.resize(10, 10);
    page.open_surprise();
    page.launch_celebration();
    assert_eq!(page.snapshot(), before);
    assert_eq!(recorder.count(), renders);
    assert_eq!(host.pending_timers(), 0);
}

#[test]
fn teardown_before_reveal_delay_prevents_reveal() {
    let (host, mut page, _) = mount("Hi");
    host.advance(500);
    page.teardown();
    host.advance(1_000);
    assert!(!page.snapshot().revealed);
}

#[test]
fn resize_updates_viewport_exactly() {
    let (host, page, recorder) = mount("Hi");
    assert_eq!(page.snapshot().viewport, Viewport::new(1024, 768));
    host.resize(1920, 1080);
    assert_eq!(page.snapshot().viewport, Viewport::new(1920, 1080));
    host.resize(375, 812);
    assert_eq!(page.snapshot().viewport, Viewport::new(375, 812));
    assert_eq!(recorder.0.borrow().last().unwrap().viewport, Viewport::new(375, 812));
}

#[test]
fn missing_viewport_falls_back_to_zero() {
    let host = Rc::new(ManualHost::new(None));
    let page = GreetingPage::mount(host, GreetingConfig::default(), Box::new(Recorder::default()));
    assert_eq!(page.snapshot().viewport, Viewport::new(0, 0));
}
