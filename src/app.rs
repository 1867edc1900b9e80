//! Browser wiring: one mounted greeting per document.

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::Element;

use crate::browser::BrowserHost;
use crate::config;
use crate::dom::{self, DomView};
use crate::error::GreetingError;
use crate::page::{GreetingPage, PageSnapshot, View};
use crate::petals::PetalField;
use crate::rng::SeededRandom;

/// Forwards renders to the DOM view while letting the app keep a handle on it
/// for removal.
struct SharedView(Rc<RefCell<DomView>>);

impl View for SharedView {
    fn render(&mut self, snapshot: &PageSnapshot) {
        self.0.borrow_mut().render(snapshot);
    }
}

struct ClickListener {
    target: Element,
    closure: Closure<dyn FnMut(web_sys::MouseEvent)>,
}

impl Drop for ClickListener {
    fn drop(&mut self) {
        if let Err(e) = self
            .target
            .remove_event_listener_with_callback("click", self.closure.as_ref().unchecked_ref())
        {
            log::warn!("could not remove click listener: {:?}", GreetingError::from(e));
        }
    }
}

struct Mounted {
    page: GreetingPage<BrowserHost>,
    view: Rc<RefCell<DomView>>,
    _listeners: Vec<ClickListener>,
}

impl Drop for Mounted {
    fn drop(&mut self) {
        self.page.teardown();
        self.view.borrow().remove();
    }
}

thread_local! {
    static MOUNTED: RefCell<Option<Mounted>> = const { RefCell::new(None) };
}

fn with_page(f: impl FnOnce(&mut GreetingPage<BrowserHost>)) {
    MOUNTED.with(|cell| {
        if let Some(m) = cell.borrow_mut().as_mut() {
            f(&mut m.page);
        }
    });
}

fn on_click(
    target: &Element,
    action: fn(&mut GreetingPage<BrowserHost>),
) -> Result<ClickListener, GreetingError> {
    let closure = Closure::wrap(Box::new(move |_evt: web_sys::MouseEvent| {
        with_page(action);
    }) as Box<dyn FnMut(_)>);
    target.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
    Ok(ClickListener {
        target: target.clone(),
        closure,
    })
}

/// Mount the card on `document.body`, replacing any earlier mount.
pub fn start() -> Result<(), GreetingError> {
    stop();
    let host = Rc::new(BrowserHost::new()?);
    let doc = host.window().document().ok_or(GreetingError::NoDocument)?;
    let config = config::load_from_document(&doc).sanitized();

    let mut rng = SeededRandom::from_entropy();
    let petals = PetalField::generate(config.petal_count, &mut rng);
    let (view, controls) = dom::build(&doc, &config, &petals, rng)?;
    let view = Rc::new(RefCell::new(view));

    let listeners = vec![
        on_click(&controls.celebrate, GreetingPage::launch_celebration)?,
        on_click(&controls.open_surprise, GreetingPage::open_surprise)?,
    ];
    let page = GreetingPage::mount(host, config, Box::new(SharedView(view.clone())));
    MOUNTED.with(|cell| {
        cell.replace(Some(Mounted {
            page,
            view,
            _listeners: listeners,
        }))
    });
    Ok(())
}

/// Tear down and remove the card. No-op when nothing is mounted.
pub fn stop() {
    // Drop outside the borrow: teardown may run arbitrary host code.
    let previous = MOUNTED.with(|cell| cell.borrow_mut().take());
    if previous.is_some() {
        log::info!("removing greeting");
    }
    drop(previous);
}

pub fn launch_celebration() {
    with_page(GreetingPage::launch_celebration);
}

pub fn open_surprise() {
    with_page(GreetingPage::open_surprise);
}
