//! DOM rendering for the greeting card.
//!
//! The static tree (card, halo, heart, copy, controls, petals, footer) is built
//! once; [`DomView`] then applies each [`PageSnapshot`] by touching only the
//! nodes whose state changed. Confetti is painted on a full-viewport canvas from
//! a `requestAnimationFrame` loop that only runs while the celebration is on.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, Document, Element, HtmlCanvasElement, Window};

use crate::animation::{self, AnimationSpec};
use crate::config::GreetingConfig;
use crate::confetti::ConfettiField;
use crate::error::GreetingError;
use crate::host::Viewport;
use crate::page::{PageSnapshot, View};
use crate::petals::PetalField;
use crate::rng::SeededRandom;

pub const ROOT_ID: &str = "gc-root";
pub const STYLE_ID: &str = "gc-style";
pub const MESSAGE_ID: &str = "gc-message";
pub const SURPRISE_ID: &str = "surprise";
pub const SURPRISE_PANEL_ID: &str = "gc-surprise-panel";
pub const CELEBRATE_ID: &str = "gc-celebrate";
pub const OPEN_SURPRISE_ID: &str = "gc-open-surprise";
pub const CONFETTI_ID: &str = "gc-confetti";

const BASE_CSS: &str = "\
#gc-root{min-height:100vh;display:flex;align-items:center;justify-content:center;overflow:hidden;\
background:linear-gradient(to bottom right,#fdf2f8,#faf5ff,#e0e7ff);font-family:system-ui,sans-serif;}\
.gc-card{position:relative;max-width:48rem;margin:0 auto;padding:2rem;border-radius:1.5rem;\
backdrop-filter:blur(12px);background:rgba(255,255,255,0.6);box-shadow:0 25px 50px -12px rgba(0,0,0,0.25);\
border:1px solid rgba(255,255,255,0.3);}\
.gc-row{display:flex;flex-wrap:wrap;align-items:center;justify-content:center;gap:1.5rem;}\
.gc-badge{width:14rem;height:14rem;border-radius:1rem;display:flex;align-items:center;justify-content:center;position:relative;}\
.gc-halo{position:absolute;inset:0;}\
.gc-heart{position:relative;z-index:10;width:10rem;height:10rem;border-radius:0.75rem;display:flex;\
align-items:center;justify-content:center;background:linear-gradient(to bottom right,#f9a8d4,#f87171);\
box-shadow:0 10px 15px -3px rgba(0,0,0,0.1);}\
.gc-copy{flex:1;min-width:16rem;}\
.gc-copy h1{font-size:2.5rem;font-weight:800;letter-spacing:-0.025em;color:#111827;margin:0;}\
.gc-copy p{margin-top:1rem;font-size:1.125rem;color:#374151;line-height:1.625;min-height:3.5rem;}\
.gc-actions{margin-top:1.5rem;display:flex;flex-wrap:wrap;gap:0.75rem;}\
.gc-button{padding:0.75rem 1.5rem;border-radius:9999px;border:none;cursor:pointer;color:#fff;font-weight:600;\
background:linear-gradient(to right,#ec4899,#f43f5e);box-shadow:0 4px 6px -1px rgba(0,0,0,0.1);transition:transform .15s;}\
.gc-button:hover,.gc-button:focus-visible{transform:scale(1.05);}\
.gc-link{padding:0.75rem 1.5rem;border-radius:9999px;border:1px solid #fbcfe8;font-weight:500;color:inherit;\
text-decoration:none;transition:background .15s;}\
.gc-link:hover,.gc-link:focus-visible{background:#fdf2f8;}\
#surprise{margin-top:1.5rem;opacity:0;}\
#gc-surprise-panel{display:none;padding:1rem;border-radius:0.75rem;background:rgba(255,255,255,0.8);\
border:1px solid rgba(255,255,255,0.3);box-shadow:inset 0 2px 4px rgba(0,0,0,0.05);font-size:0.875rem;color:#4b5563;}\
.gc-petals{pointer-events:none;position:absolute;inset:0;z-index:-10;}\
#gc-confetti{position:fixed;inset:0;pointer-events:none;z-index:50;display:none;}\
.gc-footer{position:absolute;bottom:1.5rem;font-size:0.75rem;color:#4b5563;}";

const HALO_SVG: &str = "<svg viewBox='0 0 120 120' width='100%' height='100%'><defs>\
<linearGradient id='gc-g1' x1='0' x2='1'><stop offset='0%' stop-color='#ff9a9e'/>\
<stop offset='100%' stop-color='#fad0c4'/></linearGradient></defs>\
<circle cx='60' cy='60' r='54' stroke='url(#gc-g1)' stroke-width='6' fill='transparent' \
stroke-linecap='round' stroke-dasharray='10 8'/></svg>";

const HEART_SVG: &str = "<svg viewBox='0 0 24 24' width='80' height='80'><path fill='white' \
d='M12 21s-7.5-4.8-10-8.1C-0.3 7.7 4.1 2 8.8 4.2 10.5 5 12 6.4 12 6.4s1.5-1.4 3.2-2.2C19.9 2 24.3 7.7 22 12.9 19.5 16.2 12 21 12 21z'/></svg>";

/// Whole stylesheet: layout, fixed transitions, and one loop per petal.
pub fn stylesheet(petals: &PetalField) -> String {
    let fixed = animation::page_animations();
    let drifting = petals.animations();
    let specs: Vec<&AnimationSpec> = fixed.iter().chain(drifting.iter()).collect();
    format!("{BASE_CSS}\n{}", animation::stylesheet(specs))
}

/// Card markup. Copy is filled in with `set_text_content` afterwards so no
/// config text is ever parsed as HTML.
pub fn skeleton_html(petals: &PetalField) -> String {
    let petal_divs: String = petals
        .petals()
        .iter()
        .map(|p| {
            format!(
                "<div class='{}' style='{}'></div>",
                p.animation().class_name(),
                p.style()
            )
        })
        .collect();
    let class = |name: &str| format!("gc-{name}");
    format!(
        "<canvas id='{CONFETTI_ID}'></canvas>\
         <div class='gc-card'>\
           <div class='gc-row {card}'>\
             <div class='gc-badge'>\
               <div class='gc-halo {halo}'>{HALO_SVG}</div>\
               <div class='gc-heart {heart}'>{HEART_SVG}</div>\
             </div>\
             <div class='gc-copy'>\
               <h1 class='{headline}'></h1>\
               <p class='{message}'><span id='{MESSAGE_ID}'></span></p>\
               <div class='gc-actions'>\
                 <button type='button' id='{CELEBRATE_ID}' class='gc-button'></button>\
                 <a id='{OPEN_SURPRISE_ID}' class='gc-link'></a>\
               </div>\
               <div id='{SURPRISE_ID}'><div id='{SURPRISE_PANEL_ID}'></div></div>\
             </div>\
           </div>\
           <div class='gc-petals' aria-hidden='true'>{petal_divs}</div>\
         </div>\
         <footer class='gc-footer'></footer>",
        card = class(animation::CARD_ENTER),
        halo = class(animation::HALO_SPIN),
        heart = class(animation::HEART_PULSE),
        headline = class(animation::HEADLINE_RISE),
        message = class(animation::MESSAGE_RISE),
    )
}

fn by_id(doc: &Document, id: &str) -> Result<Element, GreetingError> {
    doc.get_element_by_id(id)
        .ok_or_else(|| GreetingError::Dom(format!("missing #{id}")))
}

// For render-time updates, where a failed attribute write only costs a frame of styling.
fn set_attr(el: &Element, name: &str, value: &str) {
    if let Err(e) = el.set_attribute(name, value) {
        log::warn!("could not set {name}={value:?}: {:?}", GreetingError::from(e));
    }
}

fn set_text(root: &Element, selector: &str, text: &str) -> Result<(), GreetingError> {
    if let Some(el) = root.query_selector(selector)? {
        el.set_text_content(Some(text));
    }
    Ok(())
}

/// The two user controls, for the caller to attach click handlers to.
pub struct Controls {
    pub celebrate: Element,
    pub open_surprise: Element,
}

/// Build the card under `document.body`, replacing an earlier one.
pub fn build(
    doc: &Document,
    config: &GreetingConfig,
    petals: &PetalField,
    rng: SeededRandom,
) -> Result<(DomView, Controls), GreetingError> {
    let body = doc.body().ok_or(GreetingError::NoBody)?;
    for stale in [ROOT_ID, STYLE_ID] {
        if let Some(el) = doc.get_element_by_id(stale) {
            el.remove();
        }
    }

    let style = doc.create_element("style")?;
    style.set_id(STYLE_ID);
    style.set_text_content(Some(&stylesheet(petals)));
    if let Some(head) = doc.head() {
        head.append_child(&style)?;
    } else {
        body.append_child(&style)?;
    }

    let root = doc.create_element("div")?;
    root.set_id(ROOT_ID);
    root.set_inner_html(&skeleton_html(petals));
    body.append_child(&root)?;

    set_text(&root, "h1", &config.headline)?;
    set_text(&root, ".gc-footer", &config.footer)?;
    let celebrate = by_id(doc, CELEBRATE_ID)?;
    celebrate.set_text_content(Some(&config.celebrate_label));
    let open_surprise = by_id(doc, OPEN_SURPRISE_ID)?;
    open_surprise.set_text_content(Some(&config.surprise_label));
    open_surprise.set_attribute("href", config.surprise_href())?;
    let panel = by_id(doc, SURPRISE_PANEL_ID)?;
    let note = doc.create_element("p")?;
    note.set_text_content(Some(&config.surprise_text));
    note.set_attribute("style", "margin:0;")?;
    panel.append_child(&note)?;

    let canvas: HtmlCanvasElement = by_id(doc, CONFETTI_ID)?.dyn_into().map_err(|_| {
        GreetingError::Dom(format!("#{CONFETTI_ID} is not a canvas"))
    })?;
    let ctx: CanvasRenderingContext2d = canvas
        .get_context("2d")?
        .ok_or_else(|| GreetingError::Dom("no 2d context".into()))?
        .dyn_into()
        .map_err(|_| GreetingError::Dom("unexpected context type".into()))?;
    let window = web_sys::window().ok_or(GreetingError::NoWindow)?;

    let view = DomView {
        root,
        message: by_id(doc, MESSAGE_ID)?,
        surprise: by_id(doc, SURPRISE_ID)?,
        panel,
        confetti: ConfettiLayer::new(window, canvas, ctx, config.confetti_pieces, rng),
        last: None,
    };
    Ok((view, Controls {
        celebrate,
        open_surprise,
    }))
}

pub struct DomView {
    root: Element,
    message: Element,
    surprise: Element,
    panel: Element,
    confetti: Rc<ConfettiLayer>,
    last: Option<PageSnapshot>,
}

impl DomView {
    /// Detach the card from the document and stop confetti.
    pub fn remove(&self) {
        self.confetti.stop();
        self.root.remove();
    }
}

impl View for DomView {
    fn render(&mut self, snapshot: &PageSnapshot) {
        let prev = self.last.take();
        let changed = |f: fn(&PageSnapshot) -> bool| prev.as_ref().is_none_or(|p| f(p) != f(snapshot));

        if prev
            .as_ref()
            .is_none_or(|p| p.displayed_message != snapshot.displayed_message)
        {
            self.message.set_text_content(Some(&snapshot.displayed_message));
        }
        if prev.as_ref().is_none_or(|p| p.viewport != snapshot.viewport) {
            self.confetti.resize(snapshot.viewport);
        }
        if changed(|s| s.revealed) && snapshot.revealed {
            set_attr(&self.surprise, "class", &format!("gc-{}", animation::SURPRISE_FADE));
            set_attr(&self.panel, "style", "display:block;");
        }
        if changed(|s| s.celebrating) {
            if snapshot.celebrating {
                self.confetti.start();
            } else {
                self.confetti.stop();
            }
        }
        self.last = Some(snapshot.clone());
    }
}

type FrameCallback = Closure<dyn FnMut(f64)>;

/// Canvas painter for [`ConfettiField`].
struct ConfettiLayer {
    window: Window,
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    pieces: usize,
    rng: RefCell<SeededRandom>,
    field: RefCell<Option<ConfettiField>>,
    bounds: Cell<Viewport>,
    running: Cell<bool>,
    // Id of a requested frame that has not run yet.
    pending_frame: Cell<Option<i32>>,
    last_ts: Cell<Option<f64>>,
    frame: RefCell<Option<FrameCallback>>,
}

impl ConfettiLayer {
    fn new(
        window: Window,
        canvas: HtmlCanvasElement,
        ctx: CanvasRenderingContext2d,
        pieces: usize,
        rng: SeededRandom,
    ) -> Rc<Self> {
        let layer = Rc::new(Self {
            window,
            canvas,
            ctx,
            pieces,
            rng: RefCell::new(rng),
            field: RefCell::new(None),
            bounds: Cell::new(Viewport::default()),
            running: Cell::new(false),
            pending_frame: Cell::new(None),
            last_ts: Cell::new(None),
            frame: RefCell::new(None),
        });
        let weak: Weak<Self> = Rc::downgrade(&layer);
        *layer.frame.borrow_mut() = Some(Closure::wrap(Box::new(move |ts: f64| {
            if let Some(layer) = weak.upgrade() {
                layer.on_frame(ts);
            }
        }) as Box<dyn FnMut(f64)>));
        layer
    }

    fn resize(&self, bounds: Viewport) {
        self.bounds.set(bounds);
        self.canvas.set_width(bounds.width);
        self.canvas.set_height(bounds.height);
        if let Some(field) = self.field.borrow_mut().as_mut() {
            field.resize(bounds);
        }
    }

    fn start(&self) {
        if self.running.replace(true) {
            return;
        }
        let field = ConfettiField::new(self.bounds.get(), self.pieces, &mut *self.rng.borrow_mut());
        *self.field.borrow_mut() = Some(field);
        self.last_ts.set(None);
        set_attr(&self.canvas, "style", "display:block;");
        self.request_frame();
    }

    /// Halt the loop and hide the canvas. A queued frame is cancelled.
    fn stop(&self) {
        self.running.set(false);
        self.cancel_frame();
        self.hide();
    }

    fn hide(&self) {
        self.field.borrow_mut().take();
        self.clear();
        set_attr(&self.canvas, "style", "display:none;");
    }

    fn request_frame(&self) {
        if self.pending_frame.get().is_some() {
            return;
        }
        let requested = match self.frame.borrow().as_ref() {
            Some(cb) => self.window.request_animation_frame(cb.as_ref().unchecked_ref()),
            None => return,
        };
        match requested {
            Ok(id) => self.pending_frame.set(Some(id)),
            Err(e) => log::warn!("could not request confetti frame: {:?}", GreetingError::from(e)),
        }
    }

    fn cancel_frame(&self) {
        if let Some(id) = self.pending_frame.take() {
            if let Err(e) = self.window.cancel_animation_frame(id) {
                log::warn!("could not cancel confetti frame {id}: {:?}", GreetingError::from(e));
            }
        }
    }

    fn on_frame(&self, ts: f64) {
        self.pending_frame.set(None);
        if !self.running.get() {
            self.hide();
            return;
        }
        let dt = self.last_ts.replace(Some(ts)).map_or(0.0, |prev| ts - prev);
        if let Some(field) = self.field.borrow_mut().as_mut() {
            field.step(dt, &mut *self.rng.borrow_mut());
            self.paint(field);
        }
        self.request_frame();
    }

    fn clear(&self) {
        let b = self.bounds.get();
        self.ctx.clear_rect(0.0, 0.0, b.width as f64, b.height as f64);
    }

    fn paint(&self, field: &ConfettiField) {
        self.clear();
        for p in field.pieces() {
            self.ctx.save();
            if let Err(e) = self
                .ctx
                .translate(p.x, p.y)
                .and_then(|()| self.ctx.rotate(p.angle))
            {
                log::warn!("confetti transform failed: {:?}", GreetingError::from(e));
                self.ctx.restore();
                return;
            }
            self.ctx.set_fill_style_str(p.color);
            self.ctx
                .fill_rect(-p.width / 2.0, -p.height / 2.0, p.width, p.height);
            self.ctx.restore();
        }
    }
}

impl Drop for ConfettiLayer {
    fn drop(&mut self) {
        self.cancel_frame();
    }
}
