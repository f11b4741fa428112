//! Browser driver
//!
//! Runs one simulation step per animation frame, latches keyboard state from
//! window listeners, and hands each frame's snapshot to JS as JSON. `stop()`
//! cancels the pending frame and removes every listener it registered.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use wasm_bindgen::prelude::*;
use web_sys::KeyboardEvent;

use crate::input::KeyBindings;
use crate::ledger::Ledger;
use crate::session::Session;
use crate::settings::Settings;
use crate::sim::SessionOutcome;
use crate::tuning::Tuning;

type KeyClosure = Closure<dyn FnMut(KeyboardEvent)>;

struct Driver {
    session: Session,
    bindings: KeyBindings,
    outcome: Rc<Cell<Option<SessionOutcome>>>,
    on_frame: js_sys::Function,
    on_end: js_sys::Function,
    frame_cb: Option<Closure<dyn FnMut(f64)>>,
    key_down: Option<KeyClosure>,
    key_up: Option<KeyClosure>,
    raf_id: Option<i32>,
    running: bool,
}

fn window() -> Result<web_sys::Window, JsValue> {
    web_sys::window().ok_or_else(|| JsValue::from_str("no window"))
}

fn js_error(e: serde_json::Error) -> JsValue {
    JsValue::from_str(&e.to_string())
}

#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        web_sys::console::warn_1(&"Logger already initialized".into());
    }
}

/// A session driven by the browser's frame loop
#[wasm_bindgen]
pub struct WebSession {
    driver: Rc<RefCell<Driver>>,
}

#[wasm_bindgen]
impl WebSession {
    /// `on_frame(snapshotJson)` runs after every step; `on_end(outcomeJson)`
    /// runs once when the session ends.
    #[wasm_bindgen(constructor)]
    pub fn new(
        settings_json: Option<String>,
        tuning_json: Option<String>,
        on_frame: js_sys::Function,
        on_end: js_sys::Function,
    ) -> Result<WebSession, JsValue> {
        let mut settings = match settings_json {
            Some(json) => Settings::from_json(&json).map_err(js_error)?,
            None => Settings::default(),
        };
        if settings.seed.is_none() {
            settings.seed = Some(js_sys::Date::now() as u64);
        }
        let tuning = match tuning_json {
            Some(json) => Tuning::from_json(&json).map_err(js_error)?,
            None => Tuning::default(),
        };

        let outcome = Rc::new(Cell::new(None));
        let mut session = Session::new(&settings, tuning);
        let sink = outcome.clone();
        session.set_on_end(move |o| sink.set(Some(o)));

        let driver = Driver {
            session,
            bindings: settings.bindings,
            outcome,
            on_frame,
            on_end,
            frame_cb: None,
            key_down: None,
            key_up: None,
            raf_id: None,
            running: false,
        };
        Ok(WebSession {
            driver: Rc::new(RefCell::new(driver)),
        })
    }

    /// Register listeners and schedule the first frame
    pub fn start(&self) -> Result<(), JsValue> {
        let window = window()?;
        {
            let mut d = self.driver.borrow_mut();
            if d.running {
                return Ok(());
            }
            d.running = true;

            let weak = Rc::downgrade(&self.driver);
            let key_down = KeyClosure::new(move |event: KeyboardEvent| {
                with_driver(&weak, |d| {
                    if d.session.latch_mut().key_down(&d.bindings, &event.key()) {
                        event.prevent_default();
                    }
                });
            });
            let weak = Rc::downgrade(&self.driver);
            let key_up = KeyClosure::new(move |event: KeyboardEvent| {
                with_driver(&weak, |d| {
                    d.session.latch_mut().key_up(&d.bindings, &event.key());
                });
            });
            window.add_event_listener_with_callback("keydown", key_down.as_ref().unchecked_ref())?;
            window.add_event_listener_with_callback("keyup", key_up.as_ref().unchecked_ref())?;
            d.key_down = Some(key_down);
            d.key_up = Some(key_up);

            let weak = Rc::downgrade(&self.driver);
            d.frame_cb = Some(Closure::new(move |_time: f64| {
                if let Some(driver) = weak.upgrade() {
                    frame(&driver);
                }
            }));
        }
        log::info!("Delve Extract running");
        schedule(&self.driver)
    }

    /// Cancel the frame loop and remove listeners. Idempotent.
    pub fn stop(&self) {
        let mut d = self.driver.borrow_mut();
        teardown(&mut d);
        d.session.stop();
    }

    /// Loot menu decision from on-screen buttons
    pub fn accept_loot(&self) {
        self.driver
            .borrow_mut()
            .session
            .latch_mut()
            .press(crate::input::Action::AcceptLoot);
    }

    pub fn discard_loot(&self) {
        self.driver
            .borrow_mut()
            .session
            .latch_mut()
            .press(crate::input::Action::DiscardLoot);
    }

    /// Release held keys (e.g. on window blur)
    pub fn clear_input(&self) {
        self.driver.borrow_mut().session.latch_mut().clear();
    }

    pub fn snapshot_json(&self) -> Result<String, JsValue> {
        self.driver.borrow().session.snapshot().to_json().map_err(js_error)
    }

    /// Lifetime totals from LocalStorage as JSON
    pub fn ledger_json() -> Result<String, JsValue> {
        Ledger::load().to_json().map_err(js_error)
    }
}

fn with_driver(weak: &Weak<RefCell<Driver>>, f: impl FnOnce(&mut Driver)) {
    if let Some(driver) = weak.upgrade() {
        if let Ok(mut d) = driver.try_borrow_mut() {
            f(&mut d);
        }
    }
}

fn schedule(driver: &Rc<RefCell<Driver>>) -> Result<(), JsValue> {
    let window = window()?;
    let mut d = driver.borrow_mut();
    if !d.running {
        return Ok(());
    }
    let Some(cb) = d.frame_cb.as_ref() else {
        return Ok(());
    };
    let id = window.request_animation_frame(cb.as_ref().unchecked_ref())?;
    d.raf_id = Some(id);
    Ok(())
}

fn teardown(d: &mut Driver) {
    if !d.running {
        return;
    }
    d.running = false;
    if let Ok(window) = window() {
        if let Some(id) = d.raf_id.take() {
            let _ = window.cancel_animation_frame(id);
        }
        if let Some(cb) = d.key_down.take() {
            let _ = window.remove_event_listener_with_callback("keydown", cb.as_ref().unchecked_ref());
        }
        if let Some(cb) = d.key_up.take() {
            let _ = window.remove_event_listener_with_callback("keyup", cb.as_ref().unchecked_ref());
        }
    }
    log::info!("Frame loop and listeners released");
}

fn frame(driver: &Rc<RefCell<Driver>>) {
    // JS callbacks run with the borrow released so they may call back in
    let (on_frame, snapshot, ended) = {
        let mut d = driver.borrow_mut();
        d.raf_id = None;
        if !d.running {
            return;
        }
        d.session.step();
        let snapshot = d.session.snapshot().to_json();
        let ended = d.outcome.take();
        if ended.is_some() {
            teardown(&mut d);
        }
        (d.on_frame.clone(), snapshot, ended.map(|o| (o, d.on_end.clone())))
    };

    match snapshot {
        Ok(json) => {
            let _ = on_frame.call1(&JsValue::NULL, &JsValue::from_str(&json));
        }
        Err(e) => log::error!("Snapshot serialization failed: {}", e),
    }

    if let Some((outcome, on_end)) = ended {
        let mut ledger = Ledger::load();
        ledger.record(&outcome);
        ledger.save();
        match serde_json::to_string(&outcome) {
            Ok(json) => {
                let _ = on_end.call1(&JsValue::NULL, &JsValue::from_str(&json));
            }
            Err(e) => log::error!("Outcome serialization failed: {}", e),
        }
        return;
    }

    if let Err(e) = schedule(driver) {
        log::error!("Could not schedule next frame: {:?}", e);
    }
}
