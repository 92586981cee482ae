#![cfg(target_arch = "wasm32")]
use deck_core::{PlaybackSession, SessionConfig};
use std::cell::RefCell;
use std::rc::Rc;
use std::sync::atomic::{AtomicBool, Ordering};
use wasm_bindgen::prelude::*;
use web_sys as web;

mod audio;
mod constants;
mod dom;
mod events;
mod lifecycle;
mod markup;
mod scheduler;
mod view;

use events::{DeckRef, WeakDeck};

thread_local! {
    // Sole strong owner; every listener holds a Weak.
    static DECK: RefCell<Option<DeckRef>> = const { RefCell::new(None) };
}

fn take_deck() -> Option<DeckRef> {
    DECK.with(|d| d.borrow_mut().take())
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
    log::info!("deck-web starting");

    if let Err(e) = init() {
        log::error!("init error: {:?}", e);
    }
    Ok(())
}

fn init() -> anyhow::Result<()> {
    static STARTED: AtomicBool = AtomicBool::new(false);
    if STARTED.swap(true, Ordering::SeqCst) {
        return Ok(());
    }

    let window = web::window().ok_or_else(|| anyhow::anyhow!("no window"))?;
    let document = window
        .document()
        .ok_or_else(|| anyhow::anyhow!("no document"))?;

    // Audio element exists from mount; the AudioContext waits for the first Play
    let element = audio::create_element()?;
    let config = SessionConfig::default();

    let deck: DeckRef = Rc::new_cyclic(|weak: &WeakDeck| {
        let transport = audio::WebTransport::new(
            element.clone(),
            events::play_rejected_callback(weak.clone()),
        );
        let scheduler = scheduler::WebScheduler::new(
            window.clone(),
            events::countdown_callback(weak.clone()),
            events::frame_callback(weak.clone()),
        );
        RefCell::new(PlaybackSession::new(transport, scheduler, &config))
    });
    let weak = Rc::downgrade(&deck);

    events::wire_transport_buttons(&document, &weak);
    events::wire_audio_ended(&element, &weak);
    events::wire_dial(&document, &weak);
    events::wire_teardown(&window, take_deck);

    view::render(&deck.borrow().snapshot());
    log::info!(
        "[deck] ready duration={:.0}min",
        deck.borrow().configured_minutes()
    );
    DECK.with(|d| *d.borrow_mut() = Some(deck));
    Ok(())
}
