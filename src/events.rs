use crate::audio::WebTransport;
use crate::constants::{DIAL_KNOB_ID, PLAY_BUTTON_ID, STOP_BUTTON_ID};
use crate::dom;
use crate::lifecycle::{page_exit, rejection_stops_playback, PageExit};
use crate::scheduler::WebScheduler;
use crate::view;
use deck_core::PlaybackSession;
use std::cell::RefCell;
use std::rc::{Rc, Weak};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

pub type Deck = PlaybackSession<WebTransport, WebScheduler>;
pub type DeckRef = Rc<RefCell<Deck>>;
pub type WeakDeck = Weak<RefCell<Deck>>;

/// Run `f` against the live session, then re-render.
///
/// Callbacks that fire after teardown, or while another callback still holds
/// the session, are dropped.
pub fn with_deck<R>(deck: &WeakDeck, f: impl FnOnce(&mut Deck) -> R) -> Option<R> {
    let deck = deck.upgrade()?;
    let Ok(mut d) = deck.try_borrow_mut() else {
        log::warn!("[events] session busy, callback dropped");
        return None;
    };
    let out = f(&mut d);
    view::render(&d.snapshot());
    Some(out)
}

pub fn countdown_callback(deck: WeakDeck) -> impl FnMut() + 'static {
    move || {
        with_deck(&deck, |d| d.on_countdown_tick());
    }
}

pub fn frame_callback(deck: WeakDeck) -> impl FnMut() + 'static {
    move || {
        with_deck(&deck, |d| d.on_frame());
    }
}

/// A blocked `play()` leaves the element silent; stop so the countdown
/// does not run without audio.
pub fn play_rejected_callback(deck: WeakDeck) -> impl Fn(String) + 'static {
    move |name| {
        if !rejection_stops_playback(&name) {
            return;
        }
        with_deck(&deck, |d| {
            log::warn!("[events] playback blocked ({}), stopping", name);
            d.stop();
        });
    }
}

pub fn wire_transport_buttons(document: &web::Document, deck: &WeakDeck) {
    let deck_play = deck.clone();
    dom::add_click_listener(document, PLAY_BUTTON_ID, move || {
        with_deck(&deck_play, |d| {
            if let Err(e) = d.play() {
                log::error!("[events] play failed: {}", e);
            }
        });
    });

    let deck_stop = deck.clone();
    dom::add_click_listener(document, STOP_BUTTON_ID, move || {
        with_deck(&deck_stop, |d| d.stop());
    });
}

pub fn wire_audio_ended(element: &web::HtmlAudioElement, deck: &WeakDeck) {
    let deck = deck.clone();
    let closure = Closure::wrap(Box::new(move || {
        with_deck(&deck, |d| d.on_audio_ended());
    }) as Box<dyn FnMut()>);
    _ = element.add_event_listener_with_callback("ended", closure.as_ref().unchecked_ref());
    closure.forget();
}

pub fn wire_dial(document: &web::Document, deck: &WeakDeck) {
    let Some(knob) = document.get_element_by_id(DIAL_KNOB_ID) else {
        log::warn!("[dom] missing #{}", DIAL_KNOB_ID);
        return;
    };
    wire_dial_pointerdown(&knob, deck);
    wire_dial_pointermove(&knob, deck);
    wire_dial_pointerup(&knob, deck, "pointerup");
    wire_dial_pointerup(&knob, deck, "pointercancel");
}

fn wire_dial_pointerdown(knob: &web::Element, deck: &WeakDeck) {
    let deck = deck.clone();
    let knob_for_listener = knob.clone();
    let knob = knob.clone();
    let closure = Closure::wrap(Box::new(move |ev: web::PointerEvent| {
        let center = dom::element_center(&knob);
        let pointer = dom::pointer_client(&ev);
        let dragging = with_deck(&deck, |d| {
            d.dial_pointer_down(pointer, center);
            d.dial_state().is_dragging
        })
        .unwrap_or(false);
        if dragging {
            _ = knob.set_pointer_capture(ev.pointer_id());
            ev.prevent_default();
        }
    }) as Box<dyn FnMut(_)>);
    _ = knob_for_listener
        .add_event_listener_with_callback("pointerdown", closure.as_ref().unchecked_ref());
    closure.forget();
}

fn wire_dial_pointermove(knob: &web::Element, deck: &WeakDeck) {
    let deck = deck.clone();
    let knob_for_listener = knob.clone();
    let knob = knob.clone();
    let closure = Closure::wrap(Box::new(move |ev: web::PointerEvent| {
        let center = dom::element_center(&knob);
        let pointer = dom::pointer_client(&ev);
        with_deck(&deck, |d| d.dial_pointer_move(pointer, center));
    }) as Box<dyn FnMut(_)>);
    _ = knob_for_listener
        .add_event_listener_with_callback("pointermove", closure.as_ref().unchecked_ref());
    closure.forget();
}

fn wire_dial_pointerup(knob: &web::Element, deck: &WeakDeck, event: &str) {
    let deck = deck.clone();
    let closure = Closure::wrap(Box::new(move |_ev: web::PointerEvent| {
        with_deck(&deck, |d| d.dial_pointer_up());
    }) as Box<dyn FnMut(_)>);
    _ = knob.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref());
    closure.forget();
}

/// Tear the session down when the page goes away for good. Pages frozen
/// into the back/forward cache keep their session for the restore.
pub fn wire_teardown(window: &web::Window, take_deck: impl Fn() -> Option<DeckRef> + 'static) {
    let closure = Closure::wrap(Box::new(move |ev: web::PageTransitionEvent| {
        if page_exit(ev.persisted()) == PageExit::Frozen {
            log::info!("[events] page frozen, session kept");
            return;
        }
        if let Some(deck) = take_deck() {
            if let Ok(mut d) = deck.try_borrow_mut() {
                d.teardown();
            }
        }
    }) as Box<dyn FnMut(_)>);
    _ = window.add_event_listener_with_callback("pagehide", closure.as_ref().unchecked_ref());
    closure.forget();
}
