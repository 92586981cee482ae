use crate::constants::{DECK_ID, DIAL_KNOB_ID, METER_ID, PLAYING_CLASS, REMAINING_ID};
use crate::dom;
use crate::markup::markup_for;
use deck_core::DeckSnapshot;

/// Push a session snapshot into the page.
pub fn render(snapshot: &DeckSnapshot) {
    let Some(document) = dom::window_document() else {
        return;
    };
    let m = markup_for(snapshot);

    dom::set_text(&document, REMAINING_ID, &m.clock_text);

    if let Some(knob) = dom::html_element(&document, DIAL_KNOB_ID) {
        let style = knob.style();
        _ = style.set_property("transition", m.dial_transition);
        _ = style.set_property("transform", &m.dial_transform);
    }

    if let Some(meter) = dom::html_element(&document, METER_ID) {
        _ = meter.style().set_property("height", &m.meter_height);
        _ = meter.set_attribute("data-lit", &m.meter_lit.to_string());
    }

    if let Some(deck) = document.get_element_by_id(DECK_ID) {
        _ = deck
            .class_list()
            .toggle_with_force(PLAYING_CLASS, m.playing);
    }
}
