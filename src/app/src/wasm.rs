//! WebAssembly FFI bindings for the Crux Core
//!
//! Startup order for the browser shell:
//! 1. read the text of the `generation-result` JSON script the server embeds
//!    in every form page ([`crate::RESULT_ELEMENT_ID`])
//! 2. pass it to [`initialize`] and run the returned effects
//! 3. from then on forward user input through [`process_event`] and effect
//!    outputs through [`handle_response`]
//!
//! Events, effects and responses cross the boundary bincode-serialized.

use lazy_static::lazy_static;
use wasm_bindgen::prelude::wasm_bindgen;

use crux_core::{
    bridge::{BincodeFfiFormat, Bridge, EffectId, FfiFormat},
    Core,
};

use crate::{App, Event};

lazy_static! {
    static ref CORE: Bridge<App> = Bridge::new(Core::new());
}

#[wasm_bindgen(start)]
pub fn init_wasm() {
    console_log::init_with_level(log::Level::Debug).expect("Failed to initialize logger");
}

/// Start the core from the server-rendered page
///
/// `embedded_result` is the JSON text of the `generation-result` element; the
/// start page embeds `"NoResult"`, `/results/{id}` the stored QR code.
#[wasm_bindgen]
pub fn initialize(embedded_result: &str) -> Vec<u8> {
    let mut event = Vec::new();
    BincodeFfiFormat::serialize(&mut event, &Event::initialize_from_embedded(embedded_result))
        .expect("Failed to serialize Initialize event");
    process_event(&event)
}

/// Process a bincode-serialized Event, returning the Effects it requested
#[wasm_bindgen]
pub fn process_event(event_bytes: &[u8]) -> Vec<u8> {
    let mut effects = Vec::new();
    CORE.update(event_bytes, &mut effects)
        .expect("Failed to process event");
    effects
}

/// Current ViewModel, bincode-serialized
#[wasm_bindgen]
pub fn view() -> Vec<u8> {
    let mut view = Vec::new();
    CORE.view(&mut view).expect("Failed to get view model");
    view
}

/// Resolve effect `id` (HTTP reply, analytics, navigation, download) with its
/// serialized output; returns the follow-up Effects
#[wasm_bindgen]
pub fn handle_response(id: u32, response_bytes: &[u8]) -> Vec<u8> {
    let mut effects = Vec::new();
    CORE.resolve(EffectId(id), response_bytes, &mut effects)
        .expect("Failed to handle response");
    effects
}
