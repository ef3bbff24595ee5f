mod form;
mod output;

use crux_core::{render::render, Command};

use crate::events::Event;
use crate::model::Model;
use crate::Effect;

/// Main update dispatcher - routes events to domain-specific handlers
pub fn update(event: Event, model: &mut Model) -> Command<Effect, Event> {
    match event {
        Event::Initialize(result) => {
            model.apply_result(result);
            render()
        }
        Event::Form(form_event) => form::handle(form_event, model),
        Event::Output(output_event) => output::handle(output_event, model),
    }
}
