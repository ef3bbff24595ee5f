use crux_core::{render::render, Command};

use crate::commands::analytics::{FAILED_EVENT, GENERATED_EVENT};
use crate::events::{Event, FormEvent};
use crate::model::Model;
use crate::types::{FormField, GenerateResponse, OutputState};
use crate::update_field;
use crate::{
    build_url, process_json_response, AnalyticsCmd, Effect, HttpCmd, NavigationCmd,
    GENERATE_ACTION, GENERATE_ENDPOINT,
};

/// Handle generation form events
pub fn handle(event: FormEvent, model: &mut Model) -> Command<Effect, Event> {
    match event {
        FormEvent::UpdateField { field, value } => handle_update_field(field, value, model),

        // picker is disabled while a request is in flight
        FormEvent::SelectSuggestion(_) if model.is_loading => Command::done(),
        FormEvent::SelectSuggestion(suggestion) => update_field!(model.form.prompt, suggestion),

        FormEvent::Submit => handle_submit(model),

        FormEvent::GenerateResponse { prompt, result } => {
            handle_generate_response(prompt, result, model)
        }
    }
}

/// Apply user input and re-validate only the edited field
fn handle_update_field(
    field: FormField,
    value: String,
    model: &mut Model,
) -> Command<Effect, Event> {
    model.form.set(field, value);

    let key = field.key();
    match model.form.field_errors().remove(key) {
        Some(message) => {
            model.field_errors.insert(key.to_string(), message);
        }
        None => {
            model.field_errors.remove(key);
        }
    }

    render()
}

fn handle_submit(model: &mut Model) -> Command<Effect, Event> {
    // submit button is disabled while loading
    if model.is_loading {
        return Command::done();
    }

    let errors = model.form.field_errors();
    if !errors.is_empty() {
        log::debug!("generate form invalid: {errors:?}");
        model.field_errors = errors;
        return render();
    }

    model.field_errors.clear();
    model.start_loading();
    model.output = OutputState::Pending;

    let prompt = model.form.prompt.clone();

    match HttpCmd::post(build_url(GENERATE_ENDPOINT))
        .header("Content-Type", "application/json")
        .body_json(&model.form)
    {
        Ok(builder) => Command::all([
            render(),
            builder.build().then_send(move |result| {
                let result = process_json_response(GENERATE_ACTION, result);
                Event::Form(FormEvent::GenerateResponse { prompt, result })
            }),
        ]),
        Err(e) => {
            model.set_error_and_render(format!("Failed to create {GENERATE_ACTION} request: {e}"))
        }
    }
}

fn handle_generate_response(
    prompt: String,
    result: Result<GenerateResponse, String>,
    model: &mut Model,
) -> Command<Effect, Event> {
    match result {
        Ok(response) => {
            model.stop_loading();
            Command::all([
                AnalyticsCmd::track_prompt(GENERATED_EVENT, prompt),
                NavigationCmd::results(&response.id),
                render(),
            ])
        }
        Err(e) => {
            log::error!("{e}");
            model.set_error(e);
            Command::all([AnalyticsCmd::track_prompt(FAILED_EVENT, prompt), render()])
        }
    }
}
