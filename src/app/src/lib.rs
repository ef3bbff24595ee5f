pub mod commands;
pub mod events;
pub mod http_helpers;
pub mod macros;
pub mod model;
pub mod types;
pub mod update;


#[cfg(target_arch = "wasm32")]
pub mod wasm;

use crux_core::Command;

// Re-export core types
pub use crate::{
    commands::{
        analytics::AnalyticsOperation, download::DownloadOperation,
        navigation::NavigateOperation,
    },
    events::{Event, FormEvent, OutputEvent, RESULT_ELEMENT_ID},
    http_helpers::{
        build_url, extract_error_message, failure_message, is_response_success, map_http_error,
        parse_json_response, process_json_response, BASE_URL, GENERATE_ACTION, GENERATE_ENDPOINT,
    },
    model::{Model, OutputView, ViewModel},
    types::*,
};
pub use crux_http::Result as HttpResult;

#[crux_macros::effect(typegen)]
pub enum Effect {
    Render(crux_core::render::RenderOperation),
    Http(crux_http::protocol::HttpRequest),
    Analytics(AnalyticsOperation),
    Navigate(NavigateOperation),
    Download(DownloadOperation),
}

pub type HttpCmd = crux_http::command::Http<Effect, Event>;
pub type AnalyticsCmd = crate::commands::analytics::Analytics<Effect, Event>;
pub type NavigationCmd = crate::commands::navigation::Navigation<Effect, Event>;
pub type DownloadCmd = crate::commands::download::Download<Effect, Event>;

/// The Core application
#[derive(Default)]
pub struct App;

impl crux_core::App for App {
    type Event = Event;
    type Model = Model;
    type ViewModel = ViewModel;
    type Effect = Effect;

    fn update(&self, event: Self::Event, model: &mut Self::Model) -> Command<Effect, Event> {
        update::update(event, model)
    }

    fn view(&self, model: &Self::Model) -> Self::ViewModel {
        model.view()
    }
}
