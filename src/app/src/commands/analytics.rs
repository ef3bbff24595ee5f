//! Analytics command definitions.
//!
//! Tracking is fire-and-forget: the Shell forwards the event to its analytics
//! provider and never reports back.

use crux_core::{capability::Operation, Command};
use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, marker::PhantomData};

pub const GENERATED_EVENT: &str = "Generated QR Code";
pub const FAILED_EVENT: &str = "Failed to generate";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum AnalyticsOperation {
    Track {
        name: String,
        properties: BTreeMap<String, String>,
    },
}

impl Operation for AnalyticsOperation {
    type Output = ();
}

/// Command-based analytics API
pub struct Analytics<Effect, Event> {
    _effect: PhantomData<Effect>,
    _event: PhantomData<Event>,
}

impl<Effect, Event> Analytics<Effect, Event>
where
    Effect: Send + From<crux_core::Request<AnalyticsOperation>> + 'static,
    Event: Send + 'static,
{
    /// Track a named event tagged with the submitted prompt
    pub fn track_prompt(name: &str, prompt: impl Into<String>) -> Command<Effect, Event> {
        let properties = BTreeMap::from([("prompt".to_string(), prompt.into())]);

        Command::notify_shell(AnalyticsOperation::Track {
            name: name.to_string(),
            properties,
        })
        .into()
    }
}
