//! Navigation command definitions.

use crux_core::{capability::Operation, Command};
use serde::{Deserialize, Serialize};
use std::marker::PhantomData;

// Shell replaces the current location with `path`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NavigateOperation {
    pub path: String,
}

impl Operation for NavigateOperation {
    type Output = ();
}

pub struct Navigation<Effect, Event> {
    _effect: PhantomData<Effect>,
    _event: PhantomData<Event>,
}

impl<Effect, Event> Navigation<Effect, Event>
where
    Effect: Send + From<crux_core::Request<NavigateOperation>> + 'static,
    Event: Send + 'static,
{
    pub fn push(path: impl Into<String>) -> Command<Effect, Event> {
        Command::notify_shell(NavigateOperation { path: path.into() }).into()
    }

    /// Navigate to the shareable page of a generated result
    pub fn results(id: &str) -> Command<Effect, Event> {
        Self::push(results_path(id))
    }
}

pub fn results_path(id: &str) -> String {
    format!("/results/{id}")
}
