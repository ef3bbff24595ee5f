//! Download command definitions.

use crux_core::{capability::Operation, Command};
use serde::{Deserialize, Serialize};
use std::marker::PhantomData;

/// File name used for both QR code downloads
pub const QR_CODE_FILENAME: &str = "wifiQrCode";

// Shell fetches `url` and saves it as `filename`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DownloadOperation {
    pub url: String,
    pub filename: String,
}

impl Operation for DownloadOperation {
    type Output = ();
}

pub struct Download<Effect, Event> {
    _effect: PhantomData<Effect>,
    _event: PhantomData<Event>,
}

impl<Effect, Event> Download<Effect, Event>
where
    Effect: Send + From<crux_core::Request<DownloadOperation>> + 'static,
    Event: Send + 'static,
{
    pub fn qr_code(url: impl Into<String>) -> Command<Effect, Event> {
        Command::notify_shell(DownloadOperation {
            url: url.into(),
            filename: QR_CODE_FILENAME.to_string(),
        })
        .into()
    }
}
