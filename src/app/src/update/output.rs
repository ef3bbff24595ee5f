use crux_core::Command;

use crate::events::{Event, OutputEvent};
use crate::model::Model;
use crate::types::QrVariant;
use crate::{DownloadCmd, Effect};

/// Handle output panel events (downloads)
pub fn handle(event: OutputEvent, model: &mut Model) -> Command<Effect, Event> {
    match event {
        OutputEvent::Download(variant) => {
            let Some(qr_code) = model.output.qr_code() else {
                log::warn!("download requested without a generated QR code");
                return Command::done();
            };

            let url = match variant {
                QrVariant::WithPassword => &qr_code.download_url,
                QrVariant::WithoutPassword => &qr_code.image_url,
            };

            DownloadCmd::qr_code(url.clone())
        }
    }
}
