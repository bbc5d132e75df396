//! Production implementations of the transport seams.
//!
//! The bridge targets the in-process playhead (the same state the Tauri
//! commands serve), and the display fans the polled text out to the webview
//! (`transport-tick` event) and the tray tooltip.

use async_trait::async_trait;
use tauri::{AppHandle, Emitter, Manager};

use crate::events::{Action, ACTION_EVENT};
use crate::playhead::Playhead;
use crate::transport::{DisplaySink, TransportBridge, TransportError};

pub struct PlayheadBridge {
    app: AppHandle,
}

impl PlayheadBridge {
    pub fn new(app: AppHandle) -> Self {
        Self { app }
    }
}

#[async_trait]
impl TransportBridge for PlayheadBridge {
    async fn play(&self, playing: bool) -> Result<(), TransportError> {
        self.app.state::<Playhead>().set_playing(playing);
        Ok(())
    }

    async fn current(&self) -> Result<String, TransportError> {
        Ok(self.app.state::<Playhead>().status())
    }

    fn broadcast(&self, action: Action) {
        if let Err(e) = self.app.emit(ACTION_EVENT, action.name()) {
            log::warn!("Failed to broadcast {} action: {}", action.name(), e);
        }
    }
}

/// Event name carrying each polled status string to the webview.
pub const TICK_EVENT: &str = "transport-tick";

pub struct TickDisplay {
    app: AppHandle,
}

impl TickDisplay {
    pub fn new(app: AppHandle) -> Self {
        Self { app }
    }
}

impl DisplaySink for TickDisplay {
    fn set_text(&self, text: &str) {
        if let Err(e) = self.app.emit(TICK_EVENT, text) {
            log::warn!("Failed to emit {}: {}", TICK_EVENT, e);
        }

        if let Some(tray) = self.app.tray_by_id(crate::TRAY_ID) {
            let _ = tray.set_tooltip(Some(text));
        }
    }
}
