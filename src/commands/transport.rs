//! Tauri commands for the playback backend.
//!
//! This is the whole command surface: the frontend forwards its toggle flag
//! through `play` and polls the clock through `current`.

use tauri::State;

use crate::playhead::Playhead;

/// Forward the playing flag from the frontend toggle.
#[tauri::command]
pub fn play(playing: bool, playhead: State<'_, Playhead>) {
    log::info!("play command: playing={}", playing);
    playhead.set_playing(playing);
}

/// Current transport status, polled every tick.
#[tauri::command]
pub fn current(playhead: State<'_, Playhead>) -> String {
    playhead.status()
}
