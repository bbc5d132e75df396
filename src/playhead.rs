//! Playback state behind the `play`/`current` commands.
//!
//! A playhead is an elapsed-seconds clock plus a playing flag. The flag is
//! shared with the tone output (see [`crate::synth`]) through an `Arc` so the
//! audio callback can gate itself without taking a lock.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Instant;

pub struct Playhead {
    started: Mutex<Instant>,
    playing: Arc<AtomicBool>,
}

impl Default for Playhead {
    fn default() -> Self {
        Self {
            started: Mutex::new(Instant::now()),
            playing: Arc::new(AtomicBool::new(false)),
        }
    }
}

impl Playhead {
    /// Set the playing flag. Starting playback resets the clock.
    pub fn set_playing(&self, playing: bool) {
        if playing {
            *self.started() = Instant::now();
            log::info!("Playback started");
        } else {
            log::info!("Playback stopped");
        }

        self.playing.store(playing, Ordering::SeqCst);
    }

    pub fn is_playing(&self) -> bool {
        self.playing.load(Ordering::SeqCst)
    }

    /// Human-readable transport status, polled by the display loop.
    pub fn status(&self) -> String {
        if self.is_playing() {
            format!("playing {}s", self.started().elapsed().as_secs())
        } else {
            String::from("stopped")
        }
    }

    /// Shared handle to the playing flag, for the audio callback.
    pub fn gate(&self) -> Arc<AtomicBool> {
        self.playing.clone()
    }

    fn started(&self) -> MutexGuard<'_, Instant> {
        // A poisoned lock only means another thread panicked mid-store of an
        // Instant; the value is still usable.
        self.started.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_stopped() {
        let playhead = Playhead::default();
        assert!(!playhead.is_playing());
        assert_eq!(playhead.status(), "stopped");
    }

    #[test]
    fn set_playing_updates_flag_and_status() {
        let playhead = Playhead::default();

        playhead.set_playing(true);
        assert!(playhead.is_playing());
        assert!(playhead.status().starts_with("playing "));

        playhead.set_playing(false);
        assert!(!playhead.is_playing());
        assert_eq!(playhead.status(), "stopped");
    }

    #[test]
    fn clock_resets_on_play() {
        let playhead = Playhead::default();
        playhead.set_playing(true);
        // Right after play the clock reads zero whole seconds.
        assert_eq!(playhead.status(), "playing 0s");
    }

    #[test]
    fn gate_tracks_flag() {
        let playhead = Playhead::default();
        let gate = playhead.gate();

        playhead.set_playing(true);
        assert!(gate.load(Ordering::SeqCst));

        playhead.set_playing(false);
        assert!(!gate.load(Ordering::SeqCst));
    }
}
