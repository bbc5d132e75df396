//! Native transport controller: the playback flag, the toggle path, and the
//! fixed-interval poll loop.
//!
//! The controller talks to the backend through [`TransportBridge`] and writes
//! the polled clock through [`DisplaySink`]. Both are trait seams so the
//! toggle/poll behavior is testable without a running app; the production
//! implementations live in [`crate::bridge`].

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tokio::time::MissedTickBehavior;

use crate::events::Action;

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("Bridge call failed: {0}")]
    Bridge(String),
}

/// Backend invocation surface consumed by the controller.
#[async_trait]
pub trait TransportBridge: Send + Sync {
    /// Forward the playing flag to the backend.
    async fn play(&self, playing: bool) -> Result<(), TransportError>;

    /// Fetch the current transport status string.
    async fn current(&self) -> Result<String, TransportError>;

    /// Fire-and-forget broadcast of a transport action.
    fn broadcast(&self, action: Action);
}

/// Where the polled status text ends up.
pub trait DisplaySink: Send + Sync {
    fn set_text(&self, text: &str);
}

pub struct Transport<B> {
    bridge: B,
    playing: bool,
    announce: bool,
}

impl<B: TransportBridge> Transport<B> {
    /// `announce` selects the event-emitting variant: every toggle broadcasts
    /// a `PLAY` action before the flag is forwarded.
    pub fn new(bridge: B, announce: bool) -> Self {
        Self {
            bridge,
            playing: false,
            announce,
        }
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    /// Invert the flag and forward the new value. The flag keeps its new
    /// value even if the forward fails: what we send next is always the value
    /// after the most recent toggle.
    pub async fn toggle(&mut self) -> Result<bool, TransportError> {
        self.playing = !self.playing;

        if self.announce {
            self.bridge.broadcast(Action::Play);
        }

        self.bridge.play(self.playing).await?;
        Ok(self.playing)
    }

    /// One poll tick: fetch the status and write it out verbatim.
    pub async fn refresh<D: DisplaySink>(&self, display: &D) -> Result<(), TransportError> {
        let text = self.bridge.current().await?;
        display.set_text(&text);
        Ok(())
    }
}

pub type SharedTransport<B> = Arc<Mutex<Transport<B>>>;

/// Poll the backend clock at a fixed interval for the app's lifetime.
///
/// A failed tick is logged and skipped; the loop never stops on its own.
pub async fn run_poll_loop<B, D>(transport: SharedTransport<B>, display: D, every: Duration)
where
    B: TransportBridge,
    D: DisplaySink,
{
    let mut ticker = tokio::time::interval(every);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        ticker.tick().await;

        let transport = transport.lock().await;
        if let Err(e) = transport.refresh(&display).await {
            log::warn!("Poll tick failed: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex as StdMutex;

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        Broadcast(Action),
        Play(bool),
        Current,
    }

    /// Records every bridge call in order; `current` answers with a canned
    /// status (or an error when it's `None`).
    #[derive(Clone, Default)]
    struct MockBridge {
        calls: Arc<StdMutex<Vec<Call>>>,
        status: Arc<StdMutex<Option<String>>>,
    }

    impl MockBridge {
        fn with_status(status: &str) -> Self {
            let bridge = Self::default();
            *bridge.status.lock().unwrap() = Some(status.to_string());
            bridge
        }

        fn calls(&self) -> Vec<Call> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl TransportBridge for MockBridge {
        async fn play(&self, playing: bool) -> Result<(), TransportError> {
            self.calls.lock().unwrap().push(Call::Play(playing));
            Ok(())
        }

        async fn current(&self) -> Result<String, TransportError> {
            self.calls.lock().unwrap().push(Call::Current);
            self.status
                .lock()
                .unwrap()
                .clone()
                .ok_or_else(|| TransportError::Bridge("no status".into()))
        }

        fn broadcast(&self, action: Action) {
            self.calls.lock().unwrap().push(Call::Broadcast(action));
        }
    }

    #[derive(Clone, Default)]
    struct MockDisplay {
        texts: Arc<StdMutex<Vec<String>>>,
    }

    impl MockDisplay {
        fn texts(&self) -> Vec<String> {
            self.texts.lock().unwrap().clone()
        }
    }

    impl DisplaySink for MockDisplay {
        fn set_text(&self, text: &str) {
            self.texts.lock().unwrap().push(text.to_string());
        }
    }

    #[tokio::test]
    async fn toggle_alternates_the_forwarded_flag() {
        let bridge = MockBridge::default();
        let mut transport = Transport::new(bridge.clone(), false);

        for _ in 0..4 {
            transport.toggle().await.unwrap();
        }

        // Even number of toggles: back to the original value.
        assert!(!transport.is_playing());
        assert_eq!(
            bridge.calls(),
            vec![
                Call::Play(true),
                Call::Play(false),
                Call::Play(true),
                Call::Play(false),
            ]
        );
    }

    #[tokio::test]
    async fn toggle_returns_the_new_flag() {
        let bridge = MockBridge::default();
        let mut transport = Transport::new(bridge, false);

        assert!(transport.toggle().await.unwrap());
        assert!(transport.is_playing());
        assert!(!transport.toggle().await.unwrap());
    }

    #[tokio::test]
    async fn announce_broadcasts_before_every_forward() {
        let bridge = MockBridge::default();
        let mut transport = Transport::new(bridge.clone(), true);

        for _ in 0..3 {
            transport.toggle().await.unwrap();
        }

        let calls = bridge.calls();
        assert_eq!(calls.len(), 6);
        for (i, expected_flag) in [true, false, true].iter().enumerate() {
            assert_eq!(calls[i * 2], Call::Broadcast(Action::Play));
            assert_eq!(calls[i * 2 + 1], Call::Play(*expected_flag));
        }
    }

    #[tokio::test]
    async fn no_broadcast_without_announce() {
        let bridge = MockBridge::default();
        let mut transport = Transport::new(bridge.clone(), false);

        transport.toggle().await.unwrap();

        assert_eq!(bridge.calls(), vec![Call::Play(true)]);
    }

    #[tokio::test]
    async fn refresh_writes_the_status_verbatim() {
        // Whitespace and all: the display gets exactly what the backend said.
        let bridge = MockBridge::with_status("  playing 7s \n");
        let transport = Transport::new(bridge, false);
        let display = MockDisplay::default();

        transport.refresh(&display).await.unwrap();

        assert_eq!(display.texts(), vec!["  playing 7s \n".to_string()]);
    }

    #[tokio::test]
    async fn refresh_propagates_bridge_errors() {
        let bridge = MockBridge::default();
        let transport = Transport::new(bridge, false);
        let display = MockDisplay::default();

        assert!(transport.refresh(&display).await.is_err());
        assert!(display.texts().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn poll_loop_writes_on_every_tick() {
        let bridge = MockBridge::with_status("playing 1s");
        let display = MockDisplay::default();
        let transport = Arc::new(Mutex::new(Transport::new(bridge, false)));

        let poller = tokio::spawn(run_poll_loop(
            transport,
            display.clone(),
            Duration::from_millis(500),
        ));

        // Paused clock: this advances virtual time past ticks at 0/500/1000/1500ms.
        tokio::time::sleep(Duration::from_millis(1600)).await;
        poller.abort();

        let texts = display.texts();
        assert!(texts.len() >= 3, "expected several ticks, got {:?}", texts);
        assert!(texts.iter().all(|t| t == "playing 1s"));
    }
}
