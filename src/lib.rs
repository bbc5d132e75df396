use std::sync::Arc;

use tauri::{
    menu::{Menu, MenuItem},
    tray::{MouseButton, MouseButtonState, TrayIconBuilder, TrayIconEvent},
    AppHandle, Listener, Manager,
};
use tokio::sync::Mutex;

mod bridge;
mod commands;
mod events;
mod playhead;
mod settings;
mod synth;
mod transport;

use bridge::{PlayheadBridge, TickDisplay};
use events::{Action, ACTION_EVENT};
use playhead::Playhead;
use settings::TransportSettings;
use transport::{SharedTransport, Transport};

/// Tray icon id; the poll loop writes the clock into its tooltip.
pub const TRAY_ID: &str = "transport";

#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
    // Initialize logger
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    tauri::Builder::default()
        .plugin(tauri_plugin_store::Builder::new().build())
        .manage(Playhead::default())
        .invoke_handler(tauri::generate_handler![
            commands::transport::play,
            commands::transport::current,
        ])
        .setup(|app| {
            // Seed defaults into settings.json so reads below see real values.
            settings::ensure_default_settings(app.handle())?;
            let config = TransportSettings::load(app.handle());
            log::info!("Transport settings: {:?}", config);

            // Tone output runs for the app's lifetime; the playhead's flag
            // gates it, so play/pause never rebuilds the stream.
            let gate = app.state::<Playhead>().gate();
            synth::spawn_output(gate, config.tone());

            register_action_listener(app.handle());

            // Native transport controller: owns the toggle flag, driven by
            // the tray. The webview runs its own copy of the same glue.
            let transport: SharedTransport<PlayheadBridge> = Arc::new(Mutex::new(Transport::new(
                PlayheadBridge::new(app.handle().clone()),
                config.announce_play,
            )));

            setup_tray(app.handle(), transport.clone())?;

            tauri::async_runtime::spawn(transport::run_poll_loop(
                transport,
                TickDisplay::new(app.handle().clone()),
                config.poll_interval(),
            ));

            Ok(())
        })
        .run(tauri::generate_context!())
        .expect("error while running tauri application");
}

/// Log every transport action broadcast on the ACTION channel.
fn register_action_listener(app: &AppHandle) {
    app.listen_any(ACTION_EVENT, |event| {
        // Payloads emitted from the webview arrive JSON-encoded ("\"PLAY\"").
        let name = event.payload().trim().trim_matches('"').to_string();
        match name.parse::<Action>() {
            Ok(action) => log::info!("Transport action: {}", action.name()),
            Err(e) => log::warn!("{}", e),
        }
    });
}

fn setup_tray(
    app: &AppHandle,
    transport: SharedTransport<PlayheadBridge>,
) -> Result<(), Box<dyn std::error::Error>> {
    let toggle_item = MenuItem::with_id(app, "toggle", "Play / Pause", true, None::<&str>)?;
    let quit_item = MenuItem::with_id(app, "quit", "Quit", true, None::<&str>)?;
    let menu = Menu::with_items(app, &[&toggle_item, &quit_item])?;

    let menu_transport = transport.clone();
    let mut builder = TrayIconBuilder::with_id(TRAY_ID)
        .menu(&menu)
        .show_menu_on_left_click(false)
        .tooltip("stopped")
        .on_menu_event(move |app, event| match event.id.as_ref() {
            "toggle" => toggle_transport(menu_transport.clone()),
            "quit" => app.exit(0),
            _ => {}
        })
        .on_tray_icon_event(move |_tray, event| {
            if let TrayIconEvent::Click {
                button: MouseButton::Left,
                button_state: MouseButtonState::Up,
                ..
            } = event
            {
                toggle_transport(transport.clone());
            }
        });

    if let Some(icon) = app.default_window_icon() {
        builder = builder.icon(icon.clone());
    }

    builder.build(app)?;
    Ok(())
}

/// Run a toggle off the tray thread. Tray callbacks are synchronous, so the
/// bridge call is scheduled onto the async runtime.
fn toggle_transport(transport: SharedTransport<PlayheadBridge>) {
    tauri::async_runtime::spawn(async move {
        let mut transport = transport.lock().await;
        match transport.toggle().await {
            Ok(playing) => log::info!("Transport toggled: playing={}", playing),
            Err(e) => log::warn!("Transport toggle failed: {}", e),
        }
    });
}
