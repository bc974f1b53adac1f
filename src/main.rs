use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::Result;
use clap::Parser;
use tokio::sync::mpsc;

use droidtail_adb::AdbClient;
use droidtail_logs::{DEFAULT_CAPACITY, LogBuffer, LogcatStream};
use droidtail_types::DeviceInfo;
use droidtail_tui::{
    Action, AppState, DeviceSelectScreen, Event, EventHandler, HelpOverlay, KeyBindings,
    KeyContext, LogViewerScreen, Screen, Tui,
};

mod config;

/// droidtail - A terminal UI for tailing Android adb logcat output
#[derive(Parser, Debug)]
#[command(name = "droidtail")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Device serial to tail directly (skips the device screen)
    #[arg(value_name = "DEVICE")]
    device: Option<String>,

    /// How many log entries to retain
    #[arg(long)]
    capacity: Option<usize>,

    /// Path to the adb binary (default: $ANDROID_SDK_ROOT/platform-tools/adb)
    #[arg(long)]
    adb_path: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Stderr never interleaves with the alternate-screen TUI
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let result = run_app(args).await;

    if let Err(e) = &result {
        eprintln!("Error: {:#}", e);
    }

    result
}

/// Internal actions for capture lifecycle and async work
enum InternalAction {
    RefreshDevices,
    StartCapture,
    StopCapture,
    RestartCapture,
    ClearCapture,
}

async fn run_app(args: Args) -> Result<()> {
    let file_config = config::Config::load();
    let capacity = args
        .capacity
        .or(file_config.capacity)
        .unwrap_or(DEFAULT_CAPACITY);
    let adb = AdbClient::new(args.adb_path.or(file_config.adb_path));

    // Create action channels
    let (action_tx, mut action_rx) = mpsc::unbounded_channel::<Action>();
    let (internal_tx, mut internal_rx) = mpsc::unbounded_channel::<InternalAction>();

    // Initialize state
    let mut state = AppState::new(action_tx.clone());

    // Log buffer and capture session
    let buffer = LogBuffer::new(capacity);
    let mut stream = LogcatStream::new();

    // Initialize TUI
    let mut tui = Tui::new()?;

    // Polling cadence of the consumer side; the buffer rate-limits itself
    let mut events = EventHandler::new(Duration::from_millis(100));

    let keybindings = KeyBindings::new();

    // Populate the device list up front
    let _ = internal_tx.send(InternalAction::RefreshDevices);

    // Handle CLI argument for direct navigation
    if let Some(device_id) = &args.device {
        let device = DeviceInfo {
            id: device_id.clone(),
            display_name: device_id.clone(),
        };
        state.enter_log_viewer(device);
        let _ = internal_tx.send(InternalAction::StartCapture);
    }

    // Initial render
    render(&mut tui, &mut state, &buffer)?;

    // Main event loop
    loop {
        tokio::select! {
            Some(event) = events.next() => {
                match event {
                    Event::Key(key) => {
                        if state.ui_state.input_active.is_some()
                            && state.current_screen == Screen::LogViewer
                        {
                            if let Some(action) = keybindings.get_filter_input_action(&key) {
                                let _ = action_tx.send(action);
                            }
                        } else {
                            let context = match state.current_screen {
                                Screen::DeviceSelect => KeyContext::DeviceList,
                                Screen::LogViewer => KeyContext::LogViewer,
                            };
                            if let Some(action) = keybindings.get_action(context, &key) {
                                let _ = action_tx.send(action);
                            }
                        }
                    }
                    Event::Tick => {
                        // Drain staged entries on cadence; repaint only when
                        // something new became visible
                        if buffer.should_advance(Instant::now())
                            && state.current_screen == Screen::LogViewer
                        {
                            state.render_dirty = true;
                        }
                    }
                    Event::Resize(_, _) => {
                        state.render_dirty = true;
                    }
                    Event::Error(e) => {
                        state.show_error(e);
                        state.render_dirty = true;
                    }
                }
            }

            Some(action) = action_rx.recv() => {
                handle_action(&mut state, &internal_tx, action);
                state.render_dirty = true;
            }

            Some(internal) = internal_rx.recv() => {
                match internal {
                    InternalAction::RefreshDevices => {
                        match adb.devices().await {
                            Ok(devices) => state.devices = devices,
                            Err(e) => state.show_error(format!("Device enumeration failed: {}", e)),
                        }
                    }

                    InternalAction::StartCapture => {
                        buffer.reset();
                        start_capture(&mut state, &mut stream, &adb, &buffer).await;
                    }

                    InternalAction::StopCapture => {
                        stream.stop().await;
                        state.capturing = false;
                    }

                    InternalAction::RestartCapture => {
                        // Fresh session: a prefilter or device change invalidates
                        // everything already retained. Stop joins the old
                        // readers before the buffer is reset.
                        stream.stop().await;
                        buffer.reset();
                        start_capture(&mut state, &mut stream, &adb, &buffer).await;
                    }

                    InternalAction::ClearCapture => {
                        let was_running = stream.is_running();
                        stream.stop().await;
                        state.capturing = false;
                        buffer.reset();

                        let device_id = selected_device_id(&state);
                        if let Err(e) = adb.clear_log(&device_id).await {
                            state.show_error(format!("Clear failed: {}", e));
                        }
                        if was_running {
                            let _ = internal_tx.send(InternalAction::StartCapture);
                        }
                    }
                }
                state.render_dirty = true;
            }
        }

        if state.should_quit {
            break;
        }

        if state.render_dirty {
            render(&mut tui, &mut state, &buffer)?;
            state.render_dirty = false;
        }
    }

    // Cleanup
    stream.stop().await;
    events.shutdown();
    tui.restore()?;

    Ok(())
}

fn selected_device_id(state: &AppState) -> String {
    state
        .selected_device
        .as_ref()
        .map(|d| d.id.clone())
        .unwrap_or_default()
}

async fn start_capture(
    state: &mut AppState,
    stream: &mut LogcatStream,
    adb: &AdbClient,
    buffer: &LogBuffer,
) {
    let device_id = selected_device_id(state);
    match stream.start(adb, &device_id, buffer.clone()).await {
        Ok(()) => {
            state.capturing = true;
            state.dismiss_error();
        }
        Err(e) => {
            state.capturing = false;
            state.show_error(format!("Capture failed: {}", e));
        }
    }
}

fn handle_action(
    state: &mut AppState,
    internal_tx: &mpsc::UnboundedSender<InternalAction>,
    action: Action,
) {
    match action {
        Action::Quit => {
            let _ = internal_tx.send(InternalAction::StopCapture);
            state.should_quit = true;
        }
        Action::GoBack => {
            if state.ui_state.help_visible {
                state.ui_state.help_visible = false;
            } else if state.ui_state.error_message.is_some() {
                state.dismiss_error();
            } else if state.current_screen == Screen::LogViewer {
                let _ = internal_tx.send(InternalAction::StopCapture);
                state.go_back();
            } else {
                state.should_quit = true;
            }
        }

        // Device selection
        Action::ListUp => state.list_up(),
        Action::ListDown => state.list_down(),
        Action::ListSelect => {
            if let Some(device) = state.selected_row() {
                let _ = state.action_tx.send(Action::SelectDevice(device.id));
            }
        }
        Action::SelectDevice(id) => {
            let device = state
                .devices
                .iter()
                .find(|d| d.id == id)
                .cloned()
                .unwrap_or_else(DeviceInfo::default_target);
            state.enter_log_viewer(device);
            let _ = internal_tx.send(InternalAction::StartCapture);
        }
        Action::RefreshDevices => {
            let _ = internal_tx.send(InternalAction::RefreshDevices);
        }

        // Capture lifecycle
        Action::ToggleCapture => {
            let internal = if state.capturing {
                InternalAction::StopCapture
            } else {
                InternalAction::StartCapture
            };
            let _ = internal_tx.send(internal);
        }
        Action::ClearLogs => {
            let _ = internal_tx.send(InternalAction::ClearCapture);
        }

        // Filter criteria
        Action::ToggleSeverity(severity) => {
            state.ui_state.filter.toggle_severity(severity);
        }
        Action::ToggleUnityOnly => {
            state.ui_state.filter.unity_only = !state.ui_state.filter.unity_only;
            // The prefilter defines the capture session; flipping it
            // restarts the source like a device change would
            if state.capturing {
                let _ = internal_tx.send(InternalAction::RestartCapture);
            }
        }
        Action::ToggleTimeFilter => {
            state.ui_state.filter.time_enabled = !state.ui_state.filter.time_enabled;
        }
        Action::ClearFilters => {
            state.clear_filters();
        }

        // Filter input
        Action::OpenFilterInput(field) => state.open_input(field),
        Action::CloseFilterInput => state.cancel_input(),
        Action::FilterInputChar(c) => state.input_char(c),
        Action::FilterInputBackspace => state.input_backspace(),
        Action::ApplyFilterInput => state.apply_input(),

        // Scrolling
        Action::ScrollUp(n) => {
            state.ui_state.follow = false;
            state.ui_state.log_scroll = state.ui_state.log_scroll.saturating_sub(n);
        }
        Action::ScrollDown(n) => {
            state.ui_state.follow = false;
            // Render clamps to the filtered entry count
            state.ui_state.log_scroll = state.ui_state.log_scroll.saturating_add(n);
        }
        Action::PageUp => {
            state.ui_state.follow = false;
            state.ui_state.log_scroll = state.ui_state.log_scroll.saturating_sub(20);
        }
        Action::PageDown => {
            state.ui_state.follow = false;
            state.ui_state.log_scroll = state.ui_state.log_scroll.saturating_add(20);
        }
        Action::ScrollToTop => {
            state.ui_state.follow = false;
            state.ui_state.log_scroll = 0;
        }
        Action::ScrollToBottom => {
            state.ui_state.follow = false;
            state.ui_state.log_scroll = usize::MAX;
        }
        Action::ToggleFollow => {
            state.ui_state.follow = !state.ui_state.follow;
        }

        // Overlays / errors
        Action::ToggleHelp => {
            state.ui_state.help_visible = !state.ui_state.help_visible;
        }
        Action::ShowError(msg) => state.show_error(msg),
        Action::DismissError => state.dismiss_error(),

        Action::Render => {}
    }
}

fn render(tui: &mut Tui, state: &mut AppState, buffer: &LogBuffer) -> Result<()> {
    tui.terminal().draw(|frame| {
        match state.current_screen {
            Screen::DeviceSelect => DeviceSelectScreen::render(frame, state),
            Screen::LogViewer => LogViewerScreen::render(frame, state, buffer),
        }

        if state.ui_state.help_visible {
            HelpOverlay::render(frame);
        }
    })?;

    Ok(())
}
