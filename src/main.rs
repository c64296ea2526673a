use anyhow::{Context, Result as AnyhowResult};
use clap::Parser;
use crossterm::event::{
    poll as event_poll, read as event_read, DisableMouseCapture, EnableMouseCapture,
    Event as CrosstermEvent, KeyEventKind,
};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::Terminal;
use std::io::{self, stdout};
use std::path::PathBuf;
use std::time::{Duration, Instant};
use wireup::app::App;
use wireup::services::{logging, submit};

/// A terminal UI for wiring JSON feeds into SQL tables
#[derive(Parser, Debug)]
#[command(name = "wireup")]
#[command(about = "Define a connector configuration and save it to the backend", long_about = None)]
#[command(version)]
struct Args {
    /// Configuration-save endpoint
    #[arg(long, value_name = "URL", default_value = submit::DEFAULT_ENDPOINT)]
    endpoint: String,

    /// Path to log file for diagnostics (default: system temp dir)
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,
}

/// Raw mode + alternate screen, restored on drop so a panic or early
/// return never leaves the terminal unusable.
struct TerminalModes {
    active: bool,
}

impl TerminalModes {
    fn enter() -> AnyhowResult<Self> {
        enable_raw_mode().context("Failed to enable raw mode")?;
        execute!(stdout(), EnterAlternateScreen, EnableMouseCapture)
            .context("Failed to enter alternate screen")?;
        Ok(Self { active: true })
    }

    fn undo(&mut self) {
        if self.active {
            self.active = false;
            let _ = execute!(stdout(), LeaveAlternateScreen, DisableMouseCapture);
            let _ = disable_raw_mode();
        }
    }
}

impl Drop for TerminalModes {
    fn drop(&mut self) {
        self.undo();
    }
}

fn main() -> AnyhowResult<()> {
    let args = Args::parse();

    let log_path = args
        .log_file
        .clone()
        .unwrap_or_else(|| std::env::temp_dir().join("wireup.log"));
    if let Err(e) = logging::init_global(&log_path) {
        eprintln!("Warning: logging disabled: {}", e);
    }
    tracing::info!(endpoint = %args.endpoint, "Starting wireup");

    let mut terminal_modes = TerminalModes::enter()?;
    let backend = ratatui::backend::CrosstermBackend::new(stdout());
    let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;
    terminal.clear().context("Failed to clear terminal")?;

    let mut app = App::new(args.endpoint);
    let result = run_event_loop(&mut app, &mut terminal);

    terminal_modes.undo();
    result
}

fn run_event_loop(
    app: &mut App,
    terminal: &mut Terminal<ratatui::backend::CrosstermBackend<io::Stdout>>,
) -> AnyhowResult<()> {
    const FRAME_DURATION: Duration = Duration::from_millis(16);
    let mut last_render = Instant::now();
    let mut needs_render = true;

    loop {
        // Poll the submission channel before input so outcomes surface
        // promptly.
        if app.process_async_messages() {
            needs_render = true;
        }

        if app.should_quit() {
            break;
        }

        if needs_render && last_render.elapsed() >= FRAME_DURATION {
            terminal.draw(|frame| app.render(frame))?;
            last_render = Instant::now();
            needs_render = false;
        }

        let timeout = if needs_render {
            FRAME_DURATION.saturating_sub(last_render.elapsed())
        } else {
            Duration::from_millis(50)
        };

        if !event_poll(timeout)? {
            continue;
        }

        match event_read()? {
            CrosstermEvent::Key(key_event) => {
                if key_event.kind == KeyEventKind::Press {
                    app.handle_key(key_event);
                    needs_render = true;
                }
            }
            CrosstermEvent::Mouse(mouse_event) => {
                app.handle_mouse(mouse_event);
                needs_render = true;
            }
            CrosstermEvent::Resize(_, _) => {
                needs_render = true;
            }
            _ => {}
        }
    }

    Ok(())
}
