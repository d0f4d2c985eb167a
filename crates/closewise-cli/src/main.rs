//! `closewise` — terminal lead tracker.
//!
//! # Usage
//!
//! ```
//! closewise
//! closewise --date-format "%d/%m/%Y" --reminder once-per-day
//! closewise --config ~/.config/closewise/config.toml --log-file closewise.log
//! ```

mod app;
mod ui;

use std::{
  fs::OpenOptions,
  io,
  path::{Path, PathBuf},
  sync::Mutex,
  time::Duration,
};

use anyhow::{Context, Result};
use app::App;
use clap::Parser;
use closewise_core::{
  reminder::ReminderPolicy,
  store::{LeadStore, StoreOptions},
};
use crossterm::{
  event::{self, Event, KeyEventKind},
  execute,
  terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use serde::Deserialize;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "closewise", version, about = "Terminal lead tracker")]
struct Args {
  /// Path to a TOML config file (date_format, reminder, log_file).
  #[arg(short, long, value_name = "FILE")]
  config: Option<PathBuf>,

  /// chrono format for the "Date Called" column (default: %-m/%-d/%Y).
  #[arg(long, env = "CLOSEWISE_DATE_FORMAT")]
  date_format: Option<String>,

  /// Reminder policy: `every-change` or `once-per-day`.
  #[arg(long, env = "CLOSEWISE_REMINDER")]
  reminder: Option<ReminderPolicy>,

  /// Write logs to this file. Logging is off when unset.
  #[arg(long, env = "CLOSEWISE_LOG_FILE", value_name = "FILE")]
  log_file: Option<PathBuf>,
}

// ─── Config file ──────────────────────────────────────────────────────────────

/// Shape of the optional TOML config file.
#[derive(Deserialize, Default, Debug, PartialEq)]
#[serde(default, deny_unknown_fields)]
struct ConfigFile {
  date_format: Option<String>,
  reminder:    Option<ReminderPolicy>,
  log_file:    Option<PathBuf>,
}

impl ConfigFile {
  fn load(path: &Path) -> Result<Self> {
    let raw = std::fs::read_to_string(path)
      .with_context(|| format!("reading config file {}", path.display()))?;
    toml::from_str(&raw).context("parsing config file")
  }
}

/// Fully resolved settings.
struct Settings {
  store:    StoreOptions,
  log_file: Option<PathBuf>,
}

impl Settings {
  /// CLI flags override the config file, which overrides defaults.
  fn resolve(args: Args, file_cfg: ConfigFile) -> Result<Self> {
    let mut store = StoreOptions::default()
      .with_reminder_policy(args.reminder.or(file_cfg.reminder).unwrap_or_default());
    if let Some(format) = args.date_format.or(file_cfg.date_format) {
      store = store
        .with_date_format(format)
        .context("invalid date format")?;
    }
    Ok(Self {
      store,
      log_file: args.log_file.or(file_cfg.log_file),
    })
  }
}

// ─── Entry point ──────────────────────────────────────────────────────────────

fn main() -> Result<()> {
  let mut args = Args::parse();

  let file_cfg = match args.config.take() {
    Some(path) => ConfigFile::load(&path)?,
    None => ConfigFile::default(),
  };
  let settings = Settings::resolve(args, file_cfg)?;

  if let Some(path) = &settings.log_file {
    init_tracing(path)?;
  }
  tracing::info!(options = ?settings.store, "starting");

  let mut app = App::new(LeadStore::new(settings.store));

  // Set up the terminal.
  enable_raw_mode().context("enabling raw mode")?;
  let mut stdout = io::stdout();
  execute!(stdout, EnterAlternateScreen).context("entering alternate screen")?;
  let backend = CrosstermBackend::new(stdout);
  let mut terminal = Terminal::new(backend).context("creating terminal")?;

  // Run the event loop; restore terminal even on error.
  app.check_on_load();
  let run_result = run_event_loop(&mut terminal, &mut app);

  // Restore terminal regardless of result.
  disable_raw_mode().ok();
  execute!(terminal.backend_mut(), LeaveAlternateScreen).ok();
  terminal.show_cursor().ok();

  tracing::info!(leads = app.store.leads().len(), "exiting");
  run_result
}

/// Route `tracing` output to `path`; stdout belongs to the UI.
fn init_tracing(path: &Path) -> Result<()> {
  let file = OpenOptions::new()
    .create(true)
    .append(true)
    .open(path)
    .with_context(|| format!("opening log file {}", path.display()))?;

  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .with_ansi(false)
    .with_writer(Mutex::new(file))
    .init();
  Ok(())
}

// ─── Event loop ───────────────────────────────────────────────────────────────

fn run_event_loop(
  terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
  app: &mut App,
) -> Result<()> {
  loop {
    terminal.draw(|f| ui::draw(f, app)).context("drawing frame")?;

    if !event::poll(Duration::from_millis(250)).context("polling events")? {
      continue;
    }

    match event::read().context("reading event")? {
      // Windows reports key releases too.
      Event::Key(key) if key.kind == KeyEventKind::Press => {
        if !app.handle_key(key)? {
          break;
        }
      }
      Event::Resize(_, _) => {
        // Terminal will redraw on next iteration.
      }
      _ => {}
    }
  }

  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;

  fn args(extra: &[&str]) -> Args {
    Args::try_parse_from(std::iter::once("closewise").chain(extra.iter().copied()))
      .unwrap()
  }

  #[test]
  fn config_file_parses_all_keys() {
    let cfg: ConfigFile = toml::from_str(
      r#"
        date_format = "%Y/%m/%d"
        reminder = "once-per-day"
        log_file = "/tmp/closewise.log"
      "#,
    )
    .unwrap();
    assert_eq!(cfg.date_format.as_deref(), Some("%Y/%m/%d"));
    assert_eq!(cfg.reminder, Some(ReminderPolicy::OncePerDay));
    assert_eq!(cfg.log_file, Some(PathBuf::from("/tmp/closewise.log")));
  }

  #[test]
  fn config_file_rejects_unknown_keys() {
    assert!(toml::from_str::<ConfigFile>("colour = \"blue\"").is_err());
  }

  #[test]
  fn flags_override_config_file() {
    let file_cfg = ConfigFile {
      date_format: Some("%Y".into()),
      reminder:    Some(ReminderPolicy::OncePerDay),
      log_file:    Some("file.log".into()),
    };
    let settings = Settings::resolve(
      args(&["--reminder", "every-change", "--date-format", "%d.%m.%Y"]),
      file_cfg,
    )
    .unwrap();
    assert_eq!(settings.store.reminder_policy, ReminderPolicy::EveryChange);
    assert_eq!(settings.store.date_format(), "%d.%m.%Y");
    assert_eq!(settings.log_file, Some(PathBuf::from("file.log")));
  }

  #[test]
  fn defaults_apply_without_flags_or_file() {
    let settings = Settings::resolve(args(&[]), ConfigFile::default()).unwrap();
    assert_eq!(settings.store, StoreOptions::default());
    assert_eq!(settings.log_file, None);
  }

  #[test]
  fn bad_date_format_is_reported() {
    let file_cfg = ConfigFile {
      date_format: Some("%Y %".into()),
      ..ConfigFile::default()
    };
    assert!(Settings::resolve(args(&[]), file_cfg).is_err());
  }
}
