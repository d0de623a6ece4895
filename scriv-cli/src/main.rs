mod logging;

use std::path::PathBuf;

use clap::Parser;
use scriv_editor::{Config, Controller, Terminal as EditorTerminal, Viewport};
use scriv_terminal::{convert_key_event, CrosstermTerminal};

#[derive(Parser)]
#[command(author, version, about = "A small Emacs-style terminal text editor", long_about = None)]
struct Cli {
    /// File to open
    #[arg(value_name = "FILE")]
    file: Option<PathBuf>,

    /// Turn on debug logging
    #[arg(short, long)]
    debug: bool,

    /// Configuration file (TOML), defaults to `~/.config/scriv/config.toml`
    #[arg(long)]
    config: Option<PathBuf>,

    /// Log file location
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let log_path = cli.log_file.clone().unwrap_or_else(|| std::env::temp_dir().join("scriv.log"));
    logging::setup(cli.debug, &log_path);

    let config_path = cli.config.clone().unwrap_or_else(default_config_path);
    let config = Config::load(&config_path);

    let mut terminal = CrosstermTerminal::new()?;
    let (width, height) = terminal.size();
    let viewport = Viewport { x: 0, y: 0, width, height };

    let mut controller = Controller::new(config, viewport);
    if let Some(path) = &cli.file {
        if let Err(e) = controller.open(path) {
            log::error!("failed to open {path:?}: {e}");
        }
    }

    run_event_loop(&mut controller, &mut terminal)?;
    Ok(())
}

fn default_config_path() -> PathBuf {
    dirs::home_dir()
        .map(|home| home.join(".config/scriv/config.toml"))
        .unwrap_or_else(|| PathBuf::from("scriv.toml"))
}

fn run_event_loop(
    controller: &mut Controller,
    terminal: &mut CrosstermTerminal,
) -> anyhow::Result<()> {
    use crossterm::event::{self, Event};

    loop {
        controller.render(terminal)?;
        terminal.flush()?;

        if controller.should_quit() {
            break;
        }

        match event::read()? {
            Event::Key(key_event) => {
                let key = convert_key_event(key_event);
                if let Err(e) = controller.handle_key(key) {
                    log::warn!("key handling error: {e}");
                }
            }
            Event::Resize(width, height) => {
                let (width, height) = (width as usize, height as usize);
                terminal.resize(width, height);
                controller.resize(Viewport { x: 0, y: 0, width, height });
            }
            _ => {}
        }
    }

    Ok(())
}
