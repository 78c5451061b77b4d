use std::fs::File;
use std::process::ExitCode;
use std::thread;
use std::time::Duration;

use chatwin::core::config::{self, CliOverrides};
use chatwin::tui::CrosstermDriver;
use chatwin::{ColorId, Display, DisplayError, LogEntry, LogSender, PrintOptions, TextStyle};
use clap::Parser;
use simplelog::{ConfigBuilder, WriteLogger};

#[derive(Parser)]
#[command(name = "chatwin", about = "Loopback chat console with a scrolling log and an input line")]
struct Args {
    /// Number of colours to use instead of what the terminal reports
    #[arg(short, long)]
    colors: Option<u16>,

    /// Log file path (the terminal itself is taken by the display)
    #[arg(long)]
    log_file: Option<String>,

    /// Seconds between heartbeat lines posted from a background thread (0 = off)
    #[arg(short, long, default_value_t = 10)]
    ticker: u64,
}

const USER_COLOR: ColorId = ColorId(3);
const SYSTEM_COLOR: ColorId = ColorId(5);

fn main() -> ExitCode {
    let args = Args::parse();

    let file_config = config::load_config().unwrap_or_else(|e| {
        eprintln!("Ignoring config file: {e}");
        config::ChatwinConfig::default()
    });
    let resolved = config::resolve(
        &file_config,
        &CliOverrides {
            colors: args.colors,
            log_file: args.log_file.clone(),
        },
    );

    // Initialize file logger; stdout belongs to the display
    let log_config = ConfigBuilder::new().set_time_format_rfc3339().build();
    if let Ok(log_file) = File::create(&resolved.log_file) {
        let _ = WriteLogger::init(resolved.log_level, log_config, log_file);
    }

    log::info!("chatwin starting up");

    let mut display = match Display::open(&resolved) {
        Ok(display) => display,
        Err(e) => {
            log::warn!("Startup failed: {}", e);
            eprintln!("chatwin: {e}");
            return ExitCode::FAILURE;
        }
    };

    if args.ticker > 0 {
        spawn_ticker(display.log_sender(), Duration::from_secs(args.ticker));
    }

    run(&mut display);
    log::info!("chatwin shutting down");
    ExitCode::SUCCESS
}

fn run(display: &mut Display<CrosstermDriver>) {
    let system = PrintOptions::default().style(TextStyle::BOLD).color(SYSTEM_COLOR);
    display.print(
        ["chatwin:", "type a message, /colors, /clear or /quit"],
        &system,
    );

    loop {
        let line = match display.ask("> ") {
            Ok(line) => line,
            Err(DisplayError::InputClosed) => break,
            Err(e) => {
                log::warn!("Input failed: {}", e);
                break;
            }
        };

        match line.trim() {
            "" => {}
            "/quit" => break,
            "/clear" => display.clear(),
            "/colors" => print_swatch(display),
            text => {
                display.print(
                    ["you:"],
                    &PrintOptions::default()
                        .terminator(" ")
                        .style(TextStyle::BOLD)
                        .color(USER_COLOR),
                );
                display.println(text);
            }
        }
    }
}

/// One block per palette entry, wrapped by the log region.
fn print_swatch(display: &mut Display<CrosstermDriver>) {
    let count = display.color_count();
    for id in 1..=count {
        display.print(
            [format!("{:>3}", id)],
            &PrintOptions::default()
                .terminator(" ")
                .style(TextStyle::STANDOUT)
                .color(ColorId(id)),
        );
    }
    display.println("");
}

fn spawn_ticker(sender: LogSender, every: Duration) {
    thread::spawn(move || {
        loop {
            thread::sleep(every);
            let stamp = chrono::Local::now().format("%H:%M:%S");
            let entry = LogEntry::styled(format!("[{stamp}] heartbeat"), TextStyle::NORMAL, ColorId(7));
            if sender.send(entry).is_err() {
                log::debug!("Display gone, ticker stopping");
                return;
            }
        }
    });
}
