// Entry point and high-level CLI flow.
//
// - Option [1] loads the coverage file and resolves its columns, printing diagnostics.
// - Option [2] generates one workbook per town plus a JSON run summary.
// - After generating reports, the user can choose to go back to the
//   selection menu or exit.
// With `--batch` both steps run once without the menu.
mod aggregate;
mod classify;
mod columns;
mod config;
mod error;
mod layout;
mod loader;
mod network_plan;
mod output;
mod reports;
mod types;
mod util;

use clap::Parser;
use config::Config;
use loader::Dataset;
use std::io::{self, Write};
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

// The loaded file lives here between menu choices so it is read once but can
// feed several report runs.
#[derive(Default)]
struct AppState {
    data: Option<Dataset>,
}

/// Read a single line of input after printing the common "Enter choice:" prompt.
///
/// Returns `None` once stdin is closed.
fn read_choice() -> Option<String> {
    print!("Enter choice: ");
    let _ = io::stdout().flush();
    let mut buf = String::new();
    match io::stdin().read_line(&mut buf) {
        Ok(0) | Err(_) => None,
        Ok(_) => Some(buf.trim().to_string()),
    }
}

/// Ask the user whether to go back to the selection menu after generating
/// reports.
///
/// Returns `true` if the user chose `Y`, `false` if they chose `N`.
fn prompt_back_to_menu() -> bool {
    loop {
        print!("Back to Report Selection (Y/N): ");
        let _ = io::stdout().flush();
        let mut buf = String::new();
        if io::stdin().read_line(&mut buf).unwrap_or(0) == 0 {
            return false;
        }
        match buf.trim().to_uppercase().as_str() {
            "Y" => return true,
            "N" => return false,
            _ => println!("Invalid choice. Please enter Y or N."),
        }
    }
}

/// Handle option [1]: load the coverage file.
///
/// On success the dataset replaces whatever `state` held before.
fn handle_load(state: &mut AppState, config: &Config) -> bool {
    match loader::load(&config.input, config.sheet.as_deref(), config.header_row) {
        Ok(data) => {
            println!(
                "Processing dataset... ({} rows read, {} store records kept)",
                util::format_int(data.report.total_rows),
                util::format_int(data.report.kept_rows)
            );
            if data.report.dropped_rows > 0 {
                println!(
                    "Note: {} blank or total rows skipped.",
                    util::format_int(data.report.dropped_rows)
                );
            }
            println!("Towns found: {}\n", util::format_int(data.towns().len()));
            state.data = Some(data);
            true
        }
        Err(e) => {
            error!(error = %e, "load failed");
            eprintln!("Failed to load file: {}\n", e);
            false
        }
    }
}

/// Handle option [2]: generate every town's workbook and the run summary.
fn handle_generate_reports(state: &AppState, config: &Config) -> bool {
    let Some(data) = state.data.as_ref() else {
        println!("Error: No data loaded. Please load the file first (option 1).\n");
        return false;
    };

    let batch = reports::batch_name(chrono::Local::now());
    println!("Generating reports into {}...\n", config.output_dir.display());

    match reports::generate_all(data, config, &batch) {
        Ok(summary) => {
            println!(
                "Batch folder: {}",
                config.output_dir.join(&summary.batch).display()
            );
            println!(
                "Towns written: {} of {}",
                util::format_int(summary.towns_written),
                util::format_int(summary.towns_attempted)
            );
            for failure in &summary.failures {
                println!("  failed: {} ({})", failure.town, failure.error);
            }
            println!("");
            info!(batch = %summary.batch, written = summary.towns_written, "run finished");
            summary.failures.is_empty()
        }
        Err(e) => {
            error!(error = %e, "run aborted");
            eprintln!("Report generation failed: {}\n", e);
            false
        }
    }
}

fn init_logging() {
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_writer(io::stderr)
        .init();
}

fn main() -> ExitCode {
    init_logging();
    let config = Config::parse();
    info!(input = %config.input.display(), "startup");

    let mut state = AppState::default();

    if config.batch {
        let ok = handle_load(&mut state, &config) && handle_generate_reports(&state, &config);
        return if ok { ExitCode::SUCCESS } else { ExitCode::FAILURE };
    }

    loop {
        println!("Select an option:");
        println!("[1] Load the file");
        println!("[2] Generate Reports\n");
        let Some(choice) = read_choice() else {
            break;
        };
        match choice.as_str() {
            "1" => {
                handle_load(&mut state, &config);
            }
            "2" => {
                println!("");
                handle_generate_reports(&state, &config);
                if !prompt_back_to_menu() {
                    println!("Exiting the program.");
                    break;
                }
            }
            _ => {
                println!("Invalid choice. Please enter 1 or 2.\n");
            }
        }
    }
    ExitCode::SUCCESS
}
