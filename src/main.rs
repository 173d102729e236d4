mod aggregate;
mod config;
mod decode;
mod render;
mod types;
mod walk;

use atty; // for checking if stdin is a TTY before pausing
use clap::{Arg, ArgAction, ArgMatches, Command};
use config::{load_config_file, CliOverrides, Settings};
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

fn main() -> ExitCode {
    let matches = Command::new("pyconcat")
        .version(env!("CARGO_PKG_VERSION"))
        .about("pyconcat: collects every .py file under a directory into a single text file.")
        .arg(
            Arg::new("root")
                .help("Directory to scan")
                .value_name("ROOT")
                .required(false),
        )
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .value_name("FILE")
                .help("Output file name (default: pyconcat_output.txt)")
                .required(false),
        )
        .arg(
            Arg::new("ext")
                .short('e')
                .long("ext")
                .value_name("EXT")
                .help("File extension to collect, repeatable (default: py)")
                .action(ArgAction::Append),
        )
        .arg(
            Arg::new("no-structure")
                .long("no-structure")
                .help("Skip the DIRECTORY STRUCTURE section")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("sort")
                .long("sort")
                .help("Visit entries in file-name order for reproducible output")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("gitignore")
                .long("gitignore")
                .help("Honor .gitignore files under the root")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("pause")
                .long("pause")
                .help("Wait for Enter before exiting (interactive terminals only)")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("debug")
                .long("debug")
                .help("Enable debug output")
                .action(ArgAction::SetTrue),
        )
        .get_matches();

    init_logging(matches.get_flag("debug"));

    let settings = match load_settings(&matches) {
        Ok(s) => s,
        Err(e) => {
            println!("Error: {:#}", e);
            // settings never resolved, so only the command line can ask for a pause
            if matches.get_flag("pause") {
                pause();
            }
            return ExitCode::FAILURE;
        }
    };

    let code = match aggregate::run(&settings) {
        Ok(summary) => {
            println!("{}", summary.status_line());
            ExitCode::SUCCESS
        }
        Err(e) => {
            println!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    };

    if settings.pause {
        pause();
    }
    code
}

fn init_logging(debug: bool) {
    let level = if debug {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(io::stderr)
        .init();
}

fn load_settings(matches: &ArgMatches) -> anyhow::Result<Settings> {
    let config = load_config_file(Path::new("."))?;
    let cli = CliOverrides {
        root: matches.get_one::<String>("root").map(PathBuf::from),
        output: matches.get_one::<String>("output").map(PathBuf::from),
        extensions: matches
            .get_many::<String>("ext")
            .unwrap_or_default()
            .cloned()
            .collect(),
        no_structure: matches.get_flag("no-structure"),
        sort: matches.get_flag("sort"),
        gitignore: matches.get_flag("gitignore"),
        pause: matches.get_flag("pause"),
    };
    Settings::resolve(config, cli)
}

fn pause() {
    if !atty::is(atty::Stream::Stdin) {
        return;
    }
    print!("Press Enter to exit...");
    let _ = io::stdout().flush();
    let mut line = String::new();
    let _ = io::stdin().lock().read_line(&mut line);
}
