use std::{path::PathBuf, process::ExitCode};
use clap::{Arg, ArgAction, Command};
use tracing_subscriber::EnvFilter;
use deadgo::{DeadCode, Package, Settings, SourceFile, package::discover, report};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OutputFormat {
    HumanReadable,
    Plain,
    #[cfg(feature = "json-out")]
    Json,
}

fn cli() -> Command {
    let mut formats = vec!["human-readable", "plain"];
    #[cfg(feature = "json-out")]
    formats.push("json");
    Command::new("deadgo")
        .about("Find unused declarations in Go packages")
        .arg(Arg::new("HIDDEN")
             .long("hidden")
             .action(ArgAction::SetTrue)
             .help("Recurse into hidden subdirectories")
        )
        .arg(Arg::new("EXCLUDE")
             .long("exclude")
             .num_args(1..)
             .value_parser(clap::value_parser!(PathBuf))
             .help("Files or directories to exclude")
        )
        .arg(Arg::new("OUTPUT_FORMAT")
             .short('o')
             .long("output-format")
             .value_parser(formats)
             .default_value("human-readable")
             .help("Output format to use")
        )
        .arg(Arg::new("QUIET")
             .short('q')
             .long("quiet")
             .action(ArgAction::SetTrue)
             .help("Don't print results, only set the exit status")
        )
        .arg(Arg::new("VERBOSE")
             .short('v')
             .long("verbose")
             .action(ArgAction::Count)
             .help("Log what is being scanned, repeat for more")
        )
        .arg(Arg::new("PATHS")
             .num_args(0..)
             .value_parser(clap::value_parser!(PathBuf))
             .help("Go source files or directories, defaults to the current directory")
        )
}

fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("deadgo={}", level)));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn print_results(format: OutputFormat, package: &Package, results: &[DeadCode]) -> anyhow::Result<()> {
    // results are sorted, so each file's results are contiguous
    let mut start = 0;
    while start < results.len() {
        let file_id = results[start].pos.file;
        let end = results[start..].iter()
            .position(|result| result.pos.file != file_id)
            .map_or(results.len(), |len| start + len);
        let file_results = &results[start..end];
        start = end;

        let Some(file) = package.file(file_id) else {
            continue;
        };
        let path = file.source.path.display().to_string();
        match format {
            OutputFormat::HumanReadable =>
                report::print(path, &file.source.content, file_results)?,
            OutputFormat::Plain =>
                report::print_plain(&path, file_results),
            #[cfg(feature = "json-out")]
            OutputFormat::Json =>
                report::print_json(&path, file_results)?,
        }
    }
    Ok(())
}

fn run() -> anyhow::Result<bool> {
    let matches = cli().get_matches();
    init_logging(matches.get_count("VERBOSE"));

    let format = match matches.get_one::<String>("OUTPUT_FORMAT").map(String::as_str) {
        Some("plain") => OutputFormat::Plain,
        #[cfg(feature = "json-out")]
        Some("json") => OutputFormat::Json,
        _ => OutputFormat::HumanReadable,
    };
    let quiet = matches.get_flag("QUIET");
    let hidden = matches.get_flag("HIDDEN");
    let excludes = matches.get_many::<PathBuf>("EXCLUDE")
        .map(|excludes| excludes.cloned().collect::<Vec<_>>())
        .unwrap_or_default();
    let paths = matches.get_many::<PathBuf>("PATHS")
        .map(|paths| paths.cloned().collect::<Vec<_>>())
        .unwrap_or_else(|| vec![PathBuf::from(".")]);

    let settings = Settings::default();
    let mut found = false;
    for (dir, file_paths) in discover(&paths, hidden, &excludes) {
        tracing::info!(dir = %dir.display(), files = file_paths.len(), "scanning directory");
        let sources = match file_paths.iter()
            .map(|path| SourceFile::read(path))
            .collect::<Result<Vec<_>, _>>()
        {
            Ok(sources) => sources,
            Err(err) => {
                eprintln!("deadgo: {}", err);
                found = true;
                continue;
            }
        };
        let packages = match Package::group(sources) {
            Ok(packages) => packages,
            Err(err) => {
                // a parse error only skips this directory
                eprintln!("deadgo: {}", err);
                found = true;
                continue;
            }
        };

        for package in &packages {
            let results = settings.find_dead_code(package);
            if results.is_empty() {
                continue;
            }
            found = true;
            if !quiet {
                print_results(format, package, &results)?;
            }
        }
    }
    Ok(found)
}

fn main() -> ExitCode {
    match run() {
        Ok(false) => ExitCode::SUCCESS,
        Ok(true) => ExitCode::from(2),
        Err(err) => {
            eprintln!("deadgo: {:#}", err);
            ExitCode::from(2)
        }
    }
}
