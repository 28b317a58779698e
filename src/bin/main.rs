use clap::{ArgAction, CommandFactory, Parser};
use dummyfile::{
    config::{self, ByteSize, Defaults, RunConfig},
    content::LineEnding,
    error::{ConfigError, Error},
    logging::{self, LogOptions},
    run::{self, AppResult, RunReport},
};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "dummyfile", version)]
#[command(about = "create a number of dummy files of an exact size for testing")]
#[command(
    long_about = "Creates dummy files filled with random plain text ('human readable') \
                  characters.\n\
                  By default each file's content is one big blob. With --lf the content is \
                  broken into lines (CRLF) to simulate proper text files.\n\n\
                  Sizes accept an optional unit: <empty> = byte, kb, mb, gb \
                  (1 KB = 1024 bytes)."
)]
struct Cli {
    /// number of files to create
    #[arg(short = 'n', long = "count", value_name = "FILES")]
    count: u64,

    /// size of each file, e.g. 100, 100kb, 12mb, 1gb
    #[arg(short = 's', long = "size")]
    size: String,

    /// folder to create the files in (must exist, defaults to the current folder)
    #[arg(short = 'f', long = "folder")]
    folder: Option<String>,

    /// add line breaks to the content
    #[arg(long = "lf")]
    line_feeds: bool,

    /// characters per line, only used with --lf (defaults to 80)
    #[arg(long = "ll", value_name = "CHARS", requires = "line_feeds")]
    line_length: Option<u64>,

    /// file extension (defaults to 'tmp')
    #[arg(long = "fe", value_name = "EXT")]
    extension: Option<String>,

    /// fixed file name prefix
    #[arg(long = "fp", value_name = "PREFIX")]
    prefix: Option<String>,

    /// line terminator used with --lf: crlf or lf
    #[arg(long)]
    line_ending: Option<LineEnding>,

    /// seed for reproducible content
    #[arg(long)]
    seed: Option<u64>,

    /// limit the number of files written at once
    #[arg(long)]
    threads: Option<usize>,

    /// TOML file with default values
    #[arg(long)]
    config: Option<PathBuf>,

    /// print the run report as JSON
    #[arg(long)]
    json: bool,

    /// more log output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,

    /// write logs to a file instead of stderr
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// log as JSON lines
    #[arg(long)]
    log_json: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let _guard = match logging::init(&LogOptions {
        verbosity: cli.verbose,
        json: cli.log_json,
        file: cli.log_file.clone(),
    }) {
        Ok(guard) => guard,
        Err(err) => {
            eprintln!("!!! {}", err);
            return AppResult::Failure.into();
        }
    };

    if !cli.json {
        println!("{}", intro());
        println!();
    }

    match execute(&cli) {
        Ok(result) => result.into(),
        Err(err) => {
            eprintln!("!!! {}", err);
            if shows_usage(&err) {
                eprintln!();
                eprintln!("{}", Cli::command().render_help());
            }
            AppResult::from(&err).into()
        }
    }
}

fn intro() -> String {
    format!("* dummyfile v{} *", env!("CARGO_PKG_VERSION"))
}

/// Bad parameter values get the usage text after the error.
fn shows_usage(err: &Error) -> bool {
    matches!(err, Error::Config(_))
}

fn execute(cli: &Cli) -> Result<AppResult, Error> {
    let defaults = match &cli.config {
        Some(path) => Defaults::load(path)?,
        None => Defaults::default(),
    };
    let (config, size) = build_config(cli, defaults)?;

    if !cli.json {
        echo_parameters(&config, &size);
        println!();
        println!("Preparing file contents and creating {} file(s) ...", config.file_count);
    }

    let report = run::run(&config)?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report.summary())?);
    } else {
        print_report(&report);
    }
    Ok(AppResult::from_report(&report))
}

fn build_config(cli: &Cli, defaults: Defaults) -> Result<(RunConfig, ByteSize), ConfigError> {
    let file_count = usize::try_from(cli.count)
        .ok()
        .filter(|count| *count >= 1)
        .ok_or(ConfigError::InvalidFileCount(cli.count))?;

    let size = config::parse_size(&cli.size)?;
    if size.bytes < 1 {
        return Err(ConfigError::InvalidSize(cli.size.clone()));
    }

    let destination_folder = match (&cli.folder, defaults.folder) {
        (Some(folder), _) => PathBuf::from(config::clean_arg(folder)),
        (None, Some(folder)) => folder,
        (None, None) => PathBuf::from("."),
    };

    let file_extension = cli
        .extension
        .as_deref()
        .or(defaults.extension.as_deref())
        .map(config::clean_extension)
        .unwrap_or_else(|| config::DEFAULT_EXTENSION.to_string());

    let file_prefix = cli
        .prefix
        .as_deref()
        .or(defaults.prefix.as_deref())
        .map(config::clean_arg)
        .unwrap_or_default();

    let line_length = if cli.line_feeds {
        cli.line_length
            .or(defaults.line_length)
            .unwrap_or(config::DEFAULT_LINE_LENGTH)
    } else {
        0
    };

    let config = RunConfig {
        file_count,
        target_bytes: size.bytes,
        add_line_breaks: cli.line_feeds,
        line_length,
        line_ending: cli.line_ending.or(defaults.line_ending).unwrap_or_default(),
        destination_folder,
        file_extension,
        file_prefix,
        seed: cli.seed,
        threads: cli.threads.or(defaults.threads),
    };
    Ok((config, size))
}

fn echo_parameters(config: &RunConfig, size: &ByteSize) {
    println!("# of files    : {}", config.file_count);
    println!("File size     : {}", size);
    println!("File extension: {}", config.file_extension);
    println!("File prefix   : {}", config.file_prefix);
    print!("Folder        : {}", config.destination_folder.display());
    // If path is a relative path, display the full path also
    match absolute(&config.destination_folder) {
        Some(full) if full != config.destination_folder => println!(" ({})", full.display()),
        _ => println!(),
    }
    println!("Add line feed : {}", config.add_line_breaks);
    if config.line_length > 0 {
        println!("Line length   : {}", config.line_length);
        println!("Line ending   : {}", config.line_ending);
    }
}

fn absolute(path: &Path) -> Option<PathBuf> {
    std::path::absolute(path).ok()
}

fn print_report(report: &RunReport) {
    println!(
        "Prepared {} bytes of content in {:.3} sec.",
        report.content_bytes,
        report.preparation.as_secs_f64()
    );
    println!(
        "Created {} file(s) ({} bytes) in {:.3} sec.",
        report.materialize.succeeded,
        report.materialize.bytes_written,
        report.materialization.as_secs_f64()
    );

    if !report.is_success() {
        println!();
        println!("!!! {} file(s) could not be created:", report.materialize.failed.len());
        for err in &report.materialize.failed {
            println!("  ✗ {}", err);
        }
    }
}
