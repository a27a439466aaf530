//! Command-line interface for html2mjml
//! This binary converts an HTML file (or stdin) into MJML, or into compiled email HTML when an
//! `mjml` executable is available.
//!
//! Usage:
//!   html2mjml `<path>` [--config `<file>`] [--output `<file>`]   - Convert a file
//!   html2mjml - < page.html                                   - Convert stdin
//!   html2mjml `<path>` --format json                            - Output plus warnings as JSON

use clap::{Arg, ArgAction, ArgMatches, Command};
use html2mjml::{CommandCompiler, ConvertError, Converter, Html5everParser};
use html2mjml_config::{Html2MjmlConfig, Loader};
use std::fs;
use std::io::{self, IsTerminal, Read};
use thiserror::Error;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Error)]
enum CliError {
    #[error("configuration error: {0}")]
    Config(#[from] html2mjml_config::ConfigError),
    #[error("{0}")]
    Convert(#[from] ConvertError),
    #[error("cannot read {path}: {source}")]
    Read { path: String, source: io::Error },
    #[error("cannot write {path}: {source}")]
    Write { path: String, source: io::Error },
    #[error("cannot format output: {0}")]
    Json(#[from] serde_json::Error),
}

fn main() {
    let matches = build_cli().get_matches();
    init_tracing(matches.get_flag("verbose"));

    if let Err(err) = run(&matches) {
        eprintln!("Error: {}", err);
        std::process::exit(1);
    }
}

fn build_cli() -> Command {
    Command::new("html2mjml")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Convert HTML documents into MJML email markup")
        .arg(
            Arg::new("path")
                .help("Path to the HTML file ('-' for stdin)")
                .default_value("-")
                .index(1),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .help("Configuration file layered over the built-in defaults"),
        )
        .arg(
            Arg::new("output")
                .long("output")
                .short('o')
                .help("Write the result to this file instead of stdout"),
        )
        .arg(
            Arg::new("format")
                .long("format")
                .short('f')
                .help("Output format")
                .value_parser(["text", "json"])
                .default_value("text"),
        )
        .arg(
            Arg::new("no-validate")
                .long("no-validate")
                .help("Output MJML without compiling it")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("preserve-class-names")
                .long("preserve-class-names")
                .help("Keep source classes as css-class")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("no-inline-styles")
                .long("no-inline-styles")
                .help("Do not turn CSS into MJML attributes")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("no-wrap")
                .long("no-wrap")
                .help("Do not wrap fragments in mjml/mj-body")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("quiet")
                .long("quiet")
                .short('q')
                .help("Do not log conversion warnings")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("mjml-bin")
                .long("mjml-bin")
                .help("Path to the mjml executable"),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .help("Log conversion decisions")
                .action(ArgAction::SetTrue),
        )
}

/// Log to stderr, honoring RUST_LOG
fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_ansi(io::stderr().is_terminal())
        .with_target(false)
        .without_time()
        .init();
}

fn load_config(matches: &ArgMatches) -> Result<Html2MjmlConfig, CliError> {
    let mut loader = Loader::new();
    if let Some(path) = matches.get_one::<String>("config") {
        loader = loader.with_file(path);
    }
    let switches = [
        ("no-validate", "convert.validate-output", false),
        ("preserve-class-names", "convert.preserve-class-names", true),
        ("no-inline-styles", "convert.inline-styles", false),
        ("no-wrap", "convert.wrap-content", false),
        ("quiet", "convert.show-warnings", false),
    ];
    for (flag, key, value) in switches {
        if matches.get_flag(flag) {
            loader = loader.set_override(key, value)?;
        }
    }
    if let Some(binary) = matches.get_one::<String>("mjml-bin") {
        loader = loader.set_override("compiler.binary", binary.as_str())?;
    }
    Ok(loader.build()?)
}

fn build_converter(config: &Html2MjmlConfig) -> Result<Converter, CliError> {
    let parser = Html5everParser::new().with_max_input_bytes(config.convert.max_input_bytes);
    let mut converter = Converter::new().with_parser(parser);
    config.register_mappings(converter.registry_mut())?;

    if !config.convert.validate_output {
        return Ok(converter);
    }
    if let Some(binary) = &config.compiler.binary {
        converter = converter.with_compiler(CommandCompiler::new(binary));
    } else if config.compiler.search_path {
        match CommandCompiler::locate() {
            Ok(compiler) => {
                debug!(program = %compiler.program().display(), "using mjml");
                converter = converter.with_compiler(compiler);
            }
            Err(err) => debug!(%err, "no mjml executable"),
        }
    }
    Ok(converter)
}

fn read_input(path: &str) -> Result<String, CliError> {
    let result = if path == "-" {
        let mut source = String::new();
        io::stdin().read_to_string(&mut source).map(|_| source)
    } else {
        fs::read_to_string(path)
    };
    result.map_err(|source| CliError::Read {
        path: path.to_string(),
        source,
    })
}

fn run(matches: &ArgMatches) -> Result<(), CliError> {
    let config = load_config(matches)?;
    let converter = build_converter(&config)?;
    let options = config.convert.to_options();

    let path = matches
        .get_one::<String>("path")
        .map(String::as_str)
        .unwrap_or("-");
    let source = read_input(path)?;
    let conversion = converter.convert_detailed(&source, &options)?;

    let mut rendered = match matches.get_one::<String>("format").map(String::as_str) {
        Some("json") => serde_json::to_string_pretty(&conversion)?,
        _ => conversion.output,
    };
    if !rendered.ends_with('\n') {
        rendered.push('\n');
    }

    match matches.get_one::<String>("output") {
        Some(target) => fs::write(target, rendered).map_err(|source| CliError::Write {
            path: target.clone(),
            source,
        }),
        None => {
            print!("{}", rendered);
            Ok(())
        }
    }
}
