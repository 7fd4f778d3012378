// Command-line interface for scel2rime.
//
// Uses explicit subcommands and long-form options: single-file and batch
// conversion, plus `dump` and `info` for inspecting a SCEL file without
// writing a dictionary.

use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process;

use clap::{ArgAction, Args, Parser, Subcommand, ValueHint};
use log::warn;

use crate::io::{self as convert, ConvertError, ConvertOptions, ConvertStats};
use crate::scel::{Entry, PHRASE_SECTION_START, PINYIN_SECTION_START};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

const DEFAULT_DICT_VERSION: &str = "1.0";

const BUF_SIZE: usize = 64 * 1024;

// ---------------------------------------------------------------------------
// Clap CLI definition
// ---------------------------------------------------------------------------

/// Convert Sogou SCEL dictionaries into RIME dict.yaml files.
#[derive(Parser, Debug)]
#[command(
    name = "scel2rime",
    version,
    about = "SCEL to RIME dictionary converter",
    arg_required_else_help = true
)]
struct Cli {
    #[command(subcommand)]
    command: Cmd,

    /// Force overwrite existing output files.
    #[arg(short = 'f', long, global = true)]
    force: bool,

    /// Quiet mode (suppress non-error output).
    #[arg(short = 'q', long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    /// Verbose mode (use multiple times for more detail).
    #[arg(short = 'v', long, global = true, action = ArgAction::Count)]
    verbose: u8,

    /// Output stats as JSON to stderr.
    #[arg(long = "json", global = true)]
    json_output: bool,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// Convert one SCEL file.
    Convert(ConvertArgs),
    /// Convert several SCEL files into a directory.
    Batch(BatchArgs),
    /// Print decoded entries without the RIME header.
    Dump(InspectArgs),
    /// Print section and table statistics for a SCEL file.
    Info(InspectArgs),
    /// Print build/configuration details.
    Config,
}

#[derive(Args, Debug)]
struct ConvertArgs {
    /// Input SCEL file.
    #[arg(long, value_hint = ValueHint::FilePath, conflicts_with = "input_pos")]
    input: Option<PathBuf>,

    /// Output dictionary (default: stdout).
    #[arg(long, value_hint = ValueHint::FilePath, conflicts_with = "output_pos")]
    output: Option<PathBuf>,

    /// Write output to stdout.
    #[arg(short = 'c', long)]
    stdout: bool,

    /// Dictionary name (default: derived from the output file name).
    #[arg(long, short = 'n')]
    name: Option<String>,

    /// Dictionary version written into the header.
    #[arg(long = "dict-version", default_value = DEFAULT_DICT_VERSION)]
    dict_version: String,

    /// Input file (positional form).
    #[arg(value_hint = ValueHint::FilePath)]
    input_pos: Option<PathBuf>,

    /// Output file (positional form).
    #[arg(value_hint = ValueHint::FilePath)]
    output_pos: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct BatchArgs {
    /// Directory receiving `<name>.dict.yaml` files.
    #[arg(long = "output-dir", short = 'o', value_hint = ValueHint::DirPath, default_value = ".")]
    output_dir: PathBuf,

    /// Dictionary version written into every header.
    #[arg(long = "dict-version", default_value = DEFAULT_DICT_VERSION)]
    dict_version: String,

    /// Input SCEL files.
    #[arg(value_hint = ValueHint::FilePath, required = true)]
    inputs: Vec<PathBuf>,
}

#[derive(Args, Debug)]
struct InspectArgs {
    /// SCEL input file.
    #[arg(value_hint = ValueHint::FilePath)]
    input: PathBuf,
}

// ---------------------------------------------------------------------------
// Resolved command + options (flattened from Cli)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Convert,
    Batch,
    Dump,
    Info,
    Config,
}

struct Options {
    command: Command,
    use_stdout: bool,
    force: bool,
    quiet: bool,
    verbose: u8,
    json_output: bool,
    name: Option<String>,
    dict_version: String,
    input_file: Option<PathBuf>,
    output_file: Option<PathBuf>,
    batch_inputs: Vec<PathBuf>,
    output_dir: PathBuf,
}

fn resolve_options(cli: Cli) -> Options {
    let base = Options {
        command: Command::Config,
        use_stdout: false,
        force: cli.force,
        quiet: cli.quiet,
        verbose: cli.verbose.min(2),
        json_output: cli.json_output,
        name: None,
        dict_version: DEFAULT_DICT_VERSION.to_string(),
        input_file: None,
        output_file: None,
        batch_inputs: Vec::new(),
        output_dir: PathBuf::from("."),
    };

    match cli.command {
        Cmd::Convert(args) => Options {
            command: Command::Convert,
            use_stdout: args.stdout,
            name: args.name,
            dict_version: args.dict_version,
            input_file: args.input.or(args.input_pos),
            output_file: args.output.or(args.output_pos),
            ..base
        },
        Cmd::Batch(args) => Options {
            command: Command::Batch,
            dict_version: args.dict_version,
            batch_inputs: args.inputs,
            output_dir: args.output_dir,
            ..base
        },
        Cmd::Dump(args) => Options {
            command: Command::Dump,
            input_file: Some(args.input),
            ..base
        },
        Cmd::Info(args) => Options {
            command: Command::Info,
            input_file: Some(args.input),
            ..base
        },
        Cmd::Config => base,
    }
}

/// Log filter implied by `-q` / `-v`; `RUST_LOG` still wins.
fn log_filter(opts: &Options) -> &'static str {
    if opts.quiet {
        return "error";
    }
    match opts.verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    }
}

// ---------------------------------------------------------------------------
// Config command
// ---------------------------------------------------------------------------

fn cmd_config() -> i32 {
    let version = env!("CARGO_PKG_VERSION");
    eprintln!("scel2rime version {version} (Rust)");

    let cli = cfg!(feature = "cli") as u8;
    let parallel = cfg!(feature = "parallel") as u8;

    eprintln!("CLI={cli}");
    eprintln!("PARALLEL={parallel}");
    eprintln!("PINYIN_SECTION_START={PINYIN_SECTION_START:#x}");
    eprintln!("PHRASE_SECTION_START={PHRASE_SECTION_START:#x}");
    eprintln!("DEFAULT_DICT_VERSION={DEFAULT_DICT_VERSION}");

    0
}

// ---------------------------------------------------------------------------
// Shared helpers
// ---------------------------------------------------------------------------

fn require_input(opts: &Options) -> Option<&Path> {
    let path = opts.input_file.as_deref();
    if path.is_none() {
        eprintln!("scel2rime: an input file is required");
    }
    path
}

fn report_stats(opts: &Options, input: &Path, output: Option<&Path>, stats: &ConvertStats) {
    if opts.verbose > 0 && !opts.quiet {
        eprintln!(
            "scel2rime: {}: {} syllables, {} groups, {} entries, output size: {}",
            input.display(),
            stats.summary.syllables,
            stats.summary.groups,
            stats.summary.entries,
            stats.output_size
        );
    }

    if opts.json_output {
        let json = serde_json::json!({
            "command": "convert",
            "input": input.display().to_string(),
            "output": output.map(|p| p.display().to_string()),
            "name": stats.name,
            "input_size": stats.input_size,
            "output_size": stats.output_size,
            "syllables": stats.summary.syllables,
            "groups": stats.summary.groups,
            "entries": stats.summary.entries,
            "stop": stats.summary.stop.to_string(),
        });
        eprintln!("{json:#}");
    }
}

fn report_error(path: &Path, err: &ConvertError) {
    match err {
        ConvertError::OutputExists(out) => eprintln!(
            "scel2rime: output file exists, use -f to overwrite: {}",
            out.display()
        ),
        other => eprintln!("scel2rime: {}: {other}", path.display()),
    }
}

// ---------------------------------------------------------------------------
// Convert command
// ---------------------------------------------------------------------------

fn cmd_convert(opts: &Options) -> i32 {
    let Some(input) = require_input(opts) else {
        return 1;
    };

    let convert_opts = ConvertOptions {
        name: opts.name.clone(),
        version: opts.dict_version.clone(),
        overwrite: opts.force,
    };

    let result = match (opts.use_stdout, &opts.output_file) {
        (true, _) | (_, None) => convert::read_scel(input).and_then(|scel| {
            let meta = convert_opts.meta_for(input, None);
            let out = BufWriter::with_capacity(BUF_SIZE, io::stdout().lock());
            convert::write_dict(&scel, meta, out)
        }),
        (false, Some(path)) => convert::convert_file(input, path, &convert_opts),
    };

    match result {
        Ok(stats) => {
            let output = if opts.use_stdout {
                None
            } else {
                opts.output_file.as_deref()
            };
            report_stats(opts, input, output, &stats);
            0
        }
        Err(e) => {
            report_error(input, &e);
            1
        }
    }
}

// ---------------------------------------------------------------------------
// Batch command
// ---------------------------------------------------------------------------

fn cmd_batch(opts: &Options) -> i32 {
    if let Err(e) = std::fs::create_dir_all(&opts.output_dir) {
        eprintln!("scel2rime: output dir: {}: {e}", opts.output_dir.display());
        return 1;
    }

    let results = convert::convert_batch(
        &opts.batch_inputs,
        &opts.output_dir,
        &opts.dict_version,
        opts.force,
    );

    let mut failed = 0usize;
    let mut json_rows = Vec::new();
    for (input, result) in opts.batch_inputs.iter().zip(&results) {
        let output = convert::batch_output_path(input, &opts.output_dir);
        match result {
            Ok(stats) => {
                if opts.verbose > 0 && !opts.quiet {
                    eprintln!(
                        "scel2rime: {} -> {}: {} entries",
                        input.display(),
                        output.display(),
                        stats.summary.entries
                    );
                }
                json_rows.push(serde_json::json!({
                    "input": input.display().to_string(),
                    "output": output.display().to_string(),
                    "entries": stats.summary.entries,
                    "output_size": stats.output_size,
                }));
            }
            Err(e) => {
                failed += 1;
                report_error(input, e);
                json_rows.push(serde_json::json!({
                    "input": input.display().to_string(),
                    "error": e.to_string(),
                }));
            }
        }
    }

    if opts.json_output {
        let json = serde_json::json!({
            "command": "batch",
            "converted": results.len() - failed,
            "failed": failed,
            "files": json_rows,
        });
        eprintln!("{json:#}");
    }

    if failed > 0 { 1 } else { 0 }
}

// ---------------------------------------------------------------------------
// Dump command
// ---------------------------------------------------------------------------

fn cmd_dump(opts: &Options) -> i32 {
    let Some(input) = require_input(opts) else {
        return 1;
    };

    let scel = match convert::read_scel(input) {
        Ok(scel) => scel,
        Err(e) => {
            report_error(input, &e);
            return 1;
        }
    };

    let mut out = BufWriter::with_capacity(BUF_SIZE, io::stdout().lock());
    if let Err(e) = write_pairs(&mut out, &scel.entries) {
        eprintln!("scel2rime: write error: {e}");
        return 1;
    }

    0
}

fn write_pairs<W: Write>(out: &mut W, entries: &[Entry]) -> io::Result<()> {
    for entry in entries {
        writeln!(out, "{}\t{}", entry.phrase, entry.pinyin)?;
    }
    out.flush()
}

// ---------------------------------------------------------------------------
// Info command
// ---------------------------------------------------------------------------

fn cmd_info(opts: &Options) -> i32 {
    let Some(input) = require_input(opts) else {
        return 1;
    };

    let scel = match convert::read_scel(input) {
        Ok(scel) => scel,
        Err(e) => {
            report_error(input, &e);
            return 1;
        }
    };
    let summary = &scel.summary;

    if opts.json_output {
        let json = serde_json::json!({
            "command": "info",
            "input": input.display().to_string(),
            "input_size": scel.input_size,
            "pinyin_section": PINYIN_SECTION_START,
            "phrase_section": PHRASE_SECTION_START,
            "syllables": summary.syllables,
            "groups": summary.groups,
            "entries": summary.entries,
            "stop": summary.stop.to_string(),
        });
        eprintln!("{json:#}");
    }

    println!("SCEL file:                  {}", input.display());
    println!("SCEL file size:             {}", scel.input_size);
    println!("SCEL palette offset:        {PINYIN_SECTION_START:#x}");
    println!("SCEL phrase table offset:   {PHRASE_SECTION_START:#x}");
    println!("SCEL syllables:             {}", summary.syllables);
    println!("SCEL phrase groups:         {}", summary.groups);
    println!("SCEL entries:               {}", summary.entries);
    println!("SCEL table end:             {}", summary.stop);

    0
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

pub fn run() -> ! {
    let cli = Cli::parse();
    let mut opts = resolve_options(cli);

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_filter(&opts)))
        .format_timestamp(None)
        .format_target(false)
        .init();

    if opts.use_stdout
        && let Some(path) = opts.output_file.take()
    {
        warn!("-c option overrides output filename: {}", path.display());
    }

    let exit_code = match opts.command {
        Command::Convert => cmd_convert(&opts),
        Command::Batch => cmd_batch(&opts),
        Command::Dump => cmd_dump(&opts),
        Command::Info => cmd_info(&opts),
        Command::Config => cmd_config(),
    };

    process::exit(exit_code);
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_opts(args: &[&str]) -> Options {
        let argv: Vec<String> = std::iter::once("scel2rime".to_string())
            .chain(args.iter().map(|s| s.to_string()))
            .collect();
        let cli = Cli::try_parse_from(argv).expect("cli parse failed");
        resolve_options(cli)
    }

    #[test]
    fn convert_positional_form() {
        let opts = parse_opts(&["convert", "words.scel", "words.dict.yaml"]);
        assert_eq!(opts.command, Command::Convert);
        assert_eq!(opts.input_file, Some(PathBuf::from("words.scel")));
        assert_eq!(opts.output_file, Some(PathBuf::from("words.dict.yaml")));
        assert_eq!(opts.dict_version, "1.0");
        assert!(opts.name.is_none());
    }

    #[test]
    fn convert_flag_form() {
        let opts = parse_opts(&[
            "--force",
            "convert",
            "--input",
            "in.scel",
            "--output",
            "out.dict.yaml",
            "--name",
            "luna",
            "--dict-version",
            "2024.10",
        ]);
        assert!(opts.force);
        assert_eq!(opts.input_file, Some(PathBuf::from("in.scel")));
        assert_eq!(opts.output_file, Some(PathBuf::from("out.dict.yaml")));
        assert_eq!(opts.name.as_deref(), Some("luna"));
        assert_eq!(opts.dict_version, "2024.10");
    }

    #[test]
    fn input_flag_conflicts_with_positional() {
        let argv = ["scel2rime", "convert", "--input", "a.scel", "b.scel"];
        assert!(Cli::try_parse_from(argv).is_err());
    }

    #[test]
    fn stdout_flag() {
        let opts = parse_opts(&["convert", "-c", "in.scel"]);
        assert!(opts.use_stdout);
        assert!(opts.output_file.is_none());
    }

    #[test]
    fn batch_flags_parse() {
        let opts = parse_opts(&[
            "batch",
            "--output-dir",
            "dicts",
            "--dict-version",
            "7",
            "a.scel",
            "b.scel",
        ]);
        assert_eq!(opts.command, Command::Batch);
        assert_eq!(opts.output_dir, PathBuf::from("dicts"));
        assert_eq!(opts.dict_version, "7");
        assert_eq!(
            opts.batch_inputs,
            vec![PathBuf::from("a.scel"), PathBuf::from("b.scel")]
        );
    }

    #[test]
    fn batch_requires_inputs() {
        assert!(Cli::try_parse_from(["scel2rime", "batch"]).is_err());
    }

    #[test]
    fn inspect_commands_map() {
        let dump = parse_opts(&["dump", "in.scel"]);
        assert_eq!(dump.command, Command::Dump);
        assert_eq!(dump.input_file, Some(PathBuf::from("in.scel")));
        assert_eq!(parse_opts(&["info", "in.scel"]).command, Command::Info);
        assert_eq!(parse_opts(&["config"]).command, Command::Config);
    }

    #[test]
    fn verbose_is_capped() {
        let opts = parse_opts(&["-v", "-v", "-v", "info", "in.scel"]);
        assert_eq!(opts.verbose, 2);
    }

    #[test]
    fn quiet_conflicts_with_verbose() {
        assert!(Cli::try_parse_from(["scel2rime", "-q", "-v", "config"]).is_err());
    }

    #[test]
    fn log_filter_levels() {
        assert_eq!(log_filter(&parse_opts(&["config"])), "warn");
        assert_eq!(log_filter(&parse_opts(&["-v", "config"])), "info");
        assert_eq!(log_filter(&parse_opts(&["-vv", "config"])), "debug");
        assert_eq!(log_filter(&parse_opts(&["--quiet", "config"])), "error");
    }

    #[test]
    fn dump_lines_have_no_weight() {
        let entries = [Entry {
            phrase: "你好".into(),
            pinyin: "ni hao".into(),
        }];
        let mut out = Vec::new();
        write_pairs(&mut out, &entries).unwrap();
        assert_eq!(out, "你好\tni hao\n".as_bytes());
    }

    #[test]
    fn json_flag_is_global() {
        assert!(parse_opts(&["info", "--json", "in.scel"]).json_output);
    }
}
