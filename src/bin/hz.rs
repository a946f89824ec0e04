/// hz – Huffman-code a file with the sequential or parallel pipeline.
///
///   hz file.bin           → compress to file.bin.hz with all cores
///   hz -s file.bin        → compress on a single thread
///   hz -t 4 file.bin      → compress with 4 worker threads
///   hz -o out.hz file.bin → choose the output path
///
/// The elapsed compression time in seconds is printed to stdout.
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{self, ExitCode};
use std::time::Instant;

use log::{debug, Level, LevelFilter, Log, Metadata, Record};

use huffpar::frequency::get_frequency;
use huffpar::pipeline::{self, resolve_thread_count, CompressOptions};

fn usage() {
    eprintln!("hz - parallel Huffman compressor");
    eprintln!();
    eprintln!("Usage: hz [OPTIONS] FILE");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  -s, --serial       Use the single-threaded pipeline");
    eprintln!("  -t, --threads N    Number of worker threads (0=auto)");
    eprintln!("  -o, --output PATH  Output file (default: FILE.hz)");
    eprintln!("  -f, --force        Overwrite an existing output file");
    eprintln!("  -q, --quiet        Suppress warnings");
    eprintln!("  -v, --verbose      Verbose output");
    eprintln!("  -h, --help         Show this help");
    eprintln!();
    eprintln!("The output holds only the packed code bits, zero-padded to a byte.");
}

/// Writes `hz: <level>: <message>` lines to stderr.
struct StderrLogger;

impl Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let level = match record.level() {
                Level::Error => "error",
                Level::Warn => "warning",
                Level::Info => "info",
                Level::Debug => "debug",
                Level::Trace => "trace",
            };
            eprintln!("hz: {level}: {}", record.args());
        }
    }

    fn flush(&self) {}
}

static LOGGER: StderrLogger = StderrLogger;

fn init_logger(opts: &Opts) {
    let level = if opts.quiet {
        LevelFilter::Off
    } else if opts.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };
    if log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(level);
    }
}

#[derive(Debug)]
struct Opts {
    serial: bool,
    force: bool,
    verbose: bool,
    quiet: bool,
    threads: usize,
    output: Option<PathBuf>,
    file: Option<String>,
}

fn parse_args() -> Opts {
    let args: Vec<String> = env::args().skip(1).collect();
    let mut opts = Opts {
        serial: false,
        force: false,
        verbose: false,
        quiet: false,
        threads: 0,
        output: None,
        file: None,
    };

    let mut i = 0;
    while i < args.len() {
        let arg = &args[i];
        match arg.as_str() {
            "-s" | "--serial" => opts.serial = true,
            "-f" | "--force" => opts.force = true,
            "-v" | "--verbose" => opts.verbose = true,
            "-q" | "--quiet" => opts.quiet = true,
            "-h" | "--help" => {
                usage();
                process::exit(0);
            }
            "-t" | "--threads" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("hz: missing argument for -t");
                    process::exit(1);
                }
                opts.threads = match args[i].parse::<usize>() {
                    Ok(n) => n,
                    Err(_) => {
                        eprintln!("hz: invalid thread count '{}'", args[i]);
                        process::exit(1);
                    }
                };
            }
            "-o" | "--output" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("hz: missing argument for -o");
                    process::exit(1);
                }
                opts.output = Some(PathBuf::from(&args[i]));
            }
            // Combined short flags like -sv, -fq.
            s if s.starts_with('-') && !s.starts_with("--") && s.len() > 2 => {
                for ch in s[1..].chars() {
                    match ch {
                        's' => opts.serial = true,
                        'f' => opts.force = true,
                        'v' => opts.verbose = true,
                        'q' => opts.quiet = true,
                        _ => {
                            eprintln!("hz: unknown flag '-{ch}'");
                            process::exit(1);
                        }
                    }
                }
            }
            s if s.starts_with('-') => {
                eprintln!("hz: unknown option '{s}'");
                process::exit(1);
            }
            _ => {
                if opts.file.is_some() {
                    eprintln!("hz: only one input file is accepted");
                    process::exit(1);
                }
                opts.file = Some(arg.clone());
            }
        }
        i += 1;
    }

    opts
}

fn output_path(opts: &Opts, input: &str) -> PathBuf {
    opts.output
        .clone()
        .unwrap_or_else(|| PathBuf::from(format!("{input}.hz")))
}

fn build_cli_options(opts: &Opts) -> CompressOptions {
    CompressOptions {
        threads: if opts.serial { 1 } else { opts.threads },
    }
}

fn process_compress(opts: &Opts, path: &str) -> Result<(), String> {
    let out_path = output_path(opts, path);
    let out_str = out_path.display().to_string();
    if out_path.exists() && !opts.force {
        return Err(format!("{out_str} already exists; use -f to overwrite"));
    }

    let data = fs::read(Path::new(path)).map_err(|e| format!("{path}: {e}"))?;
    let options = build_cli_options(opts);
    let workers = resolve_thread_count(options.threads);
    debug!("{path}: {} bytes, {workers} worker(s)", data.len());

    let start = Instant::now();
    let compressed =
        pipeline::compress_with_options(&data, &options).map_err(|e| format!("{path}: {e}"))?;
    let elapsed = start.elapsed();
    println!("{:.6}", elapsed.as_secs_f64());

    fs::write(&out_path, &compressed.bytes).map_err(|e| format!("{out_str}: {e}"))?;

    if opts.verbose {
        let freq = get_frequency(&data);
        let ratio = if data.is_empty() {
            0.0
        } else {
            compressed.bytes.len() as f64 / data.len() as f64
        };
        eprintln!(
            "{path}: {} → {} bytes ({} bits, ratio {ratio:.3})",
            data.len(),
            compressed.bytes.len(),
            compressed.bit_len
        );
        eprintln!(
            "{path}: entropy {:.3} bits/byte, {} distinct symbols, {workers} worker(s)",
            freq.entropy(),
            freq.used
        );
    }

    Ok(())
}

fn run() -> Result<(), ()> {
    let opts = parse_args();
    init_logger(&opts);

    let Some(path) = opts.file.as_deref() else {
        usage();
        return Err(());
    };

    if let Err(e) = process_compress(&opts, path) {
        eprintln!("hz: {e}");
        return Err(());
    }
    Ok(())
}

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(()) => ExitCode::FAILURE,
    }
}
