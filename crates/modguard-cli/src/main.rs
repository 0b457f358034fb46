//! CLI entry point for modguard.
//!
//! This module is intentionally thin: it handles argument parsing, I/O, logging setup, and exit
//! codes. All business logic lives in the `modguard-app` crate.

use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use clap::{Parser, Subcommand};
use modguard_app::{
    CheckInput, ExplainOutput, exit_code, parse_report_json, render_annotations, render_console,
    render_markdown, run_check, run_explain, serialize_report, to_renderable,
};
use modguard_repo::InputError;
use modguard_settings::{DEFAULT_CONFIG_FILE, Overrides};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(
    name = "modguard",
    version,
    about = "Static structure and convention validator for infrastructure configuration modules"
)]
struct Cli {
    /// Path to modguard config TOML, relative to the module directory.
    /// Defaults to `modguard.toml` when present.
    #[arg(long, global = true)]
    config: Option<Utf8PathBuf>,

    /// Override profile (default|strict|relaxed).
    #[arg(long, global = true)]
    profile: Option<String>,

    /// Debug logging on stderr (RUST_LOG takes precedence).
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Validate a module directory and print the report.
    Check {
        /// Module directory to validate.
        #[arg(default_value = ".")]
        dir: Utf8PathBuf,

        /// Write the Markdown report into the module directory (`report_file`).
        #[arg(long)]
        write_markdown: bool,

        /// Write the Markdown report to this path.
        #[arg(long)]
        markdown_out: Option<Utf8PathBuf>,

        /// Write the JSON report to this path.
        #[arg(long)]
        report_out: Option<Utf8PathBuf>,

        /// Replace the required-files set (repeatable; `main` means `main.tf`).
        #[arg(long = "required-file", value_name = "NAME")]
        required_files: Vec<String>,

        /// Override the declaration naming regex.
        #[arg(long)]
        naming_pattern: Option<String>,
    },

    /// Render markdown from an existing JSON report.
    Md {
        /// Path to the JSON report file.
        #[arg(long)]
        report: Utf8PathBuf,

        /// Where to write the Markdown output (if not specified, prints to stdout).
        #[arg(long, short)]
        output: Option<Utf8PathBuf>,
    },

    /// Render GitHub Actions annotations from an existing JSON report.
    Annotations {
        /// Path to the JSON report file.
        #[arg(long)]
        report: Utf8PathBuf,

        /// Maximum number of annotations to emit.
        #[arg(long, default_value = "10")]
        max: usize,
    },

    /// Explain a check_id or code with remediation guidance.
    Explain {
        /// The check_id (e.g., "naming.convention") or code (e.g., "missing_validation") to explain.
        identifier: String,
    },
}

struct CheckArgs {
    dir: Utf8PathBuf,
    write_markdown: bool,
    markdown_out: Option<Utf8PathBuf>,
    report_out: Option<Utf8PathBuf>,
    required_files: Vec<String>,
    naming_pattern: Option<String>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.cmd {
        Commands::Check {
            ref dir,
            write_markdown,
            ref markdown_out,
            ref report_out,
            ref required_files,
            ref naming_pattern,
        } => {
            let args = CheckArgs {
                dir: dir.clone(),
                write_markdown,
                markdown_out: markdown_out.clone(),
                report_out: report_out.clone(),
                required_files: required_files.clone(),
                naming_pattern: naming_pattern.clone(),
            };
            cmd_check(&cli, args)
        }
        Commands::Md { report, output } => cmd_md(report, output),
        Commands::Annotations { report, max } => cmd_annotations(report, max),
        Commands::Explain { identifier } => cmd_explain(&identifier),
    }
}

/// Logs go to stderr so stdout carries only the report.
fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .init();
}

fn cmd_check(cli: &Cli, args: CheckArgs) -> anyhow::Result<()> {
    let result = (|| -> anyhow::Result<i32> {
        let cfg_text = load_config_text(&args.dir, cli.config.as_deref())?;

        let overrides = Overrides {
            profile: cli.profile.clone(),
            required_files: args.required_files.clone(),
            naming_pattern: args.naming_pattern.clone(),
        };

        let output = run_check(CheckInput {
            module_dir: &args.dir,
            config_text: &cfg_text,
            overrides,
        })?;

        let renderable = to_renderable(&output.report);
        print!("{}", render_console(&renderable));

        if let Some(report_out) = &args.report_out {
            let data = serialize_report(&output.report)?;
            write_bytes_file(report_out, &data).context("write report json")?;
        }

        if args.write_markdown || args.markdown_out.is_some() {
            let md = render_markdown(&renderable);
            if args.write_markdown {
                let path = args.dir.join(&output.resolved_config.report_file);
                write_bytes_file(&path, md.as_bytes()).context("write markdown")?;
                tracing::info!(path = %path, "wrote markdown report");
            }
            if let Some(markdown_out) = &args.markdown_out {
                write_bytes_file(markdown_out, md.as_bytes()).context("write markdown")?;
            }
        }

        Ok(exit_code(&output.report))
    })();

    match result {
        Ok(code) => {
            if code != 0 {
                std::process::exit(code);
            }
            Ok(())
        }
        Err(err) => {
            if let Some(input) = err.downcast_ref::<InputError>() {
                eprintln!("modguard: input error: {input}");
                if let InputError::Unreadable { source, .. } = input {
                    eprintln!("  caused by: {source}");
                }
            } else {
                eprintln!("modguard error: {err:#}");
            }
            std::process::exit(1);
        }
    }
}

/// An explicit `--config` must exist; the default `modguard.toml` is optional.
fn load_config_text(dir: &Utf8Path, explicit: Option<&Utf8Path>) -> anyhow::Result<String> {
    match explicit {
        Some(path) => {
            let path = dir.join(path);
            std::fs::read_to_string(&path).with_context(|| format!("read config: {path}"))
        }
        None => {
            let path = dir.join(DEFAULT_CONFIG_FILE);
            match std::fs::read_to_string(&path) {
                Ok(text) => {
                    tracing::debug!(path = %path, "loaded config");
                    Ok(text)
                }
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(String::new()),
                Err(e) => Err(e).with_context(|| format!("read config: {path}")),
            }
        }
    }
}

fn write_bytes_file(path: &Utf8Path, data: &[u8]) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_str().is_empty()) {
        std::fs::create_dir_all(parent).with_context(|| format!("create directory: {parent}"))?;
    }
    std::fs::write(path, data).with_context(|| format!("write: {path}"))?;
    Ok(())
}

fn cmd_md(report_path: Utf8PathBuf, output: Option<Utf8PathBuf>) -> anyhow::Result<()> {
    let report_text = std::fs::read_to_string(&report_path)
        .with_context(|| format!("read report: {report_path}"))?;
    let report = parse_report_json(&report_text)?;
    let md = render_markdown(&to_renderable(&report));

    if let Some(out_path) = output {
        write_bytes_file(&out_path, md.as_bytes()).context("write markdown output")?;
    } else {
        print!("{md}");
    }

    Ok(())
}

fn cmd_annotations(report_path: Utf8PathBuf, max: usize) -> anyhow::Result<()> {
    let report_text = std::fs::read_to_string(&report_path)
        .with_context(|| format!("read report: {report_path}"))?;
    let report = parse_report_json(&report_text)?;

    for annotation in render_annotations(&to_renderable(&report), max) {
        println!("{annotation}");
    }

    Ok(())
}

fn cmd_explain(identifier: &str) -> anyhow::Result<()> {
    match run_explain(identifier) {
        ExplainOutput::Found(exp) => {
            print!("{}", modguard_app::format_explanation(&exp));
            Ok(())
        }
        ExplainOutput::NotFound {
            identifier,
            available_check_ids,
            available_codes,
        } => {
            eprint!(
                "{}",
                modguard_app::format_not_found(&identifier, available_check_ids, available_codes)
            );
            std::process::exit(1);
        }
    }
}
