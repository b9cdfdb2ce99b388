//! # Printcraft CLI
//!
//! Command-line interface for encoding saved layouts.
//!
//! ## Usage
//!
//! ```bash
//! # Raw ESC/POS to stdout (pipe it to the printer)
//! printcraft render ticket.json --data order.json > /dev/usb/lp0
//!
//! # Readable transcript of the same commands
//! printcraft render ticket.json --data order.json --mode mnemonic
//!
//! # ZPL label with a printer profile, written into a directory
//! printcraft render label.json --format zpl --profile zebra.json --output out/
//!
//! # List placeholders and which ones the data leaves unresolved
//! printcraft check ticket.json --data order.json
//! ```

use clap::{Parser, Subcommand, ValueEnum};
use std::io::Write;
use std::path::{Path, PathBuf};

use printcraft::{
    PrintcraftError,
    document::{Template, find_placeholders},
    printer::Profile,
    render::{Encoder, Target},
};

/// Printcraft - receipt and label command encoder
#[derive(Parser, Debug)]
#[command(name = "printcraft")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Log encoder decisions to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Encode a template into printer commands
    Render {
        /// Template JSON file (`{"name"?, "blocks": [...]}`)
        template: PathBuf,

        /// Data JSON file for `{{placeholders}}`
        #[arg(long, value_name = "FILE")]
        data: Option<PathBuf>,

        /// Printer profile JSON file (width and margins)
        #[arg(long, value_name = "FILE")]
        profile: Option<PathBuf>,

        /// Printer command language
        #[arg(long, value_enum, default_value_t = Format::Escpos)]
        format: Format,

        /// ESC/POS output form (ignored for ZPL)
        #[arg(long, value_enum, default_value_t = Mode::Raw)]
        mode: Mode,

        /// Output file or directory (defaults to stdout)
        #[arg(long, short, value_name = "PATH")]
        output: Option<PathBuf>,
    },

    /// Report placeholders and unresolved bindings
    Check {
        /// Template JSON file
        template: PathBuf,

        /// Data JSON file
        #[arg(long, value_name = "FILE")]
        data: Option<PathBuf>,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Format {
    Escpos,
    Zpl,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Mode {
    Raw,
    Mnemonic,
}

fn target(format: Format, mode: Mode) -> Target {
    match (format, mode) {
        (Format::Zpl, _) => Target::Zpl,
        (Format::Escpos, Mode::Raw) => Target::EscPosRaw,
        (Format::Escpos, Mode::Mnemonic) => Target::EscPosMnemonic,
    }
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(cli.command) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Logs go to stderr so stdout stays clean for raw output.
fn init_logging(verbose: bool) {
    let default = if verbose { "printcraft=debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default)),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn run(command: Commands) -> Result<(), PrintcraftError> {
    match command {
        Commands::Render {
            template,
            data,
            profile,
            format,
            mode,
            output,
        } => {
            let template = load_template(&template)?;
            let data = data.as_deref().map(load_json).transpose()?;
            let profile = profile.as_deref().map(load_profile).transpose()?;

            let doc = Encoder::new(target(format, mode)).encode_template(
                &template,
                profile.as_ref(),
                data.as_ref(),
            )?;

            match output {
                Some(path) => {
                    let path = if path.is_dir() {
                        path.join(doc.file_name(template.name.as_deref()))
                    } else {
                        path
                    };
                    std::fs::write(&path, doc.as_bytes())?;
                    eprintln!("Wrote {} bytes to {}", doc.len(), path.display());
                }
                None => {
                    let mut stdout = std::io::stdout().lock();
                    stdout.write_all(doc.as_bytes())?;
                    if doc.as_text().is_some() {
                        stdout.write_all(b"\n")?;
                    }
                    stdout.flush()?;
                }
            }
        }

        Commands::Check { template, data } => {
            let template = load_template(&template)?;
            let data = data
                .as_deref()
                .map(load_json)
                .transpose()?
                .unwrap_or(serde_json::Value::Null);

            println!("Placeholders:");
            for block in &template.blocks {
                if let Some(text) = block.template_text() {
                    for path in find_placeholders(text) {
                        println!("  {} ({})", path, block.kind());
                    }
                }
            }

            let missing = template.missing_bindings(&data);
            if missing.is_empty() {
                println!("\nAll placeholders resolve.");
            } else {
                println!("\nMissing bindings:");
                for path in missing {
                    println!("  {}", path);
                }
            }
        }
    }

    Ok(())
}

fn load_template(path: &Path) -> Result<Template, PrintcraftError> {
    Template::from_json(&std::fs::read_to_string(path)?)
}

fn load_profile(path: &Path) -> Result<Profile, PrintcraftError> {
    Ok(serde_json::from_str(&std::fs::read_to_string(path)?)?)
}

fn load_json(path: &Path) -> Result<serde_json::Value, PrintcraftError> {
    Ok(serde_json::from_str(&std::fs::read_to_string(path)?)?)
}
