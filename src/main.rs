//! CLI entry point for `tnefextract`.

use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::{CommandFactory, Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};

use tnefextract::batch::{self, BatchOptions, FileOutcome};
use tnefextract::config::Config;
use tnefextract::export::attachment::attachment_filename;
use tnefextract::{DecodeMode, DecodedMessage, TnefError};

#[derive(Parser)]
#[command(
    name = "tnefextract",
    version,
    about = "Extract attachments and message bodies from TNEF (winmail.dat) files"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose logging (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Fail on malformed input instead of keeping partial results
    #[arg(long, global = true)]
    strict: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse every TNEF file inside a directory
    Parse {
        /// Directory to scan and parse
        #[arg(value_name = "DIRECTORY", required_unless_present = "directory_flag")]
        directory: Option<PathBuf>,
        /// Directory to scan and parse
        #[arg(short = 'd', long = "directory", value_name = "DIRECTORY")]
        directory_flag: Option<PathBuf>,
        /// Also write message bodies
        #[arg(long)]
        bodies: bool,
    },
    /// Extract the attachments of a single file
    Extract {
        path: PathBuf,
        #[arg(short, long)]
        output: PathBuf,
        /// Also write message bodies
        #[arg(long)]
        bodies: bool,
    },
    /// Show what a TNEF file contains
    Info {
        path: PathBuf,
        #[arg(long)]
        json: bool,
    },
    /// Generate shell completions
    Completions {
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
    /// Generate a man page
    Manpage,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = tnefextract::config::load_config();
    if cli.strict {
        config.decode.strict = true;
    }

    let log_level = match cli.verbose {
        0 => config.general.log_level.as_str(),
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    setup_logging(log_level, &config);

    match cli.command {
        Commands::Parse {
            directory,
            directory_flag,
            bodies,
        } => {
            let Some(dir) = directory.or(directory_flag) else {
                anyhow::bail!("No directory specified");
            };
            if bodies {
                config.extract.write_bodies = true;
            }
            cmd_parse(&dir, &config)
        }
        Commands::Extract {
            path,
            output,
            bodies,
        } => {
            if bodies {
                config.extract.write_bodies = true;
            }
            cmd_extract(&path, &output, &config)
        }
        Commands::Info { path, json } => cmd_info(&path, json, &config),
        Commands::Completions { shell } => cmd_completions(shell),
        Commands::Manpage => cmd_manpage(),
    }
}

/// Set up tracing with stderr output and optional file logging.
fn setup_logging(level: &str, config: &Config) {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    let stderr_layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);

    let log_path = tnefextract::config::log_file_path(config);
    let log_dir = log_path.parent().unwrap_or(Path::new("."));
    let log_name = log_path.file_name().unwrap_or(std::ffi::OsStr::new("tnefextract.log"));
    if std::fs::create_dir_all(log_dir).is_ok() {
        let file_appender = tracing_appender::rolling::never(log_dir, log_name);
        let file_layer = tracing_subscriber::fmt::layer()
            .with_ansi(false)
            .with_writer(file_appender);

        tracing_subscriber::registry()
            .with(env_filter)
            .with(stderr_layer)
            .with(file_layer)
            .init();
    } else {
        // Fall back to stderr only
        tracing_subscriber::registry()
            .with(env_filter)
            .with(stderr_layer)
            .init();
    }
}

/// Generate shell completions and print to stdout.
fn cmd_completions(shell: clap_complete::Shell) -> anyhow::Result<()> {
    let mut cmd = Cli::command();
    clap_complete::generate(shell, &mut cmd, "tnefextract", &mut std::io::stdout());
    Ok(())
}

/// Generate a man page and print to stdout.
fn cmd_manpage() -> anyhow::Result<()> {
    let cmd = Cli::command();
    let man = clap_mangen::Man::new(cmd);
    let mut buf = Vec::new();
    man.render(&mut buf)?;
    std::io::Write::write_all(&mut std::io::stdout(), &buf)?;
    Ok(())
}

/// Extract every TNEF file in a directory into its output subdirectory.
fn cmd_parse(dir: &Path, config: &Config) -> anyhow::Result<()> {
    if !dir.is_dir() {
        anyhow::bail!("Directory not found: {}", dir.display());
    }

    let options = BatchOptions::from(config);
    let pb = ProgressBar::new(0);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} Parsing [{bar:40.cyan/blue}] {pos}/{len} files")
            .expect("valid template")
            .progress_chars("#>-"),
    );

    let start = Instant::now();
    let stats = batch::process_directory(dir, &options, &|current, total| {
        pb.set_length(total as u64);
        pb.set_position(current as u64);
    })?;
    pb.finish_and_clear();

    println!();
    println!("  {:<25} {}", "Files examined", stats.files_seen);
    println!("  {:<25} {}", "TNEF files", stats.tnef_files);
    println!("  {:<25} {}", "Skipped", stats.skipped);
    println!("  {:<25} {}", "Failed", stats.failed);
    println!("  {:<25} {}", "Attachments written", stats.attachments_written);
    if options.write_bodies {
        println!("  {:<25} {}", "Bodies written", stats.bodies_written);
    }
    println!(
        "  {:<25} {}",
        "Output directory",
        dir.join(&options.output_dir_name).display()
    );
    println!("  {:<25} {:.2?}", "Elapsed", start.elapsed());
    println!();

    Ok(())
}

/// Extract a single file.
fn cmd_extract(path: &Path, output: &Path, config: &Config) -> anyhow::Result<()> {
    if !path.exists() {
        anyhow::bail!("File not found: {}", path.display());
    }

    let options = BatchOptions::from(config);
    match batch::extract_file(path, output, &options)? {
        FileOutcome::Extracted {
            attachments,
            bodies,
        } => {
            for p in attachments.iter().chain(bodies.iter()) {
                println!("  {}", p.display());
            }
            println!(
                "  Extracted {} attachment(s) to {}",
                attachments.len(),
                output.display()
            );
        }
        FileOutcome::NotTnef => {
            anyhow::bail!("{} is not a TNEF file", path.display());
        }
        FileOutcome::TooLarge { size } => {
            return Err(TnefError::FileTooLarge {
                path: path.to_path_buf(),
                size,
                limit: options.max_file_size,
            }
            .into());
        }
    }
    Ok(())
}

/// Show the contents of a TNEF file.
fn cmd_info(path: &Path, json: bool, config: &Config) -> anyhow::Result<()> {
    let mode = if config.decode.strict {
        DecodeMode::Strict
    } else {
        DecodeMode::Lenient
    };
    let Some(message) = tnefextract::decode_file(path, mode)? else {
        anyhow::bail!("{} is not a TNEF file", path.display());
    };

    if json {
        print_info_json(path, &message, config)
    } else {
        print_info_table(path, &message, config);
        Ok(())
    }
}

/// Print a human-readable summary.
fn print_info_table(path: &Path, message: &DecodedMessage, config: &Config) {
    use humansize::{format_size, BINARY};

    println!();
    println!("  {:<20} {}", "File", path.display());
    if let Some(class) = message.message_class() {
        println!("  {:<20} {}", "Message class", class);
    }
    if let Some(subject) = message.subject() {
        println!("  {:<20} {}", "Subject", subject);
    }
    println!("  {:<20} {}", "Properties", message.properties.len());
    println!(
        "  {:<20} {}",
        "Plain-text body",
        describe_body(message.body.as_deref())
    );
    println!(
        "  {:<20} {}",
        "HTML body",
        describe_body(message.body_html.as_deref())
    );
    println!("  {:<20} {}", "Attachments", message.attachments.len());

    if !message.attachments.is_empty() {
        println!();
        println!("  {:<4} {:<50} {:>10}  {}", "#", "Name", "Size", "Type");
        println!("  {}", "-".repeat(80));
        for (i, att) in message.attachments.iter().enumerate() {
            let name = attachment_filename(att, i, config.extract.max_filename_len);
            let name_trunc: String = name.chars().take(49).collect();
            println!(
                "  {:<4} {:<50} {:>10}  {}",
                i + 1,
                name_trunc,
                format_size(att.size(), BINARY),
                att.mime_type().unwrap_or_default()
            );
        }
    }
    println!();
}

fn describe_body(body: Option<&[u8]>) -> String {
    match body {
        Some(b) => humansize::format_size(b.len(), humansize::BINARY),
        None => "-".to_string(),
    }
}

/// Print the summary as JSON.
fn print_info_json(path: &Path, message: &DecodedMessage, config: &Config) -> anyhow::Result<()> {
    let attachments: Vec<serde_json::Value> = message
        .attachments
        .iter()
        .enumerate()
        .map(|(i, att)| {
            serde_json::json!({
                "index": i,
                "title": att.title,
                "file_name": attachment_filename(att, i, config.extract.max_filename_len),
                "size": att.size(),
                "has_data": att.data.is_some(),
                "mime_type": att.mime_type(),
                "property_count": att.properties.len(),
            })
        })
        .collect();

    let properties: Vec<serde_json::Value> = message
        .properties
        .iter()
        .map(|p| {
            serde_json::json!({
                "id": format!("{:#06X}", p.property_id),
                "type": format!("{:?}", p.base_type),
                "guid": p.guid.map(|g| g.to_string()),
                "values": p.values.len(),
            })
        })
        .collect();

    let output = serde_json::json!({
        "file": path.to_string_lossy(),
        "message_class": message.message_class(),
        "subject": message.subject(),
        "body": message.body_text(),
        "body_html": message.body_html_text(),
        "attachments": attachments,
        "properties": properties,
    });

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
