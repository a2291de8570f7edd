//! pdfoutline CLI - PDF title and heading outline extraction tool

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use pdfoutline::batch::{discover_pdfs, run_batch_with_progress, DocumentReport};
use pdfoutline::render::to_json;
use pdfoutline::{
    extract_fragments, outline_file_with_options, BatchOptions, JsonFormat, PageSelection,
    ParseOptions, PdfSource,
};

#[derive(Parser)]
#[command(name = "pdfoutline")]
#[command(author = "iyulab")]
#[command(version)]
#[command(about = "Extract the title and heading outline of PDF documents", long_about = None)]
struct Cli {
    /// Input PDF file
    #[arg(value_name = "FILE")]
    input: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print or save the outline of one PDF as JSON
    Outline {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Output compact JSON
        #[arg(long)]
        compact: bool,

        /// Page range (e.g., "1-10", "1,3,5")
        #[arg(long)]
        pages: Option<String>,

        /// Skip pages that fail to decode
        #[arg(long)]
        lenient: bool,
    },

    /// Process every PDF of a directory into one JSON file each
    Batch {
        /// Directory containing the PDF files
        #[arg(
            value_name = "INPUT_DIR",
            env = "PDFOUTLINE_INPUT_DIR",
            default_value = "/app/input"
        )]
        input_dir: PathBuf,

        /// Directory receiving the JSON files
        #[arg(
            value_name = "OUTPUT_DIR",
            env = "PDFOUTLINE_OUTPUT_DIR",
            default_value = "/app/output"
        )]
        output_dir: PathBuf,

        /// Process one document at a time
        #[arg(long)]
        sequential: bool,

        /// Write compact JSON
        #[arg(long)]
        compact: bool,

        /// Skip pages that fail to decode
        #[arg(long)]
        lenient: bool,
    },

    /// Dump the decoded text fragments of a PDF as JSON
    Fragments {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Page range (e.g., "1-10", "1,3,5")
        #[arg(long)]
        pages: Option<String>,
    },

    /// Show version information
    Version,
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Some(Commands::Outline {
            input,
            output,
            compact,
            pages,
            lenient,
        }) => cmd_outline(&input, output.as_deref(), compact, pages.as_deref(), lenient),
        Some(Commands::Batch {
            input_dir,
            output_dir,
            sequential,
            compact,
            lenient,
        }) => cmd_batch(&input_dir, &output_dir, sequential, compact, lenient),
        Some(Commands::Fragments { input, pages }) => cmd_fragments(&input, pages.as_deref()),
        Some(Commands::Version) => {
            cmd_version();
            Ok(())
        }
        None => {
            // Default behavior: print the outline if input is provided
            if let Some(input) = cli.input {
                cmd_outline(&input, None, false, None, false)
            } else {
                println!("{}", "Usage: pdfoutline <FILE>".yellow());
                println!("       pdfoutline --help for more information");
                Ok(())
            }
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn parse_options(pages: Option<&str>, lenient: bool) -> Result<ParseOptions, Box<dyn std::error::Error>> {
    let page_selection = match pages {
        Some(p) => PageSelection::parse(p)?,
        None => PageSelection::All,
    };

    let mut options = ParseOptions::new().with_pages(page_selection);
    if lenient {
        options = options.lenient();
    }
    Ok(options)
}

fn json_format(compact: bool) -> JsonFormat {
    if compact {
        JsonFormat::Compact
    } else {
        JsonFormat::Pretty
    }
}

fn cmd_outline(
    input: &Path,
    output: Option<&Path>,
    compact: bool,
    pages: Option<&str>,
    lenient: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let options = parse_options(pages, lenient)?;
    log::debug!("Outlining {} with {:?}", input.display(), options);
    let result = outline_file_with_options(input, &options)?;
    log::debug!(
        "{}: title {:?}, {} headings",
        input.display(),
        result.title,
        result.outline.len()
    );
    let json = to_json(&result, json_format(compact))?;

    if let Some(path) = output {
        fs::write(path, &json)?;
        println!(
            "{} {} ({} headings)",
            "Saved to".green(),
            path.display(),
            result.outline.len()
        );
    } else {
        println!("{}", json);
    }

    Ok(())
}

fn cmd_batch(
    input_dir: &Path,
    output_dir: &Path,
    sequential: bool,
    compact: bool,
    lenient: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let total = discover_pdfs(input_dir)?.len();
    if total == 0 {
        println!(
            "{} {}",
            "No PDF files found in".yellow(),
            input_dir.display()
        );
        return Ok(());
    }

    let mut options = BatchOptions::new()
        .with_parse_options(parse_options(None, lenient)?)
        .with_json_format(json_format(compact));
    if sequential {
        options = options.sequential();
    }
    log::debug!("Batch options: {:?}", options);

    println!(
        "{} {} PDF files from {}",
        "Processing".cyan().bold(),
        total,
        input_dir.display()
    );

    let pb = ProgressBar::new(total as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("#>-"),
    );

    let report = run_batch_with_progress(input_dir, output_dir, &options, |doc| {
        pb.println(document_line(doc));
        pb.inc(1);
    })?;

    pb.finish_and_clear();

    println!();
    println!("{}", "Summary".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());
    println!("{}: {}", "Processed".bold(), report.documents.len());
    println!("{}: {}", "Succeeded".bold(), report.succeeded().to_string().green());
    println!("{}: {}", "Failed".bold(), report.failed().to_string().red());
    println!(
        "{}: {:.2}s",
        "Total time".bold(),
        report.total_elapsed().as_secs_f64()
    );
    println!("{}: {}", "Output".bold(), output_dir.display());

    Ok(())
}

fn document_line(doc: &DocumentReport) -> String {
    let name = doc
        .input
        .file_name()
        .unwrap_or_default()
        .to_string_lossy()
        .to_string();

    match &doc.error {
        None => format!(
            "{} Completed {} in {:.2}s",
            "✓".green(),
            name,
            doc.elapsed.as_secs_f64()
        ),
        Some(err) => format!("{} Error processing {}: {}", "✗".red(), name, err),
    }
}

fn cmd_fragments(input: &Path, pages: Option<&str>) -> Result<(), Box<dyn std::error::Error>> {
    let options = parse_options(pages, false)?;
    let source = PdfSource::open(input)?;
    let fragments = extract_fragments(&source, &options)?;
    log::debug!("{}: {} fragments", input.display(), fragments.len());
    println!("{}", serde_json::to_string_pretty(&fragments)?);
    Ok(())
}

fn cmd_version() {
    println!("{} {}", "pdfoutline".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("PDF title and heading outline extraction tool");
    println!();
    println!("License: MIT");
}
