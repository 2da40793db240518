//! tabpdf CLI - render tabular JSON datasets to PDF

use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand, ValueEnum};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use tabpdf::{inspect_file, Assembler, Dataset, LayoutOptions, Margins, PageLayout};

#[derive(Parser)]
#[command(name = "tabpdf")]
#[command(author = "iyulab")]
#[command(version)]
#[command(about = "Render tabular datasets to paginated PDF documents", long_about = None)]
struct Cli {
    /// Input dataset (JSON)
    #[arg(value_name = "INPUT")]
    input: Option<PathBuf>,

    /// Output PDF file
    #[arg(value_name = "OUTPUT")]
    output: Option<PathBuf>,

    #[command(flatten)]
    layout: LayoutArgs,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a dataset to PDF
    Build {
        /// Input dataset (JSON)
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        /// Output PDF file
        #[arg(value_name = "OUTPUT")]
        output: PathBuf,

        #[command(flatten)]
        layout: LayoutArgs,
    },

    /// Check a generated PDF and show its structure
    Info {
        /// PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,
    },

    /// Show version information
    Version,
}

#[derive(Args, Clone)]
struct LayoutArgs {
    /// Page size
    #[arg(long, value_enum, default_value = "letter")]
    page_size: PageSize,

    /// Margin on every side, in points
    #[arg(long, value_name = "PT")]
    margin: Option<f64>,

    /// Body font size, in points
    #[arg(long, value_name = "PT")]
    font_size: Option<f64>,

    /// Report title shown in the page header
    #[arg(long, env = "TABPDF_TITLE")]
    title: Option<String>,

    /// Fail on characters the built-in fonts cannot draw
    #[arg(long)]
    strict_glyphs: bool,

    /// Record the creation date in the document info
    #[arg(long)]
    timestamp: bool,

    /// Measure rows on a single thread
    #[arg(long)]
    sequential: bool,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum PageSize {
    /// US Letter, 612 x 792 pt
    Letter,
    /// A4, 595 x 842 pt
    A4,
}

impl From<PageSize> for PageLayout {
    fn from(size: PageSize) -> Self {
        match size {
            PageSize::Letter => PageLayout::letter(),
            PageSize::A4 => PageLayout::a4(),
        }
    }
}

impl LayoutArgs {
    fn to_options(&self) -> LayoutOptions {
        let mut page = PageLayout::from(self.page_size);
        if let Some(margin) = self.margin {
            page = page.with_margins(Margins::all(margin));
        }

        let mut options = LayoutOptions::new().with_page_layout(page);
        if let Some(size) = self.font_size {
            options = options.with_font_size(size);
        }
        if let Some(ref title) = self.title {
            options = options.with_title(title.clone());
        }
        if self.strict_glyphs {
            options = options.strict();
        }
        if self.sequential {
            options = options.sequential();
        }
        if self.timestamp {
            options.info.creation_date = Some(chrono::Utc::now());
        }
        options.info.producer = Some(format!("tabpdf {}", env!("CARGO_PKG_VERSION")));
        options
    }
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Some(Commands::Build {
            input,
            output,
            layout,
        }) => cmd_build(&input, &output, &layout),
        Some(Commands::Info { input }) => cmd_info(&input),
        Some(Commands::Version) => {
            cmd_version();
            Ok(())
        }
        None => match (cli.input, cli.output) {
            (Some(input), Some(output)) => cmd_build(&input, &output, &cli.layout),
            _ => {
                eprintln!("{}", "Usage: tabpdf <INPUT> <OUTPUT>".yellow());
                eprintln!("       tabpdf --help for more information");
                std::process::exit(2);
            }
        },
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn cmd_build(
    input: &Path,
    output: &Path,
    layout: &LayoutArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let pb = ProgressBar::new(3);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:30.cyan/blue}] {msg}")?
            .progress_chars("#>-"),
    );

    pb.set_message("Loading dataset...");
    let dataset = Dataset::load_json(input)?;
    log::debug!(
        "Loaded {} tables from {}",
        dataset.tables.len(),
        input.display()
    );
    pb.inc(1);

    pb.set_message("Assembling document...");
    let doc = Assembler::new(layout.to_options()).assemble(&dataset)?;
    pb.inc(1);

    pb.set_message("Writing...");
    doc.save(output)?;
    pb.inc(1);
    pb.finish_and_clear();

    println!("{} {}", "Saved to".green(), output.display());
    println!(
        "  {} {} tables, {} rows",
        "├─".dimmed(),
        dataset.tables.len(),
        dataset.row_count()
    );
    println!(
        "  {} {} pages, {} objects",
        "├─".dimmed(),
        doc.page_count,
        doc.object_count
    );
    println!("  {} {} bytes", "└─".dimmed(), doc.bytes.len());

    Ok(())
}

fn cmd_info(input: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let summary = inspect_file(input)?;

    println!("{}", "Document Information".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    println!("{}: {}", "File".bold(), input.display());
    println!("{}: PDF {}", "Format".bold(), summary.version);
    if let Some(ref title) = summary.title {
        println!("{}: {}", "Title".bold(), title);
    }
    println!("{}: {}", "Pages".bold(), summary.page_count);
    println!("{}: {}", "Bookmarks".bold(), summary.outline_count);

    println!();
    println!("{}", "Cross-Reference".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    println!("{}: {}", "Objects".bold(), summary.object_count());
    println!("{}: {} 0 R", "Root".bold(), summary.root);
    if let Some(info) = summary.info {
        println!("{}: {} 0 R", "Info".bold(), info);
    }
    println!("{}: {}", "startxref".bold(), summary.startxref);
    println!("{}", "All offsets verified".green());

    Ok(())
}

fn cmd_version() {
    println!("{} {}", "tabpdf".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("Tabular dataset to PDF renderer");
    println!();
    println!("License: MIT");
}
