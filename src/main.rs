//! CLI binary for tabletop-gen.

use clap::{Parser, Subcommand};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::PathBuf;
use tabletop_gen::pdf::PdfInfo;
use tabletop_gen::{deck, manual, map, paths, pdf};
use tracing_subscriber::EnvFilter;

/// Generate tabletop-game prototyping assets: deck sheets, scatter maps,
/// and laid-out game manuals.
#[derive(Parser)]
#[command(name = "tabletop-gen", version, about)]
struct Cli {
    /// Largest deck sheet edge, in pixels.
    #[arg(long, global = true, default_value_t = deck::DECK_MAX_SIZE)]
    deck_max_size: u32,

    /// Largest reference card edge, in pixels.
    #[arg(long, global = true, default_value_t = deck::REFERENCE_MAX_SIZE)]
    reference_max_size: u32,

    #[command(subcommand)]
    command: Command,
}

/// Available commands.
#[derive(Subcommand)]
enum Command {
    /// Tile a card image into a Tabletop Simulator deck sheet.
    Deck {
        /// Card image, or a directory of card images with --batch.
        image: PathBuf,

        /// Card back every card is resized to match before tiling.
        #[arg(long)]
        reference: Option<PathBuf>,

        /// Tile every image found in the given directory.
        #[arg(long)]
        batch: bool,
    },

    /// Scatter random asset thumbnails over a background image.
    Map {
        /// Background image the assets are placed onto.
        background: PathBuf,

        /// Directory of asset images.
        assets: PathBuf,

        /// Seed for a reproducible scatter.
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Compile a directory of page images into a single PDF.
    Pdf {
        /// Directory of page images, taken in file-name order.
        directory: PathBuf,

        /// Output file; defaults to a timestamped pages.pdf in the directory.
        #[arg(short, long)]
        out: Option<PathBuf>,

        /// Document title metadata.
        #[arg(long)]
        title: Option<String>,

        /// Document author metadata.
        #[arg(long)]
        author: Option<String>,

        /// Document subject metadata.
        #[arg(long)]
        subject: Option<String>,
    },

    /// Lay a word-processing document out over page templates and compile
    /// the pages into a manual.
    Manual {
        /// Document path or a Drive share link.
        input: String,

        /// TOML stylesheet mapping paragraph styles to fonts.
        #[arg(short, long)]
        styles: PathBuf,

        /// Page template image; a blank A4 canvas when absent.
        #[arg(short, long)]
        template: Option<PathBuf>,

        /// Fraction of each page edge reserved for the margin.
        #[arg(long, default_value_t = 0.1)]
        margin: f32,

        /// Extra margin pixels added after the fraction.
        #[arg(long, default_value_t = 0.0)]
        margin_offset: f32,

        /// Cover image prepended to the compiled PDF.
        #[arg(long)]
        title_page: Option<PathBuf>,

        /// Stop after writing page images, leaving no PDF.
        #[arg(long)]
        skip_compile: bool,

        /// Bearer token file used when the input is a share link.
        #[arg(long)]
        credentials: Option<PathBuf>,

        /// Directory receiving page images and the compiled PDF.
        #[arg(short, long, default_value = "manual-pages")]
        out_dir: PathBuf,

        /// Document title metadata.
        #[arg(long)]
        title: Option<String>,

        /// Document author metadata.
        #[arg(long)]
        author: Option<String>,

        /// Document subject metadata.
        #[arg(long)]
        subject: Option<String>,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Deck {
            image,
            reference,
            batch,
        } => run_deck(
            image,
            reference,
            batch,
            cli.deck_max_size,
            cli.reference_max_size,
        ),
        Command::Map {
            background,
            assets,
            seed,
        } => run_map(background, assets, seed),
        Command::Pdf {
            directory,
            out,
            title,
            author,
            subject,
        } => run_pdf(directory, out, pdf_info(title, author, subject)),
        Command::Manual {
            input,
            styles,
            template,
            margin,
            margin_offset,
            title_page,
            skip_compile,
            credentials,
            out_dir,
            title,
            author,
            subject,
        } => run_manual(manual::ManualJob {
            input,
            styles,
            template,
            margin,
            margin_offset,
            title_page,
            skip_compile,
            credentials,
            out_dir,
            info: pdf_info(title, author, subject),
        }),
    }
}

fn pdf_info(title: Option<String>, author: Option<String>, subject: Option<String>) -> PdfInfo {
    let mut info = PdfInfo::default();
    if let Some(title) = title {
        info.title = title;
    }
    if let Some(author) = author {
        info.author = author;
    }
    if let Some(subject) = subject {
        info.subject = subject;
    }
    info
}

fn run_deck(
    image: PathBuf,
    reference: Option<PathBuf>,
    batch: bool,
    max_size: u32,
    reference_max_size: u32,
) -> anyhow::Result<()> {
    let options = deck::DeckOptions {
        max_size,
        reference_max_size,
        reference,
    };
    if batch {
        for sheet in deck::build_deck_batch(&image, &options)? {
            println!("{}", sheet.display());
        }
    } else {
        println!("{}", deck::build_deck(&image, &options)?.display());
    }
    Ok(())
}

fn run_map(background: PathBuf, assets: PathBuf, seed: Option<u64>) -> anyhow::Result<()> {
    let out = match seed {
        Some(seed) => map::build_map(&background, &assets, &mut StdRng::seed_from_u64(seed))?,
        None => map::build_map(&background, &assets, &mut rand::thread_rng())?,
    };
    println!("{}", out.display());
    Ok(())
}

fn run_pdf(directory: PathBuf, out: Option<PathBuf>, info: PdfInfo) -> anyhow::Result<()> {
    let pages = paths::raster_files(&directory)?;
    let out = out.unwrap_or_else(|| paths::timestamped(&directory.join("pages.pdf")));
    println!("{}", pdf::compile(&pages, &out, &info)?.display());
    Ok(())
}

fn run_manual(job: manual::ManualJob) -> anyhow::Result<()> {
    let report = manual::run(&job)?;
    println!(
        "laid out {} words over {} pages in {}",
        report.words,
        report.pages,
        job.out_dir.display()
    );
    if let Some(pdf) = report.pdf {
        println!("{}", pdf.display());
    }
    Ok(())
}
