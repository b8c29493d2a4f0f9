mod logger;

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand, ValueEnum};
use pdf_async_runtime::{JobCommand, JobId, JobUpdate, OutputTarget, worker_task};
use pdf_raster::constants::{dpi_to_scale, mm_to_pt};
use pdf_raster::{
    LayoutSpec, NUpPreset, Orientation, PaperSize, PosterPreset, Size, ToolOptions,
    calculate_statistics,
};
use std::path::PathBuf;
use tokio::sync::mpsc;

use logger::StderrLogger;

#[derive(Parser)]
#[command(name = "pdft", about = "Page imposition and deskew tools", version)]
struct Cli {
    /// Log more detail (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Place several pages on each sheet
    Nup {
        /// Pages per sheet
        #[arg(long, default_value = "4", value_enum)]
        per_sheet: PerSheetArg,

        #[command(flatten)]
        common: CommonArgs,
    },

    /// Arrange pages for a folded, saddle-stitched booklet
    Booklet {
        #[command(flatten)]
        common: CommonArgs,
    },

    /// Enlarge the first page across several sheets
    Poster {
        /// Sheets across (and down)
        #[arg(long, default_value = "2", value_enum)]
        grid: GridArg,

        #[command(flatten)]
        common: CommonArgs,
    },

    /// Split every page into smaller pages
    Tile {
        #[arg(long, default_value = "2")]
        rows: usize,

        #[arg(long, default_value = "2")]
        cols: usize,

        #[command(flatten)]
        common: CommonArgs,
    },

    /// Fit every page onto a new page size (--paper, or --width and --height)
    Resize {
        /// Target width in mm
        #[arg(long, requires = "height")]
        width: Option<f32>,

        /// Target height in mm
        #[arg(long, requires = "width")]
        height: Option<f32>,

        #[command(flatten)]
        common: CommonArgs,
    },

    /// Straighten scanned pages
    Deskew {
        /// Only rotate pages skewed by more than this many degrees
        #[arg(long)]
        threshold: Option<f32>,

        #[command(flatten)]
        common: CommonArgs,
    },

    /// Show sheet counts for a layout without processing anything
    Stats {
        #[arg(value_enum)]
        tool: ToolArg,

        /// Number of source pages
        #[arg(long)]
        pages: usize,

        #[arg(long, default_value = "4", value_enum)]
        per_sheet: PerSheetArg,

        #[arg(long, default_value = "2", value_enum)]
        grid: GridArg,

        #[arg(long, default_value = "2")]
        rows: usize,

        #[arg(long, default_value = "2")]
        cols: usize,
    },
}

#[derive(Args)]
struct CommonArgs {
    /// Input page images or PDFs, in order - can specify multiple
    #[arg(short, long, required = true, num_args = 1..)]
    input: Vec<PathBuf>,

    /// Output PDF file (a directory with --png)
    #[arg(short, long)]
    output: PathBuf,

    /// Write numbered PNG files instead of a PDF
    #[arg(long)]
    png: bool,

    /// Rasterization resolution
    #[arg(long)]
    dpi: Option<f32>,

    /// Output paper size
    #[arg(long, value_enum)]
    paper: Option<PaperArg>,

    /// Output orientation
    #[arg(long, value_enum)]
    orientation: Option<OrientationArg>,

    /// Fraction of an N-Up cell a page may fill
    #[arg(long)]
    margin_factor: Option<f32>,

    /// JPEG quality for output pages (1-100)
    #[arg(long)]
    quality: Option<u8>,

    /// Load options from a JSON file; flags override it
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Clone, Copy, ValueEnum)]
enum PerSheetArg {
    #[value(name = "2")]
    Two,
    #[value(name = "4")]
    Four,
    #[value(name = "6")]
    Six,
    #[value(name = "9")]
    Nine,
}

#[derive(Clone, Copy, ValueEnum)]
enum GridArg {
    #[value(name = "2")]
    Two,
    #[value(name = "3")]
    Three,
    #[value(name = "4")]
    Four,
}

#[derive(Clone, Copy, ValueEnum)]
enum ToolArg {
    Nup,
    Booklet,
    Poster,
    Tile,
    Resize,
}

#[derive(Clone, Copy, ValueEnum)]
enum PaperArg {
    A3,
    A4,
    A5,
    Letter,
    Legal,
    Tabloid,
}

#[derive(Clone, Copy, ValueEnum)]
enum OrientationArg {
    Portrait,
    Landscape,
}

impl From<PerSheetArg> for NUpPreset {
    fn from(arg: PerSheetArg) -> Self {
        match arg {
            PerSheetArg::Two => Self::Two,
            PerSheetArg::Four => Self::Four,
            PerSheetArg::Six => Self::Six,
            PerSheetArg::Nine => Self::Nine,
        }
    }
}

impl From<GridArg> for PosterPreset {
    fn from(arg: GridArg) -> Self {
        match arg {
            GridArg::Two => Self::TwoByTwo,
            GridArg::Three => Self::ThreeByThree,
            GridArg::Four => Self::FourByFour,
        }
    }
}

impl From<PaperArg> for PaperSize {
    fn from(arg: PaperArg) -> Self {
        match arg {
            PaperArg::A3 => Self::A3,
            PaperArg::A4 => Self::A4,
            PaperArg::A5 => Self::A5,
            PaperArg::Letter => Self::Letter,
            PaperArg::Legal => Self::Legal,
            PaperArg::Tabloid => Self::Tabloid,
        }
    }
}

impl From<OrientationArg> for Orientation {
    fn from(arg: OrientationArg) -> Self {
        match arg {
            OrientationArg::Portrait => Self::Portrait,
            OrientationArg::Landscape => Self::Landscape,
        }
    }
}

impl CommonArgs {
    /// Options from the config file (or defaults) with command-line overrides applied
    async fn options(&self) -> Result<ToolOptions> {
        let mut options = match &self.config {
            Some(path) => ToolOptions::load(path)
                .await
                .with_context(|| format!("Failed to load config {}", path.display()))?,
            None => ToolOptions::default(),
        };

        options.input_files = self.input.clone();
        if let Some(dpi) = self.dpi {
            options.raster_scale = dpi_to_scale(dpi);
        }
        if let Some(paper) = self.paper {
            options.paper_size = paper.into();
        }
        if let Some(orientation) = self.orientation {
            options.orientation = orientation.into();
        }
        if let Some(margin_factor) = self.margin_factor {
            options.margin_factor = margin_factor;
        }
        if let Some(quality) = self.quality {
            options.jpeg_quality = quality;
        }
        Ok(options)
    }

    fn output_target(&self) -> OutputTarget {
        if self.png {
            OutputTarget::Png {
                dir: self.output.clone(),
                stem: "page".to_string(),
            }
        } else {
            OutputTarget::Pdf(self.output.clone())
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    StderrLogger::new(StderrLogger::level_for(cli.verbose))
        .init()
        .context("Failed to install logger")?;

    match cli.command {
        Commands::Nup { per_sheet, common } => {
            let preset = NUpPreset::from(per_sheet);
            let mut options = common.options().await?;
            // 2-up wants a landscape sheet unless told otherwise
            if common.orientation.is_none() && common.config.is_none() {
                options.orientation = preset.orientation();
            }
            impose(preset.spec(), options, common.output_target()).await?;
        }

        Commands::Booklet { common } => {
            let options = common.options().await?;
            impose(LayoutSpec::Booklet, options, common.output_target()).await?;
        }

        Commands::Poster { grid, common } => {
            let options = common.options().await?;
            let spec = PosterPreset::from(grid).spec();
            impose(spec, options, common.output_target()).await?;
        }

        Commands::Tile { rows, cols, common } => {
            let options = common.options().await?;
            impose(LayoutSpec::Tile { rows, cols }, options, common.output_target()).await?;
        }

        Commands::Resize {
            width,
            height,
            common,
        } => {
            let options = common.options().await?;
            let target = match (width, height) {
                (Some(w), Some(h)) => Size::new(mm_to_pt(w), mm_to_pt(h)),
                _ => options.sheet_size(),
            };
            let spec = LayoutSpec::Resize {
                target_width: target.width,
                target_height: target.height,
            };
            impose(spec, options, common.output_target()).await?;
        }

        Commands::Deskew { threshold, common } => {
            let mut options = common.options().await?;
            if let Some(threshold) = threshold {
                options.deskew.apply_threshold = threshold;
            }
            let cmd = JobCommand::Deskew {
                job: JobId(1),
                options,
                output: common.output_target(),
            };
            run(cmd).await?;
        }

        Commands::Stats {
            tool,
            pages,
            per_sheet,
            grid,
            rows,
            cols,
        } => {
            let spec = match tool {
                ToolArg::Nup => NUpPreset::from(per_sheet).spec(),
                ToolArg::Booklet => LayoutSpec::Booklet,
                ToolArg::Poster => PosterPreset::from(grid).spec(),
                ToolArg::Tile => LayoutSpec::Tile { rows, cols },
                ToolArg::Resize => {
                    let size = ToolOptions::default().sheet_size();
                    LayoutSpec::Resize {
                        target_width: size.width,
                        target_height: size.height,
                    }
                }
            };

            let stats = calculate_statistics(pages, &spec)?;
            println!("Layout Statistics ({}):", spec.name());
            println!("  Source pages: {}", stats.source_pages);
            println!("  Pages used: {}", stats.pages_used);
            println!("  Output pages: {}", stats.output_sheets);
            println!("  Blank slots: {}", stats.blank_slots);
            if let Some(per_sheet) = stats.pages_per_sheet {
                println!("  Pages per sheet: {}", per_sheet);
            }
        }
    }

    Ok(())
}

async fn impose(spec: LayoutSpec, options: ToolOptions, output: OutputTarget) -> Result<()> {
    run(JobCommand::Impose {
        job: JobId(1),
        spec,
        options,
        output,
    })
    .await
}

/// Hand one job to the worker and report its updates until it finishes
async fn run(cmd: JobCommand) -> Result<()> {
    let (command_tx, command_rx) = mpsc::unbounded_channel();
    let (update_tx, mut update_rx) = mpsc::unbounded_channel();
    let worker = tokio::spawn(worker_task(command_rx, update_tx));

    command_tx
        .send(cmd)
        .map_err(|_| anyhow::anyhow!("Worker stopped before the job was sent"))?;
    drop(command_tx);

    while let Some(update) = update_rx.recv().await {
        match update {
            JobUpdate::Progress {
                operation,
                current,
                total,
                ..
            } => {
                eprint!("\r{}: {}/{}", operation, current, total);
                if current == total {
                    eprintln!();
                }
            }
            JobUpdate::PageDeskewed { page, estimate, .. } => {
                if estimate.applied {
                    println!("Page {}: rotated {:+.1}°", page, estimate.angle_degrees);
                }
            }
            JobUpdate::DeskewFinished { summary, .. } => {
                println!(
                    "Corrected {} of {} pages ({} without enough detail to measure)",
                    summary.pages_corrected, summary.total_pages, summary.low_signal_pages
                );
            }
            JobUpdate::Complete {
                outputs,
                pages_written,
                ..
            } => {
                for path in &outputs {
                    println!("→ {}", path.display());
                }
                println!("Wrote {} pages", pages_written);
            }
            JobUpdate::Error { message, .. } => bail!(message),
            JobUpdate::StatsCalculated { .. } | JobUpdate::ConfigLoaded { .. } => {}
        }
    }

    worker.await.context("Worker task failed")?;
    Ok(())
}
