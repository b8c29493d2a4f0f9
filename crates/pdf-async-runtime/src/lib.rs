use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::mpsc;

// Re-export types from library crates
pub use pdf_raster::{
    DeskewSummary, LayoutSpec, LayoutStatistics, RasterError, SkewEstimate, ToolOptions,
};

use pdf_raster::impose::save_pngs;
use pdf_raster::{
    ImposedDocument, Imposition, RasterPage, build_pdf_from_pages, calculate_statistics,
    deskew_page, load_inputs, save_pdf,
};

/// Identifies the job an update belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct JobId(pub u64);

/// Where a job writes its result
#[derive(Debug, Clone, PartialEq)]
pub enum OutputTarget {
    /// A single PDF with one page per sheet
    Pdf(PathBuf),
    /// Numbered PNG files `<stem>-NNN.png` in a directory
    Png { dir: PathBuf, stem: String },
}

/// Commands sent to the worker
#[derive(Debug)]
pub enum JobCommand {
    /// Load the inputs named in `options`, impose them and write the result
    Impose {
        job: JobId,
        spec: LayoutSpec,
        options: ToolOptions,
        output: OutputTarget,
    },
    /// Load the inputs named in `options`, straighten each page and write them back out
    Deskew {
        job: JobId,
        options: ToolOptions,
        output: OutputTarget,
    },
    CalculateStats {
        job: JobId,
        page_count: usize,
        spec: LayoutSpec,
    },
    LoadConfig {
        job: JobId,
        path: PathBuf,
    },
}

impl JobCommand {
    pub fn job(&self) -> JobId {
        match self {
            JobCommand::Impose { job, .. }
            | JobCommand::Deskew { job, .. }
            | JobCommand::CalculateStats { job, .. }
            | JobCommand::LoadConfig { job, .. } => *job,
        }
    }
}

/// Updates sent from the worker
#[derive(Debug, Clone)]
pub enum JobUpdate {
    Progress {
        job: JobId,
        operation: String,
        current: usize,
        total: usize,
    },
    PageDeskewed {
        job: JobId,
        page: usize,
        estimate: SkewEstimate,
    },
    DeskewFinished {
        job: JobId,
        summary: DeskewSummary,
    },
    StatsCalculated {
        job: JobId,
        stats: LayoutStatistics,
    },
    ConfigLoaded {
        job: JobId,
        options: Box<ToolOptions>,
    },
    Complete {
        job: JobId,
        outputs: Vec<PathBuf>,
        pages_written: usize,
    },
    Error {
        job: JobId,
        message: String,
    },
}

/// Why a job stopped early
#[derive(Debug, thiserror::Error)]
pub enum JobError {
    #[error(transparent)]
    Raster(#[from] RasterError),
    #[error("update receiver dropped")]
    Abandoned,
}

type JobResult<T> = std::result::Result<T, JobError>;

/// Async worker task that processes jobs one at a time and reports on `update_tx`.
///
/// Returns when the command channel closes.
pub async fn worker_task(
    mut command_rx: mpsc::UnboundedReceiver<JobCommand>,
    update_tx: mpsc::UnboundedSender<JobUpdate>,
) {
    while let Some(cmd) = command_rx.recv().await {
        let job = cmd.job();
        match run_job(cmd, &update_tx).await {
            Ok(()) => {}
            Err(JobError::Abandoned) => {
                log::info!("Job {}: nobody is listening, abandoned", job.0);
            }
            Err(JobError::Raster(e)) => {
                log::error!("Job {} failed: {}", job.0, e);
                let _ = update_tx.send(JobUpdate::Error {
                    job,
                    message: e.to_string(),
                });
            }
        }
    }
}

/// Run a single job to completion
pub async fn run_job(cmd: JobCommand, update_tx: &mpsc::UnboundedSender<JobUpdate>) -> JobResult<()> {
    match cmd {
        JobCommand::Impose {
            job,
            spec,
            options,
            output,
        } => handle_impose(job, spec, options, output, update_tx).await,
        JobCommand::Deskew {
            job,
            options,
            output,
        } => handle_deskew(job, options, output, update_tx).await,
        JobCommand::CalculateStats {
            job,
            page_count,
            spec,
        } => {
            let stats = calculate_statistics(page_count, &spec)?;
            send(update_tx, JobUpdate::StatsCalculated { job, stats })
        }
        JobCommand::LoadConfig { job, path } => {
            let options = ToolOptions::load(&path).await?;
            log::info!("Loaded configuration from {}", path.display());
            send(
                update_tx,
                JobUpdate::ConfigLoaded {
                    job,
                    options: Box::new(options),
                },
            )
        }
    }
}

async fn handle_impose(
    job: JobId,
    spec: LayoutSpec,
    options: ToolOptions,
    output: OutputTarget,
    update_tx: &mpsc::UnboundedSender<JobUpdate>,
) -> JobResult<()> {
    options.validate()?;
    let pages = load_sources(job, &spec, &options, update_tx).await?;

    let imposition = Arc::new(Imposition::new(pages, &spec, &options)?);
    let total = imposition.sheet_count();
    log::info!(
        "Job {}: imposing {} pages as {} onto {} sheets",
        job.0,
        imposition.pages().len(),
        spec.name(),
        total
    );

    let mut sheets = Vec::with_capacity(total);
    for sheet_index in 0..total {
        let imposition = Arc::clone(&imposition);
        let sheet = tokio::task::spawn_blocking(move || imposition.render(sheet_index))
            .await
            .map_err(RasterError::from)??;
        sheets.push(sheet);
        progress(update_tx, job, "Rendering sheets", sheet_index + 1, total)?;
        tokio::task::yield_now().await;
    }

    let quality = options.jpeg_quality;
    let outputs = write_output(
        output,
        imposition.finish(sheets),
        move |imposed: &ImposedDocument| imposed.to_pdf(quality),
        |imposed| imposed.sheets,
    )
    .await?;
    send(
        update_tx,
        JobUpdate::Complete {
            job,
            outputs,
            pages_written: total,
        },
    )
}

async fn handle_deskew(
    job: JobId,
    options: ToolOptions,
    output: OutputTarget,
    update_tx: &mpsc::UnboundedSender<JobUpdate>,
) -> JobResult<()> {
    options.validate()?;
    let pages = load_inputs(&options.input_files, options.raster_scale).await?;
    if pages.is_empty() {
        return Err(RasterError::NoPages.into());
    }

    let total = pages.len();
    let mut summary = DeskewSummary::for_pages(total);
    let mut corrected = Vec::with_capacity(total);

    for (i, page) in pages.into_iter().enumerate() {
        let deskew = options.deskew;
        let (page, estimate) =
            tokio::task::spawn_blocking(move || deskew_page(page, &deskew))
                .await
                .map_err(RasterError::from)?;

        send(
            update_tx,
            JobUpdate::PageDeskewed {
                job,
                page: i + 1,
                estimate,
            },
        )?;
        progress(update_tx, job, "Deskewing pages", i + 1, total)?;

        summary.record(estimate, &options.deskew);
        corrected.push(page);
        tokio::task::yield_now().await;
    }

    log::info!(
        "Job {}: corrected {} of {} pages",
        job.0,
        summary.pages_corrected,
        summary.total_pages
    );
    send(update_tx, JobUpdate::DeskewFinished { job, summary })?;

    let quality = options.jpeg_quality;
    let outputs = write_output(
        output,
        corrected,
        move |pages: &Vec<RasterPage>| build_pdf_from_pages(pages, quality),
        |pages| pages.iter().map(RasterPage::to_image).collect(),
    )
    .await?;
    send(
        update_tx,
        JobUpdate::Complete {
            job,
            outputs,
            pages_written: total,
        },
    )
}

/// Load every input at the scale the layout needs, reporting per file
async fn load_sources(
    job: JobId,
    spec: &LayoutSpec,
    options: &ToolOptions,
    update_tx: &mpsc::UnboundedSender<JobUpdate>,
) -> JobResult<Vec<RasterPage>> {
    let scale = spec.raster_scale(options.raster_scale);
    let total = options.input_files.len();
    let mut pages: Vec<RasterPage> = Vec::new();

    for (i, path) in options.input_files.iter().enumerate() {
        pages.extend(load_inputs(std::slice::from_ref(path), scale).await?);
        progress(update_tx, job, "Loading inputs", i + 1, total)?;
        tokio::task::yield_now().await;
    }

    for (i, page) in pages.iter_mut().enumerate() {
        page.source_index = i + 1;
    }
    Ok(pages)
}

/// Write a job's result as one PDF, or as numbered PNGs of its sheets
async fn write_output<T, P, S>(
    output: OutputTarget,
    rendered: T,
    to_pdf: P,
    into_sheets: S,
) -> JobResult<Vec<PathBuf>>
where
    T: Send + 'static,
    P: FnOnce(&T) -> pdf_raster::Result<lopdf::Document> + Send + 'static,
    S: FnOnce(T) -> Vec<image::RgbaImage>,
{
    match output {
        OutputTarget::Pdf(path) => {
            let doc = tokio::task::spawn_blocking(move || to_pdf(&rendered))
                .await
                .map_err(RasterError::from)??;
            save_pdf(doc, &path).await?;
            log::info!("Wrote {}", path.display());
            Ok(vec![path])
        }
        OutputTarget::Png { dir, stem } => {
            let paths = save_pngs(into_sheets(rendered), &dir, &stem).await?;
            log::info!("Wrote {} images to {}", paths.len(), dir.display());
            Ok(paths)
        }
    }
}

fn progress(
    update_tx: &mpsc::UnboundedSender<JobUpdate>,
    job: JobId,
    operation: &str,
    current: usize,
    total: usize,
) -> JobResult<()> {
    send(
        update_tx,
        JobUpdate::Progress {
            job,
            operation: operation.to_string(),
            current,
            total,
        },
    )
}

fn send(update_tx: &mpsc::UnboundedSender<JobUpdate>, update: JobUpdate) -> JobResult<()> {
    update_tx.send(update).map_err(|_| JobError::Abandoned)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn write_pages(dir: &Path, count: usize) -> Vec<PathBuf> {
        (0..count)
            .map(|i| {
                let path = dir.join(format!("page-{i}.png"));
                image::RgbaImage::from_pixel(40, 60, image::Rgba([30, 30, 30, 255]))
                    .save(&path)
                    .unwrap();
                path
            })
            .collect()
    }

    fn options(inputs: Vec<PathBuf>) -> ToolOptions {
        ToolOptions {
            input_files: inputs,
            raster_scale: 0.5,
            ..Default::default()
        }
    }

    async fn collect(cmd: JobCommand) -> Vec<JobUpdate> {
        let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
        let (update_tx, mut update_rx) = mpsc::unbounded_channel();
        cmd_tx.send(cmd).unwrap();
        drop(cmd_tx);

        worker_task(cmd_rx, update_tx).await;

        let mut updates = Vec::new();
        while let Some(update) = update_rx.recv().await {
            updates.push(update);
        }
        updates
    }

    #[tokio::test]
    async fn test_impose_reports_progress_per_sheet() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("out.pdf");
        let cmd = JobCommand::Impose {
            job: JobId(1),
            spec: LayoutSpec::NUp { cols: 2, rows: 1 },
            options: options(write_pages(dir.path(), 3)),
            output: OutputTarget::Pdf(output.clone()),
        };

        let updates = collect(cmd).await;

        let rendering: Vec<(usize, usize)> = updates
            .iter()
            .filter_map(|u| match u {
                JobUpdate::Progress {
                    operation,
                    current,
                    total,
                    ..
                } if operation == "Rendering sheets" => Some((*current, *total)),
                _ => None,
            })
            .collect();
        assert_eq!(rendering, vec![(1, 2), (2, 2)]);

        match updates.last() {
            Some(JobUpdate::Complete {
                job,
                outputs,
                pages_written,
            }) => {
                assert_eq!(*job, JobId(1));
                assert_eq!(outputs, &vec![output.clone()]);
                assert_eq!(*pages_written, 2);
            }
            other => panic!("Expected Complete, got {:?}", other),
        }
        assert!(output.exists());
    }

    #[tokio::test]
    async fn test_deskew_reports_every_page() {
        let dir = tempfile::tempdir().unwrap();
        let cmd = JobCommand::Deskew {
            job: JobId(7),
            options: options(write_pages(dir.path(), 2)),
            output: OutputTarget::Png {
                dir: dir.path().join("straight"),
                stem: "page".to_string(),
            },
        };

        let updates = collect(cmd).await;

        let deskewed: Vec<usize> = updates
            .iter()
            .filter_map(|u| match u {
                JobUpdate::PageDeskewed { page, .. } => Some(*page),
                _ => None,
            })
            .collect();
        assert_eq!(deskewed, vec![1, 2]);

        let summary = updates.iter().find_map(|u| match u {
            JobUpdate::DeskewFinished { summary, .. } => Some(summary.clone()),
            _ => None,
        });
        assert_eq!(summary.unwrap().total_pages, 2);

        assert!(matches!(
            updates.last(),
            Some(JobUpdate::Complete { pages_written: 2, .. })
        ));
    }

    #[tokio::test]
    async fn test_errors_become_updates() {
        let cmd = JobCommand::Impose {
            job: JobId(3),
            spec: LayoutSpec::Booklet,
            options: ToolOptions::default(),
            output: OutputTarget::Pdf(PathBuf::from("unused.pdf")),
        };

        let updates = collect(cmd).await;
        assert_eq!(updates.len(), 1);
        match &updates[0] {
            JobUpdate::Error { job, message } => {
                assert_eq!(*job, JobId(3));
                assert!(message.contains("No input files"));
            }
            other => panic!("Expected Error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_load_config_job() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("options.json");
        let saved = ToolOptions {
            jpeg_quality: 75,
            margin_factor: 0.9,
            ..Default::default()
        };
        saved.save(&path).await.unwrap();

        let updates = collect(JobCommand::LoadConfig {
            job: JobId(5),
            path,
        })
        .await;
        match &updates[..] {
            [JobUpdate::ConfigLoaded { job, options }] => {
                assert_eq!(*job, JobId(5));
                assert_eq!(options.jpeg_quality, 75);
                assert_eq!(options.margin_factor, 0.9);
            }
            other => panic!("Expected ConfigLoaded, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_load_config_missing_file() {
        let updates = collect(JobCommand::LoadConfig {
            job: JobId(6),
            path: PathBuf::from("/nonexistent/options.json"),
        })
        .await;
        assert!(matches!(&updates[..], [JobUpdate::Error { job: JobId(6), .. }]));
    }

    #[tokio::test]
    async fn test_stats_job() {
        let cmd = JobCommand::CalculateStats {
            job: JobId(2),
            page_count: 10,
            spec: LayoutSpec::NUp { cols: 2, rows: 2 },
        };

        let updates = collect(cmd).await;
        match &updates[0] {
            JobUpdate::StatsCalculated { stats, .. } => assert_eq!(stats.output_sheets, 3),
            other => panic!("Expected stats, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_job_abandoned_when_receiver_dropped() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("never.pdf");
        let (update_tx, update_rx) = mpsc::unbounded_channel();
        drop(update_rx);

        let cmd = JobCommand::Impose {
            job: JobId(4),
            spec: LayoutSpec::Booklet,
            options: options(write_pages(dir.path(), 4)),
            output: OutputTarget::Pdf(output.clone()),
        };

        let result = run_job(cmd, &update_tx).await;
        assert!(matches!(result, Err(JobError::Abandoned)));
        assert!(!output.exists());
    }
}
