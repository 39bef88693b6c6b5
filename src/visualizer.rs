//! Per-run visualization sink.
//!
//! A [`Visualizer`] is bound to one training run. It owns the run's
//! dashboard client, its image directories, and its append-only text log,
//! and exposes one independent forward-and-log operation per thing the
//! training loop wants recorded. Nothing here keeps state between calls
//! beyond the paths resolved at construction; every operation is keyed by
//! the caller-supplied step or epoch.

use std::fmt;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use batuta_common::display::WithDimensions;
use chrono::Local;

use crate::dashboard::DashboardClient;
use crate::error::Result;
use crate::images::ImageBatch;
use crate::metrics::{pr_curve_samples, ConfusionCounts};
use crate::plots::ConfusionMatrixPlot;

/// Configuration of one training run.
///
/// Carries what the sink needs: where the run lives on disk, how long it
/// trains, and the hyperparameters worth stamping into the log header.
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Run name; becomes the directory under `outf`.
    pub name: String,
    /// Output folder holding all runs.
    pub outf: PathBuf,
    /// Total number of training epochs (used in log formatting).
    pub niter: usize,
    /// Size of the latent vector.
    pub latent_dim: usize,
    /// Adversarial loss weight.
    pub w_adv: f32,
    /// Reconstruction loss weight.
    pub w_con: f32,
    /// Latent loss weight.
    pub w_lat: f32,
}

impl RunOptions {
    /// Options for a named run under `outf`, with the stock hyperparameters.
    #[must_use]
    pub fn new(name: impl Into<String>, outf: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            outf: outf.into(),
            niter: 15,
            latent_dim: 100,
            w_adv: 1.0,
            w_con: 50.0,
            w_lat: 1.0,
        }
    }

    /// Set the total epoch count.
    #[must_use]
    pub fn niter(mut self, niter: usize) -> Self {
        self.niter = niter;
        self
    }

    /// Set the latent vector size.
    #[must_use]
    pub fn latent_dim(mut self, latent_dim: usize) -> Self {
        self.latent_dim = latent_dim;
        self
    }

    /// Set the three loss weights.
    #[must_use]
    pub fn loss_weights(mut self, w_adv: f32, w_con: f32, w_lat: f32) -> Self {
        self.w_adv = w_adv;
        self.w_con = w_con;
        self.w_lat = w_lat;
        self
    }

    /// The run's directory: `<outf>/<name>`.
    #[must_use]
    pub fn run_dir(&self) -> PathBuf {
        self.outf.join(&self.name)
    }
}

/// Which half of the loop an image batch came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Split {
    /// Training batches.
    Train,
    /// Evaluation batches.
    Test,
}

impl fmt::Display for Split {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Train => write!(f, "train"),
            Self::Test => write!(f, "test"),
        }
    }
}

/// One evaluation epoch's results.
///
/// Named scalars keep their insertion order. The confusion matrix and the
/// average batch runtime live in dedicated fields, which is what keeps them
/// out of the scalar forwarding in
/// [`Visualizer::plot_performance`].
#[derive(Debug, Clone, Default)]
pub struct Performance {
    scalars: Vec<(String, f32)>,
    conf_matrix: Option<ConfusionCounts>,
    avg_runtime_ms: Option<f32>,
}

impl Performance {
    /// An empty record.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a named scalar.
    pub fn push(&mut self, name: impl Into<String>, value: f32) {
        self.scalars.push((name.into(), value));
    }

    /// The named scalars in insertion order.
    #[must_use]
    pub fn scalars(&self) -> &[(String, f32)] {
        &self.scalars
    }

    /// Look up a scalar by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<f32> {
        self.scalars
            .iter()
            .find(|(n, _)| n == name)
            .map(|&(_, v)| v)
    }

    /// Attach the epoch's confusion matrix.
    pub fn set_conf_matrix(&mut self, counts: ConfusionCounts) {
        self.conf_matrix = Some(counts);
    }

    /// The attached confusion matrix, if any.
    #[must_use]
    pub const fn conf_matrix(&self) -> Option<&ConfusionCounts> {
        self.conf_matrix.as_ref()
    }

    /// Attach the epoch's average runtime per batch, in milliseconds.
    pub fn set_avg_runtime_ms(&mut self, ms: f32) {
        self.avg_runtime_ms = Some(ms);
    }

    /// The attached average runtime, if any.
    #[must_use]
    pub const fn avg_runtime_ms(&self) -> Option<f32> {
        self.avg_runtime_ms
    }
}

/// Visualization sink bound to one training run.
pub struct Visualizer<C: DashboardClient> {
    options: RunOptions,
    client: C,
    train_img_dir: PathBuf,
    test_img_dir: PathBuf,
    log_path: PathBuf,
}

impl<C: DashboardClient> Visualizer<C> {
    /// Bind a sink to a run.
    ///
    /// Creates the run's train/test image directories if absent and stamps a
    /// timestamped header plus the key hyperparameters into the text log.
    ///
    /// # Errors
    ///
    /// Returns an error if the directories or the log cannot be created.
    pub fn new(options: RunOptions, client: C) -> Result<Self> {
        let run_dir = options.run_dir();
        let train_img_dir = run_dir.join("train").join("images");
        let test_img_dir = run_dir.join("test").join("images");
        fs::create_dir_all(&train_img_dir)?;
        fs::create_dir_all(&test_img_dir)?;

        let viz = Self {
            log_path: run_dir.join("loss_log.txt"),
            options,
            client,
            train_img_dir,
            test_img_dir,
        };

        let now = Local::now().format("%c");
        viz.write_to_log(&format!("================ {now} ================"))?;
        viz.write_to_log(&format!(
            "Anomalies, {}, {}, {}, {}",
            viz.options.latent_dim, viz.options.w_adv, viz.options.w_con, viz.options.w_lat
        ))?;

        Ok(viz)
    }

    /// The options this sink was bound with.
    #[must_use]
    pub fn options(&self) -> &RunOptions {
        &self.options
    }

    /// Directory the run's training images are saved into.
    #[must_use]
    pub fn train_image_dir(&self) -> &Path {
        &self.train_img_dir
    }

    /// Directory reserved for the run's evaluation images.
    #[must_use]
    pub fn test_image_dir(&self) -> &Path {
        &self.test_img_dir
    }

    /// Append one line to the run's text log.
    ///
    /// The file is opened and closed per write; safe under the sink's
    /// sequential calling convention only.
    pub fn write_to_log(&self, text: &str) -> Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.log_path)?;
        writeln!(file, "{text}")?;
        Ok(())
    }

    /// Forward the current named losses to the dashboard.
    pub fn plot_current_errors(&mut self, step: usize, losses: &[(&str, f32)]) -> Result<()> {
        self.client.log_scalars("Loss over time", losses, step)
    }

    /// Forward a performance record's scalars to the dashboard.
    ///
    /// The confusion matrix and the runtime entry are never forwarded here;
    /// the matrix has its own image call and the runtime stays log-only.
    pub fn plot_performance(&mut self, step: usize, performance: &Performance) -> Result<()> {
        let scalars: Vec<(&str, f32)> = performance
            .scalars()
            .iter()
            .map(|(name, value)| (name.as_str(), *value))
            .collect();

        self.client.log_scalars("Performance Metrics", &scalars, step)
    }

    /// Render the epoch's confusion matrix and forward it as an image.
    pub fn plot_current_conf_matrix(
        &mut self,
        step: usize,
        counts: &ConfusionCounts,
    ) -> Result<()> {
        let plot = ConfusionMatrixPlot::new()
            .counts(*counts)
            .dimensions(400, 400)
            .build()?;

        self.client
            .log_image("Confusion Matrix", &plot.to_framebuffer()?, step)
    }

    /// Print the current losses to stdout and the text log.
    pub fn print_current_errors(&self, epoch: usize, losses: &[(&str, f32)]) -> Result<()> {
        let mut message = format!("   Loss: [{}/{}] ", epoch, self.options.niter);
        for (name, value) in losses {
            message.push_str(&format!("{name}: {value:.3} "));
        }

        println!("{message}");
        self.write_to_log(&message)
    }

    /// Print a performance record to stdout and the text log.
    ///
    /// Scalars and the runtime print to 3 decimals, the confusion matrix
    /// as-is, and `best` trails as the best AUC seen so far.
    pub fn print_current_performance(&self, performance: &Performance, best: f32) -> Result<()> {
        let mut message = String::from("   ");
        for (name, value) in performance.scalars() {
            message.push_str(&format!("{name}: {value:.3} "));
        }
        if let Some(ms) = performance.avg_runtime_ms() {
            message.push_str(&format!("Avg Run Time (ms/batch): {ms:.3} "));
        }
        if let Some(counts) = performance.conf_matrix() {
            message.push_str(&format!("conf_matrix: {counts} "));
        }
        message.push_str(&format!("max AUC: {best:.3}"));

        println!("{message}");
        self.write_to_log(&message)
    }

    /// Normalize the three image batches and forward each as a grid.
    pub fn display_current_images(
        &mut self,
        reals: &ImageBatch,
        fakes: &ImageBatch,
        fixed: &ImageBatch,
        split: Split,
        step: usize,
    ) -> Result<()> {
        for (kind, batch) in [("Reals", reals), ("Fakes", fakes), ("Fixed fakes", fixed)] {
            let grid = batch.normalized().to_grid(8)?;
            self.client
                .log_image(&format!("{kind} from {split}"), &grid, step)?;
        }

        Ok(())
    }

    /// Save the epoch's image batches as PNGs in the train image directory.
    ///
    /// Writes `reals.png` and `fakes.png` (overwritten every epoch) and a
    /// per-epoch `fixed_fakes_<nnn>.png`.
    pub fn save_current_images(
        &self,
        epoch: usize,
        reals: &ImageBatch,
        fakes: &ImageBatch,
        fixed: &ImageBatch,
    ) -> Result<()> {
        reals.save_png(self.train_img_dir.join("reals.png"))?;
        fakes.save_png(self.train_img_dir.join("fakes.png"))?;
        fixed.save_png(
            self.train_img_dir
                .join(format!("fixed_fakes_{:03}.png", epoch + 1)),
        )
    }

    /// Sample the PR curve over a threshold grid and forward the raw arrays.
    pub fn plot_pr_curve(
        &mut self,
        labels: &[u8],
        scores: &[f32],
        thresholds: &[f32],
        step: usize,
    ) -> Result<()> {
        let samples = pr_curve_samples(labels, scores, thresholds)?;
        self.client
            .log_pr_curve("Precision_recall_curve", &samples, step)
    }
}
