//! Filter engine: one worker pool, a catalogue of filters, and completion
//! notification.
//!
//! ## Usage
//!
//! ```no_run
//! use rasterfx::{EngineConfig, Filter, FilterEngine, Raster};
//!
//! let mut engine = FilterEngine::new(&EngineConfig::default())?;
//! engine.on_complete(|event| println!("{} took {:?}", event.filter, event.elapsed));
//!
//! let mut raster = Raster::filled(64, 48, [120, 80, 40]);
//! engine.apply(&mut raster, &Filter::Median { size: 3 });
//! engine.apply(&mut raster, &Filter::GrayWorld);
//! let histogram = engine.histogram(&raster);
//! # Ok::<(), rasterfx::RasterError>(())
//! ```

use std::fmt;
use std::time::{Duration, Instant};

use tracing::debug;

use crate::config::EngineConfig;
use crate::error::RasterResult;
use crate::filters::histogram::{extract_histogram, HistogramTriple};
use crate::filters::rotate::MirrorAxis;
use crate::filters::scheduler::Scheduler;
use crate::filters::{color_adjust, color_science, convolve, levels_curves, morphology, noise, rotate};
use crate::raster::Raster;

// ============================================================================
// Filter Catalogue
// ============================================================================

/// Every filter the engine can apply, with its parameters.
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    /// Per-channel median of a `size` x `size` window.
    Median { size: usize },
    /// Per-channel window minimum.
    Erosion { size: usize },
    /// Per-channel window maximum.
    Dilation { size: usize },
    /// Fixed 5x5 Gaussian blur.
    GaussianBlur,
    /// Convolution with row-major square weights.
    Custom { weights: Vec<f64> },
    /// Gray World white balance.
    GrayWorld,
    /// Per-channel linear contrast stretch.
    LinearStretch,
    /// `v -> round(coefficient * v^exponent)`.
    Gamma { coefficient: f64, exponent: f64 },
    RotateLeft,
    RotateRight,
    Mirror(MirrorAxis),
}

impl Filter {
    /// Stable label used in logs and [`FilterEvent`]s.
    pub fn name(&self) -> &'static str {
        match self {
            Filter::Median { .. } => "median",
            Filter::Erosion { .. } => "erosion",
            Filter::Dilation { .. } => "dilation",
            Filter::GaussianBlur => "gaussian_blur",
            Filter::Custom { .. } => "custom",
            Filter::GrayWorld => "gray_world",
            Filter::LinearStretch => "linear_stretch",
            Filter::Gamma { .. } => "gamma",
            Filter::RotateLeft => "rotate_left",
            Filter::RotateRight => "rotate_right",
            Filter::Mirror(MirrorAxis::Horizontal) => "mirror_horizontal",
            Filter::Mirror(MirrorAxis::Vertical) => "mirror_vertical",
        }
    }
}

/// Emitted to every listener after [`FilterEngine::apply`] returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterEvent {
    pub filter: &'static str,
    /// Raster width after the filter ran.
    pub width: usize,
    /// Raster height after the filter ran.
    pub height: usize,
    pub elapsed: Duration,
}

type Listener = Box<dyn Fn(&FilterEvent) + Send + Sync>;

// ============================================================================
// Engine
// ============================================================================

/// Applies filters on a shared worker pool and reports each completion.
pub struct FilterEngine {
    scheduler: Scheduler,
    listeners: Vec<Listener>,
}

impl FilterEngine {
    /// Start an engine from `config`.
    ///
    /// # Errors
    /// [`RasterError::Config`](crate::RasterError::Config) for zero workers,
    /// [`RasterError::ThreadPool`](crate::RasterError::ThreadPool) if the
    /// pool cannot be built.
    pub fn new(config: &EngineConfig) -> RasterResult<Self> {
        config.validate()?;
        let workers = config.resolved_workers();
        let scheduler = Scheduler::with_thread_name(workers, &config.thread_name)?;
        debug!(workers, thread_name = %config.thread_name, "filter engine started");
        Ok(Self {
            scheduler,
            listeners: Vec::new(),
        })
    }

    /// Engine with a fixed worker count and default thread names.
    pub fn with_workers(workers: usize) -> RasterResult<Self> {
        Self::new(&EngineConfig::with_workers(workers))
    }

    #[inline]
    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    #[inline]
    pub fn workers(&self) -> usize {
        self.scheduler.workers()
    }

    /// Register a listener called after every [`apply`](Self::apply).
    pub fn on_complete<F>(&mut self, listener: F)
    where
        F: Fn(&FilterEvent) + Send + Sync + 'static,
    {
        self.listeners.push(Box::new(listener));
    }

    /// Run `filter` on `raster`, then notify listeners.
    ///
    /// Invalid parameters leave `raster` unchanged; listeners are notified
    /// either way.
    pub fn apply(&self, raster: &mut Raster, filter: &Filter) {
        let started = Instant::now();
        let scheduler = &self.scheduler;
        match filter {
            Filter::Median { size } => noise::median(scheduler, raster, *size),
            Filter::Erosion { size } => morphology::erode(scheduler, raster, *size),
            Filter::Dilation { size } => morphology::dilate(scheduler, raster, *size),
            Filter::GaussianBlur => convolve::gaussian_blur(scheduler, raster),
            Filter::Custom { weights } => convolve::custom_filter(scheduler, raster, weights),
            Filter::GrayWorld => color_science::gray_world(scheduler, raster),
            Filter::LinearStretch => levels_curves::linear_stretch(scheduler, raster),
            Filter::Gamma {
                coefficient,
                exponent,
            } => color_adjust::gamma(scheduler, raster, *coefficient, *exponent),
            Filter::RotateLeft => rotate::rotate_left(scheduler, raster),
            Filter::RotateRight => rotate::rotate_right(scheduler, raster),
            Filter::Mirror(axis) => rotate::mirror(scheduler, raster, *axis),
        }

        let event = FilterEvent {
            filter: filter.name(),
            width: raster.width(),
            height: raster.height(),
            elapsed: started.elapsed(),
        };
        debug!(
            filter = event.filter,
            width = event.width,
            height = event.height,
            elapsed_us = event.elapsed.as_micros() as u64,
            "filter done"
        );
        for listener in &self.listeners {
            listener(&event);
        }
    }

    /// Per-channel intensity histogram of `raster`.
    pub fn histogram(&self, raster: &Raster) -> HistogramTriple {
        extract_histogram(&self.scheduler, raster)
    }
}

impl fmt::Debug for FilterEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FilterEngine")
            .field("workers", &self.scheduler.workers())
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
