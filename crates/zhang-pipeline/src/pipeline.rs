use log::{debug, info, warn};
use rayon::prelude::*;
use zhang_core::{CalibError, Correspondence, PatternSize};
use zhang_linear::estimate_intrinsics_from_homographies;

use crate::config::CalibrationConfig;
use crate::error::PipelineError;
use crate::report::{CalibrationInput, CalibrationReport, DroppedView, Stage};
use crate::view::{NormalizedView, View};

/// Per-view failure before it is classified as a drop or a fatal error.
struct ViewFailure {
    index: usize,
    stage: Stage,
    error: CalibError,
}

fn at(index: usize, stage: Stage) -> impl FnOnce(CalibError) -> ViewFailure {
    move |error| ViewFailure {
        index,
        stage,
        error,
    }
}

/// Planar calibration over a set of views.
#[derive(Debug, Clone, Default)]
pub struct CalibrationPipeline {
    config: CalibrationConfig,
}

impl CalibrationPipeline {
    pub fn new(config: CalibrationConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CalibrationConfig {
        &self.config
    }

    /// Run every stage for one view.
    fn process_view(
        &self,
        index: usize,
        pattern: &PatternSize,
        correspondence: &Correspondence,
    ) -> Result<View, ViewFailure> {
        NormalizedView::ingest(pattern, correspondence).map_err(at(index, Stage::Ingest))?;
        let normalized = NormalizedView::new(index, correspondence.clone())
            .map_err(at(index, Stage::Normalize))?;
        let mut view = normalized
            .estimate(&self.config.homography)
            .map_err(at(index, Stage::Estimate))?;
        view.refine(&self.config.refine);

        debug!(
            "view {index}: rms {:.4} px, refinement {:?}",
            view.reprojection_stats().rms,
            view.refinement()
        );
        Ok(view)
    }

    /// Calibrate the camera from `input`.
    ///
    /// # Errors
    ///
    /// - [`CalibError::InsufficientViews`] when fewer than
    ///   [`CalibrationConfig::effective_min_views`] views survive,
    /// - any error of the intrinsics solve,
    /// - a per-view stage error that is not recoverable by dropping the view.
    pub fn run(&self, input: &CalibrationInput) -> Result<CalibrationReport, PipelineError> {
        info!(
            "calibrating from {} views ({}x{} pattern)",
            input.views.len(),
            input.pattern.cols,
            input.pattern.rows
        );

        let results: Vec<Result<View, ViewFailure>> = if self.config.parallel {
            input
                .views
                .par_iter()
                .enumerate()
                .map(|(i, c)| self.process_view(i, &input.pattern, c))
                .collect()
        } else {
            input
                .views
                .iter()
                .enumerate()
                .map(|(i, c)| self.process_view(i, &input.pattern, c))
                .collect()
        };

        let mut views = Vec::with_capacity(results.len());
        let mut dropped = Vec::new();
        for result in results {
            match result {
                Ok(view) => views.push(view),
                Err(ViewFailure {
                    index,
                    stage,
                    error,
                }) if error.is_per_view() => {
                    warn!("dropping view {index} at {stage}: {error}");
                    dropped.push(DroppedView {
                        index,
                        stage,
                        reason: error.to_string(),
                    });
                }
                Err(ViewFailure {
                    index,
                    stage,
                    error,
                }) => {
                    return Err(PipelineError {
                        stage,
                        view: Some(index),
                        dropped,
                        source: error,
                    });
                }
            }
        }

        let required = self.config.effective_min_views();
        if views.len() < required {
            return Err(PipelineError {
                stage: Stage::SolveIntrinsics,
                view: None,
                dropped,
                source: CalibError::InsufficientViews {
                    available: views.len(),
                    required,
                },
            });
        }

        let homographies: Vec<_> = views.iter().map(|v| *v.homography()).collect();
        let intrinsics =
            match estimate_intrinsics_from_homographies(&homographies, &self.config.intrinsics) {
                Ok(k) => k,
                Err(source) => {
                    return Err(PipelineError {
                        stage: Stage::SolveIntrinsics,
                        view: None,
                        dropped,
                        source,
                    })
                }
            };

        let refined = views.iter().filter(|v| v.refinement().is_refined()).count();
        info!(
            "intrinsics from {} views ({} refined, {} dropped): alpha {:.3}, beta {:.3}, gamma {:.3}, uc {:.3}, vc {:.3}",
            views.len(),
            refined,
            dropped.len(),
            intrinsics.alpha,
            intrinsics.beta,
            intrinsics.gamma,
            intrinsics.uc,
            intrinsics.vc
        );

        Ok(CalibrationReport {
            intrinsics,
            views: views.iter().map(View::report).collect(),
            dropped,
        })
    }
}

/// Run the pipeline once with `config`.
pub fn run_calibration(
    input: &CalibrationInput,
    config: &CalibrationConfig,
) -> Result<CalibrationReport, PipelineError> {
    CalibrationPipeline::new(*config).run(input)
}
