//! Per-view state carried through the pipeline stages.

use zhang_core::{CalibError, Correspondence, Homography, PatternSize, ReprojectionStats};
use zhang_linear::{HomographyOptions, HomographySolver, NormalizationTransform};
use zhang_optim::{refine_homography, RefineOptions, RefineOutcome};

use crate::report::ViewReport;

/// A view after ingest and normalization.
#[derive(Debug, Clone)]
pub struct NormalizedView {
    index: usize,
    correspondence: Correspondence,
    object_transform: NormalizationTransform,
    image_transform: NormalizationTransform,
}

impl NormalizedView {
    /// Check the correspondence against the pattern. This is the ingest stage.
    pub fn ingest(pattern: &PatternSize, correspondence: &Correspondence) -> Result<(), CalibError> {
        correspondence.validate()?;
        pattern.check(correspondence)
    }

    /// Compute the conditioning transforms of both point sets.
    pub fn new(index: usize, correspondence: Correspondence) -> Result<Self, CalibError> {
        let object_transform = NormalizationTransform::from_points(&correspondence.object_points)?;
        let image_transform = NormalizationTransform::from_points(&correspondence.image_points)?;
        Ok(Self {
            index,
            correspondence,
            object_transform,
            image_transform,
        })
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn object_transform(&self) -> &NormalizationTransform {
        &self.object_transform
    }

    pub fn image_transform(&self) -> &NormalizationTransform {
        &self.image_transform
    }

    /// Normalized DLT followed by de-normalization to pixel units.
    pub fn estimate(self, opts: &HomographyOptions) -> Result<View, CalibError> {
        let object = self.object_transform.apply_all(&self.correspondence.object_points);
        let image = self.image_transform.apply_all(&self.correspondence.image_points);
        let h_norm = HomographySolver::dlt_normalized(&object, &image, opts)?;
        let homography =
            HomographySolver::denormalize(&h_norm, &self.object_transform, &self.image_transform)?;

        Ok(View {
            index: self.index,
            correspondence: self.correspondence,
            homography,
            refinement: RefineOutcome::Skipped,
        })
    }
}

/// A view with a homography estimate.
#[derive(Debug, Clone)]
pub struct View {
    index: usize,
    correspondence: Correspondence,
    homography: Homography,
    refinement: RefineOutcome,
}

impl View {
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn correspondence(&self) -> &Correspondence {
        &self.correspondence
    }

    pub fn homography(&self) -> &Homography {
        &self.homography
    }

    pub fn refinement(&self) -> &RefineOutcome {
        &self.refinement
    }

    /// Replace the homography with its refined version. Never fails; a
    /// fallback keeps the current estimate and records why.
    pub fn refine(&mut self, opts: &RefineOptions) {
        let refined = refine_homography(&self.homography, &self.correspondence, opts);
        self.homography = refined.homography;
        self.refinement = refined.outcome;
    }

    pub fn reprojection_stats(&self) -> ReprojectionStats {
        self.homography.reprojection_stats(&self.correspondence)
    }

    pub fn report(&self) -> ViewReport {
        ViewReport {
            index: self.index,
            homography: self.homography,
            refinement: self.refinement.clone(),
            reprojection: self.reprojection_stats(),
        }
    }
}
