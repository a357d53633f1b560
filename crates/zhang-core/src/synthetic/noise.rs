//! Seeded pixel noise for synthetic datasets.
//!
//! Every view draws from its own `StdRng` stream derived from the base seed
//! and the view index, so perturbing a subset of views is reproducible.

use crate::{Correspondence, Pt2, Real};
use rand::{rngs::StdRng, Rng, SeedableRng};

/// Uniform pixel noise in `[-max_abs_px, +max_abs_px]` per axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PixelNoise {
    /// Base seed controlling the pseudo-random sequence.
    pub seed: u64,
    /// Maximum absolute per-axis noise (pixels).
    pub max_abs_px: Real,
}

impl PixelNoise {
    pub fn new(seed: u64, max_abs_px: Real) -> Self {
        Self { seed, max_abs_px }
    }

    fn rng_for_view(&self, view_idx: usize) -> StdRng {
        StdRng::seed_from_u64(
            self.seed ^ (view_idx as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15),
        )
    }

    /// Perturb the image points of one view; object points are left untouched.
    pub fn apply(&self, view_idx: usize, view: &Correspondence) -> Correspondence {
        let max_abs = self.max_abs_px.abs();
        if max_abs == 0.0 {
            return view.clone();
        }

        let mut rng = self.rng_for_view(view_idx);
        let image_points = view
            .image_points
            .iter()
            .map(|p| {
                Pt2::new(
                    p.x + rng.gen_range(-max_abs..=max_abs),
                    p.y + rng.gen_range(-max_abs..=max_abs),
                )
            })
            .collect();

        Correspondence {
            object_points: view.object_points.clone(),
            image_points,
        }
    }

    /// Perturb every view, keyed by its position in the slice.
    pub fn apply_all(&self, views: &[Correspondence]) -> Vec<Correspondence> {
        views
            .iter()
            .enumerate()
            .map(|(idx, view)| self.apply(idx, view))
            .collect()
    }
}
