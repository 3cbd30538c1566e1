use ndarray::{Array2, Array3, ArrayD, ArrayView2, Axis, Ix3};

use crate::error::OverlayError;

/// One auto-generated mask record: the pixel grid plus its precomputed
/// area in pixels, the way mask-generator pipelines emit them.
#[derive(Debug, Clone)]
pub struct Region {
    /// Per-pixel coverage in `[0, 1]`, shape `(height, width)`.
    pub segmentation: Array2<f32>,
    /// Covered pixel count, used for ranking.
    pub area: u64,
}

impl Region {
    /// Wrap a boolean bitmap, deriving `area` from the set pixels.
    pub fn from_bitmap(bitmap: &Array2<bool>) -> Self {
        let area = bitmap.iter().filter(|&&set| set).count() as u64;
        let segmentation = bitmap.map(|&set| if set { 1.0 } else { 0.0 });
        Self { segmentation, area }
    }
}

/// A collection of candidate masks in one of the two shapes segmentation
/// pipelines produce.
#[derive(Debug, Clone)]
pub enum MaskSet {
    /// Stack of per-pixel coverage grids, shape `(count, height, width)`,
    /// optionally with one confidence score per mask.
    Stack {
        masks: Array3<f32>,
        scores: Option<Vec<f32>>,
    },
    /// Auto-generated mask records, ranked by area instead of score.
    Regions(Vec<Region>),
}

impl MaskSet {
    /// Build the stack representation from a raw prediction tensor.
    ///
    /// Accepts shape `(count, height, width)` or `(count, 1, height, width)`;
    /// a singleton channel axis is squeezed away. `scores`, when given, must
    /// hold one value per mask.
    pub fn from_stack(
        masks: ArrayD<f32>,
        scores: Option<Vec<f32>>,
    ) -> Result<Self, OverlayError> {
        let shape = masks.shape().to_vec();
        let stack = match shape.as_slice() {
            [_, _, _] => masks.into_dimensionality::<Ix3>().ok(),
            [_, 1, _, _] => masks
                .index_axis_move(Axis(1), 0)
                .into_dimensionality::<Ix3>()
                .ok(),
            _ => None,
        };
        let masks = stack.ok_or(OverlayError::BadStackShape(shape))?;

        let count = masks.len_of(Axis(0));
        if count == 0 {
            return Err(OverlayError::EmptyMaskSet);
        }
        if let Some(scores) = &scores {
            if scores.len() != count {
                return Err(OverlayError::ScoreCountMismatch {
                    expected: count,
                    actual: scores.len(),
                });
            }
        }

        Ok(Self::Stack { masks, scores })
    }

    /// Build the record representation, checking that every region grid
    /// shares the same dimensions.
    pub fn from_regions(regions: Vec<Region>) -> Result<Self, OverlayError> {
        let (expected_height, expected_width) = regions
            .first()
            .ok_or(OverlayError::EmptyMaskSet)?
            .segmentation
            .dim();
        for (index, region) in regions.iter().enumerate().skip(1) {
            let (height, width) = region.segmentation.dim();
            if (height, width) != (expected_height, expected_width) {
                return Err(OverlayError::MixedRegionDimensions {
                    index,
                    width: width as u32,
                    height: height as u32,
                    expected_width: expected_width as u32,
                    expected_height: expected_height as u32,
                });
            }
        }
        Ok(Self::Regions(regions))
    }

    /// Number of masks in the set.
    pub fn len(&self) -> usize {
        match self {
            Self::Stack { masks, .. } => masks.len_of(Axis(0)),
            Self::Regions(regions) => regions.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Canvas dimensions implied by the masks, `(width, height)`.
    ///
    /// Must not be called on an empty set; the constructors reject those.
    pub fn dimensions(&self) -> (u32, u32) {
        match self {
            Self::Stack { masks, .. } => {
                let shape = masks.shape();
                (shape[2] as u32, shape[1] as u32)
            }
            Self::Regions(regions) => {
                let (height, width) = regions[0].segmentation.dim();
                (width as u32, height as u32)
            }
        }
    }

    /// Compositing order: descending score for scored stacks, descending
    /// area for regions, input order otherwise. Ties keep input order.
    pub(crate) fn ranked_indices(&self) -> Result<Vec<usize>, OverlayError> {
        let mut order: Vec<usize> = (0..self.len()).collect();
        match self {
            Self::Stack {
                masks,
                scores: Some(scores),
            } => {
                if scores.len() != masks.len_of(Axis(0)) {
                    return Err(OverlayError::ScoreCountMismatch {
                        expected: masks.len_of(Axis(0)),
                        actual: scores.len(),
                    });
                }
                order.sort_by(|&a, &b| scores[b].total_cmp(&scores[a]));
            }
            Self::Stack { scores: None, .. } => {}
            Self::Regions(regions) => {
                order.sort_by(|&a, &b| regions[b].area.cmp(&regions[a].area));
            }
        }
        Ok(order)
    }

    /// 2-D view of mask `index`.
    pub(crate) fn grid(&self, index: usize) -> ArrayView2<'_, f32> {
        match self {
            Self::Stack { masks, .. } => masks.index_axis(Axis(0), index),
            Self::Regions(regions) => regions[index].segmentation.view(),
        }
    }
}
