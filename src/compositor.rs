use std::fmt;

use image::{imageops, DynamicImage, Rgb, Rgba, RgbaImage};
use ndarray::ArrayView2;

use crate::color::{ColorSource, RandomPalette};
use crate::error::OverlayError;
use crate::mask::MaskSet;

/// Background the mask layers are blended onto.
pub enum Background<'a> {
    /// Composite onto an RGBA copy of the source image.
    Image(&'a DynamicImage),
    /// Composite onto a transparent canvas sized to the masks.
    Blank,
}

/// How many of the ranked masks to composite.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    /// Only the top-ranked mask.
    Best,
    /// Every mask, highest rank first, later masks drawn on top.
    All,
}

/// Blends mask layers onto a canvas, one translucent color per mask.
pub struct Compositor {
    colors: Box<dyn ColorSource>,
    alpha: f32,
}

impl fmt::Debug for Compositor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Compositor")
            .field("alpha", &self.alpha)
            .finish_non_exhaustive()
    }
}

impl Compositor {
    /// Compositor with random colors at 50% layer opacity.
    pub fn new() -> Self {
        Self {
            colors: Box::new(RandomPalette),
            alpha: 0.5,
        }
    }

    /// Compositor with an explicit layer opacity and color source.
    ///
    /// `alpha` scales every layer's overall translucency and must lie in
    /// `0.0..=1.0`.
    pub fn with_options(
        alpha: f32,
        colors: Box<dyn ColorSource>,
    ) -> Result<Self, OverlayError> {
        if !(0.0..=1.0).contains(&alpha) {
            return Err(OverlayError::AlphaOutOfRange(alpha));
        }
        Ok(Self { colors, alpha })
    }

    /// Composite the ranked masks onto the chosen background.
    ///
    /// Masks are ranked by descending score (scored stacks) or descending
    /// area (regions); `selection` picks either the top-ranked mask or the
    /// whole ranked sequence. Each composited mask is a solid color whose
    /// per-pixel opacity follows the mask's coverage, blended with the
    /// "over" operator.
    ///
    /// The input image is never modified; the returned canvas is a fresh
    /// raster matching the background's dimensions. Every mask grid must
    /// match the canvas dimensions.
    pub fn compose(
        &mut self,
        masks: &MaskSet,
        background: Background<'_>,
        selection: Selection,
    ) -> Result<RgbaImage, OverlayError> {
        let _span = tracing::debug_span!("compose").entered();

        if masks.is_empty() {
            return Err(OverlayError::EmptyMaskSet);
        }

        let order = masks.ranked_indices()?;

        let mut canvas = match background {
            Background::Image(image) => image.to_rgba8(),
            Background::Blank => {
                let (width, height) = masks.dimensions();
                tracing::debug!("Allocating blank {}x{} canvas", width, height);
                RgbaImage::from_pixel(width, height, Rgba([0, 0, 0, 0]))
            }
        };

        let layer_alpha = (self.alpha * 255.0).round() as u8;
        let count = match selection {
            Selection::Best => 1,
            Selection::All => order.len(),
        };

        for &index in order.iter().take(count) {
            let grid = masks.grid(index);
            let color = self.colors.next_color();
            let layer = rasterize(grid, color, layer_alpha, canvas.dimensions())?;
            imageops::overlay(&mut canvas, &layer, 0, 0);
        }

        tracing::debug!("Composited {} of {} masks", count, masks.len());

        Ok(canvas)
    }
}

impl Default for Compositor {
    fn default() -> Self {
        Self::new()
    }
}

/// Build one RGBA layer: solid `color`, per-pixel alpha scaled by the
/// grid's coverage and the overall `layer_alpha`.
fn rasterize(
    grid: ArrayView2<'_, f32>,
    color: Rgb<u8>,
    layer_alpha: u8,
    canvas_dimensions: (u32, u32),
) -> Result<RgbaImage, OverlayError> {
    let (rows, cols) = grid.dim();
    let (width, height) = (cols as u32, rows as u32);
    let (canvas_width, canvas_height) = canvas_dimensions;
    if (width, height) != (canvas_width, canvas_height) {
        return Err(OverlayError::DimensionMismatch {
            mask_width: width,
            mask_height: height,
            canvas_width,
            canvas_height,
        });
    }

    let Rgb([r, g, b]) = color;
    Ok(RgbaImage::from_fn(width, height, |x, y| {
        let coverage = grid[[y as usize, x as usize]].clamp(0.0, 1.0);
        let alpha = (coverage * layer_alpha as f32).round() as u8;
        Rgba([r, g, b, alpha])
    }))
}
