use thiserror::Error;

/// Errors raised while assembling a mask set or compositing it.
#[derive(Debug, Error)]
pub enum OverlayError {
    #[error("mask set is empty")]
    EmptyMaskSet,

    #[error(
        "mask stack must have shape (count, height, width) or (count, 1, height, width), got {0:?}"
    )]
    BadStackShape(Vec<usize>),

    #[error("got {actual} scores for {expected} masks")]
    ScoreCountMismatch { expected: usize, actual: usize },

    #[error(
        "region {index} is {width}x{height}, expected {expected_width}x{expected_height}"
    )]
    MixedRegionDimensions {
        index: usize,
        width: u32,
        height: u32,
        expected_width: u32,
        expected_height: u32,
    },

    #[error(
        "mask dimensions {mask_width}x{mask_height} do not match canvas dimensions {canvas_width}x{canvas_height}"
    )]
    DimensionMismatch {
        mask_width: u32,
        mask_height: u32,
        canvas_width: u32,
        canvas_height: u32,
    },

    #[error("alpha must be within 0.0..=1.0, got {0}")]
    AlphaOutOfRange(f32),
}
