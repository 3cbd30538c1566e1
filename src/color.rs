use image::Rgb;
use rand::Rng;

/// Source of overlay colors, queried once per composited mask.
///
/// The default [`RandomPalette`] draws uniform random colors so adjacent
/// masks stay visually distinguishable. Substitute a [`FixedPalette`] when
/// the output needs to be deterministic (e.g. in tests).
pub trait ColorSource {
    /// Produce the color for the next mask layer.
    fn next_color(&mut self) -> Rgb<u8>;
}

/// Uniform random colors, one independent draw per mask.
///
/// Not reproducible between calls or runs; no seeding is exposed.
#[derive(Debug, Default)]
pub struct RandomPalette;

impl ColorSource for RandomPalette {
    fn next_color(&mut self) -> Rgb<u8> {
        let mut rng = rand::thread_rng();
        Rgb([rng.gen(), rng.gen(), rng.gen()])
    }
}

/// Cycles through a fixed list of colors.
pub struct FixedPalette {
    colors: Vec<Rgb<u8>>,
    next: usize,
}

impl FixedPalette {
    /// Build a palette from an explicit color list.
    ///
    /// # Panics
    /// Panics if `colors` is empty.
    pub fn new(colors: Vec<Rgb<u8>>) -> Self {
        assert!(!colors.is_empty(), "palette needs at least one color");
        Self { colors, next: 0 }
    }
}

impl ColorSource for FixedPalette {
    fn next_color(&mut self) -> Rgb<u8> {
        let color = self.colors[self.next % self.colors.len()];
        self.next += 1;
        color
    }
}
