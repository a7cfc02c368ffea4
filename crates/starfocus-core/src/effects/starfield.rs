use rand::Rng;
use serde::{Deserialize, Serialize};

pub const DEFAULT_STAR_COUNT: usize = 100;

/// One decorative star. Positions are percentages of the viewport.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Star {
    pub x_pct: f32,
    pub y_pct: f32,
    pub size_px: f32,
    /// Length of one twinkle cycle.
    pub twinkle_secs: f32,
    /// Offset before the first twinkle.
    pub delay_secs: f32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Starfield {
    pub stars: Vec<Star>,
}

impl Starfield {
    pub fn generate<R: Rng + ?Sized>(count: usize, rng: &mut R) -> Self {
        let stars = (0..count)
            .map(|_| Star {
                x_pct: rng.gen_range(0.0..100.0),
                y_pct: rng.gen_range(0.0..100.0),
                size_px: rng.gen_range(1.0..3.0),
                twinkle_secs: rng.gen_range(2.0..5.0),
                delay_secs: rng.gen_range(0.0..5.0),
            })
            .collect();
        Self { stars }
    }

    pub fn len(&self) -> usize {
        self.stars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stars.is_empty()
    }

    /// Project the field onto a `width` x `height` character grid.
    /// Stars of 2px and larger draw as `*`, smaller ones as `.`.
    pub fn render_ascii(&self, width: usize, height: usize) -> Vec<String> {
        if width == 0 || height == 0 {
            return Vec::new();
        }
        let mut grid = vec![vec![' '; width]; height];
        for star in &self.stars {
            let col = ((star.x_pct / 100.0) * width as f32) as usize;
            let row = ((star.y_pct / 100.0) * height as f32) as usize;
            let cell = &mut grid[row.min(height - 1)][col.min(width - 1)];
            let glyph = if star.size_px >= 2.0 { '*' } else { '.' };
            if *cell != '*' {
                *cell = glyph;
            }
        }
        grid.into_iter().map(|row| row.into_iter().collect()).collect()
    }
}
