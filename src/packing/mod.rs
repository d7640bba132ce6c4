mod linear;
mod rect;
mod square;

use std::fmt;
use std::str::FromStr;

pub use linear::{Align, DiagonalPacker, HorizontalPacker, VerticalPacker};
pub use rect::{Point, Rect, Size};
pub use square::SquarePacker;

use crate::error::GlueError;
use crate::sprite::Asset;

/// A placement policy over an ordered list of padded boxes.
///
/// Implementations must be deterministic, return one non-overlapping
/// position per box and keep every box at non-negative coordinates.
pub trait PackingAlgorithm {
    /// Compute one position per box, in input order
    fn layout(&self, boxes: &[Size]) -> Vec<Point>;

    /// Pack assets in their current order.
    ///
    /// Positions are computed for the whole list first and only then written
    /// back, so no asset observes a partial layout.
    fn process(&self, assets: &mut [Asset]) -> usize {
        let boxes: Vec<Size> = assets
            .iter()
            .map(|a| Size::new(a.absolute_width(), a.absolute_height()))
            .collect();
        let points = self.layout(&boxes);

        let mut placed = 0;
        for (asset, point) in assets.iter_mut().zip(points) {
            if asset.place(point) {
                placed += 1;
            }
        }
        placed
    }
}

/// Packing strategy selected by configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Algorithm {
    #[default]
    Square,
    Vertical,
    VerticalRight,
    Horizontal,
    HorizontalBottom,
    Diagonal,
}

impl Algorithm {
    pub const ALL: [Algorithm; 6] = [
        Algorithm::Square,
        Algorithm::Vertical,
        Algorithm::VerticalRight,
        Algorithm::Horizontal,
        Algorithm::HorizontalBottom,
        Algorithm::Diagonal,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Algorithm::Square => "square",
            Algorithm::Vertical => "vertical",
            Algorithm::VerticalRight => "vertical-right",
            Algorithm::Horizontal => "horizontal",
            Algorithm::HorizontalBottom => "horizontal-bottom",
            Algorithm::Diagonal => "diagonal",
        }
    }

    /// The strategy implementing this algorithm
    pub fn packer(self) -> Box<dyn PackingAlgorithm> {
        match self {
            Algorithm::Square => Box::new(SquarePacker),
            Algorithm::Vertical => Box::new(VerticalPacker {
                align: Align::Start,
            }),
            Algorithm::VerticalRight => Box::new(VerticalPacker { align: Align::End }),
            Algorithm::Horizontal => Box::new(HorizontalPacker {
                align: Align::Start,
            }),
            Algorithm::HorizontalBottom => Box::new(HorizontalPacker { align: Align::End }),
            Algorithm::Diagonal => Box::new(DiagonalPacker),
        }
    }
}

impl FromStr for Algorithm {
    type Err = GlueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Algorithm::ALL
            .into_iter()
            .find(|a| a.name() == s.trim())
            .ok_or_else(|| GlueError::UnknownAlgorithm(s.to_string()))
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_algorithm() {
        for algorithm in Algorithm::ALL {
            assert_eq!(algorithm.name().parse::<Algorithm>().unwrap(), algorithm);
        }
        assert!(matches!(
            "spiral".parse::<Algorithm>(),
            Err(GlueError::UnknownAlgorithm(name)) if name == "spiral"
        ));
    }

    #[test]
    fn test_every_algorithm_is_disjoint_and_non_negative() {
        let boxes: Vec<Size> = [(30, 10), (10, 30), (20, 20), (5, 5), (40, 8)]
            .iter()
            .map(|&(w, h)| Size::new(w, h))
            .collect();

        for algorithm in Algorithm::ALL {
            let points = algorithm.packer().layout(&boxes);
            assert_eq!(points.len(), boxes.len(), "{}", algorithm);

            let rects: Vec<Rect> = points
                .iter()
                .zip(&boxes)
                .map(|(&p, &b)| Rect::at(p, b))
                .collect();
            for (i, a) in rects.iter().enumerate() {
                for b in &rects[i + 1..] {
                    assert!(!a.intersects(b), "{}: {:?} overlaps {:?}", algorithm, a, b);
                }
            }
        }
    }
}
