use super::{PackingAlgorithm, Point, Size};

/// Cross-axis alignment for single-row and single-column layouts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    /// Top of a row or left of a column
    Start,
    /// Bottom of a row or right of a column
    End,
}

/// Left-to-right single row
pub struct HorizontalPacker {
    pub align: Align,
}

impl PackingAlgorithm for HorizontalPacker {
    fn layout(&self, boxes: &[Size]) -> Vec<Point> {
        let row_height = boxes.iter().map(|b| b.height).max().unwrap_or(0);
        let mut x = 0u32;

        boxes
            .iter()
            .map(|b| {
                let y = match self.align {
                    Align::Start => 0,
                    Align::End => row_height - b.height,
                };
                let point = Point::new(x, y);
                x += b.width;
                point
            })
            .collect()
    }
}

/// Top-to-bottom single column
pub struct VerticalPacker {
    pub align: Align,
}

impl PackingAlgorithm for VerticalPacker {
    fn layout(&self, boxes: &[Size]) -> Vec<Point> {
        let column_width = boxes.iter().map(|b| b.width).max().unwrap_or(0);
        let mut y = 0u32;

        boxes
            .iter()
            .map(|b| {
                let x = match self.align {
                    Align::Start => 0,
                    Align::End => column_width - b.width,
                };
                let point = Point::new(x, y);
                y += b.height;
                point
            })
            .collect()
    }
}

/// Staircase: each box starts where the previous one ended on both axes
pub struct DiagonalPacker;

impl PackingAlgorithm for DiagonalPacker {
    fn layout(&self, boxes: &[Size]) -> Vec<Point> {
        let mut x = 0u32;
        let mut y = 0u32;

        boxes
            .iter()
            .map(|b| {
                let point = Point::new(x, y);
                x += b.width;
                y += b.height;
                point
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn boxes() -> Vec<Size> {
        vec![Size::new(10, 30), Size::new(20, 10), Size::new(5, 20)]
    }

    #[test]
    fn test_horizontal_top() {
        let points = HorizontalPacker { align: Align::Start }.layout(&boxes());
        assert_eq!(
            points,
            vec![Point::new(0, 0), Point::new(10, 0), Point::new(30, 0)]
        );
    }

    #[test]
    fn test_horizontal_bottom() {
        let points = HorizontalPacker { align: Align::End }.layout(&boxes());
        assert_eq!(
            points,
            vec![Point::new(0, 0), Point::new(10, 20), Point::new(30, 10)]
        );
    }

    #[test]
    fn test_vertical_left() {
        let points = VerticalPacker { align: Align::Start }.layout(&boxes());
        assert_eq!(
            points,
            vec![Point::new(0, 0), Point::new(0, 30), Point::new(0, 40)]
        );
    }

    #[test]
    fn test_vertical_right() {
        let points = VerticalPacker { align: Align::End }.layout(&boxes());
        assert_eq!(
            points,
            vec![Point::new(10, 0), Point::new(0, 30), Point::new(15, 40)]
        );
    }

    #[test]
    fn test_diagonal() {
        let points = DiagonalPacker.layout(&boxes());
        assert_eq!(
            points,
            vec![Point::new(0, 0), Point::new(10, 30), Point::new(30, 40)]
        );
    }

    #[test]
    fn test_empty_input() {
        assert!(HorizontalPacker { align: Align::End }.layout(&[]).is_empty());
        assert!(DiagonalPacker.layout(&[]).is_empty());
    }
}
