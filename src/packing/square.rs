//! Growing guillotine packer.
//!
//! The canvas starts empty. Each box goes into the free rectangle that leaves
//! the least area unused (ties: topmost, then leftmost, then oldest). The rest
//! of that rectangle is split along the shorter leftover axis into at most two
//! new free rectangles. When nothing fits, the canvas grows to the right or
//! downward by exactly the box, whichever keeps the canvas closer to 1:1 (ties:
//! smaller area, then right), and the uncovered part of the new strip becomes
//! free space.
//!
//! Free rectangles never overlap each other or a placed box, so placements are
//! disjoint by construction.

use super::{PackingAlgorithm, Point, Rect, Size};

/// Near-square general purpose packer
pub struct SquarePacker;

impl PackingAlgorithm for SquarePacker {
    fn layout(&self, boxes: &[Size]) -> Vec<Point> {
        let mut state = GuillotineState::default();
        boxes.iter().map(|&size| state.insert(size)).collect()
    }
}

#[derive(Debug, Default)]
struct GuillotineState {
    canvas: Size,
    free_rects: Vec<Rect>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Growth {
    Right,
    Down,
}

impl GuillotineState {
    fn insert(&mut self, size: Size) -> Point {
        if size.width == 0 || size.height == 0 {
            return Point::default();
        }

        match self.find_free_rect(size) {
            Some(index) => self.place_in(index, size),
            None => self.grow(size),
        }
    }

    /// Best-area-fit over the free list
    fn find_free_rect(&self, size: Size) -> Option<usize> {
        let needed = u64::from(size.width) * u64::from(size.height);
        let mut best: Option<(usize, (u64, u32, u32))> = None;

        for (index, free_rect) in self.free_rects.iter().enumerate() {
            if !free_rect.fits(size) {
                continue;
            }
            let score = (free_rect.area() - needed, free_rect.y, free_rect.x);
            if best.is_none_or(|(_, best_score)| score < best_score) {
                best = Some((index, score));
            }
        }

        best.map(|(index, _)| index)
    }

    fn place_in(&mut self, index: usize, size: Size) -> Point {
        let free_rect = self.free_rects.remove(index);
        let leftover_w = free_rect.width - size.width;
        let leftover_h = free_rect.height - size.height;

        let (right, bottom) = if leftover_w < leftover_h {
            // Bottom piece spans the full width.
            (
                Rect::new(free_rect.x + size.width, free_rect.y, leftover_w, size.height),
                Rect::new(
                    free_rect.x,
                    free_rect.y + size.height,
                    free_rect.width,
                    leftover_h,
                ),
            )
        } else {
            // Right piece spans the full height.
            (
                Rect::new(
                    free_rect.x + size.width,
                    free_rect.y,
                    leftover_w,
                    free_rect.height,
                ),
                Rect::new(free_rect.x, free_rect.y + size.height, size.width, leftover_h),
            )
        };

        self.push_free(right);
        self.push_free(bottom);

        Point::new(free_rect.x, free_rect.y)
    }

    fn grow(&mut self, size: Size) -> Point {
        let Size { width, height } = self.canvas;
        let right = Size::new(width + size.width, height.max(size.height));
        let down = Size::new(width.max(size.width), height + size.height);

        let growth = if squareness_cmp(right, down).is_le() {
            Growth::Right
        } else {
            Growth::Down
        };

        match growth {
            Growth::Right => {
                self.canvas = right;
                self.push_free(Rect::new(
                    width,
                    size.height,
                    size.width,
                    right.height - size.height,
                ));
                if right.height > height {
                    self.push_free(Rect::new(0, height, width, right.height - height));
                }
                Point::new(width, 0)
            }
            Growth::Down => {
                self.canvas = down;
                self.push_free(Rect::new(
                    size.width,
                    height,
                    down.width - size.width,
                    size.height,
                ));
                if down.width > width {
                    self.push_free(Rect::new(width, 0, down.width - width, height));
                }
                Point::new(0, height)
            }
        }
    }

    fn push_free(&mut self, rect: Rect) {
        if !rect.is_empty() {
            self.free_rects.push(rect);
        }
    }
}

/// Orders candidate canvases by aspect ratio distance from 1:1, then by area.
fn squareness_cmp(a: Size, b: Size) -> std::cmp::Ordering {
    let (a_long, a_short) = long_short(a);
    let (b_long, b_short) = long_short(b);

    // a_long / a_short compared with b_long / b_short without floats
    (a_long * b_short)
        .cmp(&(b_long * a_short))
        .then_with(|| (a_long * a_short).cmp(&(b_long * b_short)))
}

fn long_short(size: Size) -> (u64, u64) {
    let w = u64::from(size.width);
    let h = u64::from(size.height);
    (w.max(h), w.min(h).max(1))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extent(points: &[Point], boxes: &[Size]) -> Size {
        points.iter().zip(boxes).fold(Size::default(), |acc, (p, b)| {
            Size::new(acc.width.max(p.x + b.width), acc.height.max(p.y + b.height))
        })
    }

    fn assert_disjoint(points: &[Point], boxes: &[Size]) {
        let rects: Vec<Rect> = points
            .iter()
            .zip(boxes)
            .map(|(&p, &b)| Rect::at(p, b))
            .collect();
        for (i, a) in rects.iter().enumerate() {
            for b in &rects[i + 1..] {
                assert!(!a.intersects(b), "{:?} overlaps {:?}", a, b);
            }
        }
    }

    #[test]
    fn test_single_box_at_origin() {
        let points = SquarePacker.layout(&[Size::new(30, 20)]);
        assert_eq!(points, vec![Point::new(0, 0)]);
    }

    #[test]
    fn test_four_equal_boxes_form_square() {
        let boxes = vec![Size::new(50, 50); 4];
        let points = SquarePacker.layout(&boxes);

        assert_disjoint(&points, &boxes);
        assert_eq!(extent(&points, &boxes), Size::new(100, 100));
        assert_eq!(
            points,
            vec![
                Point::new(0, 0),
                Point::new(50, 0),
                Point::new(0, 50),
                Point::new(50, 50),
            ]
        );
    }

    #[test]
    fn test_sixteen_equal_boxes_fill_square() {
        let boxes = vec![Size::new(10, 10); 16];
        let points = SquarePacker.layout(&boxes);

        assert_disjoint(&points, &boxes);
        assert_eq!(extent(&points, &boxes), Size::new(40, 40));
    }

    #[test]
    fn test_mixed_sizes_are_disjoint() {
        let boxes: Vec<Size> = [
            (64, 64),
            (48, 20),
            (30, 30),
            (12, 70),
            (25, 25),
            (25, 25),
            (8, 8),
            (100, 5),
            (5, 40),
            (17, 33),
        ]
        .iter()
        .map(|&(w, h)| Size::new(w, h))
        .collect();

        let points = SquarePacker.layout(&boxes);
        assert_eq!(points.len(), boxes.len());
        assert_disjoint(&points, &boxes);
    }

    #[test]
    fn test_small_box_reuses_free_space() {
        let boxes = vec![Size::new(40, 40), Size::new(30, 10), Size::new(10, 10)];
        let points = SquarePacker.layout(&boxes);

        assert_disjoint(&points, &boxes);
        // The third box lands in the gap beside the second one.
        assert_eq!(points[1], Point::new(0, 40));
        assert_eq!(points[2], Point::new(30, 40));
        assert_eq!(extent(&points, &boxes), Size::new(40, 50));
    }

    #[test]
    fn test_deterministic() {
        let boxes: Vec<Size> = (1..30).map(|i| Size::new(i * 3 % 17 + 1, i * 5 % 13 + 1)).collect();
        assert_eq!(SquarePacker.layout(&boxes), SquarePacker.layout(&boxes));
    }

    #[test]
    fn test_zero_sized_box_does_not_grow_canvas() {
        let boxes = vec![Size::new(10, 10), Size::new(0, 5)];
        let points = SquarePacker.layout(&boxes);
        assert_eq!(extent(&points, &boxes), Size::new(10, 10));
    }

    #[test]
    fn test_squareness_prefers_closer_to_square() {
        use std::cmp::Ordering;
        assert_eq!(
            squareness_cmp(Size::new(100, 100), Size::new(150, 50)),
            Ordering::Less
        );
        assert_eq!(
            squareness_cmp(Size::new(20, 10), Size::new(10, 20)),
            Ordering::Equal
        );
    }
}
