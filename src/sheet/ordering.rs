use std::cmp;
use std::fmt;
use std::str::FromStr;

use crate::error::GlueError;
use crate::sprite::Asset;

/// Measure used to rank assets before packing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OrderingKey {
    /// Longer side of the padded box
    #[default]
    MaxSide,
    /// Padded width
    Width,
    /// Padded height
    Height,
    /// Padded area
    Area,
}

impl OrderingKey {
    pub const ALL: [OrderingKey; 4] = [
        OrderingKey::MaxSide,
        OrderingKey::Width,
        OrderingKey::Height,
        OrderingKey::Area,
    ];

    pub fn name(self) -> &'static str {
        match self {
            OrderingKey::MaxSide => "maxside",
            OrderingKey::Width => "width",
            OrderingKey::Height => "height",
            OrderingKey::Area => "area",
        }
    }

    /// Rank value for a padded box
    pub fn measure(self, width: u32, height: u32) -> u64 {
        let (w, h) = (u64::from(width), u64::from(height));
        match self {
            OrderingKey::MaxSide => w.max(h),
            OrderingKey::Width => w,
            OrderingKey::Height => h,
            OrderingKey::Area => w * h,
        }
    }
}

/// Total order over assets: largest first, or smallest first when negated
/// with a leading `-`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SpriteOrdering {
    pub key: OrderingKey,
    pub ascending: bool,
}

impl SpriteOrdering {
    /// Compare two assets by the configured measure, smallest first
    pub fn compare(&self, a: &Asset, b: &Asset) -> cmp::Ordering {
        self.key
            .measure(a.absolute_width(), a.absolute_height())
            .cmp(&self.key.measure(b.absolute_width(), b.absolute_height()))
    }

    /// Stable sort; ties keep their scan order in both directions.
    pub fn sort(&self, assets: &mut [Asset]) {
        if self.ascending {
            assets.sort_by(|a, b| self.compare(a, b));
        } else {
            assets.sort_by(|a, b| self.compare(b, a));
        }
    }
}

impl FromStr for SpriteOrdering {
    type Err = GlueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let (ascending, name) = match trimmed.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, trimmed),
        };

        OrderingKey::ALL
            .into_iter()
            .find(|k| k.name() == name)
            .map(|key| SpriteOrdering { key, ascending })
            .ok_or_else(|| GlueError::UnknownOrdering(s.to_string()))
    }
}

impl fmt::Display for SpriteOrdering {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.ascending {
            f.write_str("-")?;
        }
        f.write_str(self.key.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SheetConfig;
    use crate::sprite::AssetName;
    use image::RgbaImage;
    use std::path::PathBuf;

    fn assets(sizes: &[(u32, u32)]) -> Vec<Asset> {
        let config = SheetConfig::default();
        sizes
            .iter()
            .enumerate()
            .map(|(i, &(w, h))| {
                let file_name = format!("a{}.png", i);
                let name = AssetName::parse(&file_name, "test", &config);
                Asset::new(
                    PathBuf::from(&file_name),
                    name,
                    RgbaImage::new(w, h),
                    &config,
                    1.0,
                )
            })
            .collect()
    }

    fn order(assets: &[Asset]) -> Vec<String> {
        assets.iter().map(|a| a.name.file_name.clone()).collect()
    }

    #[test]
    fn test_parse() {
        assert_eq!(
            "area".parse::<SpriteOrdering>().unwrap(),
            SpriteOrdering {
                key: OrderingKey::Area,
                ascending: false
            }
        );
        assert_eq!(
            "-width".parse::<SpriteOrdering>().unwrap(),
            SpriteOrdering {
                key: OrderingKey::Width,
                ascending: true
            }
        );
        assert!(matches!(
            "perimeter".parse::<SpriteOrdering>(),
            Err(GlueError::UnknownOrdering(_))
        ));
        assert!("--area".parse::<SpriteOrdering>().is_err());
    }

    #[test]
    fn test_display_round_trips_negation() {
        let ordering: SpriteOrdering = "-maxside".parse().unwrap();
        assert_eq!(ordering.to_string(), "-maxside");
    }

    #[test]
    fn test_area_ties_keep_scan_order() {
        let mut list = assets(&[(10, 100), (50, 50), (100, 10)]);
        "area".parse::<SpriteOrdering>().unwrap().sort(&mut list);
        assert_eq!(order(&list), vec!["a0.png", "a1.png", "a2.png"]);

        "-area".parse::<SpriteOrdering>().unwrap().sort(&mut list);
        assert_eq!(order(&list), vec!["a0.png", "a1.png", "a2.png"]);
    }

    #[test]
    fn test_width_ranking() {
        let list = assets(&[(10, 100), (50, 50), (100, 10)]);
        let width = SpriteOrdering {
            key: OrderingKey::Width,
            ascending: true,
        };
        assert_eq!(width.compare(&list[0], &list[1]), cmp::Ordering::Less);
        assert_eq!(width.compare(&list[1], &list[2]), cmp::Ordering::Less);

        let mut sorted = assets(&[(50, 50), (100, 10), (10, 100)]);
        "width".parse::<SpriteOrdering>().unwrap().sort(&mut sorted);
        assert_eq!(order(&sorted), vec!["a1.png", "a0.png", "a2.png"]);
    }

    #[test]
    fn test_maxside_and_height() {
        let mut list = assets(&[(5, 30), (40, 2), (20, 20)]);
        "maxside".parse::<SpriteOrdering>().unwrap().sort(&mut list);
        assert_eq!(order(&list), vec!["a1.png", "a0.png", "a2.png"]);

        "-height".parse::<SpriteOrdering>().unwrap().sort(&mut list);
        assert_eq!(order(&list), vec!["a1.png", "a2.png", "a0.png"]);
    }
}
