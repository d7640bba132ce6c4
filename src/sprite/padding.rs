use serde::Serialize;

/// Padding around an asset in source pixels, CSS order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Padding {
    pub top: u32,
    pub right: u32,
    pub bottom: u32,
    pub left: u32,
}

impl Padding {
    pub fn new(top: u32, right: u32, bottom: u32, left: u32) -> Self {
        Self {
            top,
            right,
            bottom,
            left,
        }
    }

    pub fn uniform(value: u32) -> Self {
        Self::new(value, value, value, value)
    }

    /// Expand 1 to 4 values using the CSS shorthand rules.
    ///
    /// Returns `None` for an empty list or more than four values so the caller
    /// can fall back to its default.
    pub fn expand(values: &[u32]) -> Option<Self> {
        match *values {
            [a] => Some(Self::uniform(a)),
            [a, b] => Some(Self::new(a, b, a, b)),
            [a, b, c] => Some(Self::new(a, b, c, b)),
            [a, b, c, d] => Some(Self::new(a, b, c, d)),
            _ => None,
        }
    }

    /// Parse a filename padding token such as `20`, `1-2` or `1-2-3-4`.
    pub fn parse_token(token: &str) -> Option<Self> {
        let values = parse_token_values(token)?;
        Self::expand(&values)
    }

    /// Parse a settings value such as `10`, `10px 5px` or `1 2 3 4`.
    ///
    /// An empty declaration means no padding. Non-numeric parts are rejected.
    pub fn parse_declaration(value: &str) -> Option<Self> {
        let values: Option<Vec<u32>> = value
            .replace("px", "")
            .split_whitespace()
            .map(|part| part.parse::<u32>().ok())
            .collect();
        let values = values?;

        if values.is_empty() {
            return Some(Self::default());
        }
        Self::expand(&values)
    }

    pub fn horizontal(&self) -> u32 {
        self.left + self.right
    }

    pub fn vertical(&self) -> u32 {
        self.top + self.bottom
    }
}

/// Split a `1-2-3` style token into its values, rejecting anything that is
/// not one to four dash-separated non-negative integers.
pub(crate) fn parse_token_values(token: &str) -> Option<Vec<u32>> {
    if token.is_empty() {
        return None;
    }

    let parts: Vec<&str> = token.split('-').collect();
    if parts.len() > 4 {
        return None;
    }

    parts
        .iter()
        .map(|part| {
            if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
                None
            } else {
                part.parse::<u32>().ok()
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand_rules() {
        assert_eq!(Padding::expand(&[5]), Some(Padding::new(5, 5, 5, 5)));
        assert_eq!(Padding::expand(&[1, 2]), Some(Padding::new(1, 2, 1, 2)));
        assert_eq!(Padding::expand(&[1, 2, 3]), Some(Padding::new(1, 2, 3, 2)));
        assert_eq!(
            Padding::expand(&[1, 2, 3, 4]),
            Some(Padding::new(1, 2, 3, 4))
        );
        assert_eq!(Padding::expand(&[]), None);
        assert_eq!(Padding::expand(&[1, 2, 3, 4, 5]), None);
    }

    #[test]
    fn test_parse_token() {
        assert_eq!(Padding::parse_token("20"), Some(Padding::uniform(20)));
        assert_eq!(
            Padding::parse_token("1-2-3"),
            Some(Padding::new(1, 2, 3, 2))
        );
        assert_eq!(Padding::parse_token("1--2"), None);
        assert_eq!(Padding::parse_token("1-2-"), None);
        assert_eq!(Padding::parse_token("hover"), None);
        assert_eq!(Padding::parse_token("1-2-3-4-5"), None);
        assert_eq!(Padding::parse_token(""), None);
    }

    #[test]
    fn test_parse_declaration() {
        assert_eq!(Padding::parse_declaration("10"), Some(Padding::uniform(10)));
        assert_eq!(
            Padding::parse_declaration("10px 5px"),
            Some(Padding::new(10, 5, 10, 5))
        );
        assert_eq!(Padding::parse_declaration(""), Some(Padding::default()));
        assert_eq!(Padding::parse_declaration("ten"), None);
    }

    #[test]
    fn test_horizontal_and_vertical() {
        let padding = Padding::new(1, 2, 3, 4);
        assert_eq!(padding.horizontal(), 6);
        assert_eq!(padding.vertical(), 4);
    }
}
