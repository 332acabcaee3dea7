use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;
use std::sync::LazyLock;

use crate::constants::SIZE_LABEL_PATTERN;

static SIZE_LABEL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(SIZE_LABEL_PATTERN).unwrap_or_else(|e| panic!("invalid size label pattern: {e}"))
});

/// Target dimensions of a derivative, written `WIDTHxHEIGHT`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct SizeLabel {
    pub width: u32,
    pub height: u32,
}

impl SizeLabel {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Whether a directory name has the shape of a size label.
    ///
    /// This is the only test the catalog applies; it does not require the
    /// numbers to fit in `u32` or to be non-zero.
    pub fn matches_dir_name(name: &str) -> bool {
        SIZE_LABEL_RE.is_match(name)
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Parse a comma separated list such as `500x400,400x300`, keeping order.
    pub fn parse_list(s: &str) -> Result<Vec<Self>, String> {
        s.split(',')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(Self::from_str)
            .collect()
    }
}

impl FromStr for SizeLabel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if !Self::matches_dir_name(s) {
            return Err(format!("Invalid size label '{}'. Expected: WIDTHxHEIGHT", s));
        }

        let (width, height) = s
            .split_once('x')
            .ok_or_else(|| format!("Invalid size label '{}'", s))?;
        let width = width
            .parse::<u32>()
            .map_err(|_| format!("Invalid width in size label '{}'", s))?;
        let height = height
            .parse::<u32>()
            .map_err(|_| format!("Invalid height in size label '{}'", s))?;

        Ok(SizeLabel { width, height })
    }
}

impl Display for SizeLabel {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}x{}", self.width, self.height)
    }
}

impl From<SizeLabel> for String {
    fn from(label: SizeLabel) -> Self {
        label.to_string()
    }
}

impl TryFrom<String> for SizeLabel {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_size_label() {
        let label: SizeLabel = "500x400".parse().unwrap();
        assert_eq!(label, SizeLabel::new(500, 400));
        assert_eq!(label.to_string(), "500x400");

        assert!("500x".parse::<SizeLabel>().is_err());
        assert!("x400".parse::<SizeLabel>().is_err());
        assert!("500X400".parse::<SizeLabel>().is_err());
        assert!(" 500x400".parse::<SizeLabel>().is_err());
        assert!("99999999999x1".parse::<SizeLabel>().is_err());
    }

    #[test]
    fn test_matches_dir_name() {
        assert!(SizeLabel::matches_dir_name("400x300"));
        assert!(SizeLabel::matches_dir_name("0x0"));
        assert!(!SizeLabel::matches_dir_name("thumbs"));
        assert!(!SizeLabel::matches_dir_name("400x300x2"));
        assert!(!SizeLabel::matches_dir_name("400x300.bak"));
        // only ASCII digits
        assert!(!SizeLabel::matches_dir_name("٥x٥"));
        assert!(!SizeLabel::matches_dir_name("４００x３００"));
    }

    #[test]
    fn test_parse_list_keeps_order() {
        let labels = SizeLabel::parse_list("500x400, 400x300,,").unwrap();
        assert_eq!(labels, vec![SizeLabel::new(500, 400), SizeLabel::new(400, 300)]);
        assert!(SizeLabel::parse_list("500x400,big").is_err());
    }

    #[test]
    fn test_serde_as_string() {
        let json = serde_json::to_string(&SizeLabel::new(64, 32)).unwrap();
        assert_eq!(json, "\"64x32\"");
        let back: SizeLabel = serde_json::from_str(&json).unwrap();
        assert_eq!(back, SizeLabel::new(64, 32));
    }
}
