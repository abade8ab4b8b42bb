use std::fmt;
use std::str::FromStr;

use ndarray::ArrayD;
use thiserror::Error;

// ---------------------------------------------------------------------------
// Probe – the injected tracer, selected once at the boundary
// ---------------------------------------------------------------------------

/// Metabolic tracer compound. Encoded as a numeric prefix in every filename.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Probe {
    /// 3FDG, filenames start with `712`.
    P1,
    /// 3FDGal, filenames start with `711`.
    P2,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProbeError {
    #[error("unknown probe '{0}' (expected p1 or p2)")]
    Unknown(String),
}

impl Probe {
    pub const ALL: [Probe; 2] = [Probe::P1, Probe::P2];

    /// Filename prefix identifying this probe's images.
    pub fn prefix(self) -> &'static str {
        match self {
            Probe::P1 => "712",
            Probe::P2 => "711",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Probe::P1 => "p1",
            Probe::P2 => "p2",
        }
    }

    pub fn upper_label(self) -> &'static str {
        match self {
            Probe::P1 => "P1",
            Probe::P2 => "P2",
        }
    }

    /// Tracer compound name, for tooltips.
    pub fn compound(self) -> &'static str {
        match self {
            Probe::P1 => "3FDG",
            Probe::P2 => "3FDGal",
        }
    }
}

impl fmt::Display for Probe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Probe {
    type Err = ProbeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "p1" => Ok(Probe::P1),
            "p2" => Ok(Probe::P2),
            _ => Err(ProbeError::Unknown(s.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// FilenameFields – `<probe>_<unused>_<time>_<metabolite>.tif`
// ---------------------------------------------------------------------------

pub const TIF_EXTENSION: &str = ".tif";

/// Timepoint and metabolite codes of an image filename.
/// The probe code and second segment carry nothing displayed; segments beyond
/// the fourth are ignored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilenameFields<'a> {
    pub time_code: &'a str,
    pub metabolite_code: &'a str,
}

impl<'a> FilenameFields<'a> {
    /// Split an extension-free stem. `None` when fewer than four segments.
    pub fn parse(stem: &'a str) -> Option<Self> {
        let mut parts = stem.split('_').skip(2);
        let time_code = parts.next()?;
        let metabolite_code = parts.next()?;
        Some(FilenameFields {
            time_code,
            metabolite_code,
        })
    }
}

// ---------------------------------------------------------------------------
// ImageCollection – the loaded images, in directory order
// ---------------------------------------------------------------------------

/// Decoded pixels: `[height, width]` or `[height, width, channels]`.
pub type PixelArray = ArrayD<f32>;

#[derive(Debug, Clone)]
pub struct ImageRecord {
    pub file_name: String,
    pub pixels: PixelArray,
}

/// Filename → pixel array, kept in insertion (directory listing) order.
#[derive(Debug, Clone, Default)]
pub struct ImageCollection {
    records: Vec<ImageRecord>,
}

impl ImageCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a record. A record with the same name is replaced in place.
    pub fn insert(&mut self, file_name: String, pixels: PixelArray) {
        match self.records.iter_mut().find(|r| r.file_name == file_name) {
            Some(existing) => existing.pixels = pixels,
            None => self.records.push(ImageRecord { file_name, pixels }),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &ImageRecord> {
        self.records.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.records.iter().map(|r| r.file_name.as_str())
    }

    /// Keep only the named records, preserving order.
    pub fn retain_names(&self, names: &[&str]) -> ImageCollection {
        ImageCollection {
            records: self
                .records
                .iter()
                .filter(|r| names.contains(&r.file_name.as_str()))
                .cloned()
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::IxDyn;

    #[test]
    fn probe_parses_case_insensitively() {
        assert_eq!("p1".parse::<Probe>(), Ok(Probe::P1));
        assert_eq!(" P2 ".parse::<Probe>(), Ok(Probe::P2));
    }

    #[test]
    fn unknown_probe_is_rejected() {
        assert_eq!(
            "p3".parse::<Probe>(),
            Err(ProbeError::Unknown("p3".to_string()))
        );
    }

    #[test]
    fn probe_prefixes() {
        assert_eq!(Probe::P1.prefix(), "712");
        assert_eq!(Probe::P2.prefix(), "711");
        assert_eq!(Probe::P2.upper_label(), "P2");
    }

    #[test]
    fn filename_fields_need_four_segments() {
        assert!(FilenameFields::parse("712_x_t1").is_none());
        assert!(FilenameFields::parse("712").is_none());
        let fields = FilenameFields::parse("712_x_t1_m3_extra").unwrap();
        assert_eq!(fields.time_code, "t1");
        assert_eq!(fields.metabolite_code, "m3");
    }

    #[test]
    fn collection_keeps_insertion_order() {
        let mut c = ImageCollection::new();
        c.insert("b".into(), PixelArray::zeros(IxDyn(&[1, 1])));
        c.insert("a".into(), PixelArray::zeros(IxDyn(&[2, 3])));
        c.insert("b".into(), PixelArray::zeros(IxDyn(&[4, 4])));
        assert_eq!(c.names().collect::<Vec<_>>(), vec!["b", "a"]);
        let b = c.iter().find(|r| r.file_name == "b").unwrap();
        assert_eq!(b.pixels.shape(), &[4, 4]);
        assert_eq!(c.len(), 2);
    }
}
