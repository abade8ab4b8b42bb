use image::GrayImage;
use ndarray::{Axis, Ix2, Slice};

use crate::data::model::{ImageCollection, PixelArray, Probe};
use crate::title::format_title;

/// At most this many panels per row.
pub const MAX_COLUMNS: usize = 3;

// ---------------------------------------------------------------------------
// Grid layout
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridLayout {
    pub rows: usize,
    pub cols: usize,
    pub count: usize,
}

impl GridLayout {
    /// `None` for zero images.
    pub fn for_count(count: usize) -> Option<Self> {
        if count == 0 {
            return None;
        }
        let cols = count.min(MAX_COLUMNS);
        let rows = count.div_ceil(cols);
        Some(GridLayout { rows, cols, count })
    }

    pub fn cells(&self) -> usize {
        self.rows * self.cols
    }

    /// Cells left hidden after the last image.
    pub fn blank_panels(&self) -> usize {
        self.cells() - self.count
    }

    /// Row-major `(row, col)` of the `index`-th panel.
    pub fn cell(&self, index: usize) -> (usize, usize) {
        (index / self.cols, index % self.cols)
    }
}

// ---------------------------------------------------------------------------
// Figure
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct Panel {
    pub file_name: String,
    pub caption: String,
    pub row: usize,
    pub col: usize,
    pub raster: GrayImage,
}

/// A composed, renderer-independent figure: heading plus captioned panels.
#[derive(Debug, Clone)]
pub struct Figure {
    pub heading: String,
    pub layout: GridLayout,
    pub panels: Vec<Panel>,
}

pub fn heading_for(probe: Probe) -> String {
    format!("MRI Images - {} Probe", probe.upper_label())
}

/// Lay out every image of the collection, in collection order.
///
/// Returns `None` (after a warning) when there is nothing to show.
pub fn compose(images: &ImageCollection, probe: Probe) -> Option<Figure> {
    let Some(layout) = GridLayout::for_count(images.len()) else {
        log::warn!("No images to display.");
        return None;
    };

    let panels = images
        .iter()
        .enumerate()
        .map(|(i, record)| {
            let (row, col) = layout.cell(i);
            Panel {
                file_name: record.file_name.clone(),
                caption: format_title(&record.file_name, probe),
                row,
                col,
                raster: to_grayscale(&record.pixels),
            }
        })
        .collect();

    Some(Figure {
        heading: heading_for(probe),
        layout,
        panels,
    })
}

// ---------------------------------------------------------------------------
// Grayscale raster
// ---------------------------------------------------------------------------

/// Reduce channels to luminance (mean of RGB) and stretch min..max onto
/// 0..=255.
///
/// Constant images (including all-NaN) come out black.
pub fn to_grayscale(pixels: &PixelArray) -> GrayImage {
    let luminance = match pixels.ndim() {
        2 => pixels.clone(),
        n if n >= 3 => {
            // grey+alpha keeps only grey; colour drops alpha
            let channels: usize = if pixels.len_of(Axis(2)) >= 3 { 3 } else { 1 };
            let colour = pixels.slice_axis(Axis(2), Slice::from(0..channels));
            colour
                .mean_axis(Axis(2))
                .unwrap_or_else(|| pixels.index_axis(Axis(2), 0).to_owned())
        }
        _ => return GrayImage::new(0, 0),
    };

    let Ok(luminance) = luminance.into_dimensionality::<Ix2>() else {
        return GrayImage::new(0, 0);
    };
    let (height, width) = luminance.dim();

    let (min, max) = luminance
        .iter()
        .filter(|v| v.is_finite())
        .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        });
    let range = max - min;

    GrayImage::from_fn(width as u32, height as u32, |x, y| {
        let v = luminance[[y as usize, x as usize]];
        let scaled = if range > 0.0 && v.is_finite() {
            ((v - min) / range * 255.0).round().clamp(0.0, 255.0) as u8
        } else {
            0
        };
        image::Luma([scaled])
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{Array2, Array3};

    #[test]
    fn grid_shapes() {
        let shape = |n| {
            let g = GridLayout::for_count(n).unwrap();
            (g.rows, g.cols, g.blank_panels())
        };
        assert_eq!(shape(1), (1, 1, 0));
        assert_eq!(shape(2), (1, 2, 0));
        assert_eq!(shape(3), (1, 3, 0));
        assert_eq!(shape(4), (2, 3, 2));
        assert_eq!(shape(7), (3, 3, 2));
        assert_eq!(shape(9), (3, 3, 0));
    }

    #[test]
    fn no_layout_for_zero_images() {
        assert!(GridLayout::for_count(0).is_none());
    }

    #[test]
    fn cells_are_row_major() {
        let g = GridLayout::for_count(5).unwrap();
        assert_eq!(g.cell(0), (0, 0));
        assert_eq!(g.cell(2), (0, 2));
        assert_eq!(g.cell(3), (1, 0));
    }

    #[test]
    fn compose_empty_collection_warns_and_yields_nothing() {
        testing_logger::setup();
        assert!(compose(&ImageCollection::new(), Probe::P1).is_none());
        testing_logger::validate(|logs| {
            assert_eq!(logs.len(), 1);
            assert_eq!(logs[0].level, log::Level::Warn);
            assert_eq!(logs[0].body, "No images to display.");
        });
    }

    #[test]
    fn compose_captions_and_heading() {
        let mut images = ImageCollection::new();
        for name in ["711_a_t1_m1.tif", "711_a_t2_m4.tif", "711odd.tif", "711_a_t3_m3.tif"] {
            images.insert(name.to_string(), Array2::<f32>::zeros((2, 2)).into_dyn());
        }
        let fig = compose(&images, Probe::P2).unwrap();

        assert_eq!(fig.heading, "MRI Images - P2 Probe");
        assert_eq!((fig.layout.rows, fig.layout.cols), (2, 3));
        let captions: Vec<_> = fig.panels.iter().map(|p| p.caption.as_str()).collect();
        assert_eq!(
            captions,
            vec![
                "3FDGalactose - 1 hr",
                "3FDGalactitol - 2 hrs",
                "711odd.tif",
                "3FDGalactonic Acid - 3 hrs"
            ]
        );
        assert_eq!((fig.panels[3].row, fig.panels[3].col), (1, 0));
    }

    #[test]
    fn grayscale_stretches_range() {
        let px = Array2::from_shape_vec((1, 3), vec![100.0f32, 150.0, 200.0])
            .unwrap()
            .into_dyn();
        let g = to_grayscale(&px);
        assert_eq!(g.dimensions(), (3, 1));
        assert_eq!(g.get_pixel(0, 0)[0], 0);
        assert_eq!(g.get_pixel(1, 0)[0], 128);
        assert_eq!(g.get_pixel(2, 0)[0], 255);
    }

    #[test]
    fn constant_image_is_black() {
        let px = Array2::from_elem((2, 2), 7.0f32).into_dyn();
        let g = to_grayscale(&px);
        assert!(g.pixels().all(|p| p[0] == 0));
    }

    #[test]
    fn colour_image_uses_luminance() {
        let mut px = Array3::<f32>::zeros((1, 2, 4));
        px[[0, 1, 0]] = 30.0;
        px[[0, 1, 1]] = 30.0;
        px[[0, 1, 2]] = 30.0;
        // alpha is ignored
        px[[0, 0, 3]] = 255.0;
        let g = to_grayscale(&px.into_dyn());
        assert_eq!(g.get_pixel(0, 0)[0], 0);
        assert_eq!(g.get_pixel(1, 0)[0], 255);
    }
}
