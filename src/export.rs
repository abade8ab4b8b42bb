use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::sync::Once;

use anyhow::{anyhow, Context, Result};
use image::imageops::{self, FilterType};
use image::{DynamicImage, ImageFormat, RgbImage};
use plotters::prelude::*;
use plotters::style::register_font;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use serde::{Deserialize, Serialize};

use crate::color;
use crate::figure::Figure;

// ---------------------------------------------------------------------------
// Render options
// ---------------------------------------------------------------------------

/// Pixel geometry of an exported figure.
#[derive(Debug, Clone, Copy)]
pub struct RenderOptions {
    pub cell_width: u32,
    pub cell_height: u32,
    /// Space reserved above each raster for its caption.
    pub caption_band: u32,
    /// Space reserved at the top of the canvas for the heading.
    pub heading_band: u32,
}

impl Default for RenderOptions {
    fn default() -> Self {
        // 4:5 cells, one per 4x5 inch subplot at 80 dpi
        Self {
            cell_width: 320,
            cell_height: 400,
            caption_band: 28,
            heading_band: 36,
        }
    }
}

// ---------------------------------------------------------------------------
// Manifest – layout description written next to the PNG
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PanelEntry {
    pub file_name: String,
    pub caption: String,
    pub row: usize,
    pub col: usize,
    /// Caption band of the cell.
    pub caption_rect: Rect,
    /// Where the scaled raster was drawn.
    pub image_rect: Rect,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    pub heading: String,
    pub width: u32,
    pub height: u32,
    pub rows: usize,
    pub cols: usize,
    pub blank_panels: usize,
    pub panels: Vec<PanelEntry>,
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

/// Rasterise a figure onto one canvas and describe where everything went.
pub fn render(figure: &Figure, opts: &RenderOptions) -> Result<(RgbImage, Manifest)> {
    let layout = figure.layout;
    let width = layout.cols as u32 * opts.cell_width;
    let height = opts.heading_band + layout.rows as u32 * opts.cell_height;

    let mut canvas = RgbImage::from_pixel(width, height, color::to_rgb(color::BACKGROUND));
    let mut panels = Vec::with_capacity(figure.panels.len());

    for panel in &figure.panels {
        let cell_x = panel.col as u32 * opts.cell_width;
        let cell_y = opts.heading_band + panel.row as u32 * opts.cell_height;
        let caption_rect = Rect {
            x: cell_x,
            y: cell_y,
            width: opts.cell_width,
            height: opts.caption_band,
        };

        let avail_w = opts.cell_width;
        let avail_h = opts.cell_height.saturating_sub(opts.caption_band);
        let image_rect = match fit(panel.raster.dimensions(), (avail_w, avail_h)) {
            Some((w, h)) => {
                let x = cell_x + (avail_w - w) / 2;
                let y = cell_y + opts.caption_band + (avail_h - h) / 2;
                let scaled = imageops::resize(&panel.raster, w, h, FilterType::Triangle);
                let rgb = DynamicImage::ImageLuma8(scaled).into_rgb8();
                imageops::replace(&mut canvas, &rgb, i64::from(x), i64::from(y));
                Rect { x, y, width: w, height: h }
            }
            None => Rect {
                x: cell_x,
                y: cell_y + opts.caption_band,
                width: 0,
                height: 0,
            },
        };

        panels.push(PanelEntry {
            file_name: panel.file_name.clone(),
            caption: panel.caption.clone(),
            row: panel.row,
            col: panel.col,
            caption_rect,
            image_rect,
        });
    }

    let manifest = Manifest {
        heading: figure.heading.clone(),
        width,
        height,
        rows: layout.rows,
        cols: layout.cols,
        blank_panels: layout.blank_panels(),
        panels,
    };
    draw_text_layer(&mut canvas, figure, opts)?;
    Ok((canvas, manifest))
}

static FONTS: Once = Once::new();

/// Make the egui sans-serif face available to plotters' text renderer.
fn register_fonts() {
    FONTS.call_once(|| {
        for style in [FontStyle::Normal, FontStyle::Bold] {
            if register_font("sans-serif", style, epaint_default_fonts::UBUNTU_LIGHT).is_err() {
                log::warn!("could not register figure font; exported text will be missing");
            }
        }
    });
}

/// Draw the heading and every panel caption, centred in their bands.
fn draw_text_layer(canvas: &mut RgbImage, figure: &Figure, opts: &RenderOptions) -> Result<()> {
    register_fonts();

    let (width, height) = canvas.dimensions();
    let centred = Pos::new(HPos::Center, VPos::Center);
    let font = |size: f32| FontDesc::new(FontFamily::SansSerif, f64::from(size), FontStyle::Bold);
    let heading_style = font(color::HEADING_SIZE)
        .color(&color::to_plotters(color::HEADING))
        .pos(centred);
    let caption_style = font(color::CAPTION_SIZE)
        .color(&color::to_plotters(color::CAPTION))
        .pos(centred);

    let root = BitMapBackend::with_buffer(&mut **canvas, (width, height)).into_drawing_area();
    let (heading_area, grid_area) = root.split_vertically(opts.heading_band as i32);

    heading_area
        .draw_text(
            &figure.heading,
            &heading_style,
            ((width / 2) as i32, (opts.heading_band / 2) as i32),
        )
        .map_err(|e| anyhow!("drawing heading: {e}"))?;

    let cells = grid_area.split_evenly((figure.layout.rows, figure.layout.cols));
    for panel in &figure.panels {
        let cell = &cells[panel.row * figure.layout.cols + panel.col];
        cell.draw_text(
            &panel.caption,
            &caption_style,
            ((opts.cell_width / 2) as i32, (opts.caption_band / 2) as i32),
        )
        .map_err(|e| anyhow!("drawing caption of {}: {e}", panel.file_name))?;
    }

    root.present().map_err(|e| anyhow!("finishing figure text: {e}"))?;
    Ok(())
}

/// Largest size with the source aspect ratio that fits `avail`.
fn fit((w, h): (u32, u32), (avail_w, avail_h): (u32, u32)) -> Option<(u32, u32)> {
    if w == 0 || h == 0 || avail_w == 0 || avail_h == 0 {
        return None;
    }
    let scale = f64::min(
        f64::from(avail_w) / f64::from(w),
        f64::from(avail_h) / f64::from(h),
    );
    let fw = ((f64::from(w) * scale).round() as u32).clamp(1, avail_w);
    let fh = ((f64::from(h) * scale).round() as u32).clamp(1, avail_h);
    Some((fw, fh))
}

pub fn encode_png(canvas: &RgbImage) -> Result<Vec<u8>> {
    let mut buf = Cursor::new(Vec::new());
    canvas
        .write_to(&mut buf, ImageFormat::Png)
        .context("encoding PNG")?;
    Ok(buf.into_inner())
}

/// Path of the JSON manifest belonging to a PNG.
pub fn manifest_path(png: &Path) -> PathBuf {
    png.with_extension("json")
}

/// Write `<png>` and its `<png stem>.json` manifest. Returns the manifest path.
pub fn write_export(figure: &Figure, opts: &RenderOptions, png: &Path) -> Result<PathBuf> {
    let (canvas, manifest) = render(figure, opts)?;

    let bytes = encode_png(&canvas)?;
    std::fs::write(png, bytes).with_context(|| format!("writing {}", png.display()))?;

    let json_path = manifest_path(png);
    let json = serde_json::to_string_pretty(&manifest).context("serialising manifest")?;
    std::fs::write(&json_path, json)
        .with_context(|| format!("writing {}", json_path.display()))?;

    log::info!(
        "Exported {} panels to {} ({}x{})",
        manifest.panels.len(),
        png.display(),
        manifest.width,
        manifest.height
    );
    Ok(json_path)
}
