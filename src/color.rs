use eframe::egui::Color32;
use image::Rgb;
use palette::{named, Srgb};
use plotters::style::RGBColor;

// ---------------------------------------------------------------------------
// Figure colours
// ---------------------------------------------------------------------------

/// Colour of per-panel captions.
pub const CAPTION: Srgb<u8> = named::BLUE;
/// Colour of the figure heading.
pub const HEADING: Srgb<u8> = named::DARKRED;
/// Canvas behind the panels.
pub const BACKGROUND: Srgb<u8> = named::WHITE;

pub const CAPTION_SIZE: f32 = 14.0;
pub const HEADING_SIZE: f32 = 16.0;

pub fn to_color32(c: Srgb<u8>) -> Color32 {
    Color32::from_rgb(c.red, c.green, c.blue)
}

pub fn to_rgb(c: Srgb<u8>) -> Rgb<u8> {
    Rgb([c.red, c.green, c.blue])
}

pub fn to_plotters(c: Srgb<u8>) -> RGBColor {
    RGBColor(c.red, c.green, c.blue)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn named_colours_convert() {
        assert_eq!(to_color32(CAPTION), Color32::from_rgb(0, 0, 255));
        assert_eq!(to_rgb(HEADING), Rgb([139, 0, 0]));
        assert_eq!(to_plotters(BACKGROUND), RGBColor(255, 255, 255));
    }
}
