use std::path::PathBuf;

use anyhow::{Context, Result};
use image::{ImageBuffer, ImageFormat, Luma};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Normal};

const WIDTH: u32 = 96;
const HEIGHT: u32 = 120;
const BACKGROUND: f64 = 400.0;
const NOISE_STD: f64 = 60.0;

/// Separable bump centred on `centre`, wider along y than x.
fn blob(x: f64, y: f64, centre: (f64, f64), peak: f64) -> f64 {
    let dx = (x - centre.0) / 14.0;
    let dy = (y - centre.1) / 18.0;
    peak * (-0.5 * (dx * dx + dy * dy)).exp()
}

/// One synthetic slice: a bright blob whose intensity grows with time,
/// on a noisy background.
fn generate_slice(
    peak: f64,
    centre: (f64, f64),
    noise: &Normal<f64>,
    rng: &mut StdRng,
) -> Vec<u16> {
    (0..HEIGHT)
        .flat_map(|y| (0..WIDTH).map(move |x| (x as f64, y as f64)))
        .map(|(x, y)| {
            let value = BACKGROUND + blob(x, y, centre, peak) + noise.sample(&mut *rng);
            value.clamp(0.0, u16::MAX as f64) as u16
        })
        .collect()
}

fn write_tiff(path: &std::path::Path, pixels: Vec<u16>) -> Result<()> {
    let img: ImageBuffer<Luma<u16>, Vec<u16>> = ImageBuffer::from_raw(WIDTH, HEIGHT, pixels)
        .context("slice buffer has the wrong length")?;
    img.save_with_format(path, ImageFormat::Tiff)
        .with_context(|| format!("writing {}", path.display()))
}

fn main() -> Result<()> {
    let out_dir = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("sample_images"));
    std::fs::create_dir_all(&out_dir)
        .with_context(|| format!("creating {}", out_dir.display()))?;

    let mut rng = StdRng::seed_from_u64(42);
    let noise = Normal::new(0.0, NOISE_STD).context("invalid noise distribution")?;

    // (prefix, subject id)
    let probes = [("712", "r07"), ("711", "r12")];
    let timepoints = [("t1", 1.0), ("t2", 2.0), ("t3", 3.0)];
    // metabolite code and where its signal peaks
    let metabolites = [("m1", (48.0, 40.0)), ("m3", (30.0, 80.0)), ("m4", (66.0, 80.0))];

    let mut written = 0;
    for (prefix, subject) in &probes {
        for (time_code, hours) in &timepoints {
            for (metabolite_code, centre) in &metabolites {
                let name = format!("{prefix}_{subject}_{time_code}_{metabolite_code}.tif");
                let slice = generate_slice(1500.0 * hours, *centre, &noise, &mut rng);
                write_tiff(&out_dir.join(&name), slice)?;
                written += 1;
            }
        }
    }

    // Files the viewer must ignore
    let decoy = generate_slice(0.0, (0.0, 0.0), &noise, &mut rng);
    write_tiff(&out_dir.join("713_r01_t1_m1.tif"), decoy.clone())?;
    write_tiff(&out_dir.join("712_r07_t1_m1.tif.bak"), decoy)?;
    std::fs::write(out_dir.join("712_readme.txt"), "acquisition notes\n")
        .context("writing decoy text file")?;

    println!(
        "Wrote {written} slices ({WIDTH}x{HEIGHT}, 16-bit) plus 3 decoys to {}",
        out_dir.display()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_gives_same_slice() {
        let noise = Normal::new(0.0, NOISE_STD).unwrap();
        let a = generate_slice(3000.0, (48.0, 40.0), &noise, &mut StdRng::seed_from_u64(42));
        let b = generate_slice(3000.0, (48.0, 40.0), &noise, &mut StdRng::seed_from_u64(42));
        assert_eq!(a.len(), (WIDTH * HEIGHT) as usize);
        assert_eq!(a, b);
    }

    #[test]
    fn blob_peaks_at_centre() {
        let noise = Normal::new(0.0, NOISE_STD).unwrap();
        let slice = generate_slice(4500.0, (48.0, 40.0), &noise, &mut StdRng::seed_from_u64(7));
        let at = |x: u32, y: u32| slice[(y * WIDTH + x) as usize];
        assert!(at(48, 40) > 4000);
        assert!(at(2, 115) < 1000);
    }
}
