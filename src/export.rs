use std::borrow::Cow;
use std::fs;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::attractor::Attractor;
use crate::error::{Error, Result};
use crate::grid::Grid;

/// Where and how analysis artifacts are written.
#[derive(Debug, Clone)]
pub struct ExportConfig {
    /// Output directory for every generated file.
    pub output_dir: PathBuf,
    /// Pixel scale for GIF output: each cell is rendered as scale×scale pixels.
    pub cell_scale: u32,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("."),
            cell_scale: 1,
        }
    }
}

impl ExportConfig {
    /// Path of `name` inside the output directory, creating the directory if needed.
    pub fn path(&self, name: &str) -> Result<PathBuf> {
        fs::create_dir_all(&self.output_dir).map_err(|source| Error::Io {
            path: self.output_dir.clone(),
            source,
        })?;
        Ok(self.output_dir.join(name))
    }
}

/// X origin and precision of a two-column plot file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlotFormat {
    /// X value of the first point; later points increase by one.
    pub x_start: i64,
    /// Decimals written for real-valued y.
    pub decimals: usize,
}

impl Default for PlotFormat {
    fn default() -> Self {
        Self {
            x_start: 1,
            decimals: 3,
        }
    }
}

/// Create `path` and hand a buffered writer to `write`, tagging I/O errors with the path.
pub fn save<F>(path: &Path, write: F) -> Result<()>
where
    F: FnOnce(&mut BufWriter<fs::File>) -> io::Result<()>,
{
    let tag = |source| Error::Io {
        path: path.to_path_buf(),
        source,
    };
    let file = fs::File::create(path).map_err(tag)?;
    let mut out = BufWriter::new(file);
    write(&mut out).map_err(tag)?;
    out.flush().map_err(tag)
}

// ── PGM ─────────────────────────────────────────────────────────────────────

/// Gray level of `value` mapped linearly from `[min, max]` onto `[0, 255]`.
///
/// `min > max` inverts the ramp. Integer arithmetic truncates toward zero.
pub fn pgm_level(value: i32, min: i32, max: i32) -> u8 {
    if min == max {
        return 0;
    }
    (255 * (value - min) / (max - min)).clamp(0, 255) as u8
}

/// Plain-text (`P2`) grayscale image of `width × height` row-major values.
pub fn write_pgm<W: Write>(
    out: &mut W,
    comment: &str,
    width: usize,
    height: usize,
    pixels: &[u8],
    min: i32,
    max: i32,
) -> io::Result<()> {
    writeln!(out, "P2")?;
    writeln!(out, "# {comment}")?;
    writeln!(out, "{width} {height}")?;
    writeln!(out, "255")?;
    for row in pixels.chunks(width).take(height) {
        for &v in row {
            write!(out, " {}", pgm_level(i32::from(v), min, max))?;
        }
        writeln!(out)?;
    }
    Ok(())
}

/// Space-time diagram of a grid, ghost columns included: live cells black, dead white.
pub fn write_pgm_grid<W: Write>(out: &mut W, comment: &str, grid: &Grid) -> io::Result<()> {
    write_pgm(
        out,
        comment,
        grid.width(),
        grid.height(),
        grid.as_slice(),
        1,
        0,
    )
}

// ── Plots ───────────────────────────────────────────────────────────────────

/// Two-column `x y` plot of integer values.
pub fn write_plot_int<W: Write, T: std::fmt::Display>(
    out: &mut W,
    values: &[T],
    format: PlotFormat,
) -> io::Result<()> {
    for (x, y) in (format.x_start..).zip(values) {
        writeln!(out, "{x} {y}")?;
    }
    Ok(())
}

/// Two-column `x y` plot of real values with fixed decimals.
pub fn write_plot_real<W: Write>(out: &mut W, values: &[f64], format: PlotFormat) -> io::Result<()> {
    for (x, y) in (format.x_start..).zip(values) {
        writeln!(out, "{x} {y:.prec$}", prec = format.decimals)?;
    }
    Ok(())
}

/// Scatter of every `(state, step)` pair visited at least once.
///
/// Plot with gnuplot as `plot [0:states] [-1:steps + 2] "file" pt 7 ps 0.2`.
pub fn write_attractor_plot<W: Write>(out: &mut W, attractor: &Attractor) -> io::Result<()> {
    for (step, row) in attractor.histogram.iter().enumerate() {
        for (state, &count) in row.iter().enumerate() {
            if count != 0 {
                writeln!(out, "{state} {step}")?;
            }
        }
    }
    Ok(())
}

/// One-line report of a Hamming exponent, or why it could not be computed.
pub fn write_hamming_exponent<W: Write>(out: &mut W, exponent: &Result<f64>) -> io::Result<()> {
    match exponent {
        Ok(value) => writeln!(out, "Hamming exponent: {value:.3}"),
        Err(e) => writeln!(out, "Hamming exponent could not be computed ({e})"),
    }
}

// ── GIF ─────────────────────────────────────────────────────────────────────

/// Palette index 0 is black (live), 1 is white (dead), matching the PGM output.
const GIF_PALETTE: [u8; 6] = [0x00, 0x00, 0x00, 0xFF, 0xFF, 0xFF];

/// Single-frame GIF of the space-time diagram, each cell drawn as `scale × scale` pixels.
pub fn write_gif_grid(path: &Path, grid: &Grid, scale: u32) -> Result<()> {
    let scale = scale.max(1) as usize;
    let too_large = || Error::Io {
        path: path.to_path_buf(),
        source: io::Error::new(
            io::ErrorKind::InvalidInput,
            "image exceeds the 65535 pixel GIF limit",
        ),
    };
    let img_width = u16::try_from(grid.width() * scale).map_err(|_| too_large())?;
    let img_height = u16::try_from(grid.height() * scale).map_err(|_| too_large())?;

    let mut pixels = Vec::with_capacity(usize::from(img_width) * usize::from(img_height));
    for step in 0..grid.height() {
        let row = grid.row(step);
        for _ in 0..scale {
            for &cell in row {
                let index = if cell == 1 { 0 } else { 1 };
                pixels.extend(std::iter::repeat(index).take(scale));
            }
        }
    }

    let gif_err = |source| Error::Gif {
        path: path.to_path_buf(),
        source,
    };
    let file = fs::File::create(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let mut encoder =
        gif::Encoder::new(BufWriter::new(file), img_width, img_height, &GIF_PALETTE)
            .map_err(gif_err)?;

    let frame = gif::Frame {
        width: img_width,
        height: img_height,
        buffer: Cow::Owned(pixels),
        ..gif::Frame::default()
    };
    encoder.write_frame(&frame).map_err(gif_err)
}
