use crate::error::OutputError;
use crate::renderer::{to_rgb8, Framebuffer};
use crossterm::style::{self, Stylize};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

// ─── PPM Export ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum PpmFormat {
    /// P3: whitespace-separated decimal triplets, one pixel per line.
    #[default]
    Ascii,
    /// P6: raw RGB bytes after the header.
    Binary,
}

impl PpmFormat {
    fn magic(self) -> &'static str {
        match self {
            PpmFormat::Ascii => "P3",
            PpmFormat::Binary => "P6",
        }
    }
}

impl Framebuffer {
    /// Writes the image top row first, 8 bits per channel.
    pub fn write_ppm<W: Write>(&self, writer: W, format: PpmFormat) -> Result<(), OutputError> {
        let mut out = BufWriter::new(writer);
        write!(out, "{}\n{} {}\n255\n", format.magic(), self.width, self.height)?;
        for pixel in &self.pixels {
            let [r, g, b] = to_rgb8(*pixel);
            match format {
                PpmFormat::Ascii => writeln!(out, "{r} {g} {b}")?,
                PpmFormat::Binary => out.write_all(&[r, g, b])?,
            }
        }
        out.flush()?;
        Ok(())
    }

    pub fn save(&self, path: impl AsRef<Path>, format: PpmFormat) -> Result<(), OutputError> {
        let path = path.as_ref();
        let io_error = |source| OutputError::Io {
            path: path.to_path_buf(),
            source,
        };
        let file = File::create(path).map_err(io_error)?;
        self.write_ppm(file, format).map_err(|e| match e {
            OutputError::Stream(source) => io_error(source),
            other => other,
        })
    }
}

// ─── Terminal Preview ───────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum PreviewMode {
    /// One full block per pixel.
    #[value(name = "truecolor")]
    TrueColor,
    /// Upper half block over a background color: two pixel rows per line.
    #[value(name = "halfblock")]
    HalfBlock,
}

/// Draws the framebuffer to stdout with 24-bit color escapes.
pub fn display_preview(fb: &Framebuffer, mode: PreviewMode) -> Result<(), OutputError> {
    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    write_preview(&mut out, fb, mode)?;
    out.flush()?;
    Ok(())
}

fn rgb(color: crate::math::Color) -> style::Color {
    let [r, g, b] = to_rgb8(color);
    style::Color::Rgb { r, g, b }
}

fn write_preview(out: &mut impl Write, fb: &Framebuffer, mode: PreviewMode) -> io::Result<()> {
    match mode {
        PreviewMode::TrueColor => {
            for y in 0..fb.height {
                for &pixel in fb.row(y) {
                    write!(out, "{}", "█".with(rgb(pixel)))?;
                }
                writeln!(out)?;
            }
        }
        PreviewMode::HalfBlock => {
            // An odd last row is drawn over a black background.
            for y in (0..fb.height).step_by(2) {
                for x in 0..fb.width {
                    let top = fb.get(x, y);
                    let bottom = if y + 1 < fb.height {
                        fb.get(x, y + 1)
                    } else {
                        crate::math::Color::ZERO
                    };
                    write!(out, "{}", "▀".with(rgb(top)).on(rgb(bottom)))?;
                }
                writeln!(out)?;
            }
        }
    }
    Ok(())
}
