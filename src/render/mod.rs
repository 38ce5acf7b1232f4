//! Heatmap rendering
//!
//! Draws an aggregated matrix as a PNG: one square per model pair on a
//! "Blues" ramp, masked cells left as background, model names on both axes
//! and a colour bar on the right. Every image also gets a `.txt` sidecar
//! with the cell values so the numbers survive without the picture.

use std::fmt::Write as FmtWrite;
use std::fs;
use std::path::{Path, PathBuf};

use ab_glyph::{FontVec, PxScale};
use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_text_mut, text_size};
use log::{info, warn};

use crate::aggregate::{AggregatedMatrix, ReportMode, ValueRange};
use crate::error::{CompileError, Result};
use crate::matrix::PairMatrix;

// Layout
const CELL_SIZE: u32 = 72; // pixels per matrix cell
const AXIS_MARGIN: u32 = 80; // room for model names
const COLORBAR_GAP: u32 = 12;
const COLORBAR_WIDTH: u32 = 20;
const COLORBAR_LABEL_WIDTH: u32 = 48;
const PADDING: u32 = 8;

const LABEL_SCALE: f32 = 18.0;
const AXIS_SCALE: f32 = 16.0;

const BACKGROUND: Rgb<u8> = Rgb([255, 255, 255]);
const TEXT_DARK: Rgb<u8> = Rgb([20, 20, 20]);
const TEXT_LIGHT: Rgb<u8> = Rgb([250, 250, 250]);

// Matplotlib "Blues" sampled at five stops
const BLUES: [(f32, [u8; 3]); 5] = [
    (0.0, [247, 251, 255]),
    (0.25, [198, 219, 239]),
    (0.5, [107, 174, 214]),
    (0.75, [33, 113, 181]),
    (1.0, [8, 48, 107]),
];

// Common locations of a sans-serif TrueType font
const FONT_CANDIDATES: [&str; 5] = [
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/Library/Fonts/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

/// Load the label font from `path`, else from the first system font found
pub fn load_font(path: Option<&Path>) -> Option<FontVec> {
    let candidates: Vec<PathBuf> = match path {
        Some(p) => vec![p.to_path_buf()],
        None => FONT_CANDIDATES.iter().map(PathBuf::from).collect(),
    };

    for candidate in &candidates {
        let Ok(bytes) = fs::read(candidate) else {
            continue;
        };
        match FontVec::try_from_vec(bytes) {
            Ok(font) => return Some(font),
            Err(err) => warn!("Ignoring font {}: {}", candidate.display(), err),
        }
    }

    warn!("No usable font found; heatmaps will be drawn without labels");
    None
}

/// Map a normalized value (0-1) onto the Blues ramp
pub fn blues(t: f32) -> Rgb<u8> {
    let t = t.clamp(0.0, 1.0);
    for pair in BLUES.windows(2) {
        let (t0, c0) = pair[0];
        let (t1, c1) = pair[1];
        if t <= t1 {
            let f = (t - t0) / (t1 - t0);
            let lerp = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * f).round() as u8;
            return Rgb([lerp(c0[0], c1[0]), lerp(c0[1], c1[1]), lerp(c0[2], c1[2])]);
        }
    }
    Rgb(BLUES[BLUES.len() - 1].1)
}

/// Resolve an open-ended range against the data
fn resolve_range(range: ValueRange, matrix: &AggregatedMatrix) -> (f64, f64) {
    let max = range.max.unwrap_or_else(|| matrix.max_value());
    if max > range.min {
        (range.min, max)
    } else {
        (range.min, range.min + 1.0)
    }
}

fn normalize(value: f64, (min, max): (f64, f64)) -> f32 {
    ((value - min) / (max - min)).clamp(0.0, 1.0) as f32
}

/// Fill a rectangle with a solid color
fn fill_rect(img: &mut RgbImage, x0: u32, y0: u32, w: u32, h: u32, color: Rgb<u8>) {
    for y in y0..(y0 + h).min(img.height()) {
        for x in x0..(x0 + w).min(img.width()) {
            img.put_pixel(x, y, color);
        }
    }
}

/// Draw `text` centred on (cx, cy), one line per `\n`
fn draw_centered(
    img: &mut RgbImage,
    font: &FontVec,
    scale: PxScale,
    text: &str,
    cx: i32,
    cy: i32,
    color: Rgb<u8>,
) {
    let lines: Vec<&str> = text.lines().collect();
    let line_height = scale.y.ceil() as i32;
    let total = line_height * lines.len() as i32;
    let mut y = cy - total / 2;
    for line in lines {
        let (w, _) = text_size(scale, font, line);
        draw_text_mut(img, color, cx - w as i32 / 2, y, scale, font, line);
        y += line_height;
    }
}

/// Render an aggregated matrix.
///
/// Rows of the matrix run top to bottom and columns left to right, both in
/// registry order. Labels are only drawn when a font is supplied.
pub fn render_heatmap(
    matrix: &AggregatedMatrix,
    mask: &PairMatrix<bool>,
    range: ValueRange,
    font: Option<&FontVec>,
) -> RgbImage {
    let size = matrix.cells.size() as u32;
    let grid = size * CELL_SIZE;
    let colorbar_x = AXIS_MARGIN + grid + COLORBAR_GAP;
    let width = colorbar_x + COLORBAR_WIDTH + COLORBAR_LABEL_WIDTH + PADDING;
    let height = AXIS_MARGIN + grid + PADDING;

    let mut img = RgbImage::from_pixel(width, height, BACKGROUND);
    let bounds = resolve_range(range, matrix);

    for (row, col, cell) in matrix.cells.iter() {
        if *mask.at(row, col) {
            continue;
        }
        let t = normalize(cell.value, bounds);
        let x0 = AXIS_MARGIN + col as u32 * CELL_SIZE;
        let y0 = AXIS_MARGIN + row as u32 * CELL_SIZE;
        fill_rect(&mut img, x0, y0, CELL_SIZE, CELL_SIZE, blues(t));

        if let Some(font) = font {
            let text_color = if t > 0.6 { TEXT_LIGHT } else { TEXT_DARK };
            draw_centered(
                &mut img,
                font,
                PxScale::from(LABEL_SCALE),
                &cell.label,
                (x0 + CELL_SIZE / 2) as i32,
                (y0 + CELL_SIZE / 2) as i32,
                text_color,
            );
        }
    }

    // Colour bar, top = max
    for y in 0..grid {
        let t = 1.0 - y as f32 / grid.max(1) as f32;
        fill_rect(&mut img, colorbar_x, AXIS_MARGIN + y, COLORBAR_WIDTH, 1, blues(t));
    }

    if let Some(font) = font {
        let axis = PxScale::from(AXIS_SCALE);
        for (idx, model) in matrix.models.iter().enumerate() {
            let center = (AXIS_MARGIN + idx as u32 * CELL_SIZE + CELL_SIZE / 2) as i32;
            draw_centered(&mut img, font, axis, model.name(), (AXIS_MARGIN / 2) as i32, center, TEXT_DARK);
            draw_centered(&mut img, font, axis, model.name(), center, (AXIS_MARGIN / 2) as i32, TEXT_DARK);
        }

        let label_x = (colorbar_x + COLORBAR_WIDTH + 4) as i32;
        let max_label = format!("{:.0}", bounds.1);
        let min_label = format!("{:.0}", bounds.0);
        draw_text_mut(&mut img, TEXT_DARK, label_x, AXIS_MARGIN as i32, axis, font, &max_label);
        draw_text_mut(
            &mut img,
            TEXT_DARK,
            label_x,
            (AXIS_MARGIN + grid) as i32 - AXIS_SCALE as i32,
            axis,
            font,
            &min_label,
        );
    }

    img
}

/// Make a level name safe to use as a file name
pub fn sanitize_file_stem(name: &str) -> String {
    let out: String = name
        .chars()
        .map(|ch| {
            if ch.is_ascii_alphanumeric() || matches!(ch, '-' | '_' | '.') {
                ch
            } else {
                '_'
            }
        })
        .collect();
    if out.is_empty() { "_".to_string() } else { out }
}

/// `<level-or-total><mode suffix>`
pub fn output_stem(name: &str, mode: ReportMode) -> String {
    format!("{}{}", sanitize_file_stem(name), mode.file_suffix())
}

/// Create the output directory if it does not exist yet
pub fn ensure_output_dir(dir: &Path) -> Result<()> {
    fs::create_dir_all(dir).map_err(|source| CompileError::OutputPathUnavailable {
        path: dir.to_path_buf(),
        source,
    })
}

/// Cell data as `row,col,value,label[,expected]`, unmasked cells only
pub fn sidecar_text(matrix: &AggregatedMatrix, mask: &PairMatrix<bool>) -> String {
    let mut out = String::new();
    let header = if matrix.expected_runs.is_some() {
        "# row,col,value,label,expected"
    } else {
        "# row,col,value,label"
    };
    let _ = writeln!(out, "{}", header);

    for (row, col, cell) in matrix.cells.iter() {
        if *mask.at(row, col) {
            continue;
        }
        let label = cell.label.replace('\n', " ");
        let _ = write!(
            out,
            "{},{},{},{}",
            matrix.models[row], matrix.models[col], cell.value, label
        );
        if let Some(expected) = &matrix.expected_runs {
            let _ = write!(out, ",{}", expected.at(row, col));
        }
        out.push('\n');
    }
    out
}

/// Write `<stem>.png` and `<stem>.txt` into `dir`; returns the image path
pub fn write_heatmap(
    dir: &Path,
    stem: &str,
    image: &RgbImage,
    matrix: &AggregatedMatrix,
    mask: &PairMatrix<bool>,
) -> Result<PathBuf> {
    ensure_output_dir(dir)?;

    let image_path = dir.join(format!("{}.png", stem));
    image
        .save(&image_path)
        .map_err(|source| CompileError::ImageWrite {
            path: image_path.clone(),
            source,
        })?;

    let data_path = dir.join(format!("{}.txt", stem));
    fs::write(&data_path, sidecar_text(matrix, mask)).map_err(|source| CompileError::Io {
        path: data_path.clone(),
        source,
    })?;

    info!("Saved {} and {}", image_path.display(), data_path.display());
    Ok(image_path)
}
