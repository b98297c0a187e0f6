/// Particle detection via trackpy, feature finding behind a trait seam
///
/// The locator itself is an external numerical library; this module only
/// prepares the call, parses what comes back, and stores the results
/// (features CSV, one crop per particle) for browsing.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, TrackerError};

use super::command::ToolCommand;

pub const FEATURES_FILE: &str = "features.csv";
pub const CROP_PREFIX: &str = "particle_";

/// Parameters forwarded to `tp.locate`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectionParams {
    /// Approximate feature diameter in pixels (odd)
    pub feature_size: u32,
    /// Minimum integrated brightness
    pub min_mass: f64,
    /// Look for dark spots on a bright background
    pub invert: bool,
    /// Clip band-passed data below this value
    pub threshold: f64,
}

impl Default for DetectionParams {
    fn default() -> Self {
        Self {
            feature_size: 15,
            min_mass: 100.0,
            invert: false,
            threshold: 0.0,
        }
    }
}

impl DetectionParams {
    pub fn validate(&self) -> Result<()> {
        if self.feature_size < 3 || self.feature_size % 2 == 0 {
            return Err(TrackerError::InvalidParams(format!(
                "feature size must be an odd integer >= 3 (got {})",
                self.feature_size
            )));
        }
        if !(self.min_mass >= 0.0) {
            return Err(TrackerError::InvalidParams(format!(
                "minimum mass must be >= 0 (got {})",
                self.min_mass
            )));
        }
        if !(self.threshold >= 0.0) {
            return Err(TrackerError::InvalidParams(format!(
                "threshold must be >= 0 (got {})",
                self.threshold
            )));
        }
        Ok(())
    }
}

/// One located particle, in image pixel coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    pub x: f64,
    pub y: f64,
    pub mass: f64,
    pub size: f64,
    pub ecc: f64,
    pub signal: f64,
}

/// Something that finds bright spots in an image
pub trait ParticleLocator {
    fn locate(&self, image: &Path, params: &DetectionParams) -> Result<Vec<Feature>>;
}

/// Inline script run by the Python interpreter. Grayscale is the plain
/// mean of the three channels.
const TRACKPY_SCRIPT: &str = r#"import sys
import cv2
import trackpy as tp
frame = cv2.imread(sys.argv[1])
if frame is None:
    sys.exit("Could not read image: " + sys.argv[1])
gray = frame.mean(axis=2)
features = tp.locate(gray, diameter=int(sys.argv[2]), minmass=float(sys.argv[3]),
                     invert=sys.argv[4] == "1", threshold=float(sys.argv[5]))
cols = [c for c in ("x", "y", "mass", "size", "ecc", "signal") if c in features.columns]
features[cols].to_csv(sys.stdout, index=False)
"#;

/// Runs trackpy through a Python subprocess
#[derive(Debug, Clone)]
pub struct TrackpyLocator {
    pub python: String,
}

impl TrackpyLocator {
    pub fn new(python: &str) -> Self {
        Self {
            python: python.to_string(),
        }
    }

    pub fn command(&self, image: &Path, params: &DetectionParams) -> ToolCommand {
        ToolCommand::new(&self.python)
            .arg("-c")
            .arg(TRACKPY_SCRIPT)
            .path_arg(image)
            .arg(params.feature_size.to_string())
            .arg(params.min_mass.to_string())
            .arg(if params.invert { "1" } else { "0" })
            .arg(params.threshold.to_string())
            .describe("Locate particles (trackpy)")
    }
}

impl ParticleLocator for TrackpyLocator {
    fn locate(&self, image: &Path, params: &DetectionParams) -> Result<Vec<Feature>> {
        params.validate()?;
        let result = self.command(image, params).execute()?;
        parse_features_csv(&result.stdout)
    }
}

fn parse_field(value: Option<&&str>) -> std::result::Result<f64, String> {
    match value.map(|v| v.trim()) {
        None | Some("") => Ok(f64::NAN),
        Some(v) => v.parse::<f64>().map_err(|_| format!("not a number: '{}'", v)),
    }
}

/// Parse CSV with a header row. Columns are matched by name; `x` and `y`
/// are required, the rest default to NaN when absent or empty.
pub fn parse_features_csv(text: &str) -> Result<Vec<Feature>> {
    let mut lines = text.lines().map(str::trim).filter(|l| !l.is_empty());
    let header: Vec<&str> = match lines.next() {
        Some(h) => h.split(',').map(str::trim).collect(),
        None => return Ok(Vec::new()),
    };
    let column = |name: &str| header.iter().position(|h| *h == name);
    let (xi, yi) = match (column("x"), column("y")) {
        (Some(x), Some(y)) => (x, y),
        _ => {
            return Err(TrackerError::DetectorOutput(format!(
                "header lacks x/y columns: {}",
                header.join(",")
            )))
        }
    };
    let optional = ["mass", "size", "ecc", "signal"].map(column);

    let mut features = Vec::new();
    for (n, line) in lines.enumerate() {
        let fields: Vec<&str> = line.split(',').collect();
        let get = |idx: Option<usize>| -> Result<f64> {
            match idx {
                Some(i) => parse_field(fields.get(i))
                    .map_err(|e| TrackerError::DetectorOutput(format!("row {}: {}", n + 1, e))),
                None => Ok(f64::NAN),
            }
        };
        let x = get(Some(xi))?;
        let y = get(Some(yi))?;
        if !x.is_finite() || !y.is_finite() {
            return Err(TrackerError::DetectorOutput(format!(
                "row {}: missing coordinates",
                n + 1
            )));
        }
        features.push(Feature {
            x,
            y,
            mass: get(optional[0])?,
            size: get(optional[1])?,
            ecc: get(optional[2])?,
            signal: get(optional[3])?,
        });
    }
    Ok(features)
}

/// Format features as CSV (same columns the parser reads)
pub fn features_to_csv(features: &[Feature]) -> String {
    let mut out = String::from("x,y,mass,size,ecc,signal\n");
    for f in features {
        out.push_str(&format!(
            "{:.4},{:.4},{:.4},{:.4},{:.4},{:.4}\n",
            f.x, f.y, f.mass, f.size, f.ecc, f.signal
        ));
    }
    out
}

/// Output of one detection run
#[derive(Debug, Clone, Default)]
pub struct DetectionResult {
    pub frame: PathBuf,
    pub features: Vec<Feature>,
    pub crops: Vec<PathBuf>,
}

/// Crop rectangle `(x0, y0, w, h)` of side `2 * feature_size` around a
/// feature, clipped to the image. None when nothing is left after clipping.
pub fn crop_rect(
    feature: &Feature,
    feature_size: u32,
    image_size: [u32; 2],
) -> Option<(u32, u32, u32, u32)> {
    let half = feature_size as f64;
    let x0 = (feature.x - half).round().max(0.0);
    let y0 = (feature.y - half).round().max(0.0);
    let x1 = (feature.x + half).round().min(image_size[0] as f64);
    let y1 = (feature.y + half).round().min(image_size[1] as f64);
    if x1 <= x0 || y1 <= y0 {
        return None;
    }
    Some((x0 as u32, y0 as u32, (x1 - x0) as u32, (y1 - y0) as u32))
}

/// Remove crops and the features file from a previous run
pub fn clear_detection(folder: &Path) -> Result<()> {
    for crop in list_crops(folder) {
        fs::remove_file(&crop).map_err(|e| TrackerError::io(&crop, e))?;
    }
    let features = folder.join(FEATURES_FILE);
    if features.exists() {
        fs::remove_file(&features).map_err(|e| TrackerError::io(&features, e))?;
    }
    Ok(())
}

/// Write `features.csv` and one JPEG crop per feature into `folder`.
///
/// The frame is decoded and every crop cut before the previous run is
/// cleared, so a frame that fails to decode leaves the folder as it was.
pub fn save_detection(
    frame: &Path,
    features: &[Feature],
    params: &DetectionParams,
    folder: &Path,
) -> Result<Vec<PathBuf>> {
    let img = image::open(frame).map_err(|e| TrackerError::image(frame, e))?;
    let size = [img.width(), img.height()];

    let mut cut = Vec::new();
    for (i, feature) in features.iter().enumerate() {
        let Some((x, y, w, h)) = crop_rect(feature, params.feature_size, size) else {
            log::debug!("Feature {} at ({:.1}, {:.1}) lies outside the frame", i, feature.x, feature.y);
            continue;
        };
        let path = folder.join(format!("{}{:05}.jpg", CROP_PREFIX, i));
        cut.push((path, img.crop_imm(x, y, w, h).to_rgb8()));
    }

    fs::create_dir_all(folder).map_err(|e| TrackerError::io(folder, e))?;
    clear_detection(folder)?;

    let csv_path = folder.join(FEATURES_FILE);
    fs::write(&csv_path, features_to_csv(features)).map_err(|e| TrackerError::io(&csv_path, e))?;

    let mut crops = Vec::with_capacity(cut.len());
    for (path, crop) in cut {
        crop.save(&path).map_err(|e| TrackerError::image(&path, e))?;
        crops.push(path);
    }
    Ok(crops)
}

/// Locate particles in `frame` and store the results in `folder`
pub fn find_and_save_particles(
    locator: &dyn ParticleLocator,
    frame: &Path,
    params: &DetectionParams,
    folder: &Path,
) -> Result<DetectionResult> {
    params.validate()?;
    let features = locator.locate(frame, params)?;
    let crops = save_detection(frame, &features, params, folder)?;
    log::info!(
        "Located {} particle(s) in {}; saved {} crop(s) to {}",
        features.len(),
        frame.display(),
        crops.len(),
        folder.display()
    );
    Ok(DetectionResult {
        frame: frame.to_path_buf(),
        features,
        crops,
    })
}

/// Saved particle crops, sorted by name
pub fn list_crops(folder: &Path) -> Vec<PathBuf> {
    let Ok(entries) = fs::read_dir(folder) else {
        return Vec::new();
    };
    let mut crops: Vec<PathBuf> = entries
        .flatten()
        .map(|e| e.path())
        .filter(|p| {
            p.is_file()
                && p.file_name()
                    .map(|n| {
                        let n = n.to_string_lossy();
                        n.starts_with(CROP_PREFIX) && n.to_lowercase().ends_with(".jpg")
                    })
                    .unwrap_or(false)
        })
        .collect();
    crops.sort();
    crops
}

/// Histograms of the fractional parts of x and y.
///
/// A flat histogram means the feature size suits the data; peaks near 0
/// and 1 mean the locator is pulling positions onto whole pixels.
#[derive(Debug, Clone, PartialEq)]
pub struct SubpixelBias {
    pub x: Vec<usize>,
    pub y: Vec<usize>,
}

impl SubpixelBias {
    pub fn bins(&self) -> usize {
        self.x.len()
    }

    /// Left edge of bin `i` in [0, 1)
    pub fn bin_start(&self, i: usize) -> f64 {
        i as f64 / self.bins().max(1) as f64
    }
}

pub fn subpixel_bias(features: &[Feature], bins: usize) -> SubpixelBias {
    let bins = bins.max(1);
    let mut x = vec![0usize; bins];
    let mut y = vec![0usize; bins];
    let bin_of = |v: f64| (((v - v.floor()) * bins as f64) as usize).min(bins - 1);
    for f in features {
        if f.x.is_finite() {
            x[bin_of(f.x)] += 1;
        }
        if f.y.is_finite() {
            y[bin_of(f.y)] += 1;
        }
    }
    SubpixelBias { x, y }
}
