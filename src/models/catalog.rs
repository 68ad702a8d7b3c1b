//! Showcase content sources.
//!
//! - `Catalog::builtin()` - the static project list shipped with the app
//! - `Catalog::from_directory()` - one item per image file in a directory
//!
//! Either way the content is loaded once and stays static for the session.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use super::ProjectItem;
use crate::image_loader;

/// Desired height used when an image's dimensions can't be read.
const FALLBACK_DESIRED_HEIGHT: f32 = 400.0;

/// Bounds applied to aspect-derived heights for directory items.
const MIN_DESIRED_HEIGHT: f32 = 200.0;
const MAX_DESIRED_HEIGHT: f32 = 600.0;

/// Configuration for directory content discovery.
#[derive(Debug, Clone)]
pub struct ScanConfig {
    /// Whether to scan directories recursively.
    pub recursive: bool,
    /// Maximum directory depth (0 = unlimited).
    pub max_depth: usize,
    /// Whether to follow symbolic links.
    pub follow_symlinks: bool,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            recursive: false,
            max_depth: 0,
            follow_symlinks: false,
        }
    }
}

/// An ordered, static list of showcase items.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    items: Vec<ProjectItem>,
}

impl Catalog {
    pub fn new(items: Vec<ProjectItem>) -> Self {
        Self { items }
    }

    /// The built-in project list. Image paths are resolved against `image_root`.
    pub fn builtin(image_root: &Path) -> Self {
        let img = |name: &str| image_root.join(name);
        let items = vec![
            ProjectItem::new("1", img("IMG_7839.jpg"), 400.0)
                .with_title("Bias Lighting PCB")
                .with_short_text("ESP32-P4-based LED backlight PCB with real-time color matching via camera analysis")
                .with_long_text("An ESP32-P4 backlight board that samples on-screen colors through a camera and drives the ambient lighting to match in real time. Laid out for manufacturing and assembly, with trace widths and copper weight sized from the current budget.")
                .with_category("PCB Design")
                .with_technologies(["KiCad", "ESP32-P4", "PCB Design", "DFMA", "Electrical Engineering"]),
            ProjectItem::new("2", img("IMG_9115.jpg"), 300.0)
                .with_title("Campanile PCB")
                .with_short_text("Custom PCB shaped like the iconic UC Berkeley Campanile")
                .with_long_text("A Campanile-shaped board assembled by hand with through-hole LEDs. Practice in flux use, steady soldering of small parts and tracking down shorts until every LED lit.")
                .with_category("PCB Assembly")
                .with_technologies(["PCB Assembly", "Soldering", "Electronics", "Through-Hole Components"]),
            ProjectItem::new("3", img("Overviewpic.png"), 500.0)
                .with_title("Headphone Desk Mount")
                .with_short_text("Workspace organization solution combining cable management and headphone storage")
                .with_long_text("A desk clamp that hides an extension cord and gives headphones a dedicated hook. A threaded clamping screw fits desks of varying thickness.")
                .with_category("Design")
                .with_technologies(["SolidWorks", "Ansys FEA", "GD&T", "DFM", "3D Printing"]),
            ProjectItem::new("4", img("IMG_2479.jpg"), 400.0)
                .with_title("Helping Hand")
                .with_short_text("Assistive rehabilitation device to help kids with single-arm impairments regain wrist and finger movement")
                .with_long_text("An assistive rehabilitation device built through several user-tested prototypes, refined with feedback from patients and therapists.")
                .with_category("Medical Device")
                .with_technologies(["CAD", "R&D Testing", "Force Sensors", "Motion Tracking", "Agile Methodology", "Prototyping"]),
            ProjectItem::new("5", img("WindTurbine.png"), 450.0)
                .with_title("Miniature Wind Turbine")
                .with_short_text("Optimized wind turbine design using CFD and FEA analysis with experimental validation")
                .with_long_text("Blade geometry tuned with CFD and simulated annealing to maximise torque, checked for structural integrity with FEA and validated experimentally.")
                .with_category("Aerodynamics")
                .with_technologies(["SolidWorks CFD", "FEA", "Simulated Annealing", "Experimental Testing", "3D Printing"]),
            ProjectItem::new("6", img("IMG_9552.jpg"), 400.0)
                .with_title("Unmanned Surface Vehicle")
                .with_short_text("Autonomous surface vehicle for oceanographic data collection from lakes")
                .with_long_text("An autonomous boat towing a sensor buoy to collect pH and temperature data from lakes, built with a multidisciplinary team.")
                .with_category("Robotics")
                .with_technologies(["ArduPilot", "SketchUp", "Embedded Systems", "Soldering", "GPS", "Telemetry", "Autonomous Navigation"]),
            ProjectItem::new("7", img("IMG_9117.jpg"), 400.0)
                .with_title("USB Charger PCB")
                .with_short_text("Portable USB power bank PCB with boost converter for battery-to-USB charging")
                .with_long_text("A boost-converter power bank board stepping 1.0-5.5V battery input up to a stable 5V on USB-C and USB-A ports.")
                .with_category("PCB Design")
                .with_technologies(["KiCad", "PCB Design", "Power Electronics", "Boost Converter", "USB-C", "USB-A"]),
            ProjectItem::new("8", img("IMG_2413.JPG"), 400.0)
                .with_title("Vending Machine")
                .with_short_text("Modular acrylic vending machine with compartmentalized storage and automated dispensing system")
                .with_long_text("A modular vending machine of clear acrylic panels and black dividers forming a grid of dispensing compartments.")
                .with_category("Mechanical Design")
                .with_technologies(["CAD", "Acrylic Fabrication", "Mechanical Assembly", "Modular Design", "Fastening Systems"]),
            ProjectItem::new("9", img("WheelCenterpic_1.png"), 400.0)
                .with_title("Wheel Center")
                .with_short_text("Lightweight, high-performance wheel center for Berkeley Formula Racing car")
                .with_long_text("Six design iterations of a formula car wheel center, balancing stiffness, strength, weight and cost against load cases taken from suspension data.")
                .with_category("FEA Analysis")
                .with_technologies(["SolidWorks", "Ansys FEA", "DFM", "Material Selection", "Structural Optimization"]),
        ];
        Self { items }
    }

    /// Build a catalog with one item per image file under `dir`.
    ///
    /// Hidden entries are skipped and items are ordered by path.
    pub fn from_directory(dir: &Path, config: &ScanConfig) -> Result<Self> {
        if !dir.is_dir() {
            return Err(anyhow::anyhow!("Not a directory: {:?}", dir));
        }

        let mut walker = WalkDir::new(dir).follow_links(config.follow_symlinks);
        if !config.recursive {
            walker = walker.max_depth(1);
        } else if config.max_depth > 0 {
            walker = walker.max_depth(config.max_depth);
        }

        let mut paths: Vec<PathBuf> = Vec::new();
        for entry in walker.into_iter().filter_entry(|entry| {
            entry.depth() == 0
                || entry
                    .file_name()
                    .to_str()
                    .map(|name| !name.starts_with('.'))
                    .unwrap_or(true)
        }) {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!(error = %e, "Skipping unreadable entry");
                    continue;
                }
            };
            if entry.file_type().is_file() && is_image_path(entry.path()) {
                paths.push(entry.path().to_path_buf());
            }
        }
        paths.sort();

        let items = paths
            .into_iter()
            .enumerate()
            .map(|(index, path)| item_for_image(index, path))
            .collect::<Vec<_>>();

        info!(dir = %dir.display(), count = items.len(), "Loaded directory catalog");
        Ok(Self { items })
    }

    pub fn items(&self) -> &[ProjectItem] {
        &self.items
    }

    pub fn into_items(self) -> Vec<ProjectItem> {
        self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn find(&self, id: &str) -> Option<&ProjectItem> {
        self.items.iter().find(|item| item.id == id)
    }

    /// Items in `category`, in catalog order. `None` keeps everything.
    pub fn filtered(&self, category: Option<&str>) -> Vec<ProjectItem> {
        match category {
            None => self.items.clone(),
            Some(category) => self
                .items
                .iter()
                .filter(|item| item.in_category(category))
                .cloned()
                .collect(),
        }
    }

    /// Distinct categories in first-seen order.
    pub fn categories(&self) -> Vec<&str> {
        let mut out: Vec<&str> = Vec::new();
        for category in self.items.iter().filter_map(|i| i.category.as_deref()) {
            if !out.iter().any(|c| c.eq_ignore_ascii_case(category)) {
                out.push(category);
            }
        }
        out
    }
}

/// Check if a path has an extension the image decoder understands.
pub fn is_image_path(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| {
            matches!(
                e.to_ascii_lowercase().as_str(),
                "jpg" | "jpeg" | "png" | "webp" | "gif" | "bmp" | "tiff" | "tif"
            )
        })
        .unwrap_or(false)
}

fn item_for_image(index: usize, path: PathBuf) -> ProjectItem {
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("image")
        .to_string();

    let desired_height = match image_loader::read_dimensions(&path)
        .with_context(|| format!("Probing {:?}", path))
    {
        Ok((w, h)) => desired_height_for(w, h),
        Err(e) => {
            debug!(error = ?e, "Using fallback height");
            FALLBACK_DESIRED_HEIGHT
        }
    };

    ProjectItem::new(format!("{}-{}", stem, index), path, desired_height).with_title(stem)
}

/// Map image dimensions to a desired card height, keeping the aspect ratio.
pub fn desired_height_for(width: u32, height: u32) -> f32 {
    if width == 0 || height == 0 {
        return FALLBACK_DESIRED_HEIGHT;
    }
    let ratio = height as f32 / width as f32;
    (FALLBACK_DESIRED_HEIGHT * ratio).clamp(MIN_DESIRED_HEIGHT, MAX_DESIRED_HEIGHT)
}
