//! Application state
//!
//! [`ScoreSession`] is the explicit state struct the command surface
//! operates on: one record per source page, global configuration, and
//! the operations that move a score through the pipeline - load,
//! analyze, transform, edit, export. No ambient globals.
//!
//! Every page owns its raster and systems exclusively; re-running
//! analysis on one page never touches another. Configuration changes
//! take effect on the next explicit run, never retroactively.

use crate::error::{SessionError, SessionResult};
use log::debug;
use stavespace_core::{Raster, System, sort_systems};
use stavespace_detect::{DetectOptions, PageProjection, analyze};
use stavespace_io::{PageRasterizer, PdfOptions, compose};
use stavespace_layout::{LayoutOptions, PageContent, PageGeometry, build_plan};
use stavespace_transform::{
    CropOffsets, auto_detect_margins, auto_detect_rotation, brightness_contrast, crop, rotate,
};

/// Per-page switches, both on when a file is loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageSetting {
    /// Run detection on this page; off marks the page verbatim
    pub detect: bool,
    /// Include this page in the export
    pub export: bool,
}

impl Default for PageSetting {
    fn default() -> Self {
        Self {
            detect: true,
            export: true,
        }
    }
}

/// Cumulative record of the transforms baked into a page's raster.
///
/// Kept for user-facing indicators only; the algorithms never read
/// it back.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransformLog {
    /// Sum of applied rotation angles, degrees
    pub rotation_deg: f32,
    /// Sum of applied crop offsets
    pub crop: CropOffsets,
    /// Most recently applied brightness percentage
    pub brightness: f32,
    /// Most recently applied contrast percentage
    pub contrast: f32,
}

impl Default for TransformLog {
    fn default() -> Self {
        Self {
            rotation_deg: 0.0,
            crop: CropOffsets::default(),
            brightness: 100.0,
            contrast: 100.0,
        }
    }
}

/// Everything the session tracks for one source page.
#[derive(Debug, Clone)]
pub struct PageAnalysis {
    raster: Raster,
    projection: Option<PageProjection>,
    systems: Vec<System>,
    setting: PageSetting,
    transforms: TransformLog,
}

impl PageAnalysis {
    fn new(raster: Raster) -> Self {
        Self {
            raster,
            projection: None,
            systems: Vec::new(),
            setting: PageSetting::default(),
            transforms: TransformLog::default(),
        }
    }

    /// The page raster in its current (possibly transformed) state.
    pub fn raster(&self) -> &Raster {
        &self.raster
    }

    /// The latest analysis profiles, if the page has been analyzed.
    pub fn projection(&self) -> Option<&PageProjection> {
        self.projection.as_ref()
    }

    /// Current systems, sorted by start row.
    pub fn systems(&self) -> &[System] {
        &self.systems
    }

    /// The page's detect/export switches.
    pub fn setting(&self) -> PageSetting {
        self.setting
    }

    /// Indicator of the transforms applied so far.
    pub fn transforms(&self) -> TransformLog {
        self.transforms
    }
}

/// The application state for one loaded score.
pub struct ScoreSession {
    pages: Vec<PageAnalysis>,
    detect_options: DetectOptions,
    geometry: PageGeometry,
    layout_options: LayoutOptions,
}

impl ScoreSession {
    /// Load every page of a document through a rasterizer at the
    /// given scale. Rasterization failures propagate unchanged.
    pub fn load(rasterizer: &mut dyn PageRasterizer, scale: f32) -> SessionResult<Self> {
        let count = rasterizer.page_count();
        let mut rasters = Vec::with_capacity(count);
        for page in 1..=count {
            rasters.push(rasterizer.rasterize(page, scale)?);
        }
        debug!("session loaded: {count} pages at scale {scale}");
        Ok(Self::from_rasters(rasters))
    }

    /// Build a session directly from page rasters.
    pub fn from_rasters(rasters: Vec<Raster>) -> Self {
        Self {
            pages: rasters.into_iter().map(PageAnalysis::new).collect(),
            detect_options: DetectOptions::default(),
            geometry: PageGeometry::a4(),
            layout_options: LayoutOptions::new(),
        }
    }

    /// Number of loaded pages.
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Access a page record (0-based).
    pub fn page(&self, index: usize) -> Option<&PageAnalysis> {
        self.pages.get(index)
    }

    /// Replace the detection options; takes effect on the next
    /// analysis run.
    pub fn set_detect_options(&mut self, options: DetectOptions) {
        self.detect_options = options;
    }

    /// Current detection options.
    pub fn detect_options(&self) -> &DetectOptions {
        &self.detect_options
    }

    /// Replace the layout options; takes effect on the next export.
    pub fn set_layout_options(&mut self, options: LayoutOptions) {
        self.layout_options = options;
    }

    /// Replace the output page geometry; takes effect on the next
    /// export.
    pub fn set_geometry(&mut self, geometry: PageGeometry) {
        self.geometry = geometry;
    }

    fn page_mut(&mut self, index: usize) -> SessionResult<&mut PageAnalysis> {
        let count = self.pages.len();
        self.pages
            .get_mut(index)
            .ok_or(SessionError::PageOutOfRange { page: index, count })
    }

    /// Toggle detection for a page. Turning it off clears the page's
    /// systems and marks it verbatim.
    pub fn set_detect(&mut self, index: usize, detect: bool) -> SessionResult<()> {
        let page = self.page_mut(index)?;
        page.setting.detect = detect;
        if !detect {
            page.systems.clear();
            page.projection = None;
        }
        Ok(())
    }

    /// Toggle export inclusion for a page.
    pub fn set_export(&mut self, index: usize, export: bool) -> SessionResult<()> {
        self.page_mut(index)?.setting.export = export;
        Ok(())
    }

    /// Analyze one page with the current options.
    ///
    /// Pages with detection disabled get an empty systems list.
    pub fn analyze_page(&mut self, index: usize) -> SessionResult<()> {
        let options = self.detect_options.clone();
        let page = self.page_mut(index)?;
        if !page.setting.detect {
            page.systems.clear();
            page.projection = None;
            return Ok(());
        }
        let projection = analyze(&page.raster, &options)?;
        page.systems = projection.systems.clone();
        page.projection = Some(projection);
        Ok(())
    }

    /// Analyze every page with the current options.
    pub fn analyze_all(&mut self) -> SessionResult<()> {
        for index in 0..self.pages.len() {
            self.analyze_page(index)?;
        }
        Ok(())
    }

    /// Rotate a page and re-analyze it. On failure the record is
    /// left untouched.
    pub fn apply_rotation(&mut self, index: usize, angle_deg: f32) -> SessionResult<()> {
        let page = self.page_mut(index)?;
        let rotated = rotate(&page.raster, angle_deg)?;
        self.commit_transform(index, rotated, |log| log.rotation_deg += angle_deg)
    }

    /// Crop a page and re-analyze it. Invalid geometry is rejected
    /// before the record changes.
    pub fn apply_crop(&mut self, index: usize, offsets: CropOffsets) -> SessionResult<()> {
        let page = self.page_mut(index)?;
        let cropped = crop(&page.raster, offsets)?;
        self.commit_transform(index, cropped, |log| {
            log.crop.top += offsets.top;
            log.crop.bottom += offsets.bottom;
            log.crop.left += offsets.left;
            log.crop.right += offsets.right;
        })
    }

    /// Remap brightness/contrast on a page and re-analyze it.
    pub fn apply_brightness_contrast(
        &mut self,
        index: usize,
        brightness: f32,
        contrast: f32,
    ) -> SessionResult<()> {
        let page = self.page_mut(index)?;
        let adjusted = brightness_contrast(&page.raster, brightness, contrast)?;
        self.commit_transform(index, adjusted, |log| {
            log.brightness = brightness;
            log.contrast = contrast;
        })
    }

    /// Replace a page's raster with a transformed one, re-running
    /// analysis first so a failure cannot leave a half-applied state.
    fn commit_transform(
        &mut self,
        index: usize,
        raster: Raster,
        update_log: impl FnOnce(&mut TransformLog),
    ) -> SessionResult<()> {
        let options = self.detect_options.clone();
        let page = self.page_mut(index)?;

        let projection = if page.setting.detect {
            Some(analyze(&raster, &options)?)
        } else {
            None
        };

        page.raster = raster;
        page.systems = projection
            .as_ref()
            .map(|p| p.systems.clone())
            .unwrap_or_default();
        page.projection = projection;
        update_log(&mut page.transforms);
        Ok(())
    }

    /// Suggest the corrective rotation angle for a page.
    pub fn suggest_rotation(&self, index: usize) -> SessionResult<f32> {
        let page = self.pages.get(index).ok_or(SessionError::PageOutOfRange {
            page: index,
            count: self.pages.len(),
        })?;
        Ok(auto_detect_rotation(&page.raster)?)
    }

    /// Suggest crop offsets trimming a page to its content box.
    pub fn suggest_margins(&self, index: usize) -> SessionResult<CropOffsets> {
        let page = self.pages.get(index).ok_or(SessionError::PageOutOfRange {
            page: index,
            count: self.pages.len(),
        })?;
        Ok(auto_detect_margins(&page.raster))
    }

    /// Add a user-created system.
    ///
    /// User systems are exempt from the minimum-height floor, but may
    /// not overlap an existing system or leave the raster.
    pub fn add_system(&mut self, index: usize, start: u32, end: u32) -> SessionResult<()> {
        let page = self.page_mut(index)?;
        let system = System::new(start, end)?;
        if end >= page.raster.height() {
            return Err(SessionError::InvalidEdit(format!(
                "system {system} extends past the last raster row {}",
                page.raster.height() - 1
            )));
        }
        if let Some(existing) = page.systems.iter().find(|s| s.overlaps(&system)) {
            return Err(SessionError::InvalidEdit(format!(
                "system {system} overlaps existing {existing}"
            )));
        }
        page.systems.push(system);
        sort_systems(&mut page.systems);
        Ok(())
    }

    /// Delete a system by its position in the sorted list.
    pub fn delete_system(&mut self, index: usize, system_index: usize) -> SessionResult<()> {
        let page = self.page_mut(index)?;
        if system_index >= page.systems.len() {
            return Err(SessionError::InvalidEdit(format!(
                "no system at index {system_index}"
            )));
        }
        page.systems.remove(system_index);
        Ok(())
    }

    /// Split a system into two at `row`; the first half keeps
    /// `start..row-1`, the second `row..end`.
    pub fn split_system(
        &mut self,
        index: usize,
        system_index: usize,
        row: u32,
    ) -> SessionResult<()> {
        let page = self.page_mut(index)?;
        let Some(&system) = page.systems.get(system_index) else {
            return Err(SessionError::InvalidEdit(format!(
                "no system at index {system_index}"
            )));
        };
        if row <= system.start || row > system.end {
            return Err(SessionError::InvalidEdit(format!(
                "split row {row} outside {system}"
            )));
        }
        page.systems[system_index] = System {
            start: system.start,
            end: row - 1,
        };
        page.systems.push(System {
            start: row,
            end: system.end,
        });
        sort_systems(&mut page.systems);
        Ok(())
    }

    /// Resize a system. The dragged edges are clamped against the
    /// neighboring systems and the raster bounds, so the non-overlap
    /// invariant holds after the edit settles; a resize that would
    /// invert start and end is rejected outright.
    pub fn resize_system(
        &mut self,
        index: usize,
        system_index: usize,
        new_start: u32,
        new_end: u32,
    ) -> SessionResult<()> {
        let page = self.page_mut(index)?;
        if system_index >= page.systems.len() {
            return Err(SessionError::InvalidEdit(format!(
                "no system at index {system_index}"
            )));
        }
        if new_start > new_end {
            return Err(SessionError::InvalidEdit(format!(
                "resize would invert the band: start {new_start} > end {new_end}"
            )));
        }

        let mut start = new_start;
        let mut end = new_end.min(page.raster.height() - 1);
        if system_index > 0 {
            start = start.max(page.systems[system_index - 1].end + 1);
        }
        if system_index + 1 < page.systems.len() {
            end = end.min(page.systems[system_index + 1].start - 1);
        }
        if start > end {
            return Err(SessionError::InvalidEdit(format!(
                "no room between neighboring systems for rows {new_start}..={new_end}"
            )));
        }

        page.systems[system_index] = System { start, end };
        sort_systems(&mut page.systems);
        Ok(())
    }

    /// Export the session to PDF bytes with default document options.
    ///
    /// Pages with `export` off are excluded; if that leaves nothing,
    /// the export fails with the empty-export-set error before any
    /// composition starts and no partial output is produced.
    pub fn export(&self) -> SessionResult<Vec<u8>> {
        self.export_with(&PdfOptions::default())
    }

    /// [`ScoreSession::export`] with explicit PDF document options.
    pub fn export_with(&self, pdf_options: &PdfOptions) -> SessionResult<Vec<u8>> {
        let contents: Vec<PageContent> = self
            .pages
            .iter()
            .map(|page| PageContent {
                raster: page.raster.clone(),
                systems: page.systems.clone(),
                detect: page.setting.detect,
                export: page.setting.export,
            })
            .collect();

        let plan = build_plan(&contents, &self.geometry, &self.layout_options)?;
        Ok(compose(&plan, pdf_options)?)
    }
}
