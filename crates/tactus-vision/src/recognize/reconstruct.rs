// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Line reconstruction — recovers reading order from unordered detections.

use tactus_core::config::ReconstructConfig;
use tactus_core::error::{Result, TactusError};
use tactus_core::types::{Detection, Line};
use tracing::{debug, instrument};

/// Groups detections into text lines and orders them for reading.
///
/// ## Algorithm
///
/// 1. Stable sort by `y1` (top edge).
/// 2. Walk the sorted detections. Each line bucket is represented by the
///    `y1` of its first member. A detection joins the *first* bucket, in
///    creation order, whose representative is closer than the vertical
///    tolerance; otherwise it opens a new bucket.
/// 3. Stable sort each bucket by `x1`.
/// 4. Emit buckets in creation order, which is top to bottom.
///
/// The representative never moves as a line grows. When a detection is
/// within tolerance of two buckets the older bucket wins even if the newer
/// one is nearer. Downstream output depends on this first-fit rule, so it is
/// kept as is.
#[derive(Debug, Clone, Default)]
pub struct LineReconstructor {
    config: ReconstructConfig,
}

impl LineReconstructor {
    pub fn new(config: ReconstructConfig) -> Self {
        Self { config }
    }

    pub fn vertical_tolerance(&self) -> f32 {
        self.config.vertical_tolerance
    }

    /// Partition `detections` into lines in reading order.
    ///
    /// Every detection ends up in exactly one line. Empty input yields no
    /// lines. A box with non-finite coordinates or no area fails with
    /// [`TactusError::InvalidDetection`] before any ordering happens.
    #[instrument(skip_all, fields(detections = detections.len()))]
    pub fn reconstruct(&self, detections: &[Detection]) -> Result<Vec<Line>> {
        validate(detections)?;

        let mut sorted = detections.to_vec();
        sorted.sort_by(|a, b| a.bbox.y1.total_cmp(&b.bbox.y1));

        let tolerance = self.vertical_tolerance();
        let mut lines: Vec<Line> = Vec::new();
        for detection in sorted {
            assign(&mut lines, detection, tolerance);
        }

        for line in &mut lines {
            line.detections
                .sort_by(|a, b| a.bbox.x1.total_cmp(&b.bbox.x1));
        }

        debug!(lines = lines.len(), tolerance, "lines reconstructed");
        Ok(lines)
    }
}

/// First-fit bucket assignment against each line's fixed representative.
fn assign(lines: &mut Vec<Line>, detection: Detection, tolerance: f32) {
    let y1 = detection.bbox.y1;
    match lines
        .iter_mut()
        .find(|line| (line.representative_y1 - y1).abs() < tolerance)
    {
        Some(line) => line.detections.push(detection),
        None => lines.push(Line {
            representative_y1: y1,
            detections: vec![detection],
        }),
    }
}

fn validate(detections: &[Detection]) -> Result<()> {
    match detections.iter().position(|d| !d.bbox.is_valid()) {
        Some(index) => Err(TactusError::InvalidDetection {
            index,
            bbox: detections[index].bbox,
        }),
        None => Ok(()),
    }
}

// -- Tests --------------------------------------------------------------------
