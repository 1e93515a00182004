//! Per-eye vertex buffer construction.
//!
//! Every build re-projects the whole segment list through both eye
//! matrices. A build may run on one background thread; its result only
//! becomes visible when [`ProjectionBuilder::wait`] joins it, so readers
//! never observe a half-filled buffer.

use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Instant;

use log::debug;

use crate::error::{Error, Result};
use crate::geometry::Section;
use crate::render::{EyeColors, LineVertex, Rgb};
use crate::stereo::EyeMatrices;
use crate::transform::{Matrix4, Transform};

/// Line lists for both eyes, two vertices per section in section order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EyeBuffers {
    pub left: Vec<LineVertex>,
    pub right: Vec<LineVertex>,
}

impl EyeBuffers {
    pub fn is_empty(&self) -> bool {
        self.left.is_empty() && self.right.is_empty()
    }
}

/// Project every section through both eye matrices
pub fn project_sections(
    sections: &[Section],
    eyes: &EyeMatrices,
    colors: &EyeColors,
) -> EyeBuffers {
    EyeBuffers {
        left: project_eye(sections, &eyes.left, colors.left),
        right: project_eye(sections, &eyes.right, colors.right),
    }
}

fn project_eye(sections: &[Section], matrix: &Matrix4, color: Rgb) -> Vec<LineVertex> {
    let mut vertices = Vec::with_capacity(sections.len() * 2);
    for section in sections {
        for point in [&section.begin, &section.end] {
            vertices.push(LineVertex {
                position: Transform::project(matrix, point),
                color,
            });
        }
    }
    vertices
}

/// Owns both eye buffers and rebuilds them from a shared segment list
pub struct ProjectionBuilder {
    sections: Arc<[Section]>,
    eyes: EyeMatrices,
    colors: EyeColors,
    buffers: EyeBuffers,
    pending: Option<JoinHandle<EyeBuffers>>,
}

impl ProjectionBuilder {
    pub fn new() -> Self {
        Self {
            sections: Arc::from(Vec::new()),
            eyes: EyeMatrices::default(),
            colors: EyeColors::default(),
            buffers: EyeBuffers::default(),
            pending: None,
        }
    }

    pub fn sections(&self) -> &Arc<[Section]> {
        &self.sections
    }

    /// Replace the segment list used by the next build
    pub fn set_sections(&mut self, sections: Arc<[Section]>) -> Result<()> {
        self.ensure_idle()?;
        self.sections = sections;
        Ok(())
    }

    pub fn eye_matrices(&self) -> &EyeMatrices {
        &self.eyes
    }

    /// Takes effect at the next build; an in-flight build keeps the matrices
    /// it started with.
    pub fn set_eye_matrices(&mut self, eyes: EyeMatrices) {
        self.eyes = eyes;
    }

    pub fn colors(&self) -> &EyeColors {
        &self.colors
    }

    pub fn set_colors(&mut self, colors: EyeColors) {
        self.colors = colors;
    }

    pub fn is_building(&self) -> bool {
        self.pending.is_some()
    }

    /// The most recently completed buffers
    pub fn buffers(&self) -> Result<&EyeBuffers> {
        self.ensure_idle()?;
        Ok(&self.buffers)
    }

    /// Rebuild on the calling thread
    pub fn calculate(&mut self) -> Result<()> {
        self.ensure_idle()?;
        let started = Instant::now();
        self.buffers = project_sections(&self.sections, &self.eyes, &self.colors);
        debug!(
            "projected {} sections in {:?}",
            self.sections.len(),
            started.elapsed()
        );
        Ok(())
    }

    /// Start a rebuild on a worker thread and return immediately.
    ///
    /// The worker works on a snapshot of the current sections, matrices and
    /// colors. Call [`wait`](Self::wait) before reading the buffers.
    pub fn async_calculate(&mut self) -> Result<()> {
        self.ensure_idle()?;
        let sections = Arc::clone(&self.sections);
        let eyes = self.eyes;
        let colors = self.colors;

        let handle = thread::Builder::new()
            .name("projection-builder".into())
            .spawn(move || {
                let started = Instant::now();
                let buffers = project_sections(&sections, &eyes, &colors);
                debug!(
                    "background projection of {} sections took {:?}",
                    sections.len(),
                    started.elapsed()
                );
                buffers
            })?;
        self.pending = Some(handle);
        Ok(())
    }

    /// Block until the in-flight build finishes and publish its buffers.
    /// Returns immediately when nothing is in flight.
    pub fn wait(&mut self) -> Result<()> {
        if let Some(handle) = self.pending.take() {
            self.buffers = handle.join().map_err(|_| Error::WorkerPanicked)?;
        }
        Ok(())
    }

    fn ensure_idle(&self) -> Result<()> {
        if self.is_building() {
            Err(Error::BuildInFlight)
        } else {
            Ok(())
        }
    }
}

impl Default for ProjectionBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for ProjectionBuilder {
    fn drop(&mut self) {
        let _ = self.wait();
    }
}
