//! Still-image export of the current stereo view.

use std::path::Path;

use log::info;
use stereoview_core::StereoViewer;
use thiserror::Error;

use crate::canvas::Canvas;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("viewer error: {0}")]
    Viewer(#[from] stereoview_core::Error),

    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("export size must be non-zero, got {0}x{1}")]
    EmptySize(u32, u32),
}

/// Render the viewer offscreen at `width` x `height`.
///
/// With `window_aspect` the view keeps the live window's proportions and is
/// stretched onto the output, matching what is on screen.
pub fn render_view(
    viewer: &StereoViewer,
    width: u32,
    height: u32,
    window_aspect: bool,
) -> Result<Canvas, ExportError> {
    if width == 0 || height == 0 {
        return Err(ExportError::EmptySize(width, height));
    }
    let mut canvas = Canvas::new(width, height);
    viewer.render_to(&mut canvas, window_aspect)?;
    Ok(canvas)
}

/// Render and encode to `path`; the format follows the file extension
pub fn export_view<P: AsRef<Path>>(
    viewer: &StereoViewer,
    path: P,
    width: u32,
    height: u32,
    window_aspect: bool,
) -> Result<(), ExportError> {
    let path = path.as_ref();
    let canvas = render_view(viewer, width, height, window_aspect)?;
    canvas.into_image().save(path)?;
    info!("exported {}x{} view to {}", width, height, path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use stereoview_core::RenderBackend;

    #[test]
    fn test_render_view_size() {
        let viewer = StereoViewer::default();
        let canvas = render_view(&viewer, 64, 32, false).unwrap();
        assert_eq!(canvas.size(), (64, 32));
    }

    #[test]
    fn test_empty_size_is_rejected() {
        let viewer = StereoViewer::default();
        assert!(matches!(render_view(&viewer, 0, 10, false), Err(ExportError::EmptySize(0, 10))));
    }

    #[test]
    fn test_unknown_extension_fails() {
        let dir = tempfile::tempdir().unwrap();
        let viewer = StereoViewer::default();
        let result = export_view(&viewer, dir.path().join("view.unknown"), 8, 8, false);
        assert!(matches!(result, Err(ExportError::Image(_))));
    }
}
