use tracing::trace;
use winit::dpi::PhysicalSize;

/// Filters viewport size notifications before they reach the camera and
/// drawable.
///
/// Zero-sized viewports happen transiently while a window is minimised or
/// mid-resize; those events are skipped so the last valid projection stays in
/// effect and no aspect division by zero can occur. The controller is owned
/// by the runtime whose teardown disposes the surface, which is what keeps a
/// stale registration from outliving the resources it mutates.
#[derive(Debug, Clone, Copy)]
pub struct ViewportController {
    size: PhysicalSize<u32>,
}

impl ViewportController {
    pub fn new(initial: PhysicalSize<u32>) -> Self {
        Self { size: initial }
    }

    pub fn size(&self) -> PhysicalSize<u32> {
        self.size
    }

    /// Accepts a resize notification, or returns `None` when it should be
    /// ignored (zero-sized, or identical to the current size).
    pub fn accept(&mut self, new_size: PhysicalSize<u32>) -> Option<PhysicalSize<u32>> {
        if new_size.width == 0 || new_size.height == 0 {
            trace!(width = new_size.width, height = new_size.height, "skipping zero-sized viewport");
            return None;
        }
        if new_size == self.size {
            return None;
        }
        self.size = new_size;
        Some(new_size)
    }

    /// Aspect ratio of the last accepted size.
    pub fn aspect(&self) -> f32 {
        self.size.width as f32 / self.size.height as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::Camera;

    #[test]
    fn accepts_a_real_resize() {
        let mut viewport = ViewportController::new(PhysicalSize::new(800, 600));
        let accepted = viewport.accept(PhysicalSize::new(1024, 768));
        assert_eq!(accepted, Some(PhysicalSize::new(1024, 768)));
        assert_eq!(viewport.size(), PhysicalSize::new(1024, 768));
    }

    #[test]
    fn zero_dimension_is_skipped_and_aspect_preserved() {
        let mut viewport = ViewportController::new(PhysicalSize::new(800, 600));
        let mut camera = Camera::new(viewport.aspect());
        let before = camera.aspect();

        assert!(viewport.accept(PhysicalSize::new(0, 600)).is_none());
        assert!(viewport.accept(PhysicalSize::new(800, 0)).is_none());
        assert!(viewport.accept(PhysicalSize::new(0, 0)).is_none());

        // No accepted event, so the camera never gets a new aspect.
        camera.set_aspect(viewport.aspect());
        assert_eq!(camera.aspect(), before);
        assert!(viewport.aspect().is_finite());
    }

    #[test]
    fn repeated_identical_size_is_idempotent() {
        let mut viewport = ViewportController::new(PhysicalSize::new(800, 600));
        assert!(viewport.accept(PhysicalSize::new(800, 600)).is_none());
        assert!(viewport.accept(PhysicalSize::new(1280, 720)).is_some());
        assert!(viewport.accept(PhysicalSize::new(1280, 720)).is_none());
    }
}
