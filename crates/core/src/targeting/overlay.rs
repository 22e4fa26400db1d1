use crate::shared::geometry::ScreenRect;

/// Output port for face bounding-box visualization.
///
/// Driven on the serialized update context once per detection completion:
/// `clear` first on every cycle, then `present` when faces were found. The
/// renderer behind it is outside this crate.
pub trait OverlaySink: Send {
    fn present(&mut self, rects: &[ScreenRect]);
    fn clear(&mut self);
}

/// Discards all overlay updates. The default when visualization is off.
pub struct NullOverlaySink;

impl OverlaySink for NullOverlaySink {
    fn present(&mut self, _rects: &[ScreenRect]) {}
    fn clear(&mut self) {}
}

/// Logs overlay rectangles, for headless runs without a renderer.
pub struct LogOverlaySink;

impl OverlaySink for LogOverlaySink {
    fn present(&mut self, rects: &[ScreenRect]) {
        for rect in rects {
            log::debug!(
                "overlay rect x={:.1} y={:.1} w={:.1} h={:.1}",
                rect.x,
                rect.y,
                rect.width,
                rect.height
            );
        }
    }

    fn clear(&mut self) {
        log::trace!("overlay cleared");
    }
}
