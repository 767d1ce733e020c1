//! Arc rectangles and painting
//!
//! The outer arc sits two stroke widths inside the spinner bounds, the inner
//! arc four. Each has a shadow copy shifted by the shadow offset on both
//! axes, painted first in the shadow color.

use crate::oscillator::{AnimationConfig, ArcState};
use halo_core::{DrawContext, Rect};

/// Bounding rects of the four arcs
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct StrokeGeometry {
    pub outer: Rect,
    pub inner: Rect,
    pub outer_shadow: Rect,
    pub inner_shadow: Rect,
}

impl StrokeGeometry {
    /// Lay out the arcs inside `bounds`
    pub fn new(bounds: Rect, stroke_width: f32, shadow_offset: f32) -> Self {
        let outer = bounds.inset(2.0 * stroke_width);
        let inner = bounds.inset(4.0 * stroke_width);
        Self {
            outer,
            inner,
            outer_shadow: outer.offset(shadow_offset, shadow_offset),
            inner_shadow: inner.offset(shadow_offset, shadow_offset),
        }
    }

    pub fn from_config(bounds: Rect, config: &AnimationConfig) -> Self {
        Self::new(bounds, config.stroke_width(), config.shadow_offset())
    }

    /// Paint shadows then arcs: four `stroke_arc` calls
    pub fn paint(&self, ctx: &mut dyn DrawContext, state: &ArcState, config: &AnimationConfig) {
        let stroke = config.stroke();
        let span = state.arc_span;

        let shadow = config.shadow_color();
        ctx.stroke_arc(self.outer_shadow, state.outer_start_angle, span, &stroke, shadow);
        ctx.stroke_arc(self.inner_shadow, state.inner_start_angle, span, &stroke, shadow);

        let color = config.stroke_color();
        ctx.stroke_arc(self.outer, state.outer_start_angle, span, &stroke, color);
        ctx.stroke_arc(self.inner, state.inner_start_angle, span, &stroke, color);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use halo_core::{Color, DrawCommand, LineCap, RecordingContext, Size};

    #[test]
    fn test_geometry_insets() {
        let geometry = StrokeGeometry::new(Rect::new(0.0, 0.0, 200.0, 200.0), 10.0, 2.0);
        assert_eq!(geometry.outer, Rect::from_edges(20.0, 20.0, 180.0, 180.0));
        assert_eq!(geometry.inner, Rect::from_edges(40.0, 40.0, 160.0, 160.0));
        assert_eq!(
            geometry.outer_shadow,
            Rect::from_edges(22.0, 22.0, 182.0, 182.0)
        );
        assert_eq!(
            geometry.inner_shadow,
            Rect::from_edges(42.0, 42.0, 162.0, 162.0)
        );
    }

    #[test]
    fn test_geometry_follows_bounds_origin() {
        let geometry = StrokeGeometry::new(Rect::new(100.0, 50.0, 200.0, 200.0), 5.0, 0.0);
        assert_eq!(geometry.outer, Rect::new(110.0, 60.0, 180.0, 180.0));
        assert_eq!(geometry.outer_shadow, geometry.outer);
    }

    #[test]
    fn test_paint_order_and_colors() {
        let config = AnimationConfig::new(10.0, 10.0, Color::RED).unwrap();
        let state = ArcState {
            outer_start_angle: 20.0,
            inner_start_angle: 541.0,
            arc_span: 12.5,
            is_growing: true,
        };
        let geometry = StrokeGeometry::from_config(Rect::new(0.0, 0.0, 200.0, 200.0), &config);

        let mut ctx = RecordingContext::new(Size::new(200.0, 200.0));
        geometry.paint(&mut ctx, &state, &config);

        let arcs: Vec<_> = ctx
            .commands()
            .iter()
            .map(|c| match c {
                DrawCommand::StrokeArc {
                    bounds,
                    start_angle,
                    sweep_angle,
                    stroke,
                    color,
                } => {
                    assert_eq!(*sweep_angle, 12.5);
                    assert_eq!(stroke.width, 10.0);
                    assert_eq!(stroke.cap, LineCap::Round);
                    (*bounds, *start_angle, *color)
                }
                other => panic!("unexpected command {:?}", other),
            })
            .collect();

        assert_eq!(
            arcs,
            vec![
                (geometry.outer_shadow, 20.0, config.shadow_color()),
                (geometry.inner_shadow, 541.0, config.shadow_color()),
                (geometry.outer, 20.0, Color::RED),
                (geometry.inner, 541.0, Color::RED),
            ]
        );
    }
}
