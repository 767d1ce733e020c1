//! View capabilities
//!
//! Widgets are composed from two small capabilities instead of a view class
//! hierarchy: [`Drawable`] (has bounds, paints itself) and [`Container`]
//! (exposes visibility and the animatable transform/opacity properties).
//! [`ViewNode`] is the plain implementation of both used for simple children
//! such as a solid backdrop.

use crate::draw::DrawContext;
use crate::geometry::{Color, Rect};

/// Identifies a node inside a widget so animated properties can be routed back to it
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u32);

/// Visibility of a node
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Visibility {
    /// Painted and laid out
    Visible,
    /// Laid out but not painted
    Invisible,
    /// Neither painted nor laid out
    #[default]
    Gone,
}

impl Visibility {
    pub fn is_visible(self) -> bool {
        matches!(self, Visibility::Visible)
    }
}

/// Numeric properties a transition engine can drive on a [`Container`]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Property {
    /// Horizontal scale factor
    ScaleX,
    /// Vertical scale factor
    ScaleY,
    /// Uniform scale, both axes together
    Scale,
    /// Opacity in `0.0..=1.0`
    Opacity,
}

/// Something with bounds that can paint itself
pub trait Drawable {
    /// Bounds in the parent's coordinate space
    fn bounds(&self) -> Rect;

    /// Paint into `ctx`
    fn paint(&self, ctx: &mut dyn DrawContext);
}

/// Visibility plus the animatable properties of a node
pub trait Container {
    fn visibility(&self) -> Visibility;

    fn set_visibility(&mut self, visibility: Visibility);

    /// Current `(scale_x, scale_y)`
    fn scale(&self) -> (f32, f32);

    fn set_scale(&mut self, scale_x: f32, scale_y: f32);

    fn opacity(&self) -> f32;

    fn set_opacity(&mut self, opacity: f32);

    /// Apply one animated property value
    fn apply_property(&mut self, property: Property, value: f32) {
        let (sx, sy) = self.scale();
        match property {
            Property::ScaleX => self.set_scale(value, sy),
            Property::ScaleY => self.set_scale(sx, value),
            Property::Scale => self.set_scale(value, value),
            Property::Opacity => self.set_opacity(value),
        }
    }
}

/// A plain node: bounds, visibility, scale, opacity and an optional fill
#[derive(Clone, Debug, PartialEq)]
pub struct ViewNode {
    pub id: NodeId,
    pub bounds: Rect,
    pub visibility: Visibility,
    pub scale_x: f32,
    pub scale_y: f32,
    pub opacity: f32,
    pub background: Option<Color>,
}

impl ViewNode {
    /// New hidden node with identity scale and full opacity
    pub fn new(id: NodeId) -> Self {
        Self {
            id,
            bounds: Rect::ZERO,
            visibility: Visibility::Gone,
            scale_x: 1.0,
            scale_y: 1.0,
            opacity: 1.0,
            background: None,
        }
    }

    pub fn with_background(mut self, color: Color) -> Self {
        self.background = Some(color);
        self
    }

    pub fn set_bounds(&mut self, bounds: Rect) {
        self.bounds = bounds;
    }

    pub fn set_background(&mut self, color: Color) {
        self.background = Some(color);
    }
}

impl Container for ViewNode {
    fn visibility(&self) -> Visibility {
        self.visibility
    }

    fn set_visibility(&mut self, visibility: Visibility) {
        self.visibility = visibility;
    }

    fn scale(&self) -> (f32, f32) {
        (self.scale_x, self.scale_y)
    }

    fn set_scale(&mut self, scale_x: f32, scale_y: f32) {
        self.scale_x = scale_x;
        self.scale_y = scale_y;
    }

    fn opacity(&self) -> f32 {
        self.opacity
    }

    fn set_opacity(&mut self, opacity: f32) {
        self.opacity = opacity.clamp(0.0, 1.0);
    }
}

impl Drawable for ViewNode {
    fn bounds(&self) -> Rect {
        self.bounds
    }

    fn paint(&self, ctx: &mut dyn DrawContext) {
        if !self.visibility.is_visible() {
            return;
        }
        if let Some(color) = self.background {
            ctx.push_opacity(self.opacity);
            ctx.fill_rect(self.bounds, color);
            ctx.pop_opacity();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draw::{DrawCommand, RecordingContext};
    use crate::geometry::Size;

    #[test]
    fn test_apply_property() {
        let mut node = ViewNode::new(NodeId(1));
        node.apply_property(Property::Scale, 0.5);
        assert_eq!(node.scale(), (0.5, 0.5));

        node.apply_property(Property::ScaleX, 1.0);
        assert_eq!(node.scale(), (1.0, 0.5));

        node.apply_property(Property::Opacity, 1.5);
        assert_eq!(node.opacity(), 1.0);
    }

    #[test]
    fn test_hidden_node_paints_nothing() {
        let node = ViewNode::new(NodeId(1)).with_background(Color::BLUE);
        let mut ctx = RecordingContext::new(Size::ZERO);
        node.paint(&mut ctx);
        assert!(ctx.commands().is_empty());
    }

    #[test]
    fn test_visible_node_paints_with_opacity() {
        let mut node = ViewNode::new(NodeId(2)).with_background(Color::BLUE);
        node.set_bounds(Rect::new(0.0, 0.0, 50.0, 50.0));
        node.set_visibility(Visibility::Visible);
        node.set_opacity(0.7);

        let mut ctx = RecordingContext::new(Size::ZERO);
        node.paint(&mut ctx);

        assert_eq!(
            ctx.commands(),
            &[
                DrawCommand::PushOpacity(0.7),
                DrawCommand::FillRect {
                    rect: Rect::new(0.0, 0.0, 50.0, 50.0),
                    color: Color::BLUE,
                },
                DrawCommand::PopOpacity,
            ]
        );
    }
}
