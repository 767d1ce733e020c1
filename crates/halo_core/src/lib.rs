//! Halo Core
//!
//! Foundational types shared by the Halo crates:
//!
//! - **Geometry**: points, sizes, rects and 2D affine transforms
//! - **Color**: RGBA colors with hex/name parsing for configuration files
//! - **Draw Context**: the rendering seam widgets paint through
//! - **View Capabilities**: `Drawable` and `Container`, composed rather than inherited

pub mod draw;
pub mod geometry;
pub mod view;

pub use draw::{DrawCommand, DrawContext, LineCap, RecordingContext, Stroke};
pub use geometry::{Affine2D, Color, ColorParseError, Point, Rect, Size};
pub use view::{Container, Drawable, NodeId, Property, ViewNode, Visibility};
