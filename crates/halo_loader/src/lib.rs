//! Halo Loader
//!
//! A circular loading indicator: two counter-rotating arcs whose span pulses
//! between a minimum and maximum, drawn over a translucent backdrop.
//!
//! # Layers
//!
//! - **[`ArcOscillator`]**: pure per-frame geometry update
//! - **[`SpinnerLifecycle`]**: idle/running state machine, scale transitions and frame arming
//! - **[`CircleLoader`]**: backdrop fade sequenced with the spinner
//! - **[`LoaderRuntime`]**: a loader bundled with its own scheduler and frame clock
//!
//! # Example
//!
//! ```
//! use halo_core::{RecordingContext, Size};
//! use halo_loader::{LoaderConfig, LoaderRuntime};
//!
//! let viewport = Size::new(320.0, 480.0);
//! let mut runtime = LoaderRuntime::new(&LoaderConfig::default(), viewport).unwrap();
//! let mut ctx = RecordingContext::new(viewport);
//!
//! runtime.start_loading();
//! let outcome = runtime.pump(16.0, &mut ctx);
//! assert!(outcome.advanced);
//! assert_eq!(ctx.arc_count(), 4);
//! ```

pub mod compositor;
pub mod config;
pub mod error;
pub mod lifecycle;
pub mod oscillator;
pub mod runtime;
pub mod strokes;

pub use compositor::{CircleLoader, BACKDROP_NODE, BACKDROP_OPACITY};
pub use config::LoaderConfig;
pub use error::{LoaderError, Result};
pub use lifecycle::{LifecycleState, SpinnerLifecycle, SPINNER_NODE, SPINNER_SCALE};
pub use oscillator::{AnimationConfig, ArcOscillator, ArcState};
pub use runtime::{FrameOutcome, LoaderRuntime};
pub use strokes::StrokeGeometry;
