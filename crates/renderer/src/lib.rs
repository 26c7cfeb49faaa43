mod frame;
mod presenter;

pub use frame::{CursorOverlay, FrameStyle, ViewportFrame, compose_viewport_frame};
pub use presenter::{Presenter, PresenterError};

#[cfg(test)]
mod wgsl_tests;
