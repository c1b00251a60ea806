//! Branch report building and rendering.

pub mod context;
pub mod format;
pub mod html;

pub use context::{
    BranchStatus, BranchSummary, CommitUrlFormat, RenderContext, RenderOptions, ValidationError,
};
pub use html::render;
