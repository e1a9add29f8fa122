// State management module.
// Holds the per-workflow generation state machines and the gallery tab state.

pub mod console;
pub mod gallery;
pub mod workflow;

pub use console::{ConsoleLevel, ConsoleMessage};
pub use gallery::GalleryTabState;
pub use workflow::{
    GenerationOutput, GenerationResult, ImageSlots, WorkflowKind, WorkflowPhase, WorkflowState,
};
