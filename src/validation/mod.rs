//! # Validation
//!
//! Result types shared by all validators, and the drag-and-drop
//! compatibility validator. Constraint validation against the knowledge
//! base lives in [`crate::constraints`].

pub mod compatibility;
pub mod types;

pub use compatibility::{
    CompatibilityValidator, DragDropEvent, DropOutcome, DropTarget, DropTargetType,
    DropValidation,
};
pub use types::{
    ConstraintViolation, Severity, ValidationError, ValidationResult, ValidationWarning,
    SYSTEM_ERROR,
};
