//! # Constraint validation
//!
//! Fetches the constraints a Wikibase instance declares on its properties
//! (statements under the "property constraint" property), caches them with a
//! TTL and evaluates candidate values against them.
//!
//! Lookup failures never reach callers of the `validate_*` methods; they are
//! reported as `system_error` violations inside the [`ValidationResult`].
//!
//! [`ValidationResult`]: crate::validation::ValidationResult

pub mod cache;
pub mod client;
pub mod entity;
pub mod error;
pub mod evaluators;
pub mod parser;
pub mod service;
pub mod types;

pub use cache::{cache_key, CachedConstraints, ConstraintCache};
pub use client::{HttpKnowledgeBaseClient, KnowledgeBaseClient};
pub use entity::{Claim, EntityRecord, Snak};
pub use error::{ConstraintError, ConstraintResult};
pub use evaluators::evaluate_constraints;
pub use parser::parse_constraints;
pub use service::ConstraintValidationService;
pub use types::{ConstraintKind, NativeValueType, PropertyConstraint};
