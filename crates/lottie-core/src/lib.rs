//! # lottie-core
//!
//! Core types and primitives for the lottie-rs animation model.
//! This crate contains the foundational pieces shared across all lottie-rs crates:
//! numeric vectors, Bezier paths, arc conversion, bounding boxes, affine matrices,
//! export configuration, and error types.

pub mod arc;
pub mod bezier;
pub mod bounds;
pub mod config;
pub mod error;
pub mod matrix;
pub mod nvector;

pub use config::*;

pub use arc::EllipseArc;
pub use bezier::{Bezier, BezierPoint};
pub use bounds::BoundingBox;
pub use error::{LottieError, LottieResult};
pub use matrix::{DecomposedTransform, TransformMatrix};
pub use nvector::NVector;
