//! Core types and utilities

pub mod cell;
pub mod color;
pub mod frame;
pub mod spark;
pub mod vec2;

pub use cell::Cell;
pub use color::Rgba;
pub use frame::FrameImage;
pub use spark::{PointerSample, Spark, SPARK_SENTINEL};
pub use vec2::Vec2;
