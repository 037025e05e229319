//! 2D vector and angle math for battlefield geometry.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

pub mod angle;
pub mod vec2;

pub use angle::{diff, from_direction, lerp, lerp_360, normalize_180, normalize_360, to_direction};
pub use vec2::Vec2;
