//! Physics module
//!
//! Collision queries for the locomotion core. There is no rigid-body
//! simulation here: one viewpoint moves against static geometry that is
//! sampled with rays on demand.
//!
//! # Unit System
//!
//! **1 unit = 1 meter**
//!
//! # Submodules
//!
//! - [`types`] - Core mathematical types (Vec2, Vec3) re-exported from glam
//! - [`collision`] - Ray-AABB intersection, collision layers and the [`CollisionQuery`] seam

pub mod collision;
pub mod types;

pub use collision::{
    CollisionLayer, CollisionQuery, EmptyWorld, RayHit, SceneBox, SceneError, StaticScene,
    aabb_surface_normal, ray_aabb_intersect,
};
pub use types::{Vec2, Vec3};
