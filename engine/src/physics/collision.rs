//! Collision query module
//!
//! The locomotion core never resolves contacts. It only asks forward-looking
//! questions of the static world: "does a ray from here, in this direction,
//! hit anything on this layer within this distance?". This module provides
//! the seam for that question ([`CollisionQuery`]) and a box-based world that
//! answers it ([`StaticScene`]).
//!
//! # Ray-AABB Intersection
//!
//! The slab method is used for ray-AABB intersection, which finds the
//! intersection points by computing entry and exit times for each axis.
//!
//! # Example
//!
//! ```ignore
//! use xr_mover_engine::physics::{CollisionLayer, CollisionQuery, SceneBox, StaticScene};
//! use glam::Vec3;
//!
//! let mut scene = StaticScene::new();
//! scene.add_box(SceneBox::new(
//!     CollisionLayer::Ground,
//!     Vec3::new(-50.0, -1.0, -50.0),
//!     Vec3::new(50.0, 0.0, 50.0),
//! ));
//!
//! if let Some(hit) = scene.ray_cast(Vec3::new(0.0, 2.0, 0.0), -Vec3::Y, 2.5, CollisionLayer::Ground) {
//!     println!("Ground at height {}", hit.point.y);
//! }
//! ```

use std::fmt;
use std::path::Path;

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Collision geometry category.
///
/// Every query targets exactly one layer, so walkable terrain and blocking
/// geometry never answer for each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CollisionLayer {
    /// Walkable surfaces used for height-following and landing.
    Ground,
    /// Geometry that blocks motion outright.
    NoGo,
}

/// Result of a successful ray cast.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    /// World-space position where the ray met the geometry
    pub point: Vec3,
    /// Surface normal at the hit point (normalized)
    pub normal: Vec3,
    /// Distance from ray origin to hit point
    pub distance: f32,
}

impl RayHit {
    /// Creates a new RayHit with the given parameters.
    pub fn new(point: Vec3, normal: Vec3, distance: f32) -> Self {
        Self {
            point,
            normal,
            distance,
        }
    }
}

/// Synchronous ray queries against static geometry.
///
/// Implementations must answer within the calling frame. A `None` answer is
/// the normal "nothing there" outcome, not an error.
pub trait CollisionQuery {
    /// Cast a ray and return the closest hit on `layer` within `max_distance`.
    ///
    /// `direction` does not need to be normalized. A zero-length direction
    /// never hits.
    fn ray_cast(
        &self,
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
        layer: CollisionLayer,
    ) -> Option<RayHit>;

    /// Whether the ray hits anything on `layer`.
    fn ray_test(&self, origin: Vec3, direction: Vec3, max_distance: f32, layer: CollisionLayer) -> bool {
        self.ray_cast(origin, direction, max_distance, layer).is_some()
    }
}

impl<Q: CollisionQuery + ?Sized> CollisionQuery for &Q {
    fn ray_cast(
        &self,
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
        layer: CollisionLayer,
    ) -> Option<RayHit> {
        (**self).ray_cast(origin, direction, max_distance, layer)
    }
}

impl<Q: CollisionQuery + ?Sized> CollisionQuery for Box<Q> {
    fn ray_cast(
        &self,
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
        layer: CollisionLayer,
    ) -> Option<RayHit> {
        (**self).ray_cast(origin, direction, max_distance, layer)
    }
}

/// A world with no geometry at all. Every query misses.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmptyWorld;

impl CollisionQuery for EmptyWorld {
    fn ray_cast(&self, _: Vec3, _: Vec3, _: f32, _: CollisionLayer) -> Option<RayHit> {
        None
    }
}

/// Performs ray-AABB (Axis-Aligned Bounding Box) intersection test using the slab method.
///
/// The slab method works by finding the intersection of the ray with each pair of
/// axis-aligned planes that make up the AABB. If the ray enters and exits the AABB
/// at valid times (t_enter < t_exit and t_exit > 0), there is an intersection.
///
/// # Arguments
///
/// * `ray_origin` - Starting point of the ray
/// * `ray_dir` - Direction of the ray (must be normalized)
/// * `aabb_min` - Minimum corner of the AABB
/// * `aabb_max` - Maximum corner of the AABB
///
/// # Returns
///
/// * `Some(t)` - Distance along the ray to the intersection point (t >= 0)
/// * `None` - No intersection or intersection is behind the ray origin
pub fn ray_aabb_intersect(
    ray_origin: Vec3,
    ray_dir: Vec3,
    aabb_min: Vec3,
    aabb_max: Vec3,
) -> Option<f32> {
    // Near-zero components get huge inverse values so their slab never limits t
    let inv_dir = Vec3::new(
        if ray_dir.x.abs() > 1e-10 { 1.0 / ray_dir.x } else { f32::MAX * ray_dir.x.signum() },
        if ray_dir.y.abs() > 1e-10 { 1.0 / ray_dir.y } else { f32::MAX * ray_dir.y.signum() },
        if ray_dir.z.abs() > 1e-10 { 1.0 / ray_dir.z } else { f32::MAX * ray_dir.z.signum() },
    );

    let t1 = (aabb_min - ray_origin) * inv_dir;
    let t2 = (aabb_max - ray_origin) * inv_dir;

    let t_min = t1.min(t2).max_element();
    let t_max = t1.max(t2).min_element();

    if t_max >= t_min && t_max >= 0.0 {
        if t_min >= 0.0 {
            Some(t_min)
        } else {
            // Ray starts inside the AABB
            Some(t_max)
        }
    } else {
        None
    }
}

/// Computes the outward surface normal for a point on an AABB surface.
pub fn aabb_surface_normal(point: Vec3, aabb_min: Vec3, aabb_max: Vec3) -> Vec3 {
    let center = (aabb_min + aabb_max) * 0.5;
    let half_extents = ((aabb_max - aabb_min) * 0.5).max(Vec3::splat(1e-6));
    let normalized = (point - center) / half_extents;

    // Closest face has the highest absolute normalized coordinate
    let abs_normalized = normalized.abs();

    if abs_normalized.x >= abs_normalized.y && abs_normalized.x >= abs_normalized.z {
        Vec3::new(normalized.x.signum(), 0.0, 0.0)
    } else if abs_normalized.y >= abs_normalized.z {
        Vec3::new(0.0, normalized.y.signum(), 0.0)
    } else {
        Vec3::new(0.0, 0.0, normalized.z.signum())
    }
}

// =============================================================================
// StaticScene - layered boxes
// =============================================================================

/// One axis-aligned box of collision geometry.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SceneBox {
    pub layer: CollisionLayer,
    pub min: Vec3,
    pub max: Vec3,
}

impl SceneBox {
    /// Creates a box from two corners, in any order.
    pub fn new(layer: CollisionLayer, a: Vec3, b: Vec3) -> Self {
        Self {
            layer,
            min: a.min(b),
            max: a.max(b),
        }
    }

    /// A flat slab of walkable ground whose top face sits at `height`.
    pub fn ground_slab(center: Vec3, half_extent: f32, height: f32) -> Self {
        Self::new(
            CollisionLayer::Ground,
            Vec3::new(center.x - half_extent, height - 1.0, center.z - half_extent),
            Vec3::new(center.x + half_extent, height, center.z + half_extent),
        )
    }

    /// Whether `point` lies inside or on the box.
    pub fn contains(&self, point: Vec3) -> bool {
        point.cmpge(self.min).all() && point.cmple(self.max).all()
    }
}

/// Errors raised while loading a scene description.
#[derive(Debug)]
pub enum SceneError {
    /// Standard I/O error.
    IoError(std::io::Error),
    /// JSON deserialization error.
    JsonError(serde_json::Error),
}

impl fmt::Display for SceneError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SceneError::IoError(e) => write!(f, "IO error: {e}"),
            SceneError::JsonError(e) => write!(f, "JSON error: {e}"),
        }
    }
}

impl std::error::Error for SceneError {}

impl From<std::io::Error> for SceneError {
    fn from(e: std::io::Error) -> Self {
        SceneError::IoError(e)
    }
}

impl From<serde_json::Error> for SceneError {
    fn from(e: serde_json::Error) -> Self {
        SceneError::JsonError(e)
    }
}

/// Static collision world made of layered boxes.
///
/// Rays that start inside a box do not report that box.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StaticScene {
    boxes: Vec<SceneBox>,
}

impl StaticScene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a scene from a JSON document of the form `{"boxes": [...]}`.
    pub fn from_json_str(json: &str) -> Result<Self, SceneError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a scene from a JSON file.
    pub fn from_json_file(path: &Path) -> Result<Self, SceneError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    pub fn add_box(&mut self, scene_box: SceneBox) -> &mut Self {
        self.boxes.push(scene_box);
        self
    }

    /// Builder-style variant of [`StaticScene::add_box`].
    pub fn with_box(mut self, scene_box: SceneBox) -> Self {
        self.boxes.push(scene_box);
        self
    }

    pub fn len(&self) -> usize {
        self.boxes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.boxes.is_empty()
    }

    pub fn boxes(&self) -> &[SceneBox] {
        &self.boxes
    }
}

impl CollisionQuery for StaticScene {
    fn ray_cast(
        &self,
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
        layer: CollisionLayer,
    ) -> Option<RayHit> {
        let direction = direction.try_normalize()?;
        let mut closest: Option<RayHit> = None;
        let mut closest_dist = max_distance;

        for scene_box in self.boxes.iter().filter(|b| b.layer == layer) {
            if scene_box.contains(origin) {
                continue;
            }
            if let Some(t) = ray_aabb_intersect(origin, direction, scene_box.min, scene_box.max) {
                if t >= 0.0 && t <= closest_dist {
                    let point = origin + direction * t;
                    let normal = aabb_surface_normal(point, scene_box.min, scene_box.max);
                    closest = Some(RayHit::new(point, normal, t));
                    closest_dist = t;
                }
            }
        }

        closest
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ray_hits_aabb_from_front() {
        let origin = Vec3::new(0.0, 0.0, -5.0);
        let dir = Vec3::new(0.0, 0.0, 1.0);
        let aabb_min = Vec3::new(-1.0, -1.0, -1.0);
        let aabb_max = Vec3::new(1.0, 1.0, 1.0);

        let result = ray_aabb_intersect(origin, dir, aabb_min, aabb_max);
        assert!(result.is_some());
        let t = result.unwrap();
        assert!((t - 4.0).abs() < 0.001, "Expected t=4.0, got t={}", t);
    }

    #[test]
    fn test_ray_misses_aabb() {
        let origin = Vec3::new(0.0, 5.0, -5.0);
        let dir = Vec3::new(0.0, 0.0, 1.0);

        let result = ray_aabb_intersect(origin, dir, Vec3::splat(-1.0), Vec3::splat(1.0));
        assert!(result.is_none());
    }

    #[test]
    fn test_ray_aabb_behind_origin() {
        let origin = Vec3::new(0.0, 0.0, 5.0);
        let dir = Vec3::new(0.0, 0.0, 1.0);

        let result = ray_aabb_intersect(origin, dir, Vec3::splat(-1.0), Vec3::splat(1.0));
        assert!(result.is_none());
    }

    #[test]
    fn test_surface_normal_y_face() {
        let normal = aabb_surface_normal(
            Vec3::new(0.2, 1.0, -0.3),
            Vec3::splat(-1.0),
            Vec3::splat(1.0),
        );
        assert_eq!(normal, Vec3::Y);
    }

    #[test]
    fn test_scene_filters_by_layer() {
        let scene = StaticScene::new().with_box(SceneBox::ground_slab(Vec3::ZERO, 10.0, 0.0));

        let down = -Vec3::Y;
        let origin = Vec3::new(0.0, 2.0, 0.0);
        let ground = scene.ray_cast(origin, down, 2.5, CollisionLayer::Ground);
        assert!(ground.is_some());
        assert!(ground.unwrap().point.y.abs() < 0.001);
        assert!(scene.ray_cast(origin, down, 2.5, CollisionLayer::NoGo).is_none());
    }

    #[test]
    fn test_scene_respects_max_distance() {
        let scene = StaticScene::new().with_box(SceneBox::ground_slab(Vec3::ZERO, 10.0, 0.0));

        assert!(!scene.ray_test(Vec3::new(0.0, 3.0, 0.0), -Vec3::Y, 2.5, CollisionLayer::Ground));
        assert!(scene.ray_test(Vec3::new(0.0, 3.0, 0.0), -Vec3::Y, 3.0, CollisionLayer::Ground));
    }

    #[test]
    fn test_scene_returns_closest_hit() {
        let scene = StaticScene::new()
            .with_box(SceneBox::new(
                CollisionLayer::NoGo,
                Vec3::new(-1.0, 0.0, -6.0),
                Vec3::new(1.0, 3.0, -5.0),
            ))
            .with_box(SceneBox::new(
                CollisionLayer::NoGo,
                Vec3::new(-1.0, 0.0, -3.0),
                Vec3::new(1.0, 3.0, -2.0),
            ));

        let hit = scene
            .ray_cast(Vec3::new(0.0, 1.0, 0.0), -Vec3::Z, 10.0, CollisionLayer::NoGo)
            .unwrap();
        assert!((hit.distance - 2.0).abs() < 0.001);
        assert_eq!(hit.normal, Vec3::Z);
    }

    #[test]
    fn test_ray_starting_inside_box_is_ignored() {
        let scene = StaticScene::new().with_box(SceneBox::new(
            CollisionLayer::NoGo,
            Vec3::splat(-1.0),
            Vec3::splat(1.0),
        ));

        assert!(!scene.ray_test(Vec3::ZERO, Vec3::X, 5.0, CollisionLayer::NoGo));
    }

    #[test]
    fn test_zero_direction_never_hits() {
        let scene = StaticScene::new().with_box(SceneBox::ground_slab(Vec3::ZERO, 10.0, 0.0));
        assert!(!scene.ray_test(Vec3::new(0.0, 1.0, 0.0), Vec3::ZERO, 5.0, CollisionLayer::Ground));
    }

    #[test]
    fn test_scene_from_json() {
        let json = r#"{"boxes": [{"layer": "no_go", "min": [0.0, 0.0, 0.0], "max": [1.0, 1.0, 1.0]}]}"#;
        let scene = StaticScene::from_json_str(json).unwrap();
        assert_eq!(scene.len(), 1);
        assert_eq!(scene.boxes()[0].layer, CollisionLayer::NoGo);
    }

    #[test]
    fn test_empty_world_never_hits() {
        assert!(!EmptyWorld.ray_test(Vec3::ZERO, -Vec3::Y, 100.0, CollisionLayer::Ground));
    }
}
