//! Analytic ray-sphere hit testing for subnode picking. No acceleration
//! structure; the candidate set after visibility and LOD filtering is small
//! enough that a linear scan wins.

use bevy::prelude::*;

/// Nearest non-negative intersection parameter of a ray with a sphere, or
/// `None` on a miss. A ray starting inside the sphere reports the exit hit.
pub fn ray_sphere_hit_t(
    origin: Vec3,
    direction: Vec3,
    center: Vec3,
    radius: f32,
) -> Option<f32> {
    let oc = origin - center;
    let a = direction.length_squared();
    if a <= f32::EPSILON {
        return None;
    }
    let half_b = oc.dot(direction);
    let c = oc.length_squared() - radius * radius;
    let discriminant = half_b * half_b - a * c;
    if discriminant < 0.0 {
        return None;
    }
    let sqrt_d = discriminant.sqrt();
    let t_near = (-half_b - sqrt_d) / a;
    let t_far = (-half_b + sqrt_d) / a;
    if t_far < 0.0 {
        return None;
    }
    Some(if t_near >= 0.0 { t_near } else { t_far })
}

/// Closest candidate along the ray. Ties cannot happen with distinct `t`
/// values; overlapping spheres resolve to whichever surface is nearer.
pub fn nearest_sphere_hit(
    origin: Vec3,
    direction: Vec3,
    candidates: impl IntoIterator<Item = (Entity, Vec3, f32)>,
) -> Option<(Entity, f32)> {
    let mut best: Option<(Entity, f32)> = None;
    for (entity, center, radius) in candidates {
        if let Some(t) = ray_sphere_hit_t(origin, direction, center, radius) {
            if best.is_none_or(|(_, best_t)| t < best_t) {
                best = Some((entity, t));
            }
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn direct_hit_reports_near_surface() {
        let t = ray_sphere_hit_t(Vec3::ZERO, Vec3::Z, Vec3::new(0.0, 0.0, 10.0), 2.0);
        assert!((t.unwrap() - 8.0).abs() < 1e-5);
    }

    #[test]
    fn miss_reports_none() {
        assert!(ray_sphere_hit_t(Vec3::ZERO, Vec3::Z, Vec3::new(5.0, 0.0, 10.0), 2.0).is_none());
    }

    #[test]
    fn sphere_behind_origin_is_ignored() {
        assert!(ray_sphere_hit_t(Vec3::ZERO, Vec3::Z, Vec3::new(0.0, 0.0, -10.0), 2.0).is_none());
    }

    #[test]
    fn origin_inside_sphere_reports_exit() {
        let t = ray_sphere_hit_t(Vec3::ZERO, Vec3::Z, Vec3::ZERO, 3.0);
        assert!((t.unwrap() - 3.0).abs() < 1e-5);
    }

    #[test]
    fn nearest_hit_wins_among_overlapping_candidates() {
        let mut world = World::new();
        let near = world.spawn_empty().id();
        let far = world.spawn_empty().id();
        let hit = nearest_sphere_hit(
            Vec3::ZERO,
            Vec3::Z,
            vec![
                (far, Vec3::new(0.0, 0.0, 20.0), 2.0),
                (near, Vec3::new(0.0, 0.0, 10.0), 2.0),
            ],
        );
        assert_eq!(hit.unwrap().0, near);
    }

    #[test]
    fn empty_candidate_set_misses() {
        assert!(nearest_sphere_hit(Vec3::ZERO, Vec3::Z, Vec::new()).is_none());
    }
}
