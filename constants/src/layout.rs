use bevy::prelude::*;

/// Thirteen evenly spread unit directions used to place subnodes in
/// concentric shells inside a constellation sphere.
pub const METATRON_CUBE: [Vec3; 13] = [
    Vec3::new(1.0, 0.0, 0.0),
    Vec3::new(-1.0, 0.0, 0.0),
    Vec3::new(0.0, 1.0, 0.0),
    Vec3::new(0.0, -1.0, 0.0),
    Vec3::new(0.0, 0.0, 1.0),
    Vec3::new(0.0, 0.0, -1.0),
    Vec3::new(0.5, 0.5, 0.5),
    Vec3::new(-0.5, 0.5, 0.5),
    Vec3::new(0.5, -0.5, 0.5),
    Vec3::new(-0.5, -0.5, 0.5),
    Vec3::new(0.5, 0.5, -0.5),
    Vec3::new(-0.5, 0.5, -0.5),
    Vec3::new(0.5, -0.5, -0.5),
];

/// Family sphere radius = BASE + SCALE * sqrt(subnode count).
pub const FAMILY_RADIUS_BASE: f32 = 4.0;
pub const FAMILY_RADIUS_SCALE: f32 = 2.0;

/// Constellation sphere radius = BASE + SCALE * sqrt(subnode count).
pub const CONST_RADIUS_BASE: f32 = 4.0;
pub const CONST_RADIUS_SCALE: f32 = 1.6;

/// Clearance kept between a constellation sphere and its family boundary.
pub const CONST_MARGIN: f32 = 0.5;

/// Clearance kept between a subnode sphere and its constellation boundary.
pub const SUBNODE_SHELL_MARGIN: f32 = 0.25;

/// Global family placement radius is scaled down so families sit closer
/// to the core than the raw non-overlap bound would place them.
pub const FAMILY_PLACEMENT_SCALE: f32 = 0.6;
