/// Device pixel ratio is capped at this value on every window, trading
/// sharpness on high-density displays for frame cost.
pub const MAX_PIXEL_RATIO: f32 = 1.5;

/// LOD distance bands. At or below NEAR a subnode renders in full detail and
/// is hit-test eligible; between NEAR and FAR only a reduced marker renders;
/// at or beyond FAR the entity is culled entirely.
pub const LOD_NEAR_DISTANCE: f32 = 40.0;
pub const LOD_FAR_DISTANCE: f32 = 100.0;

/// Fog overlay tuning. Opacity is near-opaque; each visible subnode cuts a
/// soft circular window of this radius (logical pixels) into the fog.
pub const FOG_OPACITY: f32 = 0.95;
pub const FOG_WINDOW_RADIUS: f32 = 30.0;
pub const FOG_WINDOW_SOFTNESS: f32 = 1.0;
pub const MAX_FOG_WINDOWS: usize = 256;

/// Camera focus distances per target kind, and the canonical home distance
/// used by reset requests.
pub const FAMILY_FOCUS_DISTANCE: f32 = 20.0;
pub const CONSTELLATION_FOCUS_DISTANCE: f32 = 15.0;
pub const SUBNODE_FOCUS_DISTANCE: f32 = 10.0;
pub const CAMERA_HOME_DISTANCE: f32 = 25.0;

/// Focus animation: exponential-decay approach rate, how strongly the rate
/// grows with remaining distance, and the snap-to-goal epsilon.
pub const FOCUS_BASE_RATE: f32 = 3.0;
pub const FOCUS_DISTANCE_GAIN: f32 = 0.05;
pub const FOCUS_EPSILON: f32 = 0.25;

/// Hover presentation: uniform scale boost applied to the hovered subnode.
pub const HOVER_SCALE: f32 = 1.35;

/// Weak intra-constellation connectors per subnode (nearest-k rule).
pub const WEAK_LINKS_PER_NODE: usize = 3;

/// Ambient flare rotation of the core sun, radians per second.
pub const FLARE_ROTATION_RATE: f32 = 0.3;
