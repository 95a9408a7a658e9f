use bevy::color::Color;
use bevy::math::Vec3;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContactShadowSettings {
    pub opacity: f32,
    /// Edge length of the shadow square in world units.
    pub scale: f32,
    pub blur: f32,
    /// Height above the plane beyond which geometry casts nothing.
    pub far: f32,
    pub resolution: u32,
    pub color: Color,
    pub position: Vec3,
}

pub const CONTACT_SHADOWS: ContactShadowSettings = ContactShadowSettings {
    opacity: 0.5,
    scale: 10.0,
    blur: 1.0,
    far: 10.0,
    resolution: 256,
    color: Color::BLACK,
    position: Vec3::ZERO,
};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AccumulativeShadowSettings {
    /// Accumulate one batch of light samples per frame instead of all at once.
    pub temporal: bool,
    pub frames: u32,
    pub alpha_test: f32,
    pub scale: f32,
    pub position: Vec3,
    pub resolution: u32,
    pub color: Color,
    pub opacity: f32,
}

pub const ACCUMULATIVE_SHADOWS: AccumulativeShadowSettings = AccumulativeShadowSettings {
    temporal: true,
    frames: 60,
    alpha_test: 0.85,
    scale: 10.0,
    position: Vec3::new(0.0, -0.5, 0.0),
    resolution: 512,
    color: Color::BLACK,
    opacity: 1.0,
};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RandomizedLightSettings {
    /// Light samples taken per accumulated frame.
    pub amount: u32,
    /// Jitter radius around `position`.
    pub radius: f32,
    pub intensity: f32,
    /// Probability that a sample comes from the upper hemisphere instead.
    pub ambient: f32,
    pub position: Vec3,
    pub seed: u64,
}

pub const RANDOMIZED_LIGHT: RandomizedLightSettings = RandomizedLightSettings {
    amount: 8,
    radius: 5.0,
    intensity: 0.5,
    ambient: 0.5,
    position: Vec3::new(5.0, 5.0, -10.0),
    seed: 0x5EED_5AD0,
};
