use bevy::math::Vec2;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BloomSettings {
    pub intensity: f32,
    pub luminance_threshold: f32,
    pub luminance_smoothing: f32,
}

pub const BLOOM: BloomSettings = BloomSettings {
    intensity: 0.5,
    luminance_threshold: 0.9,
    luminance_smoothing: 0.9,
};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChromaticAberrationSettings {
    /// Red/blue channel displacement in UV units.
    pub offset: Vec2,
}

pub const CHROMATIC_ABERRATION: ChromaticAberrationSettings = ChromaticAberrationSettings {
    offset: Vec2::new(0.002, 0.002),
};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VignetteSettings {
    pub darkness: f32,
    pub offset: f32,
}

pub const VIGNETTE: VignetteSettings = VignetteSettings {
    darkness: 0.5,
    offset: 0.1,
};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DepthOfFieldSettings {
    /// Focus distance as a fraction of the camera far plane.
    pub focus_distance: f32,
    /// Focal range as a fraction of the camera far plane.
    pub focal_length: f32,
    pub bokeh_scale: f32,
}

pub const DEPTH_OF_FIELD: DepthOfFieldSettings = DepthOfFieldSettings {
    focus_distance: 0.01,
    focal_length: 0.2,
    bokeh_scale: 3.0,
};

/// MSAA sample count requested by the second post-processing stage.
pub const MULTISAMPLING: u32 = 8;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NoiseSettings {
    pub opacity: f32,
}

pub const NOISE: NoiseSettings = NoiseSettings { opacity: 0.025 };
