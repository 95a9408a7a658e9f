/// Bundled model, relative to the asset root.
pub const MODEL_PATH: &str = "models/model.glb";

pub const CHROMATIC_ABERRATION_SHADER_PATH: &str = "shaders/chromatic_aberration.wgsl";
pub const VIGNETTE_SHADER_PATH: &str = "shaders/vignette.wgsl";
pub const FILM_GRAIN_SHADER_PATH: &str = "shaders/film_grain.wgsl";
