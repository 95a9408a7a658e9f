use bevy::color::Color;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridSettings {
    pub size: f32,
    pub divisions: u32,
    pub center_line_color: Color,
    pub grid_color: Color,
}

pub const GRID: GridSettings = GridSettings {
    size: 100.0,
    divisions: 100,
    center_line_color: Color::srgb(0.4, 0.4, 0.4),
    grid_color: Color::srgb(0.267, 0.267, 0.267),
};

/// Length of each axis line.
pub const AXES_SIZE: f32 = 5.0;

/// Shown in place of the model until it has loaded.
pub const PLACEHOLDER_COLOR: Color = Color::srgb(1.0, 0.412, 0.706);

/// Orientation offset applied to the loaded model, Euler XYZ in radians.
pub const MODEL_ROTATION: [f32; 3] = [80.0, 0.0, 0.0];
