use bevy::color::Color;

pub const PANEL_OFFSET_PX: f32 = 10.0;
pub const PANEL_PADDING_PX: f32 = 10.0;
pub const PANEL_RADIUS_PX: f32 = 5.0;
pub const PANEL_Z_INDEX: i32 = 1;
pub const PANEL_BACKGROUND: Color = Color::srgba(0.0, 0.0, 0.0, 0.7);

pub const BUTTON_BACKGROUND: Color = Color::srgb(0.94, 0.94, 0.94);
pub const BUTTON_HOVER_BACKGROUND: Color = Color::srgb(0.85, 0.85, 0.85);
pub const BUTTON_TEXT_COLOR: Color = Color::srgb(0.1, 0.1, 0.1);
pub const BUTTON_FONT_SIZE: f32 = 14.0;

pub const RESET_LABEL: &str = "Reset Scene";
pub const RETRY_LABEL: &str = "Retry";
