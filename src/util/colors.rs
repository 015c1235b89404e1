use ratatui::style::Color;

pub const PRIMARY: Color = Color::from_u32(0x008b5cf6);
pub const SECONDARY: Color = Color::from_u32(0x00db2777);
pub const NEUTRAL: Color = Color::from_u32(0x00525252);
pub const BACKGROUND: Color = Color::from_u32(0x00110d1f);
pub const BUFFERED: Color = Color::from_u32(0x003b2a63);
pub const TEXT: Color = Color::from_u32(0x00e5e5e5);
pub const SUCCESS: Color = Color::from_u32(0x0022c55e);
pub const ERROR: Color = Color::from_u32(0x00ef4444);
pub const FAVORITE: Color = Color::from_u32(0x00f43f5e);
