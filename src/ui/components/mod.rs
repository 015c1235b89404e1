pub mod controls;
pub mod gauge;
pub mod player;
pub mod progress;
pub mod sidebar;
pub mod spinner;
pub mod text_input;
pub mod track_list;
