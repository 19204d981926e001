pub mod playback;
pub mod player;
pub mod script;
pub mod store;
pub mod types;
