mod clip;
mod duration;
mod filename;
mod platform;
mod state_machine;
