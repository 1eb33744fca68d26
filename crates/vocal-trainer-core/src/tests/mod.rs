mod player;
mod recorder;
