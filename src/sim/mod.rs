pub mod event;
pub mod flow;
pub mod level;
pub mod step;
pub mod world;
