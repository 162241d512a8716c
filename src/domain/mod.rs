pub mod consts;
pub mod entity;
pub mod grid;
pub mod physics;
