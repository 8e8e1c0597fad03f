pub mod assets;
pub mod camera;
pub mod render;
pub mod scene;
pub mod visibility;
