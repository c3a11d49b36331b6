pub mod model;
pub mod mood;
pub mod scene;
pub mod theme;
