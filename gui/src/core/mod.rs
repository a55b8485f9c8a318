pub mod gui;
pub mod view2d;
pub mod view3d;
