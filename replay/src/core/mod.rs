pub mod camera;
pub mod clock;
pub mod heading;
pub mod laps;
pub mod normalize;
pub mod replay;
pub mod series;
pub mod status;
