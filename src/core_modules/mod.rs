pub mod background_matte;
pub mod bounding_box;
pub mod grid_slicer;
pub mod pixel;
pub mod utils;
