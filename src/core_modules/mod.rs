pub mod grid;
pub mod oklab;
pub mod pixel;
pub mod placeholder;
pub mod quantizer;
