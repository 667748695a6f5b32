pub mod framing;
pub mod viewer;
