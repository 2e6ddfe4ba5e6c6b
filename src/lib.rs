//! Voxseg - an editing engine for volumetric segmentation masks

pub mod core;
pub mod math;
pub mod volume;
pub mod view;
pub mod brush;
pub mod segmentation;
