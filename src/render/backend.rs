pub mod svg;

#[cfg(feature = "raster")]
pub mod raster;
