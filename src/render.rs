/// `vello_cpu` drawing wrapper and scratch pixel buffers.
pub mod raster;
/// Double-buffered surfaces and presented frame snapshots.
pub mod surface;
/// Overlay text via Parley.
pub mod text;
