pub mod exporter;
pub mod status;
