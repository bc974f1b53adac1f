mod device_select;
mod log_viewer;

pub use device_select::DeviceSelectScreen;
pub use log_viewer::LogViewerScreen;
