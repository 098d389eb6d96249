pub mod error;
pub mod light;
pub mod registry;
pub mod scenario;

pub use error::{Result, SignalError};
pub use light::TrafficLight;
pub use registry::{analysis_report, TrafficLightRegistry, OPTIMIZED_TIMING_SECS};
