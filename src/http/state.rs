use crate::capture::DeviceConfig;
use crate::coach::InterviewCoach;
use std::sync::Arc;

/// Shared application state for HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// The single interview this server hosts
    pub coach: Arc<InterviewCoach>,

    /// Devices requested when the client does not name any
    pub default_devices: DeviceConfig,
}

impl AppState {
    pub fn new(coach: InterviewCoach, default_devices: DeviceConfig) -> Self {
        Self {
            coach: Arc::new(coach),
            default_devices,
        }
    }
}
