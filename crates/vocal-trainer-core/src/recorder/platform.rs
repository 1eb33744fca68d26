use crate::recorder::MicrophoneDevice;

/// Operating systems where capture is disabled up front.
const UNSUPPORTED_OS: &[&str] = &["ios"];

/// Whether recording can be offered at all on this machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlatformSupport {
    /// Capture may be attempted.
    Supported,
    /// Capture controls stay disabled.
    Unsupported {
        /// Shown in the warning banner.
        reason: String,
    },
}

impl PlatformSupport {
    /// Decide from the platform signature and input device presence.
    pub fn detect(os: &str, has_input_device: bool) -> Self {
        if UNSUPPORTED_OS.contains(&os) {
            return PlatformSupport::Unsupported {
                reason: format!("Recording is not available on {}.", os),
            };
        }
        if !has_input_device {
            return PlatformSupport::Unsupported {
                reason: "No microphone was found.".to_string(),
            };
        }
        PlatformSupport::Supported
    }

    /// Probe the running platform.
    pub fn current() -> Self {
        Self::detect(std::env::consts::OS, MicrophoneDevice::is_available())
    }

    /// `true` for [`PlatformSupport::Supported`].
    pub fn is_supported(&self) -> bool {
        matches!(self, PlatformSupport::Supported)
    }
}
