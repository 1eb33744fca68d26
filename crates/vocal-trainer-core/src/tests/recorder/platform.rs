use crate::PlatformSupport;

/// WHAT: iOS is flagged unsupported up front
/// WHY: Capture there is known to misbehave, so controls start disabled
#[test]
fn given_ios_signature_when_detecting_then_unsupported() {
    // Given/When: Detecting on iOS with a microphone present
    let support = PlatformSupport::detect("ios", true);

    // Then: Unsupported with a reason for the banner
    assert!(!support.is_supported());
    assert!(matches!(support, PlatformSupport::Unsupported { reason } if reason.contains("ios")));
}

/// WHAT: No input device means unsupported
/// WHY: There is nothing to request permission for
#[test]
fn given_no_input_device_when_detecting_then_unsupported() {
    // Given/When: Detecting on Linux without a microphone
    let support = PlatformSupport::detect("linux", false);

    // Then: Unsupported
    assert!(!support.is_supported());
}

/// WHAT: Desktop platforms with a microphone are supported
/// WHY: The common case must not be blocked
#[test]
fn given_desktop_with_microphone_when_detecting_then_supported() {
    // Given/When: Detecting on macOS with a microphone
    let support = PlatformSupport::detect("macos", true);

    // Then: Supported
    assert_eq!(support, PlatformSupport::Supported);
}
