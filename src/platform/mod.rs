//! Platform abstraction layer
//!
//! The AR view needs a rear camera for the background and a gyroscope for
//! aiming. Missing hardware is reported to the player, never retried.

use crate::error::GameError;

/// Hardware capabilities the session depends on
pub trait Platform {
    fn has_rear_camera(&self) -> bool;
    fn has_gyroscope(&self) -> bool;
}

/// Fails with the message to show the player when something is missing
pub fn probe(platform: &dyn Platform) -> Result<(), GameError> {
    if !platform.has_gyroscope() {
        return Err(GameError::DeviceUnavailable("This device does not have Gyroscope"));
    }
    if !platform.has_rear_camera() {
        return Err(GameError::DeviceUnavailable("This device does not have a rear camera"));
    }
    Ok(())
}

/// Desktop/headless runs: pretend both devices are present
#[derive(Debug, Default, Clone, Copy)]
pub struct HeadlessPlatform;

impl Platform for HeadlessPlatform {
    fn has_rear_camera(&self) -> bool {
        true
    }

    fn has_gyroscope(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct NoCamera;

    impl Platform for NoCamera {
        fn has_rear_camera(&self) -> bool {
            false
        }
        fn has_gyroscope(&self) -> bool {
            true
        }
    }

    #[test]
    fn test_probe() {
        assert!(probe(&HeadlessPlatform).is_ok());
        let err = probe(&NoCamera).unwrap_err();
        assert_eq!(err.to_string(), "This device does not have a rear camera");
    }
}
