// SPDX-License-Identifier: GPL-3.0-only

//! Integration tests for configuration module

use spyglass::{Config, LensFacing};

#[test]
fn test_config_default() {
    let config = Config::default();

    // Check sensible defaults
    assert_eq!(
        config.last_facing,
        LensFacing::Back,
        "Back camera should be the default selector"
    );
    assert!(
        config.shutter_sound,
        "Shutter sound should be enabled by default"
    );
}

#[test]
fn test_config_restores_flipped_facing() {
    let mut config = Config::default();
    config.last_facing = config.last_facing.flipped();
    assert_eq!(config.last_facing, LensFacing::Front);
}
