// SPDX-License-Identifier: GPL-3.0-only

//! Integration tests for constants module

use spyglass::constants::{AUTOFOCUS_INDICATOR_MS, CAPTURE_RELATIVE_PATH, overlay, zoom};

#[test]
fn test_indicator_timeout_is_one_second() {
    assert_eq!(AUTOFOCUS_INDICATOR_MS, 1000);
}

#[test]
fn test_capture_path_is_dcim_camera() {
    assert_eq!(CAPTURE_RELATIVE_PATH, "DCIM/Camera");
}

#[test]
fn test_overlay_shrink_keeps_most_of_the_window() {
    // 5% maximum shrink keeps the scope radius within [0.95, 1.0] of base
    assert!(overlay::SHRINK_FRACTION > 0.0);
    assert!(overlay::SHRINK_FRACTION <= 0.05);
}

#[test]
fn test_overlay_dim_is_translucent() {
    assert!(overlay::DIM_ALPHA > 0.0);
    assert!(overlay::DIM_ALPHA < 1.0);
}

#[test]
fn test_zoom_ratio_space_is_sane() {
    assert!(zoom::DEFAULT_RATIO >= 1.0);
    assert!(zoom::MAX_RATIO > zoom::DEFAULT_RATIO);
    assert!(zoom::SCROLL_STEP > 0.0);
}
