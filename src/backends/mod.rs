// SPDX-License-Identifier: GPL-3.0-only

//! Platform service backends
//!
//! Everything the UI treats as an opaque platform concern lives here: the
//! camera framework seam and the shutter sound output.

pub mod audio;
pub mod camera;
