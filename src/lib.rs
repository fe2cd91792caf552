//! Ornament cluster physics scene
//!
//! A few dozen baubles are pulled toward the origin inside an open-sided box
//! and can be pushed around with a pointer-driven kinematic sphere.  The
//! physics runs on Rapier through `bevy_rapier3d`; rendering uses Bevy's PBR
//! pipeline with an environment map and screen-space ambient occlusion.

pub mod assets;
pub mod boundary;
pub mod config;
pub mod constants;
pub mod error;
pub mod ornament;
pub mod pointer;
pub mod scene;
pub mod simulation;
pub mod test_mode;
pub mod testing;
