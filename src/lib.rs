// -- Lint policy ---------------------------------------------------------
// This is the single source of truth for crate-wide lints.

// Broad lint groups
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![deny(clippy::nursery)]
// Documentation
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]
#![deny(rustdoc::bare_urls)]
// No panicking in library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::todo)]
#![deny(clippy::unimplemented)]
// No debug/print artifacts
#![deny(clippy::dbg_macro)]
#![deny(clippy::print_stdout)]
#![deny(clippy::print_stderr)]
// Import hygiene
#![deny(clippy::wildcard_imports)]
// Complexity limits (thresholds in clippy.toml)
#![deny(clippy::cognitive_complexity)]
#![deny(clippy::too_many_lines)]
#![deny(clippy::excessive_nesting)]
// Function signature hygiene
#![deny(clippy::too_many_arguments)]
#![deny(clippy::fn_params_excessive_bools)]
// Clone / pass-by-value hygiene
#![deny(clippy::needless_pass_by_value)]
#![deny(clippy::implicit_clone)]
// String hygiene
#![deny(clippy::inefficient_to_string)]
#![deny(clippy::redundant_closure_for_method_calls)]
#![deny(clippy::manual_string_new)]
#![deny(clippy::str_to_string)]
// Cargo lints (warn, not deny since cargo lints can be noisy)
#![warn(clippy::cargo)]
// Unused / redundant code
#![deny(unused_results)]
#![deny(unused_qualifications)]
// Cast hygiene
#![deny(trivial_casts)]
#![deny(trivial_numeric_casts)]

//! Image-resource lifecycle cache and camera navigation for a 3D gallery.
//!
//! Galleria preloads a fixed set of images, substitutes deterministic
//! placeholders for anything that fails to load, and drives smooth camera
//! transitions between named gallery viewpoints while arbitrating control
//! with a manual orbit.
//!
//! # Key entry points
//!
//! - [`assets::AssetCache`] - preload, memoized lookup, placeholder padding
//!   and disposal of image resources
//! - [`navigation::NavigationController`] - the `Idle` / `Transitioning`
//!   state machine moving the camera between viewpoints
//! - [`camera::OrbitController`] - damped manual orbit that yields to
//!   navigation
//! - [`options::Options`] - runtime configuration (assets, navigation,
//!   orbit, camera)
//!
//! # Architecture
//!
//! Everything runs on the host's render thread. Image loads are futures
//! joined by [`assets::AssetCache::preload`]; results are written back
//! through a generation check so loads that finish after
//! [`assets::AssetCache::dispose`] are dropped. The navigation controller
//! and the orbit share one [`camera::Camera`]; only one of them writes it
//! on any given frame.

pub mod assets;
pub mod camera;
pub mod error;
pub mod gpu;
pub mod navigation;
pub mod options;
pub mod util;

pub use error::GalleriaError;
