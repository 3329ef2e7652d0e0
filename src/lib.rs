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
// Complexity limits
#![deny(clippy::cognitive_complexity)]
#![deny(clippy::excessive_nesting)]
// Function signature hygiene
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
// Tests assert on exact float results and unwrap freely
#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used))]

//! Animated N×N×N twisty-cube simulation engine.
//!
//! Cubik keeps the discrete state of a generalized Rubik's cube (which
//! sticker sits on which facelet) exactly consistent while layers turn
//! through smooth, eased animations.
//!
//! # Key entry points
//!
//! - [`engine::CubeEngine`] - facade owning the scheduler, the cube model
//!   and the move state machine
//! - [`cube::Cube`] - piece collection, poses, face colors and persistence
//! - [`moves::MoveController`] - serialized layer turns (`idle → animating`)
//! - [`animation::Scheduler`] - the single frame loop driving all motion
//! - [`geometry`] - procedural rounded-box and sticker meshes
//! - [`options::Options`] - TOML configuration (cube, animation, colors)
//!
//! # Architecture
//!
//! Nothing moves unless the [`animation::Scheduler`] ticks. A move request
//! selects one layer into a transient [`moves::RotationGroup`], registers a
//! [`moves::LayerRotation`] with the scheduler and, once the eased angle
//! reaches its quarter-turn target, bakes the rotation into each piece and
//! snaps position and orientation back onto the grid lattice.

pub mod animation;
pub mod cube;
pub mod engine;
pub mod error;
pub mod geometry;
pub mod moves;
pub mod options;
pub mod util;
