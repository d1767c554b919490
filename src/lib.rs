//! Grid Chase - steer a runner across a wrapping grid, grab the bonus,
//! dodge the hazards
//!
//! This library provides:
//! - Core game logic (game module): tick stepping, collision resolution,
//!   bonus/hazard placement, score-driven speed
//! - Keyboard input mapping (input module)
//! - TUI rendering (render module)
//! - The interactive session loop (modes module)
//! - Per-process session metrics (metrics module)

pub mod game;
pub mod input;
pub mod metrics;
pub mod modes;
pub mod render;
