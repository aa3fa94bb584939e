//! CLI infrastructure for the NMCS player
//!
//! This module provides the command-line interface for interactive play,
//! batch evaluation, and position analysis.

pub mod commands;
pub mod output;
