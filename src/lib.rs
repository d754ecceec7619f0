//! Workspace placeholder crate.
//!
//! This crate exists to expose shared feature flags that map to the individual
//! workspace crates (`core-navbar`, `core-runtime`, `bridge-desktop`). Host
//! applications can depend on `navbar-workspace` and enable the documented
//! features without needing to wire each crate individually.

pub use core_navbar::*;
