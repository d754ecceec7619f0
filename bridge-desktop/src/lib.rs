//! # Desktop Bridge Implementations
//!
//! Navigation bar surfaces for desktop platforms (macOS, Windows, Linux).
//!
//! ## Overview
//!
//! Desktops have no system navigation bar, so this crate ships two surfaces:
//! - `DesktopNavigationBar`: the honest desktop answer, every call reports
//!   `BridgeError::NotAvailable`
//! - `EmulatedNavigationBar`: an in-memory Android-like bar for previews and
//!   tests, including visibility change notifications
//!
//! ## Usage
//!
//! ```ignore
//! use bridge_desktop::EmulatedNavigationBar;
//! use bridge_traits::{NavigationBarSurface, Visibility};
//!
//! #[tokio::main]
//! async fn main() {
//!     let bar = EmulatedNavigationBar::new();
//!     bar.set_visibility(Visibility::Hidden).await.unwrap();
//! }
//! ```

mod desktop;
mod emulated;

pub use desktop::DesktopNavigationBar;
pub use emulated::{EmulatedNavigationBar, EmulatedState};
