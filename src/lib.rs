//! Workspace facade crate.
//!
//! Exposes feature flags that map onto the individual workspace crates
//! (`core-auth`, `core-runtime`, `bridge-desktop`). Host applications can depend
//! on `authkit-workspace` and enable the documented features without wiring each
//! crate individually.

pub use bridge_traits;

#[cfg(feature = "desktop-shims")]
pub use core_auth;

#[cfg(feature = "desktop-shims")]
pub use core_runtime;

#[cfg(any(feature = "desktop-shims", feature = "secure-store"))]
pub use bridge_desktop;
