//! Furl Core
//!
//! Foundational primitives shared by the Furl crates:
//!
//! - **Geometry**: Integer pixel rectangles and gravity placement
//! - **Events**: Nested-scroll protocol vocabulary (axes, scroll types, event ids)
//! - **Errors**: The error type for configuration and coordinator lookups
//!
//! # Example
//!
//! ```rust
//! use furl_core::{Gravity, Rect};
//!
//! let container = Rect::new(0, 100, 320, 600);
//! let placed = Gravity::NONE.apply(320, 200, container);
//! assert_eq!(placed, Rect::new(0, 100, 320, 300));
//! ```

pub mod error;
pub mod events;
pub mod geometry;

pub use error::{FurlError, Result};
pub use events::{EventType, ScrollAxes, ScrollType, VerticalDirection};
pub use geometry::{Gravity, HorizontalGravity, Insets, Rect, VerticalGravity};
