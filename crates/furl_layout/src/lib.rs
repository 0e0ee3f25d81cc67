//! Furl Layout
//!
//! Coordinates vertical scrolling between a collapsing multi-row header and
//! the scrollable content laid out beneath it.
//!
//! # Components
//!
//! - [`HeaderView`]: fixed-height rows stacked vertically; reports how much of
//!   itself may be hidden
//! - [`HeaderOffsetController`]: owns the header offset, maps content scroll
//!   deltas to header movement and snaps to the nearest resting state
//! - [`ContentOffsetController`]: keeps the content flush with the header's
//!   visible bottom edge
//! - [`Coordinator`]: the container that lays children out and dispatches
//!   nested-scroll events to their behaviors in order
//!
//! # Example
//!
//! ```rust
//! use furl_core::{ScrollAxes, ScrollType};
//! use furl_layout::{ContentView, Coordinator, HeaderConfig, HeaderState};
//!
//! let mut coordinator = Coordinator::new();
//! let header = coordinator
//!     .add_header(HeaderConfig { anchor_row: 2, ..Default::default() })
//!     .unwrap();
//! let content = coordinator.add_content(ContentView::with_scroll_range(2_000));
//! coordinator.layout(400, 800);
//!
//! coordinator.start_nested_scroll(content, ScrollAxes::VERTICAL, ScrollType::Touch).unwrap();
//! coordinator.scroll(content, 400, ScrollType::Touch).unwrap();
//! coordinator.stop_nested_scroll(content, ScrollType::Touch).unwrap();
//!
//! assert_eq!(coordinator.header_state(header).unwrap(), HeaderState::Collapsed);
//! ```

pub mod behavior;
pub mod content;
pub mod content_behavior;
pub mod coordinator;
pub mod header;
pub mod header_behavior;
pub mod offset;
pub mod state;

pub use behavior::{DispatchOrigin, HeaderLink, NestedScrollBehavior, ScrollCx, TargetScroll};
pub use content::ContentView;
pub use content_behavior::ContentOffsetController;
pub use coordinator::{ChildKind, Coordinator, ScrollOutcome, ViewId};
pub use header::{HeaderConfig, HeaderView};
pub use header_behavior::HeaderOffsetController;
pub use offset::ViewOffset;
pub use state::HeaderState;
