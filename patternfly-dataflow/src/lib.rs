//! Reactive coordination state for PatternFly-style collection widgets.
//!
//! The crate pairs an Actor+Relay dataflow layer with the coordination
//! domains behind toolbar bulk-select, sort options, pagination, navigation
//! expandable groups, chip groups, and numeric badges. Rendering, CSS class
//! wiring, ARIA attributes, and routing itself belong to the host UI layer;
//! everything here is headless state exposing command sinks (relays and
//! their convenience methods) and reactive projections (signals).

pub mod badge;
pub mod chip_group;
pub mod dataflow;
pub mod expansion;
pub mod item_store;
pub mod navigation;
pub mod toolbar;
pub mod types;

pub use badge::BadgeBounds;
pub use chip_group::{ChipGroup, DEFAULT_CHIP_LIMIT};
pub use dataflow::{Actor, ActorVec, ActorVecHandle, Relay, RelayError, Task, TaskHandle, relay};
pub use expansion::Expandable;
pub use item_store::{Comparator, IdProvider, ItemStore, Items, PageInfo, SortInfo};
pub use navigation::{ExpandableGroup, Navigation, RoutePredicate, Router};
pub use toolbar::{BulkSelect, PreSelection, SortOptions, SortSelection};
pub use types::TriState;
