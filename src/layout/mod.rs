//! Page Layout Engine
//!
//! This module measures elements on the Courier grid and partitions the
//! document into pages, producing a PageMap with everything the host needs
//! to draw page breaks, margins, and headers.

pub mod measure;
pub mod paginator;

pub use measure::{measure_element, wrapped_line_count, ElementMeasure};
pub use paginator::{LinePos, PageMap, PageMetrics, PageSlice, Paginator, Placement};
