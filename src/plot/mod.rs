//! Rendering layer: every plot request produces exactly one PNG file.
//!
//! ```text
//!  PlotRequest ──► pairplot::render_basic    (n×n grid, histograms on the diagonal)
//!              ├─► pairplot::render_grouped  (same grid, two-style group palette)
//!              └─► scatter::render           (scatter, optional marginal boxes)
//! ```
//!
//! Drawing happens on an owned pixel [`canvas::Canvas`] that is encoded to
//! PNG and released as soon as the file is written.

pub mod annotate;
pub mod canvas;
pub mod draw;
pub mod pairplot;
pub mod request;
pub mod scatter;

pub use request::{AnnotationMode, PlotKind, PlotRequest};
