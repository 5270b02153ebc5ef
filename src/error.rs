use std::path::PathBuf;

use plotters::drawing::DrawingAreaErrorKind;

// ---------------------------------------------------------------------------
// Input errors raised while turning a file into a table
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("cannot read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(
        "could not parse {} into more than one column (tried auto-detect, comma, tab, whitespace, semicolon)",
        path.display()
    )]
    Unparseable { path: PathBuf },
}

// ---------------------------------------------------------------------------
// Errors raised while building or saving a plot
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum PlotError {
    #[error("at least {required} numeric columns are required, found {found}")]
    InsufficientColumns { required: usize, found: usize },

    #[error("column '{0}' not found; this plot type requires it")]
    MissingColumn(String),

    #[error("column '{0}' is not numeric")]
    NonNumericColumn(String),

    #[error("rendering failed: {0}")]
    Render(String),

    #[error("writing image failed: {0}")]
    Image(#[from] image::ImageError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl<E: std::error::Error + Send + Sync> From<DrawingAreaErrorKind<E>> for PlotError {
    fn from(err: DrawingAreaErrorKind<E>) -> Self {
        PlotError::Render(err.to_string())
    }
}

// ---------------------------------------------------------------------------
// Interactive prompt errors
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum PromptError {
    /// Input stream closed before a valid answer was given.
    #[error("interrupted")]
    Interrupted,

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
