use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Every way an update cycle can fail. None of these are retried; the cycle
/// that produced one is abandoned and the error is handed to the caller.
#[derive(Debug, Error)]
pub enum Error {
    /// A component's `render` returned an error.
    #[error("render failed in component `{component}`")]
    Render {
        component: &'static str,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync + 'static>,
    },

    /// `update`/`set_state` on an instance that was never rendered as a root,
    /// or whose medium has since been dropped.
    #[error("component `{component}` is not mounted")]
    NotMounted { component: &'static str },

    /// The medium is already mutably borrowed: an update was started from
    /// inside another update on the same medium. Updates on other media nest.
    #[error("output medium is busy; re-entrant update rejected")]
    MediumBusy,

    /// Patch was asked to reuse a descriptor that was never placed.
    #[error("descriptor <{0}> has no placement")]
    Unplaced(String),

    /// Partial state must be a JSON object.
    #[error("partial state must be an object, got {0}")]
    InvalidState(&'static str),
}

impl Error {
    pub(crate) fn render(component: &'static str, source: anyhow::Error) -> Self {
        Error::Render {
            component,
            source: source.into(),
        }
    }
}
