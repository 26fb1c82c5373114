// View handle - how the controller reaches whatever renders the state
//
// Two verbs are enough: refresh redraws the workspace summary after a
// state change, reload rebuilds everything including menu labels after a
// language switch. Implementations must not call back into the controller.

/// Rendering seam consumed by the controller.
#[cfg_attr(test, mockall::automock)]
pub trait ViewHandle: Send + Sync {
    /// Redraw the workspace from current state.
    fn refresh(&self);

    /// Rebuild the whole surface, menu labels included.
    fn reload(&self);
}
