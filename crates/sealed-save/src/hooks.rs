//! Host collaborators notified on reset.
//!
//! Plain closures implement both traits, so hosts without a dedicated type
//! can pass `|| economy.refresh()` or `|index| scenes.load(index)`.

/// Receives a request to re-announce economy values after a reset.
pub trait EconomyBroadcast {
    fn rebroadcast(&self);
}

/// Reloads a scene by index.
pub trait SceneReloader {
    fn reload_scene(&self, index: usize);
}

impl<F: Fn()> EconomyBroadcast for F {
    fn rebroadcast(&self) {
        self()
    }
}

impl<F: Fn(usize)> SceneReloader for F {
    fn reload_scene(&self, index: usize) {
        self(index)
    }
}
