use axum::Router;

/// A service module that contributes HTTP routes.
///
/// Each business module (auth, staff) implements this trait. The server
/// binary collects all modules and merges their routes into one Router.
pub trait Module: Send + Sync {
    /// Module name, used for logging.
    fn name(&self) -> &str;

    /// Return the module's routes, already bound to their state.
    fn routes(&self) -> Router;
}
