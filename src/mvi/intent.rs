/// Marker trait for intents.
///
/// An intent is either something the user asked for (a query edit) or
/// something the runtime observed (a request dispatched, a response settled).
pub trait Intent: Send + 'static {}
