/// Marker trait for published state.
///
/// `PartialEq` lets publishers skip notifying subscribers when a transition
/// leaves the state unchanged.
pub trait UiState: Clone + PartialEq + Default + Send + Sync + 'static {}
