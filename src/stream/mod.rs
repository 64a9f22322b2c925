// ============================================================================
// ripple-collections - Stream Primitive
// Synchronous multicast streams: Observer, Topic, Subscription
// ============================================================================
//
// The subjects push change sets to subscribers on the caller's thread.
// Emission is re-entrancy safe: observers may subscribe, unsubscribe, or
// complete the topic from inside a callback.
// ============================================================================

mod observer;
mod subscription;
mod topic;

pub use observer::{observer_fn, observer_fn_completed, Observer};
pub use subscription::Subscription;
pub use topic::Topic;
