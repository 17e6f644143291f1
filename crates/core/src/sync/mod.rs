mod reconciler;

pub use reconciler::{PullError, SyncReconciler};
