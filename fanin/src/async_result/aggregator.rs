use std::sync::Arc;
use std::sync::Weak;

use parking_lot::Mutex;
use tracing::debug;

use crate::async_result::shared::Shared;
use crate::OpError;

/// Delivers all buffered replies and the final error to a batch callback.
///
/// It lives in the final handlers of the shared state, thus it refers to the
/// state weakly. Firing a second time, through a clone or not, does nothing.
pub(crate) struct Aggregator<T, F> {
    keeper: Arc<Mutex<Option<(Weak<Shared<T>>, F)>>>,
}

impl<T, F> Clone for Aggregator<T, F> {
    fn clone(&self) -> Self {
        Self {
            keeper: self.keeper.clone(),
        }
    }
}

impl<T, F> Aggregator<T, F>
where
    T: Clone,
    F: FnOnce(Vec<T>, Option<OpError>),
{
    pub(crate) fn new(shared: &Arc<Shared<T>>, on_all: F) -> Self {
        let weak = Arc::downgrade(shared);
        Self {
            keeper: Arc::new(Mutex::new(Some((weak, on_all)))),
        }
    }

    /// Must not be called while `shared` is locked.
    pub(crate) fn fire(&self, error: Option<OpError>) {
        let Some((weak, on_all)) = self.keeper.lock().take() else {
            debug!("{}: already fired", func_name!());
            return;
        };

        let Some(shared) = weak.upgrade() else {
            debug!("{}: result dropped", func_name!());
            return;
        };

        let results = shared.data.lock().results.clone();
        drop(shared);

        on_all(results, error);
    }
}
