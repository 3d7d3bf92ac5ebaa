use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use log::trace;

use crate::Error;

/// Keeps track of how much device memory the engine has allocated, so that
/// running out of the budget is observable (and recoverable) before the
/// driver gets involved.
#[derive(Debug, Default)]
pub(crate) struct MemoryBudget {
    limit: Option<usize>,
    allocated: Arc<AtomicUsize>,
}

impl MemoryBudget {
    pub fn new(limit: Option<usize>) -> Self {
        Self {
            limit,
            allocated: Default::default(),
        }
    }

    pub fn limit(&self) -> Option<usize> {
        self.limit
    }

    pub fn allocated(&self) -> usize {
        self.allocated.load(Ordering::Relaxed)
    }

    pub fn allocate(&self, label: &str, size: usize) -> Result<Allocation, Error> {
        let allocated = self.allocated();

        if let Some(limit) = self.limit {
            let available = limit.saturating_sub(allocated);

            if size > available {
                return Err(Error::OutOfMemory {
                    label: label.to_owned(),
                    requested: size,
                    available,
                });
            }
        }

        trace!("Allocated `{label}`; size={size}, total={}", allocated + size);

        self.allocated.fetch_add(size, Ordering::Relaxed);

        Ok(Allocation {
            size,
            allocated: Arc::clone(&self.allocated),
        })
    }
}

/// Piece of the budget held by a buffer or a texture; given back when
/// dropped.
#[derive(Debug)]
pub(crate) struct Allocation {
    size: usize,
    allocated: Arc<AtomicUsize>,
}

impl Drop for Allocation {
    fn drop(&mut self) {
        self.allocated.fetch_sub(self.size, Ordering::Relaxed);
    }
}
