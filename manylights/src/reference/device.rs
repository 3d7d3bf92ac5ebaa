use log::debug;

use super::CommandEncoder;
use crate::memory::{Allocation, MemoryBudget};
use crate::Error;

#[derive(Debug, Default)]
pub struct Device {
    memory: MemoryBudget,
}

impl Device {
    pub(crate) fn with_memory_budget(self, budget: Option<usize>) -> Self {
        debug!("Using memory budget: {budget:?}");

        Self {
            memory: MemoryBudget::new(budget),
        }
    }

    pub fn allocated(&self) -> usize {
        self.memory.allocated()
    }

    pub fn budget(&self) -> Option<usize> {
        self.memory.limit()
    }

    pub(crate) fn allocate(
        &self,
        label: &str,
        size: usize,
    ) -> Result<Allocation, Error> {
        self.memory.allocate(label, size)
    }

    pub(crate) fn create_command_encoder(&self, label: &str) -> CommandEncoder {
        CommandEncoder::new(label)
    }

    pub(crate) fn submit(&self, mut encoder: CommandEncoder) {
        encoder.flush();
    }
}
