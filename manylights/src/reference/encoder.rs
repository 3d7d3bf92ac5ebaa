use std::fmt;

use log::trace;

struct Command {
    label: String,
    run: Box<dyn FnOnce()>,
}

/// Records commands, which get executed only after the encoder is submitted.
pub struct CommandEncoder {
    label: String,
    commands: Vec<Command>,
}

impl CommandEncoder {
    pub(crate) fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            commands: Default::default(),
        }
    }

    pub(crate) fn push(
        &mut self,
        label: impl Into<String>,
        run: impl FnOnce() + 'static,
    ) {
        let label = label.into();

        trace!("Recording `{label}` into `{}`", self.label);

        self.commands.push(Command {
            label,
            run: Box::new(run),
        });
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// Executes recorded commands, one after another, in the order they were
    /// recorded.
    pub(crate) fn flush(&mut self) {
        for command in self.commands.drain(..) {
            #[cfg(feature = "metrics")]
            let tt = std::time::Instant::now();

            (command.run)();

            #[cfg(feature = "metrics")]
            trace!(
                "`{}` took {}",
                command.label,
                humantime::format_duration(tt.elapsed()),
            );

            #[cfg(not(feature = "metrics"))]
            trace!("Executed `{}`", command.label);
        }
    }
}

impl fmt::Debug for CommandEncoder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandEncoder")
            .field("label", &self.label)
            .field(
                "commands",
                &self
                    .commands
                    .iter()
                    .map(|command| &command.label)
                    .collect::<Vec<_>>(),
            )
            .finish()
    }
}
