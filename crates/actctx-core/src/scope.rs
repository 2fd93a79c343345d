use crate::backend::ActivationBackend;
use crate::context::ActivationContext;
use crate::error::ActivationError;

/// Keeps an [`ActivationContext`] active until dropped
///
/// If the context was already active when the scope was entered, the scope
/// does not own that activation and leaves it in place on exit.
pub struct ActivationScope<'a, B: ActivationBackend> {
    context: &'a mut ActivationContext<B>,
    owns_activation: bool,
}

impl<'a, B: ActivationBackend> ActivationScope<'a, B> {
    pub(crate) fn enter(context: &'a mut ActivationContext<B>) -> Result<Self, ActivationError> {
        let owns_activation = !context.is_activated();
        context.activate()?;
        Ok(Self {
            context,
            owns_activation,
        })
    }

    pub fn context(&self) -> &ActivationContext<B> {
        self.context
    }

    /// Whether leaving this scope pops the activation
    pub fn owns_activation(&self) -> bool {
        self.owns_activation
    }

    /// Leave the scope, reporting a failed deactivation instead of logging it
    pub fn exit(mut self) -> Result<(), ActivationError> {
        if !std::mem::take(&mut self.owns_activation) {
            return Ok(());
        }
        self.context.deactivate()
    }
}

impl<B: ActivationBackend> Drop for ActivationScope<'_, B> {
    fn drop(&mut self) {
        if !self.owns_activation {
            return;
        }
        if let Err(e) = self.context.deactivate() {
            tracing::warn!(
                path = %self.context.manifest_path().display(),
                "failed to deactivate context on scope exit: {e}"
            );
        }
    }
}
