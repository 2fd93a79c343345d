use std::fmt;
use std::path::Path;

use crate::backend::{ActivationBackend, Cookie, NativeBackend, default_backend};
use crate::descriptor::ContextDescriptor;
use crate::error::ActivationError;
use crate::scope::ActivationScope;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextState {
    Uninitialized,
    Initialized,
    Activated,
}

impl fmt::Display for ContextState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Uninitialized => "uninitialized",
            Self::Initialized => "initialized",
            Self::Activated => "activated",
        };
        f.write_str(name)
    }
}

/// An activation context loaded from a manifest
///
/// Activation contexts let a library create COM objects declared in its
/// own manifest (registration-free COM) without the host application
/// embedding that manifest. Create the context once, then activate it
/// around the code that instantiates the COM objects.
///
/// Dropping the value deactivates it if still active and releases the
/// OS context object.
pub struct ActivationContext<B: ActivationBackend = NativeBackend> {
    descriptor: ContextDescriptor,
    backend: B,
    handle: Option<B::Handle>,
    cookie: Option<Cookie>,
}

impl ActivationContext<NativeBackend> {
    /// Context for `manifest_path` backed by the platform's activation API
    pub fn native(manifest_path: impl AsRef<Path>) -> Result<Self, ActivationError> {
        let backend = default_backend()?;
        Ok(Self::new(manifest_path.as_ref(), backend))
    }
}

impl<B: ActivationBackend> ActivationContext<B> {
    /// Store the manifest path. Nothing is created until [`Self::initialize`].
    pub fn new(manifest_path: impl Into<ContextDescriptor>, backend: B) -> Self {
        Self::with_descriptor(manifest_path.into(), backend)
    }

    pub fn with_descriptor(descriptor: ContextDescriptor, backend: B) -> Self {
        Self {
            descriptor,
            backend,
            handle: None,
            cookie: None,
        }
    }

    pub fn manifest_path(&self) -> &Path {
        self.descriptor.source()
    }

    pub fn descriptor(&self) -> &ContextDescriptor {
        &self.descriptor
    }

    pub fn state(&self) -> ContextState {
        match (&self.handle, self.cookie) {
            (None, _) => ContextState::Uninitialized,
            (Some(_), None) => ContextState::Initialized,
            (Some(_), Some(_)) => ContextState::Activated,
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.handle.is_some()
    }

    pub fn is_activated(&self) -> bool {
        self.cookie.is_some()
    }

    /// Cookie of the current activation
    pub fn cookie(&self) -> Option<Cookie> {
        self.cookie
    }

    /// Create the OS context object. Calling it again once created does nothing.
    pub fn initialize(&mut self) -> Result<(), ActivationError> {
        if self.handle.is_some() {
            return Ok(());
        }

        self.descriptor.validate()?;

        let path = self.descriptor.source();
        match self.backend.create(&self.descriptor) {
            Ok(handle) => {
                tracing::debug!(path = %path.display(), "activation context created");
                self.handle = Some(handle);
                Ok(())
            }
            Err(source) => {
                tracing::debug!(path = %path.display(), code = source.code, "activation context creation failed");
                Err(ActivationError::CreateFailed {
                    path: path.to_path_buf(),
                    source,
                })
            }
        }
    }

    /// Push the context onto the activation stack.
    ///
    /// Returns the activation state, which is `true` on success. Already
    /// active contexts are left alone.
    pub fn activate(&mut self) -> Result<bool, ActivationError> {
        let Some(handle) = &self.handle else {
            return Err(ActivationError::InvalidState {
                operation: "activate",
            });
        };

        if self.cookie.is_none() {
            let cookie = self
                .backend
                .activate(handle)
                .map_err(ActivationError::ActivateFailed)?;
            tracing::debug!(path = %self.descriptor.source().display(), cookie, "activation context activated");
            self.cookie = Some(cookie);
        }

        Ok(true)
    }

    /// Pop the activation stack down through this context's cookie.
    ///
    /// The context counts as deactivated afterwards even if the OS reports
    /// a failure, since the cookie cannot be popped twice. The failure is
    /// still returned.
    pub fn deactivate(&mut self) -> Result<(), ActivationError> {
        if self.handle.is_none() {
            return Err(ActivationError::InvalidState {
                operation: "deactivate",
            });
        }

        let Some(cookie) = self.cookie.take() else {
            return Ok(());
        };

        self.backend
            .deactivate(cookie)
            .map_err(|source| ActivationError::DeactivateFailed { cookie, source })?;
        tracing::debug!(path = %self.descriptor.source().display(), cookie, "activation context deactivated");
        Ok(())
    }

    /// Activate for the lifetime of the returned guard
    pub fn scope(&mut self) -> Result<ActivationScope<'_, B>, ActivationError> {
        ActivationScope::enter(self)
    }

    /// Run `f` with the context active, deactivating afterwards
    pub fn run<T>(&mut self, f: impl FnOnce() -> T) -> Result<T, ActivationError> {
        let scope = self.scope()?;
        let value = f();
        scope.exit()?;
        Ok(value)
    }
}

impl<B: ActivationBackend> fmt::Debug for ActivationContext<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActivationContext")
            .field("descriptor", &self.descriptor)
            .field("state", &self.state())
            .field("cookie", &self.cookie)
            .finish()
    }
}

impl<B: ActivationBackend> Drop for ActivationContext<B> {
    fn drop(&mut self) {
        if let Some(cookie) = self.cookie.take() {
            if let Err(e) = self.backend.deactivate(cookie) {
                tracing::warn!(
                    path = %self.descriptor.source().display(),
                    cookie,
                    "failed to deactivate context on drop: {e}"
                );
            }
        }

        if let Some(handle) = self.handle.take() {
            self.backend.release(handle);
            tracing::debug!(path = %self.descriptor.source().display(), "activation context released");
        }
    }
}
