//! Activation context handling for registration-free COM.
//!
//! See [`ActivationContext`] for the lifecycle. The OS calls sit behind
//! [`ActivationBackend`], with [`FakeBackend`] available for tests.

mod backend;
mod context;
mod descriptor;
mod error;
mod scope;

#[cfg(test)]
mod tests;

#[cfg(not(windows))]
pub use backend::UnsupportedBackend;
pub use backend::fake::{ERROR_SXS_INVALID_DEACTIVATION, FakeBackend, FakeHandle};
#[cfg(windows)]
pub use backend::win32::{Win32Backend, Win32Handle};
pub use backend::{
    ActivationBackend, BackendError, Cookie, NativeBackend, default_backend,
    win32_code_from_hresult,
};
pub use context::{ActivationContext, ContextState};
pub use descriptor::ContextDescriptor;
pub use error::ActivationError;
pub use scope::ActivationScope;
