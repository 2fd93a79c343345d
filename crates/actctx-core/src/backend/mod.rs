use crate::descriptor::ContextDescriptor;
use crate::error::ActivationError;

pub mod fake;
#[cfg(windows)]
pub mod win32;

/// Token identifying a single push onto the activation stack
pub type Cookie = usize;

/// Failure reported by an activation backend
///
/// `code` is a Win32 error code (`ERROR_FILE_NOT_FOUND` is 2) for every
/// backend. Statuses that do not wrap a Win32 error keep their HRESULT bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("OS status {code}")]
pub struct BackendError {
    pub code: u32,
}

const FACILITY_WIN32_MASK: u32 = 0xFFFF_0000;
const FACILITY_WIN32_PREFIX: u32 = 0x8007_0000;

/// Undo `HRESULT_FROM_WIN32`, leaving other HRESULTs untouched
pub fn win32_code_from_hresult(hr: i32) -> u32 {
    let bits = hr as u32;
    if bits & FACILITY_WIN32_MASK == FACILITY_WIN32_PREFIX {
        bits & 0xFFFF
    } else {
        bits
    }
}

impl BackendError {
    pub fn new(code: u32) -> Self {
        Self { code }
    }
}

/// The operating system side of an activation context
///
/// Implementations own nothing beyond what they hand out: the caller keeps
/// the handle and the cookie and gives each back exactly once.
pub trait ActivationBackend {
    type Handle;

    /// Create a context object from the descriptor
    fn create(&self, descriptor: &ContextDescriptor) -> Result<Self::Handle, BackendError>;

    /// Push the context onto the activation stack
    fn activate(&self, handle: &Self::Handle) -> Result<Cookie, BackendError>;

    /// Pop the activation stack down to and including `cookie`
    fn deactivate(&self, cookie: Cookie) -> Result<(), BackendError>;

    /// Release a context object returned by [`ActivationBackend::create`]
    fn release(&self, handle: Self::Handle);
}

#[cfg(windows)]
pub type NativeBackend = win32::Win32Backend;

#[cfg(not(windows))]
pub type NativeBackend = UnsupportedBackend;

/// Backend for the current platform
#[cfg(windows)]
pub fn default_backend() -> Result<NativeBackend, ActivationError> {
    Ok(win32::Win32Backend)
}

/// Backend for the current platform
#[cfg(not(windows))]
pub fn default_backend() -> Result<NativeBackend, ActivationError> {
    Err(ActivationError::Unsupported)
}

#[cfg(not(windows))]
enum Never {}

/// Stand-in for the native backend on targets without activation contexts.
/// It cannot be constructed.
#[cfg(not(windows))]
pub struct UnsupportedBackend {
    never: Never,
}

#[cfg(not(windows))]
impl ActivationBackend for UnsupportedBackend {
    type Handle = ();

    fn create(&self, _descriptor: &ContextDescriptor) -> Result<(), BackendError> {
        match self.never {}
    }

    fn activate(&self, _handle: &()) -> Result<Cookie, BackendError> {
        match self.never {}
    }

    fn deactivate(&self, _cookie: Cookie) -> Result<(), BackendError> {
        match self.never {}
    }

    fn release(&self, _handle: ()) {
        match self.never {}
    }
}
