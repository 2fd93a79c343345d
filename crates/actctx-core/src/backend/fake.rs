use std::cell::RefCell;
use std::collections::HashSet;
use std::rc::Rc;

use super::{ActivationBackend, BackendError, Cookie};
use crate::descriptor::ContextDescriptor;

/// Win32 ERROR_SXS_INVALID_DEACTIVATION, reported for unknown cookies
pub const ERROR_SXS_INVALID_DEACTIVATION: u32 = 14043;

/// Handle issued by [`FakeBackend`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FakeHandle(u64);

#[derive(Debug, Default)]
struct FakeState {
    stack: Vec<(Cookie, FakeHandle)>,
    live: HashSet<FakeHandle>,
    next_handle: u64,
    next_cookie: Cookie,

    create_failure: Option<u32>,
    activate_failure: Option<u32>,
    deactivate_failure: Option<u32>,

    create_calls: usize,
    activate_calls: usize,
    deactivate_calls: usize,
    release_calls: usize,
}

/// In-memory activation stack
///
/// Clones share the same stack, so a test can keep one clone to inspect
/// while another is moved into an `ActivationContext`.
#[derive(Debug, Clone)]
pub struct FakeBackend {
    state: Rc<RefCell<FakeState>>,
}

impl Default for FakeBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl FakeBackend {
    pub fn new() -> Self {
        Self::with_first_cookie(1)
    }

    /// Start issuing cookies from `cookie`
    pub fn with_first_cookie(cookie: Cookie) -> Self {
        let state = FakeState {
            next_handle: 1,
            next_cookie: cookie,
            ..Default::default()
        };
        Self {
            state: Rc::new(RefCell::new(state)),
        }
    }

    /// Make every following `create` fail with `code` (None clears it)
    pub fn fail_create(&self, code: Option<u32>) {
        self.state.borrow_mut().create_failure = code;
    }

    pub fn fail_activate(&self, code: Option<u32>) {
        self.state.borrow_mut().activate_failure = code;
    }

    pub fn fail_deactivate(&self, code: Option<u32>) {
        self.state.borrow_mut().deactivate_failure = code;
    }

    pub fn create_calls(&self) -> usize {
        self.state.borrow().create_calls
    }

    pub fn activate_calls(&self) -> usize {
        self.state.borrow().activate_calls
    }

    pub fn deactivate_calls(&self) -> usize {
        self.state.borrow().deactivate_calls
    }

    pub fn release_calls(&self) -> usize {
        self.state.borrow().release_calls
    }

    /// Total number of backend calls of any kind
    pub fn total_calls(&self) -> usize {
        let state = self.state.borrow();
        state.create_calls + state.activate_calls + state.deactivate_calls + state.release_calls
    }

    /// Cookies currently on the stack, bottom first
    pub fn active_cookies(&self) -> Vec<Cookie> {
        self.state.borrow().stack.iter().map(|(c, _)| *c).collect()
    }

    pub fn stack_depth(&self) -> usize {
        self.state.borrow().stack.len()
    }

    /// Context objects created and not yet released
    pub fn live_handles(&self) -> usize {
        self.state.borrow().live.len()
    }
}

impl ActivationBackend for FakeBackend {
    type Handle = FakeHandle;

    fn create(&self, descriptor: &ContextDescriptor) -> Result<FakeHandle, BackendError> {
        let mut state = self.state.borrow_mut();
        state.create_calls += 1;

        if let Some(code) = state.create_failure {
            tracing::trace!(path = %descriptor.source().display(), code, "fake create failed");
            return Err(BackendError::new(code));
        }

        let handle = FakeHandle(state.next_handle);
        state.next_handle += 1;
        state.live.insert(handle);
        Ok(handle)
    }

    fn activate(&self, handle: &FakeHandle) -> Result<Cookie, BackendError> {
        let mut state = self.state.borrow_mut();
        state.activate_calls += 1;

        if let Some(code) = state.activate_failure {
            return Err(BackendError::new(code));
        }

        let cookie = state.next_cookie;
        state.next_cookie += 1;
        state.stack.push((cookie, *handle));
        Ok(cookie)
    }

    /// Same as `DeactivateActCtx` with the force-early-deactivation flag:
    /// frames above `cookie` are popped along with it
    fn deactivate(&self, cookie: Cookie) -> Result<(), BackendError> {
        let mut state = self.state.borrow_mut();
        state.deactivate_calls += 1;

        if let Some(code) = state.deactivate_failure {
            return Err(BackendError::new(code));
        }

        let Some(position) = state.stack.iter().rposition(|(c, _)| *c == cookie) else {
            return Err(BackendError::new(ERROR_SXS_INVALID_DEACTIVATION));
        };
        state.stack.truncate(position);
        Ok(())
    }

    fn release(&self, handle: FakeHandle) {
        let mut state = self.state.borrow_mut();
        state.release_calls += 1;
        state.live.remove(&handle);
    }
}
