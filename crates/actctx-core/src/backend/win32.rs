use windows::Win32::Foundation::HANDLE;
use windows::Win32::System::ApplicationInstallationAndServicing::{
    ACTCTX_FLAG_ASSEMBLY_DIRECTORY_VALID, ACTCTX_FLAG_RESOURCE_NAME_VALID, ACTCTXW,
    ActivateActCtx, CreateActCtxW, DEACTIVATE_ACTCTX_FLAG_FORCE_EARLY_DEACTIVATION,
    DeactivateActCtx, ReleaseActCtx,
};
use windows::core::{HSTRING, PCWSTR};

use super::{ActivationBackend, BackendError, Cookie, win32_code_from_hresult};
use crate::descriptor::ContextDescriptor;

/// Activation backend calling straight into kernel32
#[derive(Debug, Default, Clone, Copy)]
pub struct Win32Backend;

/// Owned activation context handle returned by `CreateActCtxW`
#[derive(Debug)]
pub struct Win32Handle(HANDLE);

fn os_error(err: windows::core::Error) -> BackendError {
    BackendError::new(win32_code_from_hresult(err.code().0))
}

impl ActivationBackend for Win32Backend {
    type Handle = Win32Handle;

    fn create(&self, descriptor: &ContextDescriptor) -> Result<Win32Handle, BackendError> {
        // Wide strings must outlive the CreateActCtxW call
        let source = HSTRING::from(descriptor.source());
        let assembly_directory = descriptor.assembly_directory().map(HSTRING::from);

        let mut actctx = ACTCTXW {
            cbSize: std::mem::size_of::<ACTCTXW>() as u32,
            lpSource: PCWSTR(source.as_ptr()),
            ..Default::default()
        };

        if let Some(dir) = &assembly_directory {
            actctx.dwFlags |= ACTCTX_FLAG_ASSEMBLY_DIRECTORY_VALID;
            actctx.lpAssemblyDirectory = PCWSTR(dir.as_ptr());
        }

        if let Some(id) = descriptor.resource_id() {
            // MAKEINTRESOURCEW
            actctx.dwFlags |= ACTCTX_FLAG_RESOURCE_NAME_VALID;
            actctx.lpResourceName = PCWSTR(id as usize as *const u16);
        }

        let handle = unsafe { CreateActCtxW(&actctx) }.map_err(os_error)?;
        Ok(Win32Handle(handle))
    }

    fn activate(&self, handle: &Win32Handle) -> Result<Cookie, BackendError> {
        let mut cookie: usize = 0;
        unsafe { ActivateActCtx(Some(handle.0), &mut cookie) }.map_err(os_error)?;
        Ok(cookie)
    }

    fn deactivate(&self, cookie: Cookie) -> Result<(), BackendError> {
        // Without the force flag a cookie below the top of the stack raises
        // STATUS_SXS_EARLY_DEACTIVATION instead of popping down to it
        unsafe { DeactivateActCtx(DEACTIVATE_ACTCTX_FLAG_FORCE_EARLY_DEACTIVATION, cookie) }
            .map_err(os_error)
    }

    fn release(&self, handle: Win32Handle) {
        unsafe {
            ReleaseActCtx(handle.0);
        }
    }
}
