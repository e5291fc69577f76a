//! `.lnk` creation through the shell's `IShellLinkW` COM object.

use windows::Win32::Foundation::TRUE;
use windows::Win32::System::Com::{
    CLSCTX_INPROC_SERVER, COINIT_APARTMENTTHREADED, CoCreateInstance, CoInitializeEx,
    CoUninitialize, IPersistFile,
};
use windows::Win32::UI::Shell::{IShellLinkW, ShellLink};
use windows::Win32::UI::WindowsAndMessaging::{SW_SHOWMINNOACTIVE, SW_SHOWNORMAL};
use windows::core::{HSTRING, Interface};

use super::{InstallError, ShortcutSpec, WindowStyle};

/// Keeps COM initialised on this thread for its lifetime.
struct ComGuard;

impl ComGuard {
    fn init() -> Result<Self, InstallError> {
        // SAFETY: balanced by CoUninitialize in Drop when this call succeeded.
        let hr = unsafe { CoInitializeEx(None, COINIT_APARTMENTTHREADED) };
        hr.ok().map_err(shell_err)?;
        Ok(Self)
    }
}

impl Drop for ComGuard {
    fn drop(&mut self) {
        unsafe { CoUninitialize() };
    }
}

fn shell_err(err: windows::core::Error) -> InstallError {
    InstallError::Shell(err.message())
}

pub(super) fn create(spec: &ShortcutSpec) -> Result<(), InstallError> {
    let _com = ComGuard::init()?;
    let show = match spec.window_style {
        WindowStyle::Normal => SW_SHOWNORMAL,
        WindowStyle::Minimized => SW_SHOWMINNOACTIVE,
    };

    // SAFETY: COM is initialised for the guard's lifetime and every string
    // passed below is an owned HSTRING that outlives the call using it.
    unsafe {
        let link: IShellLinkW =
            CoCreateInstance(&ShellLink, None, CLSCTX_INPROC_SERVER).map_err(shell_err)?;
        link.SetPath(&HSTRING::from(spec.target_path.as_path()))
            .map_err(shell_err)?;
        link.SetWorkingDirectory(&HSTRING::from(spec.working_directory.as_path()))
            .map_err(shell_err)?;
        link.SetShowCmd(show).map_err(shell_err)?;
        link.SetDescription(&HSTRING::from(spec.description.as_str()))
            .map_err(shell_err)?;

        let persist: IPersistFile = link.cast().map_err(shell_err)?;
        persist
            .Save(&HSTRING::from(spec.link_path.as_path()), TRUE)
            .map_err(shell_err)
    }
}
