//! Windows backend: marshals a token sequence for `CreateProcessW` and
//! invokes it.

use crate::error::{Result, SpawnError};
use std::iter;
use std::mem;
use windows::core::{PCWSTR, PWSTR};
use windows::Win32::Foundation::{CloseHandle, HANDLE};
use windows::Win32::System::Threading::{
    CreateProcessW, PROCESS_CREATION_FLAGS, PROCESS_INFORMATION, STARTUPINFOW,
};

/// A child process started by `CreateProcessW`.
///
/// Holds the process and thread handles the native call returned; both are
/// closed when this value is dropped. The numeric identifiers remain valid
/// for the caller afterwards.
pub struct SpawnedProcess {
    pub process: HANDLE,
    pub thread: HANDLE,
    pub process_id: u32,
    pub thread_id: u32,
}

impl SpawnedProcess {
    /// Numeric OS identifier of the child.
    pub fn id(&self) -> u32 {
        self.process_id
    }
}

impl Drop for SpawnedProcess {
    fn drop(&mut self) {
        unsafe {
            let _ = CloseHandle(self.process);
            let _ = CloseHandle(self.thread);
        }
    }
}

/// Start the process named by `tokens[0]`.
///
/// Tokens are joined with single spaces and no quoting, so a token that
/// contains whitespace will not round-trip through the native command-line
/// parser. Known-incomplete behavior, kept deliberately.
pub fn spawn(tokens: &[String]) -> Result<SpawnedProcess> {
    let mut bundle = CommandBundle::new(tokens);

    // Null application name, security attributes, environment block and
    // working directory: the command line names the program, and the child
    // inherits this process's environment and directory.
    unsafe {
        CreateProcessW(
            PCWSTR::null(),
            PWSTR(bundle.command_line.as_mut_ptr()),
            None,
            None,
            false,
            PROCESS_CREATION_FLAGS(0),
            None,
            PCWSTR::null(),
            &bundle.startup_info,
            &mut bundle.process_info,
        )?;
    }

    Ok(SpawnedProcess {
        process: bundle.process_info.hProcess,
        thread: bundle.process_info.hThread,
        process_id: bundle.process_info.dwProcessId,
        thread_id: bundle.process_info.dwThreadId,
    })
}

/// Search-path spawn has no backing here yet.
///
/// `CreateProcessW` performs its own program-name resolution, but the flag
/// combination for an explicit search-path variant is not settled, so this
/// fails instead of guessing.
pub fn spawnp(_tokens: &[String]) -> Result<SpawnedProcess> {
    Err(SpawnError::Unimplemented {
        backend: "CreateProcess",
        operation: "search-path spawn",
    })
}

/// The marshaled layout one `CreateProcessW` call needs: the mutable wide
/// command line plus the zero-initialized startup and process-information
/// structures. Built per call, dropped when the call returns.
struct CommandBundle {
    command_line: Vec<u16>,
    startup_info: STARTUPINFOW,
    process_info: PROCESS_INFORMATION,
}

impl CommandBundle {
    fn new(tokens: &[String]) -> Self {
        let command_line = tokens
            .join(" ")
            .encode_utf16()
            .chain(iter::once(0))
            .collect();

        // cb carries the structure's own size so the facility can validate
        // the layout version; every other field stays zero.
        let startup_info = STARTUPINFOW {
            cb: mem::size_of::<STARTUPINFOW>() as u32,
            ..Default::default()
        };

        Self {
            command_line,
            startup_info,
            process_info: PROCESS_INFORMATION::default(),
        }
    }
}
