//! POSIX backend: marshals a token sequence for `posix_spawn(3)` and
//! invokes it.

use crate::error::{Result, SpawnError};
use nix::errno::Errno;
use nix::unistd::Pid;
use std::ffi::{CString, OsString};
use std::os::unix::ffi::OsStringExt;
use std::ptr;

/// A child process started by `posix_spawn` or `posix_spawnp`.
///
/// Only the identifier is held here; waiting and signaling are the
/// caller's job.
pub struct SpawnedProcess {
    pub pid: Pid,
}

impl SpawnedProcess {
    /// Numeric OS identifier of the child.
    pub fn id(&self) -> u32 {
        self.pid.as_raw() as u32
    }
}

/// Start `tokens[0]` as a literal executable path.
pub fn spawn(tokens: &[String]) -> Result<SpawnedProcess> {
    invoke(tokens, libc::posix_spawn)
}

/// Start `tokens[0]`, resolving it via the executable search path.
pub fn spawnp(tokens: &[String]) -> Result<SpawnedProcess> {
    invoke(tokens, libc::posix_spawnp)
}

type NativeSpawnFn = unsafe extern "C" fn(
    *mut libc::pid_t,
    *const libc::c_char,
    *const libc::posix_spawn_file_actions_t,
    *const libc::posix_spawnattr_t,
    *const *mut libc::c_char,
    *const *mut libc::c_char,
) -> libc::c_int;

fn invoke(tokens: &[String], native_spawn: NativeSpawnFn) -> Result<SpawnedProcess> {
    let bundle = ArgumentBundle::new(tokens)?;
    let mut pid: libc::pid_t = 0;

    // File actions and spawn attributes stay at their defaults: null is the
    // documented spelling for "no actions, default attributes".
    let status = unsafe {
        native_spawn(
            &mut pid,
            bundle.path(),
            ptr::null(),
            ptr::null(),
            bundle.argv.as_ptr(),
            bundle.envp.as_ptr(),
        )
    };
    drop(bundle);

    // The pid slot is only meaningful on a zero return.
    if status != 0 {
        return Err(SpawnError::from(Errno::from_i32(status)));
    }

    Ok(SpawnedProcess {
        pid: Pid::from_raw(pid),
    })
}

/// The marshaled layout one `posix_spawn` call needs: argument and
/// environment string storage plus the null-terminated pointer vectors into
/// it. Built per call, dropped as soon as the native call returns.
struct ArgumentBundle {
    argv: CStringVec,
    envp: CStringVec,
}

impl ArgumentBundle {
    /// Marshal the token sequence and a snapshot of the current environment.
    fn new(tokens: &[String]) -> Result<Self> {
        let args = tokens
            .iter()
            .map(|token| argument_cstring(token))
            .collect::<Result<Vec<_>>>()?;

        let env = std::env::vars_os()
            .map(|(key, value)| {
                let mut entry = key;
                entry.push("=");
                entry.push(&value);
                environment_cstring(entry)
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            argv: CStringVec::new(args),
            envp: CStringVec::new(env),
        })
    }

    /// The literal command path; the same string is seen as `argv[0]`.
    fn path(&self) -> *const libc::c_char {
        self.argv.strings[0].as_ptr()
    }
}

/// Owned C strings plus the null-terminated pointer vector over them.
///
/// The pointer vector is valid only while `strings` is alive and unmodified.
struct CStringVec {
    strings: Vec<CString>,
    ptrs: Vec<*mut libc::c_char>,
}

impl CStringVec {
    fn new(strings: Vec<CString>) -> Self {
        let ptrs = strings
            .iter()
            .map(|s| s.as_ptr() as *mut libc::c_char)
            .chain(std::iter::once(ptr::null_mut()))
            .collect();
        Self { strings, ptrs }
    }

    fn as_ptr(&self) -> *const *mut libc::c_char {
        self.ptrs.as_ptr()
    }
}

fn argument_cstring(token: &str) -> Result<CString> {
    CString::new(token)
        .map_err(|e| SpawnError::InvalidArguments(format!("Invalid argument '{}': {}", token, e)))
}

fn environment_cstring(entry: OsString) -> Result<CString> {
    CString::new(entry.into_vec())
        .map_err(|e| SpawnError::InvalidArguments(format!("Invalid environment entry: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use nix::sys::wait::{waitpid, WaitStatus};

    fn tokens(args: &[&str]) -> Vec<String> {
        args.iter().map(|s| s.to_string()).collect()
    }

    fn wait_for_exit(child: &SpawnedProcess) -> i32 {
        match waitpid(child.pid, None) {
            Ok(WaitStatus::Exited(_, code)) => code,
            other => panic!("unexpected wait status: {:?}", other),
        }
    }

    #[test]
    fn spawn_true_reports_a_real_child_that_exits_zero() {
        let child = spawn(&tokens(&["/bin/true"])).expect("spawn /bin/true");
        assert!(child.pid.as_raw() > 0);
        assert_eq!(wait_for_exit(&child), 0);
    }

    #[test]
    fn spawn_round_trips_the_child_exit_code() {
        let child = spawn(&tokens(&["/bin/sh", "-c", "exit 7"])).expect("spawn sh");
        assert_eq!(wait_for_exit(&child), 7);
    }

    #[test]
    fn spawnp_resolves_the_command_on_the_search_path() {
        let child = spawnp(&tokens(&["true"])).expect("spawnp true");
        assert_eq!(wait_for_exit(&child), 0);
    }

    #[test]
    fn missing_executable_fails_or_exits_nonzero() {
        match spawn(&tokens(&["/path/does/not/exist"])) {
            Err(SpawnError::NativeSpawnFailure { code, .. }) => {
                assert_eq!(code, Errno::ENOENT as i32);
            }
            Ok(child) => {
                // Some libcs report the failure through the child's exit
                // status instead of the spawn return value.
                assert_ne!(wait_for_exit(&child), 0);
            }
            Err(other) => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn child_observes_the_ambient_environment_verbatim() {
        std::env::set_var("SPOON_TEST_MARKER", "forwarded");
        let child = spawn(&tokens(&[
            "/bin/sh",
            "-c",
            "test \"$SPOON_TEST_MARKER\" = forwarded",
        ]))
        .expect("spawn sh");
        assert_eq!(wait_for_exit(&child), 0);
    }

    #[test]
    fn bundle_vectors_are_null_terminated_and_ordered() {
        std::env::set_var("SPOON_BUNDLE_MARKER", "present");
        let command = tokens(&["/bin/echo", "first", "second"]);
        let bundle = ArgumentBundle::new(&command).expect("marshal");

        assert_eq!(bundle.argv.ptrs.len(), command.len() + 1);
        assert!(bundle.argv.ptrs.last().unwrap().is_null());
        assert!(bundle.envp.ptrs.last().unwrap().is_null());

        assert_eq!(bundle.argv.strings[0].to_str().unwrap(), "/bin/echo");
        assert_eq!(bundle.argv.strings[2].to_str().unwrap(), "second");
        assert_eq!(bundle.path(), bundle.argv.strings[0].as_ptr());

        let expected = CString::new("SPOON_BUNDLE_MARKER=present").unwrap();
        assert!(bundle.envp.strings.contains(&expected));
        assert_eq!(bundle.envp.strings.len() + 1, bundle.envp.ptrs.len());
    }

    #[test]
    fn interior_nul_in_a_token_is_rejected_before_the_native_call() {
        let result = spawn(&tokens(&["/bin/echo", "a\0b"]));
        assert!(matches!(result, Err(SpawnError::InvalidArguments(_))));
    }
}
