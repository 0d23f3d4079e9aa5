//! Spawn dispatch: route a token sequence to the native backend.
//!
//! The POSIX facility is preferred whenever it is bound; the Windows
//! facility is used otherwise. Exactly one backend module is compiled for
//! any given target, so the routing decision is fixed for the life of the
//! process.

use crate::capability::{self, Capabilities};
use crate::error::{Result, SpawnError};

#[cfg(unix)]
mod posix;
#[cfg(unix)]
pub use posix::SpawnedProcess;

#[cfg(windows)]
mod windows;
#[cfg(windows)]
pub use windows::SpawnedProcess;

#[cfg(not(any(unix, windows)))]
mod unsupported;
#[cfg(not(any(unix, windows)))]
pub use unsupported::SpawnedProcess;

#[cfg(unix)]
use posix as imp;
#[cfg(windows)]
use windows as imp;
#[cfg(not(any(unix, windows)))]
use unsupported as imp;

/// Spawn a child process, treating `tokens[0]` as a literal executable path.
///
/// The tokens pass through to the native facility exactly as given; nothing
/// is quoted, escaped, or deduplicated. The child inherits this process's
/// environment as it is at call time.
pub fn spawn(tokens: &[String]) -> Result<SpawnedProcess> {
    dispatch(capability::capabilities(), tokens, imp::spawn)
}

/// Spawn a child process, resolving `tokens[0]` via the executable search
/// path.
pub fn spawnp(tokens: &[String]) -> Result<SpawnedProcess> {
    dispatch(capability::capabilities(), tokens, imp::spawnp)
}

fn dispatch<F>(caps: Capabilities, tokens: &[String], invoke: F) -> Result<SpawnedProcess>
where
    F: FnOnce(&[String]) -> Result<SpawnedProcess>,
{
    if tokens.is_empty() {
        return Err(SpawnError::InvalidArguments(
            "No command specified".to_string(),
        ));
    }

    if !caps.supported() {
        return Err(SpawnError::Unsupported);
    }

    invoke(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(args: &[&str]) -> Vec<String> {
        args.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn empty_token_sequence_is_rejected() {
        assert!(matches!(
            spawn(&[]),
            Err(SpawnError::InvalidArguments(_))
        ));
        assert!(matches!(
            spawnp(&[]),
            Err(SpawnError::InvalidArguments(_))
        ));
    }

    #[test]
    fn empty_tokens_fail_before_any_backend_is_consulted() {
        let result = dispatch(Capabilities::NONE, &[], |_| {
            panic!("backend invoked for an empty token sequence")
        });
        assert!(matches!(result, Err(SpawnError::InvalidArguments(_))));
    }

    #[test]
    fn unsupported_platform_never_reaches_the_backend() {
        let command = tokens(&["/bin/true"]);
        let result = dispatch(Capabilities::NONE, &command, |_| {
            panic!("backend invoked without a bound facility")
        });
        assert!(matches!(result, Err(SpawnError::Unsupported)));
    }

    #[cfg(any(unix, windows))]
    #[test]
    fn bound_backend_receives_the_tokens_verbatim() {
        let command = tokens(&["/bin/echo", "a b", "c"]);
        let seen = std::cell::RefCell::new(Vec::new());
        let result = dispatch(capability::capabilities(), &command, |toks| {
            *seen.borrow_mut() = toks.to_vec();
            Err(SpawnError::Unsupported)
        });
        assert!(result.is_err());
        assert_eq!(*seen.borrow(), command);
    }
}
