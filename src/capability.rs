//! One-time probe of the native spawn facilities linked into this process.

use std::sync::OnceLock;

/// Which native spawn facilities this process can use.
///
/// Probed once; the record is immutable for the rest of the process's life.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    pub posix_spawn: bool,
    pub create_process: bool,
}

impl Capabilities {
    /// True if at least one facility is bound.
    pub fn supported(&self) -> bool {
        self.posix_spawn || self.create_process
    }

    #[cfg(test)]
    pub(crate) const NONE: Capabilities = Capabilities {
        posix_spawn: false,
        create_process: false,
    };
}

static CAPABILITIES: OnceLock<Capabilities> = OnceLock::new();

/// The probed capability record, initialized on first access.
///
/// Concurrent first calls all observe the same record; there is no
/// re-probing and no teardown.
pub fn capabilities() -> Capabilities {
    *CAPABILITIES.get_or_init(probe)
}

// Backend binding is resolved at link time, so the probe reduces to the
// compile-time target checks.
fn probe() -> Capabilities {
    Capabilities {
        posix_spawn: cfg!(unix),
        create_process: cfg!(windows),
    }
}

/// True if the POSIX `posix_spawn`/`posix_spawnp` facility is linked in.
pub fn have_posix_spawn() -> bool {
    capabilities().posix_spawn
}

/// True if the Windows `CreateProcessW` facility is linked in.
pub fn have_create_process() -> bool {
    capabilities().create_process
}

/// True if this process can spawn children at all.
pub fn supported() -> bool {
    capabilities().supported()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exactly_one_facility_is_bound_per_target() {
        let caps = capabilities();
        assert_eq!(caps.posix_spawn, cfg!(unix));
        assert_eq!(caps.create_process, cfg!(windows));
        assert!(!(caps.posix_spawn && caps.create_process));
    }

    #[test]
    fn repeated_probes_return_the_same_record() {
        assert_eq!(capabilities(), capabilities());
        assert_eq!(supported(), supported());
        assert_eq!(supported(), have_posix_spawn() || have_create_process());
    }

    #[test]
    fn no_facility_means_not_supported() {
        assert!(!Capabilities::NONE.supported());
    }
}
