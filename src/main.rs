use anyhow::Context;
use spoon::cli::Cli;
use spoon::error::{ReturnCode, SpawnError};
use spoon::spawn::{self, SpawnedProcess};

fn main() {
    std::process::exit(run());
}

fn run() -> i32 {
    let args = Cli::parse_args();

    // Validate arguments
    if let Err(e) = args.validate() {
        eprintln!("SPOON: {}", e);
        eprintln!("Use \"spoon -h\" to get help");
        return e.exit_code();
    }

    match run_program(&args) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("SPOON: {:#}", e);
            exit_code(&e)
        }
    }
}

/// Map an error back to the process exit code, preserving typed spawn codes.
fn exit_code(error: &anyhow::Error) -> i32 {
    match error.downcast_ref::<SpawnError>() {
        Some(spawn_error) => spawn_error.exit_code(),
        None => ReturnCode::RuntimeError.as_exit_code(),
    }
}

/// Main program logic: spawn the child, then print its pid or wait on it.
fn run_program(args: &Cli) -> anyhow::Result<i32> {
    let verbose = args.is_verbose();

    if verbose {
        let facility = if spoon::have_posix_spawn() {
            "posix_spawn"
        } else if spoon::have_create_process() {
            "CreateProcess"
        } else {
            "no"
        };
        eprintln!("SPOON: Using the {} facility", facility);
    }

    let child = if args.path_search {
        spawn::spawnp(&args.command)
    } else {
        spawn::spawn(&args.command)
    }?;

    if verbose {
        eprintln!("SPOON: Child process spawned with PID: {}", child.id());
    }

    if args.wait {
        let code = wait_for(&child).context("Failed to wait for child process")?;
        if verbose {
            eprintln!("SPOON: Child exited with code {}", code);
        }
        return Ok(code);
    }

    println!("{}", child.id());
    Ok(0)
}

/// Block until the child exits and decode its exit status.
#[cfg(unix)]
fn wait_for(child: &SpawnedProcess) -> anyhow::Result<i32> {
    use nix::sys::wait::{waitpid, WaitStatus};

    loop {
        match waitpid(child.pid, None)? {
            WaitStatus::Exited(_, code) => return Ok(code),
            WaitStatus::Signaled(_, signal, _) => return Ok(128 + signal as i32),
            _ => continue,
        }
    }
}

/// Block until the child exits and decode its exit status.
#[cfg(windows)]
fn wait_for(child: &SpawnedProcess) -> anyhow::Result<i32> {
    use windows::Win32::System::Threading::{GetExitCodeProcess, WaitForSingleObject, INFINITE};

    let mut code = 0u32;
    unsafe {
        let _ = WaitForSingleObject(child.process, INFINITE);
        GetExitCodeProcess(child.process, &mut code)?;
    }
    Ok(code as i32)
}

#[cfg(not(any(unix, windows)))]
fn wait_for(child: &SpawnedProcess) -> anyhow::Result<i32> {
    match *child {}
}
