//! CLI probe for the auth core.
//!
//! # Responsibility
//! - Print the core version and the effective permission matrix.
//! - With `status`, open the configured database and report chief bootstrap state.

use backoffice_auth_core::entry::with_auth_service;
use backoffice_auth_core::{allowed, core_version, Action, CanonicalRole, CoreConfig, Role};
use std::process::ExitCode;

fn main() -> ExitCode {
    println!("backoffice_auth_core version={}", core_version());
    print_matrix();

    match std::env::args().nth(1).as_deref() {
        None => ExitCode::SUCCESS,
        Some("status") => match status() {
            Ok(()) => ExitCode::SUCCESS,
            Err(message) => {
                eprintln!("status failed: {message}");
                ExitCode::FAILURE
            }
        },
        Some(other) => {
            eprintln!("unknown command `{other}`; expected `status`");
            ExitCode::from(2)
        }
    }
}

fn print_matrix() {
    for role in CanonicalRole::ALL {
        let granted = Action::ALL
            .into_iter()
            .filter(|action| allowed(Some(&Role::from(role)), *action))
            .map(Action::as_str)
            .collect::<Vec<_>>();
        println!("role={role} actions={}", granted.join(","));
    }
}

fn status() -> Result<(), String> {
    let config = CoreConfig::from_env().map_err(|err| err.to_string())?;
    config.init_logging()?;

    let chief_exists = with_auth_service(&config.db_path, |service| service.chief_exists())
        .map_err(|err| err.to_string())?;
    log::info!("event=cli_status module=cli status=ok chief_exists={chief_exists}");
    println!("db_path={}", config.db_path.display());
    println!("chief_exists={chief_exists}");
    Ok(())
}
