// Copyright (c) 2024-2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use fsh_tui::CommandRegistry;

use crate::{Alias, Bundle, Cat, Cd, Clear, Exit, ExitRequest, Git, Help, Ls, Mkdir, Mv, Npm,
            Rm, Services, Ssh, Vi};

/// Every builtin, wired to `services`. `exit` reports through `exit_request`.
#[must_use]
pub fn new_builtin_registry(services: &Services, exit_request: ExitRequest) -> CommandRegistry {
    CommandRegistry::new()
        .with(Ls)
        .with(Cat)
        .with(Cd)
        .with(Mkdir)
        .with(Rm)
        .with(Mv)
        .with(Clear)
        .with(Vi)
        .with(Alias)
        .with(Help)
        .with(Exit {
            request: exit_request,
        })
        .with(Npm {
            packages: services.packages.clone(),
        })
        .with(Bundle {
            build: services.build.clone(),
        })
        .with(Git {
            version_control: services.version_control.clone(),
            device_flow: services.device_flow.clone(),
        })
        .with(Ssh {
            transport: services.remote_shell.clone(),
        })
}
