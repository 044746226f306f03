// Copyright (c) 2024-2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::sync::Arc;

use crate::{BuildService, DeviceFlowPoller, EsbuildCli, GitCli, GitHubDeviceFlow, NpmCli,
            PackageService, RemoteShellTransport, SshCli, VersionControl};

/// The collaborators that the builtin commands are wired to.
#[derive(Debug, Clone)]
pub struct Services {
    pub version_control: Arc<dyn VersionControl>,
    pub packages: Arc<dyn PackageService>,
    pub build: Arc<dyn BuildService>,
    pub remote_shell: Arc<dyn RemoteShellTransport>,
    pub device_flow: Arc<dyn DeviceFlowPoller>,
}

impl Services {
    /// Services that drive the programs installed on this machine (`git`, `npm`,
    /// `esbuild`, `ssh`) and GitHub's device flow for credentials.
    #[must_use]
    pub fn system() -> Self {
        Self {
            version_control: Arc::new(GitCli),
            packages: Arc::new(NpmCli),
            build: Arc::new(EsbuildCli),
            remote_shell: Arc::new(SshCli),
            device_flow: Arc::new(GitHubDeviceFlow::default()),
        }
    }
}
