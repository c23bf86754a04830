use std::fmt;

/// OS and architecture identifiers as they appear in release asset names.
///
/// Release binaries are published as `goto-<os>-<arch>[.exe]` using Go-style
/// identifiers (`linux`, `darwin`, `windows`; `amd64`, `arm64`), which differ
/// from Rust's `std::env::consts` names. [`Platform::current`] performs the
/// mapping; tests construct arbitrary platforms with [`Platform::new`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Platform {
    /// Operating system identifier, e.g. `linux` or `darwin`.
    pub os: String,
    /// CPU architecture identifier, e.g. `amd64` or `arm64`.
    pub arch: String,
}

impl Platform {
    pub fn new(os: impl Into<String>, arch: impl Into<String>) -> Self {
        Self {
            os: os.into(),
            arch: arch.into(),
        }
    }

    /// Detect the platform of the running process.
    #[must_use]
    pub fn current() -> Self {
        Self::from_rust(std::env::consts::OS, std::env::consts::ARCH)
    }

    /// Map Rust target identifiers to release identifiers.
    #[must_use]
    pub fn from_rust(os: &str, arch: &str) -> Self {
        let os = match os {
            "macos" => "darwin",
            other => other,
        };
        let arch = match arch {
            "x86_64" => "amd64",
            "aarch64" => "arm64",
            "x86" => "386",
            other => other,
        };
        Self::new(os, arch)
    }

    /// Whether a running binary can replace itself on this platform.
    ///
    /// Windows locks the image of a running executable, so the rename and
    /// copy strategies used by the installer cannot work there.
    #[must_use]
    pub fn supports_self_update(&self) -> bool {
        self.os != "windows"
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.os, self.arch)
    }
}
