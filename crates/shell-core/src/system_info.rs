use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemInfo {
    pub platform: String,
    pub arch: String,
    pub version: String,
    pub runtime_version: String,
}

impl SystemInfo {
    pub fn current(app_version: &str, runtime_version: &str) -> Self {
        Self {
            platform: platform_name(std::env::consts::OS).to_string(),
            arch: arch_name(std::env::consts::ARCH).to_string(),
            version: app_version.to_string(),
            runtime_version: runtime_version.to_string(),
        }
    }
}

/// Platform names as web front ends already expect them.
pub fn platform_name(os: &str) -> &str {
    match os {
        "windows" => "win32",
        "macos" => "darwin",
        other => other,
    }
}

pub fn arch_name(arch: &str) -> &str {
    match arch {
        "x86_64" => "x64",
        "x86" => "ia32",
        "aarch64" => "arm64",
        other => other,
    }
}
