//! Desktop operations
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0
//!
//! ## Changelog
//! - 1.0.0: Process launching, browser handoff, host info, power control

use std::fmt;
use std::process::Command;

use log::info;
use sysinfo::System;

use crate::core::{SkillError, SkillResult};

/// Host details reported by the system-info command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SystemReport {
    pub os_name: String,
    pub os_version: String,
    pub kernel_version: String,
    pub host_name: String,
    pub arch: String,
    pub total_memory_mb: u64,
}

impl fmt::Display for SystemReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Running {} {} (kernel {}) on {} [{}] with {} MB of memory.",
            self.os_name,
            self.os_version,
            self.kernel_version,
            self.host_name,
            self.arch,
            self.total_memory_mb
        )
    }
}

/// Local machine operations. Power control follows the desktop's native
/// scheduler and is only wired up on Windows; elsewhere those calls fail
/// with [`SkillError::Unsupported`].
pub trait SystemPort: Send + Sync {
    /// Spawn a program by path or name without waiting for it.
    fn launch(&self, program: &str) -> SkillResult<()>;

    /// Open a URL in the default browser. Bare domains get an `https://`
    /// prefix first.
    fn open_website(&self, url: &str) -> SkillResult<String>;

    /// Describe the host machine.
    fn system_info(&self) -> SystemReport;

    fn shutdown(&self, delay_secs: u32) -> SkillResult<String>;
    fn restart(&self, delay_secs: u32) -> SkillResult<String>;
    fn cancel_shutdown(&self) -> SkillResult<String>;
}

/// [`SystemPort`] backed by the local desktop.
pub struct DesktopSystem;

impl DesktopSystem {
    pub fn new() -> Self {
        DesktopSystem
    }

    fn open_in_browser(&self, url: &str) -> SkillResult<()> {
        #[cfg(target_os = "windows")]
        let spawned = Command::new("cmd").args(["/C", "start", "", url]).spawn();
        #[cfg(target_os = "macos")]
        let spawned = Command::new("open").arg(url).spawn();
        #[cfg(not(any(target_os = "windows", target_os = "macos")))]
        let spawned = Command::new("xdg-open").arg(url).spawn();

        spawned
            .map(|_| ())
            .map_err(|e| SkillError::Upstream(format!("Error opening website: {e}")))
    }
}

impl Default for DesktopSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl SystemPort for DesktopSystem {
    fn launch(&self, program: &str) -> SkillResult<()> {
        info!("launching {program:?}");
        Command::new(program)
            .spawn()
            .map(|_| ())
            .map_err(|e| SkillError::NotFound(format!("Could not start {program}: {e}")))
    }

    fn open_website(&self, url: &str) -> SkillResult<String> {
        let url = ensure_scheme(url);
        self.open_in_browser(&url)?;
        Ok(format!("Opening {url}"))
    }

    fn system_info(&self) -> SystemReport {
        let mut system = System::new_all();
        system.refresh_memory();
        SystemReport {
            os_name: System::name().unwrap_or_else(|| "unknown".to_string()),
            os_version: System::os_version().unwrap_or_else(|| "unknown".to_string()),
            kernel_version: System::kernel_version().unwrap_or_else(|| "unknown".to_string()),
            host_name: System::host_name().unwrap_or_else(|| "unknown".to_string()),
            arch: System::cpu_arch().unwrap_or_else(|| "unknown".to_string()),
            total_memory_mb: system.total_memory() / (1024 * 1024),
        }
    }

    #[cfg(target_os = "windows")]
    fn shutdown(&self, delay_secs: u32) -> SkillResult<String> {
        Command::new("shutdown")
            .args(["/s", "/t", &delay_secs.to_string()])
            .spawn()
            .map_err(|e| SkillError::Upstream(format!("Error shutting down: {e}")))?;
        Ok(if delay_secs > 0 {
            format!("Shutting down computer in {delay_secs} seconds")
        } else {
            "Shutting down computer now".to_string()
        })
    }

    #[cfg(not(target_os = "windows"))]
    fn shutdown(&self, _delay_secs: u32) -> SkillResult<String> {
        Err(SkillError::Unsupported(
            "Shutdown functionality is only available on Windows".to_string(),
        ))
    }

    #[cfg(target_os = "windows")]
    fn restart(&self, delay_secs: u32) -> SkillResult<String> {
        Command::new("shutdown")
            .args(["/r", "/t", &delay_secs.to_string()])
            .spawn()
            .map_err(|e| SkillError::Upstream(format!("Error restarting: {e}")))?;
        Ok(if delay_secs > 0 {
            format!("Restarting computer in {delay_secs} seconds")
        } else {
            "Restarting computer now".to_string()
        })
    }

    #[cfg(not(target_os = "windows"))]
    fn restart(&self, _delay_secs: u32) -> SkillResult<String> {
        Err(SkillError::Unsupported(
            "Restart functionality is only available on Windows".to_string(),
        ))
    }

    #[cfg(target_os = "windows")]
    fn cancel_shutdown(&self) -> SkillResult<String> {
        Command::new("shutdown")
            .arg("/a")
            .spawn()
            .map_err(|e| SkillError::Upstream(format!("Error cancelling shutdown: {e}")))?;
        Ok("Shutdown cancelled".to_string())
    }

    #[cfg(not(target_os = "windows"))]
    fn cancel_shutdown(&self) -> SkillResult<String> {
        Err(SkillError::Unsupported(
            "Cancel shutdown functionality is only available on Windows".to_string(),
        ))
    }
}

fn ensure_scheme(url: &str) -> String {
    let trimmed = url.trim();
    if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        trimmed.to_string()
    } else {
        format!("https://{trimmed}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scheme_is_added_to_bare_domains() {
        assert_eq!(ensure_scheme("github.com"), "https://github.com");
        assert_eq!(ensure_scheme("http://old.example"), "http://old.example");
        assert_eq!(ensure_scheme(" https://a.b "), "https://a.b");
    }

    #[test]
    fn test_system_report_display() {
        let report = SystemReport {
            os_name: "Linux".to_string(),
            os_version: "24.04".to_string(),
            kernel_version: "6.8".to_string(),
            host_name: "box".to_string(),
            arch: "x86_64".to_string(),
            total_memory_mb: 16_000,
        };
        let text = report.to_string();
        assert!(text.contains("Linux 24.04"));
        assert!(text.contains("16000 MB"));
    }

    #[cfg(not(target_os = "windows"))]
    #[test]
    fn test_power_control_unsupported_off_windows() {
        let system = DesktopSystem::new();
        assert!(matches!(
            system.shutdown(0),
            Err(SkillError::Unsupported(_))
        ));
        assert!(matches!(system.restart(5), Err(SkillError::Unsupported(_))));
        assert!(matches!(
            system.cancel_shutdown(),
            Err(SkillError::Unsupported(_))
        ));
    }
}
