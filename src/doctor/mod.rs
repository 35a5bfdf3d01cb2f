//! Doctor command for setup diagnostics
//!
//! Checks everything a tutoring session depends on without contacting the
//! chat service.

use colored::*;
use std::path::Path;

use crate::cli::{Config, Credential};
use crate::progress::ProgressStore;

/// Health check result
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    Pass,
    Warn(String),
    Fail(String),
}

/// Individual health check
#[derive(Debug)]
pub struct HealthCheck {
    pub name: String,
    pub status: HealthStatus,
}

impl HealthCheck {
    fn new(name: &str, status: HealthStatus) -> Self {
        Self {
            name: name.to_string(),
            status,
        }
    }
}

/// Doctor diagnostics system
pub struct Doctor<'a> {
    config: &'a Config,
}

impl<'a> Doctor<'a> {
    pub fn new(config: &'a Config) -> Self {
        Self { config }
    }

    /// Run all health checks against the process environment
    pub fn run_diagnostics(&self) -> Vec<HealthCheck> {
        self.run_with_env(|var| std::env::var(var).ok())
    }

    /// Run all health checks, resolving environment variables through `lookup`
    pub fn run_with_env<F>(&self, lookup: F) -> Vec<HealthCheck>
    where
        F: FnOnce(&str) -> Option<String>,
    {
        vec![
            self.check_config(),
            self.check_credential(lookup),
            self.check_progress_file(),
            self.check_history_dir(),
        ]
    }

    fn check_config(&self) -> HealthCheck {
        match self.config.validate() {
            Ok(()) => HealthCheck::new("Configuration", HealthStatus::Pass),
            Err(e) => HealthCheck::new("Configuration", HealthStatus::Fail(e.to_string())),
        }
    }

    fn check_credential<F>(&self, lookup: F) -> HealthCheck
    where
        F: FnOnce(&str) -> Option<String>,
    {
        match Credential::from_lookup(&self.config.api.api_key_env, lookup) {
            Ok(_) => HealthCheck::new("API Key", HealthStatus::Pass),
            Err(e) => HealthCheck::new("API Key", HealthStatus::Fail(e.to_string())),
        }
    }

    fn check_progress_file(&self) -> HealthCheck {
        let store = ProgressStore::new(self.config.progress_path());
        if !store.path().exists() {
            return HealthCheck::new(
                "Progress File",
                HealthStatus::Warn(format!(
                    "{} not found, it will be created on first save",
                    store.path().display()
                )),
            );
        }

        match store.load() {
            Ok(log) => {
                tracing::debug!(
                    modules = log.module_count(),
                    entries = log.entry_count(),
                    "progress file readable"
                );
                HealthCheck::new("Progress File", HealthStatus::Pass)
            }
            Err(e) => HealthCheck::new("Progress File", HealthStatus::Fail(e.to_string())),
        }
    }

    fn check_history_dir(&self) -> HealthCheck {
        let path = self.config.history_path();
        let parent = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or(Path::new("."));

        if parent.is_dir() {
            HealthCheck::new("History", HealthStatus::Pass)
        } else {
            HealthCheck::new(
                "History",
                HealthStatus::Warn(format!("{} does not exist", parent.display())),
            )
        }
    }

    /// Display diagnostics results
    pub fn display_results(checks: &[HealthCheck]) {
        println!("\n{}\n", "tutorbuddy Diagnostics".bold().cyan());
        println!("{:<20} Status", "Check");
        println!("{}", "=".repeat(50));

        for check in checks {
            let message = match &check.status {
                HealthStatus::Pass => "PASS".green().to_string(),
                HealthStatus::Warn(msg) => format!("WARN: {}", msg).yellow().to_string(),
                HealthStatus::Fail(msg) => format!("FAIL: {}", msg).red().to_string(),
            };
            println!("{:<20} {}", check.name, message);
        }

        println!();
    }

    /// Get overall health status
    pub fn overall_status(checks: &[HealthCheck]) -> bool {
        !checks.iter().any(|c| matches!(c.status, HealthStatus::Fail(_)))
    }
}
