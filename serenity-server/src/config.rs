// Copyright (c) 2025-2026 brdigetrlol. All rights reserved.
// SPDX-License-Identifier: LicenseRef-Icarus-Proprietary
// See LICENSE in the repository root for full license terms.

use clap::Args;
use serenity_core::ExperienceConfig;

/// Listener and experience settings, from flags or `SERENITY_*` variables.
#[derive(Debug, Clone, Args)]
pub struct ServerConfig {
    /// Interface to bind
    #[arg(long, env = "SERENITY_HOST", default_value = "0.0.0.0")]
    pub host: String,

    #[arg(long, env = "SERENITY_PORT", default_value_t = 5000)]
    pub port: u16,

    /// Frames per second streamed to each experience
    #[arg(long, env = "SERENITY_FRAME_HZ", default_value_t = 30)]
    pub frame_hz: u32,

    /// Fixed seed for reproducible particle fields
    #[arg(long, env = "SERENITY_SEED")]
    pub seed: Option<u64>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
            frame_hz: 30,
            seed: None,
        }
    }
}

impl ServerConfig {
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn experience(&self) -> ExperienceConfig {
        ExperienceConfig::default().with_frame_hz(self.frame_hz)
    }

    /// Human-readable problems; empty when valid.
    pub fn validate(&self) -> Vec<String> {
        let mut issues = self.experience().validate();
        if self.host.trim().is_empty() {
            issues.push("host must not be empty".to_string());
        }
        issues
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct Cli {
        #[command(flatten)]
        server: ServerConfig,
    }

    #[test]
    fn test_default_valid() {
        let config = ServerConfig::default();
        assert!(config.validate().is_empty());
        assert_eq!(config.addr(), "0.0.0.0:5000");
    }

    #[test]
    fn test_flags_override() {
        let cli = Cli::parse_from(["serenity", "--port", "8080", "--frame-hz", "15", "--seed", "7"]);
        assert_eq!(cli.server.port, 8080);
        assert_eq!(cli.server.experience().frame_hz, 15);
        assert_eq!(cli.server.seed, Some(7));
    }

    #[test]
    fn test_zero_frame_rate_invalid() {
        let config = ServerConfig { frame_hz: 0, ..ServerConfig::default() };
        assert!(!config.validate().is_empty());
    }
}
