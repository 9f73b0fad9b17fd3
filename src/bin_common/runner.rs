//! Binary runner utilities
//!
//! Provides a standardized way to run binaries with banners around the
//! main loop.

use tracing::info;

/// Configuration for running a binary application
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Name of the binary (for logging)
    pub name: String,
}

impl RunConfig {
    /// Create a new run configuration
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// Trait for binary applications
pub trait BinaryRunner {
    /// Run the application main loop
    async fn run(&mut self) -> anyhow::Result<()>;

    /// Get the run configuration
    fn config(&self) -> &RunConfig;

    /// Print startup banner
    fn print_banner(&self) {
        framed(&[
            format!("Starting {}", self.config().name),
            "Type `help` for commands, Ctrl+C to stop".to_string(),
        ]);
    }

    /// Print shutdown banner
    fn print_shutdown(&self) {
        framed(&[format!("{} stopped", self.config().name)]);
    }

    /// Execute the binary with banners around the main loop
    async fn execute(&mut self) -> anyhow::Result<()> {
        self.print_banner();
        let result = self.run().await;
        self.print_shutdown();
        result
    }
}

const RULE: &str = "----------------------------------------";

fn framed(lines: &[String]) {
    info!("{}", RULE);
    for line in lines {
        info!("{}", line);
    }
    info!("{}", RULE);
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Noop {
        config: RunConfig,
        runs: usize,
    }

    impl BinaryRunner for Noop {
        async fn run(&mut self) -> anyhow::Result<()> {
            self.runs += 1;
            Ok(())
        }

        fn config(&self) -> &RunConfig {
            &self.config
        }
    }

    #[test]
    fn test_run_config_name() {
        let config = RunConfig::new("test-binary");
        assert_eq!(config.name, "test-binary");
    }

    #[tokio::test]
    async fn test_execute_runs_once() {
        let mut app = Noop {
            config: RunConfig::new("noop"),
            runs: 0,
        };
        app.execute().await.unwrap();
        assert_eq!(app.runs, 1);
    }
}
