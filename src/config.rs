use crate::cli::Cli;
use anyhow::{bail, Context, Result};
use std::path::{Path, PathBuf};

pub const DEFAULT_ASSETS_DIR: &str = "assets";
pub const DEFAULT_INPUT: &str = "index.html";
pub const DEFAULT_OUTPUT: &str = "portfolio_standalone.html";

/// Image extensions inlined when no extra ones are requested, lowercase and dot-less.
pub const DEFAULT_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "svg"];

const ENV_PROJECT_ROOT: &str = "STANDALONE_PROJECT_ROOT";
const ENV_ASSETS_DIR: &str = "STANDALONE_ASSETS_DIR";
const ENV_INPUT: &str = "STANDALONE_INPUT";
const ENV_OUTPUT: &str = "STANDALONE_OUTPUT";

/// Everything a run needs, passed explicitly into [`crate::converter::run`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineConfig {
    /// Base that asset paths are made relative to when matching the document.
    pub project_root: PathBuf,
    pub assets_dir: PathBuf,
    pub input: PathBuf,
    pub output: PathBuf,
    pub extensions: Vec<String>,
}

impl InlineConfig {
    /// Layout used by a plain portfolio checkout rooted at `project_root`.
    pub fn for_project(project_root: impl Into<PathBuf>) -> Self {
        let project_root = project_root.into();
        Self {
            assets_dir: project_root.join(DEFAULT_ASSETS_DIR),
            input: project_root.join(DEFAULT_INPUT),
            output: project_root.join(DEFAULT_OUTPUT),
            extensions: DEFAULT_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
            project_root,
        }
    }

    /// Resolve against the process environment.
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        Self::resolve(cli, |key| std::env::var(key).ok())
    }

    /// Command line first, then `env`, then the project layout defaults.
    pub fn resolve<F>(cli: &Cli, env: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env_path = |key: &str| env(key).filter(|v| !v.is_empty()).map(PathBuf::from);

        let project_root = cli
            .project_root
            .clone()
            .or_else(|| env_path(ENV_PROJECT_ROOT))
            .unwrap_or_else(|| PathBuf::from("."));

        let mut config = Self::for_project(project_root);

        if let Some(dir) = cli.assets_dir.clone().or_else(|| env_path(ENV_ASSETS_DIR)) {
            config.assets_dir = dir;
        }
        if let Some(input) = cli.input.clone().or_else(|| env_path(ENV_INPUT)) {
            config.input = input;
        }
        if let Some(output) = cli.output.clone().or_else(|| env_path(ENV_OUTPUT)) {
            config.output = output;
        }

        for ext in &cli.extensions {
            config.add_extension(ext)?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Add an extension to the inlinable set. Accepts `webp`, `.webp` or `WEBP`.
    pub fn add_extension(&mut self, ext: &str) -> Result<()> {
        let normalized = ext.trim().trim_start_matches('.').to_lowercase();
        if normalized.is_empty() || normalized.contains(['/', '\\', '.']) {
            bail!("Invalid asset extension: {:?}", ext);
        }
        if !self.extensions.contains(&normalized) {
            self.extensions.push(normalized);
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        let input = absolute(&self.input)?;
        let output = absolute(&self.output)?;
        if input == output {
            bail!(
                "Output path must differ from the input document: {}",
                self.input.display()
            );
        }
        Ok(())
    }
}

fn absolute(path: &Path) -> Result<PathBuf> {
    std::path::absolute(path).with_context(|| format!("Failed to resolve path: {}", path.display()))
}
