//! Scenario file handling

use anyhow::{Context, Result};
use furl_core::Insets;
use furl_layout::{ContentView, HeaderConfig};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// A scripted scroll session (scenario.toml)
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ScenarioConfig {
    #[serde(default)]
    pub viewport: ViewportConfig,
    #[serde(default)]
    pub header: HeaderConfig,
    #[serde(default = "default_content")]
    pub content: ContentView,
    #[serde(default)]
    pub steps: Vec<Step>,
}

fn default_content() -> ContentView {
    ContentView::with_scroll_range(2_000)
}

/// Container size and padding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct ViewportConfig {
    #[serde(default = "default_width")]
    pub width: i32,
    #[serde(default = "default_height")]
    pub height: i32,
    #[serde(default)]
    pub padding: Insets,
}

fn default_width() -> i32 {
    400
}

fn default_height() -> i32 {
    800
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
            padding: Insets::ZERO,
        }
    }
}

/// One scripted input
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Step {
    /// Finger down: start a vertical nested scroll on the content
    Start,
    /// Drag by `dy` pixels; positive scrolls content up
    Scroll { dy: i32 },
    /// End the nested scroll
    Stop {
        #[serde(default = "default_true")]
        touch: bool,
    },
    /// Fling with the given vertical velocity in px/s
    Fling { velocity: f32 },
    /// Advance animations by `ms`
    Tick { ms: f32 },
    /// Tick until every animation finished
    Settle,
    /// Lay out again, optionally at a new size
    Layout {
        #[serde(default)]
        width: Option<i32>,
        #[serde(default)]
        height: Option<i32>,
    },
    /// Move the header's anchor row
    Anchor { row: usize },
}

fn default_true() -> bool {
    true
}

impl Step {
    pub fn name(&self) -> &'static str {
        match self {
            Step::Start => "start",
            Step::Scroll { .. } => "scroll",
            Step::Stop { .. } => "stop",
            Step::Fling { .. } => "fling",
            Step::Tick { .. } => "tick",
            Step::Settle => "settle",
            Step::Layout { .. } => "layout",
            Step::Anchor { .. } => "anchor",
        }
    }
}

impl ScenarioConfig {
    /// Load and validate a scenario file
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            anyhow::bail!(
                "No scenario found at {}. Run `furl init {}` to create one.",
                path.display(),
                path.display()
            );
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;

        let config = Self::from_toml(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))?;

        Ok(config)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: ScenarioConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.header.validate()?;
        if self.viewport.width <= 0 || self.viewport.height <= 0 {
            anyhow::bail!(
                "Viewport must have a positive size, got {}x{}",
                self.viewport.width,
                self.viewport.height
            );
        }
        if self.content.scroll_range < 0 {
            anyhow::bail!("Content scroll range must not be negative");
        }
        Ok(())
    }

    /// A session that collapses the header, snaps, flings and reveals it again
    pub fn sample() -> Self {
        Self {
            viewport: ViewportConfig::default(),
            header: HeaderConfig {
                anchor_row: 2,
                ..HeaderConfig::default()
            },
            content: default_content(),
            steps: vec![
                Step::Start,
                Step::Scroll { dy: 40 },
                Step::Scroll { dy: 80 },
                Step::Stop { touch: true },
                Step::Settle,
                Step::Start,
                Step::Scroll { dy: -120 },
                Step::Stop { touch: true },
                Step::Settle,
                Step::Start,
                Step::Scroll { dy: 60 },
                Step::Fling { velocity: 2_500.0 },
                Step::Stop { touch: true },
                Step::Settle,
            ],
        }
    }

    /// Serialize to TOML string
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize scenario")
    }

    /// Write the sample scenario to `path`
    pub fn write_sample(path: &Path, force: bool) -> Result<()> {
        if path.exists() && !force {
            anyhow::bail!(
                "{} already exists. Pass --force to overwrite it.",
                path.display()
            );
        }
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        fs::write(path, Self::sample().to_toml()?)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(())
    }
}
