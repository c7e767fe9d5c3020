use crate::errors::LocatorError;
use crate::locator::StrategyKey;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Target language of a rendered statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Js,
    Python,
    Java,
    Csharp,
    Cpp,
}

impl Language {
    pub fn key(&self) -> &'static str {
        match self {
            Language::Js => "js",
            Language::Python => "python",
            Language::Java => "java",
            Language::Csharp => "csharp",
            Language::Cpp => "cpp",
        }
    }
}

impl FromStr for Language {
    type Err = LocatorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "js" => Ok(Language::Js),
            "python" => Ok(Language::Python),
            "java" => Ok(Language::Java),
            "csharp" => Ok(Language::Csharp),
            "cpp" => Ok(Language::Cpp),
            _ => Err(LocatorError::unknown_key("language", s)),
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Test-automation framework whose lookup call gets rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Framework {
    Cypress,
    Selenium,
    Playwright,
}

impl Framework {
    pub fn key(&self) -> &'static str {
        match self {
            Framework::Cypress => "cypress",
            Framework::Selenium => "selenium",
            Framework::Playwright => "playwright",
        }
    }
}

impl FromStr for Framework {
    type Err = LocatorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cypress" => Ok(Framework::Cypress),
            "selenium" => Ok(Framework::Selenium),
            "playwright" => Ok(Framework::Playwright),
            _ => Err(LocatorError::unknown_key("framework", s)),
        }
    }
}

impl fmt::Display for Framework {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputMode {
    /// A declaration in the target language/framework.
    Statement,
    /// A bare `name = 'selector'` line.
    String,
}

impl FromStr for OutputMode {
    type Err = LocatorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "statement" => Ok(OutputMode::Statement),
            "string" => Ok(OutputMode::String),
            _ => Err(LocatorError::unknown_key("output mode", s)),
        }
    }
}

impl fmt::Display for OutputMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputMode::Statement => f.write_str("statement"),
            OutputMode::String => f.write_str("string"),
        }
    }
}

/// Options for one scan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanRequest {
    pub language: Language,
    pub framework: Framework,
    pub priority_order: Vec<StrategyKey>,
    pub output_mode: OutputMode,
    pub safe_only: bool,
}

impl Default for ScanRequest {
    fn default() -> Self {
        Self {
            language: Language::Js,
            framework: Framework::Cypress,
            priority_order: StrategyKey::default_order(),
            output_mode: OutputMode::Statement,
            safe_only: false,
        }
    }
}

impl ScanRequest {
    pub fn new(language: Language, framework: Framework) -> Self {
        Self {
            language,
            framework,
            ..Default::default()
        }
    }

    pub fn with_priority_order(mut self, order: Vec<StrategyKey>) -> Self {
        self.priority_order = order;
        self
    }

    pub fn with_output_mode(mut self, mode: OutputMode) -> Self {
        self.output_mode = mode;
        self
    }

    pub fn safe_only(mut self, safe_only: bool) -> Self {
        self.safe_only = safe_only;
        self
    }
}
