//! Prompt templates for Granska.
//!
//! Prompts can be customized by placing TOML files in the custom prompts directory.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Collection of all prompt templates.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct Prompts {
    pub analysis: AnalysisPrompts,
    pub search: SearchPrompts,
    pub knowledge: KnowledgePrompts,
    /// Custom variables from config, available in all prompts.
    #[serde(skip)]
    pub variables: std::collections::HashMap<String, String>,
}

/// Prompts for image and video analysis requests.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisPrompts {
    pub image: String,
    pub video: String,
}

impl Default for AnalysisPrompts {
    fn default() -> Self {
        Self {
            image: "Provide a detailed analysis of the image.".to_string(),
            video: "Analyze this video based on the thumbnail and transcription.".to_string(),
        }
    }
}

/// Prompt wrapping web search results for analysis.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchPrompts {
    pub template: String,
}

impl Default for SearchPrompts {
    fn default() -> Self {
        Self {
            template:
                "Web Search results for '{{query}}': \n {{results}}\n\n Provide a comprehensive analysis."
                    .to_string(),
        }
    }
}

/// Prompt combining a user question with past analysis context.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct KnowledgePrompts {
    pub template: String,
}

impl Default for KnowledgePrompts {
    fn default() -> Self {
        Self {
            template: "User query: {{question}}\n\nRelevant past analyses:\n{{context}}\n\nAnswer based on the above context:"
                .to_string(),
        }
    }
}

impl Prompts {
    /// Load prompts from the default location, with optional custom directory and variables.
    pub fn load(
        custom_dir: Option<&str>,
        custom_variables: Option<&std::collections::HashMap<String, String>>,
    ) -> crate::error::Result<Self> {
        let mut prompts = Prompts::default();

        if let Some(vars) = custom_variables {
            prompts.variables = vars.clone();
        }

        if let Some(dir) = custom_dir {
            let custom_path = PathBuf::from(shellexpand::tilde(dir).to_string());

            let analysis_path = custom_path.join("analysis.toml");
            if analysis_path.exists() {
                let content = std::fs::read_to_string(&analysis_path)?;
                prompts.analysis = toml::from_str(&content)?;
            }

            let search_path = custom_path.join("search.toml");
            if search_path.exists() {
                let content = std::fs::read_to_string(&search_path)?;
                prompts.search = toml::from_str(&content)?;
            }

            let knowledge_path = custom_path.join("knowledge.toml");
            if knowledge_path.exists() {
                let content = std::fs::read_to_string(&knowledge_path)?;
                prompts.knowledge = toml::from_str(&content)?;
            }
        }

        Ok(prompts)
    }

    /// Render a prompt template with the given variables.
    pub fn render(template: &str, vars: &std::collections::HashMap<String, String>) -> String {
        let mut result = template.to_string();
        for (key, value) in vars {
            result = result.replace(&format!("{{{{{}}}}}", key), value);
        }
        result
    }

    /// Render a prompt template with both provided variables and custom config variables.
    /// Provided variables take precedence over custom config variables.
    pub fn render_with_custom(
        &self,
        template: &str,
        vars: &std::collections::HashMap<String, String>,
    ) -> String {
        let mut merged = self.variables.clone();
        for (key, value) in vars {
            merged.insert(key.clone(), value.clone());
        }
        Self::render(template, &merged)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_prompts() {
        let prompts = Prompts::default();
        assert!(!prompts.analysis.image.is_empty());
        assert!(prompts.search.template.contains("{{query}}"));
        assert!(prompts.knowledge.template.contains("{{context}}"));
    }

    #[test]
    fn test_render_template() {
        let template = "Hello {{name}}, you have {{count}} messages.";
        let mut vars = std::collections::HashMap::new();
        vars.insert("name".to_string(), "Alice".to_string());
        vars.insert("count".to_string(), "5".to_string());

        let result = Prompts::render(template, &vars);
        assert_eq!(result, "Hello Alice, you have 5 messages.");
    }

    #[test]
    fn test_search_template_render() {
        let prompts = Prompts::default();
        let mut vars = std::collections::HashMap::new();
        vars.insert("query".to_string(), "cats".to_string());
        vars.insert("results".to_string(), "cat facts".to_string());

        let rendered = prompts.render_with_custom(&prompts.search.template, &vars);
        assert!(rendered.contains("cats"));
        assert!(rendered.contains("cat facts"));
        assert!(rendered.contains("comprehensive analysis"));
    }
}
