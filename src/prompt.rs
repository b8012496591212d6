#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum HostContext {
    #[default]
    Standard,
    Framework {
        name: String,
        version: Option<String>,
        libraries: Vec<String>,
    },
    Custom(String),
}

impl HostContext {
    pub fn describe(&self, language: &str) -> String {
        match self {
            Self::Standard => format!("Standard {} environment", display_language(language)),
            Self::Framework {
                name,
                version,
                libraries,
            } => {
                let name = match version {
                    Some(version) => format!("{name} v{version}"),
                    None => name.clone(),
                };
                let libraries = if libraries.is_empty() {
                    "bundler not accessible".to_string()
                } else {
                    libraries.join(", ")
                };
                format!("{name}. Gems: {libraries}")
            }
            Self::Custom(text) => text.clone(),
        }
    }
}

pub fn system_prompt(context: &HostContext, language: &str) -> String {
    let language = display_language(language);
    format!(
        "You are an AI assistant providing {language} code suggestions. \
         Environment: {}. \
         Important: Respond ONLY with code. No explanations. No markdown. No code block markers. \
         No execution results or comments after #=>. Just the pure {language} code.",
        context.describe(&language)
    )
}

fn display_language(language: &str) -> String {
    let mut chars = language.trim().chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => "Ruby".to_string(),
    }
}
