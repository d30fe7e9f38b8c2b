//! Builder module for configuring the model gateway and tool descriptors.

use std::collections::BTreeMap;

use crate::{
    backends::openai::OpenAI,
    chat::{FunctionTool, ParameterProperty, ParametersSchema, Tool, ToolChoice},
    error::LLMError,
};

/// Builder for configuring and instantiating the chat completions client.
///
/// Provides a fluent interface for setting options like model selection,
/// API keys and generation parameters.
#[derive(Debug, Default)]
pub struct LLMBuilder {
    /// API key for authentication with the provider
    api_key: Option<String>,
    /// Base URL for API requests (for OpenAI-compatible endpoints)
    base_url: Option<String>,
    /// Model identifier/name to use
    model: Option<String>,
    /// Maximum tokens to generate in responses
    max_tokens: Option<u32>,
    /// Temperature parameter for controlling response randomness
    temperature: Option<f32>,
    /// Request timeout duration in seconds
    timeout_seconds: Option<u64>,
    /// How the model may use offered tools
    tool_choice: Option<ToolChoice>,
}

impl LLMBuilder {
    /// Creates a new empty builder instance with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the API key for authentication.
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Sets the base URL for API requests.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Sets the model identifier to use.
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Sets the maximum number of tokens to generate.
    pub fn max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    /// Sets the temperature for controlling response randomness.
    pub fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Sets the request timeout in seconds.
    pub fn timeout_seconds(mut self, timeout_seconds: u64) -> Self {
        self.timeout_seconds = Some(timeout_seconds);
        self
    }

    /// Sets the tool choice mode sent whenever tools are offered.
    pub fn tool_choice(mut self, choice: ToolChoice) -> Self {
        self.tool_choice = Some(choice);
        self
    }

    /// Builds the configured client.
    ///
    /// # Errors
    ///
    /// Returns an error if no API key was given or the base URL does not parse.
    pub fn build(self) -> Result<OpenAI, LLMError> {
        let key = self
            .api_key
            .filter(|k| !k.is_empty())
            .ok_or_else(|| LLMError::AuthError("No API key provided for OpenAI".to_string()))?;

        OpenAI::new(
            key,
            self.base_url,
            self.model,
            self.max_tokens,
            self.temperature,
            self.timeout_seconds,
            self.tool_choice,
        )
    }
}

/// Builder for function parameters
pub struct ParamBuilder {
    name: String,
    property_type: String,
    description: String,
    enum_list: Option<Vec<String>>,
}

impl ParamBuilder {
    /// Creates a new parameter builder
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            property_type: "string".to_string(),
            description: String::new(),
            enum_list: None,
        }
    }

    /// Sets the parameter description
    pub fn description(mut self, desc: impl Into<String>) -> Self {
        self.description = desc.into();
        self
    }

    /// Sets the enum values for enum parameters
    pub fn enum_values<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.enum_list = Some(values.into_iter().map(Into::into).collect());
        self
    }

    fn build(self) -> (String, ParameterProperty) {
        (
            self.name,
            ParameterProperty {
                property_type: self.property_type,
                description: self.description,
                enum_list: self.enum_list,
            },
        )
    }
}

/// Builder for function tools
pub struct FunctionBuilder {
    name: String,
    description: String,
    parameters: Vec<ParamBuilder>,
    required: Vec<String>,
}

impl FunctionBuilder {
    /// Creates a new function builder
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            parameters: Vec::new(),
            required: Vec::new(),
        }
    }

    /// Sets the function description
    pub fn description(mut self, desc: impl Into<String>) -> Self {
        self.description = desc.into();
        self
    }

    /// Adds a parameter to the function
    pub fn param(mut self, param: ParamBuilder) -> Self {
        self.parameters.push(param);
        self
    }

    /// Marks parameters as required
    pub fn required<I, S>(mut self, param_names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.required = param_names.into_iter().map(Into::into).collect();
        self
    }

    /// Builds the function tool
    pub fn build(self) -> Tool {
        let properties: BTreeMap<String, ParameterProperty> =
            self.parameters.into_iter().map(ParamBuilder::build).collect();

        let schema = ParametersSchema {
            schema_type: "object".to_string(),
            properties,
            required: self.required,
        };

        Tool {
            tool_type: "function".to_string(),
            function: FunctionTool {
                name: self.name,
                description: self.description,
                parameters: serde_json::json!(schema),
            },
        }
    }
}
