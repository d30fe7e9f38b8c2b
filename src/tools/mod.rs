//! Tool registry and dispatcher.
//!
//! The set of callable operations is closed: every tool is a [`ToolKind`]
//! with a typed argument struct. Tool names coming from the model are
//! resolved against the registry once per call; names that are not
//! registered produce a textual result instead of an error so the model can
//! see and react to them.

mod handlers;

use std::fmt;

use serde::{Deserialize, Deserializer};

use crate::{
    builder::{FunctionBuilder, ParamBuilder},
    chat::Tool,
    error::LLMError,
    servicedesk::ServiceDeskClient,
    ToolCall,
};

/// The service desk operations the model may call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToolKind {
    CreateIncident,
    GetIncidents,
    GetKnowledgeItem,
    GetUserProfile,
    GetAllKnowledgeItems,
}

impl ToolKind {
    pub const ALL: [ToolKind; 5] = [
        ToolKind::CreateIncident,
        ToolKind::GetIncidents,
        ToolKind::GetKnowledgeItem,
        ToolKind::GetUserProfile,
        ToolKind::GetAllKnowledgeItems,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ToolKind::CreateIncident => "create_incident",
            ToolKind::GetIncidents => "get_incidents",
            ToolKind::GetKnowledgeItem => "get_knowledge_item",
            ToolKind::GetUserProfile => "get_user_profile",
            ToolKind::GetAllKnowledgeItems => "get_all_knowledge_items",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.name() == name)
    }

    /// The descriptor advertised to the model.
    pub fn descriptor(&self) -> Tool {
        let function = FunctionBuilder::new(self.name());
        let function = match self {
            ToolKind::CreateIncident => function
                .description("Create a new service desk incident")
                .param(
                    ParamBuilder::new("caller_name")
                        .description("Name of the person reporting the incident"),
                )
                .param(ParamBuilder::new("description").description("Description of the incident"))
                .param(
                    ParamBuilder::new("priority")
                        .description("Priority level of the incident")
                        .enum_values(Priority::ALL.iter().map(|p| p.as_str())),
                )
                .param(ParamBuilder::new("category").description("Category of the incident"))
                .required(["caller_name", "description", "priority"]),
            ToolKind::GetIncidents => function
                .description("Get incidents by caller name")
                .param(
                    ParamBuilder::new("caller_name")
                        .description("Name of the caller to filter incidents"),
                )
                .required(["caller_name"]),
            ToolKind::GetKnowledgeItem => function
                .description("Get a knowledge base article")
                .param(ParamBuilder::new("item_id").description("ID of the knowledge base article"))
                .required(["item_id"]),
            ToolKind::GetUserProfile => function
                .description("Get user profile information")
                .param(ParamBuilder::new("username").description("Username to look up"))
                .required(["username"]),
            ToolKind::GetAllKnowledgeItems => function
                .description("Get a list of all available knowledge base articles")
                .required(Vec::<String>::new()),
        };
        function.build()
    }
}

impl fmt::Display for ToolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    pub const ALL: [Priority; 3] = [Priority::High, Priority::Medium, Priority::Low];

    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::High => "High",
            Priority::Medium => "Medium",
            Priority::Low => "Low",
        }
    }
}

fn default_category() -> String {
    "General".to_string()
}

/// Identifiers sometimes arrive as JSON numbers.
fn string_or_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Id {
        Text(String),
        Number(serde_json::Number),
    }
    Ok(match Id::deserialize(deserializer)? {
        Id::Text(s) => s,
        Id::Number(n) => n.to_string(),
    })
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CreateIncidentArgs {
    pub caller_name: String,
    pub description: String,
    pub priority: Priority,
    #[serde(default = "default_category")]
    pub category: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GetIncidentsArgs {
    pub caller_name: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GetKnowledgeItemArgs {
    #[serde(deserialize_with = "string_or_number")]
    pub item_id: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GetUserProfileArgs {
    pub username: String,
}

/// A decoded tool call, ready to execute.
#[derive(Debug, Clone, PartialEq)]
pub enum ToolInvocation {
    CreateIncident(CreateIncidentArgs),
    GetIncidents(GetIncidentsArgs),
    GetKnowledgeItem(GetKnowledgeItemArgs),
    GetUserProfile(GetUserProfileArgs),
    GetAllKnowledgeItems,
}

impl ToolInvocation {
    /// Decode the JSON `arguments` of a call to `kind`. An empty string
    /// counts as an empty object.
    pub fn parse(kind: ToolKind, arguments: &str) -> Result<Self, serde_json::Error> {
        let arguments = if arguments.trim().is_empty() {
            "{}"
        } else {
            arguments
        };
        Ok(match kind {
            ToolKind::CreateIncident => Self::CreateIncident(serde_json::from_str(arguments)?),
            ToolKind::GetIncidents => Self::GetIncidents(serde_json::from_str(arguments)?),
            ToolKind::GetKnowledgeItem => Self::GetKnowledgeItem(serde_json::from_str(arguments)?),
            ToolKind::GetUserProfile => Self::GetUserProfile(serde_json::from_str(arguments)?),
            ToolKind::GetAllKnowledgeItems => {
                serde_json::from_str::<serde::de::IgnoredAny>(arguments)?;
                Self::GetAllKnowledgeItems
            }
        })
    }

    pub fn kind(&self) -> ToolKind {
        match self {
            Self::CreateIncident(_) => ToolKind::CreateIncident,
            Self::GetIncidents(_) => ToolKind::GetIncidents,
            Self::GetKnowledgeItem(_) => ToolKind::GetKnowledgeItem,
            Self::GetUserProfile(_) => ToolKind::GetUserProfile,
            Self::GetAllKnowledgeItems => ToolKind::GetAllKnowledgeItems,
        }
    }
}

/// Fixed mapping of tool names to handlers backed by the service desk API.
#[derive(Debug, Clone)]
pub struct ToolRegistry {
    kinds: Vec<ToolKind>,
    descriptors: Vec<Tool>,
    client: ServiceDeskClient,
}

impl ToolRegistry {
    /// Registry offering every [`ToolKind`].
    pub fn new(client: ServiceDeskClient) -> Self {
        let kinds = ToolKind::ALL.to_vec();
        let descriptors = kinds.iter().map(ToolKind::descriptor).collect();
        Self {
            kinds,
            descriptors,
            client,
        }
    }

    /// Registry offering only `kinds`, in the given order.
    ///
    /// # Errors
    ///
    /// Fails if a kind is listed twice.
    pub fn with_kinds(
        client: ServiceDeskClient,
        kinds: impl IntoIterator<Item = ToolKind>,
    ) -> Result<Self, LLMError> {
        let mut registered: Vec<ToolKind> = Vec::new();
        for kind in kinds {
            if registered.contains(&kind) {
                return Err(LLMError::InvalidRequest(format!(
                    "tool {kind} registered twice"
                )));
            }
            registered.push(kind);
        }
        let descriptors = registered.iter().map(ToolKind::descriptor).collect();
        Ok(Self {
            kinds: registered,
            descriptors,
            client,
        })
    }

    /// Descriptors sent to the model on tool-enabled requests.
    pub fn descriptors(&self) -> &[Tool] {
        &self.descriptors
    }

    pub fn resolve(&self, name: &str) -> Option<ToolKind> {
        ToolKind::from_name(name).filter(|kind| self.kinds.contains(kind))
    }

    /// Execute one model-requested call and return its textual result.
    pub async fn dispatch(&self, call: &ToolCall) -> String {
        let name = &call.function.name;
        let Some(kind) = self.resolve(name) else {
            log::warn!("Model requested unknown tool {name}");
            return format!("Function {name} not found");
        };

        match ToolInvocation::parse(kind, &call.function.arguments) {
            Ok(invocation) => {
                log::info!("Dispatching tool call {} to {}", call.id, invocation.kind());
                self.execute(invocation).await
            }
            Err(e) => {
                log::warn!("Undecodable arguments for {name}: {e}");
                format!("Invalid arguments for {name}: {e}")
            }
        }
    }

    pub async fn execute(&self, invocation: ToolInvocation) -> String {
        match invocation {
            ToolInvocation::CreateIncident(args) => {
                handlers::create_incident(&self.client, args).await
            }
            ToolInvocation::GetIncidents(args) => handlers::get_incidents(&self.client, args).await,
            ToolInvocation::GetKnowledgeItem(args) => {
                handlers::get_knowledge_item(&self.client, args).await
            }
            ToolInvocation::GetUserProfile(args) => {
                handlers::get_user_profile(&self.client, args).await
            }
            ToolInvocation::GetAllKnowledgeItems => {
                handlers::get_all_knowledge_items(&self.client).await
            }
        }
    }
}
