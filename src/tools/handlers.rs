//! Handlers turning service desk responses into text for the model.

use crate::servicedesk::{
    or_na, CallerRef, NewIncident, PriorityRef, ServiceDeskClient, ServiceDeskError,
};

use super::{CreateIncidentArgs, GetIncidentsArgs, GetKnowledgeItemArgs, GetUserProfileArgs};

/// Status given to every new incident.
const NEW_INCIDENT_STATUS: &str = "Öppen";

pub(super) async fn create_incident(client: &ServiceDeskClient, args: CreateIncidentArgs) -> String {
    let priority = args.priority.as_str();
    let incident = NewIncident {
        caller: CallerRef {
            dynamic_name: args.caller_name,
        },
        priority: PriorityRef {
            name: priority.to_string(),
        },
        description: args.description,
        category: args.category,
        status: NEW_INCIDENT_STATUS.to_string(),
        urgency: priority.to_string(),
        impact: priority.to_string(),
    };

    match client.create_incident(&incident).await {
        Ok(created) => format!(
            "Incident created successfully:\nCaller: {}\nPriority: {}\nCategory: {}\nStatus: {}",
            or_na(&created.caller_name),
            or_na(&created.priority_name),
            or_na(&created.category),
            or_na(&created.status)
        ),
        Err(e) => format!("Failed to create incident: {e}"),
    }
}

pub(super) async fn get_incidents(client: &ServiceDeskClient, args: GetIncidentsArgs) -> String {
    let caller = args.caller_name;
    let incidents = match client.incidents_by_caller(&caller).await {
        Ok(incidents) => incidents,
        Err(e) => return format!("Failed to get incidents: {e}"),
    };

    if incidents.is_empty() {
        return format!("No incidents found for {caller}");
    }

    let mut result = format!("Found {} incidents for {caller}:\n", incidents.len());
    for incident in &incidents {
        let priority = incident
            .priority
            .as_ref()
            .map(|p| or_na(&p.name))
            .unwrap_or_else(|| "N/A".to_string());
        result.push_str(&format!(
            "Description: {}\nStatus: {}\nPriority: {priority}\nCategory: {}\n---\n",
            or_na(&incident.description),
            or_na(&incident.status),
            or_na(&incident.category)
        ));
    }
    result
}

pub(super) async fn get_knowledge_item(
    client: &ServiceDeskClient,
    args: GetKnowledgeItemArgs,
) -> String {
    let id = args.item_id;
    match client.knowledge_item(&id).await {
        Ok(item) => format!(
            "Knowledge Article {id}:\nTitle: {}\nContent: {}",
            or_na(&item.title),
            or_na(&item.content)
        ),
        Err(ServiceDeskError::NotFound { .. }) => format!("Knowledge article {id} not found"),
        Err(e) => format!("Failed to get knowledge item: {e}"),
    }
}

pub(super) async fn get_all_knowledge_items(client: &ServiceDeskClient) -> String {
    let items = match client.knowledge_items().await {
        Ok(items) => items,
        Err(ServiceDeskError::NotFound { .. }) => {
            return "No knowledge base articles found".to_string()
        }
        Err(e) => return format!("Failed to get knowledge items: {e}"),
    };

    if items.is_empty() {
        return "No knowledge base articles found".to_string();
    }

    let mut result = String::from("Available Knowledge Base Articles:\n");
    for item in &items {
        result.push_str(&format!(
            "ID: {} - Title: {}\n",
            or_na(&item.id),
            or_na(&item.title)
        ));
    }
    result
}

pub(super) async fn get_user_profile(client: &ServiceDeskClient, args: GetUserProfileArgs) -> String {
    let username = args.username;
    let users = match client.users().await {
        Ok(users) => users,
        Err(e) => return format!("Failed to get user profile: {e}"),
    };

    let Some(user) = users.iter().find(|u| u.has_display_name(&username)) else {
        return format!("User profile not found for username: {username}");
    };

    let activity = user.sign_in_activity.clone().unwrap_or_default();
    format!(
        "User Profile for {username}:\nDisplay Name: {}\nUser Principal Name: {}\nLast Sign In: {}\nRisk Level: {}",
        or_na(&user.display_name),
        or_na(&user.user_principal_name),
        or_na(&activity.last_sign_in_date_time),
        or_na(&activity.risk_level_aggregated)
    )
}
