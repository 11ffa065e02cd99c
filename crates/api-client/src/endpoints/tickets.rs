//! Support ticket endpoints
//!
//! Maps to the `/ticket` routes of the Node backend:
//! - Create and list tickets (own tickets, all tickets for admins)
//! - Read, reply to, re-status, assign and delete a ticket
//! - Aggregate statistics and the list of assignable admins
//!
//! Every operation returns a [`NormalizedResult`] (or a [`DeleteResult`]);
//! transport errors become `success: false` results instead of `Err`.

use crate::client::EcoPulseClient;
use crate::error::ApiError;
use crate::normalize::{ensure_collection, json_type, normalize, Expected, NormalizedResult};
use crate::request::RequestDescriptor;
use crate::transport::{HttpClient, Transport};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::fmt;
use tracing::{debug, error};

/// Tickets API interface
#[derive(Clone)]
pub struct TicketsApi<T = HttpClient> {
    client: EcoPulseClient<T>,
}

impl<T: Transport> TicketsApi<T> {
    /// Create a new tickets API interface
    pub(crate) fn new(client: EcoPulseClient<T>) -> Self {
        Self { client }
    }

    /// Create a new ticket
    ///
    /// POST /ticket
    pub async fn create(&self, ticket: &NewTicket) -> NormalizedResult {
        debug!(subject = %ticket.subject, category = %ticket.category, "Creating ticket");
        let request = match RequestDescriptor::post("/ticket", ticket) {
            Ok(request) => request,
            Err(e) => return local_failure(Expected::Entity.empty(), &e, "create ticket"),
        };
        self.fetch(request, Expected::Entity.empty(), "Failed to create ticket")
            .await
    }

    /// Tickets of the logged-in user
    ///
    /// GET /ticket/user
    pub async fn user_tickets(&self) -> NormalizedResult {
        let result = self
            .fetch(
                RequestDescriptor::get("/ticket/user"),
                Expected::Collection.empty(),
                "Failed to fetch user tickets",
            )
            .await;
        ensure_collection(result, "user_tickets")
    }

    /// All tickets (admin only)
    ///
    /// GET /ticket/all
    pub async fn all(&self, filters: &TicketFilters) -> NormalizedResult {
        let request = RequestDescriptor::get("/ticket/all").with_params(filters.to_params());
        let result = self
            .fetch(
                request,
                Expected::Collection.empty(),
                "Failed to fetch all tickets",
            )
            .await;
        ensure_collection(result, "all_tickets")
    }

    /// Ticket counts by status (admin only)
    ///
    /// GET /ticket/stats
    pub async fn stats(&self) -> NormalizedResult {
        let mut result = self
            .fetch(
                RequestDescriptor::get("/ticket/stats"),
                TicketStats::zeroed_value(),
                "Failed to fetch ticket stats",
            )
            .await;

        if result.data.is_object() {
            return result;
        }
        if result.success {
            error!(
                data_type = json_type(&result.data),
                "Ticket stats received non-object data"
            );
            return NormalizedResult::failure(
                TicketStats::zeroed_value(),
                "Invalid statistics data received",
            );
        }
        result.data = TicketStats::zeroed_value();
        result
    }

    /// A single ticket
    ///
    /// GET /ticket/:id
    pub async fn get(&self, id: &str) -> NormalizedResult {
        let id = id.trim();
        if !is_valid_id(id) {
            return NormalizedResult::failure(Value::Null, "Invalid ticket ID provided");
        }
        debug!(ticket_id = id, "Fetching ticket");
        self.fetch(
            RequestDescriptor::get(format!("/ticket/{id}")),
            Expected::Entity.empty(),
            &format!("Failed to fetch ticket {id}"),
        )
        .await
    }

    /// Change a ticket's status (admin only)
    ///
    /// PUT /ticket/:id/status
    pub async fn update_status(&self, id: &str, status: TicketStatus) -> NormalizedResult {
        let id = id.trim();
        if !is_valid_id(id) {
            return NormalizedResult::failure(Value::Null, "Ticket ID and status are required");
        }
        self.send_json(
            RequestDescriptor::put(format!("/ticket/{id}/status"), &json!({ "status": status })),
            &format!("Failed to update status for ticket {id}"),
        )
        .await
    }

    /// Add a message to a ticket
    ///
    /// POST /ticket/:id/reply
    pub async fn reply(&self, id: &str, content: &str) -> NormalizedResult {
        let id = id.trim();
        if !is_valid_id(id) || content.trim().is_empty() {
            return NormalizedResult::failure(Value::Null, "Ticket ID and content are required");
        }
        self.send_json(
            RequestDescriptor::post(format!("/ticket/{id}/reply"), &json!({ "content": content })),
            &format!("Failed to reply to ticket {id}"),
        )
        .await
    }

    /// Assign a ticket to an admin (admin only)
    ///
    /// PUT /ticket/:id/assign
    pub async fn assign(&self, id: &str, admin_id: &str) -> NormalizedResult {
        let (id, admin_id) = (id.trim(), admin_id.trim());
        if !is_valid_id(id) || !is_valid_id(admin_id) {
            return NormalizedResult::failure(Value::Null, "Ticket ID and admin ID are required");
        }
        self.send_json(
            RequestDescriptor::put(format!("/ticket/{id}/assign"), &json!({ "adminId": admin_id })),
            &format!("Failed to assign ticket {id}"),
        )
        .await
    }

    /// Soft-delete a ticket
    ///
    /// DELETE /ticket/:id
    pub async fn delete(&self, id: &str) -> DeleteResult {
        let id = id.trim();
        if !is_valid_id(id) {
            return DeleteResult::failure("Ticket ID is required");
        }
        match self
            .client
            .send(&RequestDescriptor::delete(format!("/ticket/{id}")))
            .await
        {
            Ok(_) => DeleteResult::deleted("Ticket deleted successfully"),
            Err(e) => {
                error!(ticket_id = id, error = %e, "Error deleting ticket");
                DeleteResult::failure(failure_message(&e, &format!("Failed to delete ticket {id}")))
            }
        }
    }

    /// Admin users tickets can be assigned to
    ///
    /// GET /ticket/admins
    pub async fn admins(&self) -> NormalizedResult {
        let result = self
            .fetch(
                RequestDescriptor::get("/ticket/admins"),
                Expected::Collection.empty(),
                "Failed to fetch admin users",
            )
            .await;
        ensure_collection(result, "admins")
    }

    async fn send_json(
        &self,
        request: Result<RequestDescriptor, ApiError>,
        fallback_message: &str,
    ) -> NormalizedResult {
        match request {
            Ok(request) => {
                self.fetch(request, Expected::Entity.empty(), fallback_message)
                    .await
            }
            Err(e) => local_failure(Expected::Entity.empty(), &e, fallback_message),
        }
    }

    /// Dispatch and normalize, turning errors into failure results
    async fn fetch(
        &self,
        request: RequestDescriptor,
        empty: Value,
        fallback_message: &str,
    ) -> NormalizedResult {
        match self.client.send(&request).await {
            Ok(response) => normalize(response.body(), empty),
            Err(e) => {
                error!(
                    method = %request.method,
                    path = %request.path,
                    error = %e,
                    "{fallback_message}"
                );
                NormalizedResult::failure(empty, failure_message(&e, fallback_message))
            }
        }
    }
}

fn local_failure(empty: Value, err: &ApiError, operation: &str) -> NormalizedResult {
    error!(error = %err, operation, "Could not build request");
    NormalizedResult::failure(empty, err.user_message())
}

fn failure_message(err: &ApiError, fallback_message: &str) -> String {
    let message = err.user_message();
    if message.trim().is_empty() {
        fallback_message.to_string()
    } else {
        message
    }
}

/// Identifiers are interpolated into the path, so they must be a single
/// non-blank segment
/// A single path segment that cannot escape `/ticket/`
fn is_valid_id(id: &str) -> bool {
    let id = id.trim();
    !id.is_empty() && id != "." && id != ".." && !id.contains(['/', '?', '#'])
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Result of a delete; failures carry no `data` field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeleteResult {
    pub success: bool,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl DeleteResult {
    fn deleted(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: Some(Value::Null),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            data: None,
        }
    }
}

/// Ticket workflow status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TicketStatus {
    Open,
    InProgress,
    Resolved,
    Closed,
}

impl TicketStatus {
    /// Wire name
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::InProgress => "in-progress",
            Self::Resolved => "resolved",
            Self::Closed => "closed",
        }
    }
}

impl fmt::Display for TicketStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl std::str::FromStr for TicketStatus {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "open" => Ok(Self::Open),
            "in-progress" | "in_progress" | "inprogress" => Ok(Self::InProgress),
            "resolved" => Ok(Self::Resolved),
            "closed" => Ok(Self::Closed),
            other => Err(ApiError::validation(format!("unknown ticket status {other:?}"))),
        }
    }
}

/// Ticket priority
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TicketPriority {
    Low,
    #[default]
    Medium,
    High,
    Urgent,
}

impl TicketPriority {
    /// Wire name
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Urgent => "urgent",
        }
    }
}

impl std::str::FromStr for TicketPriority {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            "urgent" => Ok(Self::Urgent),
            other => Err(ApiError::validation(format!("unknown ticket priority {other:?}"))),
        }
    }
}

/// Payload for creating a ticket
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewTicket {
    pub subject: String,
    pub category: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<TicketPriority>,
    /// Opening message
    pub description: String,
}

/// Which assignee to filter on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssignedFilter {
    /// Tickets assigned to the caller
    Me,
    /// Tickets with no assignee
    Unassigned,
}

impl std::str::FromStr for AssignedFilter {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "me" => Ok(Self::Me),
            "unassigned" => Ok(Self::Unassigned),
            other => Err(ApiError::validation(format!("unknown assignee filter {other:?}"))),
        }
    }
}

/// Filters for the admin ticket list
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TicketFilters {
    pub status: Option<TicketStatus>,
    pub category: Option<String>,
    pub assigned: Option<AssignedFilter>,
}

impl TicketFilters {
    /// Create empty filters
    pub fn new() -> Self {
        Self::default()
    }

    /// Filter by status
    #[must_use]
    pub fn with_status(mut self, status: TicketStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Filter by category
    #[must_use]
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Filter by assignee
    #[must_use]
    pub fn with_assigned(mut self, assigned: AssignedFilter) -> Self {
        self.assigned = Some(assigned);
        self
    }

    /// Query string pairs, omitting unset filters
    pub fn to_params(&self) -> Vec<(String, String)> {
        let mut params = Vec::new();
        if let Some(status) = self.status {
            params.push(("status".to_string(), status.as_str().to_string()));
        }
        if let Some(ref category) = self.category {
            params.push(("category".to_string(), category.clone()));
        }
        if let Some(assigned) = self.assigned {
            let value = match assigned {
                AssignedFilter::Me => "me",
                AssignedFilter::Unassigned => "unassigned",
            };
            params.push(("assigned".to_string(), value.to_string()));
        }
        params
    }
}

/// Ticket counts by status
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketStats {
    pub total: u64,
    pub open: u64,
    pub in_progress: u64,
    pub resolved: u64,
    pub closed: u64,
    pub unassigned: u64,
}

impl TicketStats {
    /// All-zero stats as JSON, the neutral default for failures
    #[must_use]
    pub fn zeroed_value() -> Value {
        json!({
            "total": 0,
            "open": 0,
            "inProgress": 0,
            "resolved": 0,
            "closed": 0,
            "unassigned": 0,
        })
    }
}

/// User summary as populated by the backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub profile_picture: Option<String>,
}

impl UserSummary {
    /// "First Last", falling back to the email or id
    #[must_use]
    pub fn display_name(&self) -> String {
        let name = [self.first_name.as_deref(), self.last_name.as_deref()]
            .into_iter()
            .flatten()
            .collect::<Vec<_>>()
            .join(" ");
        if !name.is_empty() {
            name
        } else {
            self.email.clone().unwrap_or_else(|| self.id.clone())
        }
    }
}

/// Admin users returned by `/ticket/admins`
pub type AdminUser = UserSummary;

/// A user reference: bare id or populated profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum UserRef {
    Id(String),
    Profile(UserSummary),
}

impl UserRef {
    /// The referenced user's id
    #[must_use]
    pub fn id(&self) -> &str {
        match self {
            Self::Id(id) => id,
            Self::Profile(profile) => &profile.id,
        }
    }
}

/// One message in a ticket thread
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketMessage {
    pub sender: UserRef,
    #[serde(default)]
    pub is_admin: bool,
    pub content: String,
    #[serde(default)]
    pub timestamp: Option<String>,
}

/// Read markers for both sides of a ticket
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadState {
    #[serde(default)]
    pub by_user: bool,
    #[serde(default)]
    pub by_admin: bool,
}

/// A support ticket
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ticket {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub ticket_number: Option<String>,
    pub subject: String,
    pub user: UserRef,
    pub category: String,
    #[serde(default)]
    pub priority: TicketPriority,
    #[serde(default)]
    pub messages: Vec<TicketMessage>,
    pub status: TicketStatus,
    #[serde(default)]
    pub assigned_to: Option<UserRef>,
    #[serde(default)]
    pub is_read: ReadState,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::NetworkErrorKind;
    use crate::registry::ClientRegistry;
    use crate::testing::{MockReply, MockTransport};
    use reqwest::Method;

    fn api(primary: MockTransport, fallback: MockTransport) -> TicketsApi<MockTransport> {
        EcoPulseClient::from_registry(ClientRegistry::new(primary, fallback)).tickets()
    }

    fn primary(reply: MockReply) -> MockTransport {
        MockTransport::new("http://primary").with_reply(reply)
    }

    fn idle() -> MockTransport {
        MockTransport::new("http://fallback")
    }

    fn sample_ticket() -> Value {
        json!({
            "_id": "665f1c2e9b1d",
            "ticketNumber": "20250101001",
            "subject": "Meter offline",
            "user": {"_id": "u1", "firstName": "Ana", "lastName": "Reyes"},
            "category": "technical",
            "priority": "high",
            "messages": [{"sender": "u1", "isAdmin": false, "content": "Help"}],
            "status": "in-progress",
            "assignedTo": null,
            "isRead": {"byUser": true, "byAdmin": false}
        })
    }

    #[tokio::test]
    async fn test_user_tickets_envelope() {
        let tickets = api(
            primary(MockReply::json(200, json!({"success": true, "data": [sample_ticket()]}))),
            idle(),
        );

        let result = tickets.user_tickets().await;

        assert!(result.success);
        let typed = result.decode::<Vec<Ticket>>().unwrap();
        assert_eq!(typed.data[0].status, TicketStatus::InProgress);
        assert_eq!(typed.data[0].user.id(), "u1");
    }

    #[tokio::test]
    async fn test_user_tickets_non_array_becomes_empty() {
        let tickets = api(primary(MockReply::json(200, sample_ticket())), idle());

        let result = tickets.user_tickets().await;

        assert!(result.success);
        assert_eq!(result.data, json!([]));
    }

    #[tokio::test]
    async fn test_network_failure_falls_back() {
        let tickets = api(
            primary(MockReply::refused()),
            MockTransport::new("http://fallback")
                .with_reply(MockReply::json(200, json!([sample_ticket()]))),
        );

        let result = tickets.admins().await;

        assert!(result.success);
        assert_eq!(result.data.as_array().map(Vec::len), Some(1));
    }

    #[tokio::test]
    async fn test_all_tickets_failure_uses_server_message() {
        let tickets = api(
            primary(MockReply::status(403, "Not authorized to access all tickets")),
            idle(),
        );

        let result = tickets.all(&TicketFilters::new()).await;

        assert_eq!(
            serde_json::to_value(&result).unwrap(),
            json!({"success": false, "data": [], "message": "Not authorized to access all tickets"})
        );
    }

    #[tokio::test]
    async fn test_all_tickets_sends_filters() {
        let tickets = api(primary(MockReply::json(200, json!([]))), idle());
        let filters = TicketFilters::new()
            .with_status(TicketStatus::Open)
            .with_assigned(AssignedFilter::Unassigned);

        tickets.all(&filters).await;

        let calls = tickets.client.registry().primary().calls();
        assert_eq!(calls[0].path, "/ticket/all");
        assert_eq!(
            calls[0].params,
            vec![
                ("status".to_string(), "open".to_string()),
                ("assigned".to_string(), "unassigned".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn test_stats_failure_is_zeroed() {
        let tickets = api(primary(MockReply::refused()), idle());

        let result = tickets.stats().await;

        assert!(!result.success);
        let stats: TicketStats = serde_json::from_value(result.data).unwrap();
        assert_eq!(stats, TicketStats::default());
    }

    #[tokio::test]
    async fn test_stats_non_object_is_invalid() {
        let tickets = api(primary(MockReply::json(200, json!({"success": true, "data": 7}))), idle());

        let result = tickets.stats().await;

        assert_eq!(
            result,
            NormalizedResult::failure(TicketStats::zeroed_value(), "Invalid statistics data received")
        );
    }

    #[tokio::test]
    async fn test_stats_array_data_is_invalid_and_zeroed() {
        let tickets = api(primary(MockReply::json(200, json!({"success": true, "data": [1]}))), idle());

        let result = tickets.stats().await;

        assert!(!result.success);
        assert_eq!(result.data, TicketStats::zeroed_value());
    }

    #[tokio::test]
    async fn test_stats_failed_envelope_is_zeroed() {
        let tickets = api(
            primary(MockReply::json(200, json!({"success": false, "data": null, "message": "Not authorized"}))),
            idle(),
        );

        let result = tickets.stats().await;

        assert_eq!(
            result,
            NormalizedResult::failure(TicketStats::zeroed_value(), "Not authorized")
        );
    }

    #[tokio::test]
    async fn test_failed_collection_envelope_keeps_empty_list() {
        let tickets = api(
            primary(MockReply::json(200, json!({"success": false, "data": null, "message": "x"}))),
            idle(),
        );

        let result = tickets.user_tickets().await;

        assert_eq!(
            serde_json::to_value(&result).unwrap(),
            json!({"success": false, "data": [], "message": "x"})
        );
    }

    #[tokio::test]
    async fn test_stats_decode() {
        let tickets = api(
            primary(MockReply::json(
                200,
                json!({"success": true, "data": {"total": 4, "open": 1, "inProgress": 1, "resolved": 1, "closed": 1, "unassigned": 2}}),
            )),
            idle(),
        );

        let stats = tickets.stats().await.decode::<TicketStats>().unwrap();

        assert_eq!(stats.data.in_progress, 1);
        assert_eq!(stats.data.unassigned, 2);
    }

    #[tokio::test]
    async fn test_get_rejects_blank_id_without_request() {
        let tickets = api(idle(), idle());

        let result = tickets.get("  ").await;

        assert_eq!(result.message.as_deref(), Some("Invalid ticket ID provided"));
        assert_eq!(result.data, Value::Null);
        assert_eq!(tickets.client.registry().primary().call_count(), 0);
    }

    #[tokio::test]
    async fn test_get_empty_body() {
        let tickets = api(primary(MockReply::Empty(200)), idle());

        let result = tickets.get("abc").await;

        assert!(!result.success);
        assert_eq!(result.message.as_deref(), Some(crate::normalize::EMPTY_RESPONSE_MESSAGE));
    }

    #[tokio::test]
    async fn test_update_status_body() {
        let tickets = api(primary(MockReply::json(200, json!({"success": true, "data": sample_ticket()}))), idle());

        let result = tickets.update_status("665f1c2e9b1d", TicketStatus::Resolved).await;

        assert!(result.success);
        let call = &tickets.client.registry().primary().calls()[0];
        assert_eq!(call.method, Method::PUT);
        assert_eq!(call.path, "/ticket/665f1c2e9b1d/status");
        assert_eq!(call.body, Some(json!({"status": "resolved"})));
    }

    #[tokio::test]
    async fn test_reply_requires_content() {
        let tickets = api(idle(), idle());
        let result = tickets.reply("abc", "").await;
        assert_eq!(result.message.as_deref(), Some("Ticket ID and content are required"));
    }

    #[tokio::test]
    async fn test_assign_sends_admin_id() {
        let tickets = api(primary(MockReply::json(200, json!({"success": true, "data": {}}))), idle());

        tickets.assign("t1", "admin-9").await;

        let call = &tickets.client.registry().primary().calls()[0];
        assert_eq!(call.body, Some(json!({"adminId": "admin-9"})));
    }

    #[tokio::test]
    async fn test_assign_requires_both_ids() {
        let tickets = api(idle(), idle());
        let result = tickets.assign("t1", " ").await;
        assert_eq!(result.message.as_deref(), Some("Ticket ID and admin ID are required"));
    }

    #[tokio::test]
    async fn test_create_failure_has_null_data() {
        let tickets = api(
            primary(MockReply::Network(NetworkErrorKind::Timeout)),
            MockTransport::new("http://fallback")
                .with_reply(MockReply::Network(NetworkErrorKind::Timeout)),
        );
        let ticket = NewTicket {
            subject: "Inverter".to_string(),
            category: "technical".to_string(),
            priority: Some(TicketPriority::Urgent),
            description: "Inverter reports fault 32".to_string(),
        };

        let result = tickets.create(&ticket).await;

        assert!(!result.success);
        assert_eq!(result.data, Value::Null);
        assert!(result.message.unwrap().contains("ETIMEDOUT"));
    }

    #[tokio::test]
    async fn test_delete_success() {
        let tickets = api(
            primary(MockReply::json(200, json!({"success": true, "message": "Ticket deleted successfully"}))),
            idle(),
        );

        let result = tickets.delete("t1").await;

        assert_eq!(
            serde_json::to_value(&result).unwrap(),
            json!({"success": true, "message": "Ticket deleted successfully", "data": null})
        );
    }

    #[tokio::test]
    async fn test_delete_failure_has_no_data_field() {
        let tickets = api(primary(MockReply::status(404, "Ticket not found")), idle());

        let result = tickets.delete("t1").await;

        assert_eq!(
            serde_json::to_value(&result).unwrap(),
            json!({"success": false, "message": "Ticket not found"})
        );
    }

    #[test]
    fn test_is_valid_id() {
        assert!(is_valid_id("665f1c2e9b1d"));
        assert!(!is_valid_id(""));
        assert!(!is_valid_id("a/b"));
        assert!(!is_valid_id("a?b=1"));
        assert!(!is_valid_id("."));
        assert!(!is_valid_id(" .. "));
        assert!(is_valid_id("..a"));
    }

    #[tokio::test]
    async fn test_dot_segment_id_is_rejected_without_request() {
        let tickets = api(idle(), idle());

        let result = tickets.get("..").await;

        assert_eq!(result, NormalizedResult::failure(Value::Null, "Invalid ticket ID provided"));
        assert!(tickets.client.registry().primary().calls().is_empty());
    }

    #[tokio::test]
    async fn test_ids_are_trimmed_in_paths() {
        let ok = MockReply::json(200, json!({"success": true}));
        let tickets = api(MockTransport::new("http://primary").with_default_reply(ok), idle());

        assert!(tickets.delete(" t1 ").await.success);
        tickets.assign("\tt2\n", " admin-1 ").await;

        let calls = tickets.client.registry().primary().calls();
        assert_eq!(calls[0].path, "/ticket/t1");
        assert_eq!(calls[1].path, "/ticket/t2/assign");
        assert_eq!(calls[1].body, Some(json!({"adminId": "admin-1"})));
    }

    #[test]
    fn test_status_parse() {
        assert_eq!("In-Progress".parse::<TicketStatus>().unwrap(), TicketStatus::InProgress);
        assert!("pending".parse::<TicketStatus>().is_err());
        assert_eq!(serde_json::to_value(TicketStatus::InProgress).unwrap(), json!("in-progress"));
    }

    #[test]
    fn test_display_name() {
        let admin: AdminUser =
            serde_json::from_value(json!({"_id": "a1", "email": "ops@ecopulse.io"})).unwrap();
        assert_eq!(admin.display_name(), "ops@ecopulse.io");
    }
}
