//! HTTP implementation of [`ChatApi`]
//!
//! Every request carries `Authorization: Bearer <token>`. A non-success
//! status becomes [`OutreachError::Api`]; the body is read for the log line
//! only. Nothing is retried.

use crate::api::{
    ChatApi, ChatDetail, ChatId, ChatList, ChatSummary, CreatedChat, Plan, PlanCatalogue,
    PlanInfo, PlanUpgrade, ProfileAnalysis, ProfileInsights, ProfileRequest, Quota,
    SendMessageRequest, SendMessageResponse,
};
use crate::config::ServerConfig;
use crate::error::{OutreachError, Result};
use crate::session::Session;

use async_trait::async_trait;
use metrics::increment_counter;
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use url::Url;

/// Authenticated client for the outreach backend
///
/// # Examples
///
/// ```no_run
/// use outreach_chat::api::{ChatApi, HttpApi};
/// use outreach_chat::config::ServerConfig;
/// use outreach_chat::session::Session;
///
/// # async fn example() -> outreach_chat::error::Result<()> {
/// let api = HttpApi::new(&ServerConfig::default(), Session::new("token"))?;
/// let quota = api.get_quota().await?;
/// println!("{}", quota.status_line());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct HttpApi {
    client: Client,
    base_url: String,
    session: Session,
}

impl HttpApi {
    /// Create a client for `server` authenticated with `session`
    ///
    /// # Errors
    ///
    /// Returns error if the underlying HTTP client cannot be built
    pub fn new(server: &ServerConfig, session: Session) -> Result<Self> {
        Ok(Self {
            client: build_client(server)?,
            base_url: server.base_url.trim_end_matches('/').to_string(),
            session,
        })
    }

    fn url(&self, path: &str) -> String {
        endpoint(&self.base_url, path)
    }

    /// `/api/history/chat/{id}` with the id percent-encoded as one segment
    fn chat_url(&self, chat_id: &ChatId) -> Result<Url> {
        let mut url = Url::parse(&self.base_url).map_err(OutreachError::UrlParse)?;
        url.path_segments_mut()
            .map_err(|_| {
                OutreachError::Config(format!("Cannot build paths on {}", self.base_url))
            })?
            .pop_if_empty()
            .extend(["api", "history", "chat", chat_id.as_str()]);
        Ok(url)
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request.bearer_auth(self.session.access_token())
    }

    async fn fetch<T: DeserializeOwned>(
        &self,
        operation: &'static str,
        request: RequestBuilder,
    ) -> Result<T> {
        let response = dispatch(operation, self.authorized(request)).await?;
        read_json(operation, response).await
    }

    async fn fire(&self, operation: &'static str, request: RequestBuilder) -> Result<()> {
        dispatch(operation, self.authorized(request)).await?;
        Ok(())
    }
}

#[async_trait]
impl ChatApi for HttpApi {
    async fn list_chats(&self) -> Result<Vec<ChatSummary>> {
        let url = self.url("/api/history/chats");
        let list: ChatList = self.fetch("list_chats", self.client.get(url)).await?;
        Ok(list.chats)
    }

    async fn create_chat(&self) -> Result<ChatId> {
        let url = self.url("/api/chat/create-chat");
        let created: CreatedChat = self.fetch("create_chat", self.client.post(url)).await?;
        Ok(created.chat_id)
    }

    async fn get_chat(&self, chat_id: &ChatId) -> Result<ChatDetail> {
        let url = self.chat_url(chat_id)?;
        self.fetch("get_chat", self.client.get(url)).await
    }

    async fn delete_chat(&self, chat_id: &ChatId) -> Result<()> {
        let url = self.chat_url(chat_id)?;
        self.fire("delete_chat", self.client.delete(url)).await
    }

    async fn send_message(&self, request: &SendMessageRequest) -> Result<SendMessageResponse> {
        let url = self.url("/api/chat/message");
        self.fetch("send_message", self.client.post(url).json(request))
            .await
    }

    async fn get_quota(&self) -> Result<Quota> {
        let url = self.url("/api/billing/quota");
        self.fetch("get_quota", self.client.get(url)).await
    }

    async fn upgrade_plan(&self, plan: Plan) -> Result<()> {
        let url = self.url("/api/billing/upgrade");
        let body = PlanUpgrade { new_plan: plan };
        self.fire("upgrade_plan", self.client.post(url).json(&body))
            .await
    }

    async fn list_plans(&self) -> Result<Vec<PlanInfo>> {
        let url = self.url("/api/billing/plans");
        let catalogue: PlanCatalogue = self.fetch("list_plans", self.client.get(url)).await?;
        Ok(catalogue.plans)
    }

    async fn analyze_profile(&self, request: &ProfileRequest) -> Result<ProfileAnalysis> {
        let url = self.url("/api/linkedin/analyze");
        self.fetch("analyze_profile", self.client.post(url).json(request))
            .await
    }

    async fn profile_insights(&self) -> Result<ProfileInsights> {
        let url = self.url("/api/linkedin/insights");
        self.fetch("profile_insights", self.client.get(url)).await
    }
}

/// Build a `reqwest` client honoring the configured timeout
pub(crate) fn build_client(server: &ServerConfig) -> Result<Client> {
    let mut builder = Client::builder();
    if let Some(timeout) = server.timeout() {
        builder = builder.timeout(timeout);
    }
    Ok(builder.build().map_err(OutreachError::Http)?)
}

pub(crate) fn endpoint(base_url: &str, path: &str) -> String {
    format!("{}{}", base_url.trim_end_matches('/'), path)
}

/// Send `request`, turning transport failures and non-success statuses into errors
pub(crate) async fn dispatch(operation: &'static str, request: RequestBuilder) -> Result<Response> {
    let response = request.send().await.map_err(|e| {
        tracing::debug!("{} transport failure: {}", operation, e);
        increment_counter!("api_requests_total", "operation" => operation, "outcome" => "transport_error");
        OutreachError::Http(e)
    })?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        tracing::debug!("{} returned {}: {}", operation, status, body);
        increment_counter!("api_requests_total", "operation" => operation, "outcome" => "status_error");
        return Err(OutreachError::Api {
            operation,
            status: status.as_u16(),
            message: body,
        }
        .into());
    }

    tracing::debug!("{} returned {}", operation, status);
    increment_counter!("api_requests_total", "operation" => operation, "outcome" => "ok");
    Ok(response)
}

pub(crate) async fn read_json<T: DeserializeOwned>(
    operation: &'static str,
    response: Response,
) -> Result<T> {
    let body = response.text().await.map_err(OutreachError::Http)?;
    serde_json::from_str(&body).map_err(|e| {
        tracing::debug!("Failed to parse {} response: {}", operation, e);
        OutreachError::Serialization(e).into()
    })
}
