use super::{IRemoteMirror, RemoteMirrorError, RemoteReminderAttributes, RemoteReminderRow};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use tracing::warn;

const REMINDERS_TABLE: &str = "reminders";

/// Mirror backed by a PostgREST style HTTP API (the original deployment
/// used a hosted Supabase table). Rows live in a `reminders` table keyed by
/// a server-assigned `id`.
pub struct RestRemoteMirror {
    client: Client,
    base_url: String,
    api_key: String,
}

impl RestRemoteMirror {
    pub fn new(base_url: String, api_key: String) -> Self {
        Self {
            client: Client::new(),
            base_url,
            api_key,
        }
    }

    fn table_url(&self, filter: Option<&str>) -> String {
        match filter {
            Some(filter) => format!(
                "{}/rest/v1/{}?{}",
                self.base_url, REMINDERS_TABLE, filter
            ),
            None => format!("{}/rest/v1/{}", self.base_url, REMINDERS_TABLE),
        }
    }

    fn authed(&self, req: RequestBuilder) -> RequestBuilder {
        req.header("apikey", &self.api_key)
            .header("authorization", format!("Bearer {}", self.api_key))
    }

    async fn send(&self, req: RequestBuilder) -> Result<Response, RemoteMirrorError> {
        let res = self
            .authed(req)
            .send()
            .await
            .map_err(|e| RemoteMirrorError::Network(e.to_string()))?;

        match res.status() {
            s if s.is_success() => Ok(res),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                Err(RemoteMirrorError::Unauthorized)
            }
            s => Err(RemoteMirrorError::Server(s.as_u16())),
        }
    }
}

#[async_trait::async_trait]
impl IRemoteMirror for RestRemoteMirror {
    async fn insert(
        &self,
        attributes: &RemoteReminderAttributes,
    ) -> Result<String, RemoteMirrorError> {
        let req = self
            .client
            .post(&self.table_url(None))
            .header("prefer", "return=representation")
            .json(&[attributes]);

        let rows = self
            .send(req)
            .await?
            .json::<Vec<RemoteReminderRow>>()
            .await
            .map_err(|e| RemoteMirrorError::Decode(e.to_string()))?;

        match rows.into_iter().next() {
            Some(row) => Ok(row.id),
            None => Err(RemoteMirrorError::Decode(
                "Insert returned no representation of the new row".into(),
            )),
        }
    }

    async fn update(
        &self,
        durable_id: &str,
        attributes: &RemoteReminderAttributes,
    ) -> Result<(), RemoteMirrorError> {
        let filter = format!("id=eq.{}", durable_id);
        let req = self
            .client
            .patch(&self.table_url(Some(&filter)))
            .json(attributes);

        self.send(req).await.map(|_| ())
    }

    async fn delete(&self, durable_id: &str) -> Result<(), RemoteMirrorError> {
        let filter = format!("id=eq.{}", durable_id);
        let req = self.client.delete(&self.table_url(Some(&filter)));

        self.send(req).await.map(|_| ())
    }

    async fn fetch_all(&self) -> Result<Vec<RemoteReminderRow>, RemoteMirrorError> {
        let req = self
            .client
            .get(&self.table_url(Some("select=*&order=trigger_at.asc")));

        self.send(req)
            .await?
            .json::<Vec<RemoteReminderRow>>()
            .await
            .map_err(|e| RemoteMirrorError::Decode(e.to_string()))
    }

    async fn ping(&self) -> bool {
        let req = self.client.get(&self.table_url(Some("select=id&limit=1")));
        match self.send(req).await {
            Ok(_) => true,
            Err(e) => {
                warn!("Remote mirror ping failed: {}", e);
                false
            }
        }
    }
}
