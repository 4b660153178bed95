use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use tracing::{debug, error, warn};

use super::ClinicBackend;
use crate::error::ClientError;
use crate::models::{
    Appointment, ChatRequest, ChatResponse, LoginRequest, LoginResponse, NewAppointment,
    NewUser, RegisterRequest, StatusUpdate, User,
};

/// reqwest-backed client for the clinic API rooted at `base_url`
/// (e.g. `http://localhost:8000/api`).
#[derive(Clone)]
pub struct HttpBackend {
    client: Client,
    base_url: String,
}

impl HttpBackend {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn send(&self, what: &str, req: RequestBuilder) -> Result<Response, ClientError> {
        let response = req.send().await.map_err(|e| {
            error!("{what}: cannot reach backend: {e}");
            ClientError::Transport(e.to_string())
        })?;

        let status = response.status();
        if status.is_success() {
            debug!("{what}: {status}");
            return Ok(response);
        }

        let detail = read_detail(response).await;
        warn!("{what}: backend returned {status}: {detail:?}");
        Err(ClientError::Rejected {
            status: status.as_u16(),
            detail,
        })
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        what: &str,
        req: RequestBuilder,
    ) -> Result<T, ClientError> {
        let response = self.send(what, req).await?;
        response
            .json::<T>()
            .await
            .map_err(|e| ClientError::Decode(format!("{what}: {e}")))
    }
}

/// Pull `detail` out of an error body. FastAPI-style validation errors carry a list
/// there; only a plain string is shown to the visitor.
async fn read_detail(response: Response) -> Option<String> {
    let body: serde_json::Value = response.json().await.ok()?;
    match body.get("detail")? {
        serde_json::Value::String(s) => Some(s.clone()),
        _ => None,
    }
}

#[async_trait]
impl ClinicBackend for HttpBackend {
    async fn login(&self, req: &LoginRequest) -> Result<LoginResponse, ClientError> {
        self.send_json("login", self.client.post(self.url("/login")).json(req))
            .await
    }

    async fn register(&self, req: &RegisterRequest) -> Result<(), ClientError> {
        self.send("register", self.client.post(self.url("/register")).json(req))
            .await?;
        Ok(())
    }

    async fn list_appointments(&self, token: &str) -> Result<Vec<Appointment>, ClientError> {
        self.send_json(
            "list appointments",
            self.client.get(self.url("/appointments")).bearer_auth(token),
        )
        .await
    }

    async fn create_appointment(
        &self,
        token: &str,
        appointment: &NewAppointment,
    ) -> Result<(), ClientError> {
        self.send(
            "create appointment",
            self.client
                .post(self.url("/appointments"))
                .bearer_auth(token)
                .json(appointment),
        )
        .await?;
        Ok(())
    }

    async fn update_appointment(
        &self,
        token: &str,
        id: i64,
        update: &StatusUpdate,
    ) -> Result<(), ClientError> {
        self.send(
            "update appointment",
            self.client
                .put(self.url(&format!("/appointments/{id}")))
                .bearer_auth(token)
                .json(update),
        )
        .await?;
        Ok(())
    }

    async fn delete_appointment(&self, token: &str, id: i64) -> Result<(), ClientError> {
        self.send(
            "delete appointment",
            self.client
                .delete(self.url(&format!("/appointments/{id}")))
                .bearer_auth(token),
        )
        .await?;
        Ok(())
    }

    async fn list_users(&self, token: &str) -> Result<Vec<User>, ClientError> {
        self.send_json(
            "list users",
            self.client.get(self.url("/users")).bearer_auth(token),
        )
        .await
    }

    async fn create_user(&self, token: &str, user: &NewUser) -> Result<(), ClientError> {
        self.send(
            "create user",
            self.client
                .post(self.url("/admin/create-user"))
                .bearer_auth(token)
                .json(user),
        )
        .await?;
        Ok(())
    }

    async fn delete_user(&self, token: &str, id: i64) -> Result<(), ClientError> {
        self.send(
            "delete user",
            self.client
                .delete(self.url(&format!("/users/{id}")))
                .bearer_auth(token),
        )
        .await?;
        Ok(())
    }

    async fn chat(&self, token: &str, req: &ChatRequest) -> Result<String, ClientError> {
        let reply: ChatResponse = self
            .send_json(
                "chat",
                self.client
                    .post(self.url("/chat"))
                    .bearer_auth(token)
                    .json(req),
            )
            .await?;
        Ok(reply.response)
    }
}
