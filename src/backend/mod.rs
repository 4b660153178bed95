//! Calls to the clinic REST backend.
//!
//! Page handlers only see [`ClinicBackend`]; [`HttpBackend`] is the production
//! implementation.

use async_trait::async_trait;

use crate::error::ClientError;
use crate::models::{
    Appointment, ChatRequest, LoginRequest, LoginResponse, NewAppointment, NewUser,
    RegisterRequest, StatusUpdate, User,
};

pub mod http;

pub use http::HttpBackend;

#[async_trait]
pub trait ClinicBackend: Send + Sync {
    async fn login(&self, req: &LoginRequest) -> Result<LoginResponse, ClientError>;

    async fn register(&self, req: &RegisterRequest) -> Result<(), ClientError>;

    async fn list_appointments(&self, token: &str) -> Result<Vec<Appointment>, ClientError>;

    async fn create_appointment(
        &self,
        token: &str,
        appointment: &NewAppointment,
    ) -> Result<(), ClientError>;

    async fn update_appointment(
        &self,
        token: &str,
        id: i64,
        update: &StatusUpdate,
    ) -> Result<(), ClientError>;

    /// Cancels a pending appointment or removes a finished one; the backend decides
    /// which from the record's status.
    async fn delete_appointment(&self, token: &str, id: i64) -> Result<(), ClientError>;

    async fn list_users(&self, token: &str) -> Result<Vec<User>, ClientError>;

    async fn create_user(&self, token: &str, user: &NewUser) -> Result<(), ClientError>;

    async fn delete_user(&self, token: &str, id: i64) -> Result<(), ClientError>;

    /// Returns the assistant's reply text.
    async fn chat(&self, token: &str, req: &ChatRequest) -> Result<String, ClientError>;
}
