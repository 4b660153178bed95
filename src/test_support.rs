//! In-memory stand-in for the clinic backend used by unit tests.

use std::sync::{
    Arc, Mutex,
    atomic::{AtomicBool, AtomicUsize, Ordering},
};

use async_trait::async_trait;
use tokio::net::TcpListener;

use crate::backend::ClinicBackend;
use crate::error::ClientError;
use crate::models::{
    AppState, Appointment, AppointmentStatus, ChatRequest, LoginRequest, LoginResponse,
    NewAppointment, NewUser, RegisterRequest, Role, StatusUpdate, User,
};
use crate::session::{SessionData, SessionStore};

/// A portal served on an ephemeral port, backed by a [`FakeBackend`].
pub struct Portal {
    pub base: String,
    pub client: reqwest::Client,
    pub state: AppState,
}

impl Portal {
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base)
    }

    /// Put a session straight into the store and return its cookie value.
    pub async fn sign_in(&self, role: Role) -> String {
        let name = match role {
            Role::Student => "Ana Cruz",
            Role::Admin => "Clinic Admin",
            Role::SuperAdmin => "Super Admin",
        };
        self.state
            .sessions
            .create(SessionData::new("token-1".into(), role, 1, name.into()))
            .await
    }

    pub fn get_as(&self, sid: &str, path: &str) -> reqwest::RequestBuilder {
        self.client
            .get(self.url(path))
            .header("cookie", format!("clinic_session={sid}"))
    }

    pub fn post_as(&self, sid: &str, path: &str) -> reqwest::RequestBuilder {
        self.client
            .post(self.url(path))
            .header("cookie", format!("clinic_session={sid}"))
    }
}

pub async fn spawn_portal(backend: Arc<FakeBackend>) -> Portal {
    let state = AppState {
        backend,
        sessions: SessionStore::new(chrono::Duration::hours(24)),
        secure_cookies: false,
    };
    let app = crate::routes::router(state.clone());
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    let client = reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .unwrap();
    Portal {
        base: format!("http://{addr}"),
        client,
        state,
    }
}

#[derive(Default)]
pub struct FakeBackend {
    appointments: Mutex<Vec<Appointment>>,
    users: Mutex<Vec<User>>,
    chat_requests: Mutex<Vec<ChatRequest>>,
    fail_chat: AtomicBool,
    fail_list: AtomicBool,
    refuse_tokens: AtomicBool,
    next_id: AtomicUsize,
    /// Number of calls that needed a bearer token.
    authed_calls: AtomicUsize,
}

impl FakeBackend {
    pub fn new() -> Self {
        Self {
            next_id: AtomicUsize::new(100),
            ..Default::default()
        }
    }

    pub fn with_appointments(list: Vec<Appointment>) -> Self {
        let fake = Self::new();
        *fake.appointments.lock().unwrap() = list;
        fake
    }

    pub fn add_user(&self, user: User) {
        self.users.lock().unwrap().push(user);
    }

    pub fn appointments(&self) -> Vec<Appointment> {
        self.appointments.lock().unwrap().clone()
    }

    pub fn chat_requests(&self) -> Vec<ChatRequest> {
        self.chat_requests.lock().unwrap().clone()
    }

    pub fn fail_chat(&self, fail: bool) {
        self.fail_chat.store(fail, Ordering::SeqCst);
    }

    pub fn fail_list(&self, fail: bool) {
        self.fail_list.store(fail, Ordering::SeqCst);
    }

    /// Answer every token-bearing call with 401, as for an expired JWT.
    pub fn refuse_tokens(&self, refuse: bool) {
        self.refuse_tokens.store(refuse, Ordering::SeqCst);
    }

    pub fn authed_calls(&self) -> usize {
        self.authed_calls.load(Ordering::SeqCst)
    }

    fn authed(&self, token: &str) -> Result<(), ClientError> {
        self.authed_calls.fetch_add(1, Ordering::SeqCst);
        if token.is_empty() {
            return Err(ClientError::Rejected {
                status: 403,
                detail: Some("Not authenticated".into()),
            });
        }
        if self.refuse_tokens.load(Ordering::SeqCst) {
            return Err(ClientError::Rejected {
                status: 401,
                detail: Some("Could not validate credentials".into()),
            });
        }
        Ok(())
    }

    fn not_found(what: &str) -> ClientError {
        ClientError::Rejected {
            status: 404,
            detail: Some(format!("{what} not found")),
        }
    }
}

#[async_trait]
impl ClinicBackend for FakeBackend {
    async fn login(&self, req: &LoginRequest) -> Result<LoginResponse, ClientError> {
        let users = self.users.lock().unwrap();
        let user = users
            .iter()
            .find(|u| u.email == req.email && req.password == "secret")
            .ok_or(ClientError::Rejected {
                status: 401,
                detail: Some("Invalid email or password".into()),
            })?;
        Ok(LoginResponse {
            token: format!("token-{}", user.id),
            role: user.role,
            user_id: user.id,
            full_name: Some(user.full_name.clone()),
        })
    }

    async fn register(&self, req: &RegisterRequest) -> Result<(), ClientError> {
        let mut users = self.users.lock().unwrap();
        if users.iter().any(|u| u.email == req.email) {
            return Err(ClientError::Rejected {
                status: 400,
                detail: Some("Email already registered".into()),
            });
        }
        let id = self.next_id.fetch_add(1, Ordering::SeqCst) as i64;
        users.push(User {
            id,
            full_name: req.full_name.clone(),
            email: req.email.clone(),
            role: Role::Student,
            created_at: None,
        });
        Ok(())
    }

    async fn list_appointments(&self, token: &str) -> Result<Vec<Appointment>, ClientError> {
        self.authed(token)?;
        if self.fail_list.load(Ordering::SeqCst) {
            return Err(ClientError::Transport("connection refused".into()));
        }
        Ok(self.appointments())
    }

    async fn create_appointment(
        &self,
        token: &str,
        appointment: &NewAppointment,
    ) -> Result<(), ClientError> {
        self.authed(token)?;
        let date = chrono::NaiveDate::parse_from_str(&appointment.appointment_date, "%Y-%m-%d")
            .map_err(|_| ClientError::Rejected {
                status: 422,
                detail: Some("invalid date".into()),
            })?;
        let id = self.next_id.fetch_add(1, Ordering::SeqCst) as i64;
        self.appointments.lock().unwrap().push(Appointment {
            id,
            student_name: "Ana Cruz".into(),
            student_email: None,
            service_type: Some(appointment.service_type.clone()),
            urgency: Some(appointment.urgency.clone()),
            appointment_date: date,
            appointment_time: appointment.appointment_time.clone(),
            reason: Some(appointment.reason.clone()),
            status: AppointmentStatus::Pending,
            admin_note: None,
            booking_mode: appointment.booking_mode,
        });
        Ok(())
    }

    async fn update_appointment(
        &self,
        token: &str,
        id: i64,
        update: &StatusUpdate,
    ) -> Result<(), ClientError> {
        self.authed(token)?;
        let mut list = self.appointments.lock().unwrap();
        let apt = list
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or_else(|| Self::not_found("Appointment"))?;
        apt.status = update.status.clone();
        apt.admin_note = update.admin_note.clone();
        Ok(())
    }

    async fn delete_appointment(&self, token: &str, id: i64) -> Result<(), ClientError> {
        self.authed(token)?;
        let mut list = self.appointments.lock().unwrap();
        let pos = list
            .iter()
            .position(|a| a.id == id)
            .ok_or_else(|| Self::not_found("Appointment"))?;
        if list[pos].status == AppointmentStatus::Pending {
            list[pos].status = AppointmentStatus::Canceled;
        } else {
            list.remove(pos);
        }
        Ok(())
    }

    async fn list_users(&self, token: &str) -> Result<Vec<User>, ClientError> {
        self.authed(token)?;
        Ok(self.users.lock().unwrap().clone())
    }

    async fn create_user(&self, token: &str, user: &NewUser) -> Result<(), ClientError> {
        self.authed(token)?;
        let id = self.next_id.fetch_add(1, Ordering::SeqCst) as i64;
        self.users.lock().unwrap().push(User {
            id,
            full_name: user.full_name.clone(),
            email: user.email.clone(),
            role: user.role,
            created_at: Some("2024-06-01 08:00:00".into()),
        });
        Ok(())
    }

    async fn delete_user(&self, token: &str, id: i64) -> Result<(), ClientError> {
        self.authed(token)?;
        let mut users = self.users.lock().unwrap();
        let before = users.len();
        users.retain(|u| u.id != id);
        if users.len() == before {
            return Err(Self::not_found("User"));
        }
        Ok(())
    }

    async fn chat(&self, token: &str, req: &ChatRequest) -> Result<String, ClientError> {
        self.authed(token)?;
        self.chat_requests.lock().unwrap().push(req.clone());
        if self.fail_chat.load(Ordering::SeqCst) {
            return Err(ClientError::Transport("connection reset".into()));
        }
        Ok(format!("You said: {}", req.message))
    }
}
