//! Typed HTTP client for the Pressroom API.
//!
//! Authenticated calls take the [`Session`] explicitly and send its bearer
//! token. Error bodies are decoded into [`ClientError::Api`].

use std::time::Duration;

use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;
use uuid::Uuid;

use pressroom_core::domain::{Page, Post};

use crate::builder::SaveRequest;
use crate::dto::{
    AuthResponse, CreatePageRequest, CreatePostRequest, LoginRequest, MessageBody, PageBody,
    PagesBody, PostBody, PostListBody, PostsBody, RegisterUserRequest, UpdatePageRequest,
    UpdatePostRequest, UserBody,
};
use crate::response::{ApiResponse, ErrorResponse};
use crate::session::Session;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("{message} (HTTP {status})")]
    Api { status: StatusCode, message: String },

    #[error("Not signed in")]
    NotAuthenticated,
}

pub type ClientResult<T> = Result<T, ClientError>;

pub struct ApiClient {
    http: Client,
    base_url: String,
}

impl ApiClient {
    /// `base_url` is the API root, e.g. `http://localhost:8080/api`.
    pub fn new(base_url: impl Into<String>) -> ClientResult<Self> {
        let http = Client::builder().timeout(Duration::from_secs(30)).build()?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.http.request(method, self.url(path))
    }

    fn authed(&self, session: &Session, method: Method, path: &str) -> ClientResult<RequestBuilder> {
        let bearer = session.bearer().ok_or(ClientError::NotAuthenticated)?;
        Ok(self
            .request(method, path)
            .header(reqwest::header::AUTHORIZATION, bearer))
    }

    async fn send<T: DeserializeOwned>(request: RequestBuilder) -> ClientResult<T> {
        let response = request.send().await?;
        let status = response.status();

        if !status.is_success() {
            let message = match response.json::<ErrorResponse>().await {
                Ok(body) => body.error,
                Err(_) => status.canonical_reason().unwrap_or("Request failed").to_string(),
            };
            return Err(ClientError::Api { status, message });
        }

        let body: ApiResponse<T> = response.json().await?;
        Ok(body.data)
    }

    async fn send_json<B: Serialize, T: DeserializeOwned>(
        request: RequestBuilder,
        body: &B,
    ) -> ClientResult<T> {
        Self::send(request.json(body)).await
    }

    // ------------------------------------------------------------------------
    // Auth
    // ------------------------------------------------------------------------

    /// Register and sign the session in.
    pub async fn register(
        &self,
        session: &mut Session,
        request: &RegisterUserRequest,
    ) -> ClientResult<()> {
        let auth: AuthResponse =
            Self::send_json(self.request(Method::POST, "/auth/register"), request).await?;
        session.login(auth);
        Ok(())
    }

    /// Log in and sign the session in.
    pub async fn login(&self, session: &mut Session, request: &LoginRequest) -> ClientResult<()> {
        let auth: AuthResponse =
            Self::send_json(self.request(Method::POST, "/auth/login"), request).await?;
        session.login(auth);
        Ok(())
    }

    pub async fn me(&self, session: &Session) -> ClientResult<UserBody> {
        Self::send(self.authed(session, Method::GET, "/auth/me")?).await
    }

    // ------------------------------------------------------------------------
    // Pages
    // ------------------------------------------------------------------------

    pub async fn create_page(
        &self,
        session: &Session,
        request: &CreatePageRequest,
    ) -> ClientResult<Page> {
        let body: PageBody =
            Self::send_json(self.authed(session, Method::POST, "/pages")?, request).await?;
        Ok(body.page)
    }

    pub async fn update_page(
        &self,
        session: &Session,
        id: Uuid,
        request: &UpdatePageRequest,
    ) -> ClientResult<Page> {
        let path = format!("/pages/{id}");
        let body: PageBody =
            Self::send_json(self.authed(session, Method::PUT, &path)?, request).await?;
        Ok(body.page)
    }

    /// Send whatever the builder produced.
    pub async fn save_page(&self, session: &Session, save: &SaveRequest) -> ClientResult<Page> {
        match save {
            SaveRequest::Create(request) => self.create_page(session, request).await,
            SaveRequest::Update { id, request } => self.update_page(session, *id, request).await,
        }
    }

    pub async fn my_pages(&self, session: &Session) -> ClientResult<PagesBody> {
        Self::send(self.authed(session, Method::GET, "/pages/my-pages")?).await
    }

    pub async fn delete_page(&self, session: &Session, id: Uuid) -> ClientResult<MessageBody> {
        let path = format!("/pages/{id}");
        Self::send(self.authed(session, Method::DELETE, &path)?).await
    }

    pub async fn published_page(&self, slug: &str) -> ClientResult<Page> {
        let body: PageBody = Self::send(self.request(Method::GET, &format!("/pages/{slug}"))).await?;
        Ok(body.page)
    }

    // ------------------------------------------------------------------------
    // Posts
    // ------------------------------------------------------------------------

    pub async fn list_posts(&self, page: u64, limit: u64) -> ClientResult<PostListBody> {
        let request = self
            .request(Method::GET, "/posts")
            .query(&[("page", page), ("limit", limit)]);
        Self::send(request).await
    }

    pub async fn published_post(&self, slug: &str) -> ClientResult<PostBody> {
        Self::send(self.request(Method::GET, &format!("/posts/{slug}"))).await
    }

    pub async fn create_post(
        &self,
        session: &Session,
        request: &CreatePostRequest,
    ) -> ClientResult<Post> {
        let body: PostBody<Post> =
            Self::send_json(self.authed(session, Method::POST, "/posts")?, request).await?;
        Ok(body.post)
    }

    pub async fn update_post(
        &self,
        session: &Session,
        id: Uuid,
        request: &UpdatePostRequest,
    ) -> ClientResult<Post> {
        let path = format!("/posts/{id}");
        let body: PostBody<Post> =
            Self::send_json(self.authed(session, Method::PUT, &path)?, request).await?;
        Ok(body.post)
    }

    pub async fn my_posts(&self, session: &Session) -> ClientResult<PostsBody> {
        Self::send(self.authed(session, Method::GET, "/posts/user/my-posts")?).await
    }

    pub async fn delete_post(&self, session: &Session, id: Uuid) -> ClientResult<MessageBody> {
        let path = format!("/posts/{id}");
        Self::send(self.authed(session, Method::DELETE, &path)?).await
    }
}
