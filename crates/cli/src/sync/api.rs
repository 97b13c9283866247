// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Remote movie API abstraction.
//!
//! Provides a trait-based API layer that enables:
//! - Real HTTP calls against a TMDB-compatible server
//! - Mock implementations for unit testing

use std::future::Future;
use std::pin::Pin;

use reqwest::header::ACCEPT;
use reqwest::{Client, Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use reel_core::{Genre, Movie, MovieId};

use crate::config::ApiConfig;

/// Error type for remote API calls.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The request never produced a response (DNS, connect, timeout).
    #[error("request failed: {0}")]
    Request(String),

    /// The server answered with a non-2xx status.
    #[error("{url} returned HTTP {status}")]
    Status { status: u16, url: String },

    /// The response body did not have the expected shape.
    #[error("unexpected response body: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            ApiError::Decode(e.to_string())
        } else if let Some(status) = e.status() {
            ApiError::Status {
                status: status.as_u16(),
                url: e.url().map(|u| u.to_string()).unwrap_or_default(),
            }
        } else {
            ApiError::Request(e.to_string())
        }
    }
}

/// Result type for remote API calls.
pub type ApiResult<T> = Result<T, ApiError>;

/// Boxed future returned by [`FavoritesApi`] methods.
pub type ApiFuture<'a, T> = Pin<Box<dyn Future<Output = ApiResult<T>> + Send + 'a>>;

/// The remote calls the favorites subsystem depends on.
pub trait FavoritesApi: Send + Sync {
    /// Marks a movie as favorite (`true`) or removes it (`false`).
    fn toggle_favorite(&self, movie_id: MovieId, favorite: bool) -> ApiFuture<'_, ()>;

    /// Current server-side favorites list.
    fn favorite_movies(&self) -> ApiFuture<'_, Vec<Movie>>;

    /// Whether the server lists the movie as a favorite.
    fn favorite_status(&self, movie_id: MovieId) -> ApiFuture<'_, bool> {
        Box::pin(async move {
            let favorites = self.favorite_movies().await?;
            Ok(favorites.iter().any(|m| m.id == movie_id))
        })
    }

    /// Movie genre list.
    fn genres(&self) -> ApiFuture<'_, Vec<Genre>>;

    /// First page of popular movies.
    fn discover_movies(&self) -> ApiFuture<'_, Vec<Movie>>;
}

#[derive(Serialize)]
struct FavoriteRequest {
    media_type: &'static str,
    media_id: MovieId,
    favorite: bool,
}

#[derive(Deserialize)]
struct MovieList {
    #[serde(default)]
    results: Vec<Movie>,
}

#[derive(Deserialize)]
struct GenreList {
    #[serde(default)]
    genres: Vec<Genre>,
}

const DISCOVER_QUERY: &[(&str, &str)] = &[
    ("include_adult", "false"),
    ("include_video", "false"),
    ("language", "en-US"),
    ("page", "1"),
    ("sort_by", "popularity.desc"),
];

/// HTTP implementation of [`FavoritesApi`] using reqwest.
pub struct HttpApi {
    client: Client,
    base_url: String,
    account_id: String,
    token: Option<String>,
}

impl HttpApi {
    /// Create a client for the configured server.
    pub fn new(config: &ApiConfig) -> ApiResult<Self> {
        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| ApiError::Request(e.to_string()))?;
        Ok(HttpApi {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            account_id: config.account_id.clone(),
            token: config.token.clone(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn request(&self, method: Method, url: &str) -> RequestBuilder {
        let builder = self
            .client
            .request(method, url)
            .header(ACCEPT, "application/json");
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn send(&self, builder: RequestBuilder) -> ApiResult<reqwest::Response> {
        let response = builder.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Status {
                status: status.as_u16(),
                url: response.url().to_string(),
            });
        }
        Ok(response)
    }

    async fn get_json<T: DeserializeOwned>(&self, builder: RequestBuilder) -> ApiResult<T> {
        let response = self.send(builder).await?;
        response
            .json::<T>()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))
    }
}

impl FavoritesApi for HttpApi {
    fn toggle_favorite(&self, movie_id: MovieId, favorite: bool) -> ApiFuture<'_, ()> {
        Box::pin(async move {
            let url = self.url(&format!("/account/{}/favorite", self.account_id));
            let body = FavoriteRequest {
                media_type: "movie",
                media_id: movie_id,
                favorite,
            };
            self.send(self.request(Method::POST, &url).json(&body))
                .await?;
            tracing::debug!("toggled favorite {} -> {}", movie_id, favorite);
            Ok(())
        })
    }

    fn favorite_movies(&self) -> ApiFuture<'_, Vec<Movie>> {
        Box::pin(async move {
            let url = self.url(&format!("/account/{}/favorite/movies", self.account_id));
            let list: MovieList = self.get_json(self.request(Method::GET, &url)).await?;
            Ok(list.results)
        })
    }

    fn genres(&self) -> ApiFuture<'_, Vec<Genre>> {
        Box::pin(async move {
            let url = self.url("/genre/movie/list");
            let builder = self
                .request(Method::GET, &url)
                .query(&[("language", "en")]);
            let list: GenreList = self.get_json(builder).await?;
            Ok(list.genres)
        })
    }

    fn discover_movies(&self) -> ApiFuture<'_, Vec<Movie>> {
        Box::pin(async move {
            let url = self.url("/discover/movie");
            let builder = self.request(Method::GET, &url).query(DISCOVER_QUERY);
            let list: MovieList = self.get_json(builder).await?;
            Ok(list.results)
        })
    }
}
