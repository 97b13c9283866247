// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use super::*;
use crate::commands::testing::TestContext;
use crate::error::Error;
use reel_core::{CacheKey, Genre, Movie};

fn action_genre() -> Genre {
    Genre {
        id: 28,
        name: "Action".to_string(),
    }
}

#[tokio::test]
async fn test_movies_lists_catalog() {
    let mut t = TestContext::new(true).await;
    let mut heat = Movie::new(949, "Heat");
    heat.release_date = "1995-12-15".to_string();
    t.api.set_catalog(vec![heat, Movie::new(1, "One")]);

    movies(&t.ctx, &mut t.out).await.unwrap();

    assert_eq!(t.take_output(), "[949] Heat (1995)\n[1] One\n");
    assert!(t.ctx.cache.get::<Movie>(&CacheKey::MovieDetails(949)).is_some());
}

#[tokio::test]
async fn test_movies_empty_catalog() {
    let mut t = TestContext::new(true).await;
    movies(&t.ctx, &mut t.out).await.unwrap();
    assert_eq!(t.take_output(), "No movies found.\n");
}

#[tokio::test]
async fn test_movies_offline_without_cache_is_unavailable() {
    let mut t = TestContext::new(false).await;
    let err = movies(&t.ctx, &mut t.out).await.unwrap_err();
    assert!(matches!(err, Error::Unavailable { what: "movies" }));
}

#[tokio::test]
async fn test_movies_offline_uses_cache() {
    let mut t = TestContext::new(true).await;
    t.api.set_catalog(vec![Movie::new(1, "One")]);
    movies(&t.ctx, &mut t.out).await.unwrap();
    t.take_output();

    t.ctx.monitor.handle_change(Some(false));
    t.api.set_catalog(Vec::new());
    movies(&t.ctx, &mut t.out).await.unwrap();

    assert_eq!(t.take_output(), "[1] One\n");
}

#[tokio::test]
async fn test_genres_lists_id_and_name() {
    let mut t = TestContext::new(true).await;
    t.api.set_genres(vec![action_genre()]);

    genres(&t.ctx, &mut t.out).await.unwrap();

    assert_eq!(t.take_output(), "    28  Action\n");
}

#[tokio::test]
async fn test_show_includes_status_and_genres() {
    let mut t = TestContext::with_api(
        crate::sync::test_helpers::MockApi::with_favorites(vec![Movie::new(949, "Heat")]),
        true,
    )
    .await;
    t.api.set_genres(vec![action_genre()]);
    let mut heat = Movie::new(949, "Heat");
    heat.genre_ids = vec![28];
    t.remember(&heat);

    show(&t.ctx, 949, &mut t.out).await.unwrap();

    let output = t.take_output();
    assert!(output.starts_with("[949] Heat\n"));
    assert!(output.contains("Genres: Action"));
    assert!(output.contains("Favorite: yes"));
}

#[tokio::test]
async fn test_show_offline_without_genres() {
    let mut t = TestContext::new(false).await;
    t.remember(&Movie::new(7, "Seven"));

    show(&t.ctx, 7, &mut t.out).await.unwrap();

    assert_eq!(t.take_output(), "[7] Seven\nFavorite: unknown\n");
}

#[tokio::test]
async fn test_show_unknown_movie() {
    let mut t = TestContext::new(false).await;
    let err = show(&t.ctx, 404, &mut t.out).await.unwrap_err();
    assert!(matches!(err, Error::MovieNotCached(404)));
}
