//! Application state shared across handlers

use common::token::TokenMaker;
use sqlx::PgPool;

use crate::{
    posts::PostService,
    repositories::{CommentRepository, FollowRepository, PostRepository, UserRepository},
};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub token_maker: TokenMaker,
    pub user_repository: UserRepository,
    pub follow_repository: FollowRepository,
    pub post_repository: PostRepository,
    pub comment_repository: CommentRepository,
    pub post_service: PostService,
}

impl AppState {
    /// Wire every repository to `pool`
    pub fn new(pool: PgPool, token_maker: TokenMaker, post_service: PostService) -> Self {
        Self {
            user_repository: UserRepository::new(pool.clone()),
            follow_repository: FollowRepository::new(pool.clone()),
            post_repository: PostRepository::new(pool.clone()),
            comment_repository: CommentRepository::new(pool.clone()),
            db_pool: pool,
            token_maker,
            post_service,
        }
    }
}
