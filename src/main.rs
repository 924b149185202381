/*
 * Responsibility
 * - tokio ランタイムの起動
 * - app::run() を呼ぶだけ (ロジックは置かない)
 */
use anyhow::Result;

mod api;
mod app;
mod config;
mod error;
mod middleware;
mod repos;
mod services;
mod state;

#[tokio::main]
async fn main() -> Result<()> {
    app::run().await
}
