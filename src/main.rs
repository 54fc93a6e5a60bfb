use std::sync::Arc;

use htserve::config::Config;
use htserve::router::Router;
use htserve::server;
use serde_json::json;

fn routes() -> Router {
    let mut router = Router::new();

    router
        .get("/", |ctx| ctx.response.write("Hello from htserve\n"))
        .get("/home", |ctx| {
            ctx.response
                .write("<!DOCTYPE html><html><body><h1>home</h1></body></html>")
        })
        .get("/home/level2", |ctx| ctx.response.write("level2\n"))
        .get("/account/foo", |ctx| ctx.response.write("foo\n"))
        .get("/account/bar", |ctx| {
            let query = ctx.request.uri.query_pairs();
            ctx.response.write(json!({ "account": "bar", "query": query }));
        })
        .post("/account/bar", |ctx| {
            let length = ctx.request.body().len();
            ctx.response.write(json!({ "received": length }));
        });

    router
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cfg = Config::load()?;

    tracing_subscriber::fmt()
        .with_target(false)
        .with_level(true)
        .with_max_level(cfg.log_level()?)
        .init();

    let router = Arc::new(routes());
    tracing::info!(count = router.route_count(), "Routes:\n{}", router);

    tokio::select! {
        res = server::listener::run(&cfg.server, router) => {
            res?;
        }

        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Shutdown signal received");
        }
    }

    Ok(())
}
