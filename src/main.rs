use anyhow::Context;
use axum::{
    extract::Extension,
    http::{header, HeaderValue, Method},
    routing::{get, patch, post},
    Router,
};
use clap::Parser;
use mongodb::{bson::doc, options::ClientOptions, Client};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::info;

mod catalog;
mod controllers;
mod errors;
pub mod models;
mod pricing;
mod reservation;
mod store;
mod workflow;

use controllers::{booking_controller::*, home_controller, movie_controller::*};
use store::MongoStore;

#[derive(Parser)]
#[command(name = "cinebook-api")]
struct Args {
    #[arg(long, env = "MONGODB_URI", default_value = "mongodb://localhost:27017")]
    mongodb_uri: String,

    #[arg(long, env = "APP_URL", default_value = "http://localhost:5173")]
    app_url: String,

    #[arg(long, env = "PORT", default_value = "4000")]
    port: u16,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();
    let args = Args::parse();

    let client_options = ClientOptions::parse(&args.mongodb_uri)
        .await
        .context("failed to parse MongoDB connection string")?;
    let client = Client::with_options(client_options).context("failed to initialize MongoDB client")?;

    // Ping the server to see if we can reach the cluster.
    client
        .database("cinebook")
        .run_command(doc! {"ping": 1}, None)
        .await
        .context("failed to connect to MongoDB")?;
    info!("connected to MongoDB");

    let shared_store = Arc::new(MongoStore::new(client, "cinebook"));

    let app = Router::new()
        .route("/", get(home_controller::index))
        .route("/movies", get(list_movies))
        .route("/movies/:id", get(get_movie))
        .route("/showtimes", get(list_showtimes))
        .route("/snacks", get(list_snacks))
        .route("/offers", get(list_offers))
        .route("/seats/:movie_id/:date/:showtime_id", get(seat_map))
        .route("/bookings", post(create_booking))
        .route("/bookings", get(list_bookings))
        .route("/bookings/:id", get(get_booking))
        .route("/bookings/:id/cancel", patch(cancel_booking))
        .layer(
            CorsLayer::new()
                .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::OPTIONS])
                .allow_origin(
                    args.app_url
                        .parse::<HeaderValue>()
                        .context("invalid APP_URL")?,
                )
                .allow_headers([header::CONTENT_TYPE]),
        )
        .layer(Extension(shared_store));

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", args.port))
        .await
        .context("failed to bind listener")?;
    info!("listening on port {}", args.port);
    axum::serve(listener, app).await?;

    Ok(())
}
