use std::sync::Arc;

mod api;
mod config;
mod models;
mod persistence;
mod telemetry;

use hyper::body::Incoming;
use hyper_util::{
    rt::{TokioExecutor, TokioIo, TokioTimer},
    server,
};
use tower::Service;

#[cfg(feature = "telemetry")]
use {
    axum::{body::Body, http},
    tower_http::trace::TraceLayer,
    tower_request_id::{RequestId, RequestIdLayer},
    tracing::error_span,
};

#[tokio::main]
async fn main() {
    telemetry::init();

    let config = config::Config::from_env()
        .unwrap_or_else(|err| panic!("invalid configuration: {}", err));

    let repo: Arc<dyn persistence::Repository> = match config.storage {
        config::Storage::Postgres => Arc::new(
            persistence::database::Repository::new(&config.database)
                .await
                .unwrap_or_else(|err| {
                    panic!(
                        "failed to connect to postgres database on {}: {}",
                        config.database.host, err
                    )
                }),
        ),
        config::Storage::Memory => Arc::new(persistence::memory::Repository::new()),
    };

    let listener = tokio::net::TcpListener::bind(config.listen_addr)
        .await
        .unwrap_or_else(|_| panic!("failed to bind listener to: {}", config.listen_addr));

    telemetry::info!(
        "Listening on {} with {:?} storage",
        listener.local_addr().expect("failed to get local addr"),
        config.storage
    );

    let app = api::app::new(repo);

    #[cfg(feature = "telemetry")]
    let app = app
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &http::Request<Body>| {
                let request_id = request
                    .extensions()
                    .get::<RequestId>()
                    .map(ToString::to_string)
                    .unwrap_or_else(|| "unknown".into());

                error_span!(
                    "request",
                    id = %request_id,
                    method = %request.method(),
                    uri = %request.uri(),
                )
            }),
        )
        .layer(RequestIdLayer);

    loop {
        #[cfg_attr(not(feature = "telemetry"), allow(unused_variables))]
        let (socket, remote_addr) = match listener.accept().await {
            Ok(accepted) => accepted,
            #[cfg_attr(not(feature = "telemetry"), allow(unused_variables))]
            Err(err) => {
                telemetry::error!("failed to accept connection: {}", err);
                continue;
            }
        };
        let tower_service = app.clone();

        telemetry::debug!("Accepted connection from {}", remote_addr);

        tokio::spawn(async move {
            let socket = TokioIo::new(socket);

            let hyper_service =
                hyper::service::service_fn(move |request: axum::extract::Request<Incoming>| {
                    tower_service.clone().call(request)
                });

            #[cfg_attr(not(feature = "telemetry"), allow(unused_variables))]
            if let Err(err) = server::conn::auto::Builder::new(TokioExecutor::new())
                .http2()
                .keep_alive_timeout(std::time::Duration::from_secs(120))
                .keep_alive_interval(std::time::Duration::from_secs(30))
                .timer(TokioTimer::new())
                .serve_connection(socket, hyper_service)
                .await
            {
                telemetry::error!("failed to serve connection: {}", err);
            }
        });
    }
}
