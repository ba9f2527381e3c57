use actix_cors::Cors;
use actix_web::{dev::Server, http, web, web::Data, App, HttpServer};
use actix_web::{error::InternalError, web::JsonConfig};
use actix_web_opentelemetry::RequestTracing;
use anyhow::Error;
use std::net::TcpListener;

use crate::auth::guard::Guard;
use crate::config::{ServerConfig, Settings};
use crate::controllers::v1_routes;
use crate::repository::Repo;
use crate::util::ApiResponse;

pub struct Application {
    port: u16,
    pub repo: Repo,
    server: Server,
}

impl Application {
    pub fn build(settings: Settings, repo: Repo) -> Result<Application, Error> {
        // Web server configuration
        let (address, port, tcp_listener) = web_server_config(&settings.server)?;

        let guard_data = Data::new(Guard::new(repo, &settings.auth));
        let repo_data = Data::new(repo);
        let settings_data = Data::new(settings.clone());

        let server = HttpServer::new(move || {
            App::new()
                .wrap(cors(&settings.server))
                .wrap(RequestTracing::new())
                // HTTP API Routes
                .service(web::scope("/v1").configure(v1_routes))
                // Application configuration
                .app_data(json_cfg())
                .app_data(settings_data.clone())
                .app_data(repo_data.clone())
                .app_data(guard_data.clone())
        })
        .listen(tcp_listener)?
        .run();

        tracing::info!(address = %address, port = port, "Server listening");

        Ok(Application { server, port, repo })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub async fn run_until_stopped(self) -> Result<(), std::io::Error> {
        self.server.await
    }
}

fn cors(server: &ServerConfig) -> Cors {
    let cors = if server.allow_localhost_cors {
        Cors::default().allowed_origin_fn(|origin, _req_head| match origin.to_str() {
            Ok(str) => str.contains("localhost"),
            Err(_) => false,
        })
    } else {
        Cors::default()
    };

    cors.allowed_methods(vec!["GET", "OPTIONS", "POST", "PUT", "DELETE"])
        .allowed_headers(vec![
            http::header::AUTHORIZATION,
            http::header::ACCEPT,
            http::header::CONTENT_TYPE,
        ])
        .max_age(3600)
}

/// Malformed JSON bodies answer 400 with the usual `{message}` body.
pub fn json_cfg() -> JsonConfig {
    JsonConfig::default().error_handler(|err, _req| {
        let response = ApiResponse::bad_request(err.to_string());
        InternalError::from_response(err, response).into()
    })
}

fn web_server_config(server: &ServerConfig) -> Result<(String, u16, TcpListener), Error> {
    let address = format!("{}:{}", server.host, server.port);
    let listener = TcpListener::bind(&address)?;
    let port = listener.local_addr()?.port();

    Ok((address, port, listener))
}
