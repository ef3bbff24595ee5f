use actix_cors::Cors;
use actix_files::Files;
use actix_server::ServerHandle;
use actix_web::{
    App, HttpServer,
    web::{self, Data},
};
use anyhow::{Context, Result};
use env_logger::{Builder, Env, Target};
use log::{debug, error, info};
use nopasswords::{
    api::Api,
    config::{AppConfig, CertificateConfig},
    generation_client::GenerationServiceClient,
    kv_store_client::KvRestClient,
};
use rustls::crypto::{CryptoProvider, ring::default_provider};
use std::io::Write;
use tokio::signal::unix::{SignalKind, signal};

type UiApi = Api<KvRestClient, GenerationServiceClient>;

#[actix_web::main]
async fn main() {
    if let Err(e) = run().await {
        error!("application error: {e:#}");
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    initialize()?;

    let mut sigterm =
        signal(SignalKind::terminate()).context("failed to install SIGTERM handler")?;

    let (server_handle, server_task) = run_server()?;

    tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            debug!("ctrl-c received");
        },
        _ = sigterm.recv() => {
            debug!("SIGTERM received");
        },
        result = server_task => {
            match result {
                Ok(Ok(())) => debug!("server stopped normally"),
                Ok(Err(e)) => error!("server stopped with error: {e}"),
                Err(e) => error!("server task panicked: {e}"),
            }
        },
    }

    info!("shutting down");
    server_handle.stop(true).await;
    info!("shutdown complete");

    Ok(())
}

fn initialize() -> Result<()> {
    log_panics::init();

    let mut builder = if cfg!(debug_assertions) {
        Builder::from_env(Env::default().default_filter_or("debug"))
    } else {
        Builder::from_env(Env::default().default_filter_or("info"))
    };

    builder.format(|f, record| match record.level() {
        log::Level::Error => {
            eprintln!("{}", record.args());
            Ok(())
        }
        _ => {
            writeln!(f, "{}", record.args())
        }
    });

    builder.target(Target::Stdout).init();

    info!(
        "module version: {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_SHORT_REV")
    );

    CryptoProvider::install_default(default_provider())
        .map_err(|_| anyhow::anyhow!("crypto provider already installed"))?;

    let config = AppConfig::get();
    info!(
        "key-value store: {}, generation service: {}",
        config.kv_store.rest_api_url, config.generation.service_url
    );

    Ok(())
}

fn run_server() -> Result<(
    ServerHandle,
    tokio::task::JoinHandle<Result<(), std::io::Error>>,
)> {
    let config = AppConfig::get();
    let ui_port = config.ui.port;
    let static_dir = config.ui.static_dir.clone();

    let api = UiApi::new(
        KvRestClient::new().context("failed to create key-value store client")?,
        GenerationServiceClient::new().context("failed to create generation service client")?,
        config.site.clone(),
        static_dir.is_some(),
    );

    let server = HttpServer::new(move || {
        let app = App::new()
            .app_data(Data::new(api.clone()))
            .service(
                web::resource("/")
                    .route(web::get().to(UiApi::index))
                    .route(web::post().to(UiApi::submit_form)),
            )
            .route("/results/{id}", web::get().to(UiApi::results))
            .service(
                web::scope("/api")
                    .wrap(
                        Cors::default()
                            .allow_any_origin()
                            .allow_any_header()
                            .allowed_methods(vec!["POST"])
                            .max_age(3600),
                    )
                    .route("/generate", web::post().to(UiApi::generate)),
            )
            .route("/healthcheck", web::get().to(UiApi::healthcheck))
            .route("/version", web::get().to(UiApi::version));

        let app = match &static_dir {
            Some(dir) => app.service(Files::new("/static", dir)),
            None => app,
        };

        app.default_service(web::route().to(UiApi::not_found))
    });

    let address = format!("0.0.0.0:{ui_port}");
    let server = match &config.certificate {
        Some(certificate) => {
            let tls_config = load_tls_config(certificate).context("failed to load tls config")?;
            info!("listening on https://{address}");
            server.bind_rustls_0_23(&address, tls_config)
        }
        None => {
            info!("listening on http://{address}");
            server.bind(&address)
        }
    }
    .context("failed to bind server")?
    .disable_signals()
    .run();

    Ok((server.handle(), tokio::spawn(server)))
}

fn load_tls_config(paths: &CertificateConfig) -> Result<rustls::ServerConfig> {
    let mut tls_certs = std::io::BufReader::new(
        std::fs::File::open(&paths.cert_path).context("failed to open certificate file")?,
    );

    let mut tls_key = std::io::BufReader::new(
        std::fs::File::open(&paths.key_path).context("failed to open key file")?,
    );

    let tls_certs = rustls_pemfile::certs(&mut tls_certs)
        .collect::<Result<Vec<_>, _>>()
        .context("failed to parse certificate pem")?;

    let key_item = rustls_pemfile::read_one(&mut tls_key)
        .context("failed to read key pem file")?
        .context("no valid key found in pem file")?;

    let key = match key_item {
        rustls_pemfile::Item::Pkcs1Key(key) => rustls::pki_types::PrivateKeyDer::Pkcs1(key),
        rustls_pemfile::Item::Pkcs8Key(key) => rustls::pki_types::PrivateKeyDer::Pkcs8(key),
        rustls_pemfile::Item::Sec1Key(key) => rustls::pki_types::PrivateKeyDer::Sec1(key),
        _ => anyhow::bail!("unexpected key type in pem file"),
    };

    rustls::ServerConfig::builder()
        .with_no_client_auth()
        .with_single_cert(tls_certs, key)
        .context("failed to create tls config")
}
