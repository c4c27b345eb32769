use std::{process, sync::Arc, time::Duration};

use clap::Parser;
use quire::{
    application::{
        categories::CategoryService,
        error::AppError,
        posts::PostService,
        procedures::ProcedureRouter,
        repos::{CategoriesRepo, CategoriesWriteRepo, PostsRepo, PostsWriteRepo, StoreHealth},
        site::SiteService,
    },
    config,
    infra::{
        db::PostgresRepositories,
        error::InfraError,
        http::{self, HttpState},
        telemetry,
    },
    presentation::views::LayoutChrome,
};
use sqlx::PgPool;
use tracing::{Dispatch, Level, dispatcher, error, info, warn};
use tracing_subscriber::fmt as tracing_fmt;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        report_application_error(&error);
        process::exit(1);
    }
}

fn report_application_error(error: &AppError) {
    if dispatcher::has_been_set() {
        error!(error = %error, "application error");
        return;
    }

    let subscriber = tracing_fmt().with_max_level(Level::ERROR).finish();
    let dispatch = Dispatch::new(subscriber);
    dispatcher::with_default(&dispatch, || {
        error!(error = %error, "application error");
    });
}

async fn run() -> Result<(), AppError> {
    let cli_args = config::CliArgs::parse();
    let settings = config::load(&cli_args)
        .map_err(|err| AppError::unexpected(format!("failed to load configuration: {err}")))?;

    telemetry::init(&settings.logging).map_err(AppError::from)?;

    match cli_args.command {
        Some(config::Command::Migrate(_)) => run_migrate(settings).await,
        Some(config::Command::Serve(_)) | None => run_serve(settings).await,
    }
}

async fn run_migrate(settings: config::Settings) -> Result<(), AppError> {
    let pool = connect_pool(&settings).await?;
    apply_migrations(&pool).await?;
    info!(target: "quire::migrate", "database schema is up to date");
    Ok(())
}

async fn run_serve(settings: config::Settings) -> Result<(), AppError> {
    let repositories = init_repositories(&settings).await?;
    let http_state = build_http_state(repositories, &settings);
    serve_http(&settings, http_state).await
}

async fn connect_pool(settings: &config::Settings) -> Result<PgPool, AppError> {
    let database_url = settings
        .database
        .url
        .as_ref()
        .ok_or_else(|| InfraError::configuration("database url is not configured"))
        .map_err(AppError::from)?;

    PostgresRepositories::connect(database_url, settings.database.max_connections.get())
        .await
        .map_err(|err| AppError::from(InfraError::database(err.to_string())))
}

async fn apply_migrations(pool: &PgPool) -> Result<(), AppError> {
    PostgresRepositories::run_migrations(pool)
        .await
        .map_err(|err| AppError::from(InfraError::migration(err.to_string())))
}

async fn init_repositories(
    settings: &config::Settings,
) -> Result<Arc<PostgresRepositories>, AppError> {
    let pool = connect_pool(settings).await?;
    apply_migrations(&pool).await?;
    Ok(Arc::new(PostgresRepositories::new(pool)))
}

fn build_http_state(
    repositories: Arc<PostgresRepositories>,
    settings: &config::Settings,
) -> HttpState {
    let categories_repo: Arc<dyn CategoriesRepo> = repositories.clone();
    let categories_write_repo: Arc<dyn CategoriesWriteRepo> = repositories.clone();
    let posts_repo: Arc<dyn PostsRepo> = repositories.clone();
    let posts_write_repo: Arc<dyn PostsWriteRepo> = repositories.clone();
    let health: Arc<dyn StoreHealth> = repositories;

    let category_service = CategoryService::new(categories_repo.clone(), categories_write_repo);
    let post_service = PostService::new(posts_repo.clone(), posts_write_repo);

    HttpState {
        site: Arc::new(SiteService::new(posts_repo, categories_repo)),
        procedures: Arc::new(ProcedureRouter::new(category_service, post_service)),
        health,
        chrome: LayoutChrome {
            site_title: settings.site.title.clone(),
            tagline: settings.site.tagline.clone(),
        },
    }
}

async fn serve_http(settings: &config::Settings, http_state: HttpState) -> Result<(), AppError> {
    let router = http::build_router(http_state);

    let listener = tokio::net::TcpListener::bind(settings.server.addr)
        .await
        .map_err(|err| AppError::from(InfraError::from(err)))?;

    info!(
        target: "quire::serve",
        addr = %settings.server.addr,
        rpc_path = http::RPC_PATH,
        "listening"
    );

    axum::serve(listener, router.into_make_service())
        .with_graceful_shutdown(shutdown_signal(settings.server.graceful_shutdown))
        .await
        .map_err(|err| AppError::unexpected(format!("server error: {err}")))?;

    info!(target: "quire::serve", "server stopped");
    Ok(())
}

/// Resolves on Ctrl-C, then arms a hard deadline for in-flight requests.
async fn shutdown_signal(grace: Duration) {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(target: "quire::serve", error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }

    info!(
        target: "quire::serve",
        grace_seconds = grace.as_secs(),
        "shutdown requested; draining connections"
    );

    tokio::spawn(async move {
        tokio::time::sleep(grace).await;
        warn!(target: "quire::serve", "graceful shutdown timed out");
        process::exit(0);
    });
}
