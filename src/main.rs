use campus_portal::config::Config;
use campus_portal::domain::{
    AuthService, ChatService, CourseService, ReportService, RoomRegistry, TokenSigner,
};
use campus_portal::infra::media::MediaStore;
use campus_portal::infra::storage::migrations::Migrator;
use campus_portal::infra::storage::repositories::{
    SeaOrmAccountRepository, SeaOrmAssignmentRepository, SeaOrmCourseRepository,
    SeaOrmMessageRepository, SeaOrmResultRepository,
};
use campus_portal::state::AppState;
use clap::Parser;
use sea_orm::{Database, DatabaseConnection};
use sea_orm_migration::MigratorTrait;
use std::path::PathBuf;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "campus-portal", about = "University portal backend")]
struct Cli {
    /// Path to the YAML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,campus_portal=debug")),
        )
        .init();

    let cli = Cli::parse();
    let config = Config::load(cli.config.as_deref())?;

    let db: DatabaseConnection = Database::connect(&config.database_url).await?;
    Migrator::up(&db, None).await?;
    let db = Arc::new(db);

    tokio::fs::create_dir_all(&config.media_root).await?;

    let accounts = Arc::new(SeaOrmAccountRepository::new(db.clone()));
    let courses = Arc::new(SeaOrmCourseRepository::new(db.clone()));
    let assignments = Arc::new(SeaOrmAssignmentRepository::new(db.clone()));
    let results = Arc::new(SeaOrmResultRepository::new(db.clone()));
    let messages = Arc::new(SeaOrmMessageRepository::new(db.clone()));

    let tokens = TokenSigner::new(&config.token_secret, config.token_ttl_secs);
    let auth = AuthService::new(accounts.clone(), tokens);
    let course_service = CourseService::new(
        accounts.clone(),
        courses.clone(),
        assignments.clone(),
        results.clone(),
    );
    let chat = ChatService::new(accounts.clone(), messages.clone());
    let reports = ReportService::new(accounts.clone(), courses.clone());
    let rooms = RoomRegistry::new(config.room_capacity);
    let media = MediaStore::new(&config.media_root);

    if let Some(admin) = &config.bootstrap_admin {
        auth.ensure_admin(&admin.username, &admin.email, &admin.password)
            .await?;
    }

    let state = Arc::new(AppState {
        config: config.clone(),
        auth,
        courses: course_service,
        chat,
        reports,
        rooms,
        media,
    });

    let router = campus_portal::api::rest::build_router(state);

    let listener = tokio::net::TcpListener::bind(&config.listen_addr).await?;
    tracing::info!(addr = %config.listen_addr, "portal listening");

    let shutdown = CancellationToken::new();
    let signal_token = shutdown.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("shutdown signal received");
            signal_token.cancel();
        }
    });

    axum::serve(listener, router)
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await?;

    tracing::info!("portal stopped");
    Ok(())
}
