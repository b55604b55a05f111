use anyhow::Result;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::signal;
use tracing::{error, info, warn};
use dotenvy::dotenv;

use nextstop_booking::config::environment::EnvironmentConfig;
use nextstop_booking::database;
use nextstop_booking::services::seat_allocator::SeatAllocator;
use nextstop_booking::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Cargar variables de entorno
    dotenv().ok();

    let config = EnvironmentConfig::from_env();

    // Configurar logging
    let max_level = if config.is_production() {
        tracing::Level::INFO
    } else {
        tracing::Level::DEBUG
    };
    tracing_subscriber::fmt().with_max_level(max_level).init();

    info!("🚌 NextStop Booking Backend");
    info!("===========================");

    // Inicializar base de datos
    let pool = match database::create_pool(None).await {
        Ok(pool) => pool,
        Err(e) => {
            error!("❌ Error conectando a la base de datos: {}", e);
            return Err(anyhow::anyhow!("Error de base de datos: {}", e));
        }
    };
    database::run_migrations(&pool).await?;
    info!("✅ Base de datos conectada y migrada");

    // Reconciliation sweep: frees seats stranded unavailable with no
    // live booking (crash between claim and booking commit).
    let sweep_pool = pool.clone();
    let sweep_interval = config.reconciliation_interval_secs;
    tokio::spawn(async move {
        let allocator = SeatAllocator::new(sweep_pool);
        let mut interval = tokio::time::interval(Duration::from_secs(sweep_interval));
        loop {
            interval.tick().await;
            match allocator.release_orphaned().await {
                Ok(0) => {}
                Ok(released) => warn!("Reconciliation released {} orphaned seat claim(s)", released),
                Err(e) => error!("Reconciliation sweep failed: {}", e),
            }
        }
    });

    let state = AppState::new(pool, config.clone());
    let app = nextstop_booking::create_app(state);

    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    info!("🚀 Servidor escuchando en {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = signal::ctrl_c().await {
        error!("Error instalando el handler de ctrl-c: {}", e);
    }
    info!("Señal de apagado recibida");
}
