// [apps/node/src/main.rs]
/*!
 * =================================================================
 * APARATO: TRIPLEX NODE SHELL (V12.0 - RANK DAEMON)
 * CLASIFICACIÓN: APPLICATION LAYER (ENTRY POINT)
 * RESPONSABILIDAD: BOOTSTRAP DE ENTORNO E IGNICIÓN DE LA SESIÓN
 *
 * El daemon encarna un rango del censo: abre la sesión (que levanta
 * los datastores locales y el bucle del servidor si el rango es
 * servidor), queda operacional hasta la señal de terminación y
 * cierra de forma determinista. Sale con 0 en éxito y 1 si la fase
 * de ignición falla.
 * =================================================================
 */

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn};

use triplex_domain_pipeline::{
    DebugLevel, PeerEndpoint, Session, SessionOptions, TransportSelector,
};
use triplex_shared_watchtower::init_tracing;

/**
 * Directivas de mando del daemon de rango.
 * Configuración inyectada vía CLI o variables de entorno TRIPLEX_*.
 */
#[derive(Parser, Debug)]
#[command(
    version,
    about = "Triplex Range Node // distributed triplestore rank daemon"
)]
struct NodeDirectives {
    /// Rango propio del proceso dentro del censo.
    #[arg(long, env = "TRIPLEX_RANK", default_value_t = 0)]
    rank: usize,

    /// Censo completo del mundo: direcciones separadas por comas, en
    /// orden de rango (vacío = mundo local de un proceso).
    #[arg(long, env = "TRIPLEX_ROSTER", default_value = "")]
    roster: String,

    /// Backend de transporte: local, tcp o rpc.
    #[arg(long, env = "TRIPLEX_TRANSPORT", default_value = "local")]
    transport: String,

    /// Ratio de clientes del patrón de mezclado.
    #[arg(long, env = "TRIPLEX_CLIENT_RATIO", default_value_t = 1)]
    client_ratio: usize,

    /// Ratio de servidores del patrón de mezclado.
    #[arg(long, env = "TRIPLEX_SERVER_RATIO", default_value_t = 1)]
    server_ratio: usize,

    /// Directorio base de los almacenes persistidos.
    #[arg(long, env = "TRIPLEX_DATASTORE_PREFIX", default_value = "triplex-data")]
    datastore_prefix: String,

    /// Nombre base de los almacenes.
    #[arg(long, env = "TRIPLEX_DATASTORE_NAME", default_value = "triples")]
    datastore_name: String,

    /// Identificador nominal del nodo para la telemetría.
    #[arg(long, env = "TRIPLEX_NODE_IDENTIFIER", default_value = "")]
    node_identifier: String,

    /// Nivel de depuración reconocido (EMERG..DBG3).
    #[arg(long, env = "TRIPLEX_DEBUG_LEVEL", default_value = "INFO")]
    debug_level: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    // 1. ENTORNO Y OBSERVABILIDAD
    let _ = dotenvy::dotenv();

    let directives = NodeDirectives::parse();
    let node_identifier = if directives.node_identifier.is_empty() {
        format!("triplex-node-{}", uuid::Uuid::new_v4())
    } else {
        directives.node_identifier.clone()
    };

    let debug_level = DebugLevel::from_config_name(&directives.debug_level)
        .map_err(|config_fault| anyhow::anyhow!(config_fault.to_string()))?;
    init_tracing(&node_identifier, debug_level.as_filter_directive());

    info!("💠 [SHELL]: Triplex node ignition starting as [{}]...", node_identifier);

    // 2. CONSTRUCCIÓN DE OPCIONES DE SESIÓN
    let transport = TransportSelector::from_config_name(&directives.transport)
        .map_err(|config_fault| anyhow::anyhow!(config_fault.to_string()))?;

    let roster: Vec<PeerEndpoint> = directives
        .roster
        .split(',')
        .filter(|address| !address.is_empty())
        .enumerate()
        .map(|(rank, address)| PeerEndpoint { rank, address: address.to_string() })
        .collect();

    let options = SessionOptions::default()
        .with_transport(transport)
        .with_roster(directives.rank, roster)
        .with_ratios(directives.client_ratio, directives.server_ratio)
        .with_datastore_prefix(directives.datastore_prefix.clone().into())
        .with_datastore_name(&directives.datastore_name);

    // 3. IGNICIÓN DE LA SESIÓN (fatal en fallo: salida 1)
    let session = Session::open(options)
        .await
        .context("IGNITION_FAULT: session open failed")?;

    info!(
        "🚀 [SHELL]: Rank {}/{} operational ({} range servers, {} datastores). Ctrl-C to drain.",
        session.rank(),
        session.world_size(),
        session.range_server_count(),
        session.datastore_count()
    );

    // 4. OPERACIONAL HASTA LA SEÑAL DE TERMINACIÓN
    if tokio::signal::ctrl_c().await.is_ok() {
        warn!("⚠️ [SIGNAL]: Termination requested by host. Draining...");
    }

    // 5. CIERRE DETERMINISTA
    if let Err(close_fault) = session.close().await {
        warn!("⚠️ [SHELL]: Close fault: {}", close_fault);
    }

    info!("🏁 [SHELL]: Shutdown sequence concluded. Node offline.");
    Ok(())
}
