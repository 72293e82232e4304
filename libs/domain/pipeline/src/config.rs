// [libs/domain/pipeline/src/config.rs]
/*!
 * =================================================================
 * APARATO: SESSION OPTIONS (V14.2 - ENV OVERRIDES)
 * CLASIFICACIÓN: DOMAIN LAYER (ESTRATO L2-PIPELINE)
 * RESPONSABILIDAD: OPCIONES RECONOCIDAS Y SU VALIDACIÓN DE APERTURA
 *
 * Toda opción del catálogo se reconoce: ratios cliente:servidor,
 * datastores por servidor, selector de motor, hash nominal, selector
 * de transporte con su censo, capacidad de paquete, marca de agua de
 * PUTs asíncronos, arranque de histogramas, tallas consultivas de
 * pools y nivel de depuración. Las variables TRIPLEX_* del entorno
 * pisan los valores del builder; una opción imparseable hace fallar
 * la apertura con un fallo de clase Config.
 * =================================================================
 */

use std::path::PathBuf;

use triplex_core_histogram::{BucketGenerator, HistogramConfig};
use triplex_domain_routing::HashFunction;
use triplex_infra_datastore::{EngineSelector, HistogramPolicy};
use triplex_infra_transport::PeerEndpoint;

use crate::errors::PipelineError;

/// Talla consultiva de un pool de bloques fijos: el asignador general
/// la honra como capacidad inicial de los vectores que sustituyen a
/// las regiones.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolAdvisory {
    pub alloc_size: usize,
    pub regions: usize,
}

impl PoolAdvisory {
    /// Capacidad inicial agregada que el pool aconseja.
    pub const fn capacity_hint(&self) -> usize {
        self.regions
    }
}

/// Las ocho regiones de pool reconocidas por la configuración.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolOptions {
    pub keys: PoolAdvisory,
    pub buffers: PoolAdvisory,
    pub ops_cache: PoolAdvisory,
    pub arrays: PoolAdvisory,
    pub requests: PoolAdvisory,
    pub responses: PoolAdvisory,
    pub results: PoolAdvisory,
    pub packed: PoolAdvisory,
}

impl Default for PoolOptions {
    fn default() -> Self {
        let advisory = PoolAdvisory { alloc_size: 128, regions: 256 };
        Self {
            keys: advisory,
            buffers: advisory,
            ops_cache: advisory,
            arrays: advisory,
            requests: advisory,
            responses: advisory,
            results: advisory,
            packed: PoolAdvisory { alloc_size: 4096, regions: 64 },
        }
    }
}

/// Selector de backend de transporte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportSelector {
    /// Mundo de un proceso: despacho en proceso, sin red.
    Local,
    /// Malla TCP de dos fases.
    Tcp,
    /// RPC de espacio de usuario.
    Rpc,
}

impl TransportSelector {
    pub fn from_config_name(name: &str) -> Result<Self, PipelineError> {
        match name {
            "local" => Ok(Self::Local),
            "tcp" => Ok(Self::Tcp),
            "rpc" => Ok(Self::Rpc),
            unknown => Err(PipelineError::Config(format!(
                "unknown transport selector {:?}",
                unknown
            ))),
        }
    }
}

/// Niveles de depuración reconocidos, de EMERG a DBG3.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum DebugLevel {
    Emerg,
    Alert,
    Crit,
    Err,
    Warning,
    Notice,
    Info,
    Dbg,
    Dbg2,
    Dbg3,
}

impl DebugLevel {
    pub fn from_config_name(name: &str) -> Result<Self, PipelineError> {
        match name {
            "EMERG" => Ok(Self::Emerg),
            "ALERT" => Ok(Self::Alert),
            "CRIT" => Ok(Self::Crit),
            "ERR" => Ok(Self::Err),
            "WARNING" => Ok(Self::Warning),
            "NOTICE" => Ok(Self::Notice),
            "INFO" => Ok(Self::Info),
            "DBG" => Ok(Self::Dbg),
            "DBG2" => Ok(Self::Dbg2),
            "DBG3" => Ok(Self::Dbg3),
            unknown => Err(PipelineError::Config(format!(
                "unknown debug level {:?}",
                unknown
            ))),
        }
    }

    /// Directiva de filtro para el suscriptor de trazas.
    pub const fn as_filter_directive(&self) -> &'static str {
        match self {
            Self::Emerg | Self::Alert | Self::Crit | Self::Err => "error",
            Self::Warning | Self::Notice => "warn",
            Self::Info => "info",
            Self::Dbg => "debug",
            Self::Dbg2 | Self::Dbg3 => "trace",
        }
    }
}

/// Opciones completas de una sesión.
#[derive(Debug, Clone)]
pub struct SessionOptions {
    pub client_ratio: usize,
    pub server_ratio: usize,
    pub datastores_per_server: usize,

    pub datastore: EngineSelector,
    pub datastore_prefix: PathBuf,
    pub datastore_name: String,
    pub datastore_postfix: String,

    pub hash: HashFunction,

    pub transport: TransportSelector,
    pub rank: usize,
    pub roster: Vec<PeerEndpoint>,

    pub max_ops_per_send: usize,
    pub start_async_puts_at: usize,

    pub histogram_first_n: usize,
    pub histogram_generator: BucketGenerator,
    pub histogram_track_predicates: Vec<Vec<u8>>,

    pub pools: PoolOptions,
    pub debug_level: DebugLevel,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            client_ratio: 1,
            server_ratio: 1,
            datastores_per_server: 1,
            datastore: EngineSelector::InMemory,
            datastore_prefix: std::env::temp_dir().join("triplex"),
            datastore_name: "triples".to_string(),
            datastore_postfix: "shard".to_string(),
            hash: HashFunction::SumModDatastores,
            transport: TransportSelector::Local,
            rank: 0,
            roster: Vec::new(),
            max_ops_per_send: 128,
            start_async_puts_at: 0,
            histogram_first_n: 10,
            histogram_generator: BucketGenerator::SquareRootChoice,
            histogram_track_predicates: Vec::new(),
            pools: PoolOptions::default(),
            debug_level: DebugLevel::Info,
        }
    }
}

impl SessionOptions {
    pub fn with_ratios(mut self, client_ratio: usize, server_ratio: usize) -> Self {
        self.client_ratio = client_ratio;
        self.server_ratio = server_ratio;
        self
    }

    pub fn with_datastores_per_server(mut self, datastores: usize) -> Self {
        self.datastores_per_server = datastores;
        self
    }

    pub fn with_datastore_prefix(mut self, prefix: PathBuf) -> Self {
        self.datastore_prefix = prefix;
        self
    }

    pub fn with_datastore_name(mut self, name: &str) -> Self {
        self.datastore_name = name.to_string();
        self
    }

    pub fn with_hash(mut self, hash: HashFunction) -> Self {
        self.hash = hash;
        self
    }

    pub fn with_transport(mut self, selector: TransportSelector) -> Self {
        self.transport = selector;
        self
    }

    pub fn with_roster(mut self, rank: usize, roster: Vec<PeerEndpoint>) -> Self {
        self.rank = rank;
        self.roster = roster;
        self
    }

    pub fn with_max_ops_per_send(mut self, max_ops: usize) -> Self {
        self.max_ops_per_send = max_ops;
        self
    }

    pub fn with_start_async_puts_at(mut self, watermark: usize) -> Self {
        self.start_async_puts_at = watermark;
        self
    }

    pub fn with_histogram_bootstrap(
        mut self,
        first_n: usize,
        generator: BucketGenerator,
    ) -> Self {
        self.histogram_first_n = first_n;
        self.histogram_generator = generator;
        self
    }

    pub fn with_tracked_predicates(mut self, predicates: Vec<Vec<u8>>) -> Self {
        self.histogram_track_predicates = predicates;
        self
    }

    /// Política de histogramas que cada unidad de datastore hereda.
    pub fn histogram_policy(&self) -> HistogramPolicy {
        HistogramPolicy {
            config: HistogramConfig {
                first_n: self.histogram_first_n,
                generator: self.histogram_generator.clone(),
            },
            tracked_predicates: self.histogram_track_predicates.clone(),
        }
    }

    /**
     * Pisa las opciones con las variables TRIPLEX_* presentes en el
     * entorno. Una variable presente pero imparseable es un fallo de
     * clase Config y hace fallar la apertura.
     */
    pub fn apply_env_overrides(mut self) -> Result<Self, PipelineError> {
        if let Some(raw) = read_env("TRIPLEX_CLIENT_RATIO") {
            self.client_ratio = parse_usize("TRIPLEX_CLIENT_RATIO", &raw)?;
        }
        if let Some(raw) = read_env("TRIPLEX_SERVER_RATIO") {
            self.server_ratio = parse_usize("TRIPLEX_SERVER_RATIO", &raw)?;
        }
        if let Some(raw) = read_env("TRIPLEX_DATASTORES_PER_RANGE_SERVER") {
            self.datastores_per_server =
                parse_usize("TRIPLEX_DATASTORES_PER_RANGE_SERVER", &raw)?;
        }
        if let Some(raw) = read_env("TRIPLEX_DATASTORE") {
            self.datastore = EngineSelector::from_config_name(&raw)
                .map_err(|fault| PipelineError::Config(fault.to_string()))?;
        }
        if let Some(raw) = read_env("TRIPLEX_HASH") {
            self.hash = HashFunction::from_config_name(&raw)
                .map_err(|fault| PipelineError::Config(fault.to_string()))?;
        }
        if let Some(raw) = read_env("TRIPLEX_TRANSPORT") {
            self.transport = TransportSelector::from_config_name(&raw)?;
        }
        if let Some(raw) = read_env("TRIPLEX_MAXIMUM_OPS_PER_SEND") {
            self.max_ops_per_send = parse_usize("TRIPLEX_MAXIMUM_OPS_PER_SEND", &raw)?;
        }
        if let Some(raw) = read_env("TRIPLEX_START_ASYNC_PUTS_AT") {
            self.start_async_puts_at = parse_usize("TRIPLEX_START_ASYNC_PUTS_AT", &raw)?;
        }
        if let Some(raw) = read_env("TRIPLEX_HISTOGRAM_FIRST_N") {
            self.histogram_first_n = parse_usize("TRIPLEX_HISTOGRAM_FIRST_N", &raw)?;
        }
        if let Some(raw) = read_env("TRIPLEX_HISTOGRAM_BUCKET_GEN_METHOD") {
            self.histogram_generator =
                BucketGenerator::from_config_name(&raw, self.histogram_first_n)
                    .map_err(|fault| PipelineError::Config(fault.to_string()))?;
        }
        if let Some(raw) = read_env("TRIPLEX_HISTOGRAM_TRACK_PREDICATES") {
            self.histogram_track_predicates = raw
                .split(',')
                .filter(|name| !name.is_empty())
                .map(|name| name.as_bytes().to_vec())
                .collect();
        }
        if let Some(raw) = read_env("TRIPLEX_DEBUG_LEVEL") {
            self.debug_level = DebugLevel::from_config_name(&raw)?;
        }

        Ok(self)
    }

    /// Validación de apertura: toda violación es fatal para `open`.
    pub fn validate(&self) -> Result<(), PipelineError> {
        if self.client_ratio == 0 || self.server_ratio == 0 {
            return Err(PipelineError::Config(
                "client and server ratios must be positive".to_string(),
            ));
        }
        if self.datastores_per_server == 0 {
            return Err(PipelineError::Config(
                "datastores per range server must be positive".to_string(),
            ));
        }
        if self.max_ops_per_send == 0 {
            return Err(PipelineError::Config(
                "maximum ops per send must be positive".to_string(),
            ));
        }
        if self.datastore_name.is_empty() {
            return Err(PipelineError::Config(
                "datastore name must not be empty".to_string(),
            ));
        }

        match self.transport {
            TransportSelector::Local => {
                if !self.roster.is_empty() && self.roster.len() != 1 {
                    return Err(PipelineError::Config(
                        "a local transport implies a world of one rank".to_string(),
                    ));
                }
            }
            TransportSelector::Tcp | TransportSelector::Rpc => {
                if self.roster.is_empty() {
                    return Err(PipelineError::Config(
                        "networked transports need a startup roster".to_string(),
                    ));
                }
                if self.rank >= self.roster.len() {
                    return Err(PipelineError::Config(format!(
                        "rank {} absent from a roster of {}",
                        self.rank,
                        self.roster.len()
                    )));
                }
            }
        }

        Ok(())
    }
}

fn read_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|value| !value.is_empty())
}

fn parse_usize(key: &str, raw: &str) -> Result<usize, PipelineError> {
    raw.parse::<usize>()
        .map_err(|_| PipelineError::Config(format!("{} must be a non-negative integer, got {:?}", key, raw)))
}
