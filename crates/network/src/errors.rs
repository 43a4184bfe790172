// Archivo: errors.rs
// Propósito: definir los errores de la red y el alias Result<T> usado por
// las APIs del crate. Ningún error es fatal: todos son señales de retorno
// para que el caller corrija la entrada y reintente; el grafo queda
// intacto ante cualquier mutación rechazada.
use reactor_domain::DomainError;
use thiserror::Error;

/// Errores del grafo de reactores/jeringas y de los cálculos derivados.
#[derive(Error, Debug)]
pub enum NetworkError {
    /// El reactor referenciado no existe en la red.
    #[error("El reactor {0} no existe en la red")]
    UnknownReactor(u32),
    /// La jeringa referenciada no existe en la red.
    #[error("La jeringa {0} no existe en la red")]
    UnknownSyringe(u32),
    /// El elemento ya tiene una conexión; no se sobreescribe.
    #[error("Ya conectado: {0}")]
    AlreadyConnected(String),
    /// Un reactor no puede conectar su salida a sí mismo.
    #[error("El reactor {0} no puede conectarse a sí mismo")]
    SelfLoop(u32),
    /// La red ya tiene su única salida de producto.
    #[error("La red ya tiene una salida de producto en el reactor {0}")]
    DuplicateProductSink(u32),
    /// Conectar `from -> to` cerraría un ciclo: ya existe un camino de
    /// `to` hacia `from` en el subgrafo de reactores.
    #[error("La conexión {from} -> {to} cerraría un ciclo en la red")]
    CycleDetected { from: u32, to: u32 },
    /// No hay jeringas sobre las que operar.
    #[error("La red no tiene jeringas")]
    EmptyNetwork,
    /// La red no satisface una precondición del cálculo solicitado.
    #[error("Red incompleta: {0}")]
    IncompleteNetwork(String),
    /// El tiempo de retención debe ser positivo (se rechaza antes de
    /// dividir).
    #[error("El tiempo de retención debe ser positivo (se recibió {0})")]
    InvalidRetentionTime(f64),
    /// Una jeringa no tiene caudal asignado.
    #[error("La jeringa {0} no tiene caudal asignado")]
    NoFlowSet(u32),
    /// El caudal total de entrada no es positivo.
    #[error("El caudal total de entrada debe ser positivo (se obtuvo {0})")]
    ZeroInflow(f64),
    /// Rollback sobre una colección vacía u otra entidad ausente.
    #[error("No encontrado: {0}")]
    NotFound(String),
    /// Errores originados por las entidades del dominio (geometría,
    /// validación de constructores).
    #[error("Error de dominio: {0}")]
    Domain(#[from] DomainError),
}

/// Alias de resultado usado por las APIs del crate.
pub type Result<T> = std::result::Result<T, NetworkError>;
