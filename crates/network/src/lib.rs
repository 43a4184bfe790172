//! Crate `network` — grafo de reactores y jeringas con balance de caudales.
//!
//! Este crate define el builder de la red (`ReactorNetwork`), que posee los
//! reactores y jeringas, valida cada conexión (auto-lazos, ciclos, salida de
//! producto duplicada, jeringa ya conectada) y mantiene los contadores de
//! identidad. Sobre el grafo terminado operan el módulo `balance` (reparto
//! de caudales por conteo virtual de jeringas y tiempo de retención) y el
//! módulo `report` (estructura de datos plana para el front end).
//!
//! Diseño resumido:
//! - Mutaciones atómicas: toda conexión rechazada deja el grafo intacto;
//!   `state_hash` permite verificarlo.
//! - Agregados derivados (volumen total, tiempo de retención) se recalculan
//!   bajo demanda, nunca se almacenan.
//! - Un solo dueño, sin concurrencia: el caller sincroniza si hace falta.
//!
//! Ejemplo rápido:
//! ```rust
//! use network::ReactorNetwork;
//! let mut red = ReactorNetwork::new();
//! let r = red.add_reactor("oxidación", 10.0, 0.0, 1.0).unwrap();
//! let s = red.add_syringe("ácido", 5.0).unwrap();
//! red.connect_syringe(s, r).unwrap();
//! ```
pub mod balance;
pub mod errors;
pub mod network;
pub mod report;

pub use errors::*;
pub use network::*;
pub use report::*;
