// Archivo: report.rs
// Propósito: estructura de datos plana que el core entrega al front end.
// El core no formatea texto ni escribe archivos; el sumidero de salida
// decide cómo renderizar o persistir este reporte.
use chrono::{DateTime, Utc};
use reactor_domain::{InletSource, Outlet, Reactor, Syringe};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Resumen de un reactor tal como lo expone el reporte.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReactorSummary {
    pub id: u32,
    pub name: String,
    pub volume_ml: f64,
    pub length_mm: f64,
    pub diameter_mm: f64,
    pub inputs: Vec<InletSource>,
    pub output: Option<Outlet>,
}

impl From<&Reactor> for ReactorSummary {
    fn from(r: &Reactor) -> Self {
        Self { id: r.id(),
               name: r.name().to_string(),
               volume_ml: r.volume_ml(),
               length_mm: r.length_mm(),
               diameter_mm: r.diameter_mm(),
               inputs: r.inputs().to_vec(),
               output: r.output() }
    }
}

/// Resumen de una jeringa tal como lo expone el reporte.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyringeSummary {
    pub id: u32,
    pub name: String,
    pub volume_ml: f64,
    pub connected_to: Option<u32>,
    pub flow_rate_ml_min: Option<f64>,
}

impl From<&Syringe> for SyringeSummary {
    fn from(s: &Syringe) -> Self {
        Self { id: s.id(),
               name: s.name().to_string(),
               volume_ml: s.volume_ml(),
               connected_to: s.connected_to(),
               flow_rate_ml_min: s.flow_rate_ml_min() }
    }
}

/// Reporte completo del estado de la red, generado bajo demanda.
///
/// `retention_time_min` está presente sólo cuando todas las jeringas
/// tienen caudal asignado y la suma es positiva; un reporte pedido a mitad
/// de la construcción simplemente lo omite.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetupReport {
    pub setup_id: Uuid,
    pub generated_at: DateTime<Utc>,
    pub total_volume_ml: f64,
    pub retention_time_min: Option<f64>,
    pub reactors: Vec<ReactorSummary>,
    pub syringes: Vec<SyringeSummary>,
}

impl SetupReport {
    /// Representación JSON del reporte, para sumideros que persisten o
    /// transportan el estado sin conocer los tipos del crate.
    pub fn to_value(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}
