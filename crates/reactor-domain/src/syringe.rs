// syringe.rs
use crate::DomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Jeringa de alimentación. Es una fuente pura de la red: una vez
/// conectada a un reactor la conexión es inmutable; el caudal en cambio
/// puede recalcularse tantas veces como haga falta.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Syringe {
  id: u32,
  name: String,
  volume_ml: f64,
  connected_to: Option<u32>,
  flow_rate_ml_min: Option<f64>,
}

impl Syringe {
  pub fn new(id: u32, name: &str, volume_ml: f64) -> Result<Self, DomainError> {
    let name = name.trim();
    if name.is_empty() {
      return Err(DomainError::ValidationError("el nombre de la jeringa no puede estar vacío".to_string()));
    }
    if !volume_ml.is_finite() || volume_ml <= 0.0 {
      return Err(DomainError::ValidationError(format!("el volumen de la jeringa debe ser positivo (se recibió {})",
                                                      volume_ml)));
    }
    Ok(Self { id, name: name.to_string(), volume_ml, connected_to: None, flow_rate_ml_min: None })
  }

  pub fn id(&self) -> u32 {
    self.id
  }

  pub fn name(&self) -> &str {
    &self.name
  }

  pub fn volume_ml(&self) -> f64 {
    self.volume_ml
  }

  pub fn connected_to(&self) -> Option<u32> {
    self.connected_to
  }

  pub fn flow_rate_ml_min(&self) -> Option<f64> {
    self.flow_rate_ml_min
  }

  /// Conecta la jeringa a un reactor. La conexión se fija una sola vez;
  /// un segundo intento es un error, nunca una sobreescritura.
  pub fn connect_to(&mut self, reactor_id: u32) -> Result<(), DomainError> {
    if let Some(existing) = self.connected_to {
      return Err(DomainError::ValidationError(format!("la jeringa {} ya está conectada al reactor {}", self.id, existing)));
    }
    self.connected_to = Some(reactor_id);
    Ok(())
  }

  /// Deshace la conexión. Sólo lo usa el rollback del builder cuando el
  /// reactor destino se elimina de la red.
  pub fn disconnect(&mut self) {
    self.connected_to = None;
  }

  /// Asigna o recalcula el caudal. Cero es válido (bomba en pausa); el
  /// solver de tiempo de retención rechaza aparte una suma total nula.
  pub fn set_flow_rate(&mut self, rate_ml_min: f64) -> Result<(), DomainError> {
    if !rate_ml_min.is_finite() || rate_ml_min < 0.0 {
      return Err(DomainError::ValidationError(format!("el caudal debe ser finito y no negativo (se recibió {})",
                                                      rate_ml_min)));
    }
    self.flow_rate_ml_min = Some(rate_ml_min);
    Ok(())
  }
}

impl fmt::Display for Syringe {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "Jeringa {} ({}): {:.3} mL", self.id, self.name, self.volume_ml)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn creation_validates_name_and_volume() {
    assert!(Syringe::new(1, "", 5.0).is_err());
    assert!(Syringe::new(1, "ácido", 0.0).is_err());
    assert!(Syringe::new(1, "ácido", -2.0).is_err());
    assert!(Syringe::new(1, "ácido", 5.0).is_ok());
  }

  #[test]
  fn connection_is_immutable() -> Result<(), DomainError> {
    let mut s = Syringe::new(1, "ácido", 5.0)?;
    s.connect_to(3)?;
    assert_eq!(s.connected_to(), Some(3));
    assert!(s.connect_to(4).is_err());
    // the original connection is untouched by the rejected attempt
    assert_eq!(s.connected_to(), Some(3));
    Ok(())
  }

  #[test]
  fn flow_rate_can_be_recomputed() -> Result<(), DomainError> {
    let mut s = Syringe::new(1, "base", 10.0)?;
    assert!(s.flow_rate_ml_min().is_none());
    s.set_flow_rate(1.5)?;
    s.set_flow_rate(0.75)?;
    assert_eq!(s.flow_rate_ml_min(), Some(0.75));
    assert!(s.set_flow_rate(-1.0).is_err());
    assert!(s.set_flow_rate(f64::NAN).is_err());
    Ok(())
  }
}
