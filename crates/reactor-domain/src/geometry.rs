// geometry.rs
use crate::DomainError;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use std::fmt;

/// Dimensión de un recipiente cilíndrico (reactor tubular o tubo conector).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Dimension {
  Volume,
  Length,
  Diameter,
}

impl Dimension {
  /// Unidad en la que se expresa la dimensión.
  pub fn unit(&self) -> &'static str {
    match self {
      Dimension::Volume => "mL",
      Dimension::Length => "mm",
      Dimension::Diameter => "mm",
    }
  }
}

impl fmt::Display for Dimension {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let name = match self {
      Dimension::Volume => "volumen",
      Dimension::Length => "longitud",
      Dimension::Diameter => "diámetro",
    };
    write!(f, "{}", name)
  }
}

/// Resultado de resolver la dimensión faltante de un cilindro.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ResolvedDimension {
  value: f64,
  dimension: Dimension,
}

impl ResolvedDimension {
  pub fn value(&self) -> f64 {
    self.value
  }

  pub fn dimension(&self) -> Dimension {
    self.dimension
  }

  pub fn unit(&self) -> &'static str {
    self.dimension.unit()
  }
}

impl fmt::Display for ResolvedDimension {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}: {:.3} {}", self.dimension, self.value, self.unit())
  }
}

/// Resuelve la dimensión faltante de un recipiente cilíndrico a partir de
/// `V = π·r²·h` con `r = diámetro / 2`.
///
/// El centinela `0.0` marca la dimensión desconocida; exactamente una de
/// las tres debe ser cero y las otras dos estrictamente positivas. El
/// volumen se expresa en mL y la longitud/diámetro en mm (la conversión
/// mm³ ↔ mL es interna).
pub fn resolve_dimension(volume_ml: f64, length_mm: f64, diameter_mm: f64) -> Result<ResolvedDimension, DomainError> {
  for v in [volume_ml, length_mm, diameter_mm] {
    if !v.is_finite() || v < 0.0 {
      return Err(DomainError::InvalidGeometry(format!("las dimensiones deben ser finitas y no negativas (se recibió {})", v)));
    }
  }

  let unknowns = [volume_ml, length_mm, diameter_mm].iter().filter(|v| **v == 0.0).count();
  if unknowns == 0 {
    return Err(DomainError::InvalidGeometry("nada que calcular: las tres dimensiones ya están definidas".to_string()));
  }
  if unknowns > 1 {
    return Err(DomainError::InvalidGeometry(format!("sistema indeterminado: faltan {} dimensiones y sólo puede faltar una",
                                                    unknowns)));
  }

  let r = diameter_mm / 2.0;
  let resolved = if volume_ml == 0.0 {
    // mm³ -> mL
    ResolvedDimension { value: PI * r * r * length_mm / 1000.0, dimension: Dimension::Volume }
  } else if length_mm == 0.0 {
    ResolvedDimension { value: volume_ml * 1000.0 / (PI * r * r), dimension: Dimension::Length }
  } else {
    ResolvedDimension { value: (4.0 * volume_ml * 1000.0 / (PI * length_mm)).sqrt(), dimension: Dimension::Diameter }
  };

  Ok(resolved)
}
