// reactor.rs
use crate::geometry::{resolve_dimension, Dimension};
use crate::DomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Origen de una entrada de reactor: una jeringa o la salida de otro
/// reactor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id")]
pub enum InletSource {
  Syringe(u32),
  Reactor(u32),
}

impl fmt::Display for InletSource {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      InletSource::Syringe(id) => write!(f, "jeringa {}", id),
      InletSource::Reactor(id) => write!(f, "reactor {}", id),
    }
  }
}

/// Destino de la única salida de un reactor: otro reactor o el sumidero
/// de producto de la red (centinela `PRODUCT`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id")]
pub enum Outlet {
  Reactor(u32),
  Product,
}

impl fmt::Display for Outlet {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Outlet::Reactor(id) => write!(f, "reactor {}", id),
      Outlet::Product => write!(f, "PRODUCT"),
    }
  }
}

/// Reactor tubular de la red. La identidad y la geometría quedan fijas al
/// crearlo; las aristas de entrada/salida se agregan de forma incremental
/// desde el builder de la red.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reactor {
  id: u32,
  name: String,
  volume_ml: f64,
  length_mm: f64,
  diameter_mm: f64,
  inputs: Vec<InletSource>,
  output: Option<Outlet>,
}

impl Reactor {
  /// Crea un reactor validando su geometría. Si exactamente una de las
  /// tres dimensiones es el centinela `0.0`, se resuelve con
  /// `resolve_dimension` antes de almacenar; si ninguna falta, las tres
  /// deben ser estrictamente positivas.
  pub fn new(id: u32, name: &str, volume_ml: f64, length_mm: f64, diameter_mm: f64) -> Result<Self, DomainError> {
    let name = name.trim();
    if name.is_empty() {
      return Err(DomainError::ValidationError("el nombre del reactor no puede estar vacío".to_string()));
    }

    let (mut volume_ml, mut length_mm, mut diameter_mm) = (volume_ml, length_mm, diameter_mm);
    if volume_ml == 0.0 || length_mm == 0.0 || diameter_mm == 0.0 {
      let resolved = resolve_dimension(volume_ml, length_mm, diameter_mm)?;
      match resolved.dimension() {
        Dimension::Volume => volume_ml = resolved.value(),
        Dimension::Length => length_mm = resolved.value(),
        Dimension::Diameter => diameter_mm = resolved.value(),
      }
    } else {
      for v in [volume_ml, length_mm, diameter_mm] {
        if !v.is_finite() || v <= 0.0 {
          return Err(DomainError::InvalidGeometry(format!("las dimensiones deben ser positivas (se recibió {})", v)));
        }
      }
    }

    Ok(Self { id,
              name: name.to_string(),
              volume_ml,
              length_mm,
              diameter_mm,
              inputs: Vec::new(),
              output: None })
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

  pub fn length_mm(&self) -> f64 {
    self.length_mm
  }

  pub fn diameter_mm(&self) -> f64 {
    self.diameter_mm
  }

  /// Aristas de entrada en orden de conexión.
  pub fn inputs(&self) -> &[InletSource] {
    &self.inputs
  }

  pub fn output(&self) -> Option<Outlet> {
    self.output
  }

  /// Registra una arista de entrada. El builder de la red garantiza que el
  /// origen existe; aquí sólo se evita duplicar la misma arista.
  pub fn connect_input(&mut self, source: InletSource) -> Result<(), DomainError> {
    if self.inputs.contains(&source) {
      return Err(DomainError::ValidationError(format!("la entrada desde {} ya existe en el reactor {}", source, self.id)));
    }
    self.inputs.push(source);
    Ok(())
  }

  /// Fija la única salida del reactor. Un reactor tiene 0 o 1 salidas; un
  /// segundo intento es un error, nunca una sobreescritura.
  pub fn connect_output(&mut self, outlet: Outlet) -> Result<(), DomainError> {
    if let Some(existing) = self.output {
      return Err(DomainError::ValidationError(format!("el reactor {} ya tiene salida hacia {}", self.id, existing)));
    }
    self.output = Some(outlet);
    Ok(())
  }

  /// Elimina la arista de entrada con el origen dado, si existe. Usado por
  /// el rollback del builder al deshacer el último elemento agregado.
  pub fn remove_input(&mut self, source: &InletSource) {
    self.inputs.retain(|s| s != source);
  }

  /// Borra la salida del reactor. Usado por el rollback del builder.
  pub fn clear_output(&mut self) {
    self.output = None;
  }
}

impl fmt::Display for Reactor {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f,
           "Reactor {} ({}): {:.3} mL, {:.1} mm x {:.3} mm",
           self.id, self.name, self.volume_ml, self.length_mm, self.diameter_mm)
  }
}
