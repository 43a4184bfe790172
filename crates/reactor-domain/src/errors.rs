// errors.rs
use thiserror::Error;

#[derive(Debug, Error, Clone)]
pub enum DomainError {
  /// El triple (volumen, longitud, diámetro) no permite resolver una
  /// dimensión: o no falta ninguna, o faltan dos o más, o hay valores
  /// no positivos.
  #[error("Geometría inválida: {0}")]
  InvalidGeometry(String),
  #[error("Error de validación: {0}")]
  ValidationError(String),
}
