// Archivo: network.rs
// Propósito: implementar `ReactorNetwork`, el dueño del grafo de reactores
// y jeringas. Valida cada conexión antes de mutar (auto-lazos, ciclos,
// salida de producto duplicada, jeringa ya conectada) y mantiene los
// contadores de identidad que avanzan al agregar y retroceden al deshacer.
//
// Nota: el grafo vive en memoria con un único dueño; los agregados
// derivados (volumen total, tiempo de retención) se recalculan bajo
// demanda para evitar valores obsoletos.
use crate::balance;
use crate::errors::{NetworkError, Result};
use crate::report::{ReactorSummary, SetupReport, SyringeSummary};
use chrono::{DateTime, Utc};
use reactor_domain::{resolve_dimension, DomainError, InletSource, Outlet, Reactor, Syringe};
use sha2::{Digest, Sha256};
use std::collections::HashSet;
use uuid::Uuid;

/// Red de reactores y jeringas en construcción o ya completa.
///
/// Responsabilidades principales:
/// - Crear reactores/jeringas con identidad secuencial y geometría resuelta
/// - Registrar aristas jeringa→reactor y reactor→reactor/PRODUCT con la
///   validación completa del grafo (sin ciclos, sin auto-lazos, una sola
///   salida de producto)
/// - Deshacer el último elemento agregado decrementando el contador
/// - Exponer los cálculos derivados (volumen total, caudales, tiempo de
///   retención) y el reporte plano para el front end
///
/// Nota sobre errores:
/// - Toda mutación rechazada retorna un `NetworkError` y deja el grafo
///   exactamente como estaba; `state_hash` sirve para verificarlo.
pub struct ReactorNetwork {
    id: Uuid,
    created_at: DateTime<Utc>,
    reactors: Vec<Reactor>,
    syringes: Vec<Syringe>,
    /// Próxima identidad de reactor; retrocede con el rollback.
    next_reactor_id: u32,
    /// Próxima identidad de jeringa; retrocede con el rollback.
    next_syringe_id: u32,
    /// Volumen acumulado de tubos conectores declarado por el usuario.
    tube_volume_ml: f64,
}

impl ReactorNetwork {
    /// Crea una red vacía. Las identidades de reactores y jeringas
    /// arrancan en 1.
    pub fn new() -> Self {
        Self { id: Uuid::new_v4(),
               created_at: Utc::now(),
               reactors: Vec::new(),
               syringes: Vec::new(),
               next_reactor_id: 1,
               next_syringe_id: 1,
               tube_volume_ml: 0.0 }
    }

    /// Identidad de esta instancia de red.
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn reactors(&self) -> &[Reactor] {
        &self.reactors
    }

    pub fn syringes(&self) -> &[Syringe] {
        &self.syringes
    }

    /// Busca un reactor por id.
    pub fn reactor(&self, id: u32) -> Option<&Reactor> {
        self.reactors.iter().find(|r| r.id() == id)
    }

    /// Busca una jeringa por id.
    pub fn syringe(&self, id: u32) -> Option<&Syringe> {
        self.syringes.iter().find(|s| s.id() == id)
    }

    fn reactor_mut(&mut self, id: u32) -> Option<&mut Reactor> {
        self.reactors.iter_mut().find(|r| r.id() == id)
    }

    fn syringe_mut(&mut self, id: u32) -> Option<&mut Syringe> {
        self.syringes.iter_mut().find(|s| s.id() == id)
    }

    /// Agrega un reactor. Si exactamente una dimensión geométrica es `0.0`
    /// se resuelve con el solver de geometría antes de almacenar; ver
    /// `reactor_domain::resolve_dimension` para las condiciones de fallo.
    /// Retorna el id asignado.
    pub fn add_reactor(&mut self, name: &str, volume_ml: f64, length_mm: f64, diameter_mm: f64) -> Result<u32> {
        let reactor = Reactor::new(self.next_reactor_id, name, volume_ml, length_mm, diameter_mm)?;
        let id = reactor.id();
        self.reactors.push(reactor);
        self.next_reactor_id += 1;
        log::debug!("reactor {} agregado ({} en total)", id, self.reactors.len());
        Ok(id)
    }

    /// Agrega una jeringa sin conectar y sin caudal. Retorna el id asignado.
    pub fn add_syringe(&mut self, name: &str, volume_ml: f64) -> Result<u32> {
        let syringe = Syringe::new(self.next_syringe_id, name, volume_ml)?;
        let id = syringe.id();
        self.syringes.push(syringe);
        self.next_syringe_id += 1;
        log::debug!("jeringa {} agregada ({} en total)", id, self.syringes.len());
        Ok(id)
    }

    /// Deshace el reactor agregado más recientemente y decrementa el
    /// contador de identidad. Las aristas que lo referencian se purgan para
    /// que el grafo no retenga ids colgantes. Retorna el id eliminado.
    pub fn remove_last_reactor(&mut self) -> Result<u32> {
        let removed = self.reactors
                          .pop()
                          .ok_or_else(|| NetworkError::NotFound("no hay reactores que eliminar".to_string()))?;
        let removed_id = removed.id();
        for r in self.reactors.iter_mut() {
            r.remove_input(&InletSource::Reactor(removed_id));
            if r.output() == Some(Outlet::Reactor(removed_id)) {
                r.clear_output();
            }
        }
        for s in self.syringes.iter_mut() {
            if s.connected_to() == Some(removed_id) {
                s.disconnect();
            }
        }
        self.next_reactor_id -= 1;
        log::debug!("reactor {} eliminado por rollback", removed_id);
        Ok(removed_id)
    }

    /// Deshace la jeringa agregada más recientemente y decrementa el
    /// contador de identidad. Retorna el id eliminado.
    pub fn remove_last_syringe(&mut self) -> Result<u32> {
        let removed = self.syringes
                          .pop()
                          .ok_or_else(|| NetworkError::NotFound("no hay jeringas que eliminar".to_string()))?;
        let removed_id = removed.id();
        for r in self.reactors.iter_mut() {
            r.remove_input(&InletSource::Syringe(removed_id));
        }
        self.next_syringe_id -= 1;
        log::debug!("jeringa {} eliminada por rollback", removed_id);
        Ok(removed_id)
    }

    /// Conecta una jeringa a la entrada de un reactor. La conexión se
    /// registra en ambos lados (jeringa y reactor) y es inmutable: un
    /// segundo intento falla con `AlreadyConnected` sin sobreescribir.
    pub fn connect_syringe(&mut self, syringe_id: u32, reactor_id: u32) -> Result<()> {
        let syringe = self.syringe(syringe_id).ok_or(NetworkError::UnknownSyringe(syringe_id))?;
        if let Some(existing) = syringe.connected_to() {
            return Err(NetworkError::AlreadyConnected(format!("la jeringa {} ya alimenta al reactor {}",
                                                              syringe_id, existing)));
        }
        if self.reactor(reactor_id).is_none() {
            return Err(NetworkError::UnknownReactor(reactor_id));
        }

        // Validado todo: registrar la arista en ambos lados.
        self.syringe_mut(syringe_id)
            .ok_or(NetworkError::UnknownSyringe(syringe_id))?
            .connect_to(reactor_id)?;
        self.reactor_mut(reactor_id)
            .ok_or(NetworkError::UnknownReactor(reactor_id))?
            .connect_input(InletSource::Syringe(syringe_id))?;
        log::debug!("jeringa {} conectada al reactor {}", syringe_id, reactor_id);
        Ok(())
    }

    /// Conecta la única salida de un reactor hacia otro reactor o hacia el
    /// sumidero de producto (`Outlet::Product`).
    ///
    /// Fallos posibles, en orden de chequeo:
    /// - `UnknownReactor` si el origen (o el destino) no existe
    /// - `AlreadyConnected` si el origen ya tiene salida
    /// - `SelfLoop` si origen y destino coinciden
    /// - `DuplicateProductSink` si ya existe la salida de producto
    /// - `CycleDetected` si ya hay un camino destino→origen en el subgrafo
    ///   de reactores (agregar origen→destino cerraría el lazo)
    pub fn connect_reactor_output(&mut self, reactor_id: u32, outlet: Outlet) -> Result<()> {
        let source = self.reactor(reactor_id).ok_or(NetworkError::UnknownReactor(reactor_id))?;
        if let Some(existing) = source.output() {
            return Err(NetworkError::AlreadyConnected(format!("el reactor {} ya descarga hacia {}",
                                                              reactor_id, existing)));
        }

        match outlet {
            Outlet::Product => {
                if let Some(owner) = self.product_sink_owner() {
                    return Err(NetworkError::DuplicateProductSink(owner));
                }
            }
            Outlet::Reactor(target) => {
                if target == reactor_id {
                    return Err(NetworkError::SelfLoop(reactor_id));
                }
                if self.reactor(target).is_none() {
                    return Err(NetworkError::UnknownReactor(target));
                }
                if self.reaches(target, reactor_id) {
                    return Err(NetworkError::CycleDetected { from: reactor_id, to: target });
                }
            }
        }

        // Validado todo: registrar la arista en ambos lados.
        self.reactor_mut(reactor_id)
            .ok_or(NetworkError::UnknownReactor(reactor_id))?
            .connect_output(outlet)?;
        if let Outlet::Reactor(target) = outlet {
            self.reactor_mut(target)
                .ok_or(NetworkError::UnknownReactor(target))?
                .connect_input(InletSource::Reactor(reactor_id))?;
        }
        log::debug!("reactor {} conectado hacia {}", reactor_id, outlet);
        Ok(())
    }

    /// Reactor dueño de la salida de producto, si ya fue conectada.
    pub fn product_sink_owner(&self) -> Option<u32> {
        self.reactors
            .iter()
            .find(|r| r.output() == Some(Outlet::Product))
            .map(|r| r.id())
    }

    /// Búsqueda en profundidad iterativa sobre las salidas de reactores:
    /// ¿existe un camino `start` → `target`? Las jeringas no participan,
    /// son fuentes puras y nunca cierran un ciclo. El conjunto de visitados
    /// es local a cada llamada.
    fn reaches(&self, start: u32, target: u32) -> bool {
        let mut visited: HashSet<u32> = HashSet::new();
        let mut stack = vec![start];
        while let Some(current) = stack.pop() {
            if current == target {
                return true;
            }
            if !visited.insert(current) {
                continue;
            }
            if let Some(reactor) = self.reactor(current) {
                if let Some(Outlet::Reactor(next)) = reactor.output() {
                    if !visited.contains(&next) {
                        stack.push(next);
                    }
                }
            }
        }
        false
    }

    /// Volumen de un tubo conector a partir del triple (volumen, longitud,
    /// diámetro): si el volumen es el centinela `0.0` se resuelve por
    /// geometría, si no se usa tal cual (validado positivo).
    fn tube_volume_from(volume_ml: f64, length_mm: f64, diameter_mm: f64) -> Result<f64> {
        if volume_ml == 0.0 {
            Ok(resolve_dimension(0.0, length_mm, diameter_mm)?.value())
        } else if volume_ml.is_finite() && volume_ml > 0.0 {
            Ok(volume_ml)
        } else {
            Err(DomainError::ValidationError(format!("el volumen del tubo debe ser positivo (se recibió {})",
                                                     volume_ml)).into())
        }
    }

    /// Declara un tubo conector y acumula su volumen en el total de la red.
    /// Retorna el volumen agregado en mL.
    pub fn add_tube_volume(&mut self, volume_ml: f64, length_mm: f64, diameter_mm: f64) -> Result<f64> {
        let v = Self::tube_volume_from(volume_ml, length_mm, diameter_mm)?;
        self.tube_volume_ml += v;
        Ok(v)
    }

    /// Resta un tubo conector previamente declarado. Falla si la resta
    /// dejaría el acumulado negativo, y en ese caso no modifica nada.
    pub fn remove_tube_volume(&mut self, volume_ml: f64, length_mm: f64, diameter_mm: f64) -> Result<f64> {
        let v = Self::tube_volume_from(volume_ml, length_mm, diameter_mm)?;
        if self.tube_volume_ml - v < 0.0 {
            return Err(DomainError::ValidationError("el volumen acumulado de tubos no puede quedar negativo".to_string()).into());
        }
        self.tube_volume_ml -= v;
        Ok(v)
    }

    /// Volumen acumulado de tubos conectores.
    pub fn tube_volume_ml(&self) -> f64 {
        self.tube_volume_ml
    }

    /// Volumen total de la red: suma de los volúmenes de todos los
    /// reactores más los tubos conectores declarados. Se recalcula en cada
    /// llamada.
    pub fn total_volume_ml(&self) -> f64 {
        self.reactors.iter().map(|r| r.volume_ml()).sum::<f64>() + self.tube_volume_ml
    }

    /// Calcula y asigna el caudal de cada jeringa para alcanzar el tiempo
    /// de retención pedido sobre `total_volume_ml`. Ver `balance::flow_rates`
    /// para la regla de reparto. Retorna los pares (id, caudal) asignados.
    pub fn compute_flow_rates(&mut self, total_volume_ml: f64, retention_time_min: f64) -> Result<Vec<(u32, f64)>> {
        let assigned = balance::flow_rates(total_volume_ml, retention_time_min, &self.syringes)?;
        for (id, rate) in &assigned {
            self.syringe_mut(*id)
                .ok_or(NetworkError::UnknownSyringe(*id))?
                .set_flow_rate(*rate)?;
        }
        log::debug!("caudales asignados para V={} mL, T={} min", total_volume_ml, retention_time_min);
        Ok(assigned)
    }

    /// Tiempo de retención resultante de los caudales ya asignados sobre
    /// `total_volume_ml`. Ver `balance::retention_time`.
    pub fn compute_retention_time(&self, total_volume_ml: f64) -> Result<f64> {
        balance::retention_time(total_volume_ml, &self.syringes)
    }

    /// Fija manualmente el caudal de una jeringa (sobreescribe el que
    /// hubiera, calculado o manual).
    pub fn set_flow_rate(&mut self, syringe_id: u32, rate_ml_min: f64) -> Result<()> {
        let syringe = self.syringe_mut(syringe_id).ok_or(NetworkError::UnknownSyringe(syringe_id))?;
        syringe.set_flow_rate(rate_ml_min)?;
        Ok(())
    }

    /// Validación estricta de completitud: al menos un reactor y una
    /// jeringa, toda jeringa conectada, todo reactor con salida y la salida
    /// de producto presente. Los cálculos que pueden operar sobre un grafo
    /// parcial no la exigen.
    pub fn validate_complete(&self) -> Result<()> {
        if self.reactors.is_empty() {
            return Err(NetworkError::IncompleteNetwork("la red necesita al menos un reactor".to_string()));
        }
        if self.syringes.is_empty() {
            return Err(NetworkError::IncompleteNetwork("la red necesita al menos una jeringa".to_string()));
        }
        for s in &self.syringes {
            if s.connected_to().is_none() {
                return Err(NetworkError::IncompleteNetwork(format!("la jeringa {} ({}) no está conectada",
                                                                   s.id(), s.name())));
            }
        }
        for r in &self.reactors {
            if r.output().is_none() {
                return Err(NetworkError::IncompleteNetwork(format!("el reactor {} ({}) no tiene salida",
                                                                   r.id(), r.name())));
            }
        }
        if self.product_sink_owner().is_none() {
            return Err(NetworkError::IncompleteNetwork("la red no tiene salida de producto".to_string()));
        }
        Ok(())
    }

    /// Huella SHA-256 del estado canónico del grafo (identidades,
    /// geometría, aristas, caudales, tubos). Dos redes con el mismo estado
    /// producen la misma huella; las pruebas la usan para verificar que una
    /// mutación rechazada no tocó nada.
    pub fn state_hash(&self) -> String {
        let mut hasher = Sha256::new();
        for r in &self.reactors {
            hasher.update(format!("R|{}|{}|{:.9}|{:.9}|{:.9}", r.id(), r.name(), r.volume_ml(), r.length_mm(),
                                  r.diameter_mm())
                              .as_bytes());
            for input in r.inputs() {
                hasher.update(format!("|in:{}", input).as_bytes());
            }
            if let Some(outlet) = r.output() {
                hasher.update(format!("|out:{}", outlet).as_bytes());
            }
            hasher.update(b"\n");
        }
        for s in &self.syringes {
            hasher.update(format!("S|{}|{}|{:.9}|{:?}|{:?}\n", s.id(), s.name(), s.volume_ml(), s.connected_to(),
                                  s.flow_rate_ml_min())
                              .as_bytes());
        }
        hasher.update(format!("T|{:.9}", self.tube_volume_ml).as_bytes());
        format!("{:x}", hasher.finalize())
    }

    /// Construye el reporte plano del estado actual (contrato con el front
    /// end: el formato final es problema del sumidero de salida, no del
    /// core). El tiempo de retención se incluye sólo si todos los caudales
    /// están asignados.
    pub fn report(&self) -> SetupReport {
        let total_volume_ml = self.total_volume_ml();
        SetupReport { setup_id: self.id,
                      generated_at: Utc::now(),
                      total_volume_ml,
                      retention_time_min: balance::retention_time(total_volume_ml, &self.syringes).ok(),
                      reactors: self.reactors.iter().map(ReactorSummary::from).collect(),
                      syringes: self.syringes.iter().map(SyringeSummary::from).collect() }
    }
}

impl Default for ReactorNetwork {
    fn default() -> Self {
        Self::new()
    }
}
