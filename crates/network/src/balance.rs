// Archivo: balance.rs
// Propósito: reparto de caudales entre jeringas y cálculo inverso del
// tiempo de retención. Funciones puras sobre el slice de jeringas; la
// escritura de los caudales calculados la hace `ReactorNetwork`.
use crate::errors::{NetworkError, Result};
use reactor_domain::{DomainError, Syringe};
use std::collections::BTreeMap;

fn check_total_volume(total_volume_ml: f64) -> Result<()> {
    if !total_volume_ml.is_finite() || total_volume_ml <= 0.0 {
        return Err(DomainError::ValidationError(format!("el volumen total debe ser positivo (se recibió {})",
                                                        total_volume_ml)).into());
    }
    Ok(())
}

/// Calcula el caudal de cada jeringa para que el caudal total de entrada
/// sea exactamente `total_volume_ml / retention_time_min`, sin importar
/// cuán despareja sea la distribución de jeringas entre reactores.
///
/// Regla de reparto (conteo virtual de jeringas):
/// - se agrupan las jeringas por reactor alimentado; `groupCount(r)` es el
///   fan-in del reactor `r`
/// - `maxCount` es el mayor fan-in y `numGroups` la cantidad de reactores
///   alimentados; `virtualCount = maxCount × numGroups`
/// - `baseFlow = V / (virtualCount × T)` y cada jeringa del grupo `r`
///   recibe `baseFlow × maxCount / groupCount(r)`
///
/// Así cada grupo aporta el mismo caudal agregado (`maxCount × baseFlow`)
/// y la suma de todos los caudales es `V / T`.
///
/// Fallos: `EmptyNetwork` sin jeringas, `InvalidRetentionTime` si
/// `T <= 0` (se rechaza antes de dividir), `IncompleteNetwork` si alguna
/// jeringa no está conectada (el reparto agrupa por reactor conectado).
///
/// Retorna los pares `(id de jeringa, caudal en mL/min)` en el orden de
/// las jeringas de entrada.
pub fn flow_rates(total_volume_ml: f64, retention_time_min: f64, syringes: &[Syringe]) -> Result<Vec<(u32, f64)>> {
    if syringes.is_empty() {
        return Err(NetworkError::EmptyNetwork);
    }
    if !retention_time_min.is_finite() || retention_time_min <= 0.0 {
        return Err(NetworkError::InvalidRetentionTime(retention_time_min));
    }
    check_total_volume(total_volume_ml)?;

    // Fan-in por reactor alimentado; BTreeMap para un recorrido
    // determinista.
    let mut group_counts: BTreeMap<u32, usize> = BTreeMap::new();
    for s in syringes {
        let reactor_id = s.connected_to()
                          .ok_or_else(|| NetworkError::IncompleteNetwork(format!("la jeringa {} ({}) no está conectada",
                                                                                 s.id(), s.name())))?;
        *group_counts.entry(reactor_id).or_insert(0) += 1;
    }

    let max_count = group_counts.values().copied().max().unwrap_or(1);
    let num_groups = group_counts.len();
    let virtual_count = max_count * num_groups;
    let base_flow = total_volume_ml / (virtual_count as f64 * retention_time_min);

    let mut assigned = Vec::with_capacity(syringes.len());
    for s in syringes {
        let reactor_id = s.connected_to()
                          .ok_or_else(|| NetworkError::IncompleteNetwork(format!("la jeringa {} ({}) no está conectada",
                                                                                 s.id(), s.name())))?;
        let group_count = group_counts.get(&reactor_id).copied().unwrap_or(1);
        let rate = base_flow * (max_count as f64 / group_count as f64);
        assigned.push((s.id(), rate));
    }
    Ok(assigned)
}

/// Tiempo de retención resultante: `total_volume_ml` dividido por la suma
/// de los caudales ya asignados.
///
/// Fallos: `EmptyNetwork` sin jeringas, `NoFlowSet` si alguna jeringa no
/// tiene caudal, `ZeroInflow` si la suma no es estrictamente positiva.
pub fn retention_time(total_volume_ml: f64, syringes: &[Syringe]) -> Result<f64> {
    if syringes.is_empty() {
        return Err(NetworkError::EmptyNetwork);
    }
    check_total_volume(total_volume_ml)?;

    let mut inflow = 0.0;
    for s in syringes {
        inflow += s.flow_rate_ml_min().ok_or(NetworkError::NoFlowSet(s.id()))?;
    }
    if inflow <= 0.0 {
        return Err(NetworkError::ZeroInflow(inflow));
    }
    Ok(total_volume_ml / inflow)
}
