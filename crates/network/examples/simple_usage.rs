use network::{NetworkError, ReactorNetwork};
use reactor_domain::Outlet;

fn main() -> Result<(), NetworkError> {
    // Armar la red: dos reactores en cadena hacia la salida de producto
    let mut red = ReactorNetwork::new();
    let r1 = red.add_reactor("oxidación", 0.0, 2000.0, 1.5)?;
    let r2 = red.add_reactor("quench", 4.0, 1000.0, 0.0)?;
    println!("reactor {} -> {}", r1, red.reactor(r1).map(|r| r.volume_ml()).unwrap_or(0.0));
    println!("reactor {} -> {}", r2, red.reactor(r2).map(|r| r.diameter_mm()).unwrap_or(0.0));

    // Tres jeringas: dos al primer reactor, una al segundo
    let s1 = red.add_syringe("ácido", 10.0)?;
    let s2 = red.add_syringe("sustrato", 10.0)?;
    let s3 = red.add_syringe("quench", 5.0)?;
    red.connect_syringe(s1, r1)?;
    red.connect_syringe(s2, r1)?;
    red.connect_syringe(s3, r2)?;
    red.connect_reactor_output(r1, Outlet::Reactor(r2))?;

    // Un intento de ciclo se rechaza sin tocar el grafo
    match red.connect_reactor_output(r2, Outlet::Reactor(r1)) {
        Err(e) => println!("conexión rechazada: {}", e),
        Ok(()) => unreachable!("cerraría un ciclo"),
    }

    red.connect_reactor_output(r2, Outlet::Product)?;
    red.validate_complete()?;

    // Caudales para 8 minutos de retención sobre el volumen total
    let volumen_total = red.total_volume_ml();
    println!("volumen total: {:.3} mL", volumen_total);
    for (id, caudal) in red.compute_flow_rates(volumen_total, 8.0)? {
        println!("jeringa {}: {:.6} mL/min", id, caudal);
    }

    // El cálculo inverso reproduce el tiempo pedido
    let retencion = red.compute_retention_time(volumen_total)?;
    println!("tiempo de retención: {:.3} min", retencion);

    // Reporte plano listo para el sumidero de salida
    let reporte = red.report();
    println!("{}", serde_json::to_string_pretty(&reporte.to_value()).unwrap_or_default());
    Ok(())
}
